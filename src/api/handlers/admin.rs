use crate::AppState;
use crate::api::error::AppError;
use crate::api::handlers::{Notice, flash};
use crate::api::middleware::auth::CurrentUser;
use crate::entities::prelude::*;
use crate::entities::users;
use crate::services::access_control::ensure_admin;
use crate::services::approval;
use crate::views;
use axum::{
    Extension,
    extract::{Path, Query, State},
    response::{Html, Redirect},
};
use sea_orm::{EntityTrait, QueryOrder};

pub async fn panel(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(notice): Query<Notice>,
) -> Result<Html<String>, AppError> {
    ensure_admin(user.identity())?;

    let all_users = Users::find()
        .order_by_desc(users::Column::CreatedAt)
        .all(&state.db)
        .await?;
    let docs = state.documents.list_all().await?;

    Ok(views::admin_page(&all_users, &docs, notice.msg.as_deref()))
}

pub async fn toggle_approval(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Redirect, AppError> {
    ensure_admin(user.identity())?;

    let enabled = approval::toggle_mode(&state.db, &user.session_id, user.approval_mode).await?;

    Ok(flash(
        "/dashboard",
        if enabled {
            "Admin approval mode enabled"
        } else {
            "Admin approval mode disabled"
        },
    ))
}

pub async fn approve(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
) -> Result<Redirect, AppError> {
    ensure_admin(user.identity())?;

    approval::approve(&state.db, user_id).await?;

    Ok(flash("/admin", "User approved"))
}

pub async fn reject(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
) -> Result<Redirect, AppError> {
    ensure_admin(user.identity())?;

    approval::reject(&state.db, user_id).await?;

    Ok(flash("/admin", "User deleted"))
}

pub async fn delete_doc(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(doc_id): Path<i32>,
) -> Result<Redirect, AppError> {
    ensure_admin(user.identity())?;

    if state.documents.delete(doc_id).await? {
        Ok(flash("/admin", "Document deleted"))
    } else {
        Ok(Redirect::to("/admin"))
    }
}
