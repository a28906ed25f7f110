use crate::AppState;
use crate::api::error::AppError;
use crate::api::handlers::{Notice, flash};
use crate::api::middleware::auth::CurrentUser;
use crate::services::access_control::can_upload;
use crate::services::approval;
use crate::views;
use axum::{
    Extension,
    extract::{Multipart, Query, State},
    response::{Html, Redirect},
};

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(notice): Query<Notice>,
) -> Result<Html<String>, AppError> {
    let docs = state.documents.list_visible(user.identity()).await?;

    // Pending users surface only for an admin with approval mode on;
    // the flag gates this panel and nothing else.
    let pending = if user.role.is_admin() && user.approval_mode {
        Some(approval::list_pending(&state.db).await?)
    } else {
        None
    };

    Ok(views::dashboard_page(
        &user,
        &docs,
        pending.as_deref(),
        notice.msg.as_deref(),
    ))
}

/// Multipart upload. Non-admin attempts warn and change nothing; the
/// existing listing stays reachable via the redirect target.
pub async fn upload(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    if !can_upload(user.identity()) {
        return Ok(flash(
            "/dashboard",
            "Only administrators can upload documents.",
        ));
    }

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() == Some("file") {
            let original_name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Upload failed: {e}")))?;
            upload = Some((original_name, data.to_vec()));
        }
    }

    let Some((original_name, data)) = upload.filter(|(name, _)| !name.is_empty()) else {
        return Ok(flash("/dashboard", "No file selected"));
    };

    match state.documents.save(user.id, &original_name, &data).await {
        Ok(_) => Ok(flash("/dashboard", "File uploaded")),
        Err(AppError::Validation(msg)) => Ok(flash("/dashboard", &msg)),
        Err(e) => Err(e),
    }
}
