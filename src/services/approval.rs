//! Admin-mediated approval workflow for newly registered accounts.

use crate::entities::prelude::*;
use crate::entities::{sessions, users};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

/// Users awaiting approval, oldest registration first.
pub async fn list_pending(db: &DatabaseConnection) -> Result<Vec<users::Model>, DbErr> {
    Users::find()
        .filter(users::Column::IsApproved.eq(false))
        .order_by_asc(users::Column::CreatedAt)
        .all(db)
        .await
}

/// Approve an account. An unconditional UPDATE, so approving an
/// already-approved user is a harmless no-op.
pub async fn approve(db: &DatabaseConnection, user_id: i32) -> Result<(), DbErr> {
    Users::update_many()
        .col_expr(users::Column::IsApproved, Expr::value(true))
        .filter(users::Column::Id.eq(user_id))
        .exec(db)
        .await?;

    info!("User {} approved", user_id);
    Ok(())
}

/// Reject an account by deleting it outright. Documents and sessions
/// owned by the user go with it via cascade.
pub async fn reject(db: &DatabaseConnection, user_id: i32) -> Result<(), DbErr> {
    Users::delete_by_id(user_id).exec(db).await?;

    info!("User {} rejected and deleted", user_id);
    Ok(())
}

/// Flip the per-session approval-mode flag. Purely a UI toggle: it gates
/// the pending-user panel on the dashboard, never approve/reject
/// themselves.
pub async fn toggle_mode(
    db: &DatabaseConnection,
    session_id: &str,
    current: bool,
) -> Result<bool, DbErr> {
    let next = !current;

    Sessions::update_many()
        .col_expr(sessions::Column::ApprovalMode, Expr::value(next))
        .filter(sessions::Column::Id.eq(session_id))
        .exec(db)
        .await?;

    Ok(next)
}
