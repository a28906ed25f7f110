//! Login, logout, and per-request identity resolution over the
//! server-side `sessions` table.

use crate::api::error::AppError;
use crate::entities::prelude::*;
use crate::entities::{sessions, users};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("stored hash unparsable: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Authenticate by email and open a session.
///
/// Outcomes, in the order the checks run:
/// - unknown email → `InvalidCredentials`
/// - known but unapproved account → `NotApproved` (before the password
///   check, matching the approval-gate behavior users see)
/// - wrong password → `InvalidCredentials` (same message as unknown email)
/// - success → session row inserted, token returned
///
/// `force_approval_mode` is set by the admin login entry point only; the
/// flag sticks to the session when the account is actually an admin.
pub async fn login(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    force_approval_mode: bool,
) -> Result<(sessions::Model, users::Model), AppError> {
    let user = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !user.is_approved {
        return Err(AppError::NotApproved);
    }

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let approval_mode = force_approval_mode && user.role.is_admin();

    let session = sessions::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user.id),
        approval_mode: Set(approval_mode),
        created_at: Set(Utc::now()),
    };

    let session = session.insert(db).await?;

    Ok((session, user))
}

/// Resolve a session token to its session and user. Consulted on every
/// request by the auth middleware; never cached.
pub async fn resolve(
    db: &DatabaseConnection,
    token: &str,
) -> Result<Option<(sessions::Model, users::Model)>, DbErr> {
    let Some(session) = Sessions::find_by_id(token).one(db).await? else {
        return Ok(None);
    };

    let Some(user) = Users::find_by_id(session.user_id).one(db).await? else {
        return Ok(None);
    };

    Ok(Some((session, user)))
}

/// End a session. The approval-mode flag dies with the row.
pub async fn logout(db: &DatabaseConnection, token: &str) -> Result<(), DbErr> {
    Sessions::delete_by_id(token).exec(db).await?;
    Ok(())
}
