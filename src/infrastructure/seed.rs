use crate::config::AppConfig;
use crate::entities::users::{self, Role};
use crate::services::session::hash_password;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, SqlErr};
use tracing::info;

/// Seed the initial admin account before the server accepts traffic.
///
/// A plain INSERT guarded by the username/email unique constraints: if the
/// account is already there the conflict is tolerated, which keeps the seed
/// idempotent and race-safe under concurrent startup.
pub async fn seed_admin(db: &DatabaseConnection, config: &AppConfig) -> anyhow::Result<()> {
    info!("🌱 Seeding admin account '{}'...", config.admin_username);

    let password_hash = hash_password(&config.admin_password)?;

    let admin = users::ActiveModel {
        username: Set(config.admin_username.clone()),
        email: Set(config.admin_email.clone()),
        password_hash: Set(password_hash),
        role: Set(Role::Admin),
        is_approved: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match admin.insert(db).await {
        Ok(user) => info!("✅ Admin '{}' created (id {})", user.username, user.id),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            info!("✅ Admin account already present, skipping seed");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
