use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SeaORM connection string (default: `sqlite://database.db?mode=rwc`)
    pub database_url: String,

    /// Directory holding uploaded file bytes (default: `uploads`)
    pub upload_dir: PathBuf,

    /// Socket address to bind (default: `127.0.0.1:5000`)
    pub bind_addr: SocketAddr,

    /// Maximum request body size in bytes (default: 16 MB)
    pub max_upload_size: usize,

    /// Seeded admin account credentials
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://database.db?mode=rwc".to_string(),
            upload_dir: PathBuf::from("uploads"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            max_upload_size: 16 * 1024 * 1024, // 16 MB
            admin_username: "admin".to_string(),
            admin_email: "admin@example.com".to_string(),
            admin_password: "admin".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            bind_addr: env::var("BIND_ADDR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.bind_addr),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            admin_username: env::var("ADMIN_USERNAME").unwrap_or(default.admin_username),

            admin_email: env::var("ADMIN_EMAIL").unwrap_or(default.admin_email),

            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(default.admin_password),
        }
    }

    /// Create config for tests and local development (in-memory database)
    pub fn development() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            ..Self::default()
        }
    }
}
