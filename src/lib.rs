pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;
pub mod views;

use crate::api::handlers;
use crate::api::middleware;
use crate::config::AppConfig;
use crate::infrastructure::storage::StorageService;
use crate::services::document_service::DocumentService;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<StorageService>,
    pub documents: Arc<DocumentService>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    let authenticated = Router::new()
        .route("/logout", get(handlers::auth::logout))
        .route(
            "/dashboard",
            get(handlers::dashboard::show).post(handlers::dashboard::upload),
        )
        .route("/uploads/:filename", get(handlers::uploads::download))
        .route("/admin", get(handlers::admin::panel))
        .route(
            "/admin/toggle_approval",
            post(handlers::admin::toggle_approval),
        )
        .route("/admin/approve/:id", post(handlers::admin::approve))
        .route("/admin/reject/:id", post(handlers::admin::reject))
        .route("/admin/delete_doc/:id", post(handlers::admin::delete_doc))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth::session_middleware,
        ));

    Router::new()
        .route("/", get(handlers::pages::index))
        .route(
            "/register",
            get(handlers::auth::register_page).post(handlers::auth::register),
        )
        .route(
            "/login",
            get(handlers::auth::login_page).post(handlers::auth::login),
        )
        .route(
            "/login/user",
            get(handlers::auth::user_login_page).post(handlers::auth::user_login),
        )
        .route(
            "/user-login",
            get(handlers::auth::user_login_page).post(handlers::auth::user_login),
        )
        .merge(authenticated)
        .with_state(state)
}
