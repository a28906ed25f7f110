use crate::AppState;
use crate::api::error::AppError;
use crate::api::middleware::auth::SESSION_COOKIE;
use crate::services::session;
use crate::views;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

/// Landing page, or straight to the dashboard for signed-in visitors.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    if let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
        if session::resolve(&state.db, &token).await?.is_some() {
            return Ok(Redirect::to("/dashboard").into_response());
        }
    }

    Ok(views::landing_page().into_response())
}
