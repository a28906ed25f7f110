use crate::AppState;
use crate::api::error::AppError;
use crate::entities::users::Role;
use crate::services::access_control::Identity;
use crate::services::session;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

pub const SESSION_COOKIE: &str = "docsafe_session";

/// The resolved caller, attached to the request for the duration of its
/// handling.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub approval_mode: bool,
    pub session_id: String,
}

impl CurrentUser {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            role: self.role,
        }
    }
}

/// Resolve the session cookie to a `CurrentUser` extension, or bounce the
/// request to the login page. Runs on every authenticated route.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return Ok(Redirect::to("/login").into_response());
    };

    match session::resolve(&state.db, &token).await? {
        Some((session, user)) => {
            req.extensions_mut().insert(CurrentUser {
                id: user.id,
                username: user.username,
                role: user.role,
                approval_mode: session.approval_mode,
                session_id: session.id,
            });
            Ok(next.run(req).await)
        }
        None => Ok(Redirect::to("/login").into_response()),
    }
}
