use crate::AppState;
use crate::api::error::AppError;
use crate::api::handlers::{Notice, flash};
use crate::api::middleware::auth::{CurrentUser, SESSION_COOKIE};
use crate::entities::users::{self, Role};
use crate::services::session;
use crate::views;
use axum::{
    Extension, Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set, SqlErr};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn nonempty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .build()
}

pub async fn register_page(Query(notice): Query<Notice>) -> Html<String> {
    views::register_page(notice.msg.as_deref())
}

/// Create an unapproved account. Duplicate username/email surfaces as the
/// store's uniqueness violation, mapped to the same warning a pre-check
/// would give; no row is created either way.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    let (Some(username), Some(email), Some(password)) = (
        nonempty(form.username),
        nonempty(form.email),
        nonempty(form.password),
    ) else {
        return Ok(flash("/register", "Please fill all fields"));
    };

    let password_hash = session::hash_password(&password)?;

    let user = users::ActiveModel {
        username: Set(username),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(Role::User),
        is_approved: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match user.insert(&state.db).await {
        Ok(_) => Ok(flash(
            "/login/user",
            "Registration successful. Wait for admin approval.",
        )),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Ok(flash("/register", "Username or email already exists"))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login_page(Query(notice): Query<Notice>) -> Html<String> {
    views::login_page(notice.msg.as_deref())
}

/// Admin-oriented login. An admin success force-enables approval mode for
/// the new session and lands on the admin panel; a regular account lands
/// on the dashboard with the flag off.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<axum::response::Response, AppError> {
    let (Some(email), Some(password)) = (nonempty(form.email), nonempty(form.password)) else {
        return Ok(flash("/login", "Please fill all fields").into_response());
    };

    match session::login(&state.db, &email, &password, true).await {
        Ok((session, user)) => {
            let jar = jar.add(session_cookie(&session.id));
            let response = if user.role.is_admin() {
                (jar, flash("/admin", "Admin logged in. Approval mode enabled."))
            } else {
                (jar, flash("/dashboard", "Logged in successfully"))
            };
            Ok(response.into_response())
        }
        Err(AppError::InvalidCredentials) => {
            Ok(flash("/login", "Invalid credentials").into_response())
        }
        Err(AppError::NotApproved) => {
            Ok(flash("/login", "Waiting for admin approval").into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn user_login_page(Query(notice): Query<Notice>) -> Html<String> {
    views::user_login_page(notice.msg.as_deref())
}

/// Login entry point that never enables approval mode, whatever the role.
pub async fn user_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<axum::response::Response, AppError> {
    let (Some(email), Some(password)) = (nonempty(form.email), nonempty(form.password)) else {
        return Ok(flash("/login/user", "Please fill all fields").into_response());
    };

    match session::login(&state.db, &email, &password, false).await {
        Ok((session, _user)) => {
            let jar = jar.add(session_cookie(&session.id));
            Ok((jar, flash("/dashboard", "Logged in successfully")).into_response())
        }
        Err(AppError::InvalidCredentials) => {
            Ok(flash("/login/user", "Invalid credentials").into_response())
        }
        Err(AppError::NotApproved) => {
            Ok(flash("/login/user", "Waiting for admin approval").into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    session::logout(&state.db, &user.session_id).await?;

    let jar = jar.remove(Cookie::from(SESSION_COOKIE));
    Ok((jar, flash("/login", "Logged out")))
}
