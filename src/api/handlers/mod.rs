pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod pages;
pub mod uploads;

use axum::response::Redirect;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

/// Flash-style notice carried across a redirect as a query parameter.
#[derive(Deserialize, Default)]
pub struct Notice {
    pub msg: Option<String>,
}

/// Redirect-after-POST with a notice for the target page to render.
pub(crate) fn flash(path: &str, msg: &str) -> Redirect {
    let encoded = utf8_percent_encode(msg, NON_ALPHANUMERIC);
    Redirect::to(&format!("{path}?msg={encoded}"))
}
