use crate::AppState;
use crate::api::error::AppError;
use crate::api::middleware::auth::CurrentUser;
use crate::services::access_control::{self, Decision};
use axum::{
    Extension,
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(str::to_ascii_lowercase) {
        Some(ext) if ext == "pdf" => "application/pdf",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Stream a stored file after the access-control check. Evaluated fresh
/// on every request; nothing about the decision is cached.
pub async fn download(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    match access_control::authorize_download(&state.db, user.identity(), &filename).await? {
        Decision::NotFound => Err(AppError::NotFound),
        Decision::Forbidden => Err(AppError::Forbidden),
        Decision::Allowed => {
            let file = state
                .storage
                .open(&filename)
                .await
                .map_err(|_| AppError::NotFound)?;

            let body = Body::from_stream(ReaderStream::new(file));
            let headers = [
                (header::CONTENT_TYPE, content_type_for(&filename).to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{filename}\""),
                ),
            ];

            Ok((headers, body).into_response())
        }
    }
}
