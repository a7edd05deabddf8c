use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::{routing::post, Json, Router};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::{ApiResponse, AppState};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/upload-file", post(upload_file))
        .with_state(state)
}

/// Store the multipart `file` field under the upload directory.
///
/// Files are keyed by their original name; a later upload with the same name
/// replaces the earlier one.
async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ApiResponse>> {
    let mut multipart = multipart.map_err(|e| {
        warn!(error = %e, "Upload request is not multipart");
        AppError::InvalidRequest("No file part".to_string())
    })?;

    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        // A part without a filename parameter is a form value, not a file.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field.bytes().await?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::InvalidRequest("No file part".to_string()))?;
    if filename.is_empty() {
        return Err(AppError::InvalidRequest("No selected file".to_string()));
    }

    let target = target_path(&state.server.upload_dir, &filename)?;
    tokio::fs::write(&target, &data).await?;

    info!(path = %target.display(), bytes = data.len(), "File uploaded");
    Ok(Json(ApiResponse::success("File uploaded successfully")))
}

/// Join only the final component of `filename` onto `dir`.
fn target_path(dir: &Path, filename: &str) -> AppResult<PathBuf> {
    Path::new(filename)
        .file_name()
        .map(|name| dir.join(name))
        .ok_or_else(|| AppError::InvalidRequest(format!("Invalid filename: {}", filename)))
}
