//! HTTP handlers for session creation, clip upload, listing and retrieval.

use anyhow::Context;
use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header, Response},
    Json,
};
use serde::Serialize;
use tokio_util::io::ReaderStream;

use crate::common::AppError;
use crate::store::{Clip, SessionDescriptor, SessionId, StoreError, UploadedFile};

use super::origin::RequestOrigin;
use super::state::AppState;

/// Multipart field carrying the uploaded clip
pub const CLIP_FIELD: &str = "clip";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    ok: bool,
    #[serde(flatten)]
    session: SessionDescriptor,
}

#[derive(Serialize)]
pub struct UploadResponse {
    ok: bool,
    filename: String,
}

#[derive(Serialize)]
pub struct FileListResponse {
    ok: bool,
    files: Vec<UploadedFile>,
}

/// Generate a new session id plus participant/owner links.
/// Nothing is written to disk until the first upload.
pub async fn create_session(
    State(state): State<AppState>,
    RequestOrigin(origin): RequestOrigin,
) -> Json<CreateSessionResponse> {
    let session_id = state.store.create_session();
    tracing::debug!(session_id = %session_id, origin = %origin, "Created session");

    Json(CreateSessionResponse {
        ok: true,
        session: SessionDescriptor::new(&session_id, &origin),
    })
}

/// Store the `clip` field of a multipart upload under the session.
pub async fn upload_clip(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let session_id = SessionId::parse(&session_id).map_err(StoreError::from)?;

    // non-multipart bodies simply carry no file
    let clip = match multipart {
        Ok(multipart) => read_clip(multipart).await?,
        Err(rejection) => {
            tracing::debug!(%rejection, "Upload without multipart body");
            None
        }
    };

    let filename = state.store.store_upload(&session_id, clip).await?;

    Ok(Json(UploadResponse { ok: true, filename }))
}

/// Pull the single clip file out of the form. Other fields are ignored.
async fn read_clip(mut multipart: Multipart) -> Result<Option<Clip>, AppError> {
    let mut clip: Option<Clip> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(CLIP_FIELD) {
            continue;
        }

        // a clip field without a filename is a plain text field, not a file
        let Some(original_filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        if clip.is_some() {
            return Err(AppError::BadRequest(format!(
                "Multiple '{}' files are not allowed",
                CLIP_FIELD
            )));
        }

        let bytes = field.bytes().await?;
        clip = Some(Clip {
            bytes,
            original_filename: Some(original_filename),
        });
    }

    Ok(clip)
}

/// List the files uploaded to a session (empty for unknown sessions)
pub async fn list_files(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<FileListResponse>, AppError> {
    let session_id = SessionId::parse(&session_id).map_err(StoreError::from)?;
    let files = state.store.list_files(&session_id).await?;

    Ok(Json(FileListResponse { ok: true, files }))
}

/// Stream a stored file back as raw bytes
pub async fn retrieve_file(
    Path((session_id, filename)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Response<Body>, AppError> {
    let stored = state
        .store
        .open_file(&session_id, &filename)
        .await
        .map_err(|e| match e {
            // never hint whether something exists outside the root
            StoreError::InvalidPath(reason) => {
                tracing::warn!(%reason, session_id = %session_id, filename = %filename, "Rejected file path");
                AppError::NotFound("File not found".to_string())
            }
            other => AppError::from(other),
        })?;

    let content_type = mime_guess::from_path(&stored.path).first_or_octet_stream();

    Ok(Response::builder()
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, stored.len)
        .body(Body::from_stream(ReaderStream::new(stored.file)))
        .context("build response")?)
}
