//! Session-scoped upload storage on the local filesystem.

pub mod filename;
mod session;
mod uploads;

use thiserror::Error;

use crate::utils::security::ValidationError;

pub use session::{SessionDescriptor, SessionId};
pub use uploads::{Clip, SessionUploadStore, StoredFile, UploadedFile};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No file received")]
    NoFileReceived,

    #[error("File not found")]
    NotFound,

    #[error("Invalid path: {0}")]
    InvalidPath(#[from] ValidationError),

    #[error("Storage failure: {0}")]
    Storage(#[from] std::io::Error),
}
