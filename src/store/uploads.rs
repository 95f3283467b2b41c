use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::filename;
use super::session::SessionId;
use super::StoreError;
use crate::utils::security::validate_segment;

/// One uploaded clip as received from the participant
#[derive(Clone, Debug)]
pub struct Clip {
    pub bytes: Bytes,
    /// Only used for its extension
    pub original_filename: Option<String>,
}

/// Listing entry for one stored file
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    /// Relative URL the owner view fetches the file from
    pub path: String,
    #[serde(serialize_with = "serialize_mtime")]
    pub mtime: DateTime<Utc>,
}

// JS Date style: 2024-05-01T12:00:00.123Z
fn serialize_mtime<S: Serializer>(mtime: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&mtime.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// An opened stored file, ready to stream back
#[derive(Debug)]
pub struct StoredFile {
    pub file: File,
    pub len: u64,
    pub path: PathBuf,
}

/// Filesystem backed store: `<root>/<session id>/<stored name>`.
///
/// Holds no in-memory session state, the directory tree is the source of
/// truth. Cheap to clone.
#[derive(Clone, Debug)]
pub struct SessionUploadStore {
    root: Arc<PathBuf>,
    default_extension: Arc<str>,
}

impl SessionUploadStore {
    /// Open the store, creating `root` if it doesn't exist yet
    pub async fn open(
        root: impl Into<PathBuf>,
        default_extension: &str,
    ) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;

        Ok(Self {
            root: Arc::new(root),
            default_extension: Arc::from(default_extension),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn create_session(&self) -> SessionId {
        // directory is created lazily by the first upload
        SessionId::generate()
    }

    fn session_dir(&self, session_id: &SessionId) -> PathBuf {
        self.root.join(session_id.as_str())
    }

    /// Persist one clip for `session_id` and return its stored filename.
    ///
    /// `None` means the request carried no file at all; nothing is
    /// touched on disk in that case. Zero-length clips are stored.
    pub async fn store_upload(
        &self,
        session_id: &SessionId,
        clip: Option<Clip>,
    ) -> Result<String, StoreError> {
        let clip = clip.ok_or(StoreError::NoFileReceived)?;

        // create_dir_all treats an existing dir as success, so racing
        // first uploads to a new session are fine
        let dir = self.session_dir(session_id);
        fs::create_dir_all(&dir).await?;

        let name = filename::generate(clip.original_filename.as_deref(), &self.default_extension);
        let path = dir.join(&name);

        // create_new: never clobber an existing clip
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(&clip.bytes).await?;
        file.flush().await?;

        tracing::info!(
            session_id = %session_id,
            filename = %name,
            bytes = clip.bytes.len(),
            "Saved file for session"
        );

        Ok(name)
    }

    /// List the files uploaded to a session.
    ///
    /// Unknown sessions and sessions without uploads both give an empty
    /// list. Order is whatever the filesystem enumerates.
    pub async fn list_files(&self, session_id: &SessionId) -> Result<Vec<UploadedFile>, StoreError> {
        let dir = self.session_dir(session_id);

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                // removed out of band between readdir and stat
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let mtime: DateTime<Utc> = metadata.modified()?.into();

            files.push(UploadedFile {
                path: format!("/uploads/{}/{}", session_id, name),
                name,
                mtime,
            });
        }

        tracing::debug!(session_id = %session_id, count = files.len(), "Listed session files");
        Ok(files)
    }

    /// Open a stored file by its session and filename segments.
    ///
    /// Both segments must name a single entry; traversal is rejected
    /// before the filesystem is consulted.
    pub async fn open_file(&self, session_id: &str, filename: &str) -> Result<StoredFile, StoreError> {
        validate_segment(session_id)?;
        validate_segment(filename)?;

        let path = self.root.join(session_id).join(filename);

        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(StoreError::NotFound);
        }

        let file = match File::open(&path).await {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(e) => return Err(e.into()),
        };

        Ok(StoredFile {
            file,
            len: metadata.len(),
            path,
        })
    }
}
