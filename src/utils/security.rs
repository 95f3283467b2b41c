use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Path segment contains parent directory (..)")]
    ContainsParentDir,

    #[error("Path segment is absolute")]
    AbsolutePath,

    #[error("Path segment contains invalid component")]
    InvalidComponent,

    #[error("Path segment contains null byte")]
    NullByte,

    #[error("Path segment is empty")]
    Empty,

    #[error("Path segment contains directory separator")]
    ContainsDirectorySeparator,
}

//===============
// Path Handling
//===============

// Checks for: empty strings, null bytes, parent directory traversal, absolute paths
fn validate_path_components(path_str: &str) -> Result<(), ValidationError> {
    if path_str.is_empty() {
        return Err(ValidationError::Empty);
    }

    // null bytes
    // rust uses C-style APIs so \0 can end str early
    if path_str.contains('\0') {
        return Err(ValidationError::NullByte);
    }

    let path = Path::new(path_str);

    for component in path.components() {
        match component {
            Component::Normal(_) => continue,
            Component::ParentDir => return Err(ValidationError::ContainsParentDir),
            Component::RootDir => return Err(ValidationError::AbsolutePath),
            // a lone "." would resolve to the parent directory itself
            Component::CurDir => return Err(ValidationError::InvalidComponent),
            Component::Prefix(_) => return Err(ValidationError::InvalidComponent), // Windows
        }
    }

    Ok(())
}

/// Validate a single path segment taken from a request URL.
///
/// Session ids and stored filenames both end up as exactly one directory
/// entry under the upload root, so anything that could name a different
/// entry (separators, `..`, `.`, absolute paths) is rejected.
pub fn validate_segment(segment: &str) -> Result<(), ValidationError> {
    // separators first: "a/../b" should report the separator, not the traversal
    if segment.contains('/') || segment.contains('\\') {
        // still surface traversal attempts distinctly for logging
        if segment.split(['/', '\\']).any(|part| part == "..") {
            return Err(ValidationError::ContainsParentDir);
        }
        if segment.starts_with('/') {
            return Err(ValidationError::AbsolutePath);
        }
        return Err(ValidationError::ContainsDirectorySeparator);
    }

    validate_path_components(segment)
}
