//! Stored filename generation.
//!
//! Names are `<unix millis>_<uuid v4><.ext>`. The random part alone keeps
//! concurrent uploads to one session from colliding, no locking involved.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 16;

/// Extension (with leading dot) of the client's original filename.
///
/// Only the last path component is looked at, and only plain ascii
/// alphanumeric extensions are kept. Anything else yields `None`.
pub fn extension_of(original_filename: &str) -> Option<String> {
    // browsers on windows can send "C:\fakepath\clip.webm"
    let last = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_filename);

    let ext = Path::new(last).extension()?.to_str()?;

    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }

    Some(format!(".{}", ext))
}

/// Generate a fresh stored filename for an upload
pub fn generate(original_filename: Option<&str>, default_extension: &str) -> String {
    let ext = original_filename
        .and_then(extension_of)
        .unwrap_or_else(|| default_extension.to_string());

    format!("{}_{}{}", unix_millis(), Uuid::new_v4(), ext)
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0) // clock before 1970, random part still unique
}
