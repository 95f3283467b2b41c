use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::utils::security::{validate_segment, ValidationError};

/// Opaque session identifier.
///
/// Sessions have no record of their own; the id is just the name of the
/// directory that uploads land in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Fresh random id (uuid v4, 122 random bits)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a caller supplied id.
    ///
    /// Ids are not checked against previously created sessions, only
    /// against anything that would escape the upload root.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        validate_segment(raw)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response to a create-session request
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescriptor {
    pub session_id: String,
    pub participant_link: String,
    pub owner_link: String,
}

impl SessionDescriptor {
    /// Build both links from `origin`, e.g. `http://example.com`
    pub fn new(session_id: &SessionId, origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            session_id: session_id.to_string(),
            participant_link: format!("{}/?id={}", origin, session_id),
            owner_link: format!("{}/owner.html?id={}", origin, session_id),
        }
    }
}
