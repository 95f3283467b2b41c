use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::HOST, request::Parts},
};
use std::convert::Infallible;

use super::state::AppState;

/// `scheme://host` of the current request, used to build session links.
///
/// The server itself only speaks plain http. Forwarded headers are only
/// honored when `trust_proxy` is set, otherwise any client could spoof them.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOrigin(pub String);

#[async_trait]
impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(origin_from_parts(parts, state.config.trust_proxy)))
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        // proxies may append: "https, http"
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub fn origin_from_parts(parts: &Parts, trust_proxy: bool) -> String {
    let forwarded = |name: &str| {
        if trust_proxy {
            header_value(parts, name)
        } else {
            None
        }
    };

    let scheme = forwarded("x-forwarded-proto").unwrap_or("http");
    let host = forwarded("x-forwarded-host")
        .or_else(|| header_value(parts, HOST.as_str()))
        .or_else(|| parts.uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    format!("{}://{}", scheme, host)
}
