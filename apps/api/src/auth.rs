// =============================================================================
// Caller Identity Extraction
// =============================================================================
//
// Authentication lives upstream: a session service verifies the user and the
// reverse proxy forwards the verified identity as two headers:
//
//   x-caller-id:    profile id (UUID)
//   x-caller-role:  guest | member | admin
//
// This extractor only parses those headers. Requests without them become a
// guest identity, which every mutating engine method rejects with Forbidden.
// A role header the proxy would never send is a 400, not a guest downgrade.
//
// =============================================================================

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use parlor_core::{Identity, Role};

use crate::error::ApiError;

pub const CALLER_ID_HEADER: &str = "x-caller-id";
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";

/// The verified caller, extracted from forwarded identity headers.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let role = match header_str(parts, CALLER_ROLE_HEADER) {
            None | Some("") | Some("guest") => Role::Guest,
            Some("member") => Role::Member,
            Some("admin") => Role::Admin,
            Some(other) => {
                return Err(ApiError::validation(format!(
                    "unknown {CALLER_ROLE_HEADER}: {other}"
                )));
            }
        };

        let id = header_str(parts, CALLER_ID_HEADER).unwrap_or("").to_string();
        if id.is_empty() && role != Role::Guest {
            return Err(ApiError::validation(format!(
                "{CALLER_ID_HEADER} is required for {CALLER_ROLE_HEADER} {role:?}"
            )));
        }

        Ok(Caller(Identity::new(id, role)))
    }
}
