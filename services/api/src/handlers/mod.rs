pub mod ingredients;
pub mod recipes;
pub mod relations;
pub mod shopping_list;
pub mod tags;
pub mod users;

use axum::extract::FromRequest;
use serde::de::DeserializeOwned;

use foodgram_auth_types::identity::{IdentityHeaders, Viewer};

use crate::error::ApiError;

/// `Json` body extractor whose rejections render as `ApiError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Identity of the caller on endpoints that need one.
pub(crate) fn require_user(viewer: Viewer) -> Result<IdentityHeaders, ApiError> {
    viewer.identity().ok_or(ApiError::Unauthorized)
}

/// Parse a raw query string with `serde_qs` (so `tags[]=a&tags[]=b` yields a
/// list). A missing query string gives the default value.
pub(crate) fn parse_query<T>(raw_query: Option<String>) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    match raw_query.as_deref() {
        Some(raw) if !raw.is_empty() => serde_qs::from_str(raw).map_err(|e| {
            tracing::debug!(error = %e, "rejected query string");
            ApiError::InvalidQuery
        }),
        _ => Ok(T::default()),
    }
}

/// `1`/`true` and `0`/`false` query flags.
pub(crate) fn parse_flag(raw: Option<&str>) -> Result<bool, ApiError> {
    match raw {
        None => Ok(false),
        Some("1") | Some("true") => Ok(true),
        Some("0") | Some("false") => Ok(false),
        Some(_) => Err(ApiError::InvalidQuery),
    }
}
