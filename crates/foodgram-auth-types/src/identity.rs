//! Gateway-injected identity headers extractors.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use foodgram_domain::user::UserRole;

pub const USER_ID_HEADER: &str = "x-foodgram-user-id";
pub const USER_ROLE_HEADER: &str = "x-foodgram-user-role";

/// User identity injected by the gateway via `x-foodgram-user-id` and `x-foodgram-user-role` headers.
///
/// Returns 401 if either header is absent or cannot be parsed.
/// Ownership checks (403) are done by use cases after extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub user_role: u8,
}

impl IdentityHeaders {
    /// Role derived from the wire value; unknown values map to [`UserRole::Normal`].
    pub fn role(&self) -> UserRole {
        UserRole::from_u8(self.user_role).unwrap_or(UserRole::Normal)
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_admin()
    }
}

/// The caller of a read endpoint: either an authenticated user or anonymous.
///
/// Absent identity headers yield [`Viewer::Anonymous`]; headers that are
/// present but malformed are still rejected with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(IdentityHeaders),
}

impl Viewer {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Anonymous => None,
            Self::User(identity) => Some(identity.user_id),
        }
    }

    pub fn identity(&self) -> Option<IdentityHeaders> {
        match self {
            Self::Anonymous => None,
            Self::User(identity) => Some(*identity),
        }
    }
}

enum RawIdentity {
    Absent,
    Malformed,
    Present(IdentityHeaders),
}

fn read_identity(parts: &Parts) -> RawIdentity {
    let user_id = parts.headers.get(USER_ID_HEADER);
    let user_role = parts.headers.get(USER_ROLE_HEADER);
    if user_id.is_none() && user_role.is_none() {
        return RawIdentity::Absent;
    }

    let user_id = user_id
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<Uuid>().ok());
    let user_role = user_role
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u8>().ok());

    match (user_id, user_role) {
        (Some(user_id), Some(user_role)) => RawIdentity::Present(IdentityHeaders {
            user_id,
            user_role,
        }),
        _ => RawIdentity::Malformed,
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 declares this as `fn -> impl Future + Send`; reading the
    // headers synchronously keeps the returned future 'static.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = read_identity(parts);
        async move {
            match identity {
                RawIdentity::Present(identity) => Ok(identity),
                RawIdentity::Absent | RawIdentity::Malformed => Err(StatusCode::UNAUTHORIZED),
            }
        }
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = read_identity(parts);
        async move {
            match identity {
                RawIdentity::Absent => Ok(Self::Anonymous),
                RawIdentity::Present(identity) => Ok(Self::User(identity)),
                RawIdentity::Malformed => Err(StatusCode::UNAUTHORIZED),
            }
        }
    }
}
