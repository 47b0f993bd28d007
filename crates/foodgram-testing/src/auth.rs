//! Mock auth helpers for integration tests.
//!
//! Services behind the gateway receive `x-foodgram-user-id` + `x-foodgram-user-role`
//! headers injected by the gateway. In tests, `MockAuth` produces these headers
//! directly so no real gateway is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum_test::TestRequest;
use uuid::Uuid;

use foodgram_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub user_role: u8,
}

impl MockAuth {
    pub fn new(user_id: Uuid, user_role: u8) -> Self {
        Self { user_id, user_role }
    }

    /// A regular user with a fresh id.
    pub fn user() -> Self {
        Self::new(Uuid::now_v7(), 0)
    }

    /// An admin with a fresh id.
    pub fn admin() -> Self {
        Self::new(Uuid::now_v7(), 1)
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_str(&self.user_role.to_string()).unwrap(),
        );
        map
    }

    /// Attach the identity headers to an `axum-test` request.
    pub fn authorize(&self, request: TestRequest) -> TestRequest {
        self.headers()
            .into_iter()
            .filter_map(|(name, value)| name.map(|name| (name, value)))
            .fold(request, |req, (name, value)| req.add_header(name, value))
    }
}
