use std::future::Future;

use crate::models::{AuthSuccess, LoginRequest, RegisterRequest, ThirdPartyRequest, UserProfile};

use super::AuthError;

/// The external Authentication Service as seen by the auth flows.
///
/// `ApiClient` talks to the real HTTP service; tests substitute a scripted
/// implementation.
pub trait AuthService: Send + Sync + 'static {
    /// Exchange email and password for a user and access token
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<AuthSuccess, AuthError>> + Send;

    /// Create an account. Does not start a session.
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<UserProfile, AuthError>> + Send;

    /// Exchange an external identity provider credential for a user and access token
    fn exchange_third_party(
        &self,
        request: &ThirdPartyRequest,
    ) -> impl Future<Output = Result<AuthSuccess, AuthError>> + Send;
}
