//! Data models shared by the session store, the API client and the front-end.
//!
//! - `UserProfile`, `Credential`: what a logged-in session holds
//! - `LoginRequest`, `RegisterRequest`, `ThirdPartyRequest`, `AuthSuccess`:
//!   Authentication Service request and response bodies

pub mod auth;
pub mod user;

pub use auth::{AuthSuccess, LoginRequest, RegisterRequest, ThirdPartyRequest};
pub use user::{Credential, UserProfile};
