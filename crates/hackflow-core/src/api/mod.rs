//! Authentication Service client module.
//!
//! This module provides the `AuthService` trait consumed by the auth flows
//! and `ApiClient`, its HTTP implementation. Requests and responses are JSON;
//! rejected requests are turned into `AuthError` with the server's message
//! when the error body carries one.

pub mod client;
pub mod error;
pub mod service;

pub use client::{ApiClient, DEFAULT_API_BASE_URL};
pub use error::AuthError;
pub use service::AuthService;
