//! HackFlow core - the client session state and everything that reads or changes it.
//!
//! - `storage`: durable key-value store the session is persisted in
//! - `auth`: the session store and the login/register/third-party flows
//! - `routes`: screens, and the guards deciding whether they may render
//! - `api`: HTTP client for the Authentication Service
//! - `models`: user profile, credential, request/response bodies
//! - `config`: user configuration and data directory

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod routes;
pub mod storage;

pub use api::{ApiClient, AuthError, AuthService};
pub use auth::{AuthFlowController, FlowState, SessionSnapshot, SessionStore, Submission};
pub use config::Config;
pub use routes::{resolve, GuardDecision, Navigator, Resolution, Route, RouteGuard};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
