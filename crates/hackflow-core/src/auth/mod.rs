//! Authentication module for the session slot and the flows that change it.
//!
//! This module provides:
//! - `SessionStore`: the single session of this process, restored from
//!   durable storage at startup and mutated only by login/logout
//! - `AuthFlowController`: login, registration and third-party sign-in
//!   submissions, with delayed, cancellable redirects on success
//!
//! A corrupted stored session is discarded as a whole; the store never
//! holds a token without a user or a user without a token.

pub mod flow;
pub mod session;

pub use flow::{AuthFlowController, FlowKind, FlowState, RedirectDelays, ScheduledNavigation, Submission};
pub use session::{parse_record, RestoreError, SessionSnapshot, SessionStore, TOKEN_KEY, USER_KEY};
