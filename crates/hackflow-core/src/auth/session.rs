use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Credential, UserProfile};
use crate::storage::{read_entry, KeyValueStore};

/// Storage key for the JSON-serialized user profile
pub const USER_KEY: &str = "user";

/// Storage key for the raw credential string
pub const TOKEN_KEY: &str = "token";

/// Why a persisted session could not be restored
#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("stored user is not valid JSON: {0}")]
    MalformedUser(#[from] serde_json::Error),

    #[error("stored session is incomplete (user present: {has_user}, token present: {has_token})")]
    Incomplete { has_user: bool, has_token: bool },
}

/// Parse the two persisted entries into a session record.
///
/// `Ok(None)` means nothing was stored. A record is only accepted when both
/// entries are present and the user parses.
pub fn parse_record(
    user_raw: Option<&str>,
    token_raw: Option<&str>,
) -> Result<Option<(UserProfile, Credential)>, RestoreError> {
    match (user_raw, token_raw) {
        (None, None) => Ok(None),
        (Some(user), Some(token)) => {
            let user: UserProfile = serde_json::from_str(user)?;
            Ok(Some((user, Credential::new(token))))
        }
        (user, token) => Err(RestoreError::Incomplete {
            has_user: user.is_some(),
            has_token: token.is_some(),
        }),
    }
}

/// Immutable copy of the session handed to readers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<UserProfile>,
    pub token: Option<Credential>,
    pub loading: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<UserProfile>,
    token: Option<Credential>,
    loading: bool,
}

/// Owner of the one session slot of this process.
///
/// Built once at startup with [`SessionStore::restore`] and shared as
/// `Arc<SessionStore>`. Anyone may read; only the auth flows mutate it.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Restore the session persisted in `storage`.
    ///
    /// A clean restore performs no writes. A corrupted or half-written record
    /// is discarded entirely: both keys are removed and the store starts
    /// logged out.
    pub fn restore(storage: Arc<dyn KeyValueStore>) -> Self {
        let user_raw = read_entry(storage.as_ref(), USER_KEY);
        let token_raw = read_entry(storage.as_ref(), TOKEN_KEY);

        let state = match parse_record(user_raw.as_deref(), token_raw.as_deref()) {
            Ok(Some((user, token))) => {
                info!(username = %user.username, "Session restored");
                SessionState {
                    user: Some(user),
                    token: Some(token),
                    loading: false,
                }
            }
            Ok(None) => {
                debug!("No stored session");
                SessionState::default()
            }
            Err(e) => {
                warn!(error = %e, "Discarding corrupted stored session");
                Self::purge(storage.as_ref());
                SessionState::default()
            }
        };

        Self {
            storage,
            state: RwLock::new(state),
        }
    }

    fn purge(storage: &dyn KeyValueStore) {
        storage.remove(USER_KEY);
        storage.remove(TOKEN_KEY);
    }

    // A poisoned lock still holds a consistent state: every write replaces
    // user and token together before releasing it.
    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read_state();
        SessionSnapshot {
            user: state.user.clone(),
            token: state.token.clone(),
            loading: state.loading,
        }
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read_state().user.clone()
    }

    pub fn token(&self) -> Option<Credential> {
        self.read_state().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state().token.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().loading
    }

    // =========================================================================
    // Mutation (auth flows only)
    // =========================================================================

    /// Start a session and persist it
    pub(crate) fn login(&self, user: UserProfile, token: Credential) {
        let mut state = self.write_state();
        match serde_json::to_string(&user) {
            Ok(serialized) => {
                self.storage.set(USER_KEY, &serialized);
                self.storage.set(TOKEN_KEY, token.as_str());
            }
            Err(e) => {
                warn!(error = %e, "Failed to serialize user, session kept in memory only");
                Self::purge(self.storage.as_ref());
            }
        }
        info!(username = %user.username, "Logged in");
        state.user = Some(user);
        state.token = Some(token);
    }

    /// End the session and remove it from storage. Safe to call repeatedly.
    pub(crate) fn logout(&self) {
        let mut state = self.write_state();
        if state.token.is_some() {
            info!("Logged out");
        }
        state.user = None;
        state.token = None;
        Self::purge(self.storage.as_ref());
    }

    /// Mark a submission as in flight. `None` if one already is.
    pub(crate) fn try_begin_loading(&self) -> Option<LoadingGuard<'_>> {
        let mut state = self.write_state();
        if state.loading {
            return None;
        }
        state.loading = true;
        Some(LoadingGuard { store: self })
    }
}

/// Clears the `loading` flag when dropped, including when a submission
/// future is dropped before completing.
pub(crate) struct LoadingGuard<'a> {
    store: &'a SessionStore,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.write_state().loading = false;
    }
}
