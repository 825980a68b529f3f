//! Login, registration and third-party sign-in flows.
//!
//! Each form owns one `AuthFlowController`. A submission moves the flow
//! `Idle -> Submitting -> Succeeded | Failed`. On success the controller
//! updates the session first and only then schedules the confirmation
//! redirect, so a guard evaluated after the redirect always sees the new
//! session.
//!
//! The redirect runs on a spawned task held in a [`ScheduledNavigation`].
//! Dropping the controller (the form went away) aborts it.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{AuthError, AuthService};
use crate::models::{AuthSuccess, LoginRequest, RegisterRequest, ThirdPartyRequest};
use crate::routes::{Navigator, Route};

use super::SessionStore;

// ============================================================================
// Constants
// ============================================================================

/// Time the login confirmation stays visible before going home
pub const DEFAULT_LOGIN_REDIRECT_MS: u64 = 3000;

/// Time the registration confirmation stays visible before going to login
pub const DEFAULT_REGISTER_REDIRECT_MS: u64 = 2000;

const LOGIN_SUCCESS_MESSAGE: &str = "Login successful! Redirecting...";
const REGISTER_SUCCESS_MESSAGE: &str = "Account created successfully! Please login.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectDelays {
    pub login: Duration,
    pub register: Duration,
}

impl Default for RedirectDelays {
    fn default() -> Self {
        Self {
            login: Duration::from_millis(DEFAULT_LOGIN_REDIRECT_MS),
            register: Duration::from_millis(DEFAULT_REGISTER_REDIRECT_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Login,
    Register,
    ThirdParty,
}

impl FlowKind {
    /// Shown when the server gives no message of its own
    pub fn fallback_error(&self) -> &'static str {
        match self {
            FlowKind::Login => "Invalid credentials",
            FlowKind::Register => "Registration failed. Try again.",
            FlowKind::ThirdParty => "Third-party sign-in failed. Try again.",
        }
    }

    fn missing_fields_error(&self) -> &'static str {
        match self {
            FlowKind::Login => "Email and password required",
            FlowKind::Register => "Username, email and password required",
            FlowKind::ThirdParty => "Missing third-party credential",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Submitting,
    Succeeded { message: String },
    Failed { message: String },
}

impl FlowState {
    /// Confirmation or error text to display, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            FlowState::Succeeded { message } | FlowState::Failed { message } => Some(message),
            FlowState::Idle | FlowState::Submitting => None,
        }
    }
}

/// Result of asking a flow to submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Another submission was already in flight; nothing happened
    Ignored,
    Finished(FlowState),
}

// ============================================================================
// Delayed navigation
// ============================================================================

/// A redirect that fires after a delay unless cancelled first.
///
/// Dropping it cancels it.
pub struct ScheduledNavigation {
    target: Route,
    handle: JoinHandle<()>,
}

impl ScheduledNavigation {
    /// Must be called from within a tokio runtime
    pub fn spawn(navigator: Arc<dyn Navigator>, target: Route, delay: Duration) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(to = target.path(), "Delayed redirect firing");
            navigator.redirect(target);
        });
        Self { target, handle }
    }

    pub fn target(&self) -> Route {
        self.target
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        // Drop does the work
    }
}

impl Drop for ScheduledNavigation {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!(to = self.target.path(), "Delayed redirect cancelled");
            self.handle.abort();
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

pub struct AuthFlowController<A: AuthService> {
    session: Arc<SessionStore>,
    service: Arc<A>,
    navigator: Arc<dyn Navigator>,
    delays: RedirectDelays,
    state: FlowState,
    pending: Option<ScheduledNavigation>,
}

impl<A: AuthService> AuthFlowController<A> {
    pub fn new(
        session: Arc<SessionStore>,
        service: Arc<A>,
        navigator: Arc<dyn Navigator>,
        delays: RedirectDelays,
    ) -> Self {
        Self {
            session,
            service,
            navigator,
            delays,
            state: FlowState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Where the pending redirect will go, if one is still waiting
    pub fn pending_navigation(&self) -> Option<Route> {
        self.pending
            .as_ref()
            .filter(|nav| !nav.is_finished())
            .map(ScheduledNavigation::target)
    }

    /// Cancel the pending redirect. Call when the form is dismissed.
    ///
    /// Also clears a `Submitting` state left behind by a submission future
    /// that was dropped before it completed.
    pub fn teardown(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
        if self.state == FlowState::Submitting {
            debug!("Clearing abandoned submission");
            self.state = FlowState::Idle;
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Submission {
        let session = Arc::clone(&self.session);
        let Some(_loading) = session.try_begin_loading() else {
            debug!("Login ignored, a submission is already in flight");
            return Submission::Ignored;
        };

        self.begin();
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return self.reject_input(FlowKind::Login);
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let service = Arc::clone(&self.service);
        let result = service.login(&request).await;
        self.complete_sign_in(FlowKind::Login, result)
    }

    pub async fn third_party_login(&mut self, external_credential: &str) -> Submission {
        let session = Arc::clone(&self.session);
        let Some(_loading) = session.try_begin_loading() else {
            debug!("Third-party login ignored, a submission is already in flight");
            return Submission::Ignored;
        };

        self.begin();
        let external_credential = external_credential.trim();
        if external_credential.is_empty() {
            return self.reject_input(FlowKind::ThirdParty);
        }

        let request = ThirdPartyRequest {
            token: external_credential.to_string(),
        };
        let service = Arc::clone(&self.service);
        let result = service.exchange_third_party(&request).await;
        self.complete_sign_in(FlowKind::ThirdParty, result)
    }

    /// Create an account. On success the user is sent to the login screen;
    /// no session is started.
    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> Submission {
        let session = Arc::clone(&self.session);
        let Some(_loading) = session.try_begin_loading() else {
            debug!("Registration ignored, a submission is already in flight");
            return Submission::Ignored;
        };

        self.begin();
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return self.reject_input(FlowKind::Register);
        }

        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let service = Arc::clone(&self.service);
        match service.register(&request).await {
            Ok(created) => {
                info!(username = %created.username, "Account created");
                self.schedule(Route::Login, self.delays.register);
                self.finish(FlowState::Succeeded {
                    message: REGISTER_SUCCESS_MESSAGE.to_string(),
                })
            }
            Err(e) => self.fail(FlowKind::Register, e),
        }
    }

    /// End the session and go to the login screen
    pub fn logout(&mut self) {
        self.teardown();
        self.session.logout();
        self.state = FlowState::Idle;
        self.navigator.navigate(Route::Login);
    }

    fn begin(&mut self) {
        self.teardown();
        self.state = FlowState::Submitting;
    }

    fn complete_sign_in(&mut self, kind: FlowKind, result: Result<AuthSuccess, AuthError>) -> Submission {
        match result {
            Ok(success) if success.access_token.is_empty() => {
                self.fail(kind, AuthError::InvalidResponse("empty access token".to_string()))
            }
            Ok(success) => {
                self.session.login(success.user, success.access_token);
                self.schedule(Route::Home, self.delays.login);
                self.finish(FlowState::Succeeded {
                    message: LOGIN_SUCCESS_MESSAGE.to_string(),
                })
            }
            Err(e) => self.fail(kind, e),
        }
    }

    fn fail(&mut self, kind: FlowKind, error: AuthError) -> Submission {
        warn!(error = %error, flow = ?kind, "Authentication failed");
        self.finish(FlowState::Failed {
            message: error.user_message(kind.fallback_error()),
        })
    }

    fn reject_input(&mut self, kind: FlowKind) -> Submission {
        self.finish(FlowState::Failed {
            message: kind.missing_fields_error().to_string(),
        })
    }

    fn schedule(&mut self, target: Route, delay: Duration) {
        self.pending = Some(ScheduledNavigation::spawn(
            Arc::clone(&self.navigator),
            target,
            delay,
        ));
    }

    fn finish(&mut self, state: FlowState) -> Submission {
        self.state = state.clone();
        Submission::Finished(state)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use tokio::sync::Semaphore;

    use super::*;
    use crate::models::{Credential, UserProfile};
    use crate::storage::{KeyValueStore, MemoryStore};
    use crate::auth::{TOKEN_KEY, USER_KEY};

    // -------------------------------------------------------------------------
    // Test doubles
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct ScriptedService {
        sign_in: Mutex<VecDeque<Result<AuthSuccess, AuthError>>>,
        register: Mutex<VecDeque<Result<UserProfile, AuthError>>>,
        calls: Mutex<Vec<String>>,
        gate: Option<Arc<Semaphore>>,
    }

    impl ScriptedService {
        fn signing_in(result: Result<AuthSuccess, AuthError>) -> Self {
            let service = Self::default();
            service.sign_in.lock().unwrap().push_back(result);
            service
        }

        fn registering(result: Result<UserProfile, AuthError>) -> Self {
            let service = Self::default();
            service.register.lock().unwrap().push_back(result);
            service
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        async fn wait_for_gate(&self) {
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await;
            }
        }

        fn next_sign_in(&self) -> Result<AuthSuccess, AuthError> {
            self.sign_in
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AuthError::InvalidResponse("unscripted call".to_string())))
        }
    }

    impl AuthService for ScriptedService {
        async fn login(&self, request: &LoginRequest) -> Result<AuthSuccess, AuthError> {
            self.calls.lock().unwrap().push(format!("login:{}", request.email));
            self.wait_for_gate().await;
            self.next_sign_in()
        }

        async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, AuthError> {
            self.calls.lock().unwrap().push(format!("register:{}", request.username));
            self.wait_for_gate().await;
            self.register
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AuthError::InvalidResponse("unscripted call".to_string())))
        }

        async fn exchange_third_party(&self, request: &ThirdPartyRequest) -> Result<AuthSuccess, AuthError> {
            self.calls.lock().unwrap().push(format!("third_party:{}", request.token));
            self.wait_for_gate().await;
            self.next_sign_in()
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Nav {
        Navigate(Route),
        Redirect(Route),
    }

    #[derive(Default)]
    struct RecordingNavigator {
        events: Mutex<Vec<Nav>>,
    }

    impl RecordingNavigator {
        fn events(&self) -> Vec<Nav> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, to: Route) {
            self.events.lock().unwrap().push(Nav::Navigate(to));
        }

        fn redirect(&self, to: Route) {
            self.events.lock().unwrap().push(Nav::Redirect(to));
        }
    }

    struct Harness {
        storage: Arc<MemoryStore>,
        session: Arc<SessionStore>,
        navigator: Arc<RecordingNavigator>,
        service: Arc<ScriptedService>,
    }

    impl Harness {
        fn new(service: ScriptedService) -> Self {
            let storage = Arc::new(MemoryStore::new());
            let session = Arc::new(SessionStore::restore(storage.clone()));
            Self {
                storage,
                session,
                navigator: Arc::new(RecordingNavigator::default()),
                service: Arc::new(service),
            }
        }

        fn controller(&self) -> AuthFlowController<ScriptedService> {
            AuthFlowController::new(
                Arc::clone(&self.session),
                Arc::clone(&self.service),
                self.navigator.clone(),
                RedirectDelays::default(),
            )
        }
    }

    fn alice_success(token: &str) -> Result<AuthSuccess, AuthError> {
        Ok(AuthSuccess {
            user: UserProfile::new("alice").with_email("alice@example.com"),
            access_token: Credential::new(token),
        })
    }

    fn rejected(message: Option<&str>) -> AuthError {
        AuthError::Rejected {
            status: 401,
            message: message.map(str::to_string),
        }
    }

    async fn wait_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    // -------------------------------------------------------------------------
    // Login
    // -------------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_login_success_updates_session_then_redirects_after_delay() {
        let h = Harness::new(ScriptedService::signing_in(alice_success("tok-123")));
        let mut flow = h.controller();

        let outcome = flow.login("alice@example.com", "pw").await;

        assert_eq!(
            outcome,
            Submission::Finished(FlowState::Succeeded {
                message: LOGIN_SUCCESS_MESSAGE.to_string()
            })
        );
        assert_eq!(h.session.token(), Some(Credential::new("tok-123")));
        assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("tok-123"));
        assert!(!h.session.is_loading());
        assert_eq!(flow.pending_navigation(), Some(Route::Home));
        assert_eq!(h.service.calls(), vec!["login:alice@example.com".to_string()]);

        // Confirmation is still on screen just before the delay elapses
        wait_ms(DEFAULT_LOGIN_REDIRECT_MS - 1).await;
        assert!(h.navigator.events().is_empty());

        wait_ms(2).await;
        assert_eq!(h.navigator.events(), vec![Nav::Redirect(Route::Home)]);
        assert_eq!(flow.pending_navigation(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_failure_uses_server_message() {
        let h = Harness::new(ScriptedService::signing_in(Err(rejected(Some("Invalid credentials")))));
        let mut flow = h.controller();
        let before = h.session.snapshot();

        let outcome = flow.login("alice@example.com", "wrong").await;

        assert_eq!(
            outcome,
            Submission::Finished(FlowState::Failed {
                message: "Invalid credentials".to_string()
            })
        );
        assert_eq!(h.session.snapshot(), before);
        assert!(h.storage.is_empty());
        assert_eq!(flow.pending_navigation(), None);

        wait_ms(10_000).await;
        assert!(h.navigator.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_failure_custom_and_fallback_messages() {
        let service = ScriptedService::default();
        service.sign_in.lock().unwrap().push_back(Err(rejected(Some("Account locked"))));
        service.sign_in.lock().unwrap().push_back(Err(rejected(None)));
        let h = Harness::new(service);
        let mut flow = h.controller();

        flow.login("alice@example.com", "pw").await;
        assert_eq!(flow.state().message(), Some("Account locked"));

        flow.login("alice@example.com", "pw").await;
        assert_eq!(flow.state().message(), Some("Invalid credentials"));
        assert!(!h.session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_validation_skips_service() {
        let h = Harness::new(ScriptedService::signing_in(alice_success("tok-123")));
        let mut flow = h.controller();

        let outcome = flow.login("   ", "pw").await;
        assert_eq!(
            outcome,
            Submission::Finished(FlowState::Failed {
                message: "Email and password required".to_string()
            })
        );

        flow.login("alice@example.com", "").await;
        assert_eq!(flow.state().message(), Some("Email and password required"));

        assert!(h.service.calls().is_empty());
        assert!(!h.session.is_authenticated());
        assert!(!h.session.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_access_token_is_a_failure() {
        let h = Harness::new(ScriptedService::signing_in(alice_success("")));
        let mut flow = h.controller();

        flow.login("alice@example.com", "pw").await;

        assert_eq!(flow.state().message(), Some("Invalid credentials"));
        assert!(!h.session.is_authenticated());
        assert!(h.storage.is_empty());
    }

    // -------------------------------------------------------------------------
    // Third-party sign-in
    // -------------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_third_party_success_converges_with_login() {
        let h = Harness::new(ScriptedService::signing_in(alice_success("tok-google")));
        let mut flow = h.controller();

        let outcome = flow.third_party_login("external-id-token").await;

        assert!(matches!(outcome, Submission::Finished(FlowState::Succeeded { .. })));
        assert_eq!(h.session.token(), Some(Credential::new("tok-google")));
        assert_eq!(h.session.user().map(|u| u.username), Some("alice".to_string()));
        assert_eq!(h.service.calls(), vec!["third_party:external-id-token".to_string()]);

        wait_ms(DEFAULT_LOGIN_REDIRECT_MS + 1).await;
        assert_eq!(h.navigator.events(), vec![Nav::Redirect(Route::Home)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_third_party_failure_fallback() {
        let h = Harness::new(ScriptedService::signing_in(Err(rejected(None))));
        let mut flow = h.controller();

        flow.third_party_login("external-id-token").await;

        assert_eq!(flow.state().message(), Some("Third-party sign-in failed. Try again."));
        assert!(!h.session.is_authenticated());

        flow.third_party_login("  ").await;
        assert_eq!(flow.state().message(), Some("Missing third-party credential"));
        assert_eq!(h.service.calls().len(), 1);
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_register_success_redirects_to_login_without_session() {
        let h = Harness::new(ScriptedService::registering(Ok(UserProfile::new("bob"))));
        let mut flow = h.controller();

        let outcome = flow.register("bob", "bob@example.com", "pw").await;

        assert_eq!(
            outcome,
            Submission::Finished(FlowState::Succeeded {
                message: REGISTER_SUCCESS_MESSAGE.to_string()
            })
        );
        assert!(!h.session.is_authenticated());
        assert!(h.storage.is_empty());
        assert_eq!(flow.pending_navigation(), Some(Route::Login));

        wait_ms(DEFAULT_REGISTER_REDIRECT_MS - 1).await;
        assert!(h.navigator.events().is_empty());
        wait_ms(2).await;
        assert_eq!(h.navigator.events(), vec![Nav::Redirect(Route::Login)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_failure() {
        let h = Harness::new(ScriptedService::registering(Err(rejected(None))));
        let mut flow = h.controller();

        flow.register("bob", "bob@example.com", "pw").await;
        assert_eq!(flow.state().message(), Some("Registration failed. Try again."));

        flow.register("", "bob@example.com", "pw").await;
        assert_eq!(flow.state().message(), Some("Username, email and password required"));
        assert_eq!(h.service.calls(), vec!["register:bob".to_string()]);
    }

    // -------------------------------------------------------------------------
    // Concurrency and cancellation
    // -------------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_second_submission_while_in_flight_is_ignored() {
        let gate = Arc::new(Semaphore::new(0));
        let mut service = ScriptedService::signing_in(alice_success("tok-123"));
        service.gate = Some(Arc::clone(&gate));
        let h = Harness::new(service);

        let mut first = h.controller();
        let mut second = h.controller();

        let in_flight = tokio::spawn(async move {
            let outcome = first.login("alice@example.com", "pw").await;
            (first, outcome)
        });
        while !h.session.is_loading() {
            tokio::task::yield_now().await;
        }

        assert_eq!(second.login("alice@example.com", "pw").await, Submission::Ignored);
        assert_eq!(second.register("bob", "bob@example.com", "pw").await, Submission::Ignored);
        assert_eq!(*second.state(), FlowState::Idle);

        gate.add_permits(1);
        let (first, outcome) = in_flight.await.expect("submission task should complete");

        assert!(matches!(outcome, Submission::Finished(FlowState::Succeeded { .. })));
        assert_eq!(h.service.calls().len(), 1);
        assert!(!h.session.is_loading());
        drop(first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_controller_cancels_redirect() {
        let h = Harness::new(ScriptedService::signing_in(alice_success("tok-123")));
        let mut flow = h.controller();
        flow.login("alice@example.com", "pw").await;

        drop(flow);
        wait_ms(DEFAULT_LOGIN_REDIRECT_MS * 2).await;

        assert!(h.navigator.events().is_empty());
        // The session itself is kept
        assert!(h.session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_redirect() {
        let h = Harness::new(ScriptedService::registering(Ok(UserProfile::new("bob"))));
        let mut flow = h.controller();
        flow.register("bob", "bob@example.com", "pw").await;

        flow.teardown();
        assert_eq!(flow.pending_navigation(), None);
        wait_ms(DEFAULT_REGISTER_REDIRECT_MS * 2).await;
        assert!(h.navigator.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_submission_replaces_pending_redirect() {
        let service = ScriptedService::registering(Ok(UserProfile::new("alice")));
        service.sign_in.lock().unwrap().push_back(alice_success("tok-123"));
        let h = Harness::new(service);
        let mut flow = h.controller();

        flow.register("alice", "alice@example.com", "pw").await;
        assert_eq!(flow.pending_navigation(), Some(Route::Login));

        flow.login("alice@example.com", "pw").await;
        assert_eq!(flow.pending_navigation(), Some(Route::Home));

        wait_ms(DEFAULT_LOGIN_REDIRECT_MS * 2).await;
        assert_eq!(h.navigator.events(), vec![Nav::Redirect(Route::Home)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_input_cancels_pending_redirect() {
        let h = Harness::new(ScriptedService::registering(Ok(UserProfile::new("bob"))));
        let mut flow = h.controller();

        flow.register("bob", "bob@example.com", "pw").await;
        assert_eq!(flow.pending_navigation(), Some(Route::Login));

        let outcome = flow.login("", "").await;
        assert_eq!(
            outcome,
            Submission::Finished(FlowState::Failed {
                message: "Email and password required".to_string()
            })
        );
        assert_eq!(flow.pending_navigation(), None);

        // An error on screen is never followed by a redirect
        wait_ms(DEFAULT_REGISTER_REDIRECT_MS * 3).await;
        assert!(h.navigator.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_submission_recovers() {
        let gate = Arc::new(Semaphore::new(0));
        let mut service = ScriptedService::signing_in(alice_success("tok-123"));
        service.gate = Some(Arc::clone(&gate));
        let h = Harness::new(service);
        let mut flow = h.controller();

        let abandoned = tokio::time::timeout(
            Duration::from_millis(50),
            flow.login("alice@example.com", "pw"),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(*flow.state(), FlowState::Submitting);
        assert!(!h.session.is_loading());
        assert!(!h.session.is_authenticated());

        flow.teardown();
        assert_eq!(*flow.state(), FlowState::Idle);

        // The controller stays usable
        gate.add_permits(1);
        let outcome = flow.login("alice@example.com", "pw").await;
        assert!(matches!(outcome, Submission::Finished(FlowState::Succeeded { .. })));
        assert_eq!(h.session.token(), Some(Credential::new("tok-123")));
        assert_eq!(h.service.calls().len(), 2);
    }

    // -------------------------------------------------------------------------
    // Logout
    // -------------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_logout_clears_session_and_navigates_to_login() {
        let h = Harness::new(ScriptedService::signing_in(alice_success("tok-123")));
        let mut flow = h.controller();
        flow.login("alice@example.com", "pw").await;

        flow.logout();

        assert!(!h.session.is_authenticated());
        assert_eq!(h.session.user(), None);
        assert_eq!(h.storage.get(USER_KEY), None);
        assert_eq!(h.storage.get(TOKEN_KEY), None);
        assert_eq!(*flow.state(), FlowState::Idle);

        // The pending redirect home was cancelled
        wait_ms(DEFAULT_LOGIN_REDIRECT_MS * 2).await;
        assert_eq!(h.navigator.events(), vec![Nav::Navigate(Route::Login)]);

        flow.logout();
        assert!(!h.session.is_authenticated());
    }
}
