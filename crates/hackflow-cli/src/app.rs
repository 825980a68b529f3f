//! Application state for the HackFlow terminal front-end.
//!
//! `App` wires the session store, the Authentication Service client and the
//! navigator together, renders the current page through the route guards,
//! and runs the auth forms.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use hackflow_core::auth::AuthFlowController;
use hackflow_core::{
    resolve, ApiClient, Config, FileStore, FlowState, Navigator, Resolution, Route, SessionStore,
    Submission,
};
use tracing::{debug, info, warn};

use crate::commands::{Command, HELP_TEXT};
use crate::nav::HistoryNavigator;
use crate::render;

/// Interval for checking whether a confirmation redirect has fired (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Quitting,
}

pub struct App {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: Arc<ApiClient>,
    pub navigator: Arc<HistoryNavigator>,
    pub state: AppState,

    /// Controller of the form on screen, with the route it belongs to.
    /// Replacing or dropping it cancels its pending redirect.
    flow: Option<(Route, AuthFlowController<ApiClient>)>,
}

impl App {
    pub fn new(config: Config, data_dir: PathBuf, start_path: &str) -> Result<Self> {
        let storage = Arc::new(FileStore::new(data_dir));
        let session = Arc::new(SessionStore::restore(storage));
        debug!(authenticated = session.is_authenticated(), "Session loaded");

        let api = Arc::new(ApiClient::new(config.api_base_url())?);
        info!(api = api.base_url(), "Authentication Service configured");

        Ok(Self {
            config,
            session,
            api,
            navigator: Arc::new(HistoryNavigator::new(start_path)),
            state: AppState::Running,
            flow: None,
        })
    }

    fn new_flow(&self) -> AuthFlowController<ApiClient> {
        AuthFlowController::new(
            Arc::clone(&self.session),
            Arc::clone(&self.api),
            self.navigator.clone(),
            self.config.redirect_delays(),
        )
    }

    /// Keep exactly one controller for the form on screen, none elsewhere
    fn sync_flow(&mut self, route: Option<Route>) {
        match route {
            Some(route @ (Route::Login | Route::Register)) => {
                if self.flow.as_ref().map(|(r, _)| *r) != Some(route) {
                    self.flow = Some((route, self.new_flow()));
                }
            }
            _ => self.flow = None,
        }
    }

    fn flow_state(&self) -> Option<&FlowState> {
        self.flow.as_ref().map(|(_, flow)| flow.state())
    }

    /// Form currently on screen, after applying guard redirects
    fn form_route(&mut self) -> Option<Route> {
        self.render_current();
        self.flow.as_ref().map(|(route, _)| *route)
    }

    /// Evaluate the guards for the current path and render the result.
    /// Redirects are applied to history before rendering.
    pub fn render_current(&mut self) -> String {
        loop {
            let path = self.navigator.current();
            let snapshot = self.session.snapshot();
            match resolve(&path, &snapshot) {
                Resolution::Render(route) => {
                    self.sync_flow(Some(route));
                    return render::page(route, &snapshot, self.flow_state());
                }
                Resolution::Redirect { to, replace } => {
                    debug!(from = %path, to = to.path(), "Guard redirect");
                    if replace {
                        self.navigator.redirect(to);
                    } else {
                        self.navigator.navigate(to);
                    }
                }
                Resolution::NotFound => {
                    self.sync_flow(None);
                    return render::not_found(&path, &snapshot);
                }
            }
        }
    }

    pub async fn handle(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Open(path) => self.navigator.open(&path),
            Command::Back => {
                if !self.navigator.back() {
                    println!("No previous page");
                }
            }
            Command::Login => self.submit_login().await?,
            Command::Google(credential) => self.submit_google(&credential).await,
            Command::Register => self.submit_register().await?,
            Command::Logout => {
                if self.session.is_authenticated() {
                    self.flow = None;
                    self.new_flow().logout();
                } else {
                    println!("Not logged in");
                }
            }
            Command::Whoami => self.print_session(),
            Command::Help => println!("{}", HELP_TEXT),
            Command::Quit => self.state = AppState::Quitting,
        }
        Ok(())
    }

    fn print_session(&self) {
        let snapshot = self.session.snapshot();
        match snapshot.user {
            Some(user) => println!(
                "Logged in as {} ({})",
                user.username,
                user.email.as_deref().unwrap_or("no email")
            ),
            None => println!("Not logged in"),
        }
        if snapshot.loading {
            println!("A submission is in progress");
        }
    }

    fn form_on_screen(&mut self, expected: Route) -> bool {
        if self.form_route() == Some(expected) {
            true
        } else {
            println!("Open {} first", expected.path());
            false
        }
    }

    async fn submit_login(&mut self) -> Result<()> {
        if !self.form_on_screen(Route::Login) {
            return Ok(());
        }

        let email = match self.config.default_email() {
            Some(last) => {
                let input = prompt(format!("Email [{}]: ", last)).await?.unwrap_or_default();
                if input.is_empty() { last } else { input }
            }
            None => prompt("Email: ".to_string()).await?.unwrap_or_default(),
        };
        let password = prompt_password().await?;

        println!("Logging in...");
        let outcome = match self.flow.as_mut() {
            Some((_, flow)) => flow.login(&email, &password).await,
            None => return Ok(()),
        };

        if matches!(outcome, Submission::Finished(FlowState::Succeeded { .. })) {
            self.config.last_email = Some(email);
            if let Err(e) = self.config.save() {
                warn!(error = %e, "Failed to save config");
            }
        }
        self.show_outcome(outcome).await;
        Ok(())
    }

    async fn submit_google(&mut self, credential: &str) {
        if !self.form_on_screen(Route::Login) {
            return;
        }
        println!("Signing in with Google...");
        let outcome = match self.flow.as_mut() {
            Some((_, flow)) => flow.third_party_login(credential).await,
            None => return,
        };
        self.show_outcome(outcome).await;
    }

    async fn submit_register(&mut self) -> Result<()> {
        if !self.form_on_screen(Route::Register) {
            return Ok(());
        }

        let username = prompt("Username: ".to_string()).await?.unwrap_or_default();
        let email = prompt("Email: ".to_string()).await?.unwrap_or_default();
        let password = prompt_password().await?;

        println!("Creating account...");
        let outcome = match self.flow.as_mut() {
            Some((_, flow)) => flow.register(&username, &email, &password).await,
            None => return Ok(()),
        };
        self.show_outcome(outcome).await;
        Ok(())
    }

    /// Print the form message and, after a success, keep it on screen until
    /// the confirmation redirect fires.
    async fn show_outcome(&mut self, outcome: Submission) {
        let state = match outcome {
            Submission::Ignored => {
                println!("Already submitting, please wait");
                return;
            }
            Submission::Finished(state) => state,
        };

        match &state {
            FlowState::Succeeded { message } => println!("✓ {}", message),
            FlowState::Failed { message } => println!("✗ {}", message),
            FlowState::Idle | FlowState::Submitting => {}
        }

        if matches!(state, FlowState::Succeeded { .. }) {
            while self.pending_redirect().is_some() {
                tokio::time::sleep(Duration::from_millis(EVENT_POLL_TIMEOUT_MS)).await;
            }
        }
    }

    fn pending_redirect(&self) -> Option<Route> {
        self.flow.as_ref().and_then(|(_, flow)| flow.pending_navigation())
    }
}

/// Read one line from stdin without blocking the runtime. `None` on end of input.
pub async fn prompt(label: String) -> Result<Option<String>> {
    tokio::task::spawn_blocking(move || -> Result<Option<String>> {
        print!("{}", label);
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim().to_string()))
    })
    .await?
}

async fn prompt_password() -> Result<String> {
    let password = tokio::task::spawn_blocking(|| rpassword::prompt_password("Password: ")).await??;
    Ok(password)
}
