//! Navigation targets and the guards that gate them.
//!
//! Guards are pure functions of a [`SessionSnapshot`]; the host calls
//! [`resolve`] on every navigation or render, nothing is cached.

use crate::auth::SessionSnapshot;

/// A screen reachable by path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Profile,
    Login,
    Register,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Home, Route::Profile, Route::Login, Route::Register];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Profile => "/profile",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Profile => "Profile",
            Route::Login => "Login",
            Route::Register => "Sign up",
        }
    }

    /// Match a path, ignoring query string, fragment and trailing slashes
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|route| route.path() == normalized)
    }

    pub fn guard(&self) -> RouteGuard {
        match self {
            Route::Home | Route::Profile => RouteGuard::Protected,
            Route::Login | Route::Register => RouteGuard::Public,
        }
    }
}

/// Outcome of a guard for one render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// `replace` means the blocked entry is not kept in history
    Redirect { to: Route, replace: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGuard {
    /// Only for logged-in users; others go to the login screen
    Protected,
    /// Only for logged-out users; others go to the home screen
    Public,
}

impl RouteGuard {
    pub fn decide(&self, session: &SessionSnapshot) -> GuardDecision {
        match (self, session.is_authenticated()) {
            (RouteGuard::Protected, true) | (RouteGuard::Public, false) => GuardDecision::Render,
            (RouteGuard::Protected, false) => GuardDecision::Redirect {
                to: Route::Login,
                replace: true,
            },
            (RouteGuard::Public, true) => GuardDecision::Redirect {
                to: Route::Home,
                replace: true,
            },
        }
    }
}

/// What the host should do for a requested path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect { to: Route, replace: bool },
    NotFound,
}

pub fn resolve(path: &str, session: &SessionSnapshot) -> Resolution {
    let Some(route) = Route::from_path(path) else {
        return Resolution::NotFound;
    };
    match route.guard().decide(session) {
        GuardDecision::Render => Resolution::Render(route),
        GuardDecision::Redirect { to, replace } => Resolution::Redirect { to, replace },
    }
}

/// Navigation primitives provided by the hosting view layer
pub trait Navigator: Send + Sync {
    /// Go to `to`, adding a history entry
    fn navigate(&self, to: Route);

    /// Go to `to`, replacing the current history entry
    fn redirect(&self, to: Route);
}
