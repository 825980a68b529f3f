//! Text rendering of the screens.
//!
//! Rendering only reads the session snapshot and the form's flow state.

use hackflow_core::{FlowState, Route, SessionSnapshot};

fn navbar(session: &SessionSnapshot) -> String {
    match (&session.user, session.is_authenticated()) {
        (Some(user), true) => format!(
            "HackFlow · 24H Hackathon        [{}] {}  |  /  /profile  |  logout",
            user.initial(),
            user.username
        ),
        _ => "HackFlow · 24H Hackathon        /login  |  /register".to_string(),
    }
}

fn form_status(flow: Option<&FlowState>, session: &SessionSnapshot, busy_label: &str) -> Option<String> {
    if session.loading {
        return Some(busy_label.to_string());
    }
    match flow? {
        FlowState::Succeeded { message } => Some(format!("✓ {}", message)),
        FlowState::Failed { message } => Some(format!("✗ {}", message)),
        FlowState::Idle | FlowState::Submitting => None,
    }
}

/// Render a screen the guards allowed
pub fn page(route: Route, session: &SessionSnapshot, flow: Option<&FlowState>) -> String {
    let mut lines = vec![navbar(session), String::new()];

    match route {
        Route::Home => {
            let name = session.user.as_ref().map(|u| u.username.as_str()).unwrap_or("hacker");
            lines.push(format!("Welcome back, {}!", name));
            lines.push("Projects, ideas, teams, schedule and prizes are coming soon.".to_string());
        }
        Route::Profile => match &session.user {
            Some(user) => {
                lines.push(format!("[{}]  {}", user.initial(), user.username));
                lines.push(format!("Email:         {}", user.email.as_deref().unwrap_or("-")));
                lines.push(format!(
                    "Member since:  {}",
                    user.member_since().unwrap_or_else(|| "-".to_string())
                ));
            }
            None => lines.push("User not logged in".to_string()),
        },
        Route::Login => {
            lines.push("Welcome back!".to_string());
            if let Some(status) = form_status(flow, session, "Logging in...") {
                lines.push(status);
            }
            lines.push("Type 'login' to sign in or 'google <credential>'. Not a member yet? /register".to_string());
        }
        Route::Register => {
            lines.push("Create account".to_string());
            if let Some(status) = form_status(flow, session, "Creating account...") {
                lines.push(status);
            }
            lines.push("Type 'register' to sign up. Already have an account? /login".to_string());
        }
    }

    lines.join("\n")
}

pub fn not_found(path: &str, session: &SessionSnapshot) -> String {
    format!("{}\n\nNothing at {}", navbar(session), path)
}
