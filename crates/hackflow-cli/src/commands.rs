//! Parsing of prompt input into commands.

use anyhow::{anyhow, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Back,
    Login,
    Register,
    Google(String),
    Logout,
    Whoami,
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  open <path>          go to a page (/, /profile, /login, /register)
  back                 previous page
  login                log in with email and password (login page)
  google <credential>  log in with a Google ID token (login page)
  register             create an account (sign-up page)
  logout               end the session
  whoami               show the current session
  help                 this text
  quit                 exit";

impl Command {
    /// Parse one input line. A bare path such as `/profile` means `open /profile`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.starts_with('/') {
            return Ok(Command::Open(input.to_string()));
        }

        let (name, arg) = match input.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (input, ""),
        };

        match (name.to_lowercase().as_str(), arg) {
            ("open" | "go", "") => Err(anyhow!("Usage: open <path>")),
            ("open" | "go", path) => Ok(Command::Open(path.to_string())),
            ("back", _) => Ok(Command::Back),
            ("login", _) => Ok(Command::Login),
            ("register" | "signup", _) => Ok(Command::Register),
            ("google", "") => Err(anyhow!("Usage: google <credential>")),
            ("google", credential) => Ok(Command::Google(credential.to_string())),
            ("logout", _) => Ok(Command::Logout),
            ("whoami" | "status", _) => Ok(Command::Whoami),
            ("help" | "?", _) => Ok(Command::Help),
            ("quit" | "exit" | "q", _) => Ok(Command::Quit),
            ("", _) => Err(anyhow!("Type 'help' for commands")),
            (other, _) => Err(anyhow!("Unknown command '{}'. Type 'help' for commands", other)),
        }
    }
}
