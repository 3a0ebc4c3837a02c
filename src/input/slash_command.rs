//! Slash command definitions and parsing.
//!
//! Lines starting with `/` are commands for the terminal front end; anything
//! else is sent to the tutor as a chat message.

use std::fmt;

/// Commands available at the chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    /// Sign in with a bearer token.
    /// Primary: /login <token>
    Login { token: String },

    /// Drop the current sign-in.
    /// Primary: /logout
    Logout,

    /// Re-fetch and show the active problem.
    /// Primary: /problem
    Problem,

    /// Expand and reprint the conversation.
    /// Primary: /history
    /// Aliases: /show
    History,

    /// Collapse the conversation.
    /// Primary: /hide
    Hide,

    /// Primary: /help
    /// Aliases: /?
    Help,

    /// Primary: /quit
    /// Aliases: /exit
    Quit,
}

/// Why a `/` line could not be turned into a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(name) => {
                write!(f, "Unknown command /{} (try /help)", name)
            }
            CommandError::MissingArgument { command, argument } => {
                write!(f, "Usage: {} <{}>", command, argument)
            }
        }
    }
}

impl std::error::Error for CommandError {}

impl SlashCommand {
    /// Commands in the order `/help` lists them.
    pub fn all() -> Vec<Self> {
        vec![
            SlashCommand::Login {
                token: String::new(),
            },
            SlashCommand::Logout,
            SlashCommand::Problem,
            SlashCommand::History,
            SlashCommand::Hide,
            SlashCommand::Help,
            SlashCommand::Quit,
        ]
    }

    /// Parse one input line.
    ///
    /// Returns `Ok(None)` for ordinary chat text.
    ///
    /// # Examples
    ///
    /// ```
    /// use tutorchat::input::slash_command::SlashCommand;
    ///
    /// assert_eq!(SlashCommand::parse("/quit"), Ok(Some(SlashCommand::Quit)));
    /// assert_eq!(SlashCommand::parse("hello"), Ok(None));
    /// assert!(SlashCommand::parse("/nope").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Ok(None);
        };

        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default().to_lowercase();
        let argument = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

        let command = match name.as_str() {
            "login" => match argument {
                Some(token) => SlashCommand::Login {
                    token: token.to_string(),
                },
                None => {
                    return Err(CommandError::MissingArgument {
                        command: "/login",
                        argument: "token",
                    })
                }
            },
            "logout" => SlashCommand::Logout,
            "problem" => SlashCommand::Problem,
            "history" | "show" => SlashCommand::History,
            "hide" => SlashCommand::Hide,
            "help" | "?" => SlashCommand::Help,
            "quit" | "exit" => SlashCommand::Quit,
            _ => return Err(CommandError::Unknown(name)),
        };
        Ok(Some(command))
    }

    /// Primary name, with the leading `/`.
    pub fn name(&self) -> &'static str {
        match self {
            SlashCommand::Login { .. } => "/login",
            SlashCommand::Logout => "/logout",
            SlashCommand::Problem => "/problem",
            SlashCommand::History => "/history",
            SlashCommand::Hide => "/hide",
            SlashCommand::Help => "/help",
            SlashCommand::Quit => "/quit",
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            SlashCommand::Login { .. } => "/login <token>",
            other => other.name(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SlashCommand::Login { .. } => "Sign in with an access token",
            SlashCommand::Logout => "Sign out",
            SlashCommand::Problem => "Reload the current problem",
            SlashCommand::History => "Show the conversation",
            SlashCommand::Hide => "Hide the conversation",
            SlashCommand::Help => "Show this help",
            SlashCommand::Quit => "Exit",
        }
    }

    /// Help text listing every command.
    pub fn help_text() -> String {
        Self::all()
            .iter()
            .map(|cmd| format!("  {:<16} {}", cmd.usage(), cmd.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
