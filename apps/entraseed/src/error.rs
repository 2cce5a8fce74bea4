//! CLI error types and exit codes.

use entraseed_graph::GraphError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl CliError {
    /// Exit code for the process. Every failure exits 1; success is the
    /// only zero.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Prints the error to stderr, with a follow-up hint when one exists.
    pub fn print(&self) {
        let plain = std::env::var("NO_COLOR").is_ok();
        let label = |color: &str, text: &str| {
            if plain {
                text.to_string()
            } else {
                format!("{color}{text}\x1b[0m")
            }
        };

        eprintln!("{} {self}", label("\x1b[31m", "Error:"));
        if let Some(hint) = self.suggestion() {
            eprintln!("\n{} {hint}", label("\x1b[33m", "Suggestion:"));
        }
    }

    /// A suggested next action, for errors where one is clear.
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Graph(GraphError::Auth(_)) => {
                Some("Check the tenant ID, client ID, and client secret.")
            }
            CliError::Graph(GraphError::Config(_)) => {
                Some("Check the connection flags passed to the command.")
            }
            _ => None,
        }
    }
}
