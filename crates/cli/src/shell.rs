//! Terminal view for the mutation protocol.

use shopdeck_client::{Notification, Shell};

/// Prints notifications and navigation to the terminal.
#[derive(Debug, Default)]
pub struct TerminalShell;

impl Shell for TerminalShell {
    fn refresh(&self) {
        tracing::debug!("View refreshed");
    }

    #[allow(clippy::print_stdout)]
    fn navigate(&self, path: &str) {
        println!("-> {path}");
    }

    #[allow(clippy::print_stdout, clippy::print_stderr)]
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success(message) => println!("{message}"),
            Notification::Error(message) => eprintln!("error: {message}"),
        }
    }
}
