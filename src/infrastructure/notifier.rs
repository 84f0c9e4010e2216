//! Terminal notifications.

use colored::Colorize;

use crate::domain::{Notice, Notifier};

/// Prints each notice as one colored line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::Imported { .. } | Notice::Exported { .. } => {
                println!("{} {notice}", "✓".green());
            }
            Notice::NothingFound { .. } | Notice::SourceUnavailable { .. } => {
                println!("{} {notice}", "ℹ".yellow());
            }
            Notice::Failed { .. } => {
                eprintln!("{} {}", "✗".red(), notice.to_string().red());
            }
        }
    }
}
