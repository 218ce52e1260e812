//! Terminal status messages
//!
//! Status lines go to stderr so that data printed by `list` and `lookup` on stdout
//! stays scriptable. Emoji prefixes fall back to text indicators on terminals that
//! don't support Unicode, and styling is skipped entirely when colors are off.

use std::fmt::Display;

use console::{Emoji, style};

// Define emojis with fallbacks for terminals that don't support Unicode
static ERROR_EMOJI: Emoji<'_, '_> = Emoji("❌ ", "[E] ");
static INFO_EMOJI: Emoji<'_, '_> = Emoji("ℹ️ ", "[I] ");
static SUGGESTION_EMOJI: Emoji<'_, '_> = Emoji("✨", "[S] ");
static SUCCESS_EMOJI: Emoji<'_, '_> = Emoji("✅ ", "OK ");

/// Types of status messages that can be displayed to the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum MessageType {
    Error,
    Info,
    Success,
    Suggestion,
}

/// Terminal reporter for consistent CLI status output
#[derive(Debug, Clone, Copy)]
pub struct TerminalProgressReporter {
    /// Whether to use colored output
    use_colors: bool,
}

impl TerminalProgressReporter {
    #[must_use]
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

impl TerminalProgressReporter {
    /// Format a status line with appropriate styling and prefix
    pub(crate) fn status_line(self, message_type: MessageType, message: impl Display) -> String {
        let prefix = match message_type {
            MessageType::Error => ERROR_EMOJI,
            MessageType::Info => INFO_EMOJI,
            MessageType::Success => SUCCESS_EMOJI,
            MessageType::Suggestion => SUGGESTION_EMOJI,
        };

        let formatted_message = if self.use_colors {
            match message_type {
                MessageType::Error => style(message).for_stderr().red().bold().to_string(),
                MessageType::Info => style(message).for_stderr().blue().to_string(),
                MessageType::Success => style(message).for_stderr().green().to_string(),
                MessageType::Suggestion => {
                    return format!(
                        "{prefix} {}: {}",
                        style("Suggestion").for_stderr().yellow().bold(),
                        &message
                    );
                }
            }
        } else {
            message.to_string()
        };

        format!("{prefix}{formatted_message}")
    }

    pub(crate) fn format_error(self, message: impl Display) -> String {
        self.status_line(MessageType::Error, message)
    }

    pub(crate) fn format_info(self, message: impl Display) -> String {
        self.status_line(MessageType::Info, message)
    }

    pub(crate) fn format_suggestion(self, message: impl Display) -> String {
        self.status_line(MessageType::Suggestion, message)
    }

    pub(crate) fn format_success(self, message: impl Display) -> String {
        self.status_line(MessageType::Success, message)
    }

    /// Print a formatted error message to stderr
    pub(crate) fn report_error(self, message: impl Display) {
        eprintln!("{}", self.format_error(message));
    }

    pub(crate) fn report_info(self, message: impl Display) {
        eprintln!("{}", self.format_info(message));
    }

    pub(crate) fn report_success(self, message: impl Display) {
        eprintln!("{}", self.format_success(message));
    }

    pub(crate) fn report_suggestion(self, message: impl Display) {
        eprintln!("{}", self.format_suggestion(message));
    }
}
