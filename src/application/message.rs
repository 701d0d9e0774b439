use super::LedgerError;

/// How loudly a message should be presented. Rendering (colour, stream) is up
/// to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// A user-facing line of output with a severity attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
        }
    }

    pub fn no_matching_expenses() -> Self {
        Self::info("No matching expenses found.")
    }
}

impl From<&LedgerError> for Message {
    fn from(err: &LedgerError) -> Self {
        Message::warning(err.to_string())
    }
}
