use thiserror::Error;

/// Refusals from the session's editing commands.
///
/// Structural no-ops (an out-of-range delete, a declined cascade) are not
/// errors; they come back as unchanged outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no line at position {position}")]
    NoSuchLine { position: usize },

    #[error("line {line} cannot be edited: {reason}")]
    NotEditable { line: usize, reason: &'static str },

    #[error("no cell is open for editing")]
    NothingOpen,
}
