use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuddleError {
    #[error("Invalid event on line {line}: {reason}")]
    InvalidEvent { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session event queue is closed")]
    QueueClosed,
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, HuddleError>;
