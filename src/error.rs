//! Error types for html-wordlist.
//!
//! Document-level failures (`Decode`) are recovered inside a run. Collaborator
//! failures (`Source`, `Sink`) abort the run and are handed back to the caller.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single document's body could not be decoded into text.
    #[error("Could not decode document: {0}")]
    Decode(String),

    /// The message source failed to supply the next message.
    #[error("Message source failed: {0}")]
    Source(String),

    /// The result sink rejected the extracted words.
    #[error("Result sink failed: {0}")]
    Sink(String),

    /// The configured token pattern is not a valid regular expression.
    #[error("Invalid token pattern: {0}")]
    InvalidPattern(String),

    /// Configuration could not be read or parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The background extraction task panicked or was aborted.
    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
