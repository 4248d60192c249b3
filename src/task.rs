//! Cancellable background extraction.
//!
//! [`ExtractionTask`] moves a run onto tokio's blocking pool so the caller is
//! never blocked by tokenization. The run checks its [`CancellationToken`]
//! between documents; a cancelled run delivers nothing to its sink.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::extract::WordExtractor;
use crate::message::{ContentInspector, MessageSource, WordSink};
use crate::result::RunOutcome;

/// Handle to an extraction run executing in the background.
#[derive(Debug)]
pub struct ExtractionTask {
    handle: JoinHandle<Result<RunOutcome>>,
    cancel: CancellationToken,
}

impl ExtractionTask {
    /// Start a run with a fresh cancellation token.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn spawn<S, I, K>(extractor: WordExtractor, source: S, inspector: I, sink: K) -> Self
    where
        S: MessageSource + Send + 'static,
        I: ContentInspector + Send + 'static,
        K: WordSink + Send + 'static,
    {
        Self::spawn_with_token(extractor, source, inspector, sink, CancellationToken::new())
    }

    /// Start a run that stops when `cancel` (or one of its parents) fires.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn spawn_with_token<S, I, K>(
        extractor: WordExtractor,
        source: S,
        inspector: I,
        sink: K,
        cancel: CancellationToken,
    ) -> Self
    where
        S: MessageSource + Send + 'static,
        I: ContentInspector + Send + 'static,
        K: WordSink + Send + 'static,
    {
        let token = cancel.clone();
        let handle =
            tokio::task::spawn_blocking(move || extractor.run(source, &inspector, sink, &token));
        Self { handle, cancel }
    }

    /// Ask the run to stop before its next document.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clone of the token the run checks.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the run has ended, successfully or not.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run to end.
    ///
    /// # Errors
    ///
    /// Returns the run's source or sink error, or [`Error::Task`] if the
    /// worker panicked.
    pub async fn join(self) -> Result<RunOutcome> {
        self.handle.await.map_err(|e| Error::Task(e.to_string()))?
    }
}
