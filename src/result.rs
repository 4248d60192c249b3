//! Result types for extraction output.
//!
//! Words accumulate into a [`WordSet`] across every document of a run. The
//! bookkeeping for the run itself lives in [`ExtractionSummary`].

use std::collections::BTreeSet;

use serde::Serialize;

/// Distinct words, iterated in lexicographic order.
pub type WordSet = BTreeSet<String>;

/// What happened to a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// The document was tokenized and contributed its words.
    Processed,
    /// The document was skipped by the content-type gate or had no response.
    Skipped,
}

/// Per-run document counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    /// Documents taken from the source.
    pub documents_seen: usize,

    /// Documents that were tokenized.
    pub documents_processed: usize,

    /// Documents skipped without being tokenized.
    pub documents_skipped: usize,

    /// Documents whose body could not be located and contributed nothing.
    pub documents_failed: usize,

    /// Size of the final word set.
    pub word_count: usize,

    /// One human-readable line per failed document.
    pub warnings: Vec<String>,
}

/// Words and counters of an in-memory extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub words: WordSet,
    pub summary: ExtractionSummary,
}

/// How a run against a message source ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// All messages were read and the words were delivered to the sink.
    Completed(ExtractionSummary),
    /// The run was cancelled; nothing was delivered.
    Cancelled,
}

impl RunOutcome {
    /// Whether the run was cancelled before delivery.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Counters of a completed run.
    #[must_use]
    pub fn summary(&self) -> Option<&ExtractionSummary> {
        match self {
            Self::Completed(summary) => Some(summary),
            Self::Cancelled => None,
        }
    }
}
