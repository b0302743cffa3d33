//! Error types and the batch aggregation result.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for exec operations.
pub type Result<T> = std::result::Result<T, ExecError>;

/// Environmental failures while orchestrating processes.
///
/// These describe conditions outside the caller's control and are threaded
/// back as values; they are never panics.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open redirect target `{path}`: {source}")]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of a batch operation over an array of processes.
///
/// One element's failure never prevents attempting the rest; this summary
/// only says whether *all* elements reached their expected state. Callers
/// inspect individual statuses when it reports failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub(crate) fn record(&mut self, ok: bool) {
        self.attempted += 1;
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    /// True when every attempted element reached its expected state.
    pub fn ok(&self) -> bool {
        self.failed == 0
    }
}
