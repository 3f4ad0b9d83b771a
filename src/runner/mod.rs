// Report execution against the backend
// Author: Gabriel Demetrios Lafis

mod transport;
mod view;

pub use transport::*;
pub use view::*;

use thiserror::Error;

use crate::report::ValidationError;

/// Why a run produced no rows.
///
/// Everything a run can fail with is caught at the view boundary and
/// stored on the view; nothing downstream ever sees these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    /// The binding was rejected locally and never sent
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The backend answered with a structured failure; shown verbatim
    #[error("{0}")]
    Execution(String),

    /// Timeout or connectivity problem
    #[error("Could not reach the report service ({0}). Please check the connection and try again.")]
    Transport(String),
}

impl RunError {
    pub fn is_validation(&self) -> bool {
        matches!(self, RunError::Validation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RunError::Transport(_))
    }
}

/// Result of a run request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Rows were received and applied
    Rows(usize),
    /// The report succeeded but returned no rows
    Empty,
    /// An identical request was already in flight; no new request was sent
    Coalesced,
    /// A newer request or a cancellation overtook this one; the response
    /// was dropped
    Stale,
    /// The view was closed
    Cancelled,
}

impl RunOutcome {
    /// Whether this run changed the view's rows
    pub fn applied(&self) -> bool {
        matches!(self, RunOutcome::Rows(_) | RunOutcome::Empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Running,
}
