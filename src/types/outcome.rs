//! The result of one poll, including which stages it got through.

use crate::error::PollerError;
use crate::types::params::NormalizedParameterSet;
use crate::types::poll_window::PollWindow;
use crate::types::reading::Reading;
use crate::types::vendor::Vendor;
use chrono::{DateTime, Utc};
use log::error;
use std::fmt;

/// Stages of a poll, in the order they are entered.
///
/// `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollState {
    Started,
    WindowResolved,
    Validated,
    Dispatched,
    Succeeded,
    Failed,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::Succeeded | PollState::Failed)
    }
}

/// Everything the persistence side needs after a successful poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    pub station: String,
    pub vendor: Vendor,
    pub window: PollWindow,
    /// The "current time" the poll was resolved against.
    pub polled_at: DateTime<Utc>,
    pub params: NormalizedParameterSet,
    pub reading: Reading,
}

/// A failed poll. `error` keeps the full source chain of the cause.
#[derive(Debug)]
pub struct PollFailure {
    /// The last non-terminal state reached before failing.
    pub last_state: PollState,
    pub error: PollerError,
    /// The poll's report, when the vendor call succeeded and only publishing it failed.
    pub unpublished: Option<PollReport>,
}

/// Outcome of [`crate::Poller::poll`].
#[derive(Debug)]
pub struct PollOutcome {
    history: Vec<PollState>,
    result: Result<PollReport, PollFailure>,
}

impl PollOutcome {
    /// The terminal state.
    pub fn state(&self) -> PollState {
        if self.result.is_ok() {
            PollState::Succeeded
        } else {
            PollState::Failed
        }
    }

    /// Every state entered, in order, ending with the terminal one.
    pub fn history(&self) -> &[PollState] {
        &self.history
    }

    pub fn reached(&self, state: PollState) -> bool {
        self.history.contains(&state)
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn report(&self) -> Option<&PollReport> {
        self.result.as_ref().ok()
    }

    pub fn failure(&self) -> Option<&PollFailure> {
        self.result.as_ref().err()
    }

    pub fn error(&self) -> Option<&PollerError> {
        self.failure().map(|failure| &failure.error)
    }

    pub fn into_result(self) -> Result<PollReport, PollerError> {
        self.result.map_err(|failure| failure.error)
    }

    /// Marks a successful poll as failed because its report could not be
    /// published. The report stays on the failure. Already failed outcomes are
    /// returned unchanged.
    pub(crate) fn unpublished(self, error: PollerError) -> PollOutcome {
        let PollOutcome {
            mut history,
            result,
        } = self;
        let report = match result {
            Ok(report) => report,
            Err(failure) => {
                return PollOutcome {
                    history,
                    result: Err(failure),
                }
            }
        };
        if history.last() == Some(&PollState::Succeeded) {
            history.pop();
        }
        let last_state = history.last().copied().unwrap_or(PollState::Started);
        error!(
            "Publishing the poll of station {} failed: {}",
            report.station,
            error.chain()
        );
        history.push(PollState::Failed);
        PollOutcome {
            history,
            result: Err(PollFailure {
                last_state,
                error,
                unpublished: Some(report),
            }),
        }
    }
}

/// Success renders the raw vendor payload; failure renders the error chain.
impl fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(report) => write!(f, "{}", report.reading.raw),
            Err(failure) => write!(f, "{}", failure.error.chain()),
        }
    }
}

/// Records state transitions while a poll runs.
#[derive(Debug)]
pub(crate) struct PollTrace {
    history: Vec<PollState>,
}

impl PollTrace {
    pub(crate) fn start() -> Self {
        Self {
            history: vec![PollState::Started],
        }
    }

    pub(crate) fn current(&self) -> PollState {
        self.history.last().copied().unwrap_or(PollState::Started)
    }

    pub(crate) fn advance(&mut self, state: PollState) {
        debug_assert!(!self.current().is_terminal());
        self.history.push(state);
    }

    pub(crate) fn succeed(mut self, report: PollReport) -> PollOutcome {
        self.history.push(PollState::Succeeded);
        PollOutcome {
            history: self.history,
            result: Ok(report),
        }
    }

    pub(crate) fn fail(mut self, error: PollerError) -> PollOutcome {
        let last_state = self.current();
        error!("Poll failed after {:?}: {}", last_state, error.chain());
        self.history.push(PollState::Failed);
        PollOutcome {
            history: self.history,
            result: Err(PollFailure {
                last_state,
                error,
                unpublished: None,
            }),
        }
    }
}
