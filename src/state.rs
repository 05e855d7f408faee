//! Presentation state and its transition function.
//!
//! The dashboard's status is a closed set. Every mutation goes through
//! [`PresentationState::apply`], driven by one of the [`Event`]s below.

use chrono::{DateTime, Local};

use crate::errors::FetchError;
use crate::models::TrendItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Constructed, no fetch issued yet.
    #[default]
    Idle,
    Loading,
    Error,
    Ready,
}

/// Inputs to the presentation state machine.
#[derive(Debug)]
pub enum Event {
    Start,
    ManualRefresh,
    TimerTick,
    FetchSucceeded {
        trends: Vec<TrendItem>,
        at: DateTime<Local>,
    },
    FetchFailed(FetchError),
}

/// What the view should currently display.
///
/// Fields are private; the only writer is [`PresentationState::apply`].
#[derive(Debug, Clone, Default)]
pub struct PresentationState {
    trends: Vec<TrendItem>,
    status: Status,
    error_message: Option<String>,
    last_updated: Option<DateTime<Local>>,
}

impl PresentationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trends(&self) -> &[TrendItem] {
        &self.trends
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Present only while `status() == Status::Error`.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Start | Event::ManualRefresh | Event::TimerTick => {
                // The current list stays on screen during a background refresh
                self.status = Status::Loading;
                self.error_message = None;
            }
            Event::FetchSucceeded { trends, at } => {
                self.trends = trends;
                self.status = Status::Ready;
                self.error_message = None;
                // Wall clock may step backwards; keep the timestamp monotonic
                self.last_updated = Some(match self.last_updated {
                    Some(previous) if previous > at => previous,
                    _ => at,
                });
            }
            Event::FetchFailed(error) => {
                self.status = Status::Error;
                self.error_message = Some(error.user_message().to_string());
            }
        }
    }
}
