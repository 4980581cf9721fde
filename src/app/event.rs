use crate::form::{FormPayload, SubmissionId, SubmitError};
use crate::nav::Route;
use crossterm::event::Event as CrosstermEvent;
use std::time::Duration;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// A form POST finished, successfully or not
    SubmitFinished {
        id: SubmissionId,
        payload: FormPayload,
        outcome: Result<(), SubmitError>,
    },

    /// A timer started by `Action::StartTimer` elapsed
    TimerFired(TimerKind),

    /// Tick for UI refresh
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Page content starts fading in
    FadeIn,
    /// Fade-out finished; load the target page
    Navigate(Route),
}

/// A one-shot timer request. Timers cannot be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub after: Duration,
    pub kind: TimerKind,
}
