//! Timed attempt lifecycle: start, resume, answer, countdown, submit.

mod controller;
pub mod resume;
mod state;
mod ticker;

pub use controller::AttemptController;
pub use resume::{ResumeChoice, ResumeDecision, ResumeOffer, StartOutcome};
pub use state::{
    AttemptPhase, AttemptSession, Countdown, CountdownOutcome, CountdownStep,
    LOW_TIME_WARNING_SECS, PendingStart, PendingSubmit, RequestKind, RequestState, RequestStatus,
};
pub use ticker::{TICK_INTERVAL, TickHandle};
