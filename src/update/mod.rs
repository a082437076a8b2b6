//! Update orchestration
//!
//! Cooldown-gated, single-flight update runs with streamed progress, and the
//! read-only status query that sits beside them.

pub mod cooldown;
mod event;
mod orchestrator;
pub mod state;
mod status;

pub use cooldown::CooldownGate;
pub use event::{EventKind, ProgressEvent, ProgressSink, UpdateOutcome, UpdateStream};
pub use orchestrator::{
    PipelineSettings, Stage, UpdateOrchestrator, COMPLETE_MESSAGE, UNVERIFIED_MESSAGE,
};
pub use state::{GateSnapshot, RunGuard, UpdateState};
pub use status::UpdateStatus;
