//! Companion updater
//!
//! Keeps a Docker-hosted Bitfocus Companion install current: compares the
//! container's version label with the latest GitHub release and runs a
//! single-flight pull, rebuild, restart and verify pipeline with streamed
//! progress.

pub mod cli;
pub mod config;
pub mod error;
pub mod orchestration;
pub mod release;
pub mod ui;
pub mod update;
pub mod version;

pub use error::{UpdaterError, UpdaterResult};
