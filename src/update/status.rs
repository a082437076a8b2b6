//! Read-only status report

use super::state::GateSnapshot;
use crate::orchestration::ContainerStatus;
use crate::version::{format_for_display, is_update_available};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Snapshot of versions, container state and update availability
#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatus {
    /// Running version for display, e.g. "v4.2.3" or "Unknown"
    pub current_version: String,
    /// Latest released version for display
    pub latest_version: String,
    pub update_available: bool,
    /// Capitalized container state, e.g. "Running"
    pub container_status: String,
    pub container_running: bool,
    /// Whether a start request would be accepted now
    pub can_update: bool,
    pub cooldown_remaining_secs: u64,
    pub checked_at: DateTime<Local>,
}

impl UpdateStatus {
    /// Combine the individual reads into one report.
    ///
    /// Without both versions no update is reported as available.
    pub fn assemble(
        current: Option<&str>,
        latest: Option<&str>,
        container: &ContainerStatus,
        gate: GateSnapshot,
    ) -> Self {
        let update_available = match (current, latest) {
            (Some(current), Some(latest)) => is_update_available(current, latest),
            _ => false,
        };

        Self {
            current_version: format_for_display(current),
            latest_version: format_for_display(latest),
            update_available,
            container_status: capitalize(&container.status),
            container_running: container.running,
            can_update: gate.can_update(),
            cooldown_remaining_secs: gate.remaining_secs,
            checked_at: Local::now(),
        }
    }
}

/// Uppercase the first character and lowercase the rest
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
