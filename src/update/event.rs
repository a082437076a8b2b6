//! Progress events emitted by an update run

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

/// Kind of progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Progress,
    Complete,
    Error,
}

/// One message in an update run's stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub message: String,
}

impl ProgressEvent {
    pub fn progress(message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Progress,
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Complete,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Error,
            message: message.into(),
        }
    }

    /// Whether this event closes the run
    pub fn is_terminal(&self) -> bool {
        self.kind != EventKind::Progress
    }
}

/// Producer half of an update run's event stream
///
/// Sends wait for channel capacity, so a slow consumer slows the pipeline
/// down. Once the consumer is gone, events are dropped and the run
/// carries on to its terminal state.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    tx: mpsc::Sender<ProgressEvent>,
}

impl ProgressSink {
    pub fn new(tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// Emit a progress line
    pub async fn progress(&self, message: impl Into<String>) {
        self.send(ProgressEvent::progress(message)).await;
    }

    /// Emit an event
    pub async fn send(&self, event: ProgressEvent) {
        if self.tx.send(event).await.is_err() {
            debug!("Progress consumer detached, dropping event");
        }
    }
}

/// Consumer half of an update run's event stream
#[derive(Debug)]
pub struct UpdateStream {
    rx: mpsc::Receiver<ProgressEvent>,
    finished: bool,
}

impl UpdateStream {
    pub fn new(rx: mpsc::Receiver<ProgressEvent>) -> Self {
        Self {
            rx,
            finished: false,
        }
    }

    /// Next event, or `None` once the terminal event has been delivered
    pub async fn next(&mut self) -> Option<ProgressEvent> {
        if self.finished {
            return None;
        }
        let event = self.rx.recv().await?;
        self.finished = event.is_terminal();
        Some(event)
    }

    /// Drain the stream and report its terminal event
    pub async fn outcome(mut self) -> UpdateOutcome {
        let mut last = None;
        while let Some(event) = self.next().await {
            last = Some(event);
        }
        UpdateOutcome::from_terminal(last)
    }
}

/// Terminal result of an update run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub success: bool,
    pub message: String,
}

impl UpdateOutcome {
    /// Outcome for the last event of a drained stream.
    ///
    /// Anything other than a terminal event means the run ended without
    /// reporting, which counts as a failure.
    pub fn from_terminal(last: Option<ProgressEvent>) -> Self {
        match last {
            Some(event) if event.is_terminal() => Self {
                success: event.kind == EventKind::Complete,
                message: event.message,
            },
            _ => Self {
                success: false,
                message: "Update ended without a result".to_string(),
            },
        }
    }
}
