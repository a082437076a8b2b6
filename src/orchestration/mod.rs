//! Orchestration module for the managed container
//!
//! Provides the runtime abstraction the update pipeline drives and the
//! docker CLI implementation of it.

mod docker;
mod runtime;

pub use docker::DockerRuntime;
pub use runtime::{ContainerRuntime, ContainerStatus};

use crate::error::{UpdaterError, UpdaterResult};
use crate::update::ProgressSink;
use std::collections::VecDeque;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// Max number of output lines kept for failure diagnostics.
pub(crate) const FAILURE_TAIL_LINES: usize = 20;

/// Indentation applied to forwarded sub-process output.
const OUTPUT_PREFIX: &str = "  ";

/// Turn a raw output line into a progress message, dropping blank lines.
pub(crate) fn format_output_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("{}{}", OUTPUT_PREFIX, trimmed))
    }
}

/// Append `line`, dropping the oldest entry beyond `FAILURE_TAIL_LINES`.
fn push_tail(tail: &mut VecDeque<String>, line: String) {
    if tail.len() == FAILURE_TAIL_LINES {
        tail.pop_front();
    }
    tail.push_back(line);
}

#[derive(Debug, Clone, Copy)]
enum Pipe {
    Stdout,
    Stderr,
}

/// Stream stdout+stderr from a child process into `sink`, line by line.
///
/// Lines are read as bytes and decoded lossily, so invalid UTF-8 never stops
/// a pipe from being drained. Returns the last `FAILURE_TAIL_LINES` forwarded
/// lines so callers can log them when the process fails.
pub(crate) async fn stream_child_output(
    child: &mut tokio::process::Child,
    sink: &ProgressSink,
) -> UpdaterResult<Vec<String>> {
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| UpdaterError::Internal("child stderr was not piped".to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| UpdaterError::Internal("child stdout was not piped".to_string()))?;

    let mut stderr_reader = BufReader::new(stderr);
    let mut stdout_reader = BufReader::new(stdout);
    // read_until keeps partial reads in these buffers when the other branch wins
    let mut stderr_buf = Vec::new();
    let mut stdout_buf = Vec::new();

    let mut tail = VecDeque::with_capacity(FAILURE_TAIL_LINES);
    let mut stderr_done = false;
    let mut stdout_done = false;

    while !stderr_done || !stdout_done {
        let (pipe, read) = tokio::select! {
            read = stderr_reader.read_until(b'\n', &mut stderr_buf), if !stderr_done => {
                (Pipe::Stderr, read)
            }
            read = stdout_reader.read_until(b'\n', &mut stdout_buf), if !stdout_done => {
                (Pipe::Stdout, read)
            }
        };

        let (buf, done) = match pipe {
            Pipe::Stderr => (&mut stderr_buf, &mut stderr_done),
            Pipe::Stdout => (&mut stdout_buf, &mut stdout_done),
        };

        match read {
            Ok(0) if buf.is_empty() => *done = true,
            Ok(read) => {
                // A cancelled read can leave an unterminated last line behind
                *done = read == 0;
                let line = String::from_utf8_lossy(buf).into_owned();
                buf.clear();
                if let Some(message) = format_output_line(&line) {
                    sink.progress(message.clone()).await;
                    push_tail(&mut tail, message);
                }
            }
            Err(e) => {
                warn!("Stopped reading child {:?}: {}", pipe, e);
                *done = true;
            }
        }
    }

    Ok(tail.into())
}
