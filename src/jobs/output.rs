//! Where jobs write rendered messages and status lines

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Line-oriented sink shared by every job
///
/// Jobs running in parallel each emit whole lines; there is no ordering
/// between lines from different jobs.
pub trait JobOutput: Send + Sync {
    fn emit(&self, line: &str);
}

/// Writes each line to stdout and flushes it immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutOutput;

impl JobOutput for StdoutOutput {
    fn emit(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout must not take a background job down with it
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

/// Collects lines in memory, e.g. to inspect what a job printed
#[derive(Debug, Default, Clone)]
pub struct BufferedOutput {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line emitted so far
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl JobOutput for BufferedOutput {
    fn emit(&self, line: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(line.to_string()),
        }
    }
}
