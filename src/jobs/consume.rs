//! Consumption jobs
//!
//! A job repeatedly pulls records for one topic with a bounded wait and prints
//! them. It never blocks longer than one poll interval without re-checking
//! its stop conditions, which is what makes cancellation cooperative.

use super::{ForegroundControl, JobOutput, JobResult, StdoutOutput, StopSignal};
use crate::broker::{MessageStream, Record};
use crate::core::styles::StyleRole;
use chrono::{DateTime, Local};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Bounded wait per poll when nothing else is configured
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Whether a job blocks the console or runs beside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobMode {
    Foreground,
    Background,
}

/// Human-readable identity of a job: what it consumes and since when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    topic: String,
    created_at: DateTime<Local>,
}

impl JobDescriptor {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            created_at: Local::now(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }
}

impl fmt::Display for JobDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "topic {}, time {}",
            self.topic,
            self.created_at.format("%a %b %e %H:%M:%S %Y")
        )
    }
}

/// What a job did before it stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub topic: String,
    pub messages: u64,
}

/// Text of a payload, or an escaped byte-string form when it is not UTF-8
pub fn render_payload(value: &[u8]) -> String {
    match std::str::from_utf8(value) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let mut rendered = String::with_capacity(value.len() + 3);
            rendered.push_str("b\"");
            for &byte in value {
                rendered.extend(std::ascii::escape_default(byte).map(char::from));
            }
            rendered.push('"');
            rendered
        }
    }
}

/// `[topic]: payload`, with the topic label highlighted when colour is on
pub fn render_record(record: &Record, use_color: bool) -> String {
    format!(
        "[{}]: {}",
        StyleRole::Topic.paint(&record.topic, use_color),
        render_payload(&record.value)
    )
}

/// One run of consuming a topic until stopped
///
/// A job is created per consume command and never restarted once it
/// returns.
pub struct ConsumptionJob {
    stream: Box<dyn MessageStream>,
    stop: StopSignal,
    mode: JobMode,
    poll_interval: Duration,
    output: Arc<dyn JobOutput>,
    use_color: bool,
}

impl ConsumptionJob {
    pub fn new(stream: Box<dyn MessageStream>, stop: StopSignal, mode: JobMode) -> Self {
        Self {
            stream,
            stop,
            mode,
            poll_interval: DEFAULT_POLL_INTERVAL,
            output: Arc::new(StdoutOutput),
            use_color: false,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_output(mut self, output: Arc<dyn JobOutput>) -> Self {
        self.output = output;
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn topic(&self) -> &str {
        self.stream.topic()
    }

    pub fn mode(&self) -> JobMode {
        self.mode
    }

    /// Consume until the job's stop signal is set or, for a foreground job,
    /// an interrupt arrives
    ///
    /// A foreground job marks itself active in `control` for its whole run
    /// and resets the foreground state on the way out. Broker errors end the
    /// job and are returned after the exit notice has been printed.
    pub async fn run(mut self, control: &Arc<ForegroundControl>) -> JobResult<JobSummary> {
        let foreground = match self.mode {
            JobMode::Foreground => Some(control.acquire()?),
            JobMode::Background => None,
        };
        let topic = self.stream.topic().to_string();
        log::debug!("job consuming '{}' started ({:?})", topic, self.mode);

        let mut messages = 0u64;
        let outcome = loop {
            let interrupted = foreground.as_ref().is_some_and(|g| g.stop_requested());
            if self.stop.is_requested() || interrupted {
                break Ok(());
            }

            match self.stream.poll(self.poll_interval).await {
                Ok(Some(record)) => {
                    self.output.emit(&render_record(&record, self.use_color));
                    messages += 1;
                }
                Ok(None) => {}
                Err(e) => break Err(e),
            }
        };

        self.output.emit(&format!("job consuming {} exiting", topic));
        log::debug!("job consuming '{}' rendered {} messages", topic, messages);
        drop(foreground);

        outcome?;
        Ok(JobSummary { topic, messages })
    }
}

impl fmt::Debug for ConsumptionJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumptionJob")
            .field("topic", &self.stream.topic())
            .field("mode", &self.mode)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}
