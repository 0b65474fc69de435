//! Shared fixtures for job tests

use crate::broker::{BrokerError, BrokerResult, MessageStream, Record};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Short bounded wait so stop checks come around quickly in tests
pub const TEST_POLL: Duration = Duration::from_millis(20);

/// Upper bound for anything that should happen "within one poll interval"
pub const DEADLINE: Duration = Duration::from_secs(2);

pub enum Step {
    Deliver(Vec<u8>),
    Fail,
}

/// Stream that plays back a fixed script, then idles with bounded waits
pub struct ScriptedStream {
    topic: String,
    script: VecDeque<Step>,
    next_offset: u64,
    polls: Arc<AtomicUsize>,
}

impl ScriptedStream {
    pub fn new(topic: &str, script: Vec<Step>) -> Self {
        Self {
            topic: topic.to_string(),
            script: script.into(),
            next_offset: 1,
            polls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn idle(topic: &str) -> Self {
        Self::new(topic, Vec::new())
    }

    /// Counter of `poll` calls, readable after the stream moved into a job
    pub fn poll_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.polls)
    }
}

#[async_trait]
impl MessageStream for ScriptedStream {
    fn topic(&self) -> &str {
        &self.topic
    }

    async fn poll(&mut self, timeout: Duration) -> BrokerResult<Option<Record>> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        match self.script.pop_front() {
            Some(Step::Deliver(value)) => {
                let record = Record::new(self.topic.clone(), self.next_offset, value);
                self.next_offset += 1;
                Ok(Some(record))
            }
            Some(Step::Fail) => Err(BrokerError::Disconnected {
                topic: self.topic.clone(),
            }),
            None => {
                tokio::time::sleep(timeout).await;
                Ok(None)
            }
        }
    }
}

/// Wait until `condition` holds, polling every few milliseconds
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + DEADLINE;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
