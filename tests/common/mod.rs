//! Common test utilities and helpers
//!
//! Shared fixtures for the integration tests: an in-process broker, a job
//! manager that writes into a buffer, and a polling wait helper.

use std::sync::Arc;
use std::time::Duration;
use topicsh::broker::{Broker, MemoryBroker};
use topicsh::jobs::api::{BufferedOutput, ForegroundControl, JobManager, JobSettings};

/// Poll interval used by every job the fixtures start
pub const POLL: Duration = Duration::from_millis(20);

/// Upper bound for anything the tests wait on
pub const DEADLINE: Duration = Duration::from_secs(2);

pub struct Fixture {
    pub broker: MemoryBroker,
    pub control: Arc<ForegroundControl>,
    pub output: BufferedOutput,
    pub jobs: JobManager,
}

impl Fixture {
    pub fn new() -> Self {
        let broker = MemoryBroker::new(vec!["localhost:9092".to_string()]);
        let control = ForegroundControl::new();
        let output = BufferedOutput::new();
        let jobs = JobManager::new(Arc::new(broker.clone()), Arc::clone(&control))
            .with_settings(JobSettings {
                poll_interval: POLL,
                ..JobSettings::default()
            })
            .with_output(Arc::new(output.clone()));
        Self {
            broker,
            control,
            output,
            jobs,
        }
    }

    pub async fn publish(&self, topic: &str, value: &[u8]) {
        self.broker
            .producer()
            .send(topic, value.to_vec())
            .await
            .expect("publish failed");
    }
}

/// Wait until `condition` holds, giving up after [`DEADLINE`]
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
