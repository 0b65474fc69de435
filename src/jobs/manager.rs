//! The three job operations the console calls: consume, list, kill
//!
//! `JobManager` wires a broker, the foreground state, the background
//! registry and an output sink together. It lives on the console's control
//! flow; only the jobs it spawns run elsewhere.

use super::{
    ConsumptionJob, ForegroundControl, JobDescriptor, JobError, JobId, JobInfo, JobMode,
    JobOutput, JobRegistry, JobResult, JobSummary, StdoutOutput, StopSignal,
    DEFAULT_POLL_INTERVAL,
};
use crate::broker::Broker;
use crate::core::error_handling::log_error_with_context;
use crate::core::styles::StyleRole;
use std::sync::Arc;
use std::time::Duration;

/// Consumer group every console subscription joins unless configured otherwise
pub const DEFAULT_GROUP_ID: &str = "topicsh-console";

/// Knobs applied to every job the manager starts
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub poll_interval: Duration,
    pub use_color: bool,
    pub group_id: String,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            use_color: false,
            group_id: DEFAULT_GROUP_ID.to_string(),
        }
    }
}

/// How a consume command ended up running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// Detached and registered under this id
    Background(JobId),
    /// Ran inline until stopped
    Foreground(JobSummary),
}

pub struct JobManager {
    broker: Arc<dyn Broker>,
    control: Arc<ForegroundControl>,
    registry: JobRegistry,
    settings: JobSettings,
    output: Arc<dyn JobOutput>,
}

impl JobManager {
    pub fn new(broker: Arc<dyn Broker>, control: Arc<ForegroundControl>) -> Self {
        Self {
            broker,
            control,
            registry: JobRegistry::new(),
            settings: JobSettings::default(),
            output: Arc::new(StdoutOutput),
        }
    }

    pub fn with_settings(mut self, settings: JobSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_output(mut self, output: Arc<dyn JobOutput>) -> Self {
        self.output = output;
        self
    }

    pub fn control(&self) -> &Arc<ForegroundControl> {
        &self.control
    }

    pub fn broker(&self) -> &Arc<dyn Broker> {
        &self.broker
    }

    /// Subscribe to `topic` and consume it
    ///
    /// In the background the job is spawned, registered and its id returned
    /// right away. In the foreground this only returns once the job stopped.
    pub async fn start_consume(
        &mut self,
        topic: &str,
        background: bool,
    ) -> JobResult<ConsumeOutcome> {
        if !background && self.control.is_active() {
            return Err(JobError::ForegroundBusy);
        }

        let stream = self.broker.subscribe(topic, &self.settings.group_id).await?;
        let stop = StopSignal::new();
        let mode = if background {
            JobMode::Background
        } else {
            JobMode::Foreground
        };
        let job = ConsumptionJob::new(stream, stop.clone(), mode)
            .with_poll_interval(self.settings.poll_interval)
            .with_output(Arc::clone(&self.output))
            .with_color(self.settings.use_color);

        match mode {
            JobMode::Background => {
                let control = Arc::clone(&self.control);
                let handle = tokio::spawn(async move {
                    if let Err(e) = job.run(&control).await {
                        log_error_with_context(&e, "Background consumption job");
                    }
                });
                let id = self
                    .registry
                    .register(handle, stop, JobDescriptor::new(topic));
                let created = format!("job {} created", id);
                self.output.emit(&StyleRole::Status.paint(&created, self.settings.use_color));
                Ok(ConsumeOutcome::Background(id))
            }
            JobMode::Foreground => job.run(&self.control).await.map(ConsumeOutcome::Foreground),
        }
    }

    /// Background jobs in ascending id order
    pub fn list_jobs(&self) -> Vec<JobInfo> {
        self.registry.list()
    }

    /// Stop background job `id` without waiting for it to finish
    pub fn kill_job(&mut self, id: JobId) -> JobResult<JobDescriptor> {
        self.registry.stop(id)
    }

    /// Ask every background job to stop; returns how many were running
    pub fn shutdown(&mut self) -> usize {
        let stopped = self.registry.stop_all();
        if !stopped.is_empty() {
            log::info!("stopped {} background job(s)", stopped.len());
        }
        stopped.len()
    }
}
