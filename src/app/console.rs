//! The interactive menu loop
//!
//! The console owns no concurrency of its own: it reads a choice, runs the
//! matching command to completion and shows the menu again. Everything
//! long-running goes through the [`JobManager`].

use super::error::AppResult;
use super::produce::{produce_file, produce_interactive};
use super::prompt::{complete, History, Prompt};
use crate::core::error_handling::describe;
use crate::jobs::{ConsumeOutcome, JobError, JobId, JobInfo, JobManager, JobOutput};
use prettytable::format::consts::FORMAT_CLEAN;
use prettytable::{Cell, Row, Table};
use std::path::PathBuf;
use std::sync::Arc;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use tokio::io::{AsyncBufRead, AsyncWrite};

#[derive(EnumIter, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Consume,
    Produce,
    Kill,
    List,
    Quit,
}

impl MenuChoice {
    pub fn key(self) -> &'static str {
        match self {
            Self::Consume => "1",
            Self::Produce => "2",
            Self::Kill => "3",
            Self::List => "4",
            Self::Quit => "q",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Consume => "consume",
            Self::Produce => "produce",
            Self::Kill => "kill bg job",
            Self::List => "list bg jobs",
            Self::Quit => "quit",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::iter().find(|choice| choice.key() == input)
    }
}

/// Whether the menu loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Job listing as a borderless table
pub fn render_job_table(jobs: &[JobInfo]) -> String {
    let mut table = Table::new();
    table.set_format(*FORMAT_CLEAN);
    table.set_titles(Row::new(vec![
        Cell::new("JOB"),
        Cell::new("TOPIC"),
        Cell::new("STARTED"),
        Cell::new("STATE"),
    ]));
    for info in jobs {
        table.add_row(Row::new(vec![
            Cell::new(&info.id.to_string()),
            Cell::new(info.descriptor.topic()),
            Cell::new(&info.descriptor.created_at().format("%a %b %e %H:%M:%S %Y").to_string()),
            Cell::new(if info.finished { "finished" } else { "running" }),
        ]));
    }
    table.to_string().trim_end().to_string()
}

pub struct Console<R, W> {
    prompt: Prompt<R, W>,
    jobs: JobManager,
    output: Arc<dyn JobOutput>,
    history: History,
    known_topics: Vec<String>,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(prompt: Prompt<R, W>, jobs: JobManager, output: Arc<dyn JobOutput>) -> Self {
        Self {
            prompt,
            jobs,
            output,
            history: History::in_memory(),
            known_topics: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    /// Topics offered for completion besides the prompt history
    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.known_topics = topics;
        self
    }

    pub fn jobs(&self) -> &JobManager {
        &self.jobs
    }

    /// Show the menu and run commands until the operator quits or input ends
    ///
    /// Every background job is asked to stop before this returns.
    pub async fn run(&mut self) -> AppResult<()> {
        let result = self.menu_loop().await;
        let stopped = self.jobs.shutdown();
        log::debug!("console closed, {} background job(s) stopped", stopped);
        result
    }

    async fn menu_loop(&mut self) -> AppResult<()> {
        loop {
            for choice in MenuChoice::iter() {
                self.output.emit(&format!("{}. {}", choice.key(), choice.label()));
            }
            let Some(input) = self.prompt.ask("what do you say? ").await? else {
                return Ok(());
            };
            let Some(choice) = MenuChoice::parse(&input) else {
                self.output.emit("invalid.");
                continue;
            };

            match self.dispatch(choice).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                // Command failures end the command, not the console
                Err(e) => {
                    log::debug!("{} failed: {:?}", choice.label(), e);
                    self.output.emit(&describe(&e));
                }
            }
        }
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> AppResult<Flow> {
        match choice {
            MenuChoice::Consume => self.consume().await,
            MenuChoice::Produce => self.produce().await,
            MenuChoice::Kill => self.kill().await,
            MenuChoice::List => {
                self.list();
                Ok(Flow::Continue)
            }
            MenuChoice::Quit => Ok(Flow::Quit),
        }
    }

    async fn consume(&mut self) -> AppResult<Flow> {
        let Some(background) = self.prompt.confirm("running in background?").await? else {
            return Ok(Flow::Quit);
        };
        let Some(topic) = self.ask_topic().await? else {
            return Ok(Flow::Quit);
        };

        match self.jobs.start_consume(&topic, background).await? {
            ConsumeOutcome::Background(id) => {
                log::debug!("consume '{}' detached as job {}", topic, id);
            }
            ConsumeOutcome::Foreground(summary) => {
                log::info!(
                    "foreground job on '{}' printed {} message(s)",
                    summary.topic,
                    summary.messages
                );
            }
        }
        Ok(Flow::Continue)
    }

    async fn produce(&mut self) -> AppResult<Flow> {
        let Some(topic) = self.ask_topic().await? else {
            return Ok(Flow::Quit);
        };
        self.output.emit("1. stdin");
        self.output.emit("2. file");
        let mode = loop {
            let Some(mode) = self.prompt.ask("which mode? ").await? else {
                return Ok(Flow::Quit);
            };
            match mode.trim() {
                "1" | "2" => break mode.trim().to_string(),
                _ => self.output.emit("invalid"),
            }
        };

        let producer = self.jobs.broker().producer();
        let sent = if mode == "2" {
            let Some(path) = self.prompt.ask("which file: ").await? else {
                return Ok(Flow::Quit);
            };
            produce_file(producer.as_ref(), &topic, &PathBuf::from(path.trim())).await?
        } else {
            self.output.emit("type whatever you want to send.(Ctrl-D) to break");
            produce_interactive(&mut self.prompt, producer.as_ref(), &topic).await?
        };
        self.output.emit(&format!("{} message(s) sent to {}", sent, topic));
        Ok(Flow::Continue)
    }

    async fn kill(&mut self) -> AppResult<Flow> {
        for info in self.jobs.list_jobs() {
            self.output.emit(&format!("{}: {}", info.id, info.descriptor));
        }
        let id = loop {
            let Some(answer) = self.prompt.ask("which job? ").await? else {
                return Ok(Flow::Quit);
            };
            if let Ok(id) = answer.trim().parse::<u64>() {
                break JobId(id);
            }
        };

        match self.jobs.kill_job(id) {
            Ok(descriptor) => log::debug!("job {} ({}) stopping", id, descriptor),
            Err(JobError::NotFound { .. }) => self.output.emit("job not exist"),
            Err(e) => return Err(e.into()),
        }
        Ok(Flow::Continue)
    }

    fn list(&self) {
        let jobs = self.jobs.list_jobs();
        if jobs.is_empty() {
            self.output.emit("no background jobs");
        } else {
            self.output.emit(&render_job_table(&jobs));
        }
    }

    /// Ask for a topic, expanding a unique prefix of a known one
    async fn ask_topic(&mut self) -> AppResult<Option<String>> {
        let topic = loop {
            let Some(answer) = self.prompt.ask("topic: ").await? else {
                return Ok(None);
            };
            let answer = answer.trim();
            if !answer.is_empty() {
                break answer.to_string();
            }
        };

        let candidates = self.known_topics.iter().chain(self.history.entries());
        let topic = match complete(&topic, candidates) {
            Some(expanded) => {
                self.output.emit(&format!("topic: {}", expanded));
                expanded
            }
            None => topic,
        };

        if let Err(e) = self.history.record(&topic).await {
            log::warn!("Cannot save topic history: {}", e);
        }
        if !self.known_topics.contains(&topic) {
            self.known_topics.push(topic.clone());
        }
        Ok(Some(topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Consume));
        assert_eq!(MenuChoice::parse(" 4 "), Some(MenuChoice::List));
        assert_eq!(MenuChoice::parse("q"), Some(MenuChoice::Quit));
        assert_eq!(MenuChoice::parse("5"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn test_menu_order() {
        let keys: Vec<&str> = MenuChoice::iter().map(MenuChoice::key).collect();
        assert_eq!(keys, vec!["1", "2", "3", "4", "q"]);
    }
}
