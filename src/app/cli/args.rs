//! Command-line arguments

use crate::core::styles::palette_to_clap;
use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "topicsh")]
#[command(about = "Interactive console for inspecting, consuming and producing broker topics")]
#[command(version)]
#[command(after_help = "Ctrl-C stops the foreground consumer; at the menu it exits the console.")]
pub struct Args {
    /// Bootstrap brokers as a comma-separated host:port list (prompted for when absent)
    #[arg(short = 'b', long = "brokers", value_name = "HOST:PORT,...")]
    pub brokers: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Topics to create on connect (repeatable)
    #[arg(short = 't', long = "topic", value_name = "TOPIC", action = ArgAction::Append)]
    pub topics: Vec<String>,

    /// Bounded wait per poll in milliseconds; also how quickly jobs notice a stop
    #[arg(long = "poll-interval-ms", value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Consumer group used by console subscriptions
    #[arg(long = "group-id", value_name = "GROUP")]
    pub group_id: Option<String>,

    /// Directory for prompt history files
    #[arg(long = "history-dir", value_name = "DIR")]
    pub history_dir: Option<PathBuf>,

    /// Force coloured output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// More log output (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Log level
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        value_parser = ["trace", "debug", "info", "warn", "error", "off"]
    )]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<String>,
}

impl Args {
    /// Parse from an explicit argument list (first element is the program name)
    pub fn parse_from_args(args: &[String]) -> Result<Self, clap::Error> {
        Self::try_parse_from(args)
    }

    /// Parse the process arguments with the console palette, exiting on `--help`,
    /// `--version` or a usage error
    pub fn parse_styled(args: &[String], use_color: bool) -> Self {
        let matches = Self::command()
            .styles(palette_to_clap(use_color))
            .try_get_matches_from(args)
            .unwrap_or_else(|e| e.exit());
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    /// `-v` count minus `-q` count
    pub fn verbosity(&self) -> i8 {
        self.verbose.min(i8::MAX as u8) as i8 - self.quiet.min(i8::MAX as u8) as i8
    }

    /// `Some(true)` for `--color`, `Some(false)` for `--no-color`, `None` to decide later
    pub fn color_override(&self) -> Option<bool> {
        if self.no_color {
            Some(false)
        } else if self.color {
            Some(true)
        } else {
            None
        }
    }
}
