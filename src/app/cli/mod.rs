//! Command-line parsing and configuration

pub mod args;
pub mod config;

pub use args::Args;
pub use config::{load_config, ConfigError, FileConfig, Settings};

#[cfg(test)]
mod tests;
