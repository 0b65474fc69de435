//! Console application: startup, menu loop and operator I/O

pub mod cli;
pub mod console;
pub mod error;
pub mod pager;
pub mod produce;
pub mod prompt;
pub mod startup;
pub mod topology;

pub use console::{Console, MenuChoice};
pub use error::{AppError, AppResult};
