//! Pragati CLI library - operator interface for the district scheme
//! knowledge base.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, CliFormat, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::{Formatter, OutputFormat};
