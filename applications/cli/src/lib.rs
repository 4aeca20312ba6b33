//! Encore command replay
//!
//! Reads a library file and a command log, replays every command against the
//! per-listener players and writes one output record per command followed by
//! the end-of-run monetization report.
//!
//! ```no_run
//! use encore_cli::{input, EncoreConfig, Session};
//! use std::path::Path;
//!
//! # fn main() -> encore_cli::Result<()> {
//! let config = EncoreConfig::load(None)?;
//! let library = input::read_library(Path::new("library.json"))?.into_library()?;
//! let commands = input::read_commands(Path::new("commands.json"))?;
//!
//! let mut session = Session::new(library, &config);
//! let outputs = session.replay(&commands);
//! println!("{}", serde_json::to_string_pretty(&outputs)?);
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod search;
pub mod session;

pub use command::{Command, CommandKind};
pub use config::EncoreConfig;
pub use error::{CliError, Result};
pub use output::CommandOutput;
pub use session::Session;
