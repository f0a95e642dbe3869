//! Command-line front end for the Warden datatypes.
//!
//! The `warden` binary validates British National Grid references, prints
//! their centre points, checks tile documents against resource models, and
//! lists the registered plugins. This library holds the argument definitions
//! and command implementations so they can be tested without spawning the
//! binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::Cli;
pub use commands::{Session, run};
pub use error::{CliError, EXIT_ERROR, EXIT_INVALID, EXIT_SUCCESS, Outcome, Result};
