//! Shared configuration for the Warden datatype plugins.
//!
//! Datatype crates read their settings from the tables defined here so the
//! CLI, the registry, and the tests resolve the same values from
//! `warden.toml`. The [`locale`] module chooses the message catalogue.

pub mod config;
pub mod locale;

pub use config::{
    BngCentrePointConfig, CONFIG_FILE_NAME, ConfigError, MAX_DIGITS_PER_AXIS, SharedConfig,
    SquareSet,
};
pub use locale::{LOCALE_ENV_VAR, LocaleChoice, LocaleSource};
