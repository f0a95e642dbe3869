//! Workspace-wide configuration loader backed by `warden.toml`.
//!
//! Warden keeps datatype settings in `warden.toml`, grouped by datatype name.
//! `SharedConfig` captures the settings every datatype may consult (the
//! preferred locale) alongside the per-datatype tables so that the registry,
//! the CLI, and the tests share a single source of truth. Values are
//! deserialised from the file when present and fall back to defaults
//! otherwise.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::locale::non_blank;

/// File name searched for by [`SharedConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "warden.toml";

/// Largest number of digits per axis a grid reference may carry (1 m).
pub const MAX_DIGITS_PER_AXIS: u8 = 5;

/// Errors raised while loading `warden.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`SharedConfig`].
    #[error("invalid configuration {path}: {source}")]
    Parse {
        /// Path of the malformed file.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        #[source]
        source: toml::de::Error,
    },

    /// The digit bounds for grid references are inconsistent.
    #[error("invalid digit range {min}..={max}; bounds must satisfy 1 <= min <= max <= 5")]
    InvalidDigitRange {
        /// Configured minimum digits per axis.
        min: u8,
        /// Configured maximum digits per axis.
        max: u8,
    },
}

/// Result type alias using [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Shared configuration for the Warden datatypes.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SharedConfig {
    /// Preferred locale for validation messages when the environment is
    /// silent. Blank values are ignored so `locale = ""` falls back cleanly
    /// to the bundled default.
    pub locale: Option<String>,
    /// Overrides for the `bng_centre_point` datatype.
    pub bng_centre_point: BngCentrePointConfig,
}

impl SharedConfig {
    /// Loads configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read,
    /// [`ConfigError::Parse`] when it is not valid configuration TOML, and
    /// [`ConfigError::InvalidDigitRange`] when the digit bounds are
    /// inconsistent.
    pub fn load_from(path: &Utf8Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::parse(path, &source)?;
        debug!(target: "warden::config", "loaded configuration from {path}");
        Ok(config)
    }

    /// Loads `warden.toml` from `directory`, returning defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Self::load_from`] for a file that exists.
    pub fn discover(directory: &Utf8Path) -> Result<Self> {
        let candidate = directory.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load_from(&candidate)
        } else {
            debug!(
                target: "warden::config",
                "no {CONFIG_FILE_NAME} in {directory}; using defaults"
            );
            Ok(Self::default())
        }
    }

    /// Loads configuration using the supplied loader.
    ///
    /// This exists to support dependency injection in tests so the file
    /// system need not be touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden::SharedConfig;
    ///
    /// let config = SharedConfig::load_with(SharedConfig::default);
    /// assert_eq!(config.bng_centre_point.min_digits, 5);
    /// ```
    #[must_use]
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnOnce() -> Self,
    {
        loader()
    }

    /// Returns the configured locale override, if present.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        non_blank(self.locale.as_deref())
    }

    fn parse(path: &Utf8Path, source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.bng_centre_point.check()?;
        Ok(config)
    }
}

/// Set of 100 km grid squares a reference may name.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SquareSet {
    /// Squares that contain land in Great Britain.
    #[default]
    Land,
    /// Every square inside the 700 km by 1300 km national grid extent.
    Extent,
}

/// Settings for the `bng_centre_point` datatype.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BngCentrePointConfig {
    /// Fewest digits permitted per axis.
    pub min_digits: u8,
    /// Most digits permitted per axis.
    pub max_digits: u8,
    /// Accept lowercase square letters and normalise them to uppercase.
    pub accept_lowercase: bool,
    /// Which grid squares are recognised.
    pub squares: SquareSet,
}

impl BngCentrePointConfig {
    /// Verifies the digit bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDigitRange`] unless
    /// `1 <= min_digits <= max_digits <= 5`.
    pub fn check(&self) -> Result<()> {
        let valid = self.min_digits >= 1
            && self.min_digits <= self.max_digits
            && self.max_digits <= MAX_DIGITS_PER_AXIS;
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidDigitRange {
                min: self.min_digits,
                max: self.max_digits,
            })
        }
    }
}

impl Default for BngCentrePointConfig {
    fn default() -> Self {
        Self {
            min_digits: MAX_DIGITS_PER_AXIS,
            max_digits: MAX_DIGITS_PER_AXIS,
            accept_lowercase: false,
            squares: SquareSet::Land,
        }
    }
}
