//! Choosing the message catalogue for a run.
//!
//! The first candidate naming a bundled catalogue wins: the command line,
//! then `WARDEN_LOCALE`, then `locale` in `warden.toml`. Candidates Warden
//! ships no catalogue for are logged and skipped, and `en-GB` is used when
//! nothing matches.

use std::fmt;

use log::{debug, warn};
use warden_common::Localizer;

use crate::config::SharedConfig;

/// Environment variable consulted by [`SharedConfig::choose_locale`].
pub const LOCALE_ENV_VAR: &str = "WARDEN_LOCALE";

const LOG_TARGET: &str = "warden::locale";

/// Where the chosen locale came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LocaleSource {
    /// The `--locale` flag.
    CommandLine,
    /// The `WARDEN_LOCALE` environment variable.
    Environment,
    /// The `locale` key of `warden.toml`.
    Configuration,
    /// No candidate matched; the `en-GB` catalogue is in use.
    Fallback,
}

impl fmt::Display for LocaleSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::CommandLine => "--locale",
            Self::Environment => LOCALE_ENV_VAR,
            Self::Configuration => "warden.toml",
            Self::Fallback => "the fallback",
        })
    }
}

/// A localizer together with the source that selected it.
#[derive(Clone, Debug)]
pub struct LocaleChoice {
    localizer: Localizer,
    source: LocaleSource,
}

impl LocaleChoice {
    /// Where the locale came from.
    #[must_use]
    pub const fn source(&self) -> LocaleSource {
        self.source
    }

    /// Tag of the chosen catalogue.
    #[must_use]
    pub fn locale(&self) -> &str {
        self.localizer.locale()
    }

    /// Logs the choice at `debug` against `target`.
    pub fn log(&self, target: &str) {
        debug!(target: target, "messages in {} (from {})", self.locale(), self.source);
    }

    /// Consumes the choice, yielding the localizer.
    #[must_use]
    pub fn into_localizer(self) -> Localizer {
        self.localizer
    }
}

impl SharedConfig {
    /// Chooses the message catalogue, preferring `command_line`, then
    /// `WARDEN_LOCALE`, then this configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden::{LocaleSource, SharedConfig};
    ///
    /// let choice = SharedConfig::default().choose_locale(Some("cy"));
    /// assert_eq!(choice.locale(), "cy");
    /// assert_eq!(choice.source(), LocaleSource::CommandLine);
    /// ```
    #[must_use]
    pub fn choose_locale(&self, command_line: Option<&str>) -> LocaleChoice {
        let environment = std::env::var(LOCALE_ENV_VAR).ok();
        choose([
            (LocaleSource::CommandLine, command_line),
            (LocaleSource::Environment, environment.as_deref()),
            (LocaleSource::Configuration, self.locale()),
        ])
    }

    /// Returns the localizer for components with no command line, logging
    /// the choice against `target`.
    #[must_use]
    pub fn localizer(&self, target: &str) -> Localizer {
        let choice = self.choose_locale(None);
        choice.log(target);
        choice.into_localizer()
    }
}

/// Drops blank locale candidates.
pub(crate) fn non_blank(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|tag| !tag.is_empty())
}

fn choose<const N: usize>(candidates: [(LocaleSource, Option<&str>); N]) -> LocaleChoice {
    candidates
        .into_iter()
        .find_map(|(source, raw)| {
            let tag = non_blank(raw)?;
            if Localizer::supports(tag) {
                return Some(LocaleChoice {
                    localizer: Localizer::new(Some(tag)),
                    source,
                });
            }
            warn!(target: LOG_TARGET, "ignoring locale `{tag}` from {source}: no bundled catalogue");
            None
        })
        .unwrap_or_else(|| LocaleChoice {
            localizer: Localizer::new(None),
            source: LocaleSource::Fallback,
        })
}
