//! The per-locale message catalogue handed to datatypes.

use std::borrow::Cow;
use std::collections::HashMap;

use fluent_templates::Loader;
use once_cell::sync::Lazy;
use thiserror::Error;
use unic_langid::{LanguageIdentifier, langid};

use super::{CATALOGUES, FluentValue};

/// Named arguments interpolated into a failure message.
pub type Arguments<'a> = HashMap<Cow<'static, str>, FluentValue<'a>>;

/// Error raised when a catalogue cannot phrase a failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum I18nError {
    /// The catalogue has no entry for the key (or `key.attribute`).
    #[error("no `{key}` message in the {locale} catalogue")]
    MissingMessage {
        /// Fluent identifier, including any attribute suffix.
        key: String,
        /// Locale of the catalogue searched.
        locale: String,
    },
}

const FALLBACK_LANGUAGE: LanguageIdentifier = langid!("en-GB");

static BUNDLED: Lazy<Vec<LanguageIdentifier>> = Lazy::new(|| {
    let mut languages: Vec<LanguageIdentifier> = CATALOGUES.locales().cloned().collect();
    languages.sort_unstable_by_key(ToString::to_string);
    languages
});

/// Returns the tags of every bundled catalogue, sorted.
///
/// ```
/// use warden_common::i18n::bundled_locales;
///
/// assert_eq!(bundled_locales(), ["cy", "en-GB"]);
/// ```
#[must_use]
pub fn bundled_locales() -> Vec<String> {
    BUNDLED.iter().map(ToString::to_string).collect()
}

/// Phrases failures from one bundled catalogue.
///
/// A localizer never fails to build: tags without a bundled catalogue give
/// the `en-GB` catalogue and record that the fallback was taken.
#[derive(Clone, Debug)]
pub struct Localizer {
    language: LanguageIdentifier,
    tag: String,
    fallback_used: bool,
}

impl Localizer {
    /// Opens the catalogue for `locale`, or the `en-GB` one.
    ///
    /// Tags are matched after canonicalisation, so `en-gb` finds `en-GB`.
    ///
    /// ```
    /// use warden_common::i18n::Localizer;
    ///
    /// let welsh = Localizer::new(Some("cy"));
    /// assert_eq!(welsh.locale(), "cy");
    /// assert!(!welsh.used_fallback());
    ///
    /// let unknown = Localizer::new(Some("zz"));
    /// assert_eq!(unknown.locale(), "en-GB");
    /// assert!(unknown.used_fallback());
    /// ```
    #[must_use]
    pub fn new(locale: Option<&str>) -> Self {
        match locale.and_then(Self::bundled) {
            Some(language) => Self::open(language, false),
            None => Self::open(FALLBACK_LANGUAGE, true),
        }
    }

    /// Whether `locale` names a bundled catalogue.
    #[must_use]
    pub fn supports(locale: &str) -> bool {
        Self::bundled(locale).is_some()
    }

    /// Returns the tag of the catalogue in use.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.tag
    }

    /// Whether the requested locale had no catalogue.
    #[must_use]
    pub const fn used_fallback(&self) -> bool {
        self.fallback_used
    }

    /// Formats `key`, or its `attribute` when one is named, with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::MissingMessage`] when neither this catalogue nor
    /// the fallback defines the entry.
    pub fn format(
        &self,
        key: &str,
        attribute: Option<&str>,
        args: &Arguments<'_>,
    ) -> Result<String, I18nError> {
        let id = match attribute {
            Some(name) => format!("{key}.{name}"),
            None => key.to_owned(),
        };
        CATALOGUES
            .try_lookup_complete(&self.language, &id, Some(args))
            .ok_or_else(|| I18nError::MissingMessage {
                key: id,
                locale: self.tag.clone(),
            })
    }

    fn bundled(locale: &str) -> Option<LanguageIdentifier> {
        let language = locale.parse::<LanguageIdentifier>().ok()?;
        BUNDLED.contains(&language).then_some(language)
    }

    fn open(language: LanguageIdentifier, fallback_used: bool) -> Self {
        Self {
            tag: language.to_string(),
            language,
            fallback_used,
        }
    }
}
