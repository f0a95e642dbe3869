//! Resolving the three strings attached to a validation failure.

use std::borrow::Cow;

use log::debug;

use super::{Arguments, I18nError, Localizer};

/// Source of failure wording, implemented by [`Localizer`] and test doubles.
pub trait MessageLookup {
    /// Formats `key`, or `key.attribute` when an attribute is named.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError`] when the entry is missing.
    fn lookup(
        &self,
        key: &str,
        attribute: Option<&str>,
        args: &Arguments<'_>,
    ) -> Result<String, I18nError>;
}

impl MessageLookup for Localizer {
    fn lookup(
        &self,
        key: &str,
        attribute: Option<&str>,
        args: &Arguments<'_>,
    ) -> Result<String, I18nError> {
        self.format(key, attribute, args)
    }
}

/// The primary, note and help strings attached to a validation failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureMessages {
    primary: String,
    note: String,
    help: String,
}

impl FailureMessages {
    /// Bundles the three strings.
    #[must_use]
    pub const fn new(primary: String, note: String, help: String) -> Self {
        Self {
            primary,
            note,
            help,
        }
    }

    /// Formats the message at `key` with its `.note` and `.help` attributes.
    ///
    /// # Errors
    ///
    /// Returns the first missing entry.
    pub fn lookup(
        catalogue: &impl MessageLookup,
        key: &str,
        args: &Arguments<'_>,
    ) -> Result<Self, I18nError> {
        Ok(Self::new(
            catalogue.lookup(key, None, args)?,
            catalogue.lookup(key, Some("note"), args)?,
            catalogue.lookup(key, Some("help"), args)?,
        ))
    }

    /// The headline.
    #[must_use]
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Context for the headline.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// What the user should change.
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Splits the set into `(primary, note, help)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String, String) {
        (self.primary, self.note, self.help)
    }
}

/// A failure to phrase: the message key, its arguments and the log target.
#[derive(Clone, Copy)]
pub struct MessageRequest<'a> {
    /// Log target of the datatype or harness raising the failure.
    pub datatype: &'a str,
    /// Fluent message key.
    pub key: &'a str,
    /// Arguments interpolated into the message and its attributes.
    pub args: &'a Arguments<'a>,
}

/// Phrases a failure, substituting `fallback` when the catalogue cannot.
///
/// A rejected value must always carry a message, so a missing translation
/// is logged at `debug` against the request's target instead of surfacing.
///
/// # Examples
///
/// ```
/// use warden_common::i18n::testing::MissingCatalogue;
/// use warden_common::i18n::{Arguments, FailureMessages, MessageRequest, localise_or_fallback};
///
/// let args = Arguments::default();
/// let request = MessageRequest { datatype: "bng_centre_point", key: "bng_centre_point-empty", args: &args };
/// let messages = localise_or_fallback(&MissingCatalogue, request, || {
///     FailureMessages::new("Empty".into(), "Note".into(), "Help".into())
/// });
/// assert_eq!(messages.primary(), "Empty");
/// ```
#[must_use]
pub fn localise_or_fallback(
    catalogue: &impl MessageLookup,
    request: MessageRequest<'_>,
    fallback: impl FnOnce() -> FailureMessages,
) -> FailureMessages {
    FailureMessages::lookup(catalogue, request.key, request.args).unwrap_or_else(|error| {
        debug!(target: request.datatype, "{error}; using the English fallback");
        fallback()
    })
}

const ISOLATION_MARKS: [char; 2] = ['\u{2068}', '\u{2069}'];

/// Removes the Unicode isolation marks Fluent places around arguments.
///
/// ```
/// use warden_common::i18n::strip_isolation_marks;
///
/// assert_eq!(strip_isolation_marks("\u{2068}SU16\u{2069} is short"), "SU16 is short");
/// ```
#[must_use]
pub fn strip_isolation_marks(text: &str) -> Cow<'_, str> {
    if text.contains(ISOLATION_MARKS) {
        Cow::Owned(text.replace(ISOLATION_MARKS, ""))
    } else {
        Cow::Borrowed(text)
    }
}
