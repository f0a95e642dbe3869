//! Test double for exercising the English fallback path.

use super::{Arguments, I18nError, MessageLookup};

/// A catalogue with no entries; every lookup reports the key as missing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MissingCatalogue;

impl MessageLookup for MissingCatalogue {
    fn lookup(
        &self,
        key: &str,
        attribute: Option<&str>,
        _args: &Arguments<'_>,
    ) -> Result<String, I18nError> {
        let key = attribute.map_or_else(|| key.to_owned(), |name| format!("{key}.{name}"));
        Err(I18nError::MissingMessage {
            key,
            locale: String::from("none"),
        })
    }
}
