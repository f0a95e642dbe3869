//! Fluent catalogues for Warden validation failures.
//!
//! Every bundled locale under `locales/` is compiled into the binary, so a
//! datatype can phrase a rejection without touching the filesystem. Datatypes
//! hold a [`Localizer`] for one catalogue and resolve the primary, note and
//! help text of a failure through [`localise_or_fallback`], which substitutes
//! fixed English wording when a translation is missing.
//!
//! Choosing *which* catalogue to use (command line, `WARDEN_LOCALE`,
//! `warden.toml`) belongs to the `warden` configuration crate.

use fluent_templates::static_loader;

/// Re-export the Fluent value type for constructing message arguments.
pub use fluent_templates::fluent_bundle::FluentValue;

static_loader! {
    static CATALOGUES = {
        locales: "../locales",
        fallback_language: "en-GB",
        // Fluent's Unicode isolation marks stay on; strip them for terminals.
    };
}

/// Locale used when no bundled catalogue matches a request.
pub const FALLBACK_LOCALE: &str = "en-GB";

mod catalogue;
mod messages;
pub mod testing;

pub use catalogue::{Arguments, I18nError, Localizer, bundled_locales};
pub use messages::{
    FailureMessages, MessageLookup, MessageRequest, localise_or_fallback, strip_isolation_marks,
};
