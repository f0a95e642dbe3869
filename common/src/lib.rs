//! Shared datatype infrastructure providing validation failures, the datatype
//! capability trait, tile identifiers, and localisation for Warden plugins.

pub mod datatype;
pub mod diagnostics;
pub mod i18n;
pub mod tile;

pub use datatype::{Datatype, FieldContext};
pub use diagnostics::{FailureBuilder, ValidationFailure, validation_failure};
pub use i18n::{
    Arguments, FALLBACK_LOCALE, FailureMessages, I18nError, Localizer, MessageRequest,
    localise_or_fallback,
};
pub use tile::{GraphId, NodeId, NodegroupId, ResourceId, Tile, TileId};
