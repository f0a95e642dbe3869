//! The `bngcentrepoint` datatype.
//!
//! Tile values are JSON strings holding a grid reference. Rejections are
//! reported as localised [`ValidationFailure`]s; when a translation is missing
//! the datatype falls back to fixed English strings so a failure always
//! carries a message.

use std::borrow::Cow;

use log::debug;
use serde_json::Value;
use warden::{BngCentrePointConfig, SharedConfig};
use warden_common::i18n::FluentValue;
use warden_common::{
    Arguments, Datatype, FailureBuilder, FailureMessages, FieldContext, MessageRequest,
    ValidationFailure, localise_or_fallback, validation_failure,
};

use crate::error::GridReferenceError;
use crate::reference::{CentrePoint, GridReference};

/// Identifier under which the datatype is registered.
pub const DATATYPE_NAME: &str = "bngcentrepoint";

const LOG_TARGET: &str = "bng_centre_point";

/// Validates British National Grid centre-point references.
///
/// # Examples
///
/// ```
/// use bng_centre_point::BngCentrePoint;
/// use serde_json::json;
/// use warden_common::{Datatype, FieldContext, Localizer};
///
/// let datatype = BngCentrePoint::default();
/// let localizer = Localizer::new(None);
/// let field = FieldContext::detached(&localizer);
///
/// assert!(datatype.validate(&json!("SU1025169962"), &field).is_empty());
/// assert_eq!(datatype.validate(&json!("SU16"), &field).len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BngCentrePoint {
    config: BngCentrePointConfig,
}

impl BngCentrePoint {
    /// Creates the datatype with explicit settings.
    #[must_use]
    pub const fn new(config: BngCentrePointConfig) -> Self {
        Self { config }
    }

    /// Creates the datatype from the workspace configuration.
    #[must_use]
    pub fn from_shared(config: &SharedConfig) -> Self {
        Self::new(config.bng_centre_point.clone())
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn config(&self) -> &BngCentrePointConfig {
        &self.config
    }

    /// Parses a tile value into a grid reference.
    ///
    /// Returns `None` for values that are not strings.
    #[must_use]
    pub fn reference(&self, value: &Value) -> Option<Result<GridReference, GridReferenceError>> {
        value
            .as_str()
            .map(|text| GridReference::parse(text, &self.config))
    }

    /// Returns the centre point of a valid tile value.
    #[must_use]
    pub fn centre_point(&self, value: &Value) -> Option<CentrePoint> {
        self.reference(value)
            .and_then(Result::ok)
            .map(|reference| reference.centre_point())
    }
}

impl Datatype for BngCentrePoint {
    fn name(&self) -> &str {
        DATATYPE_NAME
    }

    fn validate(&self, value: &Value, field: &FieldContext<'_>) -> Vec<ValidationFailure> {
        match value {
            Value::Null => Vec::new(),
            Value::String(raw) => match GridReference::parse(raw, &self.config) {
                Ok(reference) => {
                    debug!(target: LOG_TARGET, "accepted {reference}");
                    Vec::new()
                }
                Err(error) => vec![reject(raw, &error, field)],
            },
            Value::Bool(_) => vec![reject_kind(JsonKind::Boolean, field)],
            Value::Number(_) => vec![reject_kind(JsonKind::Number, field)],
            Value::Array(_) => vec![reject_kind(JsonKind::List, field)],
            Value::Object(_) => vec![reject_kind(JsonKind::Object, field)],
        }
    }

    fn normalise(&self, value: &Value) -> Value {
        match self.reference(value) {
            Some(Ok(reference)) => Value::String(reference.to_string()),
            _ => value.clone(),
        }
    }

    fn display_value(&self, value: &Value) -> Option<String> {
        match self.reference(value)? {
            Ok(reference) => Some(reference.spaced()),
            Err(_) => value.as_str().map(str::to_owned),
        }
    }
}

fn reject(raw: &str, error: &GridReferenceError, field: &FieldContext<'_>) -> ValidationFailure {
    debug!(target: LOG_TARGET, "rejected {raw:?}: {error}");

    let args = arguments(raw, error);
    let key = message_key(error);
    let request = MessageRequest {
        datatype: LOG_TARGET,
        key,
        args: &args,
    };
    let messages =
        localise_or_fallback(field.localizer(), request, || fallback_messages(raw, error));
    build_failure(messages, field).value(raw).build()
}

fn reject_kind(kind: JsonKind, field: &FieldContext<'_>) -> ValidationFailure {
    debug!(target: LOG_TARGET, "rejected non-string value of kind {}", kind.keyword());

    let mut args = Arguments::default();
    args.insert(Cow::Borrowed("kind"), FluentValue::from(kind.keyword()));
    let request = MessageRequest {
        datatype: LOG_TARGET,
        key: "bng_centre_point-not-a-string",
        args: &args,
    };
    let messages = localise_or_fallback(field.localizer(), request, || {
        FailureMessages::new(
            format!("A grid reference must be text, not {}.", kind.english()),
            String::from("Centre points are stored as text references."),
            String::from("Quote the reference in the submitted data."),
        )
    });
    build_failure(messages, field).build()
}

fn build_failure(messages: FailureMessages, field: &FieldContext<'_>) -> FailureBuilder {
    let (primary, note, help) = messages.into_parts();
    validation_failure(DATATYPE_NAME, primary)
        .node(field.node())
        .note(note)
        .help(help)
}

fn message_key(error: &GridReferenceError) -> &'static str {
    match error {
        GridReferenceError::Empty => "bng_centre_point-empty",
        GridReferenceError::Whitespace { .. } => "bng_centre_point-whitespace",
        GridReferenceError::MalformedPrefix => "bng_centre_point-malformed-prefix",
        GridReferenceError::LowercasePrefix { .. } => "bng_centre_point-lowercase-prefix",
        GridReferenceError::UnknownSquare { .. } => "bng_centre_point-unknown-square",
        GridReferenceError::NonDigit { .. } => "bng_centre_point-non-digit",
        GridReferenceError::UnevenDigits { .. } => "bng_centre_point-uneven-digits",
        GridReferenceError::PrecisionOutOfRange { .. } => "bng_centre_point-precision",
        GridReferenceError::OutOfExtent { .. } => "bng_centre_point-out-of-extent",
    }
}

fn arguments<'a>(raw: &'a str, error: &GridReferenceError) -> Arguments<'a> {
    let mut args = Arguments::default();
    args.insert(Cow::Borrowed("value"), FluentValue::from(raw));
    match error {
        GridReferenceError::Empty | GridReferenceError::MalformedPrefix => {}
        GridReferenceError::Whitespace { position } => {
            args.insert(Cow::Borrowed("position"), FluentValue::from(*position));
        }
        GridReferenceError::LowercasePrefix { square } => {
            args.insert(Cow::Borrowed("square"), FluentValue::from(square.clone()));
            args.insert(
                Cow::Borrowed("upper"),
                FluentValue::from(square.to_ascii_uppercase()),
            );
        }
        GridReferenceError::UnknownSquare { square } => {
            args.insert(Cow::Borrowed("square"), FluentValue::from(square.clone()));
        }
        GridReferenceError::NonDigit {
            character,
            position,
        } => {
            args.insert(
                Cow::Borrowed("character"),
                FluentValue::from(character.to_string()),
            );
            args.insert(Cow::Borrowed("position"), FluentValue::from(*position));
        }
        GridReferenceError::UnevenDigits { count } => {
            args.insert(Cow::Borrowed("count"), FluentValue::from(*count));
        }
        GridReferenceError::PrecisionOutOfRange { digits, min, max } => {
            let span = if min == max { "exact" } else { "range" };
            args.insert(Cow::Borrowed("span"), FluentValue::from(span));
            args.insert(Cow::Borrowed("digits"), FluentValue::from(*digits));
            args.insert(Cow::Borrowed("min"), FluentValue::from(*min));
            args.insert(Cow::Borrowed("max"), FluentValue::from(*max));
        }
        GridReferenceError::OutOfExtent { easting, northing } => {
            args.insert(Cow::Borrowed("easting"), FluentValue::from(*easting));
            args.insert(Cow::Borrowed("northing"), FluentValue::from(*northing));
        }
    }
    args
}

fn fallback_messages(raw: &str, error: &GridReferenceError) -> FailureMessages {
    let help = match error {
        GridReferenceError::Empty => String::from("Enter a reference such as SU1025169962."),
        GridReferenceError::Whitespace { .. } => String::from("Remove the spaces."),
        GridReferenceError::LowercasePrefix { square } => {
            format!("Write the square as {}.", square.to_ascii_uppercase())
        }
        GridReferenceError::PrecisionOutOfRange { min, max, .. } if min == max => {
            format!("Supply {max} digits for both the easting and the northing.")
        }
        GridReferenceError::PrecisionOutOfRange { min, max, .. } => format!(
            "Supply between {min} and {max} digits for both the easting and the northing."
        ),
        _ => String::from("Check the reference against the grid square letters and digits."),
    };
    FailureMessages::new(
        format!("Grid reference {raw:?} is invalid: {error}."),
        String::from(
            "British National Grid references are two square letters followed by an easting \
             and a northing.",
        ),
        help,
    )
}

/// JSON shapes a tile value can take other than a string or null.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum JsonKind {
    Boolean,
    Number,
    List,
    Object,
}

impl JsonKind {
    /// Selector keyword passed to the translation as `$kind`.
    const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::List => "list",
            Self::Object => "object",
        }
    }

    const fn english(self) -> &'static str {
        match self {
            Self::Boolean => "a true or false value",
            Self::Number => "a number",
            Self::List => "a list",
            Self::Object => "an object",
        }
    }
}
