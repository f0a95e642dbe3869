//! Error types for grid reference parsing.

use thiserror::Error;

/// Reasons a grid reference is rejected.
///
/// Parsing stops at the first problem found, checking in declaration order.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GridReferenceError {
    /// The value is empty.
    #[error("grid reference is empty")]
    Empty,

    /// The value contains whitespace.
    #[error("grid reference contains whitespace at position {position}")]
    Whitespace {
        /// 1-based character position of the first whitespace character.
        position: usize,
    },

    /// The value does not start with two letters.
    #[error("grid reference must start with two grid square letters")]
    MalformedPrefix,

    /// The square letters are lowercase and lowercase input is not accepted.
    #[error("grid square {square} must be written in capitals")]
    LowercasePrefix {
        /// The square letters as supplied.
        square: String,
    },

    /// The letters do not name a recognised 100 km square.
    #[error("{square} is not a recognised grid square")]
    UnknownSquare {
        /// The square letters as supplied.
        square: String,
    },

    /// A character after the square letters is not a digit.
    #[error("expected a digit but found {character:?} at position {position}")]
    NonDigit {
        /// The offending character.
        character: char,
        /// 1-based character position of the offending character.
        position: usize,
    },

    /// The digits cannot be split into equal easting and northing groups.
    #[error("{count} digits cannot be split into an easting and a northing")]
    UnevenDigits {
        /// Number of digits after the square letters.
        count: usize,
    },

    /// The number of digits per axis is outside the accepted range.
    #[error("{digits} digits per axis is outside the accepted range {min}..={max}")]
    PrecisionOutOfRange {
        /// Digits per axis found.
        digits: usize,
        /// Fewest digits accepted.
        min: u8,
        /// Most digits accepted.
        max: u8,
    },

    /// Coordinates lie outside the national grid extent.
    #[error("coordinates ({easting}, {northing}) lie outside the national grid")]
    OutOfExtent {
        /// Easting in metres.
        easting: f64,
        /// Northing in metres.
        northing: f64,
    },
}

/// Result type alias using [`GridReferenceError`].
pub type Result<T> = std::result::Result<T, GridReferenceError>;
