//! Grid reference parsing and centre-point arithmetic.
//!
//! A reference such as `SU1025169962` names a 100 km square followed by an
//! easting and a northing of equal length. With `n` digits per axis the
//! reference denotes a square `10^(5 - n)` metres across; its centre point is
//! the south-west corner plus half that resolution on each axis.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Value, json};
use warden::{BngCentrePointConfig, MAX_DIGITS_PER_AXIS};

use crate::error::{GridReferenceError, Result};
use crate::grid::{EXTENT_EAST, EXTENT_NORTH, GridSquare};

/// Side of a 100 km grid square in metres.
pub const SQUARE_METRES: u32 = 100_000;

/// EPSG code of the British National Grid coordinate reference system.
pub const EPSG_CODE: u32 = 27_700;

/// A parsed British National Grid reference.
///
/// # Examples
///
/// ```
/// use bng_centre_point::GridReference;
///
/// let reference: GridReference = "SU1025169962".parse().expect("valid reference");
/// assert_eq!(reference.spaced(), "SU 10251 69962");
/// assert_eq!(reference.centre_point().easting(), 410_251.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridReference {
    square: GridSquare,
    easting: u32,
    northing: u32,
    digits: u8,
}

impl GridReference {
    /// Parses `value` under the rules in `config`.
    ///
    /// # Errors
    ///
    /// Returns the first [`GridReferenceError`] the value violates.
    pub fn parse(value: &str, config: &BngCentrePointConfig) -> Result<Self> {
        if value.is_empty() {
            return Err(GridReferenceError::Empty);
        }
        if let Some(index) = value.chars().position(char::is_whitespace) {
            return Err(GridReferenceError::Whitespace {
                position: index + 1,
            });
        }

        let mut chars = value.chars();
        let (Some(first), Some(second)) = (chars.next(), chars.next()) else {
            return Err(GridReferenceError::MalformedPrefix);
        };
        if !(first.is_ascii_alphabetic() && second.is_ascii_alphabetic()) {
            return Err(GridReferenceError::MalformedPrefix);
        }

        let supplied = format!("{first}{second}");
        if (first.is_ascii_lowercase() || second.is_ascii_lowercase()) && !config.accept_lowercase
        {
            return Err(GridReferenceError::LowercasePrefix { square: supplied });
        }
        let square =
            GridSquare::from_letters(first.to_ascii_uppercase(), second.to_ascii_uppercase())
                .filter(|candidate| candidate.is_recognised(config.squares))
                .ok_or(GridReferenceError::UnknownSquare { square: supplied })?;

        let digits = chars.as_str();
        if let Some((index, character)) = digits
            .chars()
            .enumerate()
            .find(|(_, character)| !character.is_ascii_digit())
        {
            return Err(GridReferenceError::NonDigit {
                character,
                position: index + 3,
            });
        }

        let count = digits.len();
        if count % 2 != 0 {
            return Err(GridReferenceError::UnevenDigits { count });
        }

        let per_axis = count / 2;
        let min = config.min_digits.max(1);
        let max = config.max_digits.min(MAX_DIGITS_PER_AXIS);
        let precision = u8::try_from(per_axis)
            .ok()
            .filter(|candidate| (min..=max).contains(candidate))
            .ok_or(GridReferenceError::PrecisionOutOfRange {
                digits: per_axis,
                min,
                max,
            })?;

        let (easting, northing) = digits.split_at(per_axis);
        Ok(Self {
            square,
            easting: digit_value(easting),
            northing: digit_value(northing),
            digits: precision,
        })
    }

    /// Builds the reference of the given precision containing the point
    /// `(easting, northing)` in metres.
    ///
    /// # Errors
    ///
    /// Returns [`GridReferenceError::PrecisionOutOfRange`] unless `digits` is
    /// between 1 and 5, and [`GridReferenceError::OutOfExtent`] for points
    /// outside the national grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use bng_centre_point::GridReference;
    ///
    /// let reference = GridReference::from_coordinates(410_251.5, 169_962.5, 5)?;
    /// assert_eq!(reference.to_string(), "SU1025169962");
    /// # Ok::<(), bng_centre_point::GridReferenceError>(())
    /// ```
    pub fn from_coordinates(easting: f64, northing: f64, digits: u8) -> Result<Self> {
        if !(1..=MAX_DIGITS_PER_AXIS).contains(&digits) {
            return Err(GridReferenceError::PrecisionOutOfRange {
                digits: usize::from(digits),
                min: 1,
                max: MAX_DIGITS_PER_AXIS,
            });
        }
        let out_of_extent = || GridReferenceError::OutOfExtent { easting, northing };
        let east = whole_metres(easting, EXTENT_EAST).ok_or_else(out_of_extent)?;
        let north = whole_metres(northing, EXTENT_NORTH).ok_or_else(out_of_extent)?;

        let square = GridSquare::from_offsets(
            u8::try_from(east / SQUARE_METRES).map_err(|_| out_of_extent())?,
            u8::try_from(north / SQUARE_METRES).map_err(|_| out_of_extent())?,
        )
        .ok_or_else(out_of_extent)?;
        let resolution = resolution_for(digits);

        Ok(Self {
            square,
            easting: (east % SQUARE_METRES) / resolution,
            northing: (north % SQUARE_METRES) / resolution,
            digits,
        })
    }

    /// Returns the 100 km square.
    #[must_use]
    pub const fn square(&self) -> GridSquare {
        self.square
    }

    /// Returns the easting digits as a number.
    #[must_use]
    pub const fn easting(&self) -> u32 {
        self.easting
    }

    /// Returns the northing digits as a number.
    #[must_use]
    pub const fn northing(&self) -> u32 {
        self.northing
    }

    /// Returns the number of digits per axis.
    #[must_use]
    pub const fn digits(&self) -> u8 {
        self.digits
    }

    /// Returns the side of the square the reference denotes, in metres.
    #[must_use]
    pub fn resolution_metres(&self) -> u32 {
        resolution_for(self.digits)
    }

    /// Returns the south-west corner of the referenced square in metres from
    /// the false origin.
    #[must_use]
    pub fn south_west(&self) -> (u32, u32) {
        let resolution = self.resolution_metres();
        (
            u32::from(self.square.east()) * SQUARE_METRES + self.easting * resolution,
            u32::from(self.square.north()) * SQUARE_METRES + self.northing * resolution,
        )
    }

    /// Returns the centre of the referenced square.
    #[must_use]
    pub fn centre_point(&self) -> CentrePoint {
        let (west, south) = self.south_west();
        let half = f64::from(self.resolution_metres()) / 2.0;
        CentrePoint {
            easting: f64::from(west) + half,
            northing: f64::from(south) + half,
        }
    }

    /// Renders the reference with spaces between its three groups.
    #[must_use]
    pub fn spaced(&self) -> String {
        let width = usize::from(self.digits);
        format!(
            "{} {:0width$} {:0width$}",
            self.square, self.easting, self.northing
        )
    }
}

impl FromStr for GridReference {
    type Err = GridReferenceError;

    fn from_str(value: &str) -> Result<Self> {
        Self::parse(value, &BngCentrePointConfig::default())
    }
}

impl fmt::Display for GridReference {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::from(self.digits);
        write!(
            formatter,
            "{}{:0width$}{:0width$}",
            self.square, self.easting, self.northing
        )
    }
}

/// The centre of the square a grid reference denotes, in metres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CentrePoint {
    easting: f64,
    northing: f64,
}

impl CentrePoint {
    /// Returns the easting in metres.
    #[must_use]
    pub const fn easting(&self) -> f64 {
        self.easting
    }

    /// Returns the northing in metres.
    #[must_use]
    pub const fn northing(&self) -> f64 {
        self.northing
    }

    /// Renders the point as a GeoJSON geometry in EPSG:27700.
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Point",
            "coordinates": [self.easting, self.northing],
            "crs": {
                "type": "name",
                "properties": { "name": format!("EPSG:{EPSG_CODE}") },
            },
        })
    }
}

impl fmt::Display for CentrePoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}, {}", self.easting, self.northing)
    }
}

fn resolution_for(digits: u8) -> u32 {
    10_u32.pow(u32::from(MAX_DIGITS_PER_AXIS.saturating_sub(digits)))
}

fn digit_value(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0, |total, digit| total * 10 + u32::from(digit - b'0'))
}

fn whole_metres(metres: f64, squares: u8) -> Option<u32> {
    let limit = f64::from(squares) * f64::from(SQUARE_METRES);
    if !(0.0..limit).contains(&metres) {
        return None;
    }
    // Finite, non-negative and below the extent: the cast cannot truncate.
    Some(metres.floor() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use warden::SquareSet;

    #[fixture]
    fn config() -> BngCentrePointConfig {
        BngCentrePointConfig::default()
    }

    #[rstest]
    fn parses_a_metre_reference(config: BngCentrePointConfig) {
        let reference = GridReference::parse("SU1025169962", &config).expect("valid reference");

        assert_eq!(reference.square().to_string(), "SU");
        assert_eq!((reference.easting(), reference.northing()), (10_251, 69_962));
        assert_eq!(reference.digits(), 5);
        assert_eq!(reference.resolution_metres(), 1);
    }

    #[rstest]
    #[case("", GridReferenceError::Empty)]
    #[case("SU10251 6996", GridReferenceError::Whitespace { position: 8 })]
    #[case(" SU1025169962", GridReferenceError::Whitespace { position: 1 })]
    #[case("SU1025169962\n", GridReferenceError::Whitespace { position: 13 })]
    #[case("S11025169962", GridReferenceError::MalformedPrefix)]
    #[case("S", GridReferenceError::MalformedPrefix)]
    #[case("kkj23kj23d23", GridReferenceError::LowercasePrefix { square: "kk".into() })]
    #[case("Su1025169962", GridReferenceError::LowercasePrefix { square: "Su".into() })]
    #[case("KK1025169962", GridReferenceError::UnknownSquare { square: "KK".into() })]
    #[case("NE1025169962", GridReferenceError::UnknownSquare { square: "NE".into() })]
    #[case("SU10251x9962", GridReferenceError::NonDigit { character: 'x', position: 8 })]
    #[case("SU102516996", GridReferenceError::UnevenDigits { count: 9 })]
    #[case("SU16", GridReferenceError::PrecisionOutOfRange { digits: 1, min: 5, max: 5 })]
    #[case("SU", GridReferenceError::PrecisionOutOfRange { digits: 0, min: 5, max: 5 })]
    fn rejects_invalid_references(
        config: BngCentrePointConfig,
        #[case] value: &str,
        #[case] expected: GridReferenceError,
    ) {
        assert_eq!(GridReference::parse(value, &config), Err(expected));
    }

    #[rstest]
    fn lowercase_is_accepted_when_configured() {
        let config = BngCentrePointConfig {
            accept_lowercase: true,
            ..BngCentrePointConfig::default()
        };

        let reference = GridReference::parse("su1025169962", &config).expect("valid reference");

        assert_eq!(reference.to_string(), "SU1025169962");
    }

    #[rstest]
    fn sea_squares_are_accepted_with_the_full_extent() {
        let config = BngCentrePointConfig {
            squares: SquareSet::Extent,
            ..BngCentrePointConfig::default()
        };

        assert!(GridReference::parse("NE1025169962", &config).is_ok());
    }

    #[rstest]
    #[case("SU16", 10_000, (410_000, 160_000), (415_000.0, 165_000.0))]
    #[case("SU1069", 1_000, (410_000, 169_000), (410_500.0, 169_500.0))]
    #[case("SU1025169962", 1, (410_251, 169_962), (410_251.5, 169_962.5))]
    #[case("SV0000000000", 1, (0, 0), (0.5, 0.5))]
    #[case("HP0000000000", 1, (400_000, 1_200_000), (400_000.5, 1_200_000.5))]
    fn locates_the_referenced_square(
        #[case] value: &str,
        #[case] resolution: u32,
        #[case] south_west: (u32, u32),
        #[case] centre: (f64, f64),
    ) {
        let config = BngCentrePointConfig {
            min_digits: 1,
            ..BngCentrePointConfig::default()
        };

        let reference = GridReference::parse(value, &config).expect("valid reference");
        let point = reference.centre_point();

        assert_eq!(reference.resolution_metres(), resolution);
        assert_eq!(reference.south_west(), south_west);
        assert_eq!((point.easting(), point.northing()), centre);
    }

    #[rstest]
    #[case(410_251.5, 169_962.5, 5, "SU1025169962")]
    #[case(410_251.5, 169_962.5, 2, "SU1069")]
    #[case(651_409.0, 313_177.0, 3, "TG514131")]
    fn builds_references_from_coordinates(
        #[case] easting: f64,
        #[case] northing: f64,
        #[case] digits: u8,
        #[case] expected: &str,
    ) {
        let reference =
            GridReference::from_coordinates(easting, northing, digits).expect("inside the grid");

        assert_eq!(reference.to_string(), expected);
    }

    #[rstest]
    #[case(-1.0, 0.0)]
    #[case(700_000.0, 0.0)]
    #[case(0.0, 1_300_000.0)]
    #[case(f64::NAN, 0.0)]
    fn rejects_coordinates_outside_the_grid(#[case] easting: f64, #[case] northing: f64) {
        let outcome = GridReference::from_coordinates(easting, northing, 5);

        assert!(matches!(outcome, Err(GridReferenceError::OutOfExtent { .. })));
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    fn rejects_unsupported_precision(#[case] digits: u8) {
        let outcome = GridReference::from_coordinates(1.0, 1.0, digits);

        assert!(matches!(
            outcome,
            Err(GridReferenceError::PrecisionOutOfRange { min: 1, max: 5, .. })
        ));
    }

    #[rstest]
    fn renders_spaced_and_compact_forms() {
        let reference = GridReference::from_coordinates(1_234.0, 5_678.0, 4).expect("inside");

        assert_eq!(reference.to_string(), "SV01230567");
        assert_eq!(reference.spaced(), "SV 0123 0567");
    }

    #[rstest]
    fn centre_point_serialises_as_geojson() {
        let reference: GridReference = "SU1025169962".parse().expect("valid reference");

        let geometry = reference.centre_point().to_geojson();

        assert_eq!(geometry["type"], "Point");
        assert_eq!(geometry["coordinates"], json!([410_251.5, 169_962.5]));
        assert_eq!(geometry["crs"]["properties"]["name"], "EPSG:27700");
    }
}
