//! 100 km grid squares of the British National Grid.
//!
//! Square letters are drawn from a 25-letter alphabet (A to Z without I)
//! laid out as a 5 × 5 block. The first letter picks a 500 km square relative
//! to the false origin and the second picks the 100 km square inside it. Only
//! squares that fall within the 700 km × 1300 km national extent can be
//! constructed.

use std::fmt;

use warden::SquareSet;

/// The grid alphabet in reading order, top-left to bottom-right.
pub const GRID_ALPHABET: [u8; 25] = *b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Width of the national extent in 100 km squares.
pub const EXTENT_EAST: u8 = 7;

/// Height of the national extent in 100 km squares.
pub const EXTENT_NORTH: u8 = 13;

/// Squares that contain land in Great Britain.
pub const LAND_SQUARES: [&str; 56] = [
    "HP", "HT", "HU", "HW", "HX", "HY", "HZ", //
    "NA", "NB", "NC", "ND", "NF", "NG", "NH", "NJ", "NK", "NL", "NM", "NN", "NO", "NR", "NS",
    "NT", "NU", "NW", "NX", "NY", "NZ", //
    "OV", //
    "SC", "SD", "SE", "SH", "SJ", "SK", "SM", "SN", "SO", "SP", "SR", "SS", "ST", "SU", "SV",
    "SW", "SX", "SY", "SZ", //
    "TA", "TF", "TG", "TL", "TM", "TQ", "TR", "TV",
];

/// A 100 km square inside the national grid extent.
///
/// # Examples
///
/// ```
/// use bng_centre_point::GridSquare;
///
/// let square = GridSquare::from_letters('S', 'U').expect("SU is a grid square");
/// assert_eq!((square.east(), square.north()), (4, 1));
/// assert_eq!(square.to_string(), "SU");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSquare {
    letters: [u8; 2],
    east: u8,
    north: u8,
}

impl GridSquare {
    /// Looks up the square named by two uppercase letters.
    ///
    /// Returns `None` for letters outside the grid alphabet and for pairs
    /// that fall outside the national extent.
    #[must_use]
    pub fn from_letters(first: char, second: char) -> Option<Self> {
        let major = i32::from(letter_index(first)?);
        let minor = i32::from(letter_index(second)?);

        let east = (major - 2).rem_euclid(5) * 5 + minor % 5;
        let north = 19 - (major / 5) * 5 - minor / 5;

        Self::from_offsets(u8::try_from(east).ok()?, u8::try_from(north).ok()?)
    }

    /// Returns the square `east` and `north` 100 km steps from the false
    /// origin, or `None` outside the national extent.
    #[must_use]
    pub fn from_offsets(east: u8, north: u8) -> Option<Self> {
        if east >= EXTENT_EAST || north >= EXTENT_NORTH {
            return None;
        }

        let rows_from_top = usize::from(19 - north);
        let major = rows_from_top - rows_from_top % 5 + usize::from(east + 10) / 5;
        let minor = (rows_from_top * 5) % 25 + usize::from(east % 5);

        Some(Self {
            letters: [*GRID_ALPHABET.get(major)?, *GRID_ALPHABET.get(minor)?],
            east,
            north,
        })
    }

    /// Returns the offset east of the false origin in 100 km units.
    #[must_use]
    pub const fn east(self) -> u8 {
        self.east
    }

    /// Returns the offset north of the false origin in 100 km units.
    #[must_use]
    pub const fn north(self) -> u8 {
        self.north
    }

    /// Returns the two square letters.
    #[must_use]
    pub fn letters(self) -> [char; 2] {
        self.letters.map(char::from)
    }

    /// Whether the square covers any land in Great Britain.
    #[must_use]
    pub fn is_land(self) -> bool {
        LAND_SQUARES
            .iter()
            .any(|candidate| candidate.as_bytes() == self.letters)
    }

    /// Whether the square belongs to `set`.
    #[must_use]
    pub fn is_recognised(self, set: SquareSet) -> bool {
        match set {
            SquareSet::Land => self.is_land(),
            SquareSet::Extent => true,
        }
    }

    /// Iterates over every square in the national extent, west to east and
    /// south to north.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..EXTENT_NORTH).flat_map(|north| {
            (0..EXTENT_EAST).filter_map(move |east| Self::from_offsets(east, north))
        })
    }
}

impl fmt::Display for GridSquare {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, second] = self.letters();
        write!(formatter, "{first}{second}")
    }
}

fn letter_index(letter: char) -> Option<u8> {
    let byte = u8::try_from(letter).ok()?;
    GRID_ALPHABET
        .iter()
        .position(|candidate| *candidate == byte)
        .and_then(|index| u8::try_from(index).ok())
}
