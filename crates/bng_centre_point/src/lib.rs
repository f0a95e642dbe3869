//! British National Grid centre-point datatype.
//!
//! Parses grid references such as `SU1025169962` into a [`GridReference`],
//! computes the centre of the square they denote, and exposes the
//! [`BngCentrePoint`] datatype that validates tile values against the
//! workspace configuration.

pub mod datatype;
pub mod error;
pub mod grid;
pub mod reference;

pub use datatype::{BngCentrePoint, DATATYPE_NAME};
pub use error::GridReferenceError;
pub use grid::{GridSquare, LAND_SQUARES};
pub use reference::{CentrePoint, GridReference};
