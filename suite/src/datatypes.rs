//! Built-in datatype implementations shipped with the suite.

use bng_centre_point::BngCentrePoint;
use warden::SharedConfig;
use warden_common::Datatype;

/// Minimal metadata describing a bundled datatype implementation.
#[derive(Clone, Copy, Debug)]
pub struct DatatypeDescriptor {
    /// Datatype identifier the implementation registers by default.
    pub name: &'static str,
    /// Crate that defines the implementation; plugin definitions name it in
    /// their `implementation` field.
    pub crate_name: &'static str,
    build: fn(&SharedConfig) -> Box<dyn Datatype>,
}

impl DatatypeDescriptor {
    /// Instantiates the datatype with the workspace configuration.
    #[must_use]
    pub fn build(&self, config: &SharedConfig) -> Box<dyn Datatype> {
        (self.build)(config)
    }
}

impl PartialEq for DatatypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.crate_name == other.crate_name
    }
}

impl Eq for DatatypeDescriptor {}

/// Static list of the datatype implementations exposed by the suite.
pub const SUITE_DATATYPES: &[DatatypeDescriptor] = &[DatatypeDescriptor {
    name: bng_centre_point::DATATYPE_NAME,
    crate_name: "bng_centre_point",
    build: build_bng_centre_point,
}];

fn build_bng_centre_point(config: &SharedConfig) -> Box<dyn Datatype> {
    Box::new(BngCentrePoint::from_shared(config))
}

/// Returns the descriptor for the implementation named `crate_name`.
#[must_use]
pub fn implementation(crate_name: &str) -> Option<&'static DatatypeDescriptor> {
    SUITE_DATATYPES
        .iter()
        .find(|descriptor| descriptor.crate_name == crate_name)
}

/// Returns an iterator over the bundled datatype names in suite order.
///
/// # Examples
///
/// ```
/// use warden_suite::suite_datatype_names;
///
/// let names: Vec<_> = suite_datatype_names().collect();
/// assert_eq!(names, ["bngcentrepoint"]);
/// ```
#[must_use = "Discarding the iterator hides suite wiring errors"]
pub fn suite_datatype_names() -> impl Iterator<Item = &'static str> {
    SUITE_DATATYPES.iter().map(|descriptor| descriptor.name)
}
