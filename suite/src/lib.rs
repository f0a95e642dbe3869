//! Datatype registry and tile validation harness for Warden.
//!
//! This crate binds plugin definition files to the datatype implementations
//! bundled with Warden. A [`Registry`] is populated once at start-up from
//! widget and datatype definitions, tiles are validated against a
//! [`ResourceModel`] by routing each value to the datatype bound to its node,
//! and [`MemoryTileStore`] persists resources whose tiles pass.

mod datatypes;
pub mod definition;
pub mod error;
pub mod model;
pub mod registry;
pub mod store;
pub mod validation;

pub use datatypes::{DatatypeDescriptor, SUITE_DATATYPES, implementation, suite_datatype_names};
pub use definition::{DatatypeDefinition, WidgetDefinition};
pub use error::{ModelError, RegistryError, StoreError, TileValidationError};
pub use model::{NodeBinding, ResourceInstance, ResourceModel};
pub use registry::{DATATYPES_DIR, RegisteredDatatype, Registry, WIDGETS_DIR};
pub use store::{MemoryTileStore, TileStore, stored_value};
pub use validation::{TILE_DATATYPE, check_tile, validate_tile};
