//! Error types for plugin registration, tile validation and persistence.
//!
//! Each variant names the offending datatype, widget, model or file so the
//! caller can report it without further context.

use camino::Utf8PathBuf;
use thiserror::Error;
use warden_common::{GraphId, ResourceId, TileId, ValidationFailure};

/// Errors raised while registering datatype and widget plugins.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A definition file could not be read.
    #[error("failed to read plugin definition {path}: {source}")]
    Read {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A definition file is not a valid plugin document.
    #[error("invalid plugin definition {path}: {source}")]
    Json {
        /// Path of the malformed file.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        #[source]
        source: serde_json::Error,
    },

    /// A datatype with the same identifier is already registered.
    #[error("datatype {name} is already registered")]
    DuplicateDatatype {
        /// Datatype identifier.
        name: String,
    },

    /// A widget with the same name is already registered.
    #[error("widget {name} is already registered")]
    DuplicateWidget {
        /// Widget name.
        name: String,
    },

    /// The definition names an implementation the suite does not provide.
    #[error("datatype {datatype} names unknown implementation {implementation}")]
    UnknownImplementation {
        /// Datatype identifier.
        datatype: String,
        /// Implementation named by the definition.
        implementation: String,
    },

    /// The definition names a default widget that is not registered.
    #[error("datatype {datatype} names default widget {widget}, which is not registered")]
    MissingDefaultWidget {
        /// Datatype identifier.
        datatype: String,
        /// Widget named by the definition.
        widget: String,
    },

    /// No datatype is registered under the identifier.
    #[error("datatype {name} is not registered")]
    UnknownDatatype {
        /// Datatype identifier.
        name: String,
    },

    /// No widget is registered under the name.
    #[error("widget {name} is not registered")]
    UnknownWidget {
        /// Widget name.
        name: String,
    },

    /// The widget is the default widget of a registered datatype.
    #[error("widget {widget} is the default widget of datatype {datatype}")]
    WidgetInUse {
        /// Widget name.
        widget: String,
        /// Datatype that depends on the widget.
        datatype: String,
    },
}

/// Errors raised while loading a resource model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model file could not be read.
    #[error("failed to read resource model {path}: {source}")]
    Read {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The model file is not a valid resource model document.
    #[error("invalid resource model {path}: {source}")]
    Json {
        /// Path of the malformed file.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        #[source]
        source: serde_json::Error,
    },
}

/// A tile that failed validation, with every failure found.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("tile {tile_id} failed validation: {}", summary(.failures))]
pub struct TileValidationError {
    tile_id: TileId,
    failures: Vec<ValidationFailure>,
}

impl TileValidationError {
    /// Wraps the failures reported for `tile_id`.
    #[must_use]
    pub const fn new(tile_id: TileId, failures: Vec<ValidationFailure>) -> Self {
        Self { tile_id, failures }
    }

    /// Returns the rejected tile.
    #[must_use]
    pub const fn tile_id(&self) -> TileId {
        self.tile_id
    }

    /// Returns the failures.
    #[must_use]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }
}

fn summary(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ValidationFailure::message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while persisting a resource.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No model is loaded for the resource's graph.
    #[error("resource model {graph_id} is not loaded")]
    UnknownModel {
        /// Graph identifier of the resource.
        graph_id: GraphId,
    },

    /// The resource's model has not been activated.
    #[error("resource model {graph_id} is not active")]
    InactiveModel {
        /// Graph identifier of the resource.
        graph_id: GraphId,
    },

    /// A tile is already stored under another resource.
    #[error("tile {tile_id} already belongs to resource {owner}")]
    TileOwned {
        /// The contested tile.
        tile_id: TileId,
        /// Resource the tile is stored under.
        owner: ResourceId,
    },

    /// A tile of the resource failed validation.
    #[error(transparent)]
    Invalid(#[from] TileValidationError),
}
