//! Ergonomic builders for datatype validation failures.

use std::fmt;

use serde::Serialize;

use crate::tile::NodeId;

/// A rejected field value together with the localised explanation.
///
/// Failures are plain data: the datatype that produced them decides the
/// wording, and the caller decides whether to abort persistence or re-prompt
/// for the field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    datatype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    node: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    helps: Vec<String>,
}

impl ValidationFailure {
    /// Returns the datatype that rejected the value.
    #[must_use]
    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    /// Returns the node the value was supplied for, when known.
    #[must_use]
    pub const fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Returns the rejected value as supplied.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the primary message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional notes.
    #[must_use]
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Returns help messages.
    #[must_use]
    pub fn helps(&self) -> &[String] {
        &self.helps
    }

    /// Returns a copy of the failure attributed to `node`.
    #[must_use]
    pub fn for_node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

/// Builder for [`ValidationFailure`] instances.
#[derive(Debug)]
pub struct FailureBuilder {
    failure: ValidationFailure,
}

impl FailureBuilder {
    fn new(datatype: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            failure: ValidationFailure {
                datatype: datatype.into(),
                node: None,
                value: None,
                message: message.into(),
                notes: Vec::new(),
                helps: Vec::new(),
            },
        }
    }

    /// Records the node the rejected value belongs to.
    #[must_use]
    pub fn node(mut self, node: Option<NodeId>) -> Self {
        self.failure.node = node;
        self
    }

    /// Records the rejected value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.failure.value = Some(value.into());
        self
    }

    /// Adds a note to the failure.
    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.failure.notes.push(note.into());
        self
    }

    /// Adds a help message to the failure.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.failure.helps.push(help.into());
        self
    }

    /// Completes the builder and returns the failure.
    #[must_use]
    pub fn build(self) -> ValidationFailure {
        self.failure
    }
}

/// Starts building a validation failure raised by `datatype`.
///
/// # Examples
///
/// ```
/// use warden_common::diagnostics::validation_failure;
///
/// let failure = validation_failure("bng-centrepoint", "Grid reference is empty.")
///     .help("Enter two letters followed by the easting and northing digits.")
///     .build();
/// assert_eq!(failure.datatype(), "bng-centrepoint");
/// assert!(failure.node().is_none());
/// ```
#[must_use]
pub fn validation_failure(
    datatype: impl Into<String>,
    message: impl Into<String>,
) -> FailureBuilder {
    FailureBuilder::new(datatype, message)
}
