//! Capability trait implemented by every datatype plugin.
//!
//! A datatype owns the rules for one kind of field value. The registry routes
//! each tile entry to the datatype bound to its node and collects the
//! failures; datatypes never see persistence or indexing.

use serde_json::Value;

use crate::diagnostics::ValidationFailure;
use crate::i18n::Localizer;
use crate::tile::NodeId;

/// Per-field information supplied to [`Datatype::validate`].
#[derive(Clone, Copy, Debug)]
pub struct FieldContext<'a> {
    node: Option<NodeId>,
    localizer: &'a Localizer,
}

impl<'a> FieldContext<'a> {
    /// Creates a context for a value belonging to `node`.
    #[must_use]
    pub const fn new(node: Option<NodeId>, localizer: &'a Localizer) -> Self {
        Self { node, localizer }
    }

    /// Creates a context for a free-standing value with no node.
    #[must_use]
    pub const fn detached(localizer: &'a Localizer) -> Self {
        Self::new(None, localizer)
    }

    /// Returns the node being validated.
    #[must_use]
    pub const fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Returns the localizer used for failure messages.
    #[must_use]
    pub const fn localizer(&self) -> &'a Localizer {
        self.localizer
    }
}

/// Validation and presentation rules for one kind of field value.
pub trait Datatype: Send + Sync {
    /// Returns the datatype identifier used in plugin definitions.
    fn name(&self) -> &str;

    /// Validates `value`, returning an empty list when it is acceptable.
    fn validate(&self, value: &Value, field: &FieldContext<'_>) -> Vec<ValidationFailure>;

    /// Returns the form of `value` that should be persisted.
    ///
    /// Only called for values that passed [`Self::validate`].
    fn normalise(&self, value: &Value) -> Value {
        value.clone()
    }

    /// Renders `value` for display, or `None` when there is nothing to show.
    fn display_value(&self, value: &Value) -> Option<String> {
        value.as_str().map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::validation_failure;
    use rstest::rstest;
    use serde_json::json;

    struct NonEmpty;

    impl Datatype for NonEmpty {
        fn name(&self) -> &str {
            "non-empty"
        }

        fn validate(&self, value: &Value, field: &FieldContext<'_>) -> Vec<ValidationFailure> {
            match value.as_str() {
                Some(text) if !text.is_empty() => Vec::new(),
                _ => vec![
                    validation_failure(self.name(), "value must not be empty")
                        .node(field.node())
                        .build(),
                ],
            }
        }
    }

    #[rstest]
    fn default_presentation_passes_strings_through() {
        let datatype = NonEmpty;

        assert_eq!(datatype.normalise(&json!("x")), json!("x"));
        assert_eq!(datatype.display_value(&json!("x")), Some(String::from("x")));
        assert_eq!(datatype.display_value(&json!(3)), None);
    }

    #[rstest]
    fn failures_carry_the_field_node() {
        let localizer = Localizer::new(None);
        let node = NodeId::new_v4();
        let field = FieldContext::new(Some(node), &localizer);

        let failures = NonEmpty.validate(&json!(""), &field);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures.first().and_then(ValidationFailure::node), Some(node));
    }
}
