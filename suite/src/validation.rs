//! Routes tile values to the datatypes bound to their nodes.

use std::borrow::Cow;

use log::debug;
use warden_common::i18n::FluentValue;
use warden_common::{
    Arguments, FailureMessages, FieldContext, MessageRequest, NodeId, Tile, ValidationFailure,
    localise_or_fallback, validation_failure,
};

use crate::error::TileValidationError;
use crate::model::ResourceModel;
use crate::registry::Registry;

/// Datatype name recorded on failures raised by the routing itself.
pub const TILE_DATATYPE: &str = "tile";

const LOG_TARGET: &str = "warden_suite::validation";

/// Validates every value in `tile`, returning all failures found.
///
/// Values are checked by the datatype bound to their node in `model`. Nodes
/// missing from the model, nodes of another nodegroup, and nodes bound to an
/// unregistered datatype are reported as failures too.
#[must_use]
pub fn validate_tile(
    tile: &Tile,
    model: &ResourceModel,
    registry: &Registry,
) -> Vec<ValidationFailure> {
    let localizer = registry.localizer();
    let mut failures = Vec::new();

    for (node, value) in tile.entries() {
        let Some(binding) = model.node(node) else {
            failures.push(routing_failure(registry, node, RoutingProblem::UnknownNode));
            continue;
        };
        if binding.nodegroup_id != tile.nodegroup_id() {
            failures.push(routing_failure(
                registry,
                node,
                RoutingProblem::NodegroupMismatch {
                    expected: binding.nodegroup_id.to_string(),
                    actual: tile.nodegroup_id().to_string(),
                },
            ));
            continue;
        }
        let Some(datatype) = registry.datatype(&binding.datatype) else {
            failures.push(routing_failure(
                registry,
                node,
                RoutingProblem::UnknownDatatype {
                    datatype: binding.datatype.clone(),
                },
            ));
            continue;
        };

        let field = FieldContext::new(Some(node), localizer);
        failures.extend(datatype.validate(value, &field));
    }

    debug!(
        target: LOG_TARGET,
        "tile {} produced {} failures",
        tile.tile_id(),
        failures.len(),
    );
    failures
}

/// Validates `tile`, failing when any value is rejected.
///
/// # Errors
///
/// Returns a [`TileValidationError`] carrying every failure found.
pub fn check_tile(
    tile: &Tile,
    model: &ResourceModel,
    registry: &Registry,
) -> Result<(), TileValidationError> {
    let failures = validate_tile(tile, model, registry);
    if failures.is_empty() {
        Ok(())
    } else {
        Err(TileValidationError::new(tile.tile_id(), failures))
    }
}

enum RoutingProblem {
    UnknownNode,
    NodegroupMismatch { expected: String, actual: String },
    UnknownDatatype { datatype: String },
}

fn routing_failure(
    registry: &Registry,
    node: NodeId,
    problem: RoutingProblem,
) -> ValidationFailure {
    let node_text = node.to_string();
    let mut args = Arguments::default();
    args.insert(Cow::Borrowed("node"), FluentValue::from(node_text.clone()));

    let (key, fallback) = match problem {
        RoutingProblem::UnknownNode => (
            "tile-unknown-node",
            FailureMessages::new(
                format!("Node {node_text} is not part of the resource model."),
                String::from("Tile data may only reference nodes defined by the model."),
                String::from("Remove the value or add the node to the model."),
            ),
        ),
        RoutingProblem::NodegroupMismatch { expected, actual } => {
            let fallback = FailureMessages::new(
                format!("Node {node_text} belongs to nodegroup {expected}, not {actual}."),
                String::from("A tile stores values for a single nodegroup."),
                format!("Move the value to a tile for nodegroup {expected}."),
            );
            args.insert(Cow::Borrowed("expected"), FluentValue::from(expected));
            args.insert(Cow::Borrowed("actual"), FluentValue::from(actual));
            ("tile-nodegroup-mismatch", fallback)
        }
        RoutingProblem::UnknownDatatype { datatype } => {
            let fallback = FailureMessages::new(
                format!("Node {node_text} uses datatype {datatype}, which is not registered."),
                String::from("Datatypes must be registered before tiles using them are validated."),
                String::from("Register the datatype definition, then validate again."),
            );
            args.insert(Cow::Borrowed("datatype"), FluentValue::from(datatype));
            ("tile-unknown-datatype", fallback)
        }
    };

    let request = MessageRequest {
        datatype: LOG_TARGET,
        key,
        args: &args,
    };
    let (primary, note, help) =
        localise_or_fallback(registry.localizer(), request, || fallback).into_parts();

    validation_failure(TILE_DATATYPE, primary)
        .node(Some(node))
        .note(note)
        .help(help)
        .build()
}
