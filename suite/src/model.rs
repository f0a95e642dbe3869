//! Resource models and the resources stored against them.
//!
//! Only the parts of a resource model that tile validation needs are kept:
//! the graph identifier, the activation flag, and the node-to-datatype
//! bindings.

use camino::Utf8Path;
use log::debug;
use serde::{Deserialize, Serialize};
use warden_common::{GraphId, NodeId, NodegroupId, ResourceId, Tile};

use crate::error::ModelError;

/// A node of a resource model bound to a datatype.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeBinding {
    /// Node identifier.
    #[serde(rename = "nodeid")]
    pub node_id: NodeId,
    /// Nodegroup the node's values are stored in.
    #[serde(rename = "nodegroupid")]
    pub nodegroup_id: NodegroupId,
    /// Display name of the node.
    pub name: String,
    /// Datatype identifier validating the node's values.
    pub datatype: String,
}

/// A resource model (graph).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceModel {
    /// Graph identifier.
    #[serde(rename = "graphid")]
    pub graph_id: GraphId,
    /// Display name of the model.
    pub name: String,
    /// Whether resources may be saved against the model.
    #[serde(rename = "isactive", default)]
    pub is_active: bool,
    /// Node bindings.
    #[serde(default)]
    pub nodes: Vec<NodeBinding>,
}

impl ResourceModel {
    /// Reads a model from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Read`] when the file cannot be read and
    /// [`ModelError::Json`] when it is not a resource model.
    pub fn load_from(path: &Utf8Path) -> Result<Self, ModelError> {
        let source = std::fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.to_owned(),
            source,
        })?;
        let model: Self = serde_json::from_str(&source).map_err(|source| ModelError::Json {
            path: path.to_owned(),
            source,
        })?;
        debug!(
            target: "warden_suite::model",
            "loaded model {} ({}) with {} nodes from {path}",
            model.name,
            model.graph_id,
            model.nodes.len(),
        );
        Ok(model)
    }

    /// Marks the model active so resources can be saved against it.
    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Returns the binding for `node`.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&NodeBinding> {
        self.nodes.iter().find(|binding| binding.node_id == node)
    }
}

/// A resource and the tiles recorded for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceInstance {
    /// Resource identifier.
    #[serde(rename = "resourceinstanceid", default = "ResourceId::new_v4")]
    pub resource_id: ResourceId,
    /// Model the resource conforms to.
    #[serde(rename = "graph_id")]
    pub graph_id: GraphId,
    /// Tiles recorded for the resource.
    #[serde(default)]
    pub tiles: Vec<Tile>,
}

impl ResourceInstance {
    /// Creates an empty resource of the given model with a fresh identifier.
    #[must_use]
    pub fn new(graph_id: GraphId) -> Self {
        Self {
            resource_id: ResourceId::new_v4(),
            graph_id,
            tiles: Vec::new(),
        }
    }

    /// Returns the resource with `tile` appended.
    #[must_use]
    pub fn with_tile(mut self, tile: Tile) -> Self {
        self.tiles.push(tile);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    const GRAPH: &str = "8b5c34f4-bd4a-11ea-bff8-4074e009096c";
    const NODE: &str = "a2193dd8-bd4a-11ea-a07f-4074e009096c";

    #[rstest]
    fn deserialises_model_documents() {
        let source = json!({
            "graphid": GRAPH,
            "name": "BNG centre point test model",
            "nodes": [{
                "nodeid": NODE,
                "nodegroupid": NODE,
                "name": "Grid reference",
                "datatype": "bngcentrepoint",
            }],
        });

        let mut model: ResourceModel =
            serde_json::from_value(source).expect("model should deserialise");
        let node: NodeId = NODE.parse().expect("valid uuid");

        assert!(!model.is_active);
        assert_eq!(model.node(node).map(|binding| binding.datatype.as_str()), Some("bngcentrepoint"));
        model.activate();
        assert!(model.is_active);
    }

    #[rstest]
    fn unknown_nodes_have_no_binding() {
        let model = ResourceModel {
            graph_id: GraphId::new_v4(),
            name: String::from("empty"),
            is_active: true,
            nodes: Vec::new(),
        };

        assert!(model.node(NodeId::new_v4()).is_none());
    }

    #[rstest]
    fn resources_collect_tiles() {
        let graph = GraphId::new_v4();
        let tile = Tile::new(NodegroupId::new_v4());

        let resource = ResourceInstance::new(graph).with_tile(tile.clone());

        assert_eq!(resource.graph_id, graph);
        assert_eq!(resource.tiles, vec![tile]);
    }
}
