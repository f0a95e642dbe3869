//! Tile and identifier types shared by datatypes and the registry.
//!
//! A tile is the unit of record data a datatype sees: a mapping from node
//! identifiers to JSON values within a single nodegroup. Identifiers are UUID
//! newtypes so a node id can never be passed where a graph id is expected.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), formatter)
            }
        }
    };
}

uuid_newtype!(
    /// Identifier of a node (field) in a resource model.
    NodeId
);
uuid_newtype!(
    /// Identifier of a nodegroup, the set of nodes a tile stores together.
    NodegroupId
);
uuid_newtype!(
    /// Identifier of a tile.
    TileId
);
uuid_newtype!(
    /// Identifier of a resource model (graph).
    GraphId
);
uuid_newtype!(
    /// Identifier of a resource instance.
    ResourceId
);

/// Field values for one nodegroup of a resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(rename = "tileid", default = "TileId::new_v4")]
    tile_id: TileId,
    nodegroup_id: NodegroupId,
    #[serde(default)]
    data: BTreeMap<NodeId, Value>,
}

impl Tile {
    /// Creates an empty tile with a fresh identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use warden_common::tile::{NodeId, NodegroupId, Tile};
    ///
    /// let node = NodeId::new_v4();
    /// let tile = Tile::new(NodegroupId::new_v4()).with_value(node, json!("SU1025169962"));
    /// assert_eq!(tile.value(node), Some(&json!("SU1025169962")));
    /// ```
    #[must_use]
    pub fn new(nodegroup_id: NodegroupId) -> Self {
        Self {
            tile_id: TileId::new_v4(),
            nodegroup_id,
            data: BTreeMap::new(),
        }
    }

    /// Returns the tile with `value` stored against `node`.
    #[must_use]
    pub fn with_value(mut self, node: NodeId, value: Value) -> Self {
        self.data.insert(node, value);
        self
    }

    /// Stores `value` against `node`, returning the previous value.
    pub fn set_value(&mut self, node: NodeId, value: Value) -> Option<Value> {
        self.data.insert(node, value)
    }

    /// Returns the value stored against `node`.
    #[must_use]
    pub fn value(&self, node: NodeId) -> Option<&Value> {
        self.data.get(&node)
    }

    /// Returns the tile identifier.
    #[must_use]
    pub const fn tile_id(&self) -> TileId {
        self.tile_id
    }

    /// Returns the nodegroup the tile belongs to.
    #[must_use]
    pub const fn nodegroup_id(&self) -> NodegroupId {
        self.nodegroup_id
    }

    /// Iterates over the stored `(node, value)` pairs in node order.
    pub fn entries(&self) -> impl Iterator<Item = (NodeId, &Value)> {
        self.data.iter().map(|(node, value)| (*node, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    const NODE: &str = "a2193dd8-bd4a-11ea-a07f-4074e009096c";

    #[rstest]
    fn parses_hyphenated_identifiers() {
        let node: NodeId = NODE.parse().expect("valid uuid");

        assert_eq!(node.to_string(), NODE);
    }

    #[rstest]
    fn rejects_malformed_identifiers() {
        assert!("not-a-uuid".parse::<NodeId>().is_err());
    }

    #[rstest]
    fn deserialises_framework_tile_json() {
        let source = json!({
            "tileid": "3f2b6bc6-0a64-4b8e-a6b5-0d6f1f5c8f11",
            "nodegroup_id": NODE,
            "data": { (NODE): "SU1025169962" },
        });

        let tile: Tile = serde_json::from_value(source).expect("tile should deserialise");
        let node: NodeId = NODE.parse().expect("valid uuid");

        assert_eq!(tile.nodegroup_id().to_string(), NODE);
        assert_eq!(tile.value(node), Some(&json!("SU1025169962")));
    }

    #[rstest]
    fn assigns_an_identifier_when_missing() {
        let source = json!({ "nodegroup_id": NODE });

        let tile: Tile = serde_json::from_value(source).expect("tile should deserialise");

        assert_eq!(tile.entries().count(), 0);
    }

    #[rstest]
    fn set_value_returns_the_previous_entry() {
        let node = NodeId::new_v4();
        let mut tile = Tile::new(NodegroupId::new_v4()).with_value(node, json!("a"));

        let previous = tile.set_value(node, json!("b"));

        assert_eq!(previous, Some(json!("a")));
        assert_eq!(tile.value(node), Some(&json!("b")));
    }
}
