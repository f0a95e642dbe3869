//! In-memory persistence for validated resources.
//!
//! [`MemoryTileStore`] stands in for the database: it keeps resource models,
//! refuses resources whose model is inactive or whose tiles fail validation,
//! and stores the normalised form of every accepted value. Saving is
//! all-or-nothing per resource, and a tile belongs to exactly one resource.

use std::collections::BTreeMap;

use log::debug;
use serde_json::Value;
use warden_common::{GraphId, NodeId, ResourceId, Tile, TileId};

use crate::error::StoreError;
use crate::model::{ResourceInstance, ResourceModel};
use crate::registry::Registry;
use crate::validation::check_tile;

/// Result type alias using [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;

const LOG_TARGET: &str = "warden_suite::store";

/// Persistence for resources and their tiles.
pub trait TileStore {
    /// Validates and persists `resource`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the resource cannot be saved; nothing is
    /// persisted in that case.
    fn save(&mut self, resource: &ResourceInstance) -> Result<()>;

    /// Returns a persisted tile.
    fn tile(&self, tile_id: TileId) -> Option<&Tile>;
}

/// A [`TileStore`] backed by in-memory maps.
#[derive(Debug)]
pub struct MemoryTileStore {
    registry: Registry,
    models: BTreeMap<GraphId, ResourceModel>,
    resources: BTreeMap<ResourceId, Vec<TileId>>,
    owners: BTreeMap<TileId, ResourceId>,
    tiles: BTreeMap<TileId, Tile>,
}

impl MemoryTileStore {
    /// Creates an empty store validating with `registry`.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            models: BTreeMap::new(),
            resources: BTreeMap::new(),
            owners: BTreeMap::new(),
            tiles: BTreeMap::new(),
        }
    }

    /// Returns the registry used for validation.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Adds or replaces a resource model.
    pub fn add_model(&mut self, model: ResourceModel) {
        debug!(target: LOG_TARGET, "added model {}", model.graph_id);
        self.models.insert(model.graph_id, model);
    }

    /// Activates a loaded model.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownModel`] if the model is not loaded.
    pub fn activate_model(&mut self, graph_id: GraphId) -> Result<()> {
        let model = self
            .models
            .get_mut(&graph_id)
            .ok_or(StoreError::UnknownModel { graph_id })?;
        model.activate();
        debug!(target: LOG_TARGET, "activated model {graph_id}");
        Ok(())
    }

    /// Returns the tile identifiers persisted for a resource.
    #[must_use]
    pub fn resource_tiles(&self, resource_id: ResourceId) -> Option<&[TileId]> {
        self.resources.get(&resource_id).map(Vec::as_slice)
    }

    /// Returns the resource a persisted tile belongs to.
    #[must_use]
    pub fn owner(&self, tile_id: TileId) -> Option<ResourceId> {
        self.owners.get(&tile_id).copied()
    }

    fn check_ownership(&self, resource: &ResourceInstance) -> Result<()> {
        for tile in &resource.tiles {
            let tile_id = tile.tile_id();
            match self.owner(tile_id) {
                Some(owner) if owner != resource.resource_id => {
                    return Err(StoreError::TileOwned { tile_id, owner });
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn normalised(&self, tile: &Tile, model: &ResourceModel) -> Tile {
        let mut stored = tile.clone();
        for (node, value) in tile.entries() {
            let normalised = model
                .node(node)
                .and_then(|binding| self.registry.datatype(&binding.datatype))
                .map_or_else(|| value.clone(), |datatype| datatype.normalise(value));
            if normalised != *value {
                stored.set_value(node, normalised);
            }
        }
        stored
    }
}

impl TileStore for MemoryTileStore {
    fn save(&mut self, resource: &ResourceInstance) -> Result<()> {
        let graph_id = resource.graph_id;
        let model = self
            .models
            .get(&graph_id)
            .ok_or(StoreError::UnknownModel { graph_id })?;
        if !model.is_active {
            return Err(StoreError::InactiveModel { graph_id });
        }
        self.check_ownership(resource)?;
        for tile in &resource.tiles {
            check_tile(tile, model, &self.registry)?;
        }

        let stored: Vec<Tile> = resource
            .tiles
            .iter()
            .map(|tile| self.normalised(tile, model))
            .collect();
        let tile_ids = self.resources.entry(resource.resource_id).or_default();
        for tile in stored {
            if !tile_ids.contains(&tile.tile_id()) {
                tile_ids.push(tile.tile_id());
            }
            self.owners.insert(tile.tile_id(), resource.resource_id);
            self.tiles.insert(tile.tile_id(), tile);
        }

        debug!(
            target: LOG_TARGET,
            "saved resource {} with {} tiles",
            resource.resource_id,
            resource.tiles.len(),
        );
        Ok(())
    }

    fn tile(&self, tile_id: TileId) -> Option<&Tile> {
        self.tiles.get(&tile_id)
    }
}

/// Returns the value persisted for `node` in `tile`, if any.
#[must_use]
pub fn stored_value<'a>(
    store: &'a impl TileStore,
    tile_id: TileId,
    node: NodeId,
) -> Option<&'a Value> {
    store.tile(tile_id).and_then(|tile| tile.value(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeBinding;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use warden::{BngCentrePointConfig, SharedConfig};
    use warden_common::NodegroupId;

    struct Fixture {
        store: MemoryTileStore,
        graph_id: GraphId,
        node: NodeId,
        nodegroup: NodegroupId,
    }

    fn fixture_with(config: SharedConfig) -> Fixture {
        let registry = Registry::with_bundled_plugins(config).expect("bundled plugins");
        let node = NodeId::new_v4();
        let nodegroup = NodegroupId::new_v4();
        let graph_id = GraphId::new_v4();
        let mut store = MemoryTileStore::new(registry);
        store.add_model(ResourceModel {
            graph_id,
            name: String::from("test model"),
            is_active: false,
            nodes: vec![NodeBinding {
                node_id: node,
                nodegroup_id: nodegroup,
                name: String::from("Grid reference"),
                datatype: String::from("bngcentrepoint"),
            }],
        });
        Fixture {
            store,
            graph_id,
            node,
            nodegroup,
        }
    }

    #[fixture]
    fn active() -> Fixture {
        let mut fixture = fixture_with(SharedConfig::default());
        fixture
            .store
            .activate_model(fixture.graph_id)
            .expect("model is loaded");
        fixture
    }

    #[rstest]
    fn saves_and_reads_back_valid_tiles(mut active: Fixture) {
        let tile = Tile::new(active.nodegroup).with_value(active.node, json!("SU1025169962"));
        let tile_id = tile.tile_id();
        let resource = ResourceInstance::new(active.graph_id).with_tile(tile);

        active.store.save(&resource).expect("resource saves");

        assert_eq!(
            stored_value(&active.store, tile_id, active.node),
            Some(&json!("SU1025169962"))
        );
        assert_eq!(
            active.store.resource_tiles(resource.resource_id),
            Some([tile_id].as_slice())
        );
    }

    #[rstest]
    fn inactive_models_reject_saves() {
        let mut fixture = fixture_with(SharedConfig::default());
        let resource = ResourceInstance::new(fixture.graph_id);

        let outcome = fixture.store.save(&resource);

        assert!(matches!(outcome, Err(StoreError::InactiveModel { .. })));
    }

    #[rstest]
    fn unknown_models_reject_saves(mut active: Fixture) {
        let resource = ResourceInstance::new(GraphId::new_v4());

        assert!(matches!(
            active.store.save(&resource),
            Err(StoreError::UnknownModel { .. })
        ));
        assert!(matches!(
            active.store.activate_model(resource.graph_id),
            Err(StoreError::UnknownModel { .. })
        ));
    }

    #[rstest]
    fn invalid_tiles_persist_nothing(mut active: Fixture) {
        let good = Tile::new(active.nodegroup).with_value(active.node, json!("SU1025169962"));
        let bad = Tile::new(active.nodegroup).with_value(active.node, json!("SU16"));
        let good_id = good.tile_id();
        let resource = ResourceInstance::new(active.graph_id)
            .with_tile(good)
            .with_tile(bad);

        let outcome = active.store.save(&resource);

        assert!(matches!(outcome, Err(StoreError::Invalid(_))));
        assert!(active.store.tile(good_id).is_none());
        assert!(active.store.resource_tiles(resource.resource_id).is_none());
    }

    #[rstest]
    fn tiles_cannot_move_between_resources(mut active: Fixture) {
        let tile = Tile::new(active.nodegroup).with_value(active.node, json!("SU1025169962"));
        let tile_id = tile.tile_id();
        let first = ResourceInstance::new(active.graph_id).with_tile(tile.clone());
        let second = ResourceInstance::new(active.graph_id).with_tile(tile);
        active.store.save(&first).expect("first resource saves");

        let outcome = active.store.save(&second);

        assert!(matches!(
            outcome,
            Err(StoreError::TileOwned { tile_id: rejected, owner })
                if rejected == tile_id && owner == first.resource_id
        ));
        assert_eq!(active.store.owner(tile_id), Some(first.resource_id));
        assert_eq!(
            active.store.resource_tiles(first.resource_id),
            Some([tile_id].as_slice())
        );
        assert!(active.store.resource_tiles(second.resource_id).is_none());
    }

    #[rstest]
    fn resaving_a_resource_keeps_its_tiles(mut active: Fixture) {
        let tile = Tile::new(active.nodegroup).with_value(active.node, json!("SU1025169962"));
        let tile_id = tile.tile_id();
        let resource = ResourceInstance::new(active.graph_id).with_tile(tile);

        active.store.save(&resource).expect("resource saves");
        active.store.save(&resource).expect("resource saves again");

        assert_eq!(active.store.owner(tile_id), Some(resource.resource_id));
        assert_eq!(
            active.store.resource_tiles(resource.resource_id),
            Some([tile_id].as_slice())
        );
    }

    #[rstest]
    fn persists_normalised_values() {
        let config = SharedConfig {
            bng_centre_point: BngCentrePointConfig {
                accept_lowercase: true,
                ..BngCentrePointConfig::default()
            },
            ..SharedConfig::default()
        };
        let mut fixture = fixture_with(config);
        fixture
            .store
            .activate_model(fixture.graph_id)
            .expect("model is loaded");
        let tile = Tile::new(fixture.nodegroup).with_value(fixture.node, json!("su1025169962"));
        let tile_id = tile.tile_id();

        fixture
            .store
            .save(&ResourceInstance::new(fixture.graph_id).with_tile(tile))
            .expect("resource saves");

        assert_eq!(
            stored_value(&fixture.store, tile_id, fixture.node),
            Some(&json!("SU1025169962"))
        );
    }
}
