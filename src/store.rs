//! Floor storage — load and replace-all save, split by edit layer.
//!
//! DESIGN
//! ======
//! A floor's objects live in two namespaces: architecture (walls, doors,
//! windows, columns) and seating (tables, bars). An editing session works on
//! one namespace and shows the other as read-only background, so `load`
//! returns both halves and `save` replaces exactly one.
//!
//! Every read and write is scoped by an explicit [`FloorContext`]; nothing
//! here discovers the tenant or floor on its own.

use std::collections::HashMap;

use async_trait::async_trait;
use floorplan_canvas::doc::{EditLayer, FloorObject, ObjectId};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object {id} belongs to the {actual:?} layer, not {expected:?}")]
    WrongLayer { id: ObjectId, expected: EditLayer, actual: EditLayer },
    #[error("duplicate object id: {0}")]
    DuplicateId(ObjectId),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Which floor, for whom, and which namespace is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloorContext {
    pub tenant_id: Uuid,
    pub floor_id: Uuid,
    pub layer: EditLayer,
}

impl FloorContext {
    #[must_use]
    pub fn new(tenant_id: Uuid, floor_id: Uuid, layer: EditLayer) -> Self {
        Self { tenant_id, floor_id, layer }
    }

    /// The same floor with a different namespace in edit.
    #[must_use]
    pub fn with_layer(self, layer: EditLayer) -> Self {
        Self { layer, ..self }
    }

    /// The namespace shown as background.
    #[must_use]
    pub fn background_layer(&self) -> EditLayer {
        match self.layer {
            EditLayer::Architecture => EditLayer::Seating,
            EditLayer::Seating => EditLayer::Architecture,
        }
    }
}

/// Both halves of a floor as seen from one edit layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloorSnapshot {
    pub editable: Vec<FloorObject>,
    pub background: Vec<FloorObject>,
}

#[async_trait]
pub trait FloorStore: Send + Sync + 'static {
    /// Load the editable namespace and the background namespace of a floor.
    /// An unknown floor loads as empty.
    async fn load(&self, ctx: &FloorContext) -> Result<FloorSnapshot, StoreError>;

    /// Replace every object in the edited namespace of a floor.
    async fn save(&self, ctx: &FloorContext, objects: &[FloorObject]) -> Result<(), StoreError>;
}

/// Check that `objects` may be saved into `layer`.
///
/// # Errors
///
/// Returns [`StoreError::WrongLayer`] for an object from the other namespace
/// and [`StoreError::DuplicateId`] when an id repeats.
pub fn validate_layer(layer: EditLayer, objects: &[FloorObject]) -> Result<(), StoreError> {
    let mut seen = std::collections::HashSet::with_capacity(objects.len());
    for obj in objects {
        let actual = obj.object_type().edit_layer();
        if actual != layer {
            return Err(StoreError::WrongLayer { id: obj.id, expected: layer, actual });
        }
        if !seen.insert(obj.id) {
            return Err(StoreError::DuplicateId(obj.id));
        }
    }
    Ok(())
}

type NamespaceKey = (Uuid, Uuid, EditLayer);

/// In-process store. Each namespace is kept as a serialized JSON document,
/// the same shape a remote store would receive.
#[derive(Debug, Default)]
pub struct MemoryStore {
    namespaces: RwLock<HashMap<NamespaceKey, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn read_namespace(&self, key: NamespaceKey) -> Result<Vec<FloorObject>, StoreError> {
        let namespaces = self.namespaces.read().await;
        match namespaces.get(&key) {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl FloorStore for MemoryStore {
    async fn load(&self, ctx: &FloorContext) -> Result<FloorSnapshot, StoreError> {
        let editable = self.read_namespace((ctx.tenant_id, ctx.floor_id, ctx.layer)).await?;
        let background = self
            .read_namespace((ctx.tenant_id, ctx.floor_id, ctx.background_layer()))
            .await?;
        debug!(floor_id = %ctx.floor_id, editable = editable.len(), background = background.len(), "floor loaded");
        Ok(FloorSnapshot { editable, background })
    }

    async fn save(&self, ctx: &FloorContext, objects: &[FloorObject]) -> Result<(), StoreError> {
        validate_layer(ctx.layer, objects)?;
        let json = serde_json::to_string(objects)?;
        self.namespaces
            .write()
            .await
            .insert((ctx.tenant_id, ctx.floor_id, ctx.layer), json);
        debug!(floor_id = %ctx.floor_id, layer = ?ctx.layer, count = objects.len(), "floor saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
