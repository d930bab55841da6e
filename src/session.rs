//! Floor session — one open floor wired to its store and the auto-save queue.
//!
//! The tenant, floor and edit layer are passed in when the session is opened
//! and never change behind the caller's back. Every engine call goes through
//! [`FloorSession::dispatch`], which hands a new scene collection to the
//! auto-save queue whenever the engine swapped one in.

use std::sync::Arc;

use floorplan_canvas::config::EditorConfig;
use floorplan_canvas::doc::{EditLayer, FloorObject};
use floorplan_canvas::engine::{Action, EngineCore};
use tracing::{info, warn};

use crate::services::persistence::{AutosaveHandle, SaveRequest};
use crate::store::{FloorContext, FloorStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("autosave worker is not running")]
    AutosaveStopped,
}

pub struct FloorSession {
    ctx: FloorContext,
    store: Arc<dyn FloorStore>,
    autosave: AutosaveHandle,
    core: EngineCore,
    /// Last collection handed to the auto-save queue or written directly.
    queued: Arc<Vec<FloorObject>>,
    /// Last collection known to be in the store: loaded from it or written by `save_now`.
    written: Arc<Vec<FloorObject>>,
}

impl FloorSession {
    /// Load a floor and build its editor core.
    ///
    /// # Errors
    ///
    /// Fails if the auto-save worker has stopped or the store cannot load the floor.
    pub async fn open(
        ctx: FloorContext,
        store: Arc<dyn FloorStore>,
        autosave: AutosaveHandle,
        config: EditorConfig,
    ) -> Result<Self, SessionError> {
        if autosave.is_closed() {
            return Err(SessionError::AutosaveStopped);
        }
        let mut session = Self {
            ctx,
            store,
            autosave,
            core: EngineCore::with_config(config),
            queued: Arc::new(Vec::new()),
            written: Arc::new(Vec::new()),
        };
        session.reload().await?;
        Ok(session)
    }

    #[must_use]
    pub fn ctx(&self) -> FloorContext {
        self.ctx
    }

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    /// Whether the scene holds edits not yet in the store.
    ///
    /// Edits still waiting in the auto-save queue count as dirty; once the
    /// worker has written the current collection they no longer do.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        let snapshot = self.core.doc.snapshot();
        !Arc::ptr_eq(&snapshot, &self.written) && !self.autosave.has_written(&self.ctx, &snapshot)
    }

    /// Run one engine call, then queue an auto-save if it changed the scene.
    pub fn dispatch<F>(&mut self, f: F) -> Vec<Action>
    where
        F: FnOnce(&mut EngineCore) -> Vec<Action>,
    {
        let actions = f(&mut self.core);
        self.schedule_save();
        actions
    }

    /// Queue the current collection if it differs from the last one handed off.
    ///
    /// A dropped request is tried again on the next dispatch.
    pub fn schedule_save(&mut self) -> bool {
        let snapshot = self.core.doc.snapshot();
        if Arc::ptr_eq(&snapshot, &self.queued) {
            return false;
        }
        let request = SaveRequest { ctx: self.ctx, revision: self.core.doc.revision(), objects: snapshot.clone() };
        if !self.autosave.enqueue(request) {
            return false;
        }
        self.queued = snapshot;
        true
    }

    /// Write the current collection now, bypassing the quiet period.
    ///
    /// # Errors
    ///
    /// Returns the store's error; the session stays dirty.
    pub async fn save_now(&mut self) -> Result<(), SessionError> {
        let snapshot = self.core.doc.snapshot();
        let revision = self.core.doc.revision();
        self.store.save(&self.ctx, &snapshot).await?;
        info!(floor_id = %self.ctx.floor_id, revision, count = snapshot.len(), "floor saved");

        // Supersede any older snapshot still waiting in the worker.
        if !Arc::ptr_eq(&snapshot, &self.queued) {
            self.autosave.enqueue(SaveRequest { ctx: self.ctx, revision, objects: snapshot.clone() });
        }
        self.queued = snapshot.clone();
        self.written = snapshot;
        Ok(())
    }

    /// Switch which namespace is editable. Unsaved edits are written first.
    ///
    /// # Errors
    ///
    /// Fails if the pending edits cannot be saved or the other layer cannot be loaded.
    pub async fn switch_layer(&mut self, layer: EditLayer) -> Result<(), SessionError> {
        if layer == self.ctx.layer {
            return Ok(());
        }
        if self.is_dirty() {
            self.save_now().await?;
        }
        let previous = self.ctx;
        self.ctx = self.ctx.with_layer(layer);
        if let Err(e) = self.reload().await {
            warn!(error = %e, floor_id = %self.ctx.floor_id, "layer switch failed; staying on previous layer");
            self.ctx = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Replace the scene with what the store holds for this floor.
    ///
    /// # Errors
    ///
    /// Returns the store's error and leaves the scene as it was.
    pub async fn reload(&mut self) -> Result<(), SessionError> {
        let snapshot = self.store.load(&self.ctx).await?;
        info!(
            tenant_id = %self.ctx.tenant_id,
            floor_id = %self.ctx.floor_id,
            layer = ?self.ctx.layer,
            editable = snapshot.editable.len(),
            background = snapshot.background.len(),
            "floor opened"
        );
        self.core.load_snapshot(snapshot.editable);
        self.core.load_background(snapshot.background);
        self.written = self.core.doc.snapshot();
        self.queued = self.written.clone();
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
