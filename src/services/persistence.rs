//! Persistence service — debounced auto-save of floor snapshots.
//!
//! DESIGN
//! ======
//! Sessions hand every new scene collection to a bounded queue with
//! `try_send`, so an edit never waits on storage. A single background worker
//! keeps only the newest snapshot per floor and writes it once the floor has
//! been quiet for the configured period. Each save is a full replace of the
//! edited namespace.
//!
//! ERROR HANDLING
//! ==============
//! A failed save is logged and dropped. There is no retry policy: the next
//! edit enqueues a fresh full snapshot, which supersedes the lost one.
//!
//! The worker records the last snapshot it wrote for each floor, so a session
//! can tell its edits landed without saving them a second time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use floorplan_canvas::doc::FloorObject;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::store::{FloorContext, FloorStore};

/// One scene collection waiting to be written.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub ctx: FloorContext,
    /// Scene revision the snapshot was taken at. Older revisions never replace newer ones.
    pub revision: u64,
    pub objects: Arc<Vec<FloorObject>>,
}

/// Tuning knobs for the auto-save worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Quiet period after the last request before a floor is written.
    pub quiet: Duration,
    /// Bounded channel capacity.
    pub queue_capacity: usize,
}

impl AutosaveConfig {
    #[must_use]
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            quiet: Duration::from_millis(config.autosave_ms),
            queue_capacity: config.autosave_queue.max(1),
        }
    }
}

/// Last snapshot written by the worker, per floor context.
type WrittenMap = Arc<Mutex<HashMap<FloorContext, Arc<Vec<FloorObject>>>>>;

/// Sending half of the auto-save queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AutosaveHandle {
    tx: mpsc::Sender<SaveRequest>,
    written: WrittenMap,
}

impl AutosaveHandle {
    /// Best-effort, non-blocking enqueue. Returns `false` if the request was dropped.
    pub fn enqueue(&self, request: SaveRequest) -> bool {
        let floor_id = request.ctx.floor_id;
        let revision = request.revision;
        match self.tx.try_send(request) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(%floor_id, revision, "autosave queue full; dropping snapshot");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(%floor_id, revision, "autosave queue closed; dropping snapshot");
                false
            }
        }
    }

    /// Whether the worker has stopped receiving.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Whether the worker has written exactly this collection for `ctx`.
    ///
    /// Collections are compared by identity, so a later save of different
    /// objects for the same floor makes this `false` again.
    #[must_use]
    pub fn has_written(&self, ctx: &FloorContext, objects: &Arc<Vec<FloorObject>>) -> bool {
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ctx)
            .is_some_and(|last| Arc::ptr_eq(last, objects))
    }
}

struct Pending {
    request: SaveRequest,
    due: Instant,
}

/// Spawn the auto-save worker. The worker exits, flushing whatever is
/// pending, once every [`AutosaveHandle`] has been dropped.
pub fn spawn_autosave_worker<S: FloorStore>(store: Arc<S>, config: AutosaveConfig) -> (AutosaveHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<SaveRequest>(config.queue_capacity.max(1));
    let written: WrittenMap = Arc::default();
    let record = written.clone();

    info!(
        quiet_ms = u64::try_from(config.quiet.as_millis()).unwrap_or(u64::MAX),
        queue_capacity = config.queue_capacity,
        "autosave worker configured"
    );

    let worker = tokio::spawn(async move {
        let mut pending: HashMap<FloorContext, Pending> = HashMap::new();

        loop {
            let next_due = pending.values().map(|p| p.due).min();
            tokio::select! {
                maybe_request = rx.recv() => {
                    let Some(request) = maybe_request else {
                        for (_, p) in pending.drain() {
                            save(store.as_ref(), &record, p.request).await;
                        }
                        break;
                    };
                    admit(&mut pending, request, config.quiet);
                }
                () = sleep_until_due(next_due) => {
                    let now = Instant::now();
                    let due: Vec<FloorContext> =
                        pending.iter().filter(|(_, p)| p.due <= now).map(|(ctx, _)| *ctx).collect();
                    for ctx in due {
                        if let Some(p) = pending.remove(&ctx) {
                            save(store.as_ref(), &record, p.request).await;
                        }
                    }
                }
            }
        }
        debug!("autosave worker stopped");
    });

    (AutosaveHandle { tx, written }, worker)
}

/// Record `request` as the newest snapshot for its floor and restart the quiet period.
fn admit(pending: &mut HashMap<FloorContext, Pending>, request: SaveRequest, quiet: Duration) {
    let due = Instant::now() + quiet;
    match pending.get_mut(&request.ctx) {
        // EDGE: a stale revision arriving late must not overwrite newer work.
        Some(p) if p.request.revision > request.revision => {
            debug!(floor_id = %request.ctx.floor_id, revision = request.revision, "stale autosave ignored");
        }
        Some(p) => {
            p.request = request;
            p.due = due;
        }
        None => {
            pending.insert(request.ctx, Pending { request, due });
        }
    }
}

async fn sleep_until_due(due: Option<Instant>) {
    match due {
        Some(due) => tokio::time::sleep_until(due).await,
        None => std::future::pending::<()>().await,
    }
}

async fn save<S: FloorStore + ?Sized>(store: &S, written: &WrittenMap, request: SaveRequest) {
    let ctx = request.ctx;
    match store.save(&ctx, &request.objects).await {
        Ok(()) => {
            debug!(floor_id = %ctx.floor_id, revision = request.revision, count = request.objects.len(), "autosaved");
            written
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(ctx, request.objects);
        }
        Err(e) => {
            error!(error = %e, floor_id = %ctx.floor_id, revision = request.revision, "autosave failed");
        }
    }
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;
