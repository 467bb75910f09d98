//! Drag-reconciliation controller.
//!
//! One move runs: locate source, no-op check, local capacity check, snapshot,
//! optimistic mutation, persistence call, then confirm or roll back. The store lock is
//! only taken in the synchronous parts; the persistence call is the single await.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use domain::{
    AssignedOccupant, Container, MSG_ASSIGNED_TO_ROOM, MSG_MOVED_TO_UNASSIGNED, MSG_ROOM_FULL,
};

use crate::gateway::{AssignmentGateway, GatewayError};
use crate::notify::{Notice, Notifier};
use crate::store::{AssignmentStore, MoveRecord, Snapshot};

/// Store handle shared between the controller and views.
pub type SharedStore = Arc<Mutex<AssignmentStore>>;

/// Why a move ended before any network call. All of these are silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Occupant is not in the store
    StaleReference,
    /// Target room is not in the store
    UnknownTarget,
    /// Source and target are the same container
    NoOp,
    /// A move for this occupant is already pending
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Aborted(AbortReason),
    /// Local capacity check failed; nothing was mutated or sent
    RejectedFull,
    /// Server accepted; optimistic state kept
    Confirmed(AssignedOccupant),
    /// Server or transport failed; optimistic state undone
    RolledBack(GatewayError),
}

/// Undo state for one in-flight move.
struct Applied {
    snapshot: Snapshot,
    record: MoveRecord,
    /// Store revision right after this move's own mutation
    revision: u64,
}

pub struct DragController {
    gateway: Arc<dyn AssignmentGateway>,
    notifier: Arc<dyn Notifier>,
    store: SharedStore,
    pending: Mutex<HashSet<Uuid>>,
}

impl DragController {
    pub fn new(
        gateway: Arc<dyn AssignmentGateway>,
        notifier: Arc<dyn Notifier>,
        store: SharedStore,
    ) -> Self {
        Self {
            gateway,
            notifier,
            store,
            pending: Mutex::new(HashSet::new()),
        }
    }

    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    /// Run `f` against the current store contents.
    pub fn read<R>(&self, f: impl FnOnce(&AssignmentStore) -> R) -> R {
        f(&lock(&self.store))
    }

    pub fn is_pending(&self, occupant_id: Uuid) -> bool {
        lock(&self.pending).contains(&occupant_id)
    }

    /// Fetch the board and replace the store contents.
    pub async fn load(&self) -> Result<(), GatewayError> {
        let board = self.gateway.fetch_board().await?;
        tracing::debug!(
            rooms = board.rooms.len(),
            unassigned = board.unassigned.len(),
            "Board loaded"
        );
        lock(&self.store).replace(board);
        Ok(())
    }

    /// Handle a drop of `occupant_id` onto `target`.
    pub async fn drag_end(&self, occupant_id: Uuid, target: Container) -> MoveOutcome {
        let applied = match self.begin(occupant_id, target) {
            Ok(applied) => applied,
            Err(outcome) => {
                // Locks are released by now; a notifier may read the store
                if outcome == MoveOutcome::RejectedFull {
                    self.notifier.notify(Notice::error(MSG_ROOM_FULL));
                }
                return outcome;
            }
        };
        let _pending = PendingGuard {
            pending: &self.pending,
            occupant_id,
        };

        let result = self.gateway.assign(occupant_id, target).await;

        match result {
            Ok(assigned) => {
                tracing::info!(occupant = %occupant_id, target = %target, "Move confirmed");
                let message = match target {
                    Container::Room(_) => MSG_ASSIGNED_TO_ROOM,
                    Container::Unassigned => MSG_MOVED_TO_UNASSIGNED,
                };
                self.notifier.notify(Notice::success(message));
                MoveOutcome::Confirmed(assigned)
            }
            Err(err) => {
                tracing::warn!(occupant = %occupant_id, target = %target, error = %err, "Move rolled back");
                self.roll_back(applied);
                self.notifier.notify(Notice::error(err.user_message()));
                MoveOutcome::RolledBack(err)
            }
        }
    }

    /// Synchronous half of a move: checks, snapshot and optimistic mutation.
    ///
    /// Runs entirely under the store lock and never notifies.
    fn begin(&self, occupant_id: Uuid, target: Container) -> Result<Applied, MoveOutcome> {
        let mut pending = lock(&self.pending);
        if pending.contains(&occupant_id) {
            return Err(MoveOutcome::Aborted(AbortReason::Busy));
        }

        let mut store = lock(&self.store);
        let source = store
            .locate(occupant_id)
            .ok_or(MoveOutcome::Aborted(AbortReason::StaleReference))?;
        if source == target {
            return Err(MoveOutcome::Aborted(AbortReason::NoOp));
        }

        if let Container::Room(room_id) = target {
            let occupancy = store
                .occupancy(room_id)
                .ok_or(MoveOutcome::Aborted(AbortReason::UnknownTarget))?;
            // Source differs from target, so the mover is not counted there
            if !occupancy.admits(false) {
                tracing::debug!(room = %room_id, %occupancy, "Local capacity rejection");
                return Err(MoveOutcome::RejectedFull);
            }
        }

        let snapshot = store.snapshot();
        let record = store
            .move_occupant(occupant_id, source, target)
            .map_err(|e| {
                tracing::error!(error = %e, "Optimistic move failed");
                MoveOutcome::Aborted(AbortReason::StaleReference)
            })?;
        let revision = store.revision();

        pending.insert(occupant_id);

        Ok(Applied {
            snapshot,
            record,
            revision,
        })
    }

    /// Undo a failed move. The snapshot is used when nothing else touched the store
    /// since; otherwise only this occupant is put back.
    fn roll_back(&self, applied: Applied) {
        let mut store = lock(&self.store);
        if store.revision() == applied.revision {
            store.restore(applied.snapshot);
        } else if let Err(e) = store.revert(&applied.record) {
            tracing::error!(error = %e, "Rollback could not locate occupant");
        }
    }
}

/// Clears the pending flag when the move finishes or its future is dropped.
struct PendingGuard<'a> {
    pending: &'a Mutex<HashSet<Uuid>>,
    occupant_id: Uuid,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.occupant_id);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
