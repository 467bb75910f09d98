//! Drag-reconciliation scenarios against a scripted gateway.
//!
//! The gateway holds each assignment call open until the test releases it, so the
//! optimistic state can be inspected while a move is in flight.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::oneshot;
use uuid::Uuid;

use board_lib::{
    project, AbortReason, AssignmentGateway, AssignmentStore, DragController, Filter,
    GatewayError, MoveOutcome, Notice, NoticeKind, Notifier, SharedStore, Snapshot,
};
use domain::{
    AssignedOccupant, Board, Container, Occupant, Role, Room, RoomWithOccupants,
    MSG_ASSIGNED_TO_ROOM, MSG_ROOM_FULL,
};

type Reply = Result<AssignedOccupant, GatewayError>;

// =============================================================================
// Test doubles
// =============================================================================

#[derive(Default)]
struct ScriptedGateway {
    board: Board,
    calls: Mutex<Vec<(Uuid, Container)>>,
    replies: Mutex<HashMap<Uuid, oneshot::Receiver<Reply>>>,
}

impl ScriptedGateway {
    fn new(board: Board) -> Arc<Self> {
        Arc::new(Self {
            board,
            ..Self::default()
        })
    }

    /// Hold the next call for `occupant` until the returned sender fires.
    fn hold(&self, occupant: Uuid) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().insert(occupant, rx);
        tx
    }

    fn calls(&self) -> Vec<(Uuid, Container)> {
        self.calls.lock().unwrap().clone()
    }

    async fn wait_for_calls(&self, n: usize) {
        while self.calls.lock().unwrap().len() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl AssignmentGateway for ScriptedGateway {
    async fn fetch_board(&self) -> Result<Board, GatewayError> {
        Ok(self.board.clone())
    }

    async fn assign(&self, occupant_id: Uuid, target: Container) -> Reply {
        self.calls.lock().unwrap().push((occupant_id, target));
        let held = self.replies.lock().unwrap().remove(&occupant_id);
        match held {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(GatewayError::Transport("reply dropped".to_string()))),
            None => Ok(accepted(occupant_id, target)),
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn person(name: &str) -> Occupant {
    Occupant {
        id: Uuid::new_v4(),
        name: Some(name.to_string()),
        email: format!("{}@example.com", name.to_lowercase()),
        role: Role::Client,
        avatar_url: None,
        created_at: Utc::now(),
    }
}

fn room(name: &str, capacity: u32, occupants: Vec<Occupant>) -> RoomWithOccupants {
    let now = Utc::now();
    RoomWithOccupants {
        room: Room {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            image_url: None,
            capacity,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
        occupants,
    }
}

fn accepted(occupant_id: Uuid, target: Container) -> AssignedOccupant {
    let mut occupant = person("Accepted");
    occupant.id = occupant_id;
    AssignedOccupant {
        occupant,
        room_id: target.room_id(),
        room_name: target.room_id().map(|_| "Room".to_string()),
    }
}

/// Notifier that inspects the store from inside `notify`, as a re-rendering UI would.
struct StoreReadingNotifier {
    store: SharedStore,
    store_free: Mutex<Vec<bool>>,
}

impl Notifier for StoreReadingNotifier {
    fn notify(&self, _notice: Notice) {
        let free = self.store.try_lock().is_ok();
        self.store_free.lock().unwrap().push(free);
    }
}

/// Room A (cap 2) [X, Y], Room B (cap 3) [P], Room C (cap 2) [R]; unassigned [Z, Q].
struct World {
    controller: DragController,
    gateway: Arc<ScriptedGateway>,
    notifier: Arc<RecordingNotifier>,
    a: Uuid,
    b: Uuid,
    c: Uuid,
    p: Uuid,
    r: Uuid,
    x: Uuid,
    y: Uuid,
    z: Uuid,
    q: Uuid,
}

async fn world() -> World {
    let room_a = room("A", 2, vec![person("X"), person("Y")]);
    let room_b = room("B", 3, vec![person("P")]);
    let room_c = room("C", 2, vec![person("R")]);
    let z = person("Z");
    let q = person("Q");

    let ids = (
        room_a.room.id,
        room_b.room.id,
        room_c.room.id,
        room_b.occupants[0].id,
        room_c.occupants[0].id,
        z.id,
        q.id,
    );
    let (x, y) = (room_a.occupants[0].id, room_a.occupants[1].id);

    let gateway = ScriptedGateway::new(Board {
        rooms: vec![room_a, room_b, room_c],
        unassigned: vec![z, q],
    });
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = DragController::new(
        gateway.clone(),
        notifier.clone(),
        Arc::new(Mutex::new(AssignmentStore::new())),
    );
    controller.load().await.unwrap();

    World {
        controller,
        gateway,
        notifier,
        a: ids.0,
        b: ids.1,
        c: ids.2,
        p: ids.3,
        r: ids.4,
        x,
        y,
        z: ids.5,
        q: ids.6,
    }
}

impl World {
    fn snapshot(&self) -> Snapshot {
        self.controller.read(AssignmentStore::snapshot)
    }

    fn members(&self, container: Container) -> Vec<Uuid> {
        self.controller.read(|s| match container {
            Container::Unassigned => s.unassigned().iter().map(|o| o.id).collect(),
            Container::Room(id) => s
                .room(id)
                .map(|r| r.occupants.iter().map(|o| o.id).collect())
                .unwrap_or_default(),
        })
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_full_room_rejected_without_call() {
    let w = world().await;
    let before = w.snapshot();

    let outcome = w.controller.drag_end(w.z, Container::Room(w.a)).await;

    assert_eq!(outcome, MoveOutcome::RejectedFull);
    assert_eq!(w.snapshot(), before);
    assert!(w.members(Container::Unassigned).contains(&w.z));
    assert!(w.gateway.calls().is_empty());
    assert_eq!(w.notifier.notices(), vec![Notice::error(MSG_ROOM_FULL)]);
}

#[tokio::test]
async fn test_accepted_move_is_visible_before_confirmation() {
    let w = world().await;
    let release = w.gateway.hold(w.q);

    let drive = async {
        w.gateway.wait_for_calls(1).await;
        // Optimistic state while the call is in flight
        assert_eq!(w.members(Container::Room(w.b)), vec![w.p, w.q]);
        assert!(w.controller.is_pending(w.q));
        assert!(w.notifier.notices().is_empty());
        release.send(Ok(accepted(w.q, Container::Room(w.b)))).unwrap();
    };

    let (outcome, _) = tokio::join!(w.controller.drag_end(w.q, Container::Room(w.b)), drive);

    assert!(matches!(outcome, MoveOutcome::Confirmed(ref a) if a.room_id == Some(w.b)));
    assert_eq!(w.members(Container::Room(w.b)), vec![w.p, w.q]);
    assert_eq!(w.members(Container::Unassigned), vec![w.z]);
    assert_eq!(w.gateway.calls(), vec![(w.q, Container::Room(w.b))]);
    assert_eq!(w.notifier.notices(), vec![Notice::success(MSG_ASSIGNED_TO_ROOM)]);
}

#[tokio::test]
async fn test_server_capacity_rejection_reverts_exactly() {
    let w = world().await;
    let before = w.snapshot();
    let release = w.gateway.hold(w.q);

    let drive = async {
        w.gateway.wait_for_calls(1).await;
        assert!(w.members(Container::Room(w.b)).contains(&w.q));
        release
            .send(Err(GatewayError::CapacityExceeded(MSG_ROOM_FULL.to_string())))
            .unwrap();
    };

    let (outcome, _) = tokio::join!(w.controller.drag_end(w.q, Container::Room(w.b)), drive);

    assert!(matches!(outcome, MoveOutcome::RolledBack(GatewayError::CapacityExceeded(_))));
    assert_eq!(w.snapshot(), before);
    assert_eq!(w.members(Container::Unassigned), vec![w.z, w.q]);
    let notices = w.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].message, MSG_ROOM_FULL);
}

#[tokio::test]
async fn test_same_room_move_does_nothing() {
    let w = world().await;
    let before = w.snapshot();

    let outcome = w.controller.drag_end(w.r, Container::Room(w.c)).await;

    assert_eq!(outcome, MoveOutcome::Aborted(AbortReason::NoOp));
    assert_eq!(w.snapshot(), before);
    assert!(w.gateway.calls().is_empty());
    assert!(w.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_empty_fetch_renders_empty() {
    let gateway = ScriptedGateway::new(Board::default());
    let controller = DragController::new(
        gateway,
        Arc::new(RecordingNotifier::default()),
        Arc::new(Mutex::new(AssignmentStore::new())),
    );

    controller.load().await.unwrap();

    controller.read(|store| {
        let view = project(store, &Filter::default());
        assert!(view.rooms.is_empty());
        assert!(view.unassigned.is_empty());
        assert!(!view.no_rooms_match);
    });
}

// =============================================================================
// Properties
// =============================================================================

#[tokio::test]
async fn test_rollback_restores_source_position() {
    let w = world().await;
    let before = w.snapshot();
    // Z sits at index 0 of the unassigned pool
    let release = w.gateway.hold(w.z);

    let drive = async {
        w.gateway.wait_for_calls(1).await;
        assert_eq!(w.members(Container::Unassigned), vec![w.q]);
        release
            .send(Err(GatewayError::Server {
                status: 500,
                message: "A database error occurred".to_string(),
            }))
            .unwrap();
    };

    let (outcome, _) = tokio::join!(w.controller.drag_end(w.z, Container::Room(w.c)), drive);

    assert!(matches!(outcome, MoveOutcome::RolledBack(_)));
    assert_eq!(w.snapshot(), before);
    assert_eq!(w.members(Container::Unassigned), vec![w.z, w.q]);
}

#[tokio::test]
async fn test_second_move_for_pending_occupant_is_refused() {
    let w = world().await;
    let release = w.gateway.hold(w.q);

    let drive = async {
        w.gateway.wait_for_calls(1).await;
        let second = w.controller.drag_end(w.q, Container::Room(w.c)).await;
        assert_eq!(second, MoveOutcome::Aborted(AbortReason::Busy));
        release.send(Ok(accepted(w.q, Container::Room(w.b)))).unwrap();
    };

    let (outcome, _) = tokio::join!(w.controller.drag_end(w.q, Container::Room(w.b)), drive);

    assert!(matches!(outcome, MoveOutcome::Confirmed(_)));
    assert_eq!(w.gateway.calls().len(), 1);
    assert_eq!(w.notifier.notices().len(), 1);
    assert!(!w.controller.is_pending(w.q));
}

async fn concurrent_success_and_failure(fail_first: bool) {
    let w = world().await;
    let release_q = w.gateway.hold(w.q);
    let release_z = w.gateway.hold(w.z);

    let drive = async {
        w.gateway.wait_for_calls(2).await;
        assert!(w.members(Container::Room(w.b)).contains(&w.q));
        assert!(w.members(Container::Room(w.c)).contains(&w.z));

        let fail = Err(GatewayError::Transport("connection reset".to_string()));
        if fail_first {
            release_z.send(fail).unwrap();
            tokio::task::yield_now().await;
            release_q.send(Ok(accepted(w.q, Container::Room(w.b)))).unwrap();
        } else {
            release_q.send(Ok(accepted(w.q, Container::Room(w.b)))).unwrap();
            tokio::task::yield_now().await;
            release_z.send(fail).unwrap();
        }
    };

    let (q_outcome, z_outcome, _) = tokio::join!(
        w.controller.drag_end(w.q, Container::Room(w.b)),
        w.controller.drag_end(w.z, Container::Room(w.c)),
        drive
    );

    assert!(matches!(q_outcome, MoveOutcome::Confirmed(_)));
    assert!(matches!(z_outcome, MoveOutcome::RolledBack(_)));
    assert_eq!(w.members(Container::Room(w.b)), vec![w.p, w.q]);
    assert_eq!(w.members(Container::Room(w.c)), vec![w.r]);
    assert_eq!(w.members(Container::Unassigned), vec![w.z]);

    let notices = w.notifier.notices();
    assert_eq!(notices.len(), 2);
    assert_eq!(
        notices.iter().filter(|n| n.kind == NoticeKind::Success).count(),
        1
    );
    assert_eq!(
        notices.iter().filter(|n| n.kind == NoticeKind::Error).count(),
        1
    );
}

#[tokio::test]
async fn test_concurrent_moves_resolve_independently_failure_first() {
    concurrent_success_and_failure(true).await;
}

#[tokio::test]
async fn test_concurrent_moves_resolve_independently_success_first() {
    concurrent_success_and_failure(false).await;
}

#[tokio::test]
async fn test_failed_move_does_not_undo_later_move() {
    let w = world().await;
    let release_z = w.gateway.hold(w.z);

    let drive = async {
        w.gateway.wait_for_calls(1).await;
        // Q moves and confirms while Z is still in flight
        let q = w.controller.drag_end(w.q, Container::Room(w.b)).await;
        assert!(matches!(q, MoveOutcome::Confirmed(_)));
        release_z
            .send(Err(GatewayError::NotFound("Room not found".to_string())))
            .unwrap();
    };

    let (z_outcome, _) = tokio::join!(w.controller.drag_end(w.z, Container::Room(w.c)), drive);

    assert!(matches!(z_outcome, MoveOutcome::RolledBack(GatewayError::NotFound(_))));
    assert_eq!(w.members(Container::Room(w.b)), vec![w.p, w.q]);
    assert_eq!(w.members(Container::Room(w.c)), vec![w.r]);
    assert_eq!(w.members(Container::Unassigned), vec![w.z]);
    assert!(w
        .notifier
        .notices()
        .contains(&Notice::error("Room not found")));
}

async fn two_failures_out_of_one_room(first_fails: fn(&World) -> Uuid) {
    let w = world().await;
    let before = w.snapshot();
    let mut release_x = Some(w.gateway.hold(w.x));
    let mut release_y = Some(w.gateway.hold(w.y));

    let drive = async {
        w.gateway.wait_for_calls(2).await;
        assert!(w.members(Container::Room(w.a)).is_empty());

        let fail = || Err(GatewayError::Transport("connection reset".to_string()));
        let (first, second) = if first_fails(&w) == w.x {
            (release_x.take(), release_y.take())
        } else {
            (release_y.take(), release_x.take())
        };
        first.unwrap().send(fail()).unwrap();
        tokio::task::yield_now().await;
        second.unwrap().send(fail()).unwrap();
    };

    let (x_outcome, y_outcome, _) = tokio::join!(
        w.controller.drag_end(w.x, Container::Unassigned),
        w.controller.drag_end(w.y, Container::Unassigned),
        drive
    );

    assert!(matches!(x_outcome, MoveOutcome::RolledBack(_)));
    assert!(matches!(y_outcome, MoveOutcome::RolledBack(_)));
    assert_eq!(w.members(Container::Room(w.a)), vec![w.x, w.y]);
    assert_eq!(w.members(Container::Unassigned), vec![w.z, w.q]);
    assert_eq!(w.snapshot(), before);
}

#[tokio::test]
async fn test_two_failures_restore_room_order_in_start_order() {
    two_failures_out_of_one_room(|w| w.x).await;
}

#[tokio::test]
async fn test_two_failures_restore_room_order_in_reverse_order() {
    two_failures_out_of_one_room(|w| w.y).await;
}

#[tokio::test]
async fn test_notifier_may_read_store_on_every_outcome() {
    let room_a = room("A", 1, vec![person("X")]);
    let room_b = room("B", 2, vec![]);
    let (a, b) = (room_a.room.id, room_b.room.id);
    let z = person("Z");
    let q = person("Q");
    let (z_id, q_id) = (z.id, q.id);

    let gateway = ScriptedGateway::new(Board {
        rooms: vec![room_a, room_b],
        unassigned: vec![z, q],
    });
    let store: SharedStore = Arc::new(Mutex::new(AssignmentStore::new()));
    let notifier = Arc::new(StoreReadingNotifier {
        store: store.clone(),
        store_free: Mutex::new(Vec::new()),
    });
    let controller = DragController::new(gateway.clone(), notifier.clone(), store);
    controller.load().await.unwrap();

    // Local rejection
    assert_eq!(
        controller.drag_end(z_id, Container::Room(a)).await,
        MoveOutcome::RejectedFull
    );
    // Confirmed
    assert!(matches!(
        controller.drag_end(z_id, Container::Room(b)).await,
        MoveOutcome::Confirmed(_)
    ));
    // Rolled back
    let release = gateway.hold(q_id);
    release
        .send(Err(GatewayError::NotFound("Room not found".to_string())))
        .unwrap();
    assert!(matches!(
        controller.drag_end(q_id, Container::Room(b)).await,
        MoveOutcome::RolledBack(_)
    ));

    assert_eq!(*notifier.store_free.lock().unwrap(), vec![true, true, true]);
}
