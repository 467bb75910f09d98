//! In-memory assignment store: the single source of truth for rendering.
//!
//! Rooms keep the order they were loaded in and occupants keep insertion order inside
//! each container. The store never sorts.
//!
//! Every occupant carries an ordering slot. Slots only grow: loading hands them out in
//! display order and each move takes a fresh one, so slots ascend within every container.
//! A reverted occupant gets its old slot back and is inserted by it, which lands it between
//! the same neighbours it left whichever other moves were undone before or after it.

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use domain::{Board, Container, Occupancy, Occupant, RoomWithOccupants};

/// Rejected store mutations. The store is left untouched when one is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Unknown container {0}")]
    UnknownContainer(Container),

    #[error("Occupant {occupant} is not in {container}")]
    NotInContainer { occupant: Uuid, container: Container },
}

/// Deep copy of the store contents, independent of later mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    rooms: Vec<RoomWithOccupants>,
    unassigned: Vec<Occupant>,
    slots: HashMap<Uuid, u64>,
}

/// Undo information for a single applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub occupant_id: Uuid,
    pub from: Container,
    /// Ordering slot the occupant held in `from`
    pub from_slot: u64,
    pub to: Container,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentStore {
    rooms: Vec<RoomWithOccupants>,
    unassigned: Vec<Occupant>,
    slots: HashMap<Uuid, u64>,
    next_slot: u64,
    /// Bumped on every mutation
    revision: u64,
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_board(board: Board) -> Self {
        let mut store = Self::default();
        store.load(board);
        store
    }

    /// Replace everything with a freshly fetched board.
    pub fn replace(&mut self, board: Board) {
        self.load(board);
        self.revision += 1;
    }

    fn load(&mut self, board: Board) {
        self.rooms = board.rooms;
        self.unassigned = board.unassigned;
        self.slots.clear();

        let ids: Vec<Uuid> = self
            .rooms
            .iter()
            .flat_map(|r| r.occupants.iter())
            .chain(self.unassigned.iter())
            .map(|o| o.id)
            .collect();
        for id in ids {
            let slot = self.fresh_slot();
            self.slots.insert(id, slot);
        }
    }

    pub fn rooms(&self) -> &[RoomWithOccupants] {
        &self.rooms
    }

    pub fn unassigned(&self) -> &[Occupant] {
        &self.unassigned
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn room(&self, room_id: Uuid) -> Option<&RoomWithOccupants> {
        self.rooms.iter().find(|r| r.room.id == room_id)
    }

    pub fn occupancy(&self, room_id: Uuid) -> Option<Occupancy> {
        self.room(room_id).map(RoomWithOccupants::occupancy)
    }

    /// Container currently holding the occupant, if any.
    pub fn locate(&self, occupant_id: Uuid) -> Option<Container> {
        if self.unassigned.iter().any(|o| o.id == occupant_id) {
            return Some(Container::Unassigned);
        }
        self.rooms
            .iter()
            .find(|r| r.contains(occupant_id))
            .map(|r| Container::Room(r.room.id))
    }

    pub fn occupant(&self, occupant_id: Uuid) -> Option<&Occupant> {
        self.unassigned
            .iter()
            .chain(self.rooms.iter().flat_map(|r| r.occupants.iter()))
            .find(|o| o.id == occupant_id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rooms: self.rooms.clone(),
            unassigned: self.unassigned.clone(),
            slots: self.slots.clone(),
        }
    }

    /// Wholesale replacement with an earlier snapshot.
    ///
    /// `next_slot` is not rewound, so slots handed out later stay above every restored one.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.rooms = snapshot.rooms;
        self.unassigned = snapshot.unassigned;
        self.slots = snapshot.slots;
        self.revision += 1;
    }

    /// Remove the occupant from `from` and append it to `to`.
    pub fn move_occupant(
        &mut self,
        occupant_id: Uuid,
        from: Container,
        to: Container,
    ) -> Result<MoveRecord, StoreError> {
        if self.members(to).is_none() {
            return Err(StoreError::UnknownContainer(to));
        }
        let source = self
            .members(from)
            .ok_or(StoreError::UnknownContainer(from))?;
        let from_index = source
            .iter()
            .position(|o| o.id == occupant_id)
            .ok_or(StoreError::NotInContainer {
                occupant: occupant_id,
                container: from,
            })?;

        let from_slot = self.slot(occupant_id);
        let occupant = self.take(from, from_index)?;
        self.push(to, occupant)?;
        let slot = self.fresh_slot();
        self.slots.insert(occupant_id, slot);
        self.revision += 1;

        Ok(MoveRecord {
            occupant_id,
            from,
            from_slot,
            to,
        })
    }

    /// Undo one move: take the occupant back out of `to` and reinsert it by its old slot.
    ///
    /// Only this occupant moves, so moves applied since are preserved. Members of `from`
    /// that left and came back through their own reverts keep their relative order.
    pub fn revert(&mut self, record: &MoveRecord) -> Result<(), StoreError> {
        if self.members(record.from).is_none() {
            return Err(StoreError::UnknownContainer(record.from));
        }
        let current = self
            .members(record.to)
            .ok_or(StoreError::UnknownContainer(record.to))?
            .iter()
            .position(|o| o.id == record.occupant_id)
            .ok_or(StoreError::NotInContainer {
                occupant: record.occupant_id,
                container: record.to,
            })?;

        let index = self
            .members(record.from)
            .ok_or(StoreError::UnknownContainer(record.from))?
            .iter()
            .position(|o| self.slot(o.id) > record.from_slot);

        let occupant = self.take(record.to, current)?;
        let members = self
            .members_mut(record.from)
            .ok_or(StoreError::UnknownContainer(record.from))?;
        match index {
            Some(index) => members.insert(index, occupant),
            None => members.push(occupant),
        }
        self.slots.insert(record.occupant_id, record.from_slot);
        self.revision += 1;

        Ok(())
    }

    fn slot(&self, occupant_id: Uuid) -> u64 {
        self.slots.get(&occupant_id).copied().unwrap_or(u64::MAX)
    }

    fn fresh_slot(&mut self) -> u64 {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }

    fn take(&mut self, container: Container, index: usize) -> Result<Occupant, StoreError> {
        let members = self
            .members_mut(container)
            .ok_or(StoreError::UnknownContainer(container))?;
        Ok(members.remove(index))
    }

    fn push(&mut self, container: Container, occupant: Occupant) -> Result<(), StoreError> {
        self.members_mut(container)
            .ok_or(StoreError::UnknownContainer(container))?
            .push(occupant);
        Ok(())
    }

    fn members(&self, container: Container) -> Option<&Vec<Occupant>> {
        match container {
            Container::Unassigned => Some(&self.unassigned),
            Container::Room(id) => self
                .rooms
                .iter()
                .find(|r| r.room.id == id)
                .map(|r| &r.occupants),
        }
    }

    fn members_mut(&mut self, container: Container) -> Option<&mut Vec<Occupant>> {
        match container {
            Container::Unassigned => Some(&mut self.unassigned),
            Container::Room(id) => self
                .rooms
                .iter_mut()
                .find(|r| r.room.id == id)
                .map(|r| &mut r.occupants),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{occupant, room};
    use super::*;
    use domain::Role;

    fn ids(list: &[Occupant]) -> Vec<Uuid> {
        list.iter().map(|o| o.id).collect()
    }

    fn store() -> (AssignmentStore, Uuid, Uuid) {
        let a = room("A", 2, vec![occupant("X", Role::Client), occupant("Y", Role::Client)]);
        let b = room("B", 3, vec![occupant("P", Role::Worker)]);
        let (a_id, b_id) = (a.room.id, b.room.id);
        let store = AssignmentStore::from_board(Board {
            rooms: vec![a, b],
            unassigned: vec![occupant("Z", Role::Client), occupant("Q", Role::Client)],
        });
        (store, a_id, b_id)
    }

    #[test]
    fn test_locate() {
        let (store, a, _) = store();
        let x = store.rooms()[0].occupants[0].id;
        let z = store.unassigned()[0].id;

        assert_eq!(store.locate(x), Some(Container::Room(a)));
        assert_eq!(store.locate(z), Some(Container::Unassigned));
        assert_eq!(store.locate(Uuid::new_v4()), None);
    }

    #[test]
    fn test_move_appends_and_keeps_attributes() {
        let (mut store, _, b) = store();
        let q = store.unassigned()[1].clone();

        store
            .move_occupant(q.id, Container::Unassigned, Container::Room(b))
            .unwrap();

        let room_b = store.room(b).unwrap();
        assert_eq!(room_b.occupants.last(), Some(&q));
        assert_eq!(store.unassigned().len(), 1);
    }

    #[test]
    fn test_rejected_move_leaves_store_untouched() {
        let (mut store, a, b) = store();
        let before = store.snapshot();
        let revision = store.revision();
        let z = store.unassigned()[0].id;

        // Wrong source
        assert!(matches!(
            store.move_occupant(z, Container::Room(a), Container::Room(b)),
            Err(StoreError::NotInContainer { .. })
        ));
        // Unknown target
        let ghost = Container::Room(Uuid::new_v4());
        assert_eq!(
            store.move_occupant(z, Container::Unassigned, ghost),
            Err(StoreError::UnknownContainer(ghost))
        );

        assert_eq!(store.snapshot(), before);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let (mut store, _, b) = store();
        let snapshot = store.snapshot();
        let z = store.unassigned()[0].id;

        store
            .move_occupant(z, Container::Unassigned, Container::Room(b))
            .unwrap();
        assert_ne!(store.snapshot(), snapshot);

        store.restore(snapshot.clone());
        assert_eq!(store.snapshot(), snapshot);
    }

    #[test]
    fn test_revert_restores_position() {
        let (mut store, a, b) = store();
        let before = store.snapshot();
        let x = store.rooms()[0].occupants[0].id;

        let record = store
            .move_occupant(x, Container::Room(a), Container::Room(b))
            .unwrap();
        assert_eq!(record.from_slot, 0);
        assert_eq!(ids(&store.room(a).unwrap().occupants).len(), 1);

        store.revert(&record).unwrap();
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_revert_preserves_unrelated_moves() {
        let (mut store, a, b) = store();
        let z = store.unassigned()[0].id;
        let q = store.unassigned()[1].id;
        let x = store.rooms()[0].occupants[0].id;

        let first = store
            .move_occupant(z, Container::Unassigned, Container::Room(b))
            .unwrap();
        store
            .move_occupant(x, Container::Room(a), Container::Unassigned)
            .unwrap();

        store.revert(&first).unwrap();

        assert_eq!(ids(store.unassigned()), vec![z, q, x]);
        assert_eq!(store.locate(x), Some(Container::Unassigned));
        assert!(!store.room(b).unwrap().contains(z));
    }

    #[test]
    fn test_reverts_out_of_one_room_restore_order_in_any_sequence() {
        for reverse in [false, true] {
            let (mut store, a, _) = store();
            let before = ids(&store.room(a).unwrap().occupants);
            let (x, y) = (before[0], before[1]);

            let x_move = store
                .move_occupant(x, Container::Room(a), Container::Unassigned)
                .unwrap();
            let y_move = store
                .move_occupant(y, Container::Room(a), Container::Unassigned)
                .unwrap();
            assert!(store.room(a).unwrap().occupants.is_empty());

            let order = if reverse { [y_move, x_move] } else { [x_move, y_move] };
            for record in &order {
                store.revert(record).unwrap();
            }

            assert_eq!(ids(&store.room(a).unwrap().occupants), before, "reverse={}", reverse);
            assert_eq!(store.unassigned().len(), 2);
        }
    }

    #[test]
    fn test_revert_lands_before_later_arrivals() {
        let (mut store, a, b) = store();
        let x = store.rooms()[0].occupants[0].id;
        let y = store.rooms()[0].occupants[1].id;
        let p = store.room(b).unwrap().occupants[0].id;

        let x_move = store
            .move_occupant(x, Container::Room(a), Container::Unassigned)
            .unwrap();
        store
            .move_occupant(p, Container::Room(b), Container::Room(a))
            .unwrap();

        store.revert(&x_move).unwrap();

        assert_eq!(ids(&store.room(a).unwrap().occupants), vec![x, y, p]);
    }
}
