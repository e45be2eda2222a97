//! The transport agent — a single crane that moves, then operates.
//!
//! The agent state ([`TransportAgent`]) lives inside the [`Warehouse`] so there
//! is exactly one owner. Callers drive it through [`Transport`], a handle that
//! mutably borrows the warehouse for the duration of a request. A host that
//! shares a warehouse between threads has to put it behind a lock; two moves
//! can never interleave.
//!
//! Every request moves the agent first. The move sticks even if the put or get
//! that follows is rejected.

use serde::{Deserialize, Serialize};

use crate::entity::StoredEntity;
use crate::position::Position;
use crate::warehouse::{PutRejected, Warehouse};

/// Running counters for the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    pub moves: u64,
    pub completed_puts: u64,
    pub completed_gets: u64,
    pub failed_operations: u64,
    /// Handling time booked for completed operations.
    pub busy_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportAgent {
    current_position: Position,
    stats: AgentStats,
}

impl TransportAgent {
    /// Agent parked at the origin with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_position(&self) -> Position {
        self.current_position
    }

    pub fn stats(&self) -> &AgentStats {
        &self.stats
    }

    /// Relocate without validation; the warehouse validates on the next operation.
    pub fn move_to(&mut self, position: Position) {
        log::trace!("transport agent {} -> {}", self.current_position, position);
        self.current_position = position;
        self.stats.moves += 1;
    }

    fn record_put(&mut self, inbound_time: f64) {
        self.stats.completed_puts += 1;
        self.stats.busy_time += inbound_time;
    }

    fn record_get(&mut self, outbound_time: f64) {
        self.stats.completed_gets += 1;
        self.stats.busy_time += outbound_time;
    }

    fn record_failure(&mut self) {
        self.stats.failed_operations += 1;
    }
}

/// Exclusive handle for driving the warehouse's transport agent.
pub struct Transport<'a> {
    warehouse: &'a mut Warehouse,
}

impl<'a> Transport<'a> {
    pub(crate) fn new(warehouse: &'a mut Warehouse) -> Self {
        Self { warehouse }
    }

    pub fn current_position(&self) -> Position {
        self.warehouse.agent().current_position()
    }

    pub fn move_to(&mut self, position: Position) {
        self.warehouse.agent_mut().move_to(position);
    }

    /// Move to `position`, then store `entity` there.
    pub fn put(&mut self, entity: StoredEntity, position: Position) -> bool {
        self.try_put(entity, position).is_ok()
    }

    /// Like [`put`](Self::put) but hands the entity back on rejection.
    pub fn try_put(&mut self, entity: StoredEntity, position: Position) -> Result<(), PutRejected> {
        self.move_to(position);
        let inbound_time = self.warehouse.config().inbound_time;
        let result = self.warehouse.try_put(entity, position);
        let agent = self.warehouse.agent_mut();
        match &result {
            Ok(()) => agent.record_put(inbound_time),
            Err(_) => agent.record_failure(),
        }
        result
    }

    /// Move to `position`, then retrieve one entity under the active policy.
    pub fn get(&mut self, position: Position) -> Option<StoredEntity> {
        self.move_to(position);
        let outbound_time = self.warehouse.config().outbound_time;
        let entity = self.warehouse.get(position);
        let agent = self.warehouse.agent_mut();
        match &entity {
            Some(_) => agent.record_get(outbound_time),
            None => agent.record_failure(),
        }
        entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WarehouseConfig;
    use crate::position::GridDimensions;
    use crate::warehouse::RejectReason;

    fn warehouse() -> Warehouse {
        let config = WarehouseConfig {
            max_items_per_cell: 1,
            inbound_time: 3.0,
            outbound_time: 2.0,
            ..WarehouseConfig::new(GridDimensions::new(3, 4, 5))
        };
        Warehouse::new(config).unwrap()
    }

    #[test]
    fn test_starts_at_origin() {
        let wh = warehouse();
        assert_eq!(wh.agent().current_position(), Position::ORIGIN);
        assert_eq!(*wh.agent().stats(), AgentStats::default());
    }

    #[test]
    fn test_move_to_is_unvalidated() {
        let mut wh = warehouse();
        let far = Position::new(50, 60, 70);
        wh.transport().move_to(far);
        assert_eq!(wh.agent().current_position(), far);
        assert_eq!(wh.agent().stats().moves, 1);
    }

    #[test]
    fn test_put_moves_and_stores() {
        let mut wh = warehouse();
        let pos = Position::new(2, 3, 4);
        assert!(wh.transport().put(StoredEntity::new("ITEM001", "Test Item"), pos));
        assert_eq!(wh.agent().current_position(), pos);
        assert_eq!(wh.entities_at(pos).len(), 1);
        assert_eq!(wh.agent().stats().completed_puts, 1);
        assert_eq!(wh.agent().stats().busy_time, 3.0);
    }

    #[test]
    fn test_failed_put_still_moves() {
        let mut wh = warehouse();
        let outside = Position::new(9, 9, 9);
        let rejected = wh
            .transport()
            .try_put(StoredEntity::new("ITEM001", "Test Item"), outside)
            .unwrap_err();
        assert_eq!(rejected.reason, RejectReason::OutOfBounds);
        assert_eq!(rejected.entity.id, "ITEM001");
        assert_eq!(wh.agent().current_position(), outside);
        assert_eq!(wh.agent().stats().failed_operations, 1);
        assert_eq!(wh.agent().stats().busy_time, 0.0);
    }

    #[test]
    fn test_get_moves_and_returns() {
        let mut wh = warehouse();
        let pos = Position::new(1, 1, 1);
        wh.put(StoredEntity::new("ITEM002", "Item 2"), pos);

        let out = wh.transport().get(pos).unwrap();
        assert_eq!(out.id, "ITEM002");
        assert_eq!(wh.agent().current_position(), pos);
        assert_eq!(wh.agent().stats().completed_gets, 1);
        assert_eq!(wh.agent().stats().busy_time, 2.0);
    }

    #[test]
    fn test_get_from_empty_still_moves() {
        let mut wh = warehouse();
        let pos = Position::new(2, 2, 2);
        assert!(wh.transport().get(pos).is_none());
        assert_eq!(wh.agent().current_position(), pos);
        assert_eq!(wh.agent().stats().failed_operations, 1);
    }

    #[test]
    fn test_get_out_of_bounds_still_moves() {
        let mut wh = warehouse();
        let stored = Position::new(0, 0, 1);
        wh.put(StoredEntity::new("ITEM003", "Item 3"), stored);

        let outside = Position::new(-1, 7, 9);
        assert!(wh.transport().get(outside).is_none());
        assert_eq!(wh.agent().current_position(), outside);
        assert_eq!(wh.agent().stats().moves, 1);
        assert_eq!(wh.agent().stats().failed_operations, 1);
        assert_eq!(wh.agent().stats().completed_gets, 0);
        assert_eq!(wh.agent().stats().busy_time, 0.0);
        assert_eq!(wh.total_entity_count(), 1);
        assert_eq!(wh.entities_at(stored)[0].id, "ITEM003");
    }

    #[test]
    fn test_sequence_tracks_last_position() {
        let mut wh = warehouse();
        let pos1 = Position::new(1, 1, 1);
        let pos2 = Position::new(2, 2, 2);
        wh.put(StoredEntity::new("ITEM002", "Item 2"), pos2);

        let mut crane = wh.transport();
        assert!(crane.put(StoredEntity::new("ITEM001", "Item 1"), pos1));
        assert_eq!(crane.current_position(), pos1);
        assert_eq!(crane.get(pos2).unwrap().id, "ITEM002");
        assert_eq!(crane.current_position(), pos2);

        let stats = wh.agent().stats();
        assert_eq!(stats.moves, 2);
        assert_eq!(stats.completed_puts, 1);
        assert_eq!(stats.completed_gets, 1);
        assert_eq!(stats.busy_time, 5.0);
    }

    #[test]
    fn test_direct_calls_do_not_touch_agent() {
        let mut wh = warehouse();
        let pos = Position::new(1, 2, 3);
        wh.put(StoredEntity::new("A", "a"), pos);
        wh.get(pos);
        assert_eq!(wh.agent().current_position(), Position::ORIGIN);
        assert_eq!(wh.agent().stats().moves, 0);
    }
}
