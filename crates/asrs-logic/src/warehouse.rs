//! Warehouse orchestration — the grid of cells and everything done to it.
//!
//! The grid is dense: one [`Cell`] per valid position, created when the
//! warehouse is built and never removed. Cells are stored in a flat vector
//! indexed by [`GridDimensions::index_of`], so every scan runs x-major, then y,
//! then z.
//!
//! Soft failures are the rule here. An invalid position, a full cell or an
//! empty cell yield `false`, `None` or an empty list and leave every cell
//! untouched. The only hard errors are bad cost parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell::Cell;
use crate::config::WarehouseConfig;
use crate::cost::HoldingCostPolicy;
use crate::entity::StoredEntity;
use crate::error::{Result, WarehouseError};
use crate::position::{GridDimensions, Position};
use crate::retrieval::RetrievalPolicy;
use crate::transport::{Transport, TransportAgent};

/// Why a put was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("position is outside the grid")]
    OutOfBounds,
    #[error("cell is at capacity")]
    CellFull,
}

/// A refused put. The entity is handed back untouched.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot store '{}' at {position}: {reason}", .entity.id)]
pub struct PutRejected {
    pub entity: StoredEntity,
    pub position: Position,
    pub reason: RejectReason,
}

impl PutRejected {
    pub fn into_entity(self) -> StoredEntity {
        self.entity
    }
}

/// Occupancy of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCapacity {
    pub current: usize,
    pub max: usize,
    pub available: usize,
}

#[derive(Debug, Clone)]
pub struct Warehouse {
    config: WarehouseConfig,
    cells: Vec<Cell>,
    retrieval_policy: RetrievalPolicy,
    holding_cost_policy: HoldingCostPolicy,
    agent: TransportAgent,
}

impl Warehouse {
    /// Validate `config` and build every cell up front.
    pub fn new(config: WarehouseConfig) -> Result<Self> {
        config.validate()?;
        let dims = config.dimensions;
        let cells: Vec<Cell> = dims.positions().map(Cell::new).collect();
        log::info!(
            "warehouse built: {} grid, {} cells, capacity {} per cell, {} retrieval, {} holding cost",
            dims,
            cells.len(),
            config.max_items_per_cell,
            config.retrieval_policy,
            config.holding_cost_policy
        );
        Ok(Self {
            retrieval_policy: config.retrieval_policy,
            holding_cost_policy: config.holding_cost_policy,
            config,
            cells,
            agent: TransportAgent::new(),
        })
    }

    /// Grid of `x * y * z` cells with default settings.
    pub fn with_dimensions(x: u32, y: u32, z: u32) -> Result<Self> {
        Self::new(WarehouseConfig::new(GridDimensions::new(x, y, z)))
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.config.dimensions
    }

    pub fn max_items_per_cell(&self) -> usize {
        self.config.max_items_per_cell
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_valid_position(&self, position: Position) -> bool {
        self.config.dimensions.contains(position)
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        let idx = self.config.dimensions.index_of(position)?;
        self.cells.get(idx)
    }

    fn cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        let idx = self.config.dimensions.index_of(position)?;
        self.cells.get_mut(idx)
    }

    /// All cells in scan order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    fn is_full(&self, cell: &Cell) -> bool {
        cell.len() >= self.config.max_items_per_cell
    }

    // ── Mutators ──────────────────────────────────────────────────────────

    /// Store `entity` at `position`. False (and no change) if the position is
    /// invalid or the cell is full.
    pub fn put(&mut self, entity: StoredEntity, position: Position) -> bool {
        self.try_put(entity, position).is_ok()
    }

    /// Like [`put`](Self::put), returning the entity and the reason on refusal.
    pub fn try_put(
        &mut self,
        entity: StoredEntity,
        position: Position,
    ) -> std::result::Result<(), PutRejected> {
        let capacity = self.config.max_items_per_cell;
        let reason = match self.cell_mut(position) {
            None => RejectReason::OutOfBounds,
            Some(cell) if cell.len() >= capacity => RejectReason::CellFull,
            Some(cell) => {
                cell.add(entity);
                return Ok(());
            }
        };
        log::debug!("put of '{}' at {} rejected: {}", entity.id, position, reason);
        Err(PutRejected {
            entity,
            position,
            reason,
        })
    }

    /// Remove one entity from `position` under the active retrieval policy.
    pub fn get(&mut self, position: Position) -> Option<StoredEntity> {
        let policy = self.retrieval_policy;
        let cell = self.cell_mut(position)?;
        policy.retrieve(cell)
    }

    /// Takes effect on the next `get`.
    pub fn set_retrieval_policy(&mut self, policy: RetrievalPolicy) {
        if policy != self.retrieval_policy {
            log::debug!("retrieval policy {} -> {}", self.retrieval_policy, policy);
        }
        self.retrieval_policy = policy;
    }

    pub fn retrieval_policy(&self) -> RetrievalPolicy {
        self.retrieval_policy
    }

    pub fn set_holding_cost_policy(&mut self, policy: HoldingCostPolicy) {
        if policy != self.holding_cost_policy {
            log::debug!("holding cost policy {} -> {}", self.holding_cost_policy, policy);
        }
        self.holding_cost_policy = policy;
    }

    pub fn holding_cost_policy(&self) -> HoldingCostPolicy {
        self.holding_cost_policy
    }

    // ── Transport agent ───────────────────────────────────────────────────

    pub fn agent(&self) -> &TransportAgent {
        &self.agent
    }

    pub(crate) fn agent_mut(&mut self) -> &mut TransportAgent {
        &mut self.agent
    }

    /// Exclusive handle for move-then-operate requests.
    pub fn transport(&mut self) -> Transport<'_> {
        Transport::new(self)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Copy of the contents at `position`; empty for an invalid position.
    pub fn entities_at(&self, position: Position) -> Vec<StoredEntity> {
        self.cell(position).map(Cell::snapshot).unwrap_or_default()
    }

    /// Positions holding at least one entity with `id`, each listed once.
    pub fn find_positions(&self, id: &str) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|cell| cell.contains_id(id))
            .map(Cell::position)
            .collect()
    }

    pub fn total_entity_count(&self) -> usize {
        self.cells.iter().map(Cell::len).sum()
    }

    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|cell| cell.is_empty())
            .map(Cell::position)
            .collect()
    }

    /// Positions whose cell can take at least one more entity.
    pub fn available_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|cell| !self.is_full(cell))
            .map(Cell::position)
            .collect()
    }

    /// First position in scan order with room left, if any.
    pub fn first_available_position(&self) -> Option<Position> {
        self.cells
            .iter()
            .find(|cell| !self.is_full(cell))
            .map(Cell::position)
    }

    pub fn cell_capacity_info(&self, position: Position) -> Option<CellCapacity> {
        let cell = self.cell(position)?;
        let max = self.config.max_items_per_cell;
        let current = cell.len();
        Some(CellCapacity {
            current,
            max,
            available: max.saturating_sub(current),
        })
    }

    // ── Holding cost ──────────────────────────────────────────────────────

    /// Cost accrued by the whole warehouse under the active policy.
    ///
    /// `elapsed` must be finite and non-negative even for
    /// [`HoldingCostPolicy::PerEntityUnit`], which ignores it.
    pub fn total_holding_cost(&self, elapsed: f64) -> Result<f64> {
        WarehouseError::check_non_negative("elapsed", elapsed)?;
        let policy = self.holding_cost_policy;
        let rate = self.config.cost_rate;
        Ok(self
            .cells
            .iter()
            .filter(|cell| !cell.is_empty())
            .map(|cell| policy.cell_cost(cell, rate, elapsed))
            .sum())
    }

    /// Cost accrued by one cell; `Ok(None)` for an invalid position.
    pub fn cell_holding_cost(&self, position: Position, elapsed: f64) -> Result<Option<f64>> {
        WarehouseError::check_non_negative("elapsed", elapsed)?;
        Ok(self.cell(position).map(|cell| {
            self.holding_cost_policy
                .cell_cost(cell, self.config.cost_rate, elapsed)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> StoredEntity {
        StoredEntity::new(id, format!("Item {id}"))
    }

    fn small(capacity: usize) -> Warehouse {
        let config = WarehouseConfig {
            max_items_per_cell: capacity,
            ..WarehouseConfig::new(GridDimensions::new(2, 2, 2))
        };
        Warehouse::new(config).unwrap()
    }

    #[test]
    fn test_all_cells_created() {
        let wh = Warehouse::with_dimensions(3, 4, 5).unwrap();
        assert_eq!(wh.cell_count(), 60);
        for x in 0..3 {
            for y in 0..4 {
                for z in 0..5 {
                    let p = Position::new(x, y, z);
                    assert_eq!(wh.cell(p).unwrap().position(), p);
                }
            }
        }
        assert!(wh.cell(Position::new(3, 0, 0)).is_none());
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            Warehouse::with_dimensions(0, 2, 2),
            Err(WarehouseError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Warehouse::with_dimensions(u32::MAX, u32::MAX, u32::MAX),
            Err(WarehouseError::InvalidDimensions { .. })
        ));
        let config = WarehouseConfig {
            max_items_per_cell: 0,
            ..WarehouseConfig::new(GridDimensions::new(1, 1, 1))
        };
        assert_eq!(Warehouse::new(config).unwrap_err(), WarehouseError::ZeroCapacity);
    }

    #[test]
    fn test_valid_position() {
        let wh = Warehouse::with_dimensions(3, 4, 5).unwrap();
        assert!(wh.is_valid_position(Position::new(0, 0, 0)));
        assert!(wh.is_valid_position(Position::new(2, 3, 4)));
        assert!(!wh.is_valid_position(Position::new(3, 0, 0)));
        assert!(!wh.is_valid_position(Position::new(0, -1, 0)));
    }

    #[test]
    fn test_put_and_get() {
        let mut wh = small(10);
        let pos = Position::new(1, 1, 1);
        assert!(wh.put(item("item1"), pos));
        assert_eq!(wh.entities_at(pos).len(), 1);

        let out = wh.get(pos).unwrap();
        assert_eq!(out.id, "item1");
        assert!(wh.entities_at(pos).is_empty());
        assert!(wh.get(pos).is_none());
    }

    #[test]
    fn test_put_invalid_position() {
        let mut wh = small(10);
        let rejected = wh.try_put(item("item1"), Position::new(10, 10, 10)).unwrap_err();
        assert_eq!(rejected.reason, RejectReason::OutOfBounds);
        assert_eq!(rejected.into_entity().id, "item1");
        assert_eq!(wh.total_entity_count(), 0);
    }

    #[test]
    fn test_capacity_limit() {
        let mut wh = small(2);
        let pos = Position::ORIGIN;
        assert!(wh.put(item("item1"), pos));
        assert!(wh.put(item("item2"), pos));
        let rejected = wh.try_put(item("item3"), pos).unwrap_err();
        assert_eq!(rejected.reason, RejectReason::CellFull);
        assert_eq!(
            rejected.to_string(),
            "cannot store 'item3' at (0, 0, 0): cell is at capacity"
        );
        assert_eq!(wh.entities_at(pos).len(), 2);
    }

    #[test]
    fn test_get_invalid_position() {
        let mut wh = small(10);
        assert!(wh.get(Position::new(-1, 0, 0)).is_none());
        assert!(wh.entities_at(Position::new(-1, 0, 0)).is_empty());
    }

    #[test]
    fn test_policy_switch() {
        let mut wh = small(10);
        let pos = Position::ORIGIN;
        wh.put(item("A").with_priority(1), pos);
        wh.put(item("B").with_priority(5), pos);
        wh.put(item("C").with_priority(3), pos);

        wh.set_retrieval_policy(RetrievalPolicy::Lifo);
        assert_eq!(wh.retrieval_policy(), RetrievalPolicy::Lifo);
        assert_eq!(wh.get(pos).unwrap().id, "C");

        wh.set_retrieval_policy(RetrievalPolicy::Priority);
        assert_eq!(wh.get(pos).unwrap().id, "B");

        wh.set_retrieval_policy(RetrievalPolicy::Fifo);
        assert_eq!(wh.get(pos).unwrap().id, "A");
    }

    #[test]
    fn test_find_positions_once_per_cell() {
        let mut wh = small(10);
        let p1 = Position::new(0, 0, 0);
        let p2 = Position::new(1, 1, 1);
        wh.put(item("dup"), p1);
        wh.put(item("dup"), p1);
        wh.put(item("dup"), p2);
        wh.put(item("other"), Position::new(0, 1, 0));

        assert_eq!(wh.find_positions("dup"), vec![p1, p2]);
        assert!(wh.find_positions("missing").is_empty());
    }

    #[test]
    fn test_empty_and_available_positions() {
        let config = WarehouseConfig {
            max_items_per_cell: 2,
            ..WarehouseConfig::new(GridDimensions::new(2, 1, 1))
        };
        let mut wh = Warehouse::new(config).unwrap();
        assert_eq!(wh.available_positions().len(), 2);
        assert_eq!(wh.empty_positions().len(), 2);

        let p1 = Position::new(0, 0, 0);
        wh.put(item("item1"), p1);
        assert_eq!(wh.empty_positions(), vec![Position::new(1, 0, 0)]);
        assert_eq!(wh.available_positions().len(), 2);

        wh.put(item("item2"), p1);
        assert_eq!(wh.available_positions(), vec![Position::new(1, 0, 0)]);
        assert_eq!(wh.first_available_position(), Some(Position::new(1, 0, 0)));
    }

    #[test]
    fn test_cell_capacity_info() {
        let mut wh = small(5);
        let pos = Position::ORIGIN;
        assert_eq!(
            wh.cell_capacity_info(pos),
            Some(CellCapacity {
                current: 0,
                max: 5,
                available: 5
            })
        );
        wh.put(item("item1"), pos);
        wh.put(item("item2"), pos);
        let info = wh.cell_capacity_info(pos).unwrap();
        assert_eq!((info.current, info.max, info.available), (2, 5, 3));
        assert!(wh.cell_capacity_info(Position::new(10, 10, 10)).is_none());
    }

    #[test]
    fn test_total_holding_cost_per_time_unit() {
        let config = WarehouseConfig {
            holding_cost_policy: HoldingCostPolicy::PerTimeUnit,
            cost_rate: 0.1,
            ..WarehouseConfig::new(GridDimensions::new(2, 1, 1))
        };
        let mut wh = Warehouse::new(config).unwrap();
        wh.put(item("item1"), Position::new(0, 0, 0));
        wh.put(item("item2"), Position::new(1, 0, 0));
        wh.put(item("item3"), Position::new(1, 0, 0));

        // two occupied cells * 0.1 * 10
        let cost = wh.total_holding_cost(10.0).unwrap();
        assert!((cost - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_holding_cost_per_entity_unit() {
        let config = WarehouseConfig {
            holding_cost_policy: HoldingCostPolicy::PerEntityUnit,
            ..WarehouseConfig::new(GridDimensions::new(2, 1, 1))
        };
        let mut wh = Warehouse::new(config).unwrap();
        let costed = |id: &str| item(id).with_holding_cost(0.2).unwrap();
        wh.put(costed("item1"), Position::new(0, 0, 0));
        wh.put(costed("item2"), Position::new(0, 0, 0));
        wh.put(costed("item3"), Position::new(1, 0, 0));

        let cost = wh.total_holding_cost(5.0).unwrap();
        assert!((cost - 0.6).abs() < 1e-9);
        assert_eq!(
            wh.cell_holding_cost(Position::new(1, 0, 0), 5.0).unwrap(),
            Some(0.2)
        );
    }

    #[test]
    fn test_holding_cost_rejects_bad_parameter() {
        let wh = small(1);
        assert!(wh.total_holding_cost(-1.0).is_err());
        assert!(wh.total_holding_cost(f64::NAN).is_err());
        assert_eq!(wh.total_holding_cost(0.0), Ok(0.0));
        assert_eq!(wh.cell_holding_cost(Position::new(5, 5, 5), 1.0), Ok(None));
    }

    #[test]
    fn test_holding_cost_policy_switch() {
        let mut wh = small(3);
        wh.put(item("a"), Position::ORIGIN);
        wh.put(item("b"), Position::ORIGIN);

        let per_time = wh.total_holding_cost(2.0).unwrap();
        assert!((per_time - 0.02).abs() < 1e-12);

        wh.set_holding_cost_policy(HoldingCostPolicy::PerEntityUnit);
        let per_entity = wh.total_holding_cost(2.0).unwrap();
        assert!((per_entity - 0.02).abs() < 1e-12);
        assert_eq!(wh.holding_cost_policy(), HoldingCostPolicy::PerEntityUnit);
    }
}
