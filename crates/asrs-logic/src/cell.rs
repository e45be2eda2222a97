//! Storage cells — an insertion-ordered sequence of entities at one position.
//!
//! A cell does not know its capacity. The warehouse checks capacity before
//! calling [`Cell::add`]; the removal methods only ever take one entity out
//! and never reorder the rest.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::entity::StoredEntity;
use crate::position::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    entities: VecDeque<StoredEntity>,
}

impl Cell {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            entities: VecDeque::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Append unconditionally.
    pub fn add(&mut self, entity: StoredEntity) {
        self.entities.push_back(entity);
    }

    /// Remove the earliest-inserted entity.
    pub fn remove_fifo(&mut self) -> Option<StoredEntity> {
        self.entities.pop_front()
    }

    /// Remove the most recently inserted entity.
    pub fn remove_lifo(&mut self) -> Option<StoredEntity> {
        self.entities.pop_back()
    }

    /// Remove the entity with the highest priority.
    ///
    /// Ties go to the earliest-inserted of the tied entities.
    pub fn remove_highest_priority(&mut self) -> Option<StoredEntity> {
        let mut best: Option<(usize, i32)> = None;
        for (idx, entity) in self.entities.iter().enumerate() {
            match best {
                Some((_, priority)) if entity.priority <= priority => {}
                _ => best = Some((idx, entity.priority)),
            }
        }
        let (idx, _) = best?;
        self.entities.remove(idx)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Owned copy of the contents in insertion order.
    pub fn snapshot(&self) -> Vec<StoredEntity> {
        self.entities.iter().cloned().collect()
    }

    /// Borrowing view of the contents in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StoredEntity> {
        self.entities.iter()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.entities.iter().any(|e| e.id == id)
    }

    /// Sum of the stored entities' own holding costs.
    pub fn entity_holding_cost(&self) -> f64 {
        self.entities.iter().map(|e| e.holding_cost).sum()
    }
}
