//! Stored entities — the opaque payloads a cell holds.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WarehouseError};

/// Holding cost an entity carries unless told otherwise.
pub const DEFAULT_HOLDING_COST: f64 = 0.01;

/// Physical and order data a draft entity may carry. The engine stores it
/// untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityProfile {
    pub width: f64,
    pub length: f64,
    pub height: f64,
    pub weight: f64,
    /// Order number the entity belongs to.
    pub order: u32,
    pub tag: String,
}

impl EntityProfile {
    pub fn volume(&self) -> f64 {
        self.width * self.length * self.height
    }
}

/// One unit held in the warehouse.
///
/// `id` is not required to be unique: the same id may sit in several cells
/// at once. The engine never mutates an entity; it only moves it in and out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntity {
    pub id: String,
    pub name: String,
    /// Higher value leaves first under the priority policy.
    pub priority: i32,
    /// Per-unit holding cost, always >= 0.
    pub holding_cost: f64,
    /// Simulation timestamp at which the entity was created.
    pub created_at: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<EntityProfile>,
}

impl StoredEntity {
    /// Entity with priority 0, the default holding cost and `created_at` 0.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            priority: 0,
            holding_cost: DEFAULT_HOLDING_COST,
            created_at: 0.0,
            profile: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_created_at(mut self, created_at: f64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_profile(mut self, profile: EntityProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Set the per-unit holding cost. Negative or non-finite costs are rejected.
    pub fn with_holding_cost(mut self, holding_cost: f64) -> Result<Self> {
        self.holding_cost = WarehouseError::check_non_negative("holding_cost", holding_cost)?;
        Ok(self)
    }
}
