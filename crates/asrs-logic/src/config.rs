//! Warehouse construction parameters.
//!
//! A `WarehouseConfig` is plain data so hosts can build it in code or load it
//! from JSON. [`WarehouseConfig::validate`] is the single place where a bad
//! configuration becomes a hard error.
//!
//! ```
//! use asrs_logic::config::WarehouseConfig;
//! use asrs_logic::position::GridDimensions;
//!
//! let config = WarehouseConfig {
//!     max_items_per_cell: 5,
//!     ..WarehouseConfig::new(GridDimensions::new(4, 3, 2))
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::cost::HoldingCostPolicy;
use crate::error::{Result, WarehouseError};
use crate::position::GridDimensions;
use crate::retrieval::RetrievalPolicy;

pub const DEFAULT_MAX_ITEMS_PER_CELL: usize = 100;
pub const DEFAULT_COST_RATE: f64 = 0.01;
pub const DEFAULT_HANDLING_TIME: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Grid bounds; every axis must be in `1..=i32::MAX` and the cell count
    /// must fit a `usize`.
    pub dimensions: GridDimensions,
    /// Cell capacity, at least 1.
    #[serde(default = "default_max_items_per_cell")]
    pub max_items_per_cell: usize,
    #[serde(default)]
    pub holding_cost_policy: HoldingCostPolicy,
    /// Warehouse-level rate used by [`HoldingCostPolicy::PerTimeUnit`].
    #[serde(default = "default_cost_rate")]
    pub cost_rate: f64,
    /// Handling time the transport agent books for each completed put.
    #[serde(default = "default_handling_time")]
    pub inbound_time: f64,
    /// Handling time the transport agent books for each completed get.
    #[serde(default = "default_handling_time")]
    pub outbound_time: f64,
    /// Policy active when the warehouse is built.
    #[serde(default)]
    pub retrieval_policy: RetrievalPolicy,
}

fn default_max_items_per_cell() -> usize {
    DEFAULT_MAX_ITEMS_PER_CELL
}

fn default_cost_rate() -> f64 {
    DEFAULT_COST_RATE
}

fn default_handling_time() -> f64 {
    DEFAULT_HANDLING_TIME
}

impl WarehouseConfig {
    /// Defaults for everything except the grid bounds.
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            max_items_per_cell: DEFAULT_MAX_ITEMS_PER_CELL,
            holding_cost_policy: HoldingCostPolicy::default(),
            cost_rate: DEFAULT_COST_RATE,
            inbound_time: DEFAULT_HANDLING_TIME,
            outbound_time: DEFAULT_HANDLING_TIME,
            retrieval_policy: RetrievalPolicy::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let dims = self.dimensions;
        if !dims.is_positive() || !dims.is_addressable() {
            return Err(WarehouseError::InvalidDimensions {
                x: dims.x,
                y: dims.y,
                z: dims.z,
            });
        }
        if self.max_items_per_cell == 0 {
            return Err(WarehouseError::ZeroCapacity);
        }
        WarehouseError::check_non_negative("cost_rate", self.cost_rate)?;
        WarehouseError::check_non_negative("inbound_time", self.inbound_time)?;
        WarehouseError::check_non_negative("outbound_time", self.outbound_time)?;
        Ok(())
    }
}
