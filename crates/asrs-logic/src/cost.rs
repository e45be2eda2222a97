//! Holding-cost policies.
//!
//! Two readings of "holding cost" are supported and the choice is explicit:
//!
//! - [`HoldingCostPolicy::PerTimeUnit`]: every occupied cell accrues
//!   `rate * elapsed`. How many entities the cell holds does not matter, so the
//!   warehouse total scales with the number of occupied cells.
//! - [`HoldingCostPolicy::PerEntityUnit`]: every stored entity contributes its
//!   own `holding_cost`. The elapsed-time parameter is ignored.
//!
//! Empty cells never contribute under either policy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingCostPolicy {
    #[default]
    PerTimeUnit,
    PerEntityUnit,
}

impl HoldingCostPolicy {
    pub const ALL: [HoldingCostPolicy; 2] = [
        HoldingCostPolicy::PerTimeUnit,
        HoldingCostPolicy::PerEntityUnit,
    ];

    /// Cost accrued by one cell. `rate` is the warehouse-level cost rate and
    /// `elapsed` the caller-supplied time parameter.
    pub fn cell_cost(self, cell: &Cell, rate: f64, elapsed: f64) -> f64 {
        if cell.is_empty() {
            return 0.0;
        }
        match self {
            HoldingCostPolicy::PerTimeUnit => rate * elapsed,
            HoldingCostPolicy::PerEntityUnit => cell.entity_holding_cost(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HoldingCostPolicy::PerTimeUnit => "per_time_unit",
            HoldingCostPolicy::PerEntityUnit => "per_entity_unit",
        }
    }
}

impl fmt::Display for HoldingCostPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
