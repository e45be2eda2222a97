//! Pure warehouse logic for an automated storage-and-retrieval system.
//!
//! This crate contains the whole storage engine and nothing else: no
//! database, no clock, no I/O. Functions take plain data and return results,
//! so everything is unit-testable and can be embedded in any host (the
//! headless `asrs-simtest` harness, a discrete-event simulation, a service).
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`position`] | Integer grid coordinates and grid bounds |
//! | [`entity`] | Stored entities (id, name, priority, holding cost) |
//! | [`cell`] | Bounded, insertion-ordered container at one position |
//! | [`retrieval`] | FIFO / LIFO / priority retrieval policies |
//! | [`cost`] | Holding-cost policies (per time unit / per entity unit) |
//! | [`transport`] | The single stacker-crane style transport agent |
//! | [`warehouse`] | Grid orchestration: put, get, queries, holding cost |
//! | [`config`] | Warehouse construction parameters and validation |
//! | [`error`] | Hard construction/parameter errors |
//! | [`variates`] | Random variates for arrival and service times |
//! | [`source`] | Arrival source minting entities from a template |
//!
//! # Example
//!
//! ```
//! use asrs_logic::prelude::*;
//!
//! let mut warehouse = Warehouse::with_dimensions(2, 2, 2).unwrap();
//! let origin = Position::new(0, 0, 0);
//!
//! assert!(warehouse.transport().put(StoredEntity::new("E1", "Pallet"), origin));
//! assert_eq!(warehouse.total_entity_count(), 1);
//!
//! let out = warehouse.transport().get(origin).unwrap();
//! assert_eq!(out.id, "E1");
//! ```

pub mod cell;
pub mod config;
pub mod cost;
pub mod entity;
pub mod error;
pub mod position;
pub mod retrieval;
pub mod source;
pub mod transport;
pub mod variates;
pub mod warehouse;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::cell::Cell;
    pub use crate::config::WarehouseConfig;
    pub use crate::cost::HoldingCostPolicy;
    pub use crate::entity::{EntityProfile, StoredEntity};
    pub use crate::error::{Result, WarehouseError};
    pub use crate::position::{GridDimensions, Position};
    pub use crate::retrieval::RetrievalPolicy;
    pub use crate::transport::{AgentStats, Transport, TransportAgent};
    pub use crate::warehouse::{CellCapacity, PutRejected, RejectReason, Warehouse};
}
