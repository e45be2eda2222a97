//! Retrieval policies — which stored entity leaves a cell next.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::entity::StoredEntity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalPolicy {
    /// Earliest inserted first.
    #[default]
    Fifo,
    /// Most recently inserted first.
    Lifo,
    /// Highest priority first; ties broken by insertion order.
    Priority,
}

impl RetrievalPolicy {
    pub const ALL: [RetrievalPolicy; 3] = [
        RetrievalPolicy::Fifo,
        RetrievalPolicy::Lifo,
        RetrievalPolicy::Priority,
    ];

    /// Remove and return exactly one entity from `cell`, or `None` if it is empty.
    pub fn retrieve(self, cell: &mut Cell) -> Option<StoredEntity> {
        match self {
            RetrievalPolicy::Fifo => cell.remove_fifo(),
            RetrievalPolicy::Lifo => cell.remove_lifo(),
            RetrievalPolicy::Priority => cell.remove_highest_priority(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RetrievalPolicy::Fifo => "FIFO",
            RetrievalPolicy::Lifo => "LIFO",
            RetrievalPolicy::Priority => "PRIORITY",
        }
    }
}

impl fmt::Display for RetrievalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
