//! Arrival source — mints stored entities at sampled intervals.
//!
//! A source is a producer for a surrounding simulation. It knows nothing about
//! the warehouse; the host decides where each minted entity goes.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::{EntityProfile, StoredEntity, DEFAULT_HOLDING_COST};
use crate::error::WarehouseError;
use crate::variates::{Variate, VariateError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("invalid inter-arrival time: {0}")]
    InterArrival(#[from] VariateError),
    #[error("invalid entity template: {0}")]
    Template(#[from] WarehouseError),
    #[error("batch size must be at least 1")]
    ZeroBatch,
}

/// How arrivals are handed downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowMode {
    /// Deliver whatever the downstream state.
    #[default]
    Push,
    /// Deliver only when the downstream reports it is ready.
    Pull,
}

/// Blueprint for the entities a source produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub name: String,
    /// Minted ids are `"{id_prefix}-{sequence}"`.
    pub id_prefix: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_holding_cost")]
    pub holding_cost: f64,
    /// Copied onto every minted entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<EntityProfile>,
}

fn default_holding_cost() -> f64 {
    DEFAULT_HOLDING_COST
}

impl EntityTemplate {
    pub fn new(name: impl Into<String>, id_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_prefix: id_prefix.into(),
            priority: 0,
            holding_cost: DEFAULT_HOLDING_COST,
            profile: None,
        }
    }

    /// `holding_cost` must already be validated.
    fn mint(&self, sequence: u64, created_at: f64) -> StoredEntity {
        StoredEntity {
            id: format!("{}-{}", self.id_prefix, sequence),
            name: self.name.clone(),
            priority: self.priority,
            holding_cost: self.holding_cost,
            created_at,
            profile: self.profile.clone(),
        }
    }
}

/// Static description of a source, suitable for JSON scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub template: EntityTemplate,
    pub inter_arrival: Variate,
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Total entities to emit; `None` means unbounded.
    #[serde(default)]
    pub max_arrivals: Option<u64>,
    #[serde(default)]
    pub mode: FlowMode,
}

fn default_batch_size() -> u32 {
    1
}

/// One arrival event.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    pub time: f64,
    pub entities: Vec<StoredEntity>,
}

#[derive(Debug, Clone)]
pub struct ArrivalSource {
    spec: SourceSpec,
    clock: f64,
    emitted: u64,
}

impl ArrivalSource {
    pub fn new(spec: SourceSpec) -> Result<Self, SourceError> {
        spec.inter_arrival.validate()?;
        WarehouseError::check_non_negative("holding_cost", spec.template.holding_cost)?;
        if spec.batch_size == 0 {
            return Err(SourceError::ZeroBatch);
        }
        Ok(Self {
            spec,
            clock: 0.0,
            emitted: 0,
        })
    }

    pub fn spec(&self) -> &SourceSpec {
        &self.spec
    }

    /// Time of the most recent arrival.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn is_exhausted(&self) -> bool {
        self.spec
            .max_arrivals
            .is_some_and(|max| self.emitted >= max)
    }

    /// Produce the next arrival.
    ///
    /// Returns `None` when the source is exhausted, or in pull mode when the
    /// downstream is not ready; neither case advances the clock.
    pub fn next_batch<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        downstream_ready: bool,
    ) -> Option<Arrival> {
        if self.is_exhausted() {
            return None;
        }
        if self.spec.mode == FlowMode::Pull && !downstream_ready {
            return None;
        }

        let gap = self.spec.inter_arrival.sample(rng).max(0.0);
        self.clock += gap;

        let mut count = u64::from(self.spec.batch_size);
        if let Some(max) = self.spec.max_arrivals {
            count = count.min(max - self.emitted);
        }

        let mut entities = Vec::with_capacity(count as usize);
        for _ in 0..count {
            self.emitted += 1;
            entities.push(self.spec.template.mint(self.emitted, self.clock));
        }
        log::trace!(
            "source '{}' emitted {} at t={:.3}",
            self.spec.template.id_prefix,
            entities.len(),
            self.clock
        );
        Some(Arrival {
            time: self.clock,
            entities,
        })
    }
}
