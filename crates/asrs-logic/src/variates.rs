//! Random variates for arrival and service times.
//!
//! These feed a surrounding simulation; the warehouse itself never samples
//! anything. Parameters are checked by [`Variate::validate`], which every
//! named constructor runs. Values deserialized from JSON should be validated
//! before use.

use std::fmt;

use rand::Rng;
use rand_distr::{Distribution, Exp1, StandardNormal, Triangular};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VariateError {
    #[error("{parameter} must be finite")]
    NonFinite { parameter: &'static str },
    #[error("min ({min}) cannot be greater than max ({max})")]
    InvertedRange { min: f64, max: f64 },
    #[error("range width max - min overflows, got min={min} max={max}")]
    RangeOverflow { min: f64, max: f64 },
    #[error("mean must be positive, got {0}")]
    NonPositiveMean(f64),
    #[error("standard deviation cannot be negative, got {0}")]
    NegativeStdDev(f64),
    #[error("mode must satisfy min <= mode <= max, got min={min} mode={mode} max={max}")]
    ModeOutOfRange { min: f64, mode: f64, max: f64 },
}

/// A univariate distribution over `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variate {
    /// Always the same value.
    Constant { value: f64 },
    /// Uniform on `[min, max]`.
    Uniform { min: f64, max: f64 },
    /// Exponential with the given mean (1 / lambda).
    Exponential { mean: f64 },
    Normal { mean: f64, std_dev: f64 },
    Triangular { min: f64, mode: f64, max: f64 },
}

impl Variate {
    pub fn constant(value: f64) -> Result<Self, VariateError> {
        Self::Constant { value }.validated()
    }

    pub fn uniform(min: f64, max: f64) -> Result<Self, VariateError> {
        Self::Uniform { min, max }.validated()
    }

    pub fn exponential(mean: f64) -> Result<Self, VariateError> {
        Self::Exponential { mean }.validated()
    }

    pub fn normal(mean: f64, std_dev: f64) -> Result<Self, VariateError> {
        Self::Normal { mean, std_dev }.validated()
    }

    pub fn triangular(min: f64, mode: f64, max: f64) -> Result<Self, VariateError> {
        Self::Triangular { min, mode, max }.validated()
    }

    fn validated(self) -> Result<Self, VariateError> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), VariateError> {
        match *self {
            Variate::Constant { value } => finite("value", value),
            Variate::Uniform { min, max } => {
                finite("min", min)?;
                finite("max", max)?;
                if min > max {
                    return Err(VariateError::InvertedRange { min, max });
                }
                finite_width(min, max)
            }
            Variate::Exponential { mean } => {
                finite("mean", mean)?;
                if mean <= 0.0 {
                    return Err(VariateError::NonPositiveMean(mean));
                }
                Ok(())
            }
            Variate::Normal { mean, std_dev } => {
                finite("mean", mean)?;
                finite("std_dev", std_dev)?;
                if std_dev < 0.0 {
                    return Err(VariateError::NegativeStdDev(std_dev));
                }
                Ok(())
            }
            Variate::Triangular { min, mode, max } => {
                finite("min", min)?;
                finite("mode", mode)?;
                finite("max", max)?;
                if !(min <= mode && mode <= max) {
                    return Err(VariateError::ModeOutOfRange { min, mode, max });
                }
                finite_width(min, max)
            }
        }
    }

    /// Draw one sample.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Variate::Constant { value } => value,
            Variate::Uniform { min, max } => {
                if min >= max {
                    min
                } else {
                    rng.gen_range(min..=max)
                }
            }
            Variate::Exponential { mean } => {
                let unit: f64 = Exp1.sample(rng);
                unit * mean
            }
            Variate::Normal { mean, std_dev } => {
                let z: f64 = StandardNormal.sample(rng);
                mean + std_dev * z
            }
            Variate::Triangular { min, mode, max } => {
                if min >= max {
                    return min;
                }
                Triangular::new(min, max, mode).map_or(mode, |d| d.sample(rng))
            }
        }
    }

    /// Analytic expected value.
    pub fn mean(&self) -> f64 {
        match *self {
            Variate::Constant { value } => value,
            Variate::Uniform { min, max } => (min + max) / 2.0,
            Variate::Exponential { mean } => mean,
            Variate::Normal { mean, .. } => mean,
            Variate::Triangular { min, mode, max } => (min + mode + max) / 3.0,
        }
    }
}

fn finite(parameter: &'static str, value: f64) -> Result<(), VariateError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(VariateError::NonFinite { parameter })
    }
}

/// Samplers work on `max - min`, which must itself be finite.
fn finite_width(min: f64, max: f64) -> Result<(), VariateError> {
    if (max - min).is_finite() {
        Ok(())
    } else {
        Err(VariateError::RangeOverflow { min, max })
    }
}

impl fmt::Display for Variate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variate::Constant { value } => write!(f, "Constant(value={value})"),
            Variate::Uniform { min, max } => write!(f, "Uniform(min={min}, max={max})"),
            Variate::Exponential { mean } => write!(f, "Exponential(mean={mean})"),
            Variate::Normal { mean, std_dev } => {
                write!(f, "Normal(mean={mean}, std_dev={std_dev})")
            }
            Variate::Triangular { min, mode, max } => {
                write!(f, "Triangular(min={min}, mode={mode}, max={max})")
            }
        }
    }
}
