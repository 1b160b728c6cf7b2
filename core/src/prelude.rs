use serde::{Deserialize, Serialize};

/// Thresholds steering the braking/recovery scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Accumulated speed drop required before a descent counts as braking.
    pub min_drop: f64,
    /// Speed regained after the apex that closes a corner.
    pub min_recovery: f64,
    /// Minimum corner span, in uniform samples.
    pub min_len: usize,
    /// One-step drop below which a descent is treated as sensor noise.
    pub noise_floor: f64,
    /// Largest one-step dip tolerated while the car is recovering speed.
    pub recovery_tolerance: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            min_drop: 18.0,
            min_recovery: 10.0,
            min_len: 4,
            noise_floor: 0.5,
            recovery_tolerance: 0.2,
        }
    }
}

/// Shared configuration for every analysis stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Distance grid spacing used by the resampler.
    pub step: f64,
    pub detector: DetectorParams,
    /// Largest apex-distance gap for two corners to be paired.
    pub tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            step: 2.0,
            detector: DetectorParams::default(),
            tolerance: 25.0,
        }
    }
}

impl AnalysisConfig {
    /// Rejects configurations that would make a stage misbehave partway through a run.
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "distance step must be positive, got {}",
                self.step
            )));
        }
        self.detector.validate()?;
        ensure_non_negative("tolerance", self.tolerance)
    }
}

impl DetectorParams {
    pub fn validate(&self) -> AnalysisResult<()> {
        ensure_non_negative("min_drop", self.min_drop)?;
        ensure_non_negative("min_recovery", self.min_recovery)?;
        ensure_non_negative("noise_floor", self.noise_floor)?;
        ensure_non_negative("recovery_tolerance", self.recovery_tolerance)
    }
}

fn ensure_non_negative(name: &str, value: f64) -> AnalysisResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidConfig(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )))
    }
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
