use crate::diagnostics::LogManager;
use crate::lap::{TelemetrySample, TelemetrySequence, UniformTelemetry};
use crate::math::interp::interp_sorted;
use crate::prelude::{AnalysisError, AnalysisResult};
use std::collections::BTreeMap;

/// Converts a lap trace onto an evenly spaced distance grid.
pub struct Resampler {
    step: f64,
    logger: LogManager,
}

impl Resampler {
    pub fn new(step: f64) -> AnalysisResult<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "distance step must be positive, got {}",
                step
            )));
        }
        Ok(Self {
            step,
            logger: LogManager::new("resample"),
        })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Fails only when a sample's channel values do not line up with the declared channels.
    pub fn resample(&self, sequence: &TelemetrySequence) -> AnalysisResult<UniformTelemetry> {
        let samples = clean(sequence);
        if let Some(bad) = samples
            .iter()
            .find(|s| s.channels.len() != sequence.channels.len())
        {
            return Err(AnalysisError::MalformedInput(format!(
                "sample at {:?} carries {} channel values, sequence declares {}",
                bad.distance,
                bad.channels.len(),
                sequence.channels.len()
            )));
        }
        if samples.len() < 2 {
            self.logger.degraded(&format!(
                "{} usable samples out of {}; nothing to resample",
                samples.len(),
                sequence.len()
            ));
            return Ok(UniformTelemetry::empty(self.step));
        }

        let xp: Vec<f64> = samples.iter().filter_map(|s| s.distance).collect();
        let max_distance = xp[xp.len() - 1];
        let grid: Vec<f64> = (0..)
            .map(|k| k as f64 * self.step)
            .take_while(|d| *d < max_distance)
            .collect();

        let speeds: Vec<f64> = samples.iter().map(|s| s.speed).collect();
        let speed = interp_sorted(&grid, &xp, &speeds);

        let (timed_at, times): (Vec<f64>, Vec<f64>) = samples
            .iter()
            .filter_map(|s| Some((s.distance?, s.time_s?)))
            .filter(|(_, t)| t.is_finite())
            .unzip();
        let time_s = if timed_at.len() >= 2 {
            if timed_at.len() < samples.len() {
                self.logger.degraded(&format!(
                    "time channel has gaps; interpolating over {} of {} samples",
                    timed_at.len(),
                    samples.len()
                ));
            }
            Some(interp_sorted(&grid, &timed_at, &times))
        } else {
            if !timed_at.is_empty() {
                self.logger
                    .degraded("single timed sample; corner durations unavailable");
            }
            None
        };

        let channels: BTreeMap<String, Vec<f64>> = sequence
            .channels
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let values: Vec<f64> = samples.iter().map(|s| s.channels[col]).collect();
                (name.clone(), interp_sorted(&grid, &xp, &values))
            })
            .collect();

        self.logger.detail(&format!(
            "{} raw samples -> {} grid points up to {:.1}",
            sequence.len(),
            grid.len(),
            max_distance
        ));

        Ok(UniformTelemetry {
            step: self.step,
            distance: grid,
            speed,
            time_s,
            channels,
        })
    }
}

/// Valid samples in ascending distance order, keeping the first of any repeated distance.
fn clean(sequence: &TelemetrySequence) -> Vec<&TelemetrySample> {
    let mut samples: Vec<&TelemetrySample> =
        sequence.samples.iter().filter(|s| s.is_valid()).collect();
    // Stable sort so "first" still means first in the input order.
    samples.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    samples.dedup_by(|later, earlier| later.distance == earlier.distance);
    samples
}
