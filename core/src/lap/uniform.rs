use crate::lap::sample::{TelemetrySample, TelemetrySequence};
use crate::prelude::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Telemetry interpolated onto an evenly spaced distance grid, stored column-wise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UniformTelemetry {
    pub step: f64,
    pub distance: Vec<f64>,
    pub speed: Vec<f64>,
    /// Interpolated elapsed seconds; absent when the source carried no time channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_s: Option<Vec<f64>>,
    #[serde(default)]
    pub channels: BTreeMap<String, Vec<f64>>,
}

impl UniformTelemetry {
    pub fn empty(step: f64) -> Self {
        Self {
            step,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.distance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    pub fn time_at(&self, idx: usize) -> Option<f64> {
        self.time_s.as_ref().and_then(|t| t.get(idx).copied())
    }

    pub fn channel(&self, name: &str) -> Option<&[f64]> {
        self.channels.get(name).map(Vec::as_slice)
    }

    /// Every column must run the full length of the distance grid.
    pub fn check_shape(&self) -> AnalysisResult<()> {
        let n = self.len();
        let columns = std::iter::once(("speed", self.speed.len()))
            .chain(self.time_s.as_ref().map(|t| ("time", t.len())))
            .chain(self.channels.iter().map(|(name, v)| (name.as_str(), v.len())));
        for (name, len) in columns {
            if len != n {
                return Err(AnalysisError::MalformedInput(format!(
                    "column '{}' has {} values for {} grid points",
                    name, len, n
                )));
            }
        }
        Ok(())
    }

    /// Converts back into a raw sequence so it can be fed through the resampler again.
    pub fn to_sequence(&self) -> AnalysisResult<TelemetrySequence> {
        self.check_shape()?;
        let names: Vec<String> = self.channels.keys().cloned().collect();
        let samples = (0..self.len())
            .map(|idx| {
                let channels = names.iter().map(|name| self.channels[name][idx]).collect();
                TelemetrySample::new(self.distance[idx], self.speed[idx], self.time_at(idx))
                    .with_channels(channels)
            })
            .collect();

        Ok(TelemetrySequence {
            channels: names,
            samples,
        })
    }
}
