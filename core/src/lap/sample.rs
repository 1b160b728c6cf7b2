use crate::prelude::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};

/// One raw telemetry reading as delivered by the acquisition side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Distance from the start of the lap; `None` when the source had no reading.
    pub distance: Option<f64>,
    pub speed: f64,
    /// Elapsed seconds since the start of the lap.
    pub time_s: Option<f64>,
    /// Extra numeric channels, positionally matching [`TelemetrySequence::channels`].
    #[serde(default)]
    pub channels: Vec<f64>,
}

impl TelemetrySample {
    pub fn new(distance: f64, speed: f64, time_s: Option<f64>) -> Self {
        Self {
            distance: Some(distance),
            speed,
            time_s,
            channels: Vec::new(),
        }
    }

    pub fn with_channels(mut self, channels: Vec<f64>) -> Self {
        self.channels = channels;
        self
    }

    /// Usable for interpolation: a finite distance and a finite speed.
    pub fn is_valid(&self) -> bool {
        matches!(self.distance, Some(d) if d.is_finite()) && self.speed.is_finite()
    }
}

/// An ordered lap trace plus the names of its extra numeric channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySequence {
    pub channels: Vec<String>,
    pub samples: Vec<TelemetrySample>,
}

impl TelemetrySequence {
    pub fn new(channels: Vec<String>) -> Self {
        Self {
            channels,
            samples: Vec::new(),
        }
    }

    /// Builds a channel-less sequence from parallel distance/speed/time slices.
    pub fn from_columns(
        distances: &[f64],
        speeds: &[f64],
        times: Option<&[f64]>,
    ) -> AnalysisResult<Self> {
        if distances.len() != speeds.len() || times.is_some_and(|t| t.len() != distances.len()) {
            return Err(AnalysisError::MalformedInput(format!(
                "column lengths differ: {} distances, {} speeds",
                distances.len(),
                speeds.len()
            )));
        }

        let samples = distances
            .iter()
            .zip(speeds)
            .enumerate()
            .map(|(idx, (&distance, &speed))| {
                TelemetrySample::new(distance, speed, times.map(|t| t[idx]))
            })
            .collect();

        Ok(Self {
            channels: Vec::new(),
            samples,
        })
    }

    /// Appends a sample, checking it carries one value per declared channel.
    pub fn push(&mut self, sample: TelemetrySample) -> AnalysisResult<()> {
        if sample.channels.len() != self.channels.len() {
            return Err(AnalysisError::MalformedInput(format!(
                "sample carries {} channel values, sequence declares {}",
                sample.channels.len(),
                self.channels.len()
            )));
        }
        self.samples.push(sample);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True when every sample carries a time reading.
    pub fn has_time(&self) -> bool {
        !self.samples.is_empty() && self.samples.iter().all(|s| s.time_s.is_some())
    }
}
