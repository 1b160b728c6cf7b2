use crate::lap::sample::{TelemetrySample, TelemetrySequence};
use crate::prelude::{AnalysisError, AnalysisResult};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type TelemetryRecord = Map<String, Value>;

/// Declares which record keys feed the distance axis, speed, time and the extra
/// interpolable channels. Every other key is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSchema {
    pub distance: String,
    pub speed: String,
    /// Elapsed time since lap start, in seconds.
    pub time: Option<String>,
    pub numeric: Vec<String>,
}

impl Default for ChannelSchema {
    fn default() -> Self {
        Self {
            distance: "Distance".into(),
            speed: "Speed".into(),
            time: Some("Time".into()),
            numeric: vec![
                "RPM".into(),
                "nGear".into(),
                "Throttle".into(),
                "DRS".into(),
            ],
        }
    }
}

impl ChannelSchema {
    /// Resolves loosely typed records into a [`TelemetrySequence`].
    ///
    /// A missing distance or speed channel yields an empty sequence. A value of the
    /// wrong type in any declared channel is rejected.
    pub fn resolve(&self, records: &[TelemetryRecord]) -> AnalysisResult<TelemetrySequence> {
        for key in [&self.distance, &self.speed] {
            if !records.iter().any(|r| r.get(key).is_some_and(|v| !v.is_null())) {
                warn!("telemetry has no '{}' channel; treating lap as empty", key);
                return Ok(TelemetrySequence::default());
            }
        }

        let channels: Vec<String> = self
            .numeric
            .iter()
            .filter(|name| *name != &self.distance && *name != &self.speed)
            .filter(|name| {
                let present = records.iter().any(|r| r.contains_key(name.as_str()));
                if !present {
                    debug!("declared channel '{}' absent from telemetry", name);
                }
                present
            })
            .cloned()
            .collect();

        let mut sequence = TelemetrySequence::new(channels.clone());
        for (idx, record) in records.iter().enumerate() {
            let distance = number(record, &self.distance, idx)?;
            let speed = number(record, &self.speed, idx)?.unwrap_or(f64::NAN);
            let time_s = match &self.time {
                Some(key) => number(record, key, idx)?,
                None => None,
            };
            let values = channels
                .iter()
                .map(|name| -> AnalysisResult<f64> {
                    Ok(number(record, name, idx)?.unwrap_or(f64::NAN))
                })
                .collect::<AnalysisResult<Vec<f64>>>()?;

            sequence.push(TelemetrySample {
                distance,
                speed,
                time_s,
                channels: values,
            })?;
        }

        Ok(sequence)
    }
}

fn number(record: &TelemetryRecord, key: &str, idx: usize) -> AnalysisResult<Option<f64>> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(AnalysisError::MalformedInput(format!(
            "record {} channel '{}' is not numeric: {}",
            idx, key, other
        ))),
    }
}
