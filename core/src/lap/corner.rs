use serde::{Deserialize, Serialize};

/// Index range of one braking/apex/recovery event within a uniform trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerSegment {
    pub start_idx: usize,
    pub apex_idx: usize,
    pub end_idx: usize,
}

impl CornerSegment {
    pub fn new(start_idx: usize, apex_idx: usize, end_idx: usize) -> Self {
        Self {
            start_idx,
            apex_idx,
            end_idx,
        }
    }

    /// Span in samples, `end_idx - start_idx`.
    pub fn span(&self) -> usize {
        self.end_idx.saturating_sub(self.start_idx)
    }
}

/// Speed and timing summary of a single corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerMetric {
    /// 1-based position of the corner within its lap.
    pub corner: usize,
    pub distance_start: f64,
    pub distance_apex: f64,
    pub distance_end: f64,
    pub entry_speed: f64,
    pub apex_speed: f64,
    pub exit_speed: f64,
    /// Seconds between corner start and end; `None` without a time channel.
    pub corner_time_s: Option<f64>,
}

/// Pairing of corner positions (0-based) in two independently analysed laps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerMatch {
    pub a: usize,
    pub b: usize,
}
