use crate::workflow::runner::WorkflowResult;
use cornercore::lap::CornerMetric;
use cornercore::{ComparisonOutcome, LapComparison, RunAnalysis};
use serde::{Deserialize, Serialize};

/// Speed trace and corner overlays of one lap.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LapPayload {
    pub label: String,
    pub distance: Vec<f64>,
    pub speed: Vec<f64>,
    /// `(start, end)` distance of every corner, for shading.
    pub shading: Vec<(f64, f64)>,
    pub corners: Vec<CornerMetric>,
}

impl LapPayload {
    fn from_run(label: &str, run: &RunAnalysis) -> Self {
        Self {
            label: label.to_string(),
            distance: run.telemetry.distance.clone(),
            speed: run.telemetry.speed.clone(),
            shading: run.shading(),
            corners: run.metrics.clone(),
        }
    }
}

/// Payload served to the UI and written as the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonModel {
    pub lap_a: LapPayload,
    pub lap_b: LapPayload,
    pub comparison: Option<LapComparison>,
    /// `(corner, delta_s)` bars; positive means lap A was slower.
    pub deltas: Vec<(usize, f64)>,
    pub notes: Vec<String>,
}

impl ComparisonModel {
    pub fn new(label_a: &str, label_b: &str, result: &WorkflowResult) -> Self {
        let comparison = &result.comparison;
        let mut notes = Vec::new();
        match comparison.outcome {
            ComparisonOutcome::NoCorners => notes.push(format!(
                "No corners detected ({}: {}, {}: {}).",
                label_a,
                result.run_a.segments.len(),
                label_b,
                result.run_b.segments.len()
            )),
            ComparisonOutcome::NoMatches => notes.push(
                "No matched corners within tolerance. Try increasing --tol-m.".to_string(),
            ),
            ComparisonOutcome::Matched => {}
        }
        if result.run_a.telemetry.time_s.is_none() || result.run_b.telemetry.time_s.is_none() {
            notes.push("Time channel missing; corner times unavailable.".to_string());
        }

        Self {
            lap_a: LapPayload::from_run(label_a, &result.run_a),
            lap_b: LapPayload::from_run(label_b, &result.run_b),
            comparison: Some(comparison.clone()),
            deltas: comparison.delta_series(),
            notes,
        }
    }

    pub fn matched(&self) -> usize {
        self.comparison.as_ref().map_or(0, |c| c.rows.len())
    }
}
