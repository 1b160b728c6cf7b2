use crate::lap::{CornerMatch, CornerMetric};
use crate::math::stats::StatsHelper;
use crate::prelude::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};

/// Why a comparison produced the rows it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonOutcome {
    /// At least one lap has no detected corners.
    NoCorners,
    /// Both laps have corners but none lie within the match tolerance.
    NoMatches,
    Matched,
}

/// Side-by-side timing of one matched corner. Positive `delta_s` means lap A was slower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerDelta {
    /// Corner number in lap A.
    pub corner: usize,
    /// Corner number in lap B.
    pub corner_b: usize,
    pub time_a: Option<f64>,
    pub time_b: Option<f64>,
    pub delta_s: Option<f64>,
    pub apex_speed_a: f64,
    pub apex_speed_b: f64,
    pub apex_gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LapComparison {
    pub outcome: ComparisonOutcome,
    pub matches: Vec<CornerMatch>,
    /// Sorted by lap A corner number.
    pub rows: Vec<CornerDelta>,
    pub total_delta_s: Option<f64>,
    pub mean_delta_s: Option<f64>,
}

impl LapComparison {
    pub fn build(
        metrics_a: &[CornerMetric],
        metrics_b: &[CornerMetric],
        matches: &[CornerMatch],
    ) -> AnalysisResult<Self> {
        let mut rows = matches
            .iter()
            .map(|m| {
                let (a, b) = match (metrics_a.get(m.a), metrics_b.get(m.b)) {
                    (Some(a), Some(b)) => (a, b),
                    _ => {
                        return Err(AnalysisError::MalformedInput(format!(
                            "match ({}, {}) references a missing corner",
                            m.a, m.b
                        )))
                    }
                };
                let delta_s = match (a.corner_time_s, b.corner_time_s) {
                    (Some(ta), Some(tb)) => Some(ta - tb),
                    _ => None,
                };
                Ok(CornerDelta {
                    corner: a.corner,
                    corner_b: b.corner,
                    time_a: a.corner_time_s,
                    time_b: b.corner_time_s,
                    delta_s,
                    apex_speed_a: a.apex_speed,
                    apex_speed_b: b.apex_speed,
                    apex_gap: (a.distance_apex - b.distance_apex).abs(),
                })
            })
            .collect::<AnalysisResult<Vec<_>>>()?;
        rows.sort_by_key(|row| row.corner);

        let outcome = if metrics_a.is_empty() || metrics_b.is_empty() {
            ComparisonOutcome::NoCorners
        } else if rows.is_empty() {
            ComparisonOutcome::NoMatches
        } else {
            ComparisonOutcome::Matched
        };

        let deltas: Vec<f64> = rows.iter().filter_map(|r| r.delta_s).collect();
        let total_delta_s = (!deltas.is_empty()).then(|| StatsHelper::sum(&deltas));

        Ok(Self {
            outcome,
            matches: matches.to_vec(),
            rows,
            total_delta_s,
            mean_delta_s: StatsHelper::mean(&deltas),
        })
    }

    /// `(corner, delta_s)` pairs for matched corners that carry timing.
    pub fn delta_series(&self) -> Vec<(usize, f64)> {
        self.rows
            .iter()
            .filter_map(|r| r.delta_s.map(|d| (r.corner, d)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(corner: usize, apex: f64, time: Option<f64>) -> CornerMetric {
        CornerMetric {
            corner,
            distance_start: apex - 40.0,
            distance_apex: apex,
            distance_end: apex + 60.0,
            entry_speed: 290.0,
            apex_speed: 120.0 + corner as f64,
            exit_speed: 250.0,
            corner_time_s: time,
        }
    }

    #[test]
    fn rows_follow_lap_a_order_with_signed_delta() {
        let a = [metric(1, 300.0, Some(3.2)), metric(2, 900.0, Some(2.0))];
        let b = [metric(1, 305.0, Some(3.0)), metric(2, 890.0, Some(2.5))];
        let matches = [CornerMatch { a: 1, b: 1 }, CornerMatch { a: 0, b: 0 }];

        let cmp = LapComparison::build(&a, &b, &matches).unwrap();
        assert_eq!(cmp.outcome, ComparisonOutcome::Matched);
        assert_eq!(cmp.rows[0].corner, 1);
        assert!((cmp.rows[0].delta_s.unwrap() - 0.2).abs() < 1e-9);
        assert!((cmp.rows[1].delta_s.unwrap() + 0.5).abs() < 1e-9);
        assert!((cmp.total_delta_s.unwrap() + 0.3).abs() < 1e-9);
        assert_eq!(cmp.rows[1].apex_gap, 10.0);
        assert_eq!(cmp.delta_series().len(), 2);
    }

    #[test]
    fn outcome_separates_no_corners_from_no_matches() {
        let a = [metric(1, 300.0, Some(3.2))];
        let none = LapComparison::build(&a, &[], &[]).unwrap();
        assert_eq!(none.outcome, ComparisonOutcome::NoCorners);

        let b = [metric(1, 1300.0, Some(3.0))];
        let unmatched = LapComparison::build(&a, &b, &[]).unwrap();
        assert_eq!(unmatched.outcome, ComparisonOutcome::NoMatches);
        assert_eq!(unmatched.total_delta_s, None);
    }

    #[test]
    fn missing_timing_leaves_delta_empty() {
        let a = [metric(1, 300.0, None)];
        let b = [metric(1, 300.0, Some(3.0))];
        let cmp = LapComparison::build(&a, &b, &[CornerMatch { a: 0, b: 0 }]).unwrap();
        assert_eq!(cmp.rows[0].delta_s, None);
        assert!(cmp.delta_series().is_empty());
        assert_eq!(cmp.mean_delta_s, None);
    }

    #[test]
    fn dangling_match_is_rejected() {
        let a = [metric(1, 300.0, None)];
        assert!(LapComparison::build(&a, &a, &[CornerMatch { a: 0, b: 3 }]).is_err());
    }
}
