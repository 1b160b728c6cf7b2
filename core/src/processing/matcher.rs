use crate::diagnostics::LogManager;
use crate::lap::{CornerMatch, CornerSegment, UniformTelemetry};
use crate::prelude::{AnalysisError, AnalysisResult};

/// Pairs corners of two independently analysed laps.
pub trait CornerAligner {
    fn align(
        &self,
        segments_a: &[CornerSegment],
        telemetry_a: &UniformTelemetry,
        segments_b: &[CornerSegment],
        telemetry_b: &UniformTelemetry,
    ) -> AnalysisResult<Vec<CornerMatch>>;
}

/// First-come-first-served nearest-apex assignment.
///
/// Corners of lap A are visited in order; each claims the closest unclaimed corner of
/// lap B whose apex lies within `tolerance`. Earlier A corners win contested B corners,
/// and the total displacement is not minimised.
pub struct GreedyAligner {
    tolerance: f64,
    logger: LogManager,
}

impl GreedyAligner {
    pub fn new(tolerance: f64) -> AnalysisResult<Self> {
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "match tolerance must be non-negative, got {}",
                tolerance
            )));
        }
        Ok(Self {
            tolerance,
            logger: LogManager::new("matcher"),
        })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

fn apex_distances(
    segments: &[CornerSegment],
    telemetry: &UniformTelemetry,
) -> AnalysisResult<Vec<f64>> {
    segments
        .iter()
        .map(|s| {
            telemetry.distance.get(s.apex_idx).copied().ok_or_else(|| {
                AnalysisError::MalformedInput(format!(
                    "apex index {} outside telemetry of length {}",
                    s.apex_idx,
                    telemetry.len()
                ))
            })
        })
        .collect()
}

impl CornerAligner for GreedyAligner {
    fn align(
        &self,
        segments_a: &[CornerSegment],
        telemetry_a: &UniformTelemetry,
        segments_b: &[CornerSegment],
        telemetry_b: &UniformTelemetry,
    ) -> AnalysisResult<Vec<CornerMatch>> {
        let apex_a = apex_distances(segments_a, telemetry_a)?;
        let apex_b = apex_distances(segments_b, telemetry_b)?;

        let mut used = vec![false; apex_b.len()];
        let mut matches = Vec::new();
        for (a, &da) in apex_a.iter().enumerate() {
            let mut best: Option<(usize, f64)> = None;
            for (b, &db) in apex_b.iter().enumerate() {
                if used[b] {
                    continue;
                }
                let gap = (da - db).abs();
                if gap <= self.tolerance && best.map_or(true, |(_, g)| gap < g) {
                    best = Some((b, gap));
                }
            }

            match best {
                Some((b, gap)) => {
                    used[b] = true;
                    matches.push(CornerMatch { a, b });
                    self.logger
                        .detail(&format!("corner A{} -> B{} (gap {:.2})", a + 1, b + 1, gap));
                }
                None => self
                    .logger
                    .detail(&format!("corner A{} has no partner within tolerance", a + 1)),
            }
        }

        Ok(matches)
    }
}
