use crate::comparison::LapComparison;
use crate::diagnostics::LogManager;
use crate::lap::{CornerMetric, CornerSegment, TelemetrySequence, UniformTelemetry};
use crate::prelude::{AnalysisConfig, AnalysisResult};
use crate::processing::{CornerAligner, CornerDetector, CornerMetrics, GreedyAligner, Resampler};
use serde::{Deserialize, Serialize};

/// Everything derived from a single lap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunAnalysis {
    pub telemetry: UniformTelemetry,
    pub segments: Vec<CornerSegment>,
    pub metrics: Vec<CornerMetric>,
}

impl RunAnalysis {
    /// `(start, end)` distance spans of each corner, for shading plots.
    pub fn shading(&self) -> Vec<(f64, f64)> {
        self.metrics
            .iter()
            .map(|m| (m.distance_start, m.distance_end))
            .collect()
    }
}

/// Runs resample → detect → metrics per lap and aligns two analysed laps.
///
/// Holds no mutable state, so one analyzer can serve both laps from separate threads.
pub struct LapAnalyzer {
    config: AnalysisConfig,
    resampler: Resampler,
    detector: CornerDetector,
    aligner: Box<dyn CornerAligner + Send + Sync>,
    logger: LogManager,
}

impl LapAnalyzer {
    pub fn new(config: AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(Self {
            resampler: Resampler::new(config.step)?,
            detector: CornerDetector::new(config.detector)?,
            aligner: Box::new(GreedyAligner::new(config.tolerance)?),
            logger: LogManager::new("analysis"),
            config,
        })
    }

    /// Swaps the corner pairing strategy.
    pub fn with_aligner(mut self, aligner: Box<dyn CornerAligner + Send + Sync>) -> Self {
        self.aligner = aligner;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, sequence: &TelemetrySequence) -> AnalysisResult<RunAnalysis> {
        let telemetry = self.resampler.resample(sequence)?;
        let segments = self.detector.detect(&telemetry.speed, &telemetry.distance)?;
        let metrics = CornerMetrics::compute(&telemetry, &segments)?;

        self.logger.record(&format!(
            "{} samples -> {} grid points, {} corners",
            sequence.len(),
            telemetry.len(),
            segments.len()
        ));

        Ok(RunAnalysis {
            telemetry,
            segments,
            metrics,
        })
    }

    pub fn compare(&self, a: &RunAnalysis, b: &RunAnalysis) -> AnalysisResult<LapComparison> {
        let matches = self
            .aligner
            .align(&a.segments, &a.telemetry, &b.segments, &b.telemetry)?;
        let comparison = LapComparison::build(&a.metrics, &b.metrics, &matches)?;

        self.logger.record(&format!(
            "{} of {} corners matched ({:?})",
            matches.len(),
            a.segments.len(),
            comparison.outcome
        ));
        Ok(comparison)
    }
}
