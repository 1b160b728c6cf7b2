use crate::workflow::config::WorkflowConfig;
use anyhow::{anyhow, Context};
use cornercore::diagnostics::{MetricsRecorder, MetricsSnapshot};
use cornercore::lap::{TelemetryRecord, TelemetrySequence};
use cornercore::{LapAnalyzer, LapComparison, RunAnalysis};
use log::info;
use std::sync::Arc;
use std::thread;

pub struct WorkflowResult {
    pub run_a: RunAnalysis,
    pub run_b: RunAnalysis,
    pub comparison: LapComparison,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    analyzer: Arc<LapAnalyzer>,
    recorder: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> anyhow::Result<Self> {
        let analyzer =
            LapAnalyzer::new(config.analysis).context("validating analysis configuration")?;
        Ok(Self {
            config,
            analyzer: Arc::new(analyzer),
            recorder: Arc::new(MetricsRecorder::new()),
        })
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.recorder.snapshot()
    }

    /// Resolves raw records through the configured schema, then runs [`Runner::execute`].
    pub fn execute_records(
        &self,
        records_a: &[TelemetryRecord],
        records_b: &[TelemetryRecord],
    ) -> anyhow::Result<WorkflowResult> {
        let lap_a = self
            .config
            .schema
            .resolve(records_a)
            .context("resolving lap A channels")?;
        let lap_b = self
            .config
            .schema
            .resolve(records_b)
            .context("resolving lap B channels")?;
        self.execute(&lap_a, &lap_b)
    }

    /// Analyses both laps on separate threads and aligns their corners.
    pub fn execute(
        &self,
        lap_a: &TelemetrySequence,
        lap_b: &TelemetrySequence,
    ) -> anyhow::Result<WorkflowResult> {
        let (run_a, run_b) = thread::scope(|scope| {
            let handle_a = scope.spawn(|| self.analyze(lap_a, "A"));
            let handle_b = scope.spawn(|| self.analyze(lap_b, "B"));
            let run_a = handle_a
                .join()
                .map_err(|_| anyhow!("lap A analysis thread panicked"))??;
            let run_b = handle_b
                .join()
                .map_err(|_| anyhow!("lap B analysis thread panicked"))??;
            Ok::<_, anyhow::Error>((run_a, run_b))
        })?;

        let comparison = self
            .analyzer
            .compare(&run_a, &run_b)
            .context("aligning corners")?;

        Ok(WorkflowResult {
            run_a,
            run_b,
            comparison,
        })
    }

    fn analyze(&self, lap: &TelemetrySequence, label: &str) -> anyhow::Result<RunAnalysis> {
        match self.analyzer.analyze(lap) {
            Ok(run) => {
                self.recorder
                    .record_lap(run.segments.len(), run.telemetry.len());
                info!("lap {}: {} corners", label, run.segments.len());
                Ok(run)
            }
            Err(err) => {
                self.recorder.record_error();
                Err(err).with_context(|| format!("analysing lap {}", label))
            }
        }
    }
}
