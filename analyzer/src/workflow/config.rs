use anyhow::Context;
use cornercore::lap::ChannelSchema;
use cornercore::prelude::{AnalysisConfig, DetectorParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub analysis: AnalysisConfig,
    pub schema: ChannelSchema,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        dist_step: f64,
        tol_m: f64,
        min_drop: f64,
        min_recovery: f64,
        min_len: usize,
    ) -> Self {
        Self {
            analysis: AnalysisConfig {
                step: dist_step,
                tolerance: tol_m,
                detector: DetectorParams {
                    min_drop,
                    min_recovery,
                    min_len,
                    ..Default::default()
                },
            },
            schema: ChannelSchema::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_analysis_config() {
        let cfg = WorkflowConfig::from_args(1.0, 30.0, 20.0, 12.0, 5);
        assert_eq!(cfg.analysis.step, 1.0);
        assert_eq!(cfg.analysis.detector.min_len, 5);
        assert_eq!(cfg.analysis.detector.noise_floor, 0.5);
        assert!(cfg.analysis.validate().is_ok());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"analysis:\n  step: 4.0\n  detector:\n    min_drop: 25.0\nschema:\n  numeric: [RPM]\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.analysis.step, 4.0);
        assert_eq!(cfg.analysis.detector.min_drop, 25.0);
        assert_eq!(cfg.analysis.tolerance, 25.0);
        assert_eq!(cfg.schema.numeric, vec!["RPM".to_string()]);
        assert_eq!(cfg.schema.distance, "Distance");
    }
}
