//! Corner analysis core for fastest-lap telemetry comparison.
//!
//! A lap flows through four stages: resampling onto a uniform distance grid, corner
//! detection from the speed trace, per-corner metrics, and corner alignment between two
//! laps. Every stage is a pure function of its inputs.

pub mod analysis;
pub mod comparison;
pub mod diagnostics;
pub mod lap;
pub mod math;
pub mod prelude;
pub mod processing;

pub use analysis::{LapAnalyzer, RunAnalysis};
pub use comparison::{ComparisonOutcome, CornerDelta, LapComparison};
pub use prelude::{AnalysisConfig, AnalysisError, AnalysisResult, DetectorParams};
