pub mod detector;
pub mod matcher;
pub mod metrics;
pub mod resample;

pub use detector::{CornerDetector, ScanState, Transition};
pub use matcher::{CornerAligner, GreedyAligner};
pub use metrics::CornerMetrics;
pub use resample::Resampler;
