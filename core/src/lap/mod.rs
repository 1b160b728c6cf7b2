pub mod corner;
pub mod sample;
pub mod schema;
pub mod uniform;

pub use corner::{CornerMatch, CornerMetric, CornerSegment};
pub use sample::{TelemetrySample, TelemetrySequence};
pub use schema::{ChannelSchema, TelemetryRecord};
pub use uniform::UniformTelemetry;
