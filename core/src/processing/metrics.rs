use crate::lap::{CornerMetric, CornerSegment, UniformTelemetry};
use crate::prelude::{AnalysisError, AnalysisResult};

/// Projects corner segments onto the telemetry they were detected in.
pub struct CornerMetrics;

impl CornerMetrics {
    /// One metric per segment, in segment order, numbered from 1.
    pub fn compute(
        telemetry: &UniformTelemetry,
        segments: &[CornerSegment],
    ) -> AnalysisResult<Vec<CornerMetric>> {
        telemetry.check_shape()?;
        segments
            .iter()
            .enumerate()
            .map(|(idx, segment)| Self::project(telemetry, segment, idx + 1))
            .collect()
    }

    fn project(
        telemetry: &UniformTelemetry,
        segment: &CornerSegment,
        corner: usize,
    ) -> AnalysisResult<CornerMetric> {
        let CornerSegment {
            start_idx,
            apex_idx,
            end_idx,
        } = *segment;
        if !(start_idx <= apex_idx && apex_idx <= end_idx && end_idx < telemetry.len()) {
            return Err(AnalysisError::MalformedInput(format!(
                "corner {} indices ({}, {}, {}) do not fit telemetry of length {}",
                corner,
                start_idx,
                apex_idx,
                end_idx,
                telemetry.len()
            )));
        }

        let corner_time_s = match (telemetry.time_at(start_idx), telemetry.time_at(end_idx)) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        };

        Ok(CornerMetric {
            corner,
            distance_start: telemetry.distance[start_idx],
            distance_apex: telemetry.distance[apex_idx],
            distance_end: telemetry.distance[end_idx],
            entry_speed: telemetry.speed[start_idx],
            apex_speed: telemetry.speed[apex_idx],
            exit_speed: telemetry.speed[end_idx],
            corner_time_s,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry() -> UniformTelemetry {
        UniformTelemetry {
            step: 10.0,
            distance: (0..10).map(|k| k as f64 * 10.0).collect(),
            speed: vec![300.0, 300.0, 300.0, 250.0, 200.0, 180.0, 200.0, 260.0, 300.0, 300.0],
            time_s: Some((0..10).map(|k| k as f64 * 0.25).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn metrics_read_entry_apex_exit() {
        let segments = [CornerSegment::new(2, 5, 8), CornerSegment::new(8, 9, 9)];
        let metrics = CornerMetrics::compute(&telemetry(), &segments).unwrap();

        assert_eq!(metrics.len(), 2);
        let first = &metrics[0];
        assert_eq!(first.corner, 1);
        assert_eq!(first.distance_start, 20.0);
        assert_eq!(first.distance_apex, 50.0);
        assert_eq!(first.distance_end, 80.0);
        assert_eq!(first.entry_speed, 300.0);
        assert_eq!(first.apex_speed, 180.0);
        assert_eq!(first.exit_speed, 300.0);
        assert_eq!(first.corner_time_s, Some(1.5));
        assert_eq!(metrics[1].corner, 2);
    }

    #[test]
    fn missing_time_leaves_duration_empty() {
        let mut telemetry = telemetry();
        telemetry.time_s = None;
        let metrics = CornerMetrics::compute(&telemetry, &[CornerSegment::new(2, 5, 8)]).unwrap();
        assert_eq!(metrics[0].corner_time_s, None);
    }

    #[test]
    fn out_of_range_segment_is_rejected() {
        let err = CornerMetrics::compute(&telemetry(), &[CornerSegment::new(2, 5, 10)]);
        assert!(matches!(err, Err(AnalysisError::MalformedInput(_))));
    }

    #[test]
    fn short_speed_column_is_rejected() {
        let telemetry = UniformTelemetry {
            step: 10.0,
            distance: (0..5).map(|k| k as f64 * 10.0).collect(),
            speed: vec![300.0, 250.0],
            ..Default::default()
        };
        let err = CornerMetrics::compute(&telemetry, &[CornerSegment::new(0, 1, 4)]);
        assert!(matches!(err, Err(AnalysisError::MalformedInput(_))));
    }

    #[test]
    fn short_time_column_is_rejected() {
        let mut telemetry = telemetry();
        telemetry.time_s = Some(vec![0.0, 0.25]);
        let err = CornerMetrics::compute(&telemetry, &[CornerSegment::new(2, 5, 8)]);
        assert!(matches!(err, Err(AnalysisError::MalformedInput(_))));
    }

    #[test]
    fn no_segments_no_metrics() {
        assert!(CornerMetrics::compute(&UniformTelemetry::empty(2.0), &[])
            .unwrap()
            .is_empty());
    }
}
