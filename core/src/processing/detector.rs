use crate::diagnostics::LogManager;
use crate::lap::CornerSegment;
use crate::prelude::{AnalysisError, AnalysisResult, DetectorParams};

/// Scanner state. The cursor lives outside the state so each transition reads
/// exactly one sample pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanState {
    /// Waiting for a one-step drop above the noise floor.
    Idle,
    /// Walking a strictly decreasing run that began at `onset`.
    Braking { onset: usize, drop: f64 },
    /// Accumulating speed regained after the apex.
    Recovery {
        onset: usize,
        apex: usize,
        recovered: f64,
    },
}

/// Outcome of a single scanner transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Move to `state` with the cursor at `cursor`.
    Continue { state: ScanState, cursor: usize },
    /// A corner closed; scanning resumes in `Idle` at `cursor`.
    Closed {
        segment: Option<CornerSegment>,
        cursor: usize,
    },
    /// No further braking can start.
    Finished,
}

/// Segments a uniform speed trace into braking/apex/recovery events.
pub struct CornerDetector {
    params: DetectorParams,
    logger: LogManager,
}

impl CornerDetector {
    pub fn new(params: DetectorParams) -> AnalysisResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            logger: LogManager::new("corners"),
        })
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Returns corners ordered by `start_idx`, pairwise disjoint.
    pub fn detect(
        &self,
        speeds: &[f64],
        distances: &[f64],
    ) -> AnalysisResult<Vec<CornerSegment>> {
        if speeds.len() != distances.len() {
            return Err(AnalysisError::MalformedInput(format!(
                "{} speeds against {} distances",
                speeds.len(),
                distances.len()
            )));
        }

        let mut segments: Vec<CornerSegment> = Vec::new();
        if speeds.len() < 3 {
            return Ok(segments);
        }

        let mut state = ScanState::Idle;
        let mut cursor = 1;
        loop {
            // Earliest index the next corner may start at.
            let floor = segments.last().map_or(0, |s| s.end_idx + 1);
            match self.step(speeds, state, cursor, floor) {
                Transition::Continue {
                    state: next,
                    cursor: at,
                } => {
                    state = next;
                    cursor = at;
                }
                Transition::Closed { segment, cursor: at } => {
                    if let Some(segment) = segment {
                        self.logger.detail(&format!(
                            "corner {} apex {:.1} at {:.1}",
                            segments.len() + 1,
                            speeds[segment.apex_idx],
                            distances[segment.apex_idx]
                        ));
                        segments.push(segment);
                    }
                    state = ScanState::Idle;
                    cursor = at;
                }
                Transition::Finished => break,
            }
        }

        Ok(segments)
    }

    /// Performs one transition of the scanner. `floor` is the first index a new corner
    /// may claim, keeping consecutive corners disjoint.
    pub fn step(
        &self,
        speeds: &[f64],
        state: ScanState,
        cursor: usize,
        floor: usize,
    ) -> Transition {
        let n = speeds.len();
        let p = &self.params;

        match state {
            ScanState::Idle => {
                if n < 3 || cursor >= n - 2 {
                    return Transition::Finished;
                }
                if speeds[cursor - 1] - speeds[cursor] < p.noise_floor {
                    Transition::Continue {
                        state: ScanState::Idle,
                        cursor: cursor + 1,
                    }
                } else {
                    Transition::Continue {
                        state: ScanState::Braking {
                            onset: cursor,
                            drop: 0.0,
                        },
                        cursor,
                    }
                }
            }
            ScanState::Braking { onset, drop } => {
                if cursor + 1 < n && speeds[cursor] - speeds[cursor + 1] > 0.0 {
                    Transition::Continue {
                        state: ScanState::Braking {
                            onset,
                            drop: drop + speeds[cursor] - speeds[cursor + 1],
                        },
                        cursor: cursor + 1,
                    }
                } else if drop >= p.min_drop {
                    Transition::Continue {
                        state: ScanState::Recovery {
                            onset,
                            apex: cursor,
                            recovered: 0.0,
                        },
                        cursor,
                    }
                } else {
                    Transition::Closed {
                        segment: None,
                        cursor: cursor + 1,
                    }
                }
            }
            ScanState::Recovery {
                onset,
                apex,
                recovered,
            } => {
                let rising = cursor + 1 < n
                    && recovered < p.min_recovery
                    && speeds[cursor + 1] - speeds[cursor] >= -p.recovery_tolerance;
                if rising {
                    return Transition::Continue {
                        state: ScanState::Recovery {
                            onset,
                            apex,
                            recovered: recovered + (speeds[cursor + 1] - speeds[cursor]).max(0.0),
                        },
                        cursor: cursor + 1,
                    };
                }

                let start_idx = onset.saturating_sub(1).max(floor);
                let end_idx = (cursor + 1).min(n - 1);
                let segment = CornerSegment::new(start_idx, apex, end_idx);
                Transition::Closed {
                    segment: (segment.span() >= p.min_len).then_some(segment),
                    cursor: end_idx + 1,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector(min_drop: f64, min_recovery: f64, min_len: usize) -> CornerDetector {
        CornerDetector::new(DetectorParams {
            min_drop,
            min_recovery,
            min_len,
            ..Default::default()
        })
        .unwrap()
    }

    fn grid(n: usize, step: f64) -> Vec<f64> {
        (0..n).map(|k| k as f64 * step).collect()
    }

    #[test]
    fn single_braking_event_yields_one_corner_at_minimum() {
        let speeds = [300.0, 300.0, 300.0, 250.0, 200.0, 180.0, 200.0, 260.0, 300.0, 300.0];
        let corners = detector(60.0, 40.0, 2)
            .detect(&speeds, &grid(speeds.len(), 10.0))
            .unwrap();

        assert_eq!(corners, vec![CornerSegment::new(2, 5, 8)]);
        assert_eq!(speeds[corners[0].apex_idx], 180.0);
    }

    #[test]
    fn flat_trace_has_no_corners() {
        let speeds = vec![250.0; 50];
        let corners = CornerDetector::new(DetectorParams::default())
            .unwrap()
            .detect(&speeds, &grid(50, 2.0))
            .unwrap();
        assert!(corners.is_empty());
    }

    #[test]
    fn short_traces_and_mismatched_lengths() {
        let det = detector(1.0, 1.0, 0);
        assert!(det.detect(&[300.0, 100.0], &[0.0, 2.0]).unwrap().is_empty());
        assert!(det.detect(&[300.0, 100.0, 50.0], &[0.0, 2.0]).is_err());
    }

    #[test]
    fn shallow_descent_is_discarded_as_noise() {
        let speeds = [300.0, 300.0, 295.0, 290.0, 292.0, 300.0, 300.0];
        let corners = detector(18.0, 10.0, 2)
            .detect(&speeds, &grid(speeds.len(), 2.0))
            .unwrap();
        assert!(corners.is_empty());
    }

    #[test]
    fn trailing_descent_short_of_min_drop_is_not_emitted() {
        let speeds = [200.0, 200.0, 200.0, 195.0, 190.0, 185.0];
        let corners = detector(30.0, 10.0, 1)
            .detect(&speeds, &grid(speeds.len(), 2.0))
            .unwrap();
        assert!(corners.is_empty());
    }

    #[test]
    fn short_segments_are_dropped() {
        let speeds = [300.0, 300.0, 280.0, 250.0, 260.0, 300.0, 300.0];
        assert!(detector(20.0, 5.0, 10)
            .detect(&speeds, &grid(7, 1.0))
            .unwrap()
            .is_empty());
        assert_eq!(
            detector(20.0, 5.0, 4).detect(&speeds, &grid(7, 1.0)).unwrap(),
            vec![CornerSegment::new(1, 3, 5)]
        );
    }

    #[test]
    fn back_to_back_corners_are_disjoint_and_ordered() {
        // Recovery stops on a dip that immediately starts the next braking zone.
        let speeds = [
            300.0, 300.0, 260.0, 220.0, 240.0, 260.0, 230.0, 190.0, 150.0, 200.0, 250.0,
            290.0, 290.0, 290.0,
        ];
        let corners = detector(30.0, 100.0, 1)
            .detect(&speeds, &grid(speeds.len(), 5.0))
            .unwrap();

        assert_eq!(corners.len(), 2);
        for pair in corners.windows(2) {
            assert!(pair[0].end_idx < pair[1].start_idx);
        }
        for c in &corners {
            assert!(c.start_idx <= c.apex_idx && c.apex_idx <= c.end_idx);
            assert!(c.end_idx < speeds.len());
        }
        assert_eq!(speeds[corners[0].apex_idx], 220.0);
        assert_eq!(speeds[corners[1].apex_idx], 150.0);
    }

    #[test]
    fn idle_ignores_drops_below_noise_floor() {
        let det = detector(10.0, 10.0, 1);
        let speeds = [200.0, 199.8, 199.0, 199.0];
        assert_eq!(
            det.step(&speeds, ScanState::Idle, 1, 0),
            Transition::Continue {
                state: ScanState::Idle,
                cursor: 2
            }
        );
        assert_eq!(det.step(&speeds, ScanState::Idle, 2, 0), Transition::Finished);
    }

    #[test]
    fn braking_abandons_window_below_min_drop() {
        let det = detector(50.0, 10.0, 1);
        let speeds = [200.0, 190.0, 180.0, 185.0, 190.0];
        let state = ScanState::Braking {
            onset: 1,
            drop: 10.0,
        };
        assert_eq!(
            det.step(&speeds, state, 2, 0),
            Transition::Closed {
                segment: None,
                cursor: 3
            }
        );
    }

    #[test]
    fn recovery_tolerates_small_dips() {
        let det = detector(10.0, 50.0, 1);
        let speeds = [200.0, 150.0, 160.0, 159.9, 170.0];
        let state = ScanState::Recovery {
            onset: 1,
            apex: 1,
            recovered: 10.0,
        };
        assert_eq!(
            det.step(&speeds, state, 2, 0),
            Transition::Continue {
                state: ScanState::Recovery {
                    onset: 1,
                    apex: 1,
                    recovered: 10.0
                },
                cursor: 3
            }
        );
    }

    #[test]
    fn recovery_closes_once_target_reached() {
        let det = detector(10.0, 5.0, 1);
        let speeds = [200.0, 200.0, 150.0, 160.0, 170.0, 180.0];
        let state = ScanState::Recovery {
            onset: 1,
            apex: 2,
            recovered: 10.0,
        };
        assert_eq!(
            det.step(&speeds, state, 3, 0),
            Transition::Closed {
                segment: Some(CornerSegment::new(0, 2, 4)),
                cursor: 5
            }
        );
    }
}
