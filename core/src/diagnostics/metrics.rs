use std::sync::Mutex;

/// Counters accumulated across lap analyses.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub laps: usize,
    pub empty_laps: usize,
    pub corners: usize,
    pub errors: usize,
}

#[derive(Default)]
struct Metrics {
    laps: usize,
    empty_laps: usize,
    corners: usize,
    errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_lap(&self, corners: usize, samples: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.laps += 1;
            metrics.corners += corners;
            if samples == 0 {
                metrics.empty_laps += 1;
            }
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                laps: metrics.laps,
                empty_laps: metrics.empty_laps,
                corners: metrics.corners,
                errors: metrics.errors,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
