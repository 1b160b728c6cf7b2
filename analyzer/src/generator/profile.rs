use anyhow::ensure;
use cornercore::lap::TelemetryRecord;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Shape of one synthetic corner: linear braking into the apex and linear exit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CornerProfile {
    pub apex_m: f64,
    pub apex_kmh: f64,
    pub braking_m: f64,
    pub exit_m: f64,
}

impl CornerProfile {
    fn new(apex_m: f64, apex_kmh: f64, braking_m: f64, exit_m: f64) -> Self {
        Self {
            apex_m,
            apex_kmh,
            braking_m,
            exit_m,
        }
    }

    /// Speed cap imposed by this corner at `distance`, if it is in range.
    fn cap(&self, distance: f64, top_speed: f64) -> Option<f64> {
        let offset = distance - self.apex_m;
        if offset <= -self.braking_m || offset >= self.exit_m {
            return None;
        }
        let reach = if offset < 0.0 {
            -offset / self.braking_m
        } else {
            offset / self.exit_m
        };
        Some(self.apex_kmh + (top_speed - self.apex_kmh) * reach)
    }
}

/// Configuration for generating a synthetic lap trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub lap_length_m: f64,
    pub top_speed_kmh: f64,
    /// Mean spacing between raw samples; actual spacing is jittered.
    pub sample_spacing_m: f64,
    pub jitter_m: f64,
    pub noise_kmh: f64,
    /// Multiplier on every speed, e.g. 0.98 for a slightly slower driver.
    pub pace: f64,
    pub seed: u64,
    pub corners: Vec<CornerProfile>,
    pub description: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            lap_length_m: 3300.0,
            top_speed_kmh: 290.0,
            sample_spacing_m: 4.0,
            jitter_m: 1.0,
            noise_kmh: 0.2,
            pace: 1.0,
            seed: 0,
            corners: vec![
                CornerProfile::new(420.0, 95.0, 110.0, 160.0),
                CornerProfile::new(980.0, 160.0, 80.0, 120.0),
                CornerProfile::new(1550.0, 70.0, 130.0, 150.0),
                CornerProfile::new(2300.0, 120.0, 100.0, 140.0),
                CornerProfile::new(2950.0, 85.0, 120.0, 170.0),
            ],
            description: None,
        }
    }
}

impl GeneratorConfig {
    /// Same track, different driver: pace scaled and noise reseeded.
    pub fn rival(&self, pace: f64, seed: u64) -> Self {
        Self {
            pace,
            seed,
            ..self.clone()
        }
    }

    fn speed_at(&self, distance: f64) -> f64 {
        let clean = self
            .corners
            .iter()
            .filter_map(|c| c.cap(distance, self.top_speed_kmh))
            .fold(self.top_speed_kmh, f64::min);
        clean * self.pace
    }

    fn is_braking(&self, distance: f64) -> bool {
        self.corners.iter().any(|c| {
            let offset = distance - c.apex_m;
            offset > -c.braking_m && offset < 0.0
        })
    }
}

fn gear_for(speed_kmh: f64) -> u64 {
    match speed_kmh {
        s if s < 90.0 => 2,
        s if s < 130.0 => 3,
        s if s < 165.0 => 4,
        s if s < 200.0 => 5,
        s if s < 235.0 => 6,
        s if s < 265.0 => 7,
        _ => 8,
    }
}

/// Builds raw sample records in the same shape as exported car data.
pub fn build_lap_records(config: &GeneratorConfig) -> anyhow::Result<Vec<TelemetryRecord>> {
    ensure!(config.lap_length_m > 0.0, "lap length must be positive");
    ensure!(
        config.sample_spacing_m > config.jitter_m.abs(),
        "sample spacing must exceed jitter"
    );
    ensure!(config.pace > 0.0, "pace must be positive");

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::new();
    let mut distance = 0.0;
    let mut elapsed = 0.0;
    let mut previous: Option<(f64, f64)> = None;

    while distance <= config.lap_length_m {
        let jitter = if config.noise_kmh > 0.0 {
            rng.gen_range(-config.noise_kmh..config.noise_kmh)
        } else {
            0.0
        };
        let speed = (config.speed_at(distance) + jitter).max(1.0);
        if let Some((last_distance, last_speed)) = previous {
            let mean_ms = (speed + last_speed) / 2.0 / 3.6;
            elapsed += (distance - last_distance) / mean_ms;
        }
        let braking = config.is_braking(distance);

        let mut record = TelemetryRecord::new();
        record.insert("Distance".into(), json!(distance));
        record.insert("Speed".into(), json!(speed));
        record.insert("Time".into(), json!(elapsed));
        record.insert("RPM".into(), json!(4000.0 + speed * 38.0));
        record.insert("nGear".into(), json!(gear_for(speed)));
        record.insert("Throttle".into(), json!(if braking { 0.0 } else { 100.0 }));
        record.insert("Brake".into(), json!(braking));
        record.insert("DRS".into(), json!(0));
        record.insert("Source".into(), json!("car"));
        records.push(record);

        previous = Some((distance, speed));
        let spacing = if config.jitter_m > 0.0 {
            config.sample_spacing_m + rng.gen_range(-config.jitter_m..config.jitter_m)
        } else {
            config.sample_spacing_m
        };
        distance += spacing;
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distances(records: &[TelemetryRecord]) -> Vec<f64> {
        records
            .iter()
            .map(|r| r["Distance"].as_f64().unwrap())
            .collect()
    }

    #[test]
    fn generator_covers_lap_with_increasing_distance() {
        let records = build_lap_records(&GeneratorConfig::default()).unwrap();
        let d = distances(&records);
        assert!(d.windows(2).all(|w| w[1] > w[0]));
        assert!(*d.last().unwrap() > 3290.0);
        assert_eq!(d[0], 0.0);
    }

    #[test]
    fn generator_is_deterministic_per_seed() {
        let config = GeneratorConfig::default();
        assert_eq!(
            build_lap_records(&config).unwrap(),
            build_lap_records(&config).unwrap()
        );
        assert_ne!(
            build_lap_records(&config).unwrap(),
            build_lap_records(&config.rival(1.0, 7)).unwrap()
        );
    }

    #[test]
    fn corner_apex_is_slowest_point_nearby() {
        let config = GeneratorConfig {
            noise_kmh: 0.0,
            ..Default::default()
        };
        assert_eq!(config.speed_at(1550.0), 70.0);
        assert_eq!(config.speed_at(1200.0), 290.0);
        assert!(config.speed_at(1500.0) > 70.0);
        assert!(config.is_braking(1500.0));
        assert!(!config.is_braking(1600.0));
    }

    #[test]
    fn generator_rejects_degenerate_spacing() {
        let config = GeneratorConfig {
            sample_spacing_m: 1.0,
            jitter_m: 2.0,
            ..Default::default()
        };
        assert!(build_lap_records(&config).is_err());
    }
}
