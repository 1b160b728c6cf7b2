use crate::gui_bridge::model::ComparisonModel;
use anyhow::Context;
use cornercore::ComparisonOutcome;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

fn cell(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}

/// Renders the matched-corner table, or the reason there is none.
pub fn format_summary(model: &ComparisonModel) -> String {
    let (a, b) = (&model.lap_a.label, &model.lap_b.label);
    let Some(comparison) = model.comparison.as_ref() else {
        return "No comparison available.".to_string();
    };

    match comparison.outcome {
        ComparisonOutcome::NoCorners => {
            return format!(
                "No corners detected ({}: {}, {}: {}). Try lowering --min-drop.",
                a,
                model.lap_a.corners.len(),
                b,
                model.lap_b.corners.len()
            )
        }
        ComparisonOutcome::NoMatches => {
            return "No matched corners within tolerance. Try increasing --tol-m.".to_string()
        }
        ComparisonOutcome::Matched => {}
    }

    let headers = [
        "Corner".to_string(),
        format!("{}_CornerTime_s", a),
        format!("{}_CornerTime_s", b),
        "Delta_s".to_string(),
        format!("{}_Apex_kmh", a),
        format!("{}_Apex_kmh", b),
    ];
    let rows: Vec<[String; 6]> = comparison
        .rows
        .iter()
        .map(|r| {
            [
                r.corner.to_string(),
                cell(r.time_a, 3),
                cell(r.time_b, 3),
                cell(r.delta_s, 3),
                format!("{:.1}", r.apex_speed_a),
                format!("{:.1}", r.apex_speed_b),
            ]
        })
        .collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .map(|row| row[col].len())
                .chain(std::iter::once(headers[col].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::from("Matched corner summary:\n");
    for line in std::iter::once(&headers).chain(rows.iter()) {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{:>width$}", value, width = width))
            .collect();
        let _ = writeln!(out, "{}", cells.join(" "));
    }
    if let Some(total) = comparison.total_delta_s {
        let _ = write!(out, "Total delta over matched corners: {:+.3} s", total);
    }
    out
}

pub fn write_report<P: AsRef<Path>>(path: P, model: &ComparisonModel) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(model).context("serialising comparison report")?;
    fs::write(path_ref, body).with_context(|| format!("writing report {}", path_ref.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_lap_records, GeneratorConfig};
    use crate::workflow::config::WorkflowConfig;
    use crate::workflow::runner::Runner;

    fn model(tolerance: f64) -> ComparisonModel {
        let mut config = WorkflowConfig::default();
        config.analysis.tolerance = tolerance;
        let runner = Runner::new(config).unwrap();
        let base = GeneratorConfig::default();
        let mut shifted = base.rival(0.95, 3);
        for corner in &mut shifted.corners {
            corner.apex_m += 40.0;
        }
        let result = runner
            .execute_records(
                &build_lap_records(&base).unwrap(),
                &build_lap_records(&shifted).unwrap(),
            )
            .unwrap();
        ComparisonModel::new("VER", "NOR", &result)
    }

    #[test]
    fn summary_lists_matched_corners() {
        let summary = format_summary(&model(60.0));
        assert!(summary.starts_with("Matched corner summary:"));
        assert!(summary.contains("VER_CornerTime_s"));
        assert!(summary.contains("NOR_Apex_kmh"));
        assert!(summary.contains("Total delta"));
    }

    #[test]
    fn summary_explains_missing_matches() {
        let model = model(5.0);
        assert!(model.deltas.is_empty());
        assert!(format_summary(&model).contains("increasing --tol-m"));
    }

    #[test]
    fn report_round_trips_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/report.json");
        let model = model(60.0);
        write_report(&path, &model).unwrap();

        let stored: ComparisonModel =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored.matched(), model.matched());
        assert_eq!(stored.lap_a.label, "VER");
    }
}
