use anyhow::Context;
use cornercore::lap::{ChannelSchema, TelemetryRecord, TelemetrySequence};
use std::fs;
use std::path::Path;

/// Reads a lap exported as a JSON array of sample records.
pub fn load_records<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<TelemetryRecord>> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading telemetry {}", path_ref.display()))?;
    let records: Vec<TelemetryRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing telemetry {}", path_ref.display()))?;
    Ok(records)
}

pub fn load_lap<P: AsRef<Path>>(
    path: P,
    schema: &ChannelSchema,
) -> anyhow::Result<TelemetrySequence> {
    let path_ref = path.as_ref();
    let records = load_records(path_ref)?;
    let sequence = schema
        .resolve(&records)
        .with_context(|| format!("resolving channels of {}", path_ref.display()))?;
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_lap_resolves_records_through_schema() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            br#"[{"Distance": 0.0, "Speed": 250.0, "Time": 0.0, "Brake": false},
                 {"Distance": 5.0, "Speed": 248.0, "Time": 0.07, "Brake": true}]"#,
        )
        .unwrap();
        let path = temp.into_temp_path();

        let lap = load_lap(&path, &ChannelSchema::default()).unwrap();
        assert_eq!(lap.len(), 2);
        assert!(lap.channels.is_empty());
        assert!(lap.has_time());
    }

    #[test]
    fn load_lap_reports_bad_json() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"{not json").unwrap();
        let path = temp.into_temp_path();
        let err = load_lap(&path, &ChannelSchema::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing telemetry"));
    }
}
