use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::LabeledTrace;

// ---------------------------------------------------------------------------
// Trace export – dispatch by extension
// ---------------------------------------------------------------------------

/// Write the overlay traces to a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – long format, one row per sample: `trace,time,signal`
/// * `.json` – array of `{ "label": ..., "trace": { "time": [...], "signal": [...] } }`
pub fn export_traces(path: &Path, traces: &[LabeledTrace]) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => export_csv(path, traces),
        "json" => export_json(path, traces),
        other => bail!("Unsupported export extension: .{other}"),
    }
}

fn export_csv(path: &Path, traces: &[LabeledTrace]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer
        .write_record(["trace", "time", "signal"])
        .context("writing CSV header")?;

    for lt in traces {
        for (t, s) in lt.trace.time.iter().zip(lt.trace.signal.iter()) {
            let time = t.to_string();
            let signal = s.to_string();
            writer
                .write_record([lt.label.as_str(), time.as_str(), signal.as_str()])
                .with_context(|| format!("writing CSV row for trace '{}'", lt.label))?;
        }
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn export_json(path: &Path, traces: &[LabeledTrace]) -> Result<()> {
    let file = std::fs::File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(file, traces).context("serializing traces")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::KineticTrace;

    fn sample_traces() -> Vec<LabeledTrace> {
        vec![LabeledTrace {
            label: "demo".to_string(),
            trace: KineticTrace {
                time: vec![0.0, 1.0],
                signal: vec![1.5, 0.5],
            },
        }]
    }

    #[test]
    fn csv_export_writes_long_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.csv");

        export_traces(&path, &sample_traces()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("trace,time,signal"));
        assert_eq!(lines.next(), Some("demo,0,1.5"));
        assert_eq!(lines.next(), Some("demo,1,0.5"));
    }

    #[test]
    fn json_export_round_trips_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.json");

        export_traces(&path, &sample_traces()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["label"], "demo");
        assert_eq!(value[0]["trace"]["signal"][0], 1.5);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.xlsx");
        assert!(export_traces(&path, &sample_traces()).is_err());
    }
}
