//! Append-only JSONL audit trail of simulation events.
//!
//! Every [`SimulationEvent`] becomes one line whose leading fields are
//! `type`, `timestamp` and `run`, followed by the event payload:
//!
//! ```text
//! {"type":"estimate_fallback","timestamp":"2026-01-05T10:00:00.123Z","run":"6f1c...","question":"Q?","persona_group":"g","reason":"timed out"}
//! ```
//!
//! The file is opened in append mode, so successive runs share one trail and
//! are told apart by `run`.

use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use survey_application::{SimulationEvent, SimulationEventLogger};
use tracing::warn;

/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every event and on `Drop`.
pub struct JsonlSimulationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    run_id: String,
}

impl JsonlSimulationLogger {
    /// Open (or create) the audit file at `path`, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened; the caller then runs
    /// without an audit trail.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            run_id: uuid::Uuid::new_v4().to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier stamped on every line written by this logger
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    fn record(&self, event: SimulationEvent) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = Map::new();
        record.insert("type".to_string(), Value::from(event.event_type));
        record.insert("timestamp".to_string(), Value::from(timestamp));
        record.insert("run".to_string(), Value::from(self.run_id.as_str()));

        match event.payload {
            Value::Object(payload) => {
                for (key, value) in payload {
                    record.entry(key).or_insert(value);
                }
            }
            Value::Null => {}
            other => {
                record.insert("data".to_string(), other);
            }
        }

        Value::Object(record)
    }
}

impl SimulationEventLogger for JsonlSimulationLogger {
    fn log(&self, event: SimulationEvent) {
        let record = self.record(event);
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlSimulationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_object_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = JsonlSimulationLogger::open(&path).unwrap();

        logger.log(SimulationEvent::new(
            "simulation_started",
            json!({"questions": 3, "sample_size": 150}),
        ));
        logger.log(SimulationEvent::new(
            "estimate_fallback",
            json!({"question": "Q?", "persona_group": "g", "reason": "timed out"}),
        ));
        let run_id = logger.run_id().to_string();
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "simulation_started");
        assert_eq!(lines[0]["sample_size"], 150);
        assert_eq!(lines[1]["reason"], "timed out");
        for line in &lines {
            assert_eq!(line["run"], run_id.as_str());
            assert!(line["timestamp"].as_str().unwrap().ends_with('Z'));
        }

        // Envelope fields lead each line
        let keys: Vec<&String> = lines[1].as_object().unwrap().keys().take(3).collect();
        assert_eq!(keys, vec!["type", "timestamp", "run"]);
    }

    #[test]
    fn test_payload_cannot_override_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = JsonlSimulationLogger::open(&path).unwrap();

        logger.log(SimulationEvent::new(
            "simulation_saved",
            json!({"type": "spoofed", "record_id": "abc"}),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "simulation_saved");
        assert_eq!(lines[0]["record_id"], "abc");
    }

    #[test]
    fn test_non_object_payload_goes_under_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = JsonlSimulationLogger::open(&path).unwrap();

        logger.log(SimulationEvent::new("note", json!("just a string")));
        logger.log(SimulationEvent::new("empty", Value::Null));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["data"], "just a string");
        assert!(lines[1].get("data").is_none());
    }

    #[test]
    fn test_successive_runs_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");

        let first = JsonlSimulationLogger::open(&path).unwrap();
        first.log(SimulationEvent::new("simulation_started", json!({})));
        drop(first);

        let second = JsonlSimulationLogger::open(&path).unwrap();
        second.log(SimulationEvent::new("simulation_started", json!({})));
        drop(second);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_ne!(lines[0]["run"], lines[1]["run"]);
    }
}
