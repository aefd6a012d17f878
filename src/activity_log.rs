//! Append-only JSON-lines log of what visitors do.

use chrono::Local;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::auth::ClientInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub activity_type: String,
    #[serde(default)]
    pub details: Value,
    pub user_agent: String,
    pub ip_address: String,
}

/// Visits on the current local day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailySummary {
    pub entries: u64,
    pub unique_visitors: u64,
}

pub struct ActivityLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn record(&self, activity_type: &str, details: Value, client: &ClientInfo) -> io::Result<()> {
        let entry = LogEntry {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            activity_type: activity_type.to_string(),
            details,
            user_agent: client.user_agent.clone().unwrap_or_else(|| "Unknown".into()),
            ip_address: client.ip.clone().unwrap_or_else(|| "Unknown".into()),
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let _guard = self.lock.lock();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())
    }

    /// Logging is best effort: a failed write never fails the request.
    pub fn track(&self, activity_type: &str, details: Value, client: &ClientInfo) {
        if let Err(e) = self.record(activity_type, details, client) {
            log::warn!("could not append to {:?}: {}", self.path, e);
        }
    }

    /// `None` when nothing has been logged yet. Unparseable lines are skipped.
    pub fn today(&self) -> io::Result<Option<DailySummary>> {
        let _guard = self.lock.lock();
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let today = Local::now().format("%Y-%m-%d").to_string();
        let mut summary = DailySummary::default();
        let mut visitors = HashSet::new();
        for line in BufReader::new(file).lines() {
            let Ok(entry) = serde_json::from_str::<LogEntry>(&line?) else {
                continue;
            };
            if entry.timestamp.starts_with(&today) {
                summary.entries += 1;
                visitors.insert(entry.ip_address);
            }
        }
        summary.unique_visitors = visitors.len() as u64;
        Ok(Some(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(ip: &str) -> ClientInfo {
        ClientInfo { ip: Some(ip.into()), user_agent: Some("test-agent".into()) }
    }

    #[test]
    fn missing_log_has_no_summary() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path().join("user_activities.log"));
        assert_eq!(log.today().unwrap(), None);
    }

    #[test]
    fn counts_todays_entries_and_visitors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("user_activities.log");
        let log = ActivityLog::new(&path);

        log.record("chat", json!({"message_length": 12}), &client("10.0.0.1")).unwrap();
        log.record("export", json!({"format": "pdf"}), &client("10.0.0.1")).unwrap();
        log.record("ideas", Value::Null, &client("10.0.0.2")).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(
            file,
            r#"{{"timestamp":"2001-01-01 00:00:00","activity_type":"chat","details":null,"user_agent":"x","ip_address":"10.0.0.9"}}"#
        )
        .unwrap();

        let summary = log.today().unwrap().unwrap();
        assert_eq!(summary, DailySummary { entries: 3, unique_visitors: 2 });
    }

    #[test]
    fn unknown_client_fields_are_labelled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.log");
        ActivityLog::new(&path).record("chat", Value::Null, &ClientInfo::default()).unwrap();

        let entry: LogEntry = serde_json::from_str(fs::read_to_string(&path).unwrap().trim()).unwrap();
        assert_eq!(entry.ip_address, "Unknown");
        assert_eq!(entry.user_agent, "Unknown");
    }
}
