use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::analytics::events::{EventKind, ProposalEvent};
use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

/// Append-only JSONL activity log.
///
/// Writes are best-effort: a failure to create or append the file never
/// reaches the request that triggered the event.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    /// The log at `~/.pitchdeck/events.jsonl`, or a no-op log when logging is
    /// disabled or there is no home directory.
    pub fn from_config(cfg: &LoggingConfig) -> Self {
        Self {
            path: if cfg.enabled { events_log_path() } else { None },
        }
    }

    /// A log at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A log that drops every event.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn record(&self, kind: EventKind) {
        let _ = self.append(&ProposalEvent::now(kind));
    }

    pub fn gate_attempt(&self, granted: bool) {
        self.record(EventKind::GateAttempt { granted });
    }

    pub fn section_view(&self, section: &str) {
        self.record(EventKind::SectionView {
            section: section.to_string(),
        });
    }

    pub fn quote(&self, commitment_millions: u32, tier_millions: u32) {
        self.record(EventKind::Quote {
            commitment_millions,
            tier_millions,
        });
    }

    fn append(&self, event: &ProposalEvent) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Every event in the log. Malformed lines are skipped; a missing file
    /// reads as empty.
    pub fn read_all(&self) -> Vec<ProposalEvent> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<ProposalEvent>(&line).ok())
            .collect()
    }

    /// Events from the last `days` days, or all of them for `None`.
    pub fn read_since_days(&self, days: Option<u32>) -> Vec<ProposalEvent> {
        let events = self.read_all();

        let Some(days) = days else {
            return events;
        };

        let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
        events
            .into_iter()
            .filter(|e| parse_timestamp(&e.timestamp).is_some_and(|t| t >= cutoff))
            .collect()
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Return the path to the event log file.
pub fn events_log_path() -> Option<PathBuf> {
    crate::config::state_dir().map(|dir| dir.join("events.jsonl"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(name: &str) -> (PathBuf, EventLog) {
        let dir = std::env::temp_dir().join(format!(
            "pitchdeck-logger-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("events.jsonl");
        (dir, EventLog::at(&path))
    }

    #[test]
    fn appends_and_reads_back() {
        let (dir, log) = temp_log("roundtrip");
        log.gate_attempt(false);
        log.gate_attempt(true);
        log.section_view("executive-summary");
        log.quote(55, 50);

        let events = log.read_all();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].kind, EventKind::GateAttempt { granted: false });
        assert_eq!(
            events[3].kind,
            EventKind::Quote {
                commitment_millions: 55,
                tier_millions: 50
            }
        );
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn skips_malformed_lines() {
        let (dir, log) = temp_log("malformed");
        log.section_view("next-steps");
        let mut file = OpenOptions::new()
            .append(true)
            .open(log.path().unwrap())
            .unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file, r#"{{"timestamp":"x","event":"unknown"}}"#).unwrap();
        log.section_view("about-us");

        assert_eq!(log.read_all().len(), 2);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn day_filter_drops_old_events() {
        let (dir, log) = temp_log("days");
        log.append(&ProposalEvent {
            timestamp: "2020-01-01T00:00:00+00:00".to_string(),
            kind: EventKind::GateAttempt { granted: true },
        })
        .unwrap();
        log.gate_attempt(true);

        assert_eq!(log.read_since_days(None).len(), 2);
        assert_eq!(log.read_since_days(Some(7)).len(), 1);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn disabled_log_is_silent() {
        let log = EventLog::disabled();
        log.gate_attempt(true);
        assert!(log.read_all().is_empty());
        assert!(log.path().is_none());

        let off = EventLog::from_config(&LoggingConfig {
            enabled: false,
            access_log: true,
        });
        assert!(off.path().is_none());
    }

    #[test]
    fn missing_file_reads_empty() {
        let (_dir, log) = temp_log("missing");
        assert!(log.read_all().is_empty());
    }
}
