//! Observability - per-tick simulation events and an append-only JSONL log.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimEventKind {
    CoinCollected,
    CrateSpawned,
    CrateCollected,
    Death,
    OracleDegraded,
}

/// Something noteworthy that happened during one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    pub tick: u64,
    pub kind: SimEventKind,
    pub agent: Option<String>,
    pub message: String,
}

impl SimEvent {
    pub fn new(tick: u64, kind: SimEventKind, agent: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            agent: agent.map(str::to_string),
            message: message.into(),
        }
    }
}

/// A [`SimEvent`] as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub timestamp: DateTime<Utc>,
    pub event: SimEvent,
}

/// Appends events to a JSONL file.
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, events: &[SimEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let timestamp = Utc::now();
        for event in events {
            let line = serde_json::to_string(&LoggedEvent {
                timestamp,
                event: event.clone(),
            })?;
            writeln!(file, "{}", line)?;
        }

        Ok(())
    }

    /// Read the last `limit` events; unreadable lines are skipped.
    pub fn read_recent(&self, limit: usize) -> Vec<LoggedEvent> {
        let file = match std::fs::File::open(&self.path) {
            Ok(f) => f,
            Err(_) => return Vec::new(),
        };

        let reader = BufReader::new(file);
        let mut events: Vec<LoggedEvent> = reader
            .lines()
            .map_while(|line| line.ok())
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect();

        if events.len() > limit {
            events.drain(0..events.len() - limit);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_read_recent() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::new(dir.path().join("logs/events.jsonl"));

        let events: Vec<SimEvent> = (1..=5)
            .map(|t| SimEvent::new(t, SimEventKind::Death, Some("Player1"), "respawned"))
            .collect();
        log.append(&events).unwrap();
        log.append(&[SimEvent::new(6, SimEventKind::OracleDegraded, None, "tick failed")])
            .unwrap();

        let recent = log.read_recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].event.tick, 5);
        assert_eq!(recent[1].event.kind, SimEventKind::OracleDegraded);
        assert_eq!(recent[1].event.agent, None);
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EventLog::new(dir.path().join("none.jsonl")).read_recent(10).is_empty());
    }
}
