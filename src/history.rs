use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::persistence::StoreError;

pub const UNNAMED_PLAYER: &str = "Unnamed";

/// Summary of a finished round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub player_name: String,
    pub final_score: u32,
    pub accuracy_percent: u32,
    /// Streak standing when the clock ran out, not the best run in the round.
    pub max_streak: u32,
    pub duration_secs: u32,
}

/// Finished rounds, newest first
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    date: String,
    name: &'a str,
    score: u32,
    accuracy: u32,
    max_streak: u32,
    duration_secs: u32,
}

/// Appends finished rounds to a CSV file, writing the header on creation
#[derive(Debug, Clone)]
pub struct CsvHistoryLog {
    path: PathBuf,
}

impl CsvHistoryLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(HistoryRow {
            date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            name: &entry.player_name,
            score: entry.final_score,
            accuracy: entry.accuracy_percent,
            max_streak: entry.max_streak,
            duration_secs: entry.duration_secs,
        })?;
        writer.flush()?;
        Ok(())
    }
}
