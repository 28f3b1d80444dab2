// src/model.rs

use serde::Serialize;

/// Column names of the exported table, in output order
pub const CSV_HEADER: [&str; 6] = ["commit", "author", "date", "file", "added", "removed"];

/// The commit a block of file-stat lines belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHeader {
    pub commit_id: String,
    pub author: String,
    /// Normalized ISO-8601 timestamp
    pub timestamp: String,
}

/// One changed file in one commit, fully resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    #[serde(rename = "commit")]
    pub commit_id: String,
    pub author: String,
    #[serde(rename = "date")]
    pub timestamp: String,
    #[serde(rename = "file")]
    pub file_path: String,
    #[serde(rename = "added")]
    pub lines_added: u64,
    #[serde(rename = "removed")]
    pub lines_removed: u64,
}

impl ChangeRecord {
    pub fn new(header: &CommitHeader, file_path: String, lines_added: u64, lines_removed: u64) -> Self {
        Self {
            commit_id: header.commit_id.clone(),
            author: header.author.clone(),
            timestamp: header.timestamp.clone(),
            file_path,
            lines_added,
            lines_removed,
        }
    }
}

/// Totals reported once an export run completes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub files: usize,
    pub records: usize,
}
