// src/parser.rs

use crate::error::HistoryResult;
use crate::model::{ChangeRecord, CommitHeader};
use crate::timestamp::normalize_timestamp;
use tracing::{debug, trace};

pub const METADATA_SEPARATOR: char = '|';
pub const FILE_STAT_SEPARATOR: char = '\t';

/// `--pretty` format matching what [`parse_metadata_line`] expects
pub const LOG_FORMAT: &str = "%H|%an|%ad";

/// Structural shape of a single log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Empty,
    Metadata,
    FileStat,
    Unrecognized,
}

/// Outcome of reading a numstat line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStat {
    Countable {
        added: u64,
        removed: u64,
        path: String,
    },
    /// Binary files report `-` instead of line counts
    NotCountable,
}

fn field_count(line: &str, separator: char) -> usize {
    line.trim().split(separator).count()
}

pub fn classify(line: &str) -> LineKind {
    if line.trim().is_empty() {
        LineKind::Empty
    } else if line.contains(METADATA_SEPARATOR)
        && !line.contains(FILE_STAT_SEPARATOR)
        && field_count(line, METADATA_SEPARATOR) == 3
    {
        LineKind::Metadata
    } else if line.contains(FILE_STAT_SEPARATOR) && field_count(line, FILE_STAT_SEPARATOR) == 3 {
        LineKind::FileStat
    } else {
        LineKind::Unrecognized
    }
}

/// Parses a `hash|author|date` header. An unreadable date is an error.
pub fn parse_metadata_line(line: &str) -> HistoryResult<CommitHeader> {
    let mut fields = line.trim().splitn(3, METADATA_SEPARATOR);
    let commit_id = fields.next().unwrap_or_default();
    let author = fields.next().unwrap_or_default();
    let date = fields.next().unwrap_or_default();

    Ok(CommitHeader {
        commit_id: commit_id.to_string(),
        author: author.to_string(),
        timestamp: normalize_timestamp(date)?,
    })
}

pub fn parse_file_stat_line(line: &str) -> FileStat {
    let mut fields = line.trim().splitn(3, FILE_STAT_SEPARATOR);
    let added = fields.next().and_then(|n| n.parse::<u64>().ok());
    let removed = fields.next().and_then(|n| n.parse::<u64>().ok());

    match (added, removed, fields.next()) {
        (Some(added), Some(removed), Some(path)) => FileStat::Countable {
            added,
            removed,
            path: path.to_string(),
        },
        _ => FileStat::NotCountable,
    }
}

/// Commit block currently being read. Starts empty for every log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseState {
    pub current: Option<CommitHeader>,
}

/// Advances the parser by one line, possibly yielding a record.
pub fn transition(
    state: ParseState,
    line: &str,
) -> HistoryResult<(ParseState, Option<ChangeRecord>)> {
    match classify(line) {
        LineKind::Empty => Ok((state, None)),
        LineKind::Unrecognized => {
            trace!("ignoring unrecognized log line: {line:?}");
            Ok((state, None))
        }
        LineKind::Metadata => {
            let header = parse_metadata_line(line)?;
            Ok((
                ParseState {
                    current: Some(header),
                },
                None,
            ))
        }
        LineKind::FileStat => {
            let record = match (parse_file_stat_line(line), state.current.as_ref()) {
                (FileStat::NotCountable, _) => {
                    debug!("skipping binary numstat entry: {line:?}");
                    None
                }
                (FileStat::Countable { .. }, None) => {
                    debug!("numstat line has no preceding commit header: {line:?}");
                    None
                }
                (
                    FileStat::Countable {
                        added,
                        removed,
                        path,
                    },
                    Some(header),
                ) => Some(ChangeRecord::new(header, path, added, removed)),
            };
            Ok((state, record))
        }
    }
}

/// Parses the complete `git log --numstat` output of one file.
///
/// The log interleaves commit headers (`hash|author|date`) with numstat
/// lines (`added<TAB>removed<TAB>path`). Each header opens a block and every
/// numstat line that follows belongs to it until the next header.
pub fn parse_log(text: &str) -> HistoryResult<Vec<ChangeRecord>> {
    let mut state = ParseState::default();
    let mut records = Vec::new();

    for line in text.lines() {
        let (next, record) = transition(state, line)?;
        state = next;
        records.extend(record);
    }

    Ok(records)
}
