// src/sink.rs

use crate::error::HistoryResult;
use crate::model::{ChangeRecord, CSV_HEADER};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Destination for exported rows.
pub trait RecordSink {
    fn write_record(&mut self, record: &ChangeRecord) -> HistoryResult<()>;

    /// Flushes anything still buffered.
    fn finish(&mut self) -> HistoryResult<()> {
        Ok(())
    }
}

impl RecordSink for Vec<ChangeRecord> {
    fn write_record(&mut self, record: &ChangeRecord) -> HistoryResult<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Comma-separated output with a fixed header row.
///
/// The inner `csv::Writer` flushes when dropped, so rows written before an
/// error still reach the file.
pub struct CsvSink<W: Write> {
    writer: Writer<W>,
}

impl CsvSink<File> {
    /// Creates (or truncates) `path`, making parent directories as needed.
    pub fn create(path: &Path) -> HistoryResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W) -> HistoryResult<Self> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .from_writer(inner);
        writer.write_record(CSV_HEADER)?;
        Ok(Self { writer })
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_record(&mut self, record: &ChangeRecord) -> HistoryResult<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn finish(&mut self) -> HistoryResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(author: &str, file: &str) -> ChangeRecord {
        ChangeRecord {
            commit_id: "abc123".to_string(),
            author: author.to_string(),
            timestamp: "2023-01-01T10:00:00".to_string(),
            file_path: file.to_string(),
            lines_added: 5,
            lines_removed: 2,
        }
    }

    fn render(records: &[ChangeRecord]) -> String {
        let mut sink = CsvSink::from_writer(Vec::new()).unwrap();
        for record in records {
            sink.write_record(record).unwrap();
        }
        let bytes = sink.writer.into_inner().map_err(|e| e.into_error()).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_header_written_without_rows() {
        assert_eq!(render(&[]), "commit,author,date,file,added,removed\r\n");
    }

    #[test]
    fn test_rows_follow_header() {
        assert_eq!(
            render(&[sample("Alice", "foo.txt")]),
            "commit,author,date,file,added,removed\r\n\
             abc123,Alice,2023-01-01T10:00:00,foo.txt,5,2\r\n"
        );
    }

    #[test]
    fn test_minimal_quoting() {
        let out = render(&[sample("Doe, Jane", "say \"hi\".txt")]);
        let row = out.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "abc123,\"Doe, Jane\",2023-01-01T10:00:00,\"say \"\"hi\"\".txt\",5,2"
        );
    }

    #[test]
    fn test_create_makes_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports/2023/history.csv");

        let mut sink = CsvSink::create(&path).unwrap();
        sink.write_record(&sample("Alice", "foo.txt")).unwrap();
        sink.finish().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_rows_survive_drop_without_finish() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.csv");
        {
            let mut sink = CsvSink::create(&path).unwrap();
            sink.write_record(&sample("Alice", "foo.txt")).unwrap();
        }
        assert!(fs::read_to_string(&path).unwrap().contains("foo.txt"));
    }
}
