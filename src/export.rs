// src/export.rs

use crate::error::HistoryResult;
use crate::model::ExportSummary;
use crate::parser::parse_log;
use crate::sink::RecordSink;
use crate::source::HistorySource;
use indicatif::ProgressBar;
use tracing::{debug, info};

/// Streams the history of every tracked file into `sink`, one file at a time.
///
/// Rows keep the order the source lists files in, and within a file the
/// order commits appear in its log.
pub fn export_history<S, K>(
    source: &S,
    sink: &mut K,
    cutoff: &str,
    bar: &ProgressBar,
) -> HistoryResult<ExportSummary>
where
    S: HistorySource + ?Sized,
    K: RecordSink + ?Sized,
{
    let files: Vec<String> = source
        .tracked_files()?
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
    info!("Exporting history of {} files since {}", files.len(), cutoff);

    bar.set_length(files.len() as u64);
    bar.set_message("Reading file history");

    let mut summary = ExportSummary::default();
    for path in &files {
        let log = source.file_log(cutoff, path)?;
        let records = parse_log(&log)?;
        debug!("{}: {} records", path, records.len());

        for record in &records {
            sink.write_record(record)?;
        }
        summary.files += 1;
        summary.records += records.len();
        bar.inc(1);
    }
    sink.finish()?;
    bar.finish_with_message("History exported");
    info!("Exported {} records from {} files", summary.records, summary.files);

    Ok(summary)
}
