// src/main.rs

mod cli;
mod error;
mod export;
mod model;
mod parser;
mod sink;
mod source;
mod timestamp;

use clap::Parser;
use cli::Args;
use error::HistoryResult;
use indicatif::ProgressBar;
use model::ExportSummary;
use sink::CsvSink;
use source::GitRepository;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "git_numstat=info".into()))
        .init();

    let args = Args::parse();
    let start_time = Instant::now();

    match run(&args) {
        Ok(summary) => {
            println!(
                "Wrote {} rows for {} files to {} in {:.2?}.",
                summary.records,
                summary.files,
                args.output.display(),
                start_time.elapsed()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> HistoryResult<ExportSummary> {
    let repo = GitRepository::open(&args.repo)?;
    let cutoff = match &args.since {
        Some(since) => since.clone(),
        None => timestamp::default_cutoff(chrono::Local::now().naive_local()),
    };
    tracing::info!("Reading history of {} since {}", repo.workdir().display(), cutoff);

    let mut sink = CsvSink::create(&args.output)?;
    let bar = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    export::export_history(&repo, &mut sink, &cutoff, &bar)
}
