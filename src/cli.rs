// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Export per-file git change history to CSV", long_about = None)]
pub struct Args {
    /// Path to the git repository to read, or a directory inside it
    #[arg(short, long)]
    pub repo: PathBuf,

    /// CSV file to write; parent directories are created
    #[arg(short, long)]
    pub output: PathBuf,

    /// Only include commits after this date (defaults to one year ago)
    #[arg(long)]
    pub since: Option<String>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}
