// src/source.rs

use crate::error::{HistoryError, HistoryResult};
use crate::parser::LOG_FORMAT;
use git2::Repository;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Where tracked paths and their raw logs come from.
pub trait HistorySource {
    /// Paths currently tracked, in the order the repository lists them.
    fn tracked_files(&self) -> HistoryResult<Vec<String>>;

    /// Raw `--numstat` log of `path`, limited to commits after `cutoff`.
    fn file_log(&self, cutoff: &str, path: &str) -> HistoryResult<String>;
}

/// A git work tree on disk, or a subdirectory of one.
pub struct GitRepository {
    repo: Repository,
    workdir: PathBuf,
    /// `sub/dir/` when opened below the work tree root
    prefix: Option<String>,
}

impl GitRepository {
    /// Opens the repository containing `path`. Only files tracked under
    /// `path` are listed, like `git ls-files` run from there.
    pub fn open(path: &Path) -> HistoryResult<Self> {
        let repo = Repository::discover(path)
            .map_err(|_| HistoryError::NotARepository(path.to_path_buf()))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| HistoryError::NotARepository(path.to_path_buf()))?
            .to_path_buf();

        let requested = path.canonicalize()?;
        let root = workdir.canonicalize()?;
        let prefix = requested
            .strip_prefix(&root)
            .ok()
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(|rel| format!("{}/", rel.to_string_lossy().replace('\\', "/")));

        debug!("Opened git repository at {}", workdir.display());
        Ok(Self {
            repo,
            workdir,
            prefix,
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl HistorySource for GitRepository {
    fn tracked_files(&self) -> HistoryResult<Vec<String>> {
        let index = self.repo.index()?;
        let mut files: Vec<String> = Vec::with_capacity(index.len());

        for entry in index.iter() {
            let path = String::from_utf8_lossy(&entry.path).into_owned();
            // Conflicted paths appear once per stage, next to each other.
            if path.is_empty() || files.last() == Some(&path) {
                continue;
            }
            if let Some(prefix) = &self.prefix {
                if !path.starts_with(prefix.as_str()) {
                    continue;
                }
            }
            files.push(path);
        }

        Ok(files)
    }

    fn file_log(&self, cutoff: &str, path: &str) -> HistoryResult<String> {
        let output = Command::new("git")
            .current_dir(&self.workdir)
            .args([
                "log",
                "--follow",
                &format!("--pretty=format:{LOG_FORMAT}"),
                "--numstat",
                "--date=iso",
                &format!("--after={cutoff}"),
                "--",
                path,
            ])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HistoryError::CommandFailed {
                command: format!("git log -- {path}"),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}
