use super::parse::parse_cloc_csv;
use crate::error::{LocError, Result};
use crate::model::ClocRow;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

pub const DEFAULT_PROGRAM: &str = "cloc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountOutcome {
    Rows(Vec<ClocRow>),
    /// The tool printed no table for this commit.
    Missing,
}

impl CountOutcome {
    pub fn into_rows(self) -> Vec<ClocRow> {
        match self {
            CountOutcome::Rows(rows) => rows,
            CountOutcome::Missing => Vec::new(),
        }
    }
}

/// Runs `cloc` against the snapshot of a single commit.
#[derive(Debug, Clone)]
pub struct ClocCounter {
    program: String,
}

impl Default for ClocCounter {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl ClocCounter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Program name plus the first line of `<program> --version`, or the
    /// bare name when the version cannot be read.
    pub fn identity(&self) -> String {
        let version = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| {
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .map(str::to_string)
            });
        debug!(program = %self.program, ?version, "Resolved counter version");

        match version {
            Some(version) => format!("{} {}", self.program, version),
            None => self.program.clone(),
        }
    }

    pub fn args(commit_id: &str, langs: Option<&str>) -> Vec<String> {
        let mut args = vec![
            commit_id.to_string(),
            "--git".to_string(),
            "--vcs=git".to_string(),
            "--csv".to_string(),
            "--quiet".to_string(),
        ];
        if let Some(langs) = langs {
            args.push(format!("--include-lang={langs}"));
        }
        args
    }

    pub fn count(&self, repo_path: &Path, commit_id: &str, langs: Option<&str>) -> Result<CountOutcome> {
        let args = Self::args(commit_id, langs);
        debug!(program = %self.program, ?args, "Running counter");

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(repo_path)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| LocError::ToolSpawn {
                tool: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(LocError::ExternalToolFailure {
                tool: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(match parse_cloc_csv(&stdout)? {
            Some(rows) => CountOutcome::Rows(rows),
            None => CountOutcome::Missing,
        })
    }
}
