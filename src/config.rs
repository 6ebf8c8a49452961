use crate::chart::ChartOptions;
use crate::counter::DEFAULT_PROGRAM;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheMode {
    /// `<outdir>/.locplot`
    InOutdir,
    At(PathBuf),
    Disabled,
}

/// Everything a run needs, resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub repo: PathBuf,
    pub outdir: PathBuf,
    /// Normalized comma-separated allow-list; `None` counts every language.
    pub langs: Option<String>,
    pub cloc: String,
    pub cache: CacheMode,
    pub chart: ChartOptions,
    pub json: bool,
}

impl Config {
    pub fn new<P: AsRef<Path>>(repo: P) -> Self {
        Self {
            repo: repo.as_ref().to_path_buf(),
            outdir: PathBuf::from("."),
            langs: None,
            cloc: DEFAULT_PROGRAM.to_string(),
            cache: CacheMode::InOutdir,
            chart: ChartOptions::default(),
            json: false,
        }
    }

    pub fn table_path(&self, repo_name: &str) -> PathBuf {
        self.outdir.join(format!("loc_{repo_name}.csv"))
    }

    pub fn chart_path(&self, repo_name: &str) -> PathBuf {
        self.outdir.join(format!("loc_{repo_name}.svg"))
    }
}

/// Trim entries and drop empty ones; an empty list means no filter.
pub fn normalize_langs(raw: &str) -> Option<String> {
    let langs: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if langs.is_empty() {
        None
    } else {
        Some(langs.join(","))
    }
}
