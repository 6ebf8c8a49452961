use crate::aggregate::{self, DECLARED_REDUCER};
use crate::cache::{Cache, CountScope};
use crate::chart;
use crate::config::{CacheMode, Config};
use crate::counter::{ClocCounter, CountOutcome};
use crate::error::Result;
use crate::git::GitRepo;
use crate::model::{CommitRecord, LanguageSeries, LocTable};
use crate::table;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct RunSummary {
    pub repo_path: PathBuf,
    pub commit_count: usize,
    pub table: LocTable,
    pub series: Vec<LanguageSeries>,
    pub table_path: PathBuf,
    pub chart_path: PathBuf,
}

pub fn run(config: &Config) -> anyhow::Result<RunSummary> {
    let repo = GitRepo::open(&config.repo).context("Failed to open git repository")?;

    let commits = repo
        .list_commits()
        .context("Failed to list commits reachable from HEAD")?;
    info!(count = commits.len(), repo = %repo.path().display(), "Enumerated commits");

    std::fs::create_dir_all(&config.outdir)
        .with_context(|| format!("Failed to create output directory {}", config.outdir.display()))?;

    let mut cache = match &config.cache {
        CacheMode::Disabled => None,
        CacheMode::InOutdir => Some(Cache::new(None::<&Path>, &config.outdir)),
        CacheMode::At(dir) => Some(Cache::new(Some(dir), &config.outdir)),
    }
    .transpose()
    .context("Failed to initialize cache")?;

    let progress = progress_bar(commits.len(), !config.json);
    let counter = ClocCounter::new(config.cloc.clone());
    let identity = if cache.is_some() {
        counter.identity()
    } else {
        counter.program().to_string()
    };
    let table = count_history(
        &repo,
        &commits,
        &counter,
        cache.as_mut(),
        &CountScope::new(&identity, config.langs.as_deref()),
        &progress,
    )
    .context("Failed to count lines of code")?;
    progress.finish_and_clear();

    let name = repo.name();
    let table_path = config.table_path(&name);
    table::write_csv(&table, &table_path)
        .with_context(|| format!("Failed to write {}", table_path.display()))?;

    let series = aggregate::group(&table, DECLARED_REDUCER);
    let chart_path = config.chart_path(&name);
    chart::save(&series, &config.chart, &chart_path)
        .with_context(|| format!("Failed to write {}", chart_path.display()))?;
    info!(rows = table.len(), series = series.len(), "Wrote outputs");

    Ok(RunSummary {
        repo_path: repo.path().to_path_buf(),
        commit_count: commits.len(),
        table,
        series,
        table_path,
        chart_path,
    })
}

/// Count every commit and collect the rows, one complete commit at a time.
pub fn count_history(
    repo: &GitRepo,
    commits: &[CommitRecord],
    counter: &ClocCounter,
    mut cache: Option<&mut Cache>,
    scope: &CountScope,
    progress: &ProgressBar,
) -> Result<LocTable> {
    let total = commits.len();
    let mut table = LocTable::new();

    let missing: HashSet<String> = match cache.as_deref() {
        Some(cache) => {
            let ids: Vec<String> = commits.iter().map(|c| c.id.clone()).collect();
            let missing = cache.get_missing_commits(&ids, scope)?;
            info!(cached = ids.len() - missing.len(), to_count = missing.len(), "Cache lookup");
            missing.into_iter().collect()
        }
        None => HashSet::new(),
    };

    for (i, commit) in commits.iter().enumerate() {
        progress.set_message(format!(
            "Counting LOC in commit {} [{} / {}]",
            commit.short_id(),
            i + 1,
            total
        ));

        let cached = match cache.as_deref() {
            Some(cache) if !missing.contains(&commit.id) => cache.get_counts(&commit.id, scope)?,
            _ => None,
        };

        let rows = match cached {
            Some(rows) => {
                debug!(commit = %commit.short_id(), rows = rows.len(), "Using cached counts");
                rows
            }
            None => {
                let outcome = counter.count(repo.path(), &commit.id, scope.langs)?;
                if outcome == CountOutcome::Missing {
                    warn!(commit = %commit.id, "{} produced no output for commit", counter.program());
                }
                let rows = outcome.into_rows();
                if let Some(cache) = cache.as_deref_mut() {
                    cache.store_counts(&commit.id, scope, &rows)?;
                }
                rows
            }
        };

        debug!(commit = %commit.short_id(), date = %commit.iso_date(), rows = rows.len(), "Counted commit");
        table.append_commit(commit, rows);
        progress.inc(1);
    }

    Ok(table)
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}
