use crate::error::{LocError, Result};
use crate::model::CommitRecord;
use chrono::{DateTime, FixedOffset};
use gix::{ObjectId, Repository};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open the repository whose work tree is `path`.
    ///
    /// Only `path/.git` is considered; parent directories are not searched.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if !path.join(".git").is_dir() {
            return Err(LocError::InvalidRepository(path));
        }

        let repo = gix::open(&path)?;
        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name of the work tree, used to name output files.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "repo".to_string())
    }

    /// Every commit reachable from HEAD, oldest author date first.
    pub fn list_commits(&self) -> Result<Vec<CommitRecord>> {
        let mut head = self.repo.head()?;
        if head.is_unborn() {
            debug!(path = %self.path.display(), "HEAD is unborn, no commits");
            return Ok(Vec::new());
        }
        let head_commit = head.peel_to_commit_in_place()?;

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let author = commit.author()?;
            let time = author
                .time()
                .map_err(|e| LocError::InvalidDate(format!("Author date of {commit_id}: {e}")))?;

            commits.push(CommitRecord {
                id: commit_id.to_string(),
                timestamp: to_datetime(time.seconds, time.offset)?,
            });

            for pid in commit.parent_ids() {
                stack.push_back(pid.into());
            }
        }

        commits.sort_by_key(|c| c.timestamp);
        debug!(count = commits.len(), "Collected commits");
        Ok(commits)
    }
}

fn to_datetime(seconds: i64, offset: i32) -> Result<DateTime<FixedOffset>> {
    let tz = FixedOffset::east_opt(offset)
        .ok_or_else(|| LocError::InvalidDate(format!("Invalid UTC offset: {offset}")))?;
    DateTime::from_timestamp(seconds, 0)
        .map(|dt| dt.with_timezone(&tz))
        .ok_or_else(|| LocError::InvalidDate(format!("Invalid timestamp: {seconds}")))
}
