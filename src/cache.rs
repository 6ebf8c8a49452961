use crate::error::{LocError, Result};
use crate::model::ClocRow;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_DIR: &str = ".locplot";
pub const CACHE_SCHEMA_VERSION: i64 = 2;

/// What a set of cached rows was produced by: the counting program
/// (name and version) and the language filter it ran with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountScope<'a> {
    pub counter: &'a str,
    pub langs: Option<&'a str>,
}

impl<'a> CountScope<'a> {
    pub fn new(counter: &'a str, langs: Option<&'a str>) -> Self {
        Self { counter, langs }
    }

    fn langs(&self) -> &'a str {
        self.langs.unwrap_or("")
    }
}

/// Per-commit counting results, keyed by commit id and [`CountScope`].
pub struct Cache {
    conn: Connection,
}

impl Cache {
    /// Opens `<cache_path>/cache.db`, or `<default_parent>/.locplot/cache.db`
    /// when no explicit directory is given.
    pub fn new<CP: AsRef<Path>, DP: AsRef<Path>>(cache_path: Option<CP>, default_parent: DP) -> Result<Self> {
        let cache_dir = match cache_path {
            Some(path) => path.as_ref().to_path_buf(),
            None => default_parent.as_ref().join(DEFAULT_DIR),
        };
        std::fs::create_dir_all(&cache_dir)?;
        let db_path = cache_dir.join("cache.db");
        let conn = Connection::open(&db_path)?;
        let mut cache = Self { conn };
        cache.initialize()?;
        Ok(cache)
    }

    fn initialize(&mut self) -> Result<()> {
        self.check_schema_version()?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS counted (
                commit_id TEXT NOT NULL,
                counter TEXT NOT NULL,
                langs TEXT NOT NULL,
                PRIMARY KEY (commit_id, counter, langs)
            );
            CREATE TABLE IF NOT EXISTS counts (
                commit_id TEXT NOT NULL,
                counter TEXT NOT NULL,
                langs TEXT NOT NULL,
                position INTEGER NOT NULL,
                language TEXT NOT NULL,
                files INTEGER NOT NULL,
                blank INTEGER NOT NULL,
                comment INTEGER NOT NULL,
                code INTEGER NOT NULL,
                PRIMARY KEY (commit_id, counter, langs, position),
                FOREIGN KEY (commit_id, counter, langs) REFERENCES counted(commit_id, counter, langs)
            );
            ",
        )?;
        Ok(())
    }

    fn check_schema_version(&mut self) -> Result<()> {
        let user_version: i64 = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?;

        if user_version == 0 {
            let set_stmt = format!("PRAGMA user_version = {CACHE_SCHEMA_VERSION};");
            self.conn.execute_batch(&set_stmt)?;
        } else if user_version != CACHE_SCHEMA_VERSION {
            return Err(LocError::Cache(format!(
                "Schema version mismatch: expected {}, found {} (remove the cache directory or pass --no-cache)",
                CACHE_SCHEMA_VERSION, user_version
            )));
        }

        Ok(())
    }

    /// Cached rows for a commit, or `None` if it was never counted in this
    /// scope. A commit counted with no output yields `Some(vec![])`.
    pub fn get_counts(&self, commit_id: &str, scope: &CountScope) -> Result<Option<Vec<ClocRow>>> {
        let counted: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM counted WHERE commit_id = ? AND counter = ? AND langs = ?)",
            params![commit_id, scope.counter, scope.langs()],
            |row| row.get(0),
        )?;
        if !counted {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT files, language, blank, comment, code FROM counts
             WHERE commit_id = ? AND counter = ? AND langs = ?
             ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![commit_id, scope.counter, scope.langs()], |row| {
                Ok(ClocRow {
                    files: row.get::<_, i64>(0)? as u64,
                    language: row.get(1)?,
                    blank: row.get::<_, i64>(2)? as u64,
                    comment: row.get::<_, i64>(3)? as u64,
                    code: row.get::<_, i64>(4)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(rows))
    }

    /// Store the complete row set of one commit in a single transaction.
    pub fn store_counts(&mut self, commit_id: &str, scope: &CountScope, rows: &[ClocRow]) -> Result<()> {
        let langs = scope.langs();
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM counts WHERE commit_id = ? AND counter = ? AND langs = ?",
            params![commit_id, scope.counter, langs],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO counted (commit_id, counter, langs) VALUES (?, ?, ?)",
            params![commit_id, scope.counter, langs],
        )?;

        {
            let mut insert_stmt = tx.prepare(
                "INSERT INTO counts (commit_id, counter, langs, position, language, files, blank, comment, code)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for (position, row) in rows.iter().enumerate() {
                insert_stmt.execute(params![
                    commit_id,
                    scope.counter,
                    langs,
                    position as i64,
                    row.language,
                    row.files as i64,
                    row.blank as i64,
                    row.comment as i64,
                    row.code as i64
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    pub fn get_missing_commits(&self, all_commit_ids: &[String], scope: &CountScope) -> Result<Vec<String>> {
        if all_commit_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut stmt = self
            .conn
            .prepare("SELECT commit_id FROM counted WHERE counter = ? AND langs = ?")?;
        let existing: HashSet<String> = stmt
            .query_map(params![scope.counter, scope.langs()], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(all_commit_ids
            .iter()
            .filter(|id| !existing.contains(*id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const ALL: CountScope<'static> = CountScope {
        counter: "cloc 2.00",
        langs: None,
    };

    fn row(language: &str, code: u64) -> ClocRow {
        ClocRow {
            files: 1,
            language: language.to_string(),
            blank: 2,
            comment: 3,
            code,
        }
    }

    #[test]
    fn default_location_is_under_given_parent() {
        let out = tempdir().unwrap();
        Cache::new(None::<&Path>, out.path()).unwrap();
        assert!(out.path().join(DEFAULT_DIR).join("cache.db").is_file());
    }

    #[test]
    fn stored_rows_come_back_in_order() {
        let dir = tempdir().unwrap();
        let mut cache = Cache::new(Some(dir.path()), dir.path()).unwrap();
        let rows = vec![row("Rust", 100), row("Markdown", 5), row("C", 7)];

        assert_eq!(cache.get_counts("abc", &ALL).unwrap(), None);
        cache.store_counts("abc", &ALL, &rows).unwrap();
        assert_eq!(cache.get_counts("abc", &ALL).unwrap(), Some(rows));
    }

    #[test]
    fn empty_commit_is_remembered() {
        let dir = tempdir().unwrap();
        let mut cache = Cache::new(Some(dir.path()), dir.path()).unwrap();
        cache.store_counts("abc", &ALL, &[]).unwrap();
        assert_eq!(cache.get_counts("abc", &ALL).unwrap(), Some(vec![]));
    }

    #[test]
    fn language_filter_is_part_of_the_key() {
        let dir = tempdir().unwrap();
        let mut cache = Cache::new(Some(dir.path()), dir.path()).unwrap();
        let rust = CountScope::new("cloc 2.00", Some("Rust"));
        cache.store_counts("abc", &rust, &[row("Rust", 1)]).unwrap();

        assert_eq!(cache.get_counts("abc", &ALL).unwrap(), None);
        assert_eq!(
            cache.get_missing_commits(&["abc".to_string(), "def".to_string()], &rust).unwrap(),
            vec!["def".to_string()]
        );
        assert_eq!(
            cache.get_missing_commits(&["abc".to_string()], &ALL).unwrap(),
            vec!["abc".to_string()]
        );
    }

    #[test]
    fn counters_do_not_share_rows() {
        let dir = tempdir().unwrap();
        let mut cache = Cache::new(Some(dir.path()), dir.path()).unwrap();
        let old = CountScope::new("cloc 1.98", None);
        let new = CountScope::new("cloc 2.00", None);
        let other = CountScope::new("/opt/tokei-wrapper", None);

        cache.store_counts("abc", &old, &[row("Rust", 1)]).unwrap();

        assert_eq!(cache.get_counts("abc", &new).unwrap(), None);
        assert_eq!(cache.get_counts("abc", &other).unwrap(), None);
        assert_eq!(
            cache.get_missing_commits(&["abc".to_string()], &new).unwrap(),
            vec!["abc".to_string()]
        );

        cache.store_counts("abc", &new, &[row("Rust", 2)]).unwrap();
        assert_eq!(cache.get_counts("abc", &old).unwrap(), Some(vec![row("Rust", 1)]));
        assert_eq!(cache.get_counts("abc", &new).unwrap(), Some(vec![row("Rust", 2)]));
    }

    #[test]
    fn restoring_replaces_previous_rows() {
        let dir = tempdir().unwrap();
        let mut cache = Cache::new(Some(dir.path()), dir.path()).unwrap();
        cache.store_counts("abc", &ALL, &[row("Rust", 1), row("C", 2)]).unwrap();
        cache.store_counts("abc", &ALL, &[row("Go", 3)]).unwrap();
        assert_eq!(cache.get_counts("abc", &ALL).unwrap(), Some(vec![row("Go", 3)]));
    }

    #[test]
    fn reopening_keeps_data() {
        let dir = tempdir().unwrap();
        {
            let mut cache = Cache::new(Some(dir.path()), dir.path()).unwrap();
            cache.store_counts("abc", &ALL, &[row("Rust", 9)]).unwrap();
        }
        let cache = Cache::new(Some(dir.path()), dir.path()).unwrap();
        assert_eq!(cache.get_counts("abc", &ALL).unwrap(), Some(vec![row("Rust", 9)]));
    }

    #[test]
    fn older_schema_is_rejected() {
        let dir = tempdir().unwrap();
        {
            let conn = Connection::open(dir.path().join("cache.db")).unwrap();
            conn.execute_batch("PRAGMA user_version = 1;").unwrap();
        }
        let err = Cache::new(Some(dir.path()), dir.path()).err().unwrap();
        assert!(matches!(err, LocError::Cache(_)));
    }
}
