use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Language name `cloc` uses for its per-invocation total row.
pub const SUM_LANGUAGE: &str = "SUM";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: String,
    /// Author date, with the author's own offset.
    pub timestamp: DateTime<FixedOffset>,
}

impl CommitRecord {
    pub fn iso_date(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// One per-language row as reported by the counting tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClocRow {
    pub files: u64,
    pub language: String,
    pub blank: u64,
    pub comment: u64,
    pub code: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocRow {
    pub date: DateTime<Utc>,
    pub language: String,
    pub files: u64,
    pub blank: u64,
    pub comment: u64,
    pub code: u64,
}

impl LocRow {
    pub fn from_cloc(date: DateTime<Utc>, row: ClocRow) -> Self {
        Self {
            date,
            language: row.language,
            files: row.files,
            blank: row.blank,
            comment: row.comment,
            code: row.code,
        }
    }
}

/// Rows for every counted commit, oldest commit first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocTable {
    rows: Vec<LocRow>,
}

impl LocTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the complete row set of one commit.
    pub fn append_commit(&mut self, commit: &CommitRecord, rows: Vec<ClocRow>) {
        let date = commit.timestamp.with_timezone(&Utc);
        self.rows
            .extend(rows.into_iter().map(|row| LocRow::from_cloc(date, row)));
    }

    pub fn rows(&self) -> &[LocRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<LocRow> for LocTable {
    fn from_iter<I: IntoIterator<Item = LocRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub day: NaiveDate,
    pub code: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSeries {
    pub language: String,
    pub points: Vec<SeriesPoint>,
}

impl LanguageSeries {
    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub langs: Option<String>,
    pub reducer: String,
    pub commit_count: usize,
    pub row_count: usize,
    pub table_path: String,
    pub chart_path: String,
    pub series: Vec<LanguageSeries>,
}
