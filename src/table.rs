use crate::error::Result;
use crate::model::LocTable;
use crate::util::{csv_field, write_atomic};
use chrono::SecondsFormat;
use std::fmt::Write as _;
use std::path::Path;

pub const HEADER: &str = "date,files,language,blank,comment,code";

pub fn to_csv(table: &LocTable) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + table.len() * 48);
    out.push_str(HEADER);
    out.push('\n');
    for row in table.rows() {
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{},{},{},{},{},{}",
            row.date.to_rfc3339_opts(SecondsFormat::Secs, true),
            row.files,
            csv_field(&row.language),
            row.blank,
            row.comment,
            row.code
        );
    }
    out
}

pub fn write_csv(table: &LocTable, path: &Path) -> Result<()> {
    write_atomic(path, to_csv(table).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LocRow;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> LocTable {
        vec![
            LocRow {
                date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                language: "Rust".to_string(),
                files: 3,
                blank: 10,
                comment: 5,
                code: 200,
            },
            LocRow {
                date: Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 15).unwrap(),
                language: "C/C++ Header".to_string(),
                files: 1,
                blank: 0,
                comment: 1,
                code: 12,
            },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        assert_eq!(
            to_csv(&sample()),
            "date,files,language,blank,comment,code\n\
             2024-05-01T12:00:00Z,3,Rust,10,5,200\n\
             2024-05-02T08:30:15Z,1,C/C++ Header,0,1,12\n"
        );
    }

    #[test]
    fn empty_table_is_header_only() {
        assert_eq!(to_csv(&LocTable::new()), format!("{HEADER}\n"));
    }

    #[test]
    fn write_csv_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("loc_demo.csv");
        write_csv(&sample(), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), to_csv(&sample()));
    }
}
