use crate::error::{LocError, Result};
use crate::model::{ClocRow, SUM_LANGUAGE};

const COLUMNS: [&str; 5] = ["files", "language", "blank", "comment", "code"];

/// Parse `cloc --csv` output.
///
/// Returns `None` when the output has no header row, which is what cloc
/// prints when nothing in the tree matched. The `SUM` row is dropped.
pub fn parse_cloc_csv(output: &str) -> Result<Option<Vec<ClocRow>>> {
    let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());

    let header = loop {
        match lines.next() {
            Some(line) => {
                let fields = split_csv_line(line);
                if fields.first().map(|f| f.trim()) == Some("files") {
                    break fields;
                }
            }
            None => return Ok(None),
        }
    };

    let mut index = [0usize; 5];
    for (slot, name) in index.iter_mut().zip(COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| LocError::Parse(format!("cloc header lacks a '{name}' column")))?;
    }
    let [files, language, blank, comment, code] = index;

    let mut rows = Vec::new();
    for line in lines {
        let fields = split_csv_line(line);
        let field = |i: usize| {
            fields.get(i).map(|f| f.trim()).ok_or_else(|| {
                LocError::Parse(format!("cloc row has {} fields: {line}", fields.len()))
            })
        };

        let lang = field(language)?;
        if lang == SUM_LANGUAGE {
            continue;
        }

        rows.push(ClocRow {
            files: parse_count(field(files)?, line)?,
            language: lang.to_string(),
            blank: parse_count(field(blank)?, line)?,
            comment: parse_count(field(comment)?, line)?,
            code: parse_count(field(code)?, line)?,
        });
    }

    Ok(Some(rows))
}

fn parse_count(value: &str, line: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|e| LocError::Parse(format!("bad count '{value}' in cloc row '{line}': {e}")))
}

/// Split one CSV record, honouring double quotes and `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
