use crate::model::{LanguageSeries, LocTable, SeriesPoint};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// How rows that land in the same (day, language) bucket are collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Max,
    Sum,
}

/// The reducer the pipeline uses: the largest count seen on a day.
pub const DECLARED_REDUCER: Reducer = Reducer::Max;

impl Reducer {
    pub fn name(self) -> &'static str {
        match self {
            Reducer::Max => "max",
            Reducer::Sum => "sum",
        }
    }

    fn combine(self, acc: u64, value: u64) -> u64 {
        match self {
            Reducer::Max => acc.max(value),
            Reducer::Sum => acc.saturating_add(value),
        }
    }
}

/// Group rows by UTC calendar day and language.
///
/// Every series covers every day present in the table; a language with no
/// row on a day gets 0 there. Series are sorted by language name.
pub fn group(table: &LocTable, reducer: Reducer) -> Vec<LanguageSeries> {
    let mut days: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut buckets: BTreeMap<String, BTreeMap<NaiveDate, u64>> = BTreeMap::new();

    for row in table.rows() {
        let day = row.date.date_naive();
        days.insert(day);
        buckets
            .entry(row.language.clone())
            .or_default()
            .entry(day)
            .and_modify(|acc| *acc = reducer.combine(*acc, row.code))
            .or_insert(row.code);
    }

    buckets
        .into_iter()
        .map(|(language, per_day)| LanguageSeries {
            language,
            points: days
                .iter()
                .map(|&day| SeriesPoint {
                    day,
                    code: per_day.get(&day).copied().unwrap_or(0),
                })
                .collect(),
        })
        .collect()
}
