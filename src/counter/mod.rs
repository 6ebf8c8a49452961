pub mod cloc;
pub mod parse;

pub use cloc::{ClocCounter, CountOutcome, DEFAULT_PROGRAM};
pub use parse::parse_cloc_csv;
