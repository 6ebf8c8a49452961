pub mod aggregate;
pub mod cache;
pub mod chart;
pub mod cli;
pub mod config;
pub mod counter;
pub mod error;
pub mod git;
pub mod logging;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod table;
pub mod util;
