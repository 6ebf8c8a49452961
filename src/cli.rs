use crate::chart::{ChartOptions, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::config::{normalize_langs, CacheMode, Config};
use crate::counter::DEFAULT_PROGRAM;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "locplot")]
#[command(about = "Count lines of code per language at every commit and chart them over time")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Path to the Git repository")]
    pub repo: PathBuf,

    #[arg(long, default_value = ".", help = "Directory where output files will be saved")]
    pub outdir: PathBuf,

    #[arg(long, default_value = "", help = "Comma-separated languages to count (default: all)")]
    pub langs: String,

    #[arg(long, env = "LOCPLOT_CLOC", default_value = DEFAULT_PROGRAM, help = "Line counting program to run")]
    pub cloc: String,

    #[arg(long, conflicts_with = "no_cache", help = "Directory of the count cache (default: <outdir>/.locplot)")]
    pub cache: Option<PathBuf>,

    #[arg(long, help = "Do not read or write the count cache")]
    pub no_cache: bool,

    #[arg(long, default_value_t = DEFAULT_WIDTH, value_parser = clap::value_parser!(u32).range(320..), help = "Chart width in pixels")]
    pub width: u32,

    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_parser = clap::value_parser!(u32).range(240..), help = "Chart height in pixels")]
    pub height: u32,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv)")]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn into_config(self) -> Config {
        let cache = if self.no_cache {
            CacheMode::Disabled
        } else if let Some(dir) = self.cache {
            CacheMode::At(dir)
        } else {
            CacheMode::InOutdir
        };

        Config {
            repo: self.repo,
            outdir: self.outdir,
            langs: normalize_langs(&self.langs),
            cloc: self.cloc,
            cache,
            chart: ChartOptions {
                width: self.width,
                height: self.height,
            },
            json: self.json,
        }
    }

    pub fn execute(self) -> Result<()> {
        let config = self.into_config();
        let summary = crate::pipeline::run(&config)?;

        if config.json {
            crate::output::output_json(&summary, &config)
        } else {
            crate::output::output_summary(&summary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("locplot").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let config = parse(&["some/repo"]).into_config();
        assert_eq!(config.repo, PathBuf::from("some/repo"));
        assert_eq!(config.outdir, PathBuf::from("."));
        assert_eq!(config.langs, None);
        assert_eq!(config.cache, CacheMode::InOutdir);
        assert_eq!(config.chart, ChartOptions::default());
        assert!(!config.json);
    }

    #[test]
    fn options_flow_into_config() {
        let config = parse(&[
            "repo", "--outdir", "out", "--langs", "Rust, Python", "--cache", "/tmp/c", "--width", "800",
            "--json",
        ])
        .into_config();
        assert_eq!(config.outdir, PathBuf::from("out"));
        assert_eq!(config.langs.as_deref(), Some("Rust,Python"));
        assert_eq!(config.cache, CacheMode::At(PathBuf::from("/tmp/c")));
        assert_eq!(config.chart.width, 800);
        assert!(config.json);
    }

    #[test]
    fn no_cache_disables_cache() {
        assert_eq!(parse(&["repo", "--no-cache"]).into_config().cache, CacheMode::Disabled);
    }

    #[test]
    fn cache_and_no_cache_conflict() {
        assert!(Cli::try_parse_from(["locplot", "repo", "--no-cache", "--cache", "x"]).is_err());
    }

    #[test]
    fn tiny_charts_are_rejected() {
        assert!(Cli::try_parse_from(["locplot", "repo", "--width", "10"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        assert_eq!(parse(&["repo", "-vv"]).verbose, 2);
    }
}
