use crate::aggregate::DECLARED_REDUCER;
use crate::config::Config;
use crate::model::{LanguageSeries, PlotOutput, SCHEMA_VERSION};
use crate::pipeline::RunSummary;
use anyhow::Result;
use chrono::Utc;
use console::style;

pub fn output_json(summary: &RunSummary, config: &Config) -> Result<()> {
    let output = PlotOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: summary.repo_path.to_string_lossy().to_string(),
        langs: config.langs.clone(),
        reducer: DECLARED_REDUCER.name().to_string(),
        commit_count: summary.commit_count,
        row_count: summary.table.len(),
        table_path: summary.table_path.to_string_lossy().to_string(),
        chart_path: summary.chart_path.to_string_lossy().to_string(),
        series: summary.series.clone(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Latest code count per language, largest first.
pub fn latest_counts(series: &[LanguageSeries]) -> Vec<(&str, u64)> {
    let mut latest: Vec<(&str, u64)> = series
        .iter()
        .filter_map(|s| s.latest().map(|p| (s.language.as_str(), p.code)))
        .collect();
    latest.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    latest
}

pub fn output_summary(summary: &RunSummary) -> Result<()> {
    println!(
        "Counted {} commits, {} rows.",
        style(summary.commit_count).cyan(),
        style(summary.table.len()).cyan()
    );

    let latest = latest_counts(&summary.series);
    if latest.is_empty() {
        println!("No lines of code counted");
    } else {
        let day = summary
            .series
            .iter()
            .filter_map(|s| s.latest())
            .map(|p| p.day)
            .max();
        if let Some(day) = day {
            println!("\n{} {}", style("Lines of code on").bold(), style(day.format("%Y-%m-%d")).dim());
        }
        println!("{:<30} {:>10}", style("Language").bold(), style("Code").bold());
        println!("{}", "─".repeat(41));
        for (language, code) in latest {
            println!("{:<30} {:>10}", language, code);
        }
    }

    println!(
        "\nOutput written to:\n{}\n{}",
        summary.table_path.display(),
        summary.chart_path.display()
    );
    Ok(())
}
