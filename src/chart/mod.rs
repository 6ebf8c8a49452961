//! Static SVG line chart of per-language code counts over time.
//!
//! One polyline per language, a legend to the right of the plot area,
//! "Date" / "Lines of Code" axis labels and light dashed horizontal
//! gridlines at every y tick.

mod scale;

pub use scale::{x_ticks, y_ticks, Frame};

use crate::error::Result;
use crate::model::LanguageSeries;
use crate::util::write_atomic;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

pub const DEFAULT_WIDTH: u32 = 1400;
pub const DEFAULT_HEIGHT: u32 = 700;

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 220.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 70.0;
const Y_TICK_TARGET: usize = 6;
const X_TICK_TARGET: usize = 8;

/// Line colors, cycled when there are more languages than entries.
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn render_svg(series: &[LanguageSeries], options: &ChartOptions) -> String {
    let width = f64::from(options.width);
    let height = f64::from(options.height);

    let days: Vec<NaiveDate> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.day))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let max_code = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.code))
        .max()
        .unwrap_or(0);
    let y_ticks = y_ticks(max_code, Y_TICK_TARGET);

    let frame = Frame {
        left: MARGIN_LEFT,
        top: MARGIN_TOP,
        width: (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
        height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        first_day: days.first().copied(),
        span_days: match (days.first(), days.last()) {
            (Some(first), Some(last)) => last.signed_duration_since(*first).num_days(),
            _ => 0,
        },
        y_max: y_ticks.last().copied().unwrap_or(1),
    };

    let mut svg = String::new();
    // Writing into a String cannot fail, so the fmt results are ignored.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
        w = options.width,
        h = options.height
    );
    svg.push_str("<title>Lines of code over time</title>\n");
    let _ = writeln!(svg, r#"<rect width="{width}" height="{height}" fill="white"/>"#);

    write_grid(&mut svg, &frame, &y_ticks);
    write_axes(&mut svg, &frame, &days);

    for (index, s) in series.iter().enumerate() {
        write_series(&mut svg, &frame, s, color_for(index));
    }
    write_legend(&mut svg, &frame, series);

    svg.push_str("</svg>\n");
    svg
}

fn write_grid(svg: &mut String, frame: &Frame, ticks: &[u64]) {
    for &tick in ticks {
        let y = frame.y(tick);
        let _ = writeln!(
            svg,
            r##"<line class="grid" x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#b0b0b0" stroke-dasharray="4 4" stroke-opacity="0.5"/>"##,
            frame.left,
            frame.right()
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{tick}</text>"#,
            frame.left - 8.0,
            y + 4.0
        );
    }
}

fn write_axes(svg: &mut String, frame: &Frame, days: &[NaiveDate]) {
    let bottom = frame.bottom();
    let _ = writeln!(
        svg,
        r#"<line class="axis" x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="black"/>"#,
        l = frame.left,
        t = frame.top,
        b = bottom
    );
    let _ = writeln!(
        svg,
        r#"<line class="axis" x1="{:.1}" y1="{b:.1}" x2="{:.1}" y2="{b:.1}" stroke="black"/>"#,
        frame.left,
        frame.right(),
        b = bottom
    );

    for day in x_ticks(days, X_TICK_TARGET) {
        let x = frame.x(day);
        let _ = writeln!(
            svg,
            r#"<line x1="{x:.1}" y1="{b:.1}" x2="{x:.1}" y2="{:.1}" stroke="black"/>"#,
            bottom + 5.0,
            b = bottom
        );
        let _ = writeln!(
            svg,
            r#"<text x="{x:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            bottom + 20.0,
            day.format("%Y-%m-%d")
        );
    }

    let _ = writeln!(
        svg,
        r#"<text class="axis-label" x="{:.1}" y="{:.1}" text-anchor="middle">Date</text>"#,
        frame.left + frame.width / 2.0,
        bottom + 50.0
    );
    let cy = frame.top + frame.height / 2.0;
    let _ = writeln!(
        svg,
        r#"<text class="axis-label" x="25" y="{cy:.1}" text-anchor="middle" transform="rotate(-90 25 {cy:.1})">Lines of Code</text>"#
    );
}

fn write_series(svg: &mut String, frame: &Frame, series: &LanguageSeries, color: &str) {
    let points: Vec<String> = series
        .points
        .iter()
        .map(|p| format!("{:.1},{:.1}", frame.x(p.day), frame.y(p.code)))
        .collect();
    let language = escape_xml(&series.language);

    let _ = writeln!(
        svg,
        r#"<polyline class="series" data-language="{language}" fill="none" stroke="{color}" stroke-width="1.5" points="{}"/>"#,
        points.join(" ")
    );
    // A lone point has no line segment to show.
    if let [only] = series.points.as_slice() {
        let _ = writeln!(
            svg,
            r#"<circle class="marker" cx="{:.1}" cy="{:.1}" r="3" fill="{color}"/>"#,
            frame.x(only.day),
            frame.y(only.code)
        );
    }
}

fn write_legend(svg: &mut String, frame: &Frame, series: &[LanguageSeries]) {
    if series.is_empty() {
        return;
    }
    let x = frame.right() + 20.0;
    let _ = writeln!(svg, r#"<g class="legend">"#);
    for (index, s) in series.iter().enumerate() {
        let y = frame.top + 10.0 + index as f64 * 18.0;
        let _ = writeln!(
            svg,
            r#"<line x1="{x:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{}" stroke-width="2"/>"#,
            x + 24.0,
            color_for(index)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}">{}</text>"#,
            x + 30.0,
            y + 4.0,
            escape_xml(&s.language)
        );
    }
    svg.push_str("</g>\n");
}

pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn save(series: &[LanguageSeries], options: &ChartOptions, path: &Path) -> Result<()> {
    write_atomic(path, render_svg(series, options).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SeriesPoint;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn series(language: &str, points: &[(&str, u64)]) -> LanguageSeries {
        LanguageSeries {
            language: language.to_string(),
            points: points
                .iter()
                .map(|&(d, code)| SeriesPoint { day: day(d), code })
                .collect(),
        }
    }

    fn polyline_points(svg: &str) -> Vec<&str> {
        svg.lines()
            .filter(|l| l.starts_with("<polyline"))
            .filter_map(|l| l.split("points=\"").nth(1))
            .filter_map(|rest| rest.split('"').next())
            .collect()
    }

    #[test]
    fn single_point_series() {
        let svg = render_svg(&[series("X", &[("2024-01-01", 10)])], &ChartOptions::default());

        let points = polyline_points(&svg);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].split(' ').count(), 1);
        assert_eq!(svg.matches(r#"class="marker""#).count(), 1);
        assert!(svg.contains(r#"data-language="X""#));
    }

    #[test]
    fn empty_chart_has_axes_but_no_series() {
        let svg = render_svg(&[], &ChartOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(polyline_points(&svg).is_empty());
        assert!(!svg.contains(r#"class="legend""#));
        assert!(svg.contains(">Date</text>"));
        assert!(svg.contains(">Lines of Code</text>"));
    }

    #[test]
    fn one_polyline_and_legend_entry_per_language() {
        let data = [
            series("Python", &[("2024-01-01", 0), ("2024-01-03", 40)]),
            series("Rust", &[("2024-01-01", 100), ("2024-01-03", 250)]),
        ];
        let svg = render_svg(&data, &ChartOptions::default());

        let points = polyline_points(&svg);
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.split(' ').count() == 2));
        assert_eq!(svg.matches(r#"class="marker""#).count(), 0);
        assert!(svg.contains(&format!(r#"stroke="{}""#, color_for(1))));
        assert!(svg.contains(">Python</text>"));
        assert!(svg.contains(">Rust</text>"));
    }

    #[test]
    fn points_run_left_to_right_in_time_order() {
        let data = [series("Rust", &[("2024-01-01", 1), ("2024-01-02", 2), ("2024-01-05", 3)])];
        let svg = render_svg(&data, &ChartOptions::default());

        let xs: Vec<f64> = polyline_points(&svg)[0]
            .split(' ')
            .map(|p| p.split(',').next().unwrap().parse().unwrap())
            .collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]), "{xs:?}");
    }

    #[test]
    fn gridlines_are_dashed_and_light() {
        let svg = render_svg(&[series("X", &[("2024-01-01", 10)])], &ChartOptions::default());
        let grid: Vec<&str> = svg.lines().filter(|l| l.contains(r#"class="grid""#)).collect();
        assert_eq!(grid.len(), y_ticks(10, Y_TICK_TARGET).len());
        assert!(grid.iter().all(|l| l.contains("stroke-dasharray")));
    }

    #[test]
    fn language_names_are_escaped() {
        let svg = render_svg(&[series("C & <C++>", &[("2024-01-01", 1)])], &ChartOptions::default());
        assert!(svg.contains("C &amp; &lt;C++&gt;"));
        assert!(!svg.contains("C & <C++>"));
    }

    #[test]
    fn size_follows_options() {
        let svg = render_svg(&[], &ChartOptions { width: 800, height: 400 });
        assert!(svg.contains(r#"viewBox="0 0 800 400""#));
    }
}
