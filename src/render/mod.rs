//! Output of analysis reports: plain text, SVG charts, and HTML pages.

pub mod chart;
pub mod html;
pub mod text;

pub use chart::render_svg;
pub use html::render_html_report;
pub use text::write_report;

use crate::Result;
use crate::model::{Analysis, Report};
use anyhow::{Context, bail};
use clap::ValueEnum;
use plotters::style::RGBColor;
use std::fs;
use std::path::{Path, PathBuf};

/// Output mode selected with `-d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DisplayMode {
    /// Print the numbers as text.
    Print,
    /// Draw a chart.
    Display,
}

/// The "tableau20" palette, used for every chart.
pub const PALETTE: [RGBColor; 20] = [
    RGBColor(31, 119, 180),
    RGBColor(174, 199, 232),
    RGBColor(255, 127, 14),
    RGBColor(255, 187, 120),
    RGBColor(44, 160, 44),
    RGBColor(152, 223, 138),
    RGBColor(214, 39, 40),
    RGBColor(255, 152, 150),
    RGBColor(148, 103, 189),
    RGBColor(197, 176, 213),
    RGBColor(140, 86, 75),
    RGBColor(196, 156, 148),
    RGBColor(227, 119, 194),
    RGBColor(247, 182, 210),
    RGBColor(127, 127, 127),
    RGBColor(199, 199, 199),
    RGBColor(188, 189, 34),
    RGBColor(219, 219, 141),
    RGBColor(23, 190, 207),
    RGBColor(158, 218, 229),
];

pub fn palette(i: usize) -> RGBColor {
    PALETTE[i % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Html,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("svg") => Ok(OutputFormat::Svg),
            Some("html") | Some("htm") => Ok(OutputFormat::Html),
            _ => bail!(
                "unsupported output file {}: use a .svg or .html extension",
                path.display()
            ),
        }
    }
}

/// Where a chart goes when no output file is given: an HTML page named after
/// the analysis, in the working directory.
pub fn default_output(analysis: Analysis) -> PathBuf {
    PathBuf::from(format!("{}.html", analysis.as_str()))
}

/// Draw `report` and write it to `path`, as SVG or as an HTML page depending
/// on the extension.
pub fn write_chart(report: &Report, title: &str, path: &Path, size: (u32, u32)) -> Result<()> {
    let format = OutputFormat::from_path(path)?;
    let svg = render_svg(report, size).context("drawing chart")?;
    let contents = match format {
        OutputFormat::Svg => svg,
        OutputFormat::Html => render_html_report(report, title, &svg)?,
    };
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoryKind, history::nonlinear_history};
    use crate::log::parse_log_str;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/plot.SVG")).unwrap(),
            OutputFormat::Svg
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("plot.html")).unwrap(),
            OutputFormat::Html
        );
        assert!(OutputFormat::from_path(Path::new("plot.png")).is_err());
        assert!(OutputFormat::from_path(Path::new("plot")).is_err());
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(palette(0), palette(20));
        assert_eq!(palette(3), RGBColor(255, 187, 120));
    }

    #[test]
    fn default_output_is_named_after_analysis() {
        assert_eq!(
            default_output(Analysis::SolvePerLevel),
            PathBuf::from("solve_per_level.html")
        );
    }

    #[test]
    fn writes_svg_and_html() {
        let doc = parse_log_str(
            "Timer names: []\nTotal times: {}\nCall counts: {}\nSteps:\n  0:\n    0: {its: 4}\n    1: {its: 6}\n",
            "nl.yaml",
        )
        .unwrap();
        let report = Report::History(nonlinear_history(&doc, HistoryKind::Iterations).unwrap());
        let dir = tempfile::tempdir().unwrap();

        let svg = dir.path().join("its.svg");
        write_chart(&report, "its", &svg, (640, 480)).unwrap();
        assert!(fs::read_to_string(&svg).unwrap().contains("<svg"));

        let html = dir.path().join("its.html");
        write_chart(&report, "its", &html, (640, 480)).unwrap();
        let page = fs::read_to_string(&html).unwrap();
        assert!(page.starts_with("<!doctype html>"));
        assert!(page.contains("<svg"));
        assert!(page.contains("\"analysis\":\"history\""));
    }
}
