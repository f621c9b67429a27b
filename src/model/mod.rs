//! Analyses: turn loaded timer logs into the data each plot needs.

pub mod history;
pub mod levels;
pub mod scaling;
pub mod setup;

pub use history::{HistoryEntry, HistoryKind, HistoryStep, HistoryView};
pub use levels::{LevelTimes, LevelsView};
pub use scaling::ScalingView;
pub use setup::SetupTimersView;

use crate::Result;
use crate::log::{LogDocument, load_history_file, load_log_file};
use crate::select::TimerSelector;
use anyhow::bail;
use clap::ValueEnum;
use log::{debug, warn};
use serde::Serialize;

/// Analysis mode selected with `-a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Analysis {
    #[value(name = "setup_timers")]
    SetupTimers,
    #[value(name = "muelu_strong_scaling")]
    MueluStrongScaling,
    #[value(name = "solve_per_level")]
    SolvePerLevel,
    #[value(name = "nonlinear_history_iterations")]
    NonlinearHistoryIterations,
    #[value(name = "nonlinear_history_residual")]
    NonlinearHistoryResidual,
    #[value(name = "nonlinear_history_solve")]
    NonlinearHistorySolve,
}

impl Analysis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Analysis::SetupTimers => "setup_timers",
            Analysis::MueluStrongScaling => "muelu_strong_scaling",
            Analysis::SolvePerLevel => "solve_per_level",
            Analysis::NonlinearHistoryIterations => "nonlinear_history_iterations",
            Analysis::NonlinearHistoryResidual => "nonlinear_history_residual",
            Analysis::NonlinearHistorySolve => "nonlinear_history_solve",
        }
    }
}

/// Plot style selected with `-s`. Only the strong scaling analysis uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    /// Timers stacked on top of each other.
    #[default]
    Stack,
    /// Same as stack, normalized to percent of the total.
    StackPercent,
    /// Scaling of individual timers relative to the first run.
    Scaling,
}

impl Style {
    /// Parse a style name. An unknown name is not fatal: it is reported and
    /// the default style is used instead.
    pub fn parse_or_default(s: &str) -> Self {
        match <Style as ValueEnum>::from_str(s, false) {
            Ok(style) => style,
            Err(_) => {
                let valid: Vec<String> = Style::value_variants()
                    .iter()
                    .filter_map(|v| v.to_possible_value())
                    .map(|v| v.get_name().to_string())
                    .collect();
                warn!(
                    "style must be one of [{}], got {:?}; using {:?}",
                    valid.join(", "),
                    s,
                    Style::default()
                );
                Style::default()
            }
        }
    }
}

/// Result of one analysis, ready for printing or charting.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum Report {
    SetupTimers(SetupTimersView),
    StrongScaling(ScalingView),
    SolvePerLevel(LevelsView),
    History(HistoryView),
}

/// Load the inputs required by `analysis` and run it.
pub fn run(analysis: Analysis, inputs: &[String], top: usize, style: Style) -> Result<Report> {
    let selector = TimerSelector::setup_levels()?;

    let report = match analysis {
        Analysis::SetupTimers => {
            let docs = load_all(inputs)?;
            Report::SetupTimers(setup::setup_timers(&docs, &selector, top)?)
        }
        Analysis::MueluStrongScaling => {
            let docs = load_all(inputs)?;
            Report::StrongScaling(scaling::strong_scaling(&docs, &selector, top, style)?)
        }
        Analysis::SolvePerLevel => {
            let doc = load_log_file(single_input(analysis, inputs)?)?;
            Report::SolvePerLevel(levels::solve_per_level(&doc))
        }
        Analysis::NonlinearHistoryIterations => {
            history_report(analysis, inputs, HistoryKind::Iterations)?
        }
        Analysis::NonlinearHistoryResidual => {
            history_report(analysis, inputs, HistoryKind::Residual)?
        }
        Analysis::NonlinearHistorySolve => history_report(analysis, inputs, HistoryKind::SolveTime)?,
    };

    Ok(report)
}

fn load_all(inputs: &[String]) -> Result<Vec<LogDocument>> {
    if inputs.is_empty() {
        bail!("no input files given");
    }
    let mut docs = Vec::with_capacity(inputs.len());
    for path in inputs {
        let doc = load_log_file(path)?;
        debug!("loaded {} timers from {}", doc.len(), path);
        docs.push(doc);
    }
    Ok(docs)
}

fn single_input(analysis: Analysis, inputs: &[String]) -> Result<&str> {
    let [input] = inputs else {
        bail!(
            "{} works with a single input file, got {}",
            analysis.as_str(),
            inputs.len()
        );
    };
    Ok(input.as_str())
}

/// The histories only read `Steps` and `scheme`, so the timer table is optional.
fn history_report(analysis: Analysis, inputs: &[String], kind: HistoryKind) -> Result<Report> {
    let doc = load_history_file(single_input(analysis, inputs)?)?;
    Ok(Report::History(history::nonlinear_history(&doc, kind)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::log_text;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn style_names() {
        assert_eq!(Style::parse_or_default("stack"), Style::Stack);
        assert_eq!(Style::parse_or_default("stack-percent"), Style::StackPercent);
        assert_eq!(Style::parse_or_default("scaling"), Style::Scaling);
    }

    #[test]
    fn unknown_style_falls_back_to_stack() {
        assert_eq!(Style::parse_or_default("bars"), Style::Stack);
    }

    #[test]
    fn analysis_names_match_cli_values() {
        for a in Analysis::value_variants() {
            let pv = a.to_possible_value().unwrap();
            assert_eq!(pv.get_name(), a.as_str());
        }
        assert_eq!(
            <Analysis as ValueEnum>::from_str("solve_per_level", false),
            Ok(Analysis::SolvePerLevel)
        );
        assert!(<Analysis as ValueEnum>::from_str("solve-per-level", false).is_err());
    }

    #[test]
    fn single_file_modes_reject_several_inputs() {
        let inputs = vec!["a.yaml".to_string(), "b.yaml".to_string()];
        let err = run(Analysis::SolvePerLevel, &inputs, 10, Style::Stack).unwrap_err();
        assert!(err.to_string().contains("single input file"), "{}", err);
    }

    #[test]
    fn history_runs_on_a_log_without_timers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nl.yaml");
        fs::write(&path, "scheme: drekar\nSteps:\n  s1:\n    a: {its: 3, solve_time: 0.5}\n").unwrap();

        let inputs = vec![path.to_string_lossy().into_owned()];
        let report = run(Analysis::NonlinearHistorySolve, &inputs, 10, Style::Stack).unwrap();
        match report {
            Report::History(view) => assert_eq!(view.flatten().0, vec![0.5]),
            other => panic!("unexpected report {:?}", other),
        }

        // Timer analyses still need the table.
        let err = run(Analysis::SolvePerLevel, &inputs, 10, Style::Stack).unwrap_err();
        assert!(format!("{:#}", err).contains("Timer names"), "{:#}", err);
    }

    #[test]
    fn runs_setup_timers_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.yaml");
        fs::write(
            &path,
            log_text(&[("A (level=0)", 2.0), ("B (level=1)", 1.0)], Some(4)),
        )
        .unwrap();

        let inputs = vec![path.to_string_lossy().into_owned()];
        let report = run(Analysis::SetupTimers, &inputs, 1, Style::Stack).unwrap();
        match report {
            Report::SetupTimers(view) => {
                assert_eq!(view.timers, vec!["A (level=0)"]);
                assert_eq!(view.max_times, vec![vec![2.0]]);
            }
            other => panic!("unexpected report {:?}", other),
        }
    }
}
