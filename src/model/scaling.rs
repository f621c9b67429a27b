//! Strong scaling of the setup timers across runs on increasing process counts.

use crate::Result;
use crate::log::LogDocument;
use crate::model::Style;
use crate::select::TimerSelector;
use anyhow::{anyhow, bail};
use log::warn;
use serde::Serialize;

/// Timer holding the whole hierarchy setup; the "Other" bucket is measured against it.
pub const TOTAL_SETUP_TIMER: &str = "MueLu: Hierarchy: Setup (total)";

pub const OTHER_LABEL: &str = "Other";

#[derive(Debug, Clone, Serialize)]
pub struct ScalingView {
    pub style: Style,
    /// Process count of each run (x axis).
    pub processes: Vec<f64>,
    /// Series labels: top timers, largest first, then "Other" for stack styles.
    pub labels: Vec<String>,
    /// `times[series][run]`, absolute max times in seconds.
    pub times: Vec<Vec<f64>>,
    /// `values[series][run]` in the units of `style`: seconds, percent of the
    /// run total, or speedup relative to the first run.
    pub values: Vec<Vec<f64>>,
    /// Total setup time of each run.
    pub totals: Vec<f64>,
    /// Line width per series; only set for the scaling style.
    pub line_widths: Vec<u32>,
}

impl ScalingView {
    /// Ideal speedup at the last run, relative to the first one.
    pub fn ideal_speedup(&self) -> f64 {
        match (self.processes.first(), self.processes.last()) {
            (Some(&p0), Some(&pn)) if p0 > 0.0 => pn / p0,
            _ => 1.0,
        }
    }
}

/// Runs are expected in order of increasing process count; the top timers are
/// selected in the first run.
pub fn strong_scaling(
    docs: &[LogDocument],
    selector: &TimerSelector,
    top: usize,
    style: Style,
) -> Result<ScalingView> {
    let Some(first) = docs.first() else {
        bail!("muelu_strong_scaling needs at least one input file");
    };

    let show_rest = matches!(style, Style::Stack | Style::StackPercent);

    // Largest first.
    let timers: Vec<String> = selector
        .select(first, top)
        .into_iter()
        .rev()
        .map(|t| t.name.clone())
        .collect();

    let nseries = timers.len() + usize::from(show_rest);
    let mut times = vec![Vec::with_capacity(docs.len()); nseries];
    let mut processes = Vec::with_capacity(docs.len());
    let mut totals = Vec::with_capacity(docs.len());

    for doc in docs {
        let total = doc
            .get(TOTAL_SETUP_TIMER)
            .ok_or_else(|| anyhow!("timer {:?} not found in {}", TOTAL_SETUP_TIMER, doc.source))?
            .max_time;
        let procs = doc
            .processes
            .ok_or_else(|| anyhow!("\"Number of processes\" missing in {}", doc.source))?;

        let mut sum = 0.0;
        for (k, name) in timers.iter().enumerate() {
            let t = doc
                .get(name)
                .ok_or_else(|| anyhow!("timer {:?} not found in {}", name, doc.source))?
                .max_time;
            times[k].push(t);
            sum += t;
        }

        if show_rest {
            let rest = total - sum;
            if rest < 0.0 {
                warn!(
                    "top timers in {} add up to {} s, more than the total setup time {} s",
                    doc.source, sum, total
                );
            }
            times[nseries - 1].push(rest);
        }

        processes.push(procs as f64);
        totals.push(total);
    }

    let mut labels = timers;
    if show_rest {
        labels.push(OTHER_LABEL.to_string());
    }

    let values = match style {
        Style::Stack => times.clone(),
        Style::StackPercent => percent_of_column(&times),
        Style::Scaling => speedups(&times),
    };
    let line_widths = match style {
        Style::Scaling => line_widths(&times),
        _ => Vec::new(),
    };

    Ok(ScalingView {
        style,
        processes,
        labels,
        times,
        values,
        totals,
        line_widths,
    })
}

/// Normalize each run (column) to percent of its sum.
fn percent_of_column(times: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let nruns = times.first().map_or(0, Vec::len);
    let sums: Vec<f64> = (0..nruns)
        .map(|j| times.iter().map(|row| row[j]).sum())
        .collect();

    times
        .iter()
        .map(|row| {
            row.iter()
                .zip(&sums)
                .map(|(&t, &s)| if s != 0.0 { 100.0 * t / s } else { 0.0 })
                .collect()
        })
        .collect()
}

/// Speedup of every run over the first one, per series.
fn speedups(times: &[Vec<f64>]) -> Vec<Vec<f64>> {
    times
        .iter()
        .map(|row| {
            let base = row.first().copied().unwrap_or(0.0);
            row.iter().map(|&t| base / t).collect()
        })
        .collect()
}

/// Thicker lines for the more expensive timers: the largest timer gets 8, a
/// timer k times cheaper gets `9 - ceil(k)`, never less than 1.
fn line_widths(times: &[Vec<f64>]) -> Vec<u32> {
    let Some(largest) = times.first().and_then(|row| row.first()).copied() else {
        return Vec::new();
    };
    times
        .iter()
        .map(|row| {
            let ratio = (largest / row[0]).ceil();
            // NaN (0/0) picks 8 here.
            (9.0 - ratio.min(8.0)).max(1.0) as u32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::log_on;
    use pretty_assertions::assert_eq;

    fn runs() -> Vec<LogDocument> {
        vec![
            log_on(
                "np4.yaml",
                4,
                &[
                    (TOTAL_SETUP_TIMER, 10.0),
                    ("A (level=0)", 4.0),
                    ("B (level=1)", 2.0),
                    ("C (level=1)", 1.0),
                    ("Solve (level=0)", 50.0),
                ],
            ),
            log_on(
                "np16.yaml",
                16,
                &[
                    (TOTAL_SETUP_TIMER, 5.0),
                    ("A (level=0)", 1.0),
                    ("B (level=1)", 1.0),
                    ("C (level=1)", 0.5),
                    ("Solve (level=0)", 20.0),
                ],
            ),
        ]
    }

    fn selector() -> TimerSelector {
        TimerSelector::setup_levels().unwrap()
    }

    #[test]
    fn stack_adds_remainder_bucket() {
        let view = strong_scaling(&runs(), &selector(), 2, Style::Stack).unwrap();
        assert_eq!(view.processes, vec![4.0, 16.0]);
        assert_eq!(view.labels, vec!["A (level=0)", "B (level=1)", "Other"]);
        assert_eq!(
            view.times,
            vec![vec![4.0, 1.0], vec![2.0, 1.0], vec![4.0, 3.0]]
        );
        assert_eq!(view.values, view.times);
        assert_eq!(view.totals, vec![10.0, 5.0]);
        assert!(view.line_widths.is_empty());

        for (j, total) in view.totals.iter().enumerate() {
            let top_sum: f64 = view.times[..2].iter().map(|row| row[j]).sum();
            assert_eq!(view.times[2][j], total - top_sum);
            assert!(view.times[2][j] >= 0.0);
        }
    }

    #[test]
    fn stack_percent_normalizes_each_run() {
        let view = strong_scaling(&runs(), &selector(), 2, Style::StackPercent).unwrap();
        assert_eq!(
            view.values,
            vec![vec![40.0, 20.0], vec![20.0, 20.0], vec![40.0, 60.0]]
        );
    }

    #[test]
    fn scaling_reports_speedups_without_remainder() {
        let view = strong_scaling(&runs(), &selector(), 3, Style::Scaling).unwrap();
        assert_eq!(view.labels, vec!["A (level=0)", "B (level=1)", "C (level=1)"]);
        assert_eq!(
            view.values,
            vec![vec![1.0, 4.0], vec![1.0, 2.0], vec![1.0, 2.0]]
        );
        // 4/4 -> 8, 4/2 -> 7, 4/1 -> 5
        assert_eq!(view.line_widths, vec![8, 7, 5]);
        assert_eq!(view.ideal_speedup(), 4.0);
    }

    #[test]
    fn missing_process_count_is_an_error() {
        let mut docs = runs();
        docs.push(crate::testutil::log_with(&[(TOTAL_SETUP_TIMER, 1.0)]));
        let err = strong_scaling(&docs, &selector(), 1, Style::Stack).unwrap_err();
        assert!(err.to_string().contains("Number of processes"), "{}", err);
    }

    #[test]
    fn missing_total_setup_is_an_error() {
        let docs = vec![log_on("np4.yaml", 4, &[("A (level=0)", 1.0)])];
        let err = strong_scaling(&docs, &selector(), 1, Style::Stack).unwrap_err();
        assert!(err.to_string().contains(TOTAL_SETUP_TIMER), "{}", err);
    }
}
