//! Plain text output for `-d print`.

use crate::Result;
use crate::model::{HistoryView, LevelsView, Report, ScalingView, SetupTimersView, Style};
use std::io::Write;

pub fn write_report<W: Write>(report: &Report, out: &mut W) -> Result<()> {
    match report {
        Report::SetupTimers(v) => write_setup_timers(v, out),
        Report::StrongScaling(v) => write_scaling(v, out),
        Report::SolvePerLevel(v) => write_levels(v, out),
        Report::History(v) => write_history(v, out),
    }
}

fn write_setup_timers<W: Write>(v: &SetupTimersView, out: &mut W) -> Result<()> {
    let width = v.timers.iter().map(|t| t.len()).max().unwrap_or(0);

    write!(out, "{:<width$}", "timer", width = width)?;
    for source in &v.sources {
        write!(out, "  {}", source)?;
    }
    writeln!(out)?;

    for (k, name) in v.timers.iter().enumerate() {
        write!(out, "{:<width$}", name, width = width)?;
        for column in &v.max_times {
            write!(out, "  {:.5}", column[k])?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_scaling<W: Write>(v: &ScalingView, out: &mut W) -> Result<()> {
    let width = v.labels.iter().map(|l| l.len()).max().unwrap_or(0).max(9);
    let unit = match v.style {
        Style::Stack => "time (s)",
        Style::StackPercent => "percent of total",
        Style::Scaling => "speedup",
    };
    writeln!(out, "# {}", unit)?;

    write!(out, "{:<width$}", "processes", width = width)?;
    for p in &v.processes {
        write!(out, "  {:>10}", p)?;
    }
    writeln!(out)?;

    for (label, row) in v.labels.iter().zip(&v.values) {
        write!(out, "{:<width$}", label, width = width)?;
        for x in row {
            write!(out, "  {:>10.5}", x)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_levels<W: Write>(v: &LevelsView, out: &mut W) -> Result<()> {
    for level in &v.levels {
        writeln!(out, "Level  {}", level.level)?;
        for (op, t) in v.categories.iter().zip(&level.times) {
            writeln!(out, "  {:<20} : {:.5}", op, t)?;
        }
    }
    Ok(())
}

fn write_history<W: Write>(v: &HistoryView, out: &mut W) -> Result<()> {
    for step in &v.steps {
        if v.kind.is_sequence() {
            writeln!(out, "{}", step.step)?;
            for entry in &step.entries {
                writeln!(out, "{} : {}", entry.substep, list(&entry.values))?;
            }
        } else {
            let values: Vec<f64> = step.entries.iter().flat_map(|e| e.values.clone()).collect();
            writeln!(out, "{} : {}", step.step, list(&values))?;
        }
    }
    Ok(())
}

fn list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoryEntry, HistoryKind, HistoryStep, LevelTimes};
    use pretty_assertions::assert_eq;

    fn render(report: &Report) -> String {
        let mut buf = Vec::new();
        write_report(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn setup_timers_comparison() {
        let report = Report::SetupTimers(SetupTimersView {
            timers: vec!["B (level=1)".into(), "A (level=0)".into()],
            sources: vec!["a.yaml".into(), "b.yaml".into()],
            max_times: vec![vec![1.0, 2.0], vec![0.5, 1.25]],
        });
        assert_eq!(
            render(&report),
            "timer        a.yaml  b.yaml\n\
             B (level=1)  1.00000  0.50000\n\
             A (level=0)  2.00000  1.25000\n"
        );
    }

    #[test]
    fn levels() {
        let report = Report::SolvePerLevel(LevelsView {
            categories: vec!["smoothing".into(), "coarse".into()],
            levels: vec![LevelTimes {
                level: 0,
                times: vec![1.5, 0.0],
            }],
        });
        assert_eq!(
            render(&report),
            "Level  0\n  smoothing            : 1.50000\n  coarse               : 0.00000\n"
        );
    }

    fn history(kind: HistoryKind) -> Report {
        Report::History(HistoryView {
            kind,
            steps: vec![HistoryStep {
                step: "s1".into(),
                entries: vec![
                    HistoryEntry {
                        substep: "a".into(),
                        values: vec![1.0, 0.5],
                    },
                    HistoryEntry {
                        substep: "b".into(),
                        values: vec![0.25],
                    },
                ],
            }],
        })
    }

    #[test]
    fn scalar_history_is_one_line_per_step() {
        assert_eq!(render(&history(HistoryKind::Iterations)), "s1 : [1, 0.5, 0.25]\n");
    }

    #[test]
    fn residual_history_lists_substeps() {
        assert_eq!(
            render(&history(HistoryKind::Residual)),
            "s1\na : [1, 0.5]\nb : [0.25]\n"
        );
    }
}
