//! Nonlinear solver histories: iterations, residuals and solve times of every
//! inner linear solve, laid out in chronological order.

use crate::Result;
use crate::log::{LogDocument, NonlinearSubstep};
use anyhow::{Context, anyhow, bail};
use serde::Serialize;

/// Applications whose logs carry solve times per nonlinear step.
pub const SOLVE_TIME_SCHEMES: [&str; 2] = ["albany", "drekar"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    /// Linear iterations per nonlinear step.
    Iterations,
    /// Relative residual of every linear iteration.
    Residual,
    /// Solve time per nonlinear step.
    SolveTime,
}

impl HistoryKind {
    /// Residual histories hold a sequence per sub-step; the others a single value.
    pub fn is_sequence(&self) -> bool {
        matches!(self, HistoryKind::Residual)
    }

    fn field(&self) -> &'static str {
        match self {
            HistoryKind::Iterations => "its",
            HistoryKind::Residual => "res_hist",
            HistoryKind::SolveTime => "solve_time",
        }
    }

    fn values(&self, sub: &NonlinearSubstep) -> Option<Vec<f64>> {
        match self {
            HistoryKind::Iterations => sub.its.map(|its| vec![its as f64]),
            HistoryKind::Residual => sub.res_hist.clone(),
            HistoryKind::SolveTime => sub.solve_time.map(|t| vec![t]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub substep: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStep {
    pub step: String,
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub kind: HistoryKind,
    pub steps: Vec<HistoryStep>,
}

/// A run of consecutive points drawn in one color.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub color: usize,
    pub points: Vec<(f64, f64)>,
}

impl HistoryView {
    /// All values in chronological order, with the tick label of each point:
    /// its position within the enclosing step (or within the residual history
    /// for residuals).
    pub fn flatten(&self) -> (Vec<f64>, Vec<String>) {
        let mut values = Vec::new();
        let mut ticks = Vec::new();
        for step in &self.steps {
            if self.kind.is_sequence() {
                for entry in &step.entries {
                    for (i, v) in entry.values.iter().enumerate() {
                        values.push(*v);
                        ticks.push(i.to_string());
                    }
                }
            } else {
                for (i, v) in step.entries.iter().flat_map(|e| &e.values).enumerate() {
                    values.push(*v);
                    ticks.push(i.to_string());
                }
            }
        }
        (values, ticks)
    }

    /// Plot segments against the cumulative index. Scalar histories get one
    /// segment per step; residuals one per sub-step, each colored in turn.
    pub fn segments(&self) -> Vec<Segment> {
        let mut out = Vec::new();
        let mut offset = 0usize;
        let mut color = 0usize;

        for step in &self.steps {
            if self.kind.is_sequence() {
                for entry in &step.entries {
                    out.push(Segment {
                        color,
                        points: points_from(offset, &entry.values),
                    });
                    offset += entry.values.len();
                    color += 1;
                }
            } else {
                let values: Vec<f64> = step.entries.iter().flat_map(|e| e.values.clone()).collect();
                out.push(Segment {
                    color,
                    points: points_from(offset, &values),
                });
                offset += values.len();
                color += 1;
            }
        }
        out
    }
}

fn points_from(offset: usize, values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| ((offset + i) as f64, v))
        .collect()
}

/// Flatten the `Steps` section of `doc` for the given history kind.
pub fn nonlinear_history(doc: &LogDocument, kind: HistoryKind) -> Result<HistoryView> {
    if kind == HistoryKind::SolveTime {
        let scheme = doc.scheme.as_deref().unwrap_or("");
        if !SOLVE_TIME_SCHEMES.contains(&scheme) {
            bail!(
                "solve time history is only available for Albany/Drekar logs, {} has scheme {:?}",
                doc.source,
                doc.scheme
            );
        }
    }

    let steps = doc
        .steps
        .as_ref()
        .ok_or_else(|| anyhow!("no Steps section in {}", doc.source))?;

    let mut out = Vec::with_capacity(steps.len());
    for (step, substeps) in steps {
        let entries = substeps
            .iter()
            .map(|(sub, record)| {
                let values = kind.values(record).ok_or_else(|| anyhow!("missing {}", kind.field()))?;
                Ok::<_, anyhow::Error>(HistoryEntry {
                    substep: sub.to_string(),
                    values,
                })
            })
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("step {} in {}", step, doc.source))?;

        out.push(HistoryStep {
            step: step.to_string(),
            entries,
        });
    }

    Ok(HistoryView { kind, steps: out })
}
