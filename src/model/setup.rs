//! Top setup timers of one run, optionally compared against a second run.

use crate::Result;
use crate::log::LogDocument;
use crate::select::TimerSelector;
use anyhow::{anyhow, bail};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SetupTimersView {
    /// Timer names, ascending by max time in the first run.
    pub timers: Vec<String>,
    /// One entry per run.
    pub sources: Vec<String>,
    /// `max_times[run][timer]`, aligned with `timers`.
    pub max_times: Vec<Vec<f64>>,
}

impl SetupTimersView {
    pub fn is_comparison(&self) -> bool {
        self.sources.len() == 2
    }
}

/// Pick the top timers from the first run and report their max time for each
/// run. The second run, if any, is looked up by timer name.
pub fn setup_timers(
    docs: &[LogDocument],
    selector: &TimerSelector,
    top: usize,
) -> Result<SetupTimersView> {
    let Some(first) = docs.first() else {
        bail!("setup_timers needs at least one input file");
    };
    if docs.len() > 2 {
        bail!("setup_timers compares at most 2 input files, got {}", docs.len());
    }

    let timers: Vec<String> = selector
        .select(first, top)
        .into_iter()
        .map(|t| t.name.clone())
        .collect();

    let mut max_times = Vec::with_capacity(docs.len());
    for doc in docs {
        let column = timers
            .iter()
            .map(|name| {
                doc.get(name)
                    .map(|t| t.max_time)
                    .ok_or_else(|| anyhow!("timer {:?} not found in {}", name, doc.source))
            })
            .collect::<Result<Vec<f64>>>()?;
        max_times.push(column);
    }

    Ok(SetupTimersView {
        timers,
        sources: docs.iter().map(|d| d.source.clone()).collect(),
        max_times,
    })
}
