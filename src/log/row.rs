use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single timer from the `Total times` / `Call counts` tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerRecord {
    pub name: String,
    pub min_time: f64,
    pub min_count: f64,
    pub mean_time: f64,
    pub mean_count: f64,
    pub max_time: f64,
    pub max_count: f64,
    pub mean_time_per_call: f64,
    pub mean_count_per_call: f64,
}

/// Identifier of a nonlinear step or sub-step as written in the `Steps` section.
///
/// YAML keys may be integers or strings; integers sort numerically and before
/// any string key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepKey {
    Index(i64),
    Name(String),
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKey::Index(i) => write!(f, "{}", i),
            StepKey::Name(s) => f.write_str(s),
        }
    }
}

/// One inner linear solve of a nonlinear step.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NonlinearSubstep {
    #[serde(default)]
    pub its: Option<u64>,

    #[serde(default)]
    pub res_hist: Option<Vec<f64>>,

    #[serde(default)]
    pub solve_time: Option<f64>,
}

/// Step -> (sorted) sub-steps.
pub type StepHistory = BTreeMap<StepKey, BTreeMap<StepKey, NonlinearSubstep>>;

/// A loaded timer log. Built once by the parser and only queried afterwards.
#[derive(Debug, Clone)]
pub struct LogDocument {
    pub source: String,
    pub processes: Option<u64>,
    pub scheme: Option<String>,
    pub steps: Option<StepHistory>,
    timers: Vec<TimerRecord>,
    by_name: BTreeMap<String, usize>,
}

impl LogDocument {
    /// Callers guarantee that timer names are unique.
    pub(crate) fn new(
        source: String,
        timers: Vec<TimerRecord>,
        processes: Option<u64>,
        scheme: Option<String>,
        steps: Option<StepHistory>,
    ) -> Self {
        let by_name = timers
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
        Self {
            source,
            processes,
            scheme,
            steps,
            timers,
            by_name,
        }
    }

    /// Timers in `Timer names` order.
    pub fn timers(&self) -> &[TimerRecord] {
        &self.timers
    }

    pub fn get(&self, name: &str) -> Option<&TimerRecord> {
        self.by_name.get(name).map(|&i| &self.timers[i])
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
