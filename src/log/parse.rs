use crate::Result;
use crate::log::row::{LogDocument, NonlinearSubstep, StepHistory, StepKey, TimerRecord};
use anyhow::{Context, anyhow, bail};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

/// Bookkeeping entry inside a step; not a sub-step.
const NL_ITS_KEY: &str = "nl_its";

const TIMER_NAMES_KEY: &str = "Timer names";
const TOTAL_TIMES_KEY: &str = "Total times";
const CALL_COUNTS_KEY: &str = "Call counts";

/// Raw document shape. Only the keys used by the analyses are declared;
/// anything else in the log is ignored. The timer table keys are checked
/// after deserialization, since history logs may omit them.
#[derive(Debug, Deserialize)]
struct RawLog {
    #[serde(rename = "Timer names", default)]
    timer_names: Option<Vec<String>>,

    #[serde(rename = "Total times", default)]
    total_times: Option<BTreeMap<String, RawStats>>,

    #[serde(rename = "Call counts", default)]
    call_counts: Option<BTreeMap<String, RawStats>>,

    #[serde(rename = "Number of processes", default)]
    processes: Option<u64>,

    #[serde(default)]
    scheme: Option<String>,

    #[serde(rename = "Steps", default)]
    steps: Option<Mapping>,
}

/// Per-timer statistics as written by the Teuchos time monitor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawStats {
    min_over_procs: f64,
    mean_over_procs: f64,
    max_over_procs: f64,
    mean_over_call_counts: f64,
}

/// Whether a log must carry the timer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerTable {
    Required,
    Optional,
}

/// Load a YAML timer log from disk.
pub fn load_log_file(path: &str) -> Result<LogDocument> {
    parse_log_str(&read_log(path)?, path)
}

/// Load a log for the nonlinear history analyses, which only need `Steps`
/// and `scheme`. A timer table, if present, is still parsed and checked.
pub fn load_history_file(path: &str) -> Result<LogDocument> {
    parse_history_str(&read_log(path)?, path)
}

fn read_log(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read log file {}", path))
}

/// Parse a YAML timer log. `source` names the log in error messages and legends.
///
/// Expected layout:
///
/// ```yaml
/// Timer names: ["MueLu: Hierarchy: Setup (total)", ...]
/// Total times:
///   "MueLu: Hierarchy: Setup (total)": {MinOverProcs: 1.2, MeanOverProcs: 1.3, MaxOverProcs: 1.4, MeanOverCallCounts: 1.3}
/// Call counts:
///   "MueLu: Hierarchy: Setup (total)": {MinOverProcs: 1, MeanOverProcs: 1, MaxOverProcs: 1, MeanOverCallCounts: 1}
/// Number of processes: 64
/// ```
pub fn parse_log_str(text: &str, source: &str) -> Result<LogDocument> {
    parse_document(text, source, TimerTable::Required)
}

/// Like [`parse_log_str`], but the timer table keys may be absent.
pub fn parse_history_str(text: &str, source: &str) -> Result<LogDocument> {
    parse_document(text, source, TimerTable::Optional)
}

fn parse_document(text: &str, source: &str, table: TimerTable) -> Result<LogDocument> {
    let raw: RawLog =
        serde_yaml::from_str(text).with_context(|| format!("log parse error in {}", source))?;

    let timers = match (raw.timer_names, raw.total_times, raw.call_counts) {
        (Some(names), Some(totals), Some(counts)) => timer_table(&names, &totals, &counts, source)?,
        (names, totals, _) if table == TimerTable::Required => {
            let key = if names.is_none() {
                TIMER_NAMES_KEY
            } else if totals.is_none() {
                TOTAL_TIMES_KEY
            } else {
                CALL_COUNTS_KEY
            };
            bail!("log parse error in {}: missing field `{}`", source, key);
        }
        _ => Vec::new(),
    };

    let steps = match raw.steps {
        Some(m) => Some(parse_steps(m).with_context(|| format!("bad Steps section in {}", source))?),
        None => None,
    };

    Ok(LogDocument::new(
        source.to_string(),
        timers,
        raw.processes,
        raw.scheme,
        steps,
    ))
}

fn timer_table(
    names: &[String],
    totals: &BTreeMap<String, RawStats>,
    counts: &BTreeMap<String, RawStats>,
    source: &str,
) -> Result<Vec<TimerRecord>> {
    let mut seen = BTreeSet::new();
    let mut timers = Vec::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            bail!("duplicate timer name in {}: {:?}", source, name);
        }

        let t = totals
            .get(name)
            .ok_or_else(|| anyhow!("log parse error in {}: no total times for {:?}", source, name))?;
        let c = counts
            .get(name)
            .ok_or_else(|| anyhow!("log parse error in {}: no call counts for {:?}", source, name))?;

        timers.push(TimerRecord {
            name: name.clone(),
            min_time: t.min_over_procs,
            min_count: c.min_over_procs,
            mean_time: t.mean_over_procs,
            mean_count: c.mean_over_procs,
            max_time: t.max_over_procs,
            max_count: c.max_over_procs,
            mean_time_per_call: t.mean_over_call_counts,
            mean_count_per_call: c.mean_over_call_counts,
        });
    }
    Ok(timers)
}

fn parse_steps(steps: Mapping) -> Result<StepHistory> {
    let mut out = StepHistory::new();
    for (key, value) in steps {
        let step = parse_step_key(&key)?;
        let Value::Mapping(substeps) = value else {
            bail!("step {} is not a mapping", step);
        };

        let mut entries = BTreeMap::new();
        for (sub_key, sub_value) in substeps {
            let sub = parse_step_key(&sub_key)?;
            if matches!(&sub, StepKey::Name(n) if n == NL_ITS_KEY) {
                continue;
            }
            let record: NonlinearSubstep = serde_yaml::from_value(sub_value)
                .with_context(|| format!("bad sub-step {} of step {}", sub, step))?;
            entries.insert(sub, record);
        }
        out.insert(step, entries);
    }
    Ok(out)
}

fn parse_step_key(v: &Value) -> Result<StepKey> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .map(StepKey::Index)
            .ok_or_else(|| anyhow!("step key {} is not an integer", n)),
        Value::String(s) => Ok(StepKey::Name(s.clone())),
        other => bail!("unsupported step key {:?}", other),
    }
}
