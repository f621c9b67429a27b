//! Selection of the setup timers worth plotting.

use crate::Result;
use crate::log::{LogDocument, TimerRecord};
use log::{debug, warn};
use regex::Regex;

/// Picks level-qualified setup timers and keeps the most expensive ones.
#[derive(Debug, Clone)]
pub struct TimerSelector {
    include: Regex,
    exclude: Regex,
}

impl TimerSelector {
    /// Level-specific timers (`... (level=N)`), excluding solve-phase timers.
    pub fn setup_levels() -> Result<Self> {
        Ok(Self {
            include: Regex::new(r"\(level=")?,
            exclude: Regex::new("Solve")?,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.include.is_match(name) && !self.exclude.is_match(name)
    }

    /// Return the `top` matching timers with the largest max time, in ascending
    /// order of max time. Asking for more timers than exist logs a warning and
    /// returns all of them.
    pub fn select<'a>(&self, doc: &'a LogDocument, top: usize) -> Vec<&'a TimerRecord> {
        let mut timers: Vec<&TimerRecord> =
            doc.timers().iter().filter(|t| self.matches(&t.name)).collect();

        timers.sort_by(|a, b| {
            a.max_time
                .partial_cmp(&b.max_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if top > timers.len() {
            warn!("there are only {} timers to plot", timers.len());
        }
        let top = top.min(timers.len());
        let selected = timers.split_off(timers.len() - top);

        debug!(
            "selected {} of {} timers from {}",
            selected.len(),
            doc.len(),
            doc.source
        );
        selected
    }
}
