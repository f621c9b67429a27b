//! Solve-phase timers broken down per multigrid level.

use crate::log::LogDocument;
use serde::Serialize;

/// Solve categories, in stacking order.
pub const SOLVE_CATEGORIES: [&str; 5] = [
    "smoothing",
    "residual calculation",
    "restriction",
    "prolongation",
    "coarse",
];

/// Levels 0..MAX_LEVELS are inspected.
pub const MAX_LEVELS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelTimes {
    pub level: usize,
    /// Max time per category, aligned with `SOLVE_CATEGORIES`; 0 when absent.
    pub times: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelsView {
    pub categories: Vec<String>,
    pub levels: Vec<LevelTimes>,
}

pub fn solve_timer_name(category: &str, level: usize) -> String {
    format!("MueLu: Hierarchy: Solve : {} (level={})", category, level)
}

/// Collect solve times per level, starting at level 0 and stopping at the
/// first level with no solve timer at all.
pub fn solve_per_level(doc: &LogDocument) -> LevelsView {
    let mut levels = Vec::new();
    for level in 0..MAX_LEVELS {
        let found: Vec<Option<f64>> = SOLVE_CATEGORIES
            .iter()
            .map(|op| doc.get(&solve_timer_name(op, level)).map(|t| t.max_time))
            .collect();

        if found.iter().all(Option::is_none) {
            break;
        }

        levels.push(LevelTimes {
            level,
            times: found.into_iter().map(|t| t.unwrap_or(0.0)).collect(),
        });
    }

    LevelsView {
        categories: SOLVE_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        levels,
    }
}
