//! Loading of the YAML timer logs written by the solver's time monitor.

pub mod parse;
pub mod row;

pub use parse::{load_history_file, load_log_file, parse_history_str, parse_log_str};
pub use row::{LogDocument, NonlinearSubstep, StepHistory, StepKey, TimerRecord};
