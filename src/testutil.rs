//! Builders for inline test logs, and capture of emitted warnings.

use crate::log::{LogDocument, parse_log_str};
use ::log::{Level, LevelFilter, Metadata, Record};
use std::cell::RefCell;
use std::sync::Once;

thread_local! {
    static WARNINGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Records warnings per thread, so parallel tests only see their own.
struct CaptureLogger;

impl ::log::Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            WARNINGS.with(|w| w.borrow_mut().push(record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Run `f` and return its result with the warnings it logged on this thread.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    INSTALL.call_once(|| {
        ::log::set_logger(&CAPTURE).expect("no other logger is installed in tests");
        ::log::set_max_level(LevelFilter::Warn);
    });
    WARNINGS.with(|w| w.borrow_mut().clear());
    let out = f();
    let warnings = WARNINGS.with(|w| w.borrow_mut().drain(..).collect());
    (out, warnings)
}

/// YAML text of a timer log where every statistic of a timer equals its time.
pub fn log_text(timers: &[(&str, f64)], processes: Option<u64>) -> String {
    if timers.is_empty() {
        let mut text = String::from("Timer names: []\nTotal times: {}\nCall counts: {}\n");
        if let Some(p) = processes {
            text.push_str(&format!("Number of processes: {}\n", p));
        }
        return text;
    }

    let mut text = String::from("Timer names:\n");
    for (name, _) in timers {
        text.push_str(&format!("  - \"{}\"\n", name));
    }
    for section in ["Total times", "Call counts"] {
        text.push_str(&format!("{}:\n", section));
        for (name, t) in timers {
            text.push_str(&format!(
                "  \"{}\": {{MinOverProcs: {t}, MeanOverProcs: {t}, MaxOverProcs: {t}, MeanOverCallCounts: {t}}}\n",
                name
            ));
        }
    }
    if let Some(p) = processes {
        text.push_str(&format!("Number of processes: {}\n", p));
    }
    text
}

pub fn log_with(timers: &[(&str, f64)]) -> LogDocument {
    parse_log_str(&log_text(timers, None), "test.yaml").unwrap()
}

pub fn log_on(source: &str, processes: u64, timers: &[(&str, f64)]) -> LogDocument {
    parse_log_str(&log_text(timers, Some(processes)), source).unwrap()
}
