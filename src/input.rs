//! Input file resolution: glob expansion and numeric ordering.

use crate::Result;
use anyhow::{Context, bail};
use std::cmp::Ordering;

/// Resolve the `-i` arguments into the list of log files to load.
///
/// Several arguments are taken verbatim (the shell already expanded them). A
/// single argument is treated as a glob pattern and its matches are sorted the
/// way `sort -n` would sort them, so `run10.yaml` comes after `run2.yaml`.
pub fn resolve_inputs(args: &[String]) -> Result<Vec<String>> {
    match args {
        [] => bail!("no input files given"),
        [pattern] => {
            let mut files = Vec::new();
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern {}", pattern))? {
                let path = entry.with_context(|| format!("cannot read match of {}", pattern))?;
                files.push(path.to_string_lossy().into_owned());
            }
            if files.is_empty() {
                bail!("no input files match {}", pattern);
            }
            files.sort_by(|a, b| natural_cmp(a, b));
            Ok(files)
        }
        many => Ok(many.to_vec()),
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk<'a> {
    Number(u64),
    Text(&'a str),
}

/// Split into alternating text and digit runs.
fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;
    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        match in_digits {
            Some(d) if d != digit => {
                out.push(chunk(&s[start..i], d));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(digit);
    }
    if let Some(d) = in_digits {
        out.push(chunk(&s[start..], d));
    }
    out
}

fn chunk(s: &str, digits: bool) -> Chunk<'_> {
    if digits {
        // Runs too long for u64 fall back to text ordering.
        match s.parse() {
            Ok(n) => Chunk::Number(n),
            Err(_) => Chunk::Text(s),
        }
    } else {
        Chunk::Text(s)
    }
}

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    chunks(a).cmp(&chunks(b)).then_with(|| a.cmp(b))
}
