use clap::Parser;
use std::path::PathBuf;

mod input;
mod log;
mod logging;
mod model;
mod render;
mod select;
#[cfg(test)]
mod testutil;

use model::{Analysis, Style};
use render::DisplayMode;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "muelu-timers")]
#[command(about = "Analysis and plots of MueLu timer logs", long_about = None)]
struct Cli {
    /// Input log files, or a single glob pattern (sorted numerically).
    #[arg(short = 'i', long = "input-files", required = true, num_args = 1..)]
    input_files: Vec<String>,

    /// Output file (.svg or .html); defaults to <analysis>.html in display mode.
    #[arg(short = 'o', long = "output-file")]
    output_file: Option<PathBuf>,

    #[arg(short = 'a', long = "analysis", value_enum, default_value_t = Analysis::SetupTimers)]
    analysis: Analysis,

    #[arg(short = 'd', long = "display", value_enum, default_value_t = DisplayMode::Print)]
    display: DisplayMode,

    /// Plot style: stack, stack-percent or scaling.
    #[arg(short = 's', long = "style", default_value = "stack")]
    style: String,

    /// Number of timers.
    #[arg(short = 't', long = "top", default_value_t = 10)]
    top: usize,

    /// Chart width in pixels.
    #[arg(short = 'W', long, default_value_t = 1200)]
    width: u32,

    /// Chart height in pixels.
    #[arg(short = 'H', long, default_value_t = 1200)]
    height: u32,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    // 1) Resolve inputs and options. A bad style is only a warning.
    let inputs = input::resolve_inputs(&cli.input_files)?;
    ::log::debug!("input files: {:?}", inputs);
    let style = Style::parse_or_default(&cli.style);

    // 2) Load + analyze.
    let report = model::run(cli.analysis, &inputs, cli.top, style)?;

    // 3) Print or draw.
    match cli.display {
        DisplayMode::Print => {
            if let Some(out) = &cli.output_file {
                ::log::warn!("print mode writes to stdout, ignoring {}", out.display());
            }
            render::write_report(&report, &mut std::io::stdout().lock())?;
        }
        DisplayMode::Display => {
            let out = cli
                .output_file
                .clone()
                .unwrap_or_else(|| render::default_output(cli.analysis));
            render::write_chart(
                &report,
                cli.analysis.as_str(),
                &out,
                (cli.width, cli.height),
            )?;
            println!("Wrote {}", out.display());
        }
    }

    Ok(())
}
