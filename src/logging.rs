use env_logger::Builder;
use log::debug;

/// Initialize the logger. Warnings are always shown; `verbose` adds debug
/// output. `RUST_LOG` takes precedence over both.
pub fn init_logger(verbose: bool) {
    let mut builder = builder(verbose);
    builder.parse_default_env().init();

    debug!("Logger initialized with level: {:?}", log::max_level());
}

fn builder(verbose: bool) -> Builder {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);
    builder
}
