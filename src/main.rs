//! Main entry point for the `mei-log` tool

use anyhow::Context as _;
use clap::Parser;
use mei_logger::{args::Args, Entry, Logger, LoggerConfig};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = LoggerConfig::from_env(args.project.as_str()).log_dir(&args.log_dir);
    if args.test_mode {
        config = config.test_mode(true);
    }
    if let Some(level) = args.level {
        config = config.level(level);
    }

    // Each -v lowers the resolved threshold by one level
    if args.verbose > 0 {
        let mut level = config.resolve_level()?;
        for _ in 0..args.verbose {
            level = level.quieter();
        }
        config = config.level(level);
    }

    let logger = Logger::new(config)
        .with_context(|| format!("Failed to set up logger for {}", args.project))?;

    let mut entry = Entry::new().hide_from_console(args.hide);
    if !args.context.is_empty() {
        entry = entry.context(args.context);
    }
    for (key, value) in args.fields {
        entry = entry.field(key, value);
    }

    logger.log(args.record_level, &args.message, entry);
    logger.flush();

    Ok(())
}
