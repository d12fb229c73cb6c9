//! Command line argument parsing for the `mei-log` tool

use clap::Parser;
use std::path::PathBuf;

use crate::severity::Severity;

/// Emit one log record through a project logger
///
/// Uses the same level resolution, sinks and file layout as library callers.
#[derive(Parser, Debug)]
#[command(name = "mei-log")]
#[command(about = "Write a leveled log record to the console and project log files")]
#[command(version)]
pub struct Args {
    /// Project name, used as default context and for test-mode file names
    #[arg(short, long)]
    pub project: String,

    /// Level threshold override (crit, severe, error, warn, info, verbose, debug)
    #[arg(short, long, value_parser = parse_severity)]
    pub level: Option<Severity>,

    /// Lower the threshold one step per use, starting from the resolved level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Use test-mode file names
    #[arg(long)]
    pub test_mode: bool,

    /// Directory holding the log files
    #[arg(long, default_value = crate::config::DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Context labels, joined with " | " when repeated
    #[arg(short, long)]
    pub context: Vec<String>,

    /// Extra `key=value` fields attached to the record
    #[arg(short, long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Field names kept out of console output
    #[arg(long)]
    pub hide: Vec<String>,

    /// Level of the record to emit
    #[arg(value_parser = parse_severity)]
    pub record_level: Severity,

    /// Message text
    pub message: String,
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    s.parse().map_err(|e: crate::errors::LoggerError| e.to_string())
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command() {
        let args = Args::try_parse_from([
            "mei-log",
            "--project",
            "demo",
            "--level",
            "warn",
            "-vv",
            "-c",
            "api",
            "-c",
            "users",
            "-f",
            "id=7",
            "--hide",
            "id",
            "error",
            "lookup failed",
        ])
        .unwrap();

        assert_eq!(args.project, "demo");
        assert_eq!(args.level, Some(Severity::Warn));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.context, vec!["api", "users"]);
        assert_eq!(args.fields, vec![("id".to_string(), "7".to_string())]);
        assert_eq!(args.hide, vec!["id"]);
        assert_eq!(args.record_level, Severity::Error);
        assert_eq!(args.message, "lookup failed");
        assert_eq!(args.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_rejects_unknown_level() {
        assert!(Args::try_parse_from(["mei-log", "-p", "demo", "loud", "hi"]).is_err());
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }
}
