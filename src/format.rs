//! Line formatting for persisted and console output

use chrono::{DateTime, Local};
use std::fmt;

use crate::meta::{render_console, render_full, Meta};
use crate::severity::Severity;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logical source of a record, rendered in brackets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    Label(String),
    Chain(Vec<String>),
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Label(label) => f.write_str(label),
            Context::Chain(labels) => f.write_str(&labels.join(" | ")),
        }
    }
}

impl From<&str> for Context {
    fn from(v: &str) -> Self {
        Context::Label(v.to_string())
    }
}

impl From<String> for Context {
    fn from(v: String) -> Self {
        Context::Label(v)
    }
}

impl<S: Into<String>> From<Vec<S>> for Context {
    fn from(v: Vec<S>) -> Self {
        Context::Chain(v.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Context {
    fn from(v: [S; N]) -> Self {
        Context::Chain(v.into_iter().map(Into::into).collect())
    }
}

/// Which rendering a sink applies to records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Full fidelity, no color
    Persistent,
    /// Hidden fields stripped, no stacks, colorized by level
    Console,
}

/// One log call, stamped at emission
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Severity,
    pub message: String,
    pub context: Context,
    pub timestamp: DateTime<Local>,
    pub meta: Meta,
    pub hide_from_console: Vec<String>,
}

impl Record {
    pub fn new(level: Severity, message: impl Into<String>, context: Context) -> Self {
        Self {
            level,
            message: message.into(),
            context,
            timestamp: Local::now(),
            meta: Meta::new(),
            hide_from_console: Vec::new(),
        }
    }
}

fn assemble(record: &Record, suffix: &str) -> String {
    format!(
        "{} [{}] {}: {}{}",
        record.timestamp.format(TIMESTAMP_FORMAT),
        record.context,
        record.level,
        record.message,
        suffix
    )
}

/// Render a record for the given route
pub fn format_line(record: &Record, route: Route) -> String {
    match route {
        Route::Persistent => assemble(record, &render_full(&record.meta)),
        Route::Console => {
            let line = assemble(
                record,
                &render_console(&record.meta, &record.hide_from_console),
            );
            record.level.style().paint(&line).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::ErrorInfo;
    use chrono::TimeZone;

    fn record(level: Severity, message: &str, context: Context) -> Record {
        let mut r = Record::new(level, message, context);
        r.timestamp = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap();
        r
    }

    fn plain(line: &str) -> String {
        // Strip ANSI escapes so assertions hold whether or not color is enabled
        let mut out = String::new();
        let mut chars = line.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for n in chars.by_ref() {
                    if n == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_persistent_line() {
        let r = record(Severity::Info, "Hello world!", "demo".into());
        assert_eq!(
            format_line(&r, Route::Persistent),
            "2024-03-09 07:05:02 [demo] info: Hello world!"
        );
    }

    #[test]
    fn test_context_chain_is_joined() {
        let r = record(Severity::Warn, "slow", Context::from(["api", "users", "list"]));
        assert_eq!(
            format_line(&r, Route::Persistent),
            "2024-03-09 07:05:02 [api | users | list] warn: slow"
        );
    }

    #[test]
    fn test_persistent_keeps_hidden_fields_and_stack() {
        let mut r = record(Severity::Error, "failed", "demo".into());
        r.meta.insert("token", "abc");
        r.meta.insert("err", ErrorInfo::new("bad", "stack text"));
        r.hide_from_console = vec!["token".to_string()];

        let line = format_line(&r, Route::Persistent);
        assert!(line.ends_with(
            r#"error: failed {"token":"abc","err":{"message":"bad","stack":"stack text"}}"#
        ));
    }

    #[test]
    fn test_console_strips_hidden_fields_and_stack() {
        let mut r = record(Severity::Error, "failed", "demo".into());
        r.meta.insert("token", "abc");
        r.meta.insert("err", ErrorInfo::new("bad", "stack text"));
        r.hide_from_console = vec!["token".to_string()];

        let line = plain(&format_line(&r, Route::Console));
        assert_eq!(
            line,
            r#"2024-03-09 07:05:02 [demo] error: failed {"err":{"message":"bad"}}"#
        );
    }

    #[test]
    fn test_console_colors_whole_line() {
        colored::control::set_override(true);
        let r = record(Severity::Info, "hi", "demo".into());
        let line = format_line(&r, Route::Console);
        assert!(line.starts_with('\u{1b}'));
        assert!(line.ends_with("\u{1b}[0m"));
        assert_eq!(plain(&line), "2024-03-09 07:05:02 [demo] info: hi");
    }
}
