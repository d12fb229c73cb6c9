//! The logger factory and per-level emission API

use log::debug;
use std::error::Error as StdError;

use crate::config::LoggerConfig;
use crate::errors::Result;
use crate::format::{Context, Record};
use crate::meta::{ErrorInfo, Meta, MetaValue};
use crate::severity::Severity;
use crate::sink::{default_sinks, Sink};

/// Optional parts of a log call: free-form fields plus typed options
#[derive(Debug, Clone, Default)]
pub struct Entry {
    meta: Meta,
    context: Option<Context>,
    hide_from_console: Vec<String>,
}

impl Entry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.meta.insert(key, value);
        self
    }

    pub fn error(mut self, key: impl Into<String>, err: &(dyn StdError + 'static)) -> Self {
        self.meta.insert_error(key, err);
        self
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Replace the logger's default context for this call
    pub fn context(mut self, context: impl Into<Context>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Keep these fields out of console output. File output still has them.
    pub fn hide_from_console<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hide_from_console.extend(keys.into_iter().map(Into::into));
        self
    }
}

impl From<Meta> for Entry {
    fn from(meta: Meta) -> Self {
        Entry::new().meta(meta)
    }
}

/// A configured logger for one project
#[derive(Debug)]
pub struct Logger {
    project_name: String,
    level: Severity,
    sinks: Vec<Sink>,
}

macro_rules! level_methods {
    ($(($level:ident, $with:ident, $variant:ident)),* $(,)?) => {
        $(
            pub fn $level(&self, message: impl std::fmt::Display) {
                self.log(Severity::$variant, message, Entry::new());
            }

            pub fn $with(&self, message: impl std::fmt::Display, entry: Entry) {
                self.log(Severity::$variant, message, entry);
            }
        )*
    };
}

impl Logger {
    /// Build a logger from explicit configuration. Fails on an invalid declared level
    /// or when a default file sink cannot be opened.
    pub fn new(config: LoggerConfig) -> Result<Self> {
        let level = config.resolve_level()?;
        let sinks = match config.sinks {
            Some(sinks) => sinks,
            None => default_sinks(&config.project_name, config.test_mode, &config.log_dir)?,
        };
        debug!(
            "Logger for {} at level {} with {} sinks",
            config.project_name,
            level,
            sinks.len()
        );

        Ok(Self {
            project_name: config.project_name,
            level,
            sinks,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    pub fn enabled(&self, level: Severity) -> bool {
        self.level.allows(level)
    }

    /// Stamp a record now and hand it to every sink
    pub fn log(&self, level: Severity, message: impl std::fmt::Display, entry: Entry) {
        if !self.enabled(level) {
            return;
        }
        let context = entry
            .context
            .unwrap_or_else(|| Context::Label(self.project_name.clone()));
        let mut record = Record::new(level, message.to_string(), context);
        record.meta = entry.meta;
        record.hide_from_console = entry.hide_from_console;
        self.dispatch(&record);
    }

    /// Log an error as the message itself. The line shows its display text;
    /// the full report is attached under `error`.
    pub fn log_error(&self, level: Severity, err: &(dyn StdError + 'static), entry: Entry) {
        let entry = entry.field("error", ErrorInfo::from_error(err));
        self.log(level, err, entry);
    }

    fn dispatch(&self, record: &Record) {
        for sink in &self.sinks {
            sink.emit(self.level, record);
        }
    }

    level_methods!(
        (crit, crit_with, Crit),
        (severe, severe_with, Severe),
        (error, error_with, Error),
        (warn, warn_with, Warn),
        (info, info_with, Info),
        (verbose, verbose_with, Verbose),
        (debug, debug_with, Debug),
    );

    /// Push buffered output to every sink
    pub fn flush(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }

    /// Route the `log` facade through this logger. The record target becomes the context.
    pub fn install(self) -> Result<()> {
        log::set_max_level(self.level.to_level_filter());
        log::set_boxed_logger(Box::new(self))?;
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, Severity::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        let level = Severity::from(record.level());
        if !Logger::enabled(self, level) {
            return;
        }
        let context = match record.target() {
            "" => Context::Label(self.project_name.clone()),
            target => Context::Label(target.to_string()),
        };
        self.dispatch(&Record::new(level, record.args().to_string(), context));
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

/// Create a logger for `project_name`, reading test mode and the declared level
/// from the environment. `level` and `sinks` override what the environment says.
pub fn create_logger(
    project_name: &str,
    level: Option<Severity>,
    sinks: Option<Vec<Sink>>,
) -> Result<Logger> {
    let mut config = LoggerConfig::from_env(project_name);
    config.level = level;
    config.sinks = sinks;
    Logger::new(config)
}
