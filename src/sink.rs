//! Output destinations and the default sink policy

use fern::Dispatch;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::Sender;

use crate::errors::Result;
use crate::format::{format_line, Record, Route};
use crate::severity::Severity;

/// Minimum severity a sink accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// Follow the owning logger's level
    Logger,
    /// Fixed level, still gated by the logger's level
    Fixed(Severity),
}

/// A named destination with its own threshold and route
pub struct Sink {
    name: String,
    threshold: Threshold,
    route: Route,
    output: Box<dyn log::Log>,
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("route", &self.route)
            .finish()
    }
}

impl Sink {
    /// Wrap any fern output. Lines are fully formatted before they reach it.
    pub fn from_output(
        name: impl Into<String>,
        output: impl Into<fern::Output>,
        route: Route,
    ) -> Self {
        let (_, output) = Dispatch::new()
            .level(log::LevelFilter::Trace)
            .chain(output)
            .into_log();
        Self {
            name: name.into(),
            threshold: Threshold::Logger,
            route,
            output,
        }
    }

    /// Colorized stdout sink
    pub fn console() -> Self {
        Self::from_output("console", std::io::stdout(), Route::Console)
    }

    /// Persistent sink appending to `path`, created along with its parent directory if missing
    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fern::log_file(path)?;
        Ok(Self::from_output(
            path.display().to_string(),
            file,
            Route::Persistent,
        ))
    }

    pub fn writer(name: impl Into<String>, writer: Box<dyn Write + Send>, route: Route) -> Self {
        Self::from_output(name, writer, route)
    }

    /// Each accepted line is sent as one message, line separator included
    pub fn channel(name: impl Into<String>, sender: Sender<String>, route: Route) -> Self {
        Self::from_output(name, sender, route)
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Whether a record at `level` reaches this sink under a logger at `logger_level`
    pub fn accepts(&self, logger_level: Severity, level: Severity) -> bool {
        let own = match self.threshold {
            Threshold::Logger => true,
            Threshold::Fixed(min) => min.allows(level),
        };
        own && logger_level.allows(level)
    }

    /// Format and write the record if it passes both gates
    pub fn emit(&self, logger_level: Severity, record: &Record) {
        if !self.accepts(logger_level, record.level) {
            return;
        }
        let line = format_line(record, self.route);
        self.output.log(
            &log::Record::builder()
                .args(format_args!("{}", line))
                .level(record.level.to_log_level())
                .target(&self.name)
                .build(),
        );
    }

    pub fn flush(&self) {
        self.output.flush();
    }
}

/// File names used by the default policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNames {
    pub general: String,
    pub error: String,
}

/// Stem of production log files, shared by every project
pub const PRODUCTION_STEM: &str = "mei";

impl FileNames {
    pub fn resolve(project_name: &str, test_mode: bool) -> Self {
        if test_mode {
            Self {
                general: format!("{}-tests.log", project_name),
                error: format!("{}-tests-error.log", project_name),
            }
        } else {
            Self {
                general: format!("{}.log", PRODUCTION_STEM),
                error: format!("{}-error.log", PRODUCTION_STEM),
            }
        }
    }
}

/// Build the default sink set: error file, general file, console
pub fn default_sinks(project_name: &str, test_mode: bool, log_dir: &Path) -> Result<Vec<Sink>> {
    let names = FileNames::resolve(project_name, test_mode);

    Ok(vec![
        Sink::file(log_dir.join(&names.error))?.with_threshold(Threshold::Fixed(Severity::Error)),
        Sink::file(log_dir.join(&names.general))?,
        Sink::console(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_file_names() {
        let test = FileNames::resolve("project-name", true);
        assert_eq!(test.general, "project-name-tests.log");
        assert_eq!(test.error, "project-name-tests-error.log");

        let prod = FileNames::resolve("project-name", false);
        assert_eq!(prod.general, "mei.log");
        assert_eq!(prod.error, "mei-error.log");
    }

    #[test]
    fn test_fixed_threshold_is_gated_by_logger_level() {
        let (tx, _rx) = mpsc::channel();
        let sink = Sink::channel("errors", tx, Route::Persistent)
            .with_threshold(Threshold::Fixed(Severity::Error));

        for logger_level in Severity::ALL {
            for level in Severity::ALL {
                let expected = level <= Severity::Error && level <= logger_level;
                assert_eq!(sink.accepts(logger_level, level), expected);
            }
        }
    }

    #[test]
    fn test_emit_filters_and_writes_lines() {
        let (tx, rx) = mpsc::channel();
        let sink = Sink::channel("memory", tx, Route::Persistent);

        sink.emit(Severity::Warn, &Record::new(Severity::Info, "dropped", "demo".into()));
        sink.emit(Severity::Warn, &Record::new(Severity::Warn, "kept", "demo".into()));

        let lines: Vec<String> = rx.try_iter().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].trim_end().ends_with("[demo] warn: kept"));
    }

    #[test]
    fn test_writer_sink() {
        use std::io::{Read, Seek, SeekFrom};

        let mut file = tempfile::tempfile().unwrap();
        let sink = Sink::writer("scratch", Box::new(file.try_clone().unwrap()), Route::Persistent);
        sink.emit(Severity::Debug, &Record::new(Severity::Verbose, "noted", "demo".into()));
        sink.flush();

        let mut contents = String::new();
        file.seek(SeekFrom::Start(0)).unwrap();
        file.read_to_string(&mut contents).unwrap();
        assert!(contents.trim_end().ends_with("[demo] verbose: noted"));
    }

    #[test]
    fn test_default_sinks_layout() {
        let dir = tempfile::tempdir().unwrap();
        let sinks = default_sinks("demo", true, dir.path()).unwrap();

        assert_eq!(sinks.len(), 3);
        assert_eq!(sinks[0].threshold(), Threshold::Fixed(Severity::Error));
        assert_eq!(sinks[0].route(), Route::Persistent);
        assert_eq!(sinks[1].threshold(), Threshold::Logger);
        assert_eq!(sinks[1].route(), Route::Persistent);
        assert_eq!(sinks[2].route(), Route::Console);

        assert!(dir.path().join("demo-tests-error.log").exists());
        assert!(dir.path().join("demo-tests.log").exists());
    }

    #[test]
    fn test_file_sink_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.log");
        let sink = Sink::file(&path).unwrap();

        sink.emit(Severity::Info, &Record::new(Severity::Info, "hello", "demo".into()));
        sink.flush();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.trim_end().ends_with("[demo] info: hello"));
    }
}
