//! Logger construction settings

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::severity::Severity;
use crate::sink::Sink;

/// Environment variable selecting test mode when set to `test`
pub const ENVIRONMENT_VAR: &str = "NODE_ENV";
/// Environment variable declaring the log level
pub const LEVEL_VAR: &str = "LOG_LEVEL";
pub const DEFAULT_LOG_DIR: &str = "logs";

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

/// Everything a logger needs, passed explicitly instead of read from the process
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    pub project_name: String,
    /// Trusted override, wins over `env_level`
    #[serde(default)]
    pub level: Option<Severity>,
    /// Raw declared level, validated at construction
    #[serde(default)]
    pub env_level: Option<String>,
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Replaces the default sink policy entirely when set
    #[serde(skip)]
    pub sinks: Option<Vec<Sink>>,
}

impl LoggerConfig {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            level: None,
            env_level: None,
            test_mode: false,
            log_dir: default_log_dir(),
            sinks: None,
        }
    }

    /// Read test mode and the declared level from the process environment
    pub fn from_env(project_name: impl Into<String>) -> Self {
        let mut config = Self::new(project_name);
        config.test_mode = std::env::var(ENVIRONMENT_VAR).map_or(false, |v| v == "test");
        config.env_level = std::env::var(LEVEL_VAR).ok().filter(|v| !v.is_empty());
        config
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: LoggerConfig = serde_json::from_str(&json)?;
        Ok(config)
    }

    pub fn level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    pub fn env_level(mut self, level: impl Into<String>) -> Self {
        self.env_level = Some(level.into());
        self
    }

    pub fn test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn sinks(mut self, sinks: Vec<Sink>) -> Self {
        self.sinks = Some(sinks);
        self
    }

    /// Override, then declared level, then `info`
    pub fn resolve_level(&self) -> Result<Severity> {
        if let Some(level) = self.level {
            return Ok(level);
        }
        match &self.env_level {
            Some(raw) => raw.parse(),
            None => Ok(Severity::Info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LoggerError;

    #[test]
    fn test_default_level_is_info() {
        assert_eq!(LoggerConfig::new("demo").resolve_level().unwrap(), Severity::Info);
    }

    #[test]
    fn test_declared_level_is_used() {
        let config = LoggerConfig::new("demo").env_level("verbose");
        assert_eq!(config.resolve_level().unwrap(), Severity::Verbose);
    }

    #[test]
    fn test_override_wins_and_skips_validation() {
        let config = LoggerConfig::new("demo")
            .env_level("bogus")
            .level(Severity::Error);
        assert_eq!(config.resolve_level().unwrap(), Severity::Error);
    }

    #[test]
    fn test_invalid_declared_level() {
        let err = LoggerConfig::new("demo")
            .env_level("bogus")
            .resolve_level()
            .unwrap_err();
        match err {
            LoggerError::InvalidLevel { value, expected } => {
                assert_eq!(value, "bogus");
                assert_eq!(expected, "crit, severe, error, warn, info, verbose, debug");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logger.json");
        fs::write(
            &path,
            r#"{"projectName":"demo","level":"warn","testMode":true}"#,
        )
        .unwrap();

        let config = LoggerConfig::load_from_file(&path).unwrap();
        assert_eq!(config.project_name, "demo");
        assert_eq!(config.level, Some(Severity::Warn));
        assert!(config.test_mode);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert!(config.sinks.is_none());
    }

    #[test]
    fn test_load_rejects_unknown_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logger.json");
        fs::write(&path, r#"{"projectName":"demo","level":"loud"}"#).unwrap();

        assert!(matches!(
            LoggerConfig::load_from_file(&path),
            Err(LoggerError::Config(_))
        ));
    }
}
