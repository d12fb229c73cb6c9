//! The seven-level severity scheme

use colored::{Color, ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::LoggerError;

/// Severity of a log record. Lower rank is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The whole process has to terminate
    Crit = 0,
    /// Something is wrong and more than one function is affected
    Severe = 1,
    /// A call or related process failed unexpectedly
    Error = 2,
    /// A call hit something unwanted but can recover
    Warn = 3,
    /// Something expected happened that is worth logging
    Info = 4,
    /// Something happened
    Verbose = 5,
    Debug = 6,
}

/// Console style of a level: foreground plus optional background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStyle {
    pub foreground: Color,
    pub background: Option<Color>,
}

impl LevelStyle {
    /// Apply the style to a whole line
    pub fn paint(&self, line: &str) -> ColoredString {
        let painted = line.color(self.foreground);
        match self.background {
            Some(bg) => painted.on_color(bg),
            None => painted,
        }
    }
}

impl Severity {
    /// All levels, most severe first
    pub const ALL: [Severity; 7] = [
        Severity::Crit,
        Severity::Severe,
        Severity::Error,
        Severity::Warn,
        Severity::Info,
        Severity::Verbose,
        Severity::Debug,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Crit => "crit",
            Severity::Severe => "severe",
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
            Severity::Verbose => "verbose",
            Severity::Debug => "debug",
        }
    }

    /// Whether a logger or sink configured at `self` accepts a record at `level`
    pub fn allows(self, level: Severity) -> bool {
        level.rank() <= self.rank()
    }

    /// The level one step less severe, saturating at debug
    pub fn quieter(self) -> Severity {
        Self::ALL
            .get(self.rank() as usize + 1)
            .copied()
            .unwrap_or(Severity::Debug)
    }

    pub fn style(self) -> LevelStyle {
        let (foreground, background) = match self {
            Severity::Crit => (Color::Black, Some(Color::Red)),
            Severity::Severe => (Color::Red, Some(Color::White)),
            Severity::Error => (Color::Red, None),
            Severity::Warn => (Color::Yellow, None),
            Severity::Info => (Color::Blue, None),
            Severity::Verbose => (Color::Cyan, None),
            Severity::Debug => (Color::White, None),
        };
        LevelStyle {
            foreground,
            background,
        }
    }

    /// Facade level used when handing a record to the `log` ecosystem
    pub fn to_log_level(self) -> log::Level {
        match self {
            Severity::Crit | Severity::Severe | Severity::Error => log::Level::Error,
            Severity::Warn => log::Level::Warn,
            Severity::Info => log::Level::Info,
            Severity::Verbose => log::Level::Debug,
            Severity::Debug => log::Level::Trace,
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        self.to_log_level().to_level_filter()
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warn,
            log::Level::Info => Severity::Info,
            log::Level::Debug => Severity::Verbose,
            log::Level::Trace => Severity::Debug,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.name() == s)
            .ok_or_else(|| LoggerError::invalid_level(s))
    }
}
