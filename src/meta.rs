//! Structured metadata attached to log records and its JSON suffix rendering

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::error::Error as StdError;

/// An error carried as data: display text plus the full report
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub message: String,
    pub stack: String,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: stack.into(),
        }
    }

    /// Capture an error and its chain of sources
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let message = err.to_string();
        let mut stack = format!("Error: {}", message);
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str(&format!("\n    caused by: {}", cause));
            source = cause.source();
        }
        Self { message, stack }
    }
}

impl From<&anyhow::Error> for ErrorInfo {
    fn from(err: &anyhow::Error) -> Self {
        Self {
            message: err.to_string(),
            stack: format!("{:?}", err),
        }
    }
}

impl From<anyhow::Error> for ErrorInfo {
    fn from(err: anyhow::Error) -> Self {
        Self::from(&err)
    }
}

/// A metadata value
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Text(String),
    Number(serde_json::Number),
    Boolean(bool),
    Error(ErrorInfo),
    Nested(Meta),
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Text(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Text(v)
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Boolean(v)
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(impl From<$t> for MetaValue {
            fn from(v: $t) -> Self {
                MetaValue::Number(serde_json::Number::from(v))
            }
        })*
    };
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for MetaValue {
    /// Non-finite floats have no JSON form and are kept as text
    fn from(v: f64) -> Self {
        match serde_json::Number::from_f64(v) {
            Some(n) => MetaValue::Number(n),
            None => MetaValue::Text(v.to_string()),
        }
    }
}

impl From<f32> for MetaValue {
    fn from(v: f32) -> Self {
        MetaValue::from(v as f64)
    }
}

impl From<ErrorInfo> for MetaValue {
    fn from(v: ErrorInfo) -> Self {
        MetaValue::Error(v)
    }
}

impl From<anyhow::Error> for MetaValue {
    fn from(v: anyhow::Error) -> Self {
        MetaValue::Error(ErrorInfo::from(v))
    }
}

impl From<Meta> for MetaValue {
    fn from(v: Meta) -> Self {
        MetaValue::Nested(v)
    }
}

/// Ordered metadata mapping with unique keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meta {
    fields: Vec<(String, MetaValue)>,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Meta::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a field. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Attach an error value under `key`
    pub fn insert_error(&mut self, key: impl Into<String>, err: &(dyn StdError + 'static)) {
        self.insert(key, ErrorInfo::from_error(err));
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<MetaValue>> FromIterator<(K, V)> for Meta {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Meta::new();
        for (k, v) in iter {
            meta.insert(k, v);
        }
        meta
    }
}

/// How error values are normalized during rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fidelity {
    /// `{message, stack}`
    Full,
    /// `{message}` only
    ConsoleSafe,
}

struct ValueView<'a> {
    value: &'a MetaValue,
    fidelity: Fidelity,
}

impl Serialize for ValueView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            MetaValue::Text(s) => serializer.serialize_str(s),
            MetaValue::Number(n) => n.serialize(serializer),
            MetaValue::Boolean(b) => serializer.serialize_bool(*b),
            MetaValue::Error(info) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("message", &info.message)?;
                if self.fidelity == Fidelity::Full {
                    map.serialize_entry("stack", &info.stack)?;
                }
                map.end()
            }
            MetaValue::Nested(meta) => MapView {
                meta,
                fidelity: self.fidelity,
                hidden: &[],
            }
            .serialize(serializer),
        }
    }
}

struct MapView<'a> {
    meta: &'a Meta,
    fidelity: Fidelity,
    hidden: &'a [String],
}

impl MapView<'_> {
    fn visible(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.meta
            .iter()
            .filter(move |(k, _)| !self.hidden.iter().any(|h| h == k))
    }
}

impl Serialize for MapView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.visible() {
            map.serialize_entry(
                key,
                &ValueView {
                    value,
                    fidelity: self.fidelity,
                },
            )?;
        }
        map.end()
    }
}

fn render(view: MapView<'_>) -> String {
    if view.visible().next().is_none() {
        return String::new();
    }
    // Serializing strings, bools and finite numbers into a String cannot fail
    match serde_json::to_string(&view) {
        Ok(json) => format!(" {}", json),
        Err(_) => String::new(),
    }
}

/// Render metadata for persisted output: errors keep their stack
pub fn render_full(meta: &Meta) -> String {
    render(MapView {
        meta,
        fidelity: Fidelity::Full,
        hidden: &[],
    })
}

/// Render metadata for the console: `hidden` keys are dropped and errors lose their stack
pub fn render_console(meta: &Meta, hidden: &[String]) -> String {
    render(MapView {
        meta,
        fidelity: Fidelity::ConsoleSafe,
        hidden,
    })
}
