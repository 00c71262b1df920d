use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::error::FormatError;
use crate::event::{LogEvent, RESERVED_ATTRS};

/// GELF payload version emitted in every record.
pub const GELF_VERSION: &str = "1.1";

/// Attribute filtering configuration for [`GelfFormatter`].
///
/// Reserved attributes (see [`RESERVED_ATTRS`]) are suppressed unless named
/// in `allowed_reserved_attrs`; extra attributes are surfaced unless named
/// in `ignored_attrs`. Both sets default to empty, which yields a record
/// containing only the mandatory GELF fields.
#[derive(Debug, Clone, Default)]
pub struct FormatterConfig {
    /// Reserved attribute names to surface, by exception.
    pub allowed_reserved_attrs: BTreeSet<String>,
    /// Extra attribute names to suppress.
    pub ignored_attrs: BTreeSet<String>,
}

impl FormatterConfig {
    pub fn allow_reserved<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_reserved_attrs
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_attrs.extend(names.into_iter().map(Into::into));
        self
    }
}

/// Turns [`LogEvent`]s into GELF 1.1 JSON strings.
///
/// The hostname for the mandatory `host` field is resolved once at
/// construction and reused for every call; the instance holds no other
/// state, so one formatter can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct GelfFormatter {
    config: FormatterConfig,
    hostname: String,
}

impl GelfFormatter {
    /// Create a formatter, resolving the system hostname.
    pub fn new(config: FormatterConfig) -> Self {
        Self::with_hostname(config, system_hostname())
    }

    /// Create a formatter with a fixed hostname instead of resolving the
    /// system one. Useful in tests and in containers where the reported
    /// host should not be the container id.
    pub fn with_hostname(config: FormatterConfig, hostname: impl Into<String>) -> Self {
        Self {
            config,
            hostname: hostname.into(),
        }
    }

    /// Format one event as a GELF 1.1 JSON string.
    ///
    /// Returns the serialized record with no trailing newline; appending
    /// one is the output sink's job. On any error the event produces no
    /// output at all, never a partial record.
    pub fn format(&self, event: &LogEvent) -> Result<String, FormatError> {
        let message = event
            .message
            .as_deref()
            .ok_or(FormatError::MissingField("message"))?;
        let timestamp = event
            .timestamp
            .ok_or(FormatError::MissingField("timestamp"))?;
        let level = event.level.ok_or(FormatError::MissingField("level"))?;

        let mut record = Map::new();
        record.insert("version".to_string(), Value::from(GELF_VERSION));
        record.insert("short_message".to_string(), Value::from(message));
        record.insert("timestamp".to_string(), Value::from(timestamp));
        record.insert("level".to_string(), Value::from(level.syslog_level()));
        record.insert("host".to_string(), Value::from(self.hostname.as_str()));

        if let Some(exception) = &event.exception {
            record.insert("full_message".to_string(), Value::from(exception.render()));
        }

        // Metadata first, extras second: on a post-prefix name collision
        // the caller-supplied value wins.
        for (name, value) in event.metadata.entries() {
            self.surface(&mut record, name, value);
        }
        for (name, value) in &event.extra {
            self.surface(&mut record, name, self.filter_value(value));
        }

        Ok(serde_json::to_string(&record)?)
    }

    fn surface(&self, record: &mut Map<String, Value>, name: &str, value: Value) {
        if self.includes(name) {
            record.insert(prefix(name), value);
        }
    }

    /// Inclusion rule applied to every attribute name, at any depth.
    fn includes(&self, name: &str) -> bool {
        // `id` is reserved by GELF itself; the check is on the prefixed
        // key so a literal `_id` attribute is dropped too.
        if prefix(name) == "_id" {
            return false;
        }
        if RESERVED_ATTRS.contains(&name) {
            self.config.allowed_reserved_attrs.contains(name)
        } else {
            !self.config.ignored_attrs.contains(name)
        }
    }

    /// Recursively apply the inclusion rule to the keys of object-typed
    /// values. Non-object values pass through unchanged; nested keys are
    /// filtered but not prefixed.
    fn filter_value(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .filter(|(name, _)| self.includes(name))
                    .map(|(name, nested)| (name.clone(), self.filter_value(nested)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

impl Default for GelfFormatter {
    fn default() -> Self {
        Self::new(FormatterConfig::default())
    }
}

/// Prefix an attribute name with `_`, unless it already starts with one.
fn prefix(name: &str) -> String {
    if name.starts_with('_') {
        name.to_string()
    } else {
        format!("_{name}")
    }
}

/// Resolve the system hostname, falling back to `"unknown"`.
fn system_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string())
}
