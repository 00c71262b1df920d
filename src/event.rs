use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::severity::Severity;

/// Names of the standard metadata attributes attached to every event.
///
/// These mirror what the `tracing` ecosystem knows about an event's origin
/// plus process/thread identity. They are excluded from GELF output by
/// default; the formatter surfaces one only when its name is allow-listed.
/// Classification is by name: a caller-supplied extra that reuses one of
/// these names is treated as reserved too.
pub const RESERVED_ATTRS: [&str; 8] = [
    "target",
    "module_path",
    "file",
    "line",
    "function",
    "process_id",
    "thread_id",
    "thread_name",
];

/// Standard metadata describing where an event came from.
///
/// One optional field per name in [`RESERVED_ATTRS`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventMetadata {
    pub target: Option<String>,
    pub module_path: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub function: Option<String>,
    pub process_id: Option<u32>,
    pub thread_id: Option<u64>,
    pub thread_name: Option<String>,
}

impl EventMetadata {
    /// Yield `(name, value)` pairs for the populated fields, with names
    /// drawn from [`RESERVED_ATTRS`].
    pub fn entries(&self) -> Vec<(&'static str, Value)> {
        let mut out = Vec::new();
        if let Some(v) = &self.target {
            out.push(("target", Value::from(v.as_str())));
        }
        if let Some(v) = &self.module_path {
            out.push(("module_path", Value::from(v.as_str())));
        }
        if let Some(v) = &self.file {
            out.push(("file", Value::from(v.as_str())));
        }
        if let Some(v) = self.line {
            out.push(("line", Value::from(v)));
        }
        if let Some(v) = &self.function {
            out.push(("function", Value::from(v.as_str())));
        }
        if let Some(v) = self.process_id {
            out.push(("process_id", Value::from(v)));
        }
        if let Some(v) = self.thread_id {
            out.push(("thread_id", Value::from(v)));
        }
        if let Some(v) = &self.thread_name {
            out.push(("thread_name", Value::from(v.as_str())));
        }
        out
    }
}

/// One frame of a captured stack trace.
#[derive(Debug, Clone, Serialize)]
pub struct StackFrame {
    pub function: String,
    pub file: String,
    pub line: u32,
}

/// Captured error information attached to an event.
#[derive(Debug, Clone, Serialize)]
pub struct ExceptionInfo {
    /// Error type name, e.g. `io::Error`.
    pub kind: String,
    /// The error's own message.
    pub message: String,
    /// Innermost-first trace frames, if any were captured.
    pub frames: Vec<StackFrame>,
}

impl ExceptionInfo {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            frames: Vec::new(),
        }
    }

    /// Capture an error value, using its type name as the kind.
    pub fn from_error<E: std::error::Error>(err: &E) -> Self {
        let kind = std::any::type_name::<E>()
            .rsplit("::")
            .next()
            .unwrap_or("Error");
        Self::new(kind, err.to_string())
    }

    pub fn with_frame(mut self, function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        self.frames.push(StackFrame {
            function: function.into(),
            file: file.into(),
            line,
        });
        self
    }

    /// Render the conventional multi-line trace text: type and message on
    /// the first line, one `at` line per frame below it.
    pub fn render(&self) -> String {
        let mut out = format!("{}: {}", self.kind, self.message);
        for frame in &self.frames {
            let _ = write!(out, "\n  at {} ({}:{})", frame.function, frame.file, frame.line);
        }
        out
    }
}

/// One structured log event, as handed over by the host logging framework.
///
/// The mandatory fields (message, level, timestamp) are held as `Option` so
/// the formatter can report a missing one as a contract violation instead
/// of inventing a default; [`LogEvent::new`] fills all three.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LogEvent {
    /// Fully rendered message text.
    pub message: Option<String>,
    pub level: Option<Severity>,
    /// Creation time as fractional seconds since the Unix epoch.
    pub timestamp: Option<f64>,
    /// Captured error info, if the event records a failure.
    pub exception: Option<ExceptionInfo>,
    /// Standard metadata (the reserved attributes).
    pub metadata: EventMetadata,
    /// Caller-supplied extra attributes.
    pub extra: BTreeMap<String, Value>,
}

impl LogEvent {
    /// Create an event stamped with the current time.
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            level: Some(level),
            timestamp: Some(now_epoch_secs()),
            ..Self::default()
        }
    }

    pub fn with_timestamp(mut self, secs: f64) -> Self {
        self.timestamp = Some(secs);
        self
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn with_metadata(mut self, metadata: EventMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attach one extra attribute. Later writes win on duplicate names.
    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Current time as fractional seconds since the Unix epoch, at microsecond
/// precision.
pub(crate) fn now_epoch_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
