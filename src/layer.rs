use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::event::{now_epoch_secs, EventMetadata, LogEvent};
use crate::formatter::{FormatterConfig, GelfFormatter};
use crate::severity::Severity;

/// `tracing_subscriber` layer that writes one GELF JSON line per event to
/// an owned writer.
///
/// This is glue around [`GelfFormatter`]: the layer adapts each `tracing`
/// event into a [`LogEvent`] (message and fields from the event, reserved
/// attributes from its metadata and the current thread/process) and hands
/// it to the formatter. It performs no buffering, no transport and no
/// level filtering; combine it with the usual `tracing_subscriber` filters
/// if routing is needed.
pub struct GelfLayer<W: Write + Send + 'static> {
    formatter: GelfFormatter,
    writer: Mutex<W>,
}

impl<W: Write + Send + 'static> GelfLayer<W> {
    /// Create a layer with the given configuration, resolving the system
    /// hostname once.
    pub fn new(config: FormatterConfig, writer: W) -> Self {
        Self::with_formatter(GelfFormatter::new(config), writer)
    }

    /// Create a layer around an existing formatter.
    pub fn with_formatter(formatter: GelfFormatter, writer: W) -> Self {
        Self {
            formatter,
            writer: Mutex::new(writer),
        }
    }
}

impl GelfLayer<io::Stdout> {
    /// Create a layer that writes to stdout.
    pub fn stdout(config: FormatterConfig) -> Self {
        Self::new(config, io::stdout())
    }
}

impl GelfLayer<io::Stderr> {
    /// Create a layer that writes to stderr.
    pub fn stderr(config: FormatterConfig) -> Self {
        Self::new(config, io::stderr())
    }
}

impl<S, W> Layer<S> for GelfLayer<W>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: Write + Send + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let meta = event.metadata();
        let thread = std::thread::current();
        let log_event = LogEvent {
            // Events without an explicit message fall back to the event's
            // metadata name, so a record is always produced.
            message: Some(message.unwrap_or_else(|| meta.name().to_string())),
            level: Some(Severity::from(*meta.level())),
            timestamp: Some(now_epoch_secs()),
            exception: None,
            metadata: EventMetadata {
                target: Some(meta.target().to_string()),
                module_path: meta.module_path().map(|s| s.to_string()),
                file: meta.file().map(|s| s.to_string()),
                line: meta.line(),
                function: None,
                process_id: Some(std::process::id()),
                thread_id: None,
                thread_name: thread.name().map(|s| s.to_string()),
            },
            extra: fields,
        };

        match self.formatter.format(&log_event) {
            Ok(line) => {
                if let Ok(mut writer) = self.writer.lock() {
                    // The formatter returns no trailing newline; the sink
                    // owns line framing.
                    let _ = writeln!(writer, "{line}");
                }
            }
            Err(e) => {
                eprintln!("failed to format GELF record: {e}");
            }
        }
    }
}

struct FieldVisitor<'a> {
    fields: &'a mut BTreeMap<String, serde_json::Value>,
    message: &'a mut Option<String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(value.to_string()),
            );
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            *self.message = Some(rendered);
        } else {
            self.fields
                .insert(field.name().to_string(), serde_json::Value::String(rendered));
        }
    }
}
