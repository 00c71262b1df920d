//! GELF 1.1 log-record formatting.
//!
//! [`GelfFormatter`] turns one structured [`LogEvent`] into a GELF JSON
//! string; [`GelfLayer`] plugs that into the `tracing` ecosystem and writes
//! one line per event to a stream.

pub mod error;
pub mod event;
pub mod formatter;
pub mod layer;
pub mod severity;

pub use error::FormatError;
pub use event::{EventMetadata, ExceptionInfo, LogEvent, StackFrame, RESERVED_ATTRS};
pub use formatter::{FormatterConfig, GelfFormatter, GELF_VERSION};
pub use layer::GelfLayer;
pub use severity::Severity;
