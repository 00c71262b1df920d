/// Error type returned when an event cannot be turned into a GELF record.
///
/// All variants are raised synchronously to the caller of
/// [`format`](crate::formatter::GelfFormatter::format); the formatter never
/// logs, retries or emits a partially-built record.
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    /// A mandatory event field (message, timestamp or level) is absent.
    #[error("event is missing mandatory field `{0}`")]
    MissingField(&'static str),

    /// A severity value outside the recognized five-level set.
    #[error("unrecognized severity: {0}")]
    UnrecognizedSeverity(String),

    /// The assembled record could not be encoded as JSON.
    #[error("failed to encode GELF record: {0}")]
    Encoding(#[from] serde_json::Error),
}
