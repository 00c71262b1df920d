use std::str::FromStr;

use serde::Serialize;
use tracing::Level;

use crate::error::FormatError;

/// Logical severity of a log event.
///
/// This is the closed five-level set GELF knows how to express. Anything
/// outside it (including `tracing`'s TRACE) must be folded into one of
/// these levels by the caller before an event reaches the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// All recognized severities, in increasing order of urgency.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Map to the syslog-style numeric level used by GELF's `level` field.
    ///
    /// The table is fixed: Debug→7, Info→6, Warning→4, Error→3,
    /// Critical→2. There is no default row.
    pub fn syslog_level(self) -> u8 {
        match self {
            Severity::Debug => 7,
            Severity::Info => 6,
            Severity::Warning => 4,
            Severity::Error => 3,
            Severity::Critical => 2,
        }
    }

    /// Canonical upper-case name, as the host framework would spell it.
    pub fn name(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl FromStr for Severity {
    type Err = FormatError;

    /// Parse a severity name, case-insensitively. `WARN` is accepted as a
    /// spelling of `WARNING`; any other name is rejected rather than
    /// defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(FormatError::UnrecognizedSeverity(s.to_string())),
        }
    }
}

impl From<Level> for Severity {
    /// Total mapping from `tracing` levels. TRACE has no GELF row of its
    /// own and folds into Debug.
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE | Level::DEBUG => Severity::Debug,
            Level::INFO => Severity::Info,
            Level::WARN => Severity::Warning,
            Level::ERROR => Severity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syslog_level_table() {
        assert_eq!(Severity::Debug.syslog_level(), 7);
        assert_eq!(Severity::Info.syslog_level(), 6);
        assert_eq!(Severity::Warning.syslog_level(), 4);
        assert_eq!(Severity::Error.syslog_level(), 3);
        assert_eq!(Severity::Critical.syslog_level(), 2);
    }

    #[test]
    fn test_from_str_accepts_known_names() {
        assert_eq!("debug".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("INFO".parse::<Severity>().unwrap(), Severity::Info);
        assert_eq!("Warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("ERROR".parse::<Severity>().unwrap(), Severity::Error);
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
    }

    #[test]
    fn test_from_str_rejects_unknown_names() {
        let err = "NOTICE".parse::<Severity>().unwrap_err();
        assert!(matches!(err, FormatError::UnrecognizedSeverity(ref s) if s == "NOTICE"));
    }

    #[test]
    fn test_from_tracing_level() {
        assert_eq!(Severity::from(Level::TRACE), Severity::Debug);
        assert_eq!(Severity::from(Level::DEBUG), Severity::Debug);
        assert_eq!(Severity::from(Level::INFO), Severity::Info);
        assert_eq!(Severity::from(Level::WARN), Severity::Warning);
        assert_eq!(Severity::from(Level::ERROR), Severity::Error);
    }
}
