//! Reader-level failures.
//!
//! A `ReadError` never aborts a poll: the aggregator turns it into a one-line
//! diagnostic in place of the failed section.

use std::fmt;
use std::io;

/// Why a single source reader could not produce its record.
#[derive(Debug)]
pub enum ReadError {
    /// A file source could not be opened or read.
    SourceUnavailable { source: String, error: io::Error },
    /// An external tool could not be launched.
    ToolUnavailable { tool: String, error: io::Error },
    /// The source was read but required fields were missing.
    IncompleteSource { source: String, missing: Vec<&'static str> },
    /// The source or tool output could not be parsed.
    MalformedOutput { source: String, message: String },
    /// The requested path could not be statted.
    PathUnavailable { path: String, error: io::Error },
}

impl ReadError {
    pub fn source_unavailable(source: impl Into<String>, error: io::Error) -> Self {
        ReadError::SourceUnavailable {
            source: source.into(),
            error,
        }
    }

    /// Classifies a failed tool launch.
    ///
    /// `NotFound` means the tool is not installed; anything else is treated
    /// as the tool being present but not invocable.
    pub fn tool(tool: impl Into<String>, error: io::Error) -> Self {
        let tool = tool.into();
        if error.kind() == io::ErrorKind::NotFound {
            ReadError::ToolUnavailable { tool, error }
        } else {
            ReadError::SourceUnavailable {
                source: tool,
                error,
            }
        }
    }

    pub fn malformed(source: impl Into<String>, message: impl Into<String>) -> Self {
        ReadError::MalformedOutput {
            source: source.into(),
            message: message.into(),
        }
    }

    /// Short machine-friendly name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            ReadError::SourceUnavailable { .. } => "SourceUnavailable",
            ReadError::ToolUnavailable { .. } => "ToolUnavailable",
            ReadError::IncompleteSource { .. } => "IncompleteSource",
            ReadError::MalformedOutput { .. } => "MalformedOutput",
            ReadError::PathUnavailable { .. } => "PathUnavailable",
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::SourceUnavailable { source, error } => {
                write!(f, "cannot read {}: {}", source, error)
            }
            ReadError::ToolUnavailable { tool, error } => {
                write!(f, "{} is not available: {}", tool, error)
            }
            ReadError::IncompleteSource { source, missing } => {
                write!(f, "{} is missing {}", source, missing.join(", "))
            }
            ReadError::MalformedOutput { source, message } => {
                write!(f, "unexpected output from {}: {}", source, message)
            }
            ReadError::PathUnavailable { path, error } => {
                write!(f, "cannot stat {}: {}", path, error)
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::SourceUnavailable { error, .. }
            | ReadError::ToolUnavailable { error, .. }
            | ReadError::PathUnavailable { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_not_found_is_tool_unavailable() {
        let err = ReadError::tool("nvidia-smi", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.kind(), "ToolUnavailable");
        assert!(err.to_string().starts_with("nvidia-smi is not available"));
    }

    #[test]
    fn test_tool_permission_denied_is_source_unavailable() {
        let err = ReadError::tool(
            "xrandr",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), "SourceUnavailable");
    }

    #[test]
    fn test_incomplete_source_lists_missing_fields() {
        let err = ReadError::IncompleteSource {
            source: "/proc/meminfo".to_string(),
            missing: vec!["Buffers", "Cached"],
        };
        assert_eq!(err.to_string(), "/proc/meminfo is missing Buffers, Cached");
    }
}
