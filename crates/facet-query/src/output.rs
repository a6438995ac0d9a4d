//! Structured output formatting for CLI commands.
//!
//! Provides JSON envelopes for success and error cases and the exit codes
//! the binary reports.

use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};

/// Version of the JSON output format
const OUTPUT_VERSION: &str = "0.1.0";

/// Where command results go: plain lines, or one JSON envelope
pub struct OutputContext {
    quiet: bool,
    json: bool,
}

impl OutputContext {
    pub fn new(quiet: bool, json: bool) -> Self {
        Self { quiet, json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Result line; skipped in JSON mode
    pub fn print_data(&self, line: impl Display) -> io::Result<()> {
        self.emit(!self.json, line)
    }

    /// Commentary line; skipped in JSON and quiet modes
    pub fn print_info(&self, line: impl Display) -> io::Result<()> {
        self.emit(!self.json && !self.quiet, line)
    }

    /// Envelope; printed in JSON mode only
    pub fn print_json<T: Serialize>(&self, output: &JsonOutput<T>) -> io::Result<()> {
        if !self.json {
            return Ok(());
        }
        let text = output.to_json_string().map_err(io::Error::other)?;
        self.emit(true, text)
    }

    fn emit(&self, show: bool, line: impl Display) -> io::Result<()> {
        if !show {
            return Ok(());
        }
        match writeln!(io::stdout().lock(), "{}", line) {
            // Reader went away (e.g. piped into `head`)
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => std::process::exit(0),
            result => result,
        }
    }
}

/// Wrapper for successful command output with metadata
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub metadata: Metadata,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T, command: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            metadata: Metadata::new(command),
        }
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Wrapper for error output
#[derive(Debug, Serialize)]
pub struct JsonError {
    pub success: bool,
    pub error: ErrorDetail,
    pub metadata: Metadata,
}

impl JsonError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                suggestions: Vec::new(),
            },
            metadata: Metadata::new(command),
        }
    }

    /// Add a suggestion to the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.error.suggestions.push(suggestion.into());
        self
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn exit_code(&self) -> ExitCode {
        ErrorCode::to_exit_code(&self.error.code)
    }
}

/// Error code, message, and suggestions
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code (e.g., "VOCABULARY_NOT_FOUND", "PARSE_ERROR")
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Response metadata
#[derive(Debug, Serialize)]
pub struct Metadata {
    /// Version of the output format
    pub version: String,
    /// Command that generated this response
    pub command: String,
}

impl Metadata {
    fn new(command: impl Into<String>) -> Self {
        Self {
            version: OUTPUT_VERSION.to_string(),
            command: command.into(),
        }
    }
}

/// Standardized exit codes for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command succeeded (0)
    Success = 0,

    /// Generic error (1)
    GenericError = 1,

    /// Invalid arguments, query text, or usage error (2)
    InvalidArgument = 2,

    /// Vocabulary or file not found (3)
    NotFound = 3,

    /// File system failure (10)
    ExternalError = 10,
}

impl ExitCode {
    /// Convert exit code to i32 for `std::process::exit`
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Standard error codes (JSON format)
pub struct ErrorCode;

impl ErrorCode {
    pub const VOCABULARY_NOT_FOUND: &'static str = "VOCABULARY_NOT_FOUND";
    pub const FILE_NOT_FOUND: &'static str = "FILE_NOT_FOUND";
    pub const NO_CRITERION: &'static str = "NO_CRITERION";
    pub const INVALID_ARGUMENT: &'static str = "INVALID_ARGUMENT";
    pub const PARSE_ERROR: &'static str = "PARSE_ERROR";
    pub const IO_ERROR: &'static str = "IO_ERROR";
    pub const INTERNAL: &'static str = "INTERNAL";

    /// Map error code string to exit code
    pub fn to_exit_code(code: &str) -> ExitCode {
        match code {
            Self::VOCABULARY_NOT_FOUND | Self::FILE_NOT_FOUND => ExitCode::NotFound,
            Self::NO_CRITERION | Self::INVALID_ARGUMENT | Self::PARSE_ERROR => {
                ExitCode::InvalidArgument
            }
            Self::IO_ERROR => ExitCode::ExternalError,
            _ => ExitCode::GenericError,
        }
    }
}
