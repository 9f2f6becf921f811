//! Failure taxonomy for cluster operations.
//!
//! Every failure is scoped to the single call that produced it; nothing
//! here is fatal to the process.

use coxswain_ssh::ExecError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OarError {
    /// Bad input, rejected before any remote call.
    #[error("invalid {what}: {detail}")]
    Validation { what: &'static str, detail: String },

    /// Channel, authentication, or network failure.
    #[error("connection to {host} failed: {detail}")]
    Connection { host: String, detail: String },

    /// The remote command exceeded its wall-clock bound.
    #[error("remote command timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// Non-zero exit not covered by the operation's empty-result rule.
    /// The diagnostic, when present, has been sanitized.
    #[error("{operation} failed with exit code {exit_code}{}", diagnostic_suffix(.diagnostic))]
    RemoteCommand {
        operation: &'static str,
        exit_code: i32,
        diagnostic: Option<String>,
    },

    /// Output did not match the expected shape.
    #[error("could not interpret {operation} output: {detail}")]
    Interpretation {
        operation: &'static str,
        detail: String,
    },
}

impl From<ExecError> for OarError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::Connection { host, detail } => OarError::Connection { host, detail },
            ExecError::Timeout { timeout } => OarError::Timeout { timeout },
        }
    }
}

fn diagnostic_suffix(diagnostic: &Option<String>) -> String {
    match diagnostic {
        Some(d) => format!(": {d}"),
        None => String::new(),
    }
}

/// Tokens that could leak filesystem layout or account@host details.
static SENSITIVE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S*[/@]\S*").unwrap());

const MAX_DIAGNOSTIC_CHARS: usize = 120;

/// Reduce remote stderr to a caller-safe diagnostic: first non-empty
/// line, path and user@host tokens redacted, truncated. Returns None
/// when nothing survives.
pub fn sanitize_diagnostic(stderr: &str) -> Option<String> {
    let line = stderr.lines().map(str::trim).find(|l| !l.is_empty())?;
    let scrubbed = SENSITIVE_TOKEN.replace_all(line, "<redacted>");
    let text: String = scrubbed.trim().chars().take(MAX_DIAGNOSTIC_CHARS).collect();
    if text.is_empty() { None } else { Some(text) }
}
