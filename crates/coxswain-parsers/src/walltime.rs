//! Walltime handling for job requests and scheduler reports.
//!
//! OAR exchanges walltimes as `h:mm:ss` text. The textual form is kept
//! end to end; conversion to seconds exists only for component validation
//! and zero checks.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalltimeError {
    #[error("invalid walltime '{0}': expected h:mm:ss (e.g. '1:30:00')")]
    Malformed(String),
    #[error("invalid walltime '{0}': minutes and seconds must be below 60")]
    OutOfRange(String),
}

/// Strict request form: 1-2 hour digits, exactly two minute/second digits.
static REQUEST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}:\d{2}$").unwrap());

/// Scheduler reports are sloppier (`2:0:0`, leading `+` on pending deltas).
static REPORTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?(\d{1,3}):(\d{1,2}):(\d{1,2})$").unwrap());

/// A walltime in `h:mm:ss` text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Walltime(String);

impl Walltime {
    /// Parse a user-supplied walltime. Strict: `h:mm:ss` with two-digit
    /// minutes and seconds, both below 60.
    pub fn parse(s: &str) -> Result<Self, WalltimeError> {
        let trimmed = s.trim();
        if !REQUEST_RE.is_match(trimmed) {
            return Err(WalltimeError::Malformed(s.to_string()));
        }
        check_components(trimmed).ok_or_else(|| WalltimeError::OutOfRange(s.to_string()))?;
        Ok(Walltime(trimmed.to_string()))
    }

    /// Read a walltime as reported by the scheduler, which prints
    /// single-digit components and a leading `+` on pending increases.
    /// Returns None when the text is not a walltime at all.
    pub fn parse_reported(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        REPORTED_RE.captures(trimmed)?;
        let text = trimmed.trim_start_matches('+');
        check_components(text)?;
        Some(Walltime(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Total seconds. For validation and zero checks only; the textual
    /// form is what crosses the wire.
    pub fn total_seconds(&self) -> u64 {
        let mut parts = self.0.split(':').map(|p| p.parse::<u64>().unwrap_or(0));
        let h = parts.next().unwrap_or(0);
        let m = parts.next().unwrap_or(0);
        let s = parts.next().unwrap_or(0);
        h * 3600 + m * 60 + s
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

/// Validate minute/second ranges; returns the parsed components' total.
fn check_components(s: &str) -> Option<u64> {
    let parts: Vec<u64> = s.split(':').filter_map(|p| p.parse().ok()).collect();
    if parts.len() != 3 {
        return None;
    }
    if parts[1] >= 60 || parts[2] >= 60 {
        return None;
    }
    Some(parts[0] * 3600 + parts[1] * 60 + parts[2])
}

impl fmt::Display for Walltime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for Walltime {
    fn default() -> Self {
        Walltime("1:00:00".to_string())
    }
}

impl FromStr for Walltime {
    type Err = WalltimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Walltime::parse(s)
    }
}
