//! Per-operation exit-code handling.
//!
//! The remote CLI uses non-zero exits both for real failures and for
//! "nothing matched". Which is which depends on the tool, so the mapping
//! is encoded as data here rather than inline conditionals.

use crate::error::{OarError, sanitize_diagnostic};
use coxswain_ssh::ExecOutput;

/// How one operation maps remote exit codes to outcomes.
#[derive(Debug, Clone, Copy)]
pub struct ExitPolicy {
    pub operation: &'static str,
    /// Exit codes meaning "nothing matched" rather than failure.
    pub empty_result: &'static [i32],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    /// The operation ran but found nothing; a valid empty result.
    Empty,
}

pub const OARNODES: ExitPolicy = ExitPolicy {
    operation: "oarnodes",
    empty_result: &[],
};

/// oarstat exits 1 for an unknown job or an empty report; a status
/// query must be able to answer "gone" without erroring.
pub const OARSTAT: ExitPolicy = ExitPolicy {
    operation: "oarstat",
    empty_result: &[1],
};

pub const OARSUB: ExitPolicy = ExitPolicy {
    operation: "oarsub",
    empty_result: &[],
};

/// Deleting or retouching an unknown job is a caller error, surfaced.
pub const OARDEL: ExitPolicy = ExitPolicy {
    operation: "oardel",
    empty_result: &[],
};

pub const OARWALLTIME: ExitPolicy = ExitPolicy {
    operation: "oarwalltime",
    empty_result: &[],
};

impl ExitPolicy {
    /// Classify a completed execution. Non-zero exits outside the
    /// operation's empty-result set become sanitized failures.
    pub fn check(&self, output: &ExecOutput) -> Result<ExitOutcome, OarError> {
        if output.success() {
            return Ok(ExitOutcome::Success);
        }
        if self.empty_result.contains(&output.exit_code) {
            return Ok(ExitOutcome::Empty);
        }
        Err(OarError::RemoteCommand {
            operation: self.operation,
            exit_code: output.exit_code,
            diagnostic: sanitize_diagnostic(&output.stderr),
        })
    }
}
