//! Delete jobs via oardel.

use crate::types::JobId;

/// Deletion is fire-and-forget: acceptance of the request is success,
/// not full termination of the job.
pub fn build_command(job_id: JobId) -> String {
    format!("oardel {job_id}")
}

/// The scheduler's confirmation text, trimmed.
pub fn parse_confirmation(stdout: &str) -> String {
    stdout.trim().to_string()
}
