//! Request and inspect walltime changes via oarwalltime.

use crate::error::OarError;
use crate::escape::shell_escape;
use crate::types::{JobId, WalltimeChange, WalltimeChangeState};
use coxswain_parsers::Walltime;
use std::collections::BTreeMap;

/// Request additional walltime. `--force` asks the scheduler to apply
/// the change without waiting for a favorable slot.
pub fn extend_command(job_id: JobId, additional: &Walltime, force: bool) -> String {
    let mut command = format!("oarwalltime {job_id} +{}", shell_escape(additional.as_str()));
    if force {
        command.push_str(" --force");
    }
    command
}

/// Query the current walltime-change status of a job.
pub fn status_command(job_id: JobId) -> String {
    format!("oarwalltime {job_id}")
}

/// Parse the walltime-change report.
///
/// The report is `Key: value` lines, e.g.
///
/// ```text
/// Walltime change status for job 4528 (job is running):
///   Current walltime:      2:0:0
///   Possible increase:   UNLIMITED
///   Already granted:       0:0:0
///   Pending/unsatisfied:  +1:0:0
/// ```
///
/// There is no single status word; the three-state outcome is derived:
/// a rejection marker wins, else a non-zero pending delta means the
/// change is still pending, else a granted value means it was applied.
/// A report with none of those is an interpretation failure.
pub fn parse_status(job_id: JobId, stdout: &str) -> Result<WalltimeChange, OarError> {
    let mut fields = BTreeMap::new();
    for line in stdout.lines() {
        if let Some((key, value)) = line.trim().split_once(':') {
            let value = value.trim();
            if !value.is_empty() {
                fields.insert(key.trim().to_ascii_lowercase(), value.to_string());
            }
        }
    }

    let lookup = |needle: &str| {
        fields
            .iter()
            .find(|(key, _)| key.contains(needle))
            .map(|(_, value)| value.as_str())
    };

    let granted = lookup("granted").and_then(Walltime::parse_reported);
    let requested = lookup("pending")
        .or_else(|| lookup("unsatisfied"))
        .and_then(Walltime::parse_reported);

    let lowered = stdout.to_ascii_lowercase();
    let rejected = lowered.contains("rejected") || lowered.contains("refused");

    let state = if rejected {
        WalltimeChangeState::Rejected
    } else if requested.as_ref().is_some_and(|w| !w.is_zero()) {
        WalltimeChangeState::Pending
    } else if granted.is_some() {
        WalltimeChangeState::Applied
    } else {
        return Err(OarError::Interpretation {
            operation: "oarwalltime",
            detail: "unrecognized walltime change report".to_string(),
        });
    };

    Ok(WalltimeChange {
        job_id: job_id.value(),
        state,
        granted,
        requested,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_id() -> JobId {
        "4528".parse().unwrap()
    }

    #[test]
    fn test_extend_command_without_force() {
        let extra = Walltime::parse("2:00:00").unwrap();
        assert_eq!(
            extend_command("12345".parse().unwrap(), &extra, false),
            "oarwalltime 12345 +2:00:00"
        );
    }

    #[test]
    fn test_extend_command_with_force() {
        let extra = Walltime::parse("1:00:00").unwrap();
        assert_eq!(
            extend_command("12345".parse().unwrap(), &extra, true),
            "oarwalltime 12345 +1:00:00 --force"
        );
    }

    #[test]
    fn test_status_command() {
        assert_eq!(status_command(job_id()), "oarwalltime 4528");
    }

    #[test]
    fn test_parse_pending_report() {
        let stdout = "\
Walltime change status for job 4528 (job is running):
  Current walltime:      2:0:0
  Possible increase:   UNLIMITED
  Already granted:       0:0:0
  Pending/unsatisfied:  +1:30:00
";
        let change = parse_status(job_id(), stdout).unwrap();
        assert_eq!(change.state, WalltimeChangeState::Pending);
        assert_eq!(change.requested.unwrap().as_str(), "1:30:00");
        assert_eq!(change.granted.unwrap().as_str(), "0:0:0");
        assert_eq!(change.job_id, 4528);
    }

    #[test]
    fn test_parse_applied_report() {
        let stdout = "\
Walltime change status for job 4528 (job is running):
  Current walltime:      3:30:0
  Already granted:      +1:30:00
  Pending/unsatisfied:   0:0:0
";
        let change = parse_status(job_id(), stdout).unwrap();
        assert_eq!(change.state, WalltimeChangeState::Applied);
        assert_eq!(change.granted.unwrap().as_str(), "1:30:00");
    }

    #[test]
    fn test_parse_rejected_report() {
        let stdout = "\
Walltime change status for job 4528:
  Last request:         rejected (walltime increase is disabled)
  Already granted:       0:0:0
";
        let change = parse_status(job_id(), stdout).unwrap();
        assert_eq!(change.state, WalltimeChangeState::Rejected);
    }

    #[test]
    fn test_parse_unrecognized_report_is_interpretation_failure() {
        let err = parse_status(job_id(), "no walltime change request\n").unwrap_err();
        assert!(matches!(err, OarError::Interpretation { .. }));
    }

    #[test]
    fn test_parse_keeps_raw_fields() {
        let stdout = "  Possible increase: UNLIMITED\n  Already granted: 0:0:0\n";
        let change = parse_status(job_id(), stdout).unwrap();
        assert_eq!(
            change.fields.get("possible increase").map(String::as_str),
            Some("UNLIMITED")
        );
    }
}
