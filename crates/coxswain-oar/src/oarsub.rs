//! Submit jobs via oarsub.

use crate::error::OarError;
use crate::escape::{is_valid_cluster_name, shell_escape};
use crate::types::{JobRequest, JobSubmission};
use once_cell::sync::Lazy;
use regex::Regex;

/// oarsub confirms a submission with `OAR_JOB_ID=<n>` on stdout.
static JOB_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"OAR_JOB_ID=(\d+)").unwrap());

/// Resource selection for the `-l` switch: an OR-combination over the
/// requested clusters, then node count and walltime.
fn resource_expression(request: &JobRequest) -> String {
    let tail = format!("nodes={},walltime={}", request.nodes, request.walltime);
    match request.clusters.as_slice() {
        [] => tail,
        [single] => format!("{{cluster='{single}'}}/{tail}"),
        many => {
            let constraint = many
                .iter()
                .map(|c| format!("cluster='{c}'"))
                .collect::<Vec<_>>()
                .join(" OR ");
            format!("{{({constraint})}}/{tail}")
        }
    }
}

/// Build the submission command line. All validation happens here,
/// before anything reaches the remote shell; the walltime is already
/// validated by its type.
pub fn build_command(request: &JobRequest) -> Result<String, OarError> {
    if request.nodes == 0 {
        return Err(OarError::Validation {
            what: "node count",
            detail: "must be at least 1".to_string(),
        });
    }
    for cluster in &request.clusters {
        if !is_valid_cluster_name(cluster) {
            return Err(OarError::Validation {
                what: "cluster name",
                detail: format!("'{cluster}' contains characters outside [A-Za-z0-9_.-]"),
            });
        }
    }
    if request.command.trim().is_empty() {
        return Err(OarError::Validation {
            what: "command",
            detail: "must not be empty".to_string(),
        });
    }

    let mut parts = vec![
        "oarsub".to_string(),
        "-l".to_string(),
        shell_escape(&resource_expression(request)),
    ];
    if let Some(name) = &request.name {
        parts.push("-n".to_string());
        parts.push(shell_escape(name));
    }
    if request.best_effort {
        parts.push("-t".to_string());
        parts.push("besteffort".to_string());
    }
    parts.push(shell_escape(&request.command));
    Ok(parts.join(" "))
}

/// Extract the scheduler-assigned identifier from the submission
/// output. The scheduler returns it synchronously; output without one
/// means the submission cannot be tracked and is reported as such.
pub fn parse_submission(stdout: &str) -> Result<JobSubmission, OarError> {
    let caps = JOB_ID_RE
        .captures(stdout)
        .ok_or_else(|| OarError::Interpretation {
            operation: "oarsub",
            detail: "no OAR_JOB_ID in submission output".to_string(),
        })?;
    let id = caps[1].parse().map_err(|_| OarError::Interpretation {
        operation: "oarsub",
        detail: format!("job identifier '{}' out of range", &caps[1]),
    })?;
    Ok(JobSubmission { id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use coxswain_parsers::Walltime;

    fn request() -> JobRequest {
        JobRequest::default()
    }

    #[test]
    fn test_build_defaults() {
        let line = build_command(&request()).unwrap();
        assert_eq!(line, "oarsub -l nodes=1,walltime=1:00:00 'sleep 365d'");
    }

    #[test]
    fn test_build_single_cluster() {
        let req = JobRequest {
            clusters: vec!["alakazam".to_string()],
            command: "hostname".to_string(),
            ..request()
        };
        assert_eq!(
            build_command(&req).unwrap(),
            "oarsub -l '{cluster='\\''alakazam'\\''}/nodes=1,walltime=1:00:00' hostname"
        );
    }

    #[test]
    fn test_build_multi_cluster_scenario() {
        let req = JobRequest {
            clusters: vec!["alakazam".to_string(), "bulbasaur".to_string()],
            nodes: 4,
            walltime: Walltime::parse("2:00:00").unwrap(),
            command: "mpi_program".to_string(),
            name: Some("multi-cluster-job".to_string()),
            best_effort: false,
        };
        let line = build_command(&req).unwrap();
        assert_eq!(
            line,
            "oarsub -l '{(cluster='\\''alakazam'\\'' OR cluster='\\''bulbasaur'\\'')}/nodes=4,walltime=2:00:00' -n multi-cluster-job mpi_program"
        );
    }

    #[test]
    fn test_build_best_effort_and_name() {
        let req = JobRequest {
            name: Some("night run".to_string()),
            best_effort: true,
            ..request()
        };
        let line = build_command(&req).unwrap();
        assert!(line.contains("-n 'night run'"));
        assert!(line.ends_with("-t besteffort 'sleep 365d'"));
    }

    #[test]
    fn test_build_escapes_hostile_command() {
        let req = JobRequest {
            command: "; rm -rf /".to_string(),
            ..request()
        };
        let line = build_command(&req).unwrap();
        assert!(line.ends_with("'; rm -rf /'"));
    }

    #[test]
    fn test_build_rejects_zero_nodes() {
        let req = JobRequest {
            nodes: 0,
            ..request()
        };
        assert!(matches!(
            build_command(&req),
            Err(OarError::Validation { what: "node count", .. })
        ));
    }

    #[test]
    fn test_build_rejects_hostile_cluster_name() {
        let req = JobRequest {
            clusters: vec!["x' OR owner='root".to_string()],
            ..request()
        };
        assert!(matches!(
            build_command(&req),
            Err(OarError::Validation { what: "cluster name", .. })
        ));
    }

    #[test]
    fn test_build_rejects_empty_command() {
        let req = JobRequest {
            command: "  ".to_string(),
            ..request()
        };
        assert!(matches!(
            build_command(&req),
            Err(OarError::Validation { what: "command", .. })
        ));
    }

    #[test]
    fn test_parse_submission() {
        let stdout = "[ADMISSION RULE] Set default walltime to 3600.\nOAR_JOB_ID=4529\n";
        assert_eq!(parse_submission(stdout).unwrap(), JobSubmission { id: 4529 });
    }

    #[test]
    fn test_parse_submission_without_id() {
        let err = parse_submission("Generate a job key...\n").unwrap_err();
        assert!(matches!(err, OarError::Interpretation { .. }));
    }
}
