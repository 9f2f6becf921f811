//! Query jobs via oarstat.

use crate::error::OarError;
use crate::record::{take_i64, take_string, take_u64};
use crate::types::{Job, JobId, JobState};
use chrono::{DateTime, Utc};
use coxswain_parsers::non_empty_string;
use serde_json::Value;

/// Every job known to the scheduler, in JSON.
pub const LIST_ALL_COMMAND: &str = "oarstat -J";

/// Plain listing for the calling user. Used as a probe: the JSON
/// variant emits unparseable output when the user has no jobs.
pub const LIST_MINE_PROBE_COMMAND: &str = "oarstat -u";

/// JSON listing for the calling user.
pub const LIST_MINE_COMMAND: &str = "oarstat -u -J";

/// Status of one job, in JSON.
pub fn status_command(job_id: JobId) -> String {
    format!("oarstat -j {job_id} -J")
}

/// Whether the plain probe listing reports any jobs.
pub fn has_jobs(probe_stdout: &str) -> bool {
    !probe_stdout.trim().is_empty()
}

fn epoch_to_utc(secs: Option<i64>) -> Option<DateTime<Utc>> {
    // OAR reports 0 for "not yet".
    secs.filter(|s| *s > 0)
        .and_then(|s| DateTime::from_timestamp(s, 0))
}

/// Map one report record into a `Job`. Field names drift across OAR
/// versions; everything unrecognized survives in the extra bag.
fn job_from_record(key: Option<&str>, record: Value) -> Result<Job, OarError> {
    let Value::Object(mut map) = record else {
        return Err(OarError::Interpretation {
            operation: "oarstat",
            detail: "job record is not an object".to_string(),
        });
    };

    let id = take_u64(&mut map, &["id", "Job_Id", "job_id"])
        .or_else(|| key.and_then(|k| k.trim().parse().ok()))
        .ok_or_else(|| OarError::Interpretation {
            operation: "oarstat",
            detail: "job record without an identifier".to_string(),
        })?;

    let state = take_string(&mut map, &["state"])
        .map(|s| JobState::parse(&s))
        .unwrap_or_else(|| JobState::Unknown("unreported".to_string()));

    Ok(Job {
        id,
        state,
        owner: take_string(&mut map, &["owner"]).as_deref().and_then(non_empty_string),
        name: take_string(&mut map, &["name"]).as_deref().and_then(non_empty_string),
        command: take_string(&mut map, &["command"]).as_deref().and_then(non_empty_string),
        queue: take_string(&mut map, &["queue"]).as_deref().and_then(non_empty_string),
        submitted_at: epoch_to_utc(take_i64(&mut map, &["submissionTime", "submission_time"])),
        started_at: epoch_to_utc(take_i64(&mut map, &["startTime", "start_time"])),
        wanted_resources: take_string(&mut map, &["wanted_resources"])
            .as_deref()
            .and_then(non_empty_string),
        extra: map,
    })
}

/// Decode a JSON job listing. Accepts the map-keyed-by-id shape, the
/// `{"jobs": [...]}` shape, and a flat array.
pub fn parse_jobs(stdout: &str) -> Result<Vec<Job>, OarError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(trimmed).map_err(|e| OarError::Interpretation {
        operation: "oarstat",
        detail: e.to_string(),
    })?;

    let records: Vec<(Option<String>, Value)> = match value {
        Value::Object(mut map) => match map.remove("jobs") {
            Some(Value::Array(items)) => items.into_iter().map(|v| (None, v)).collect(),
            Some(other) => {
                return Err(OarError::Interpretation {
                    operation: "oarstat",
                    detail: format!("unexpected 'jobs' field shape: {other}"),
                });
            }
            None => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        },
        Value::Array(items) => items.into_iter().map(|v| (None, v)).collect(),
        _ => {
            return Err(OarError::Interpretation {
                operation: "oarstat",
                detail: "expected a JSON object or array of jobs".to_string(),
            });
        }
    };

    let mut jobs = Vec::with_capacity(records.len());
    for (key, record) in records {
        jobs.push(job_from_record(key.as_deref(), record)?);
    }
    Ok(jobs)
}

/// Decode a single-job status query. A job the scheduler no longer
/// knows comes back as None, not as a failure.
pub fn parse_job(stdout: &str) -> Result<Option<Job>, OarError> {
    Ok(parse_jobs(stdout)?.into_iter().next())
}
