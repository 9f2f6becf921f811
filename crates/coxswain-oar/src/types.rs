//! OAR domain types.

use crate::error::OarError;
use chrono::{DateTime, Utc};
use coxswain_parsers::Walltime;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Resource state as reported by oarnodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MachineState {
    Alive,
    Absent,
    Dead,
    Suspected,
    Unknown(String),
}

impl MachineState {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "alive" => MachineState::Alive,
            "absent" => MachineState::Absent,
            "dead" => MachineState::Dead,
            "suspected" => MachineState::Suspected,
            _ => MachineState::Unknown(s.to_string()),
        }
    }
}

/// A cluster machine. Produced fresh on every query, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Machine {
    pub hostname: String,

    /// Cluster label: the `cluster` resource property, or the hostname
    /// prefix before the first `-` when the property is absent.
    pub cluster: Option<String>,

    pub state: MachineState,

    /// Remaining resource properties (cpu count, memory, gpu, ...),
    /// preserved as reported.
    pub properties: Map<String, Value>,
}

/// Job state, including OAR's transitional states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum JobState {
    Waiting,
    Hold,
    ToLaunch,
    Launching,
    Running,
    Finishing,
    Suspended,
    Resuming,
    Terminated,
    Error,
    Unknown(String),
}

impl JobState {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "waiting" => JobState::Waiting,
            "hold" => JobState::Hold,
            "tolaunch" => JobState::ToLaunch,
            "launching" => JobState::Launching,
            "running" => JobState::Running,
            "finishing" => JobState::Finishing,
            "suspended" => JobState::Suspended,
            "resuming" => JobState::Resuming,
            "terminated" => JobState::Terminated,
            "error" => JobState::Error,
            _ => JobState::Unknown(s.to_string()),
        }
    }
}

/// A job as reported by oarstat. State of record lives on the
/// scheduler; every query re-fetches it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: u64,
    pub state: JobState,
    pub owner: Option<String>,
    pub name: Option<String>,
    pub command: Option<String>,
    pub queue: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,

    /// Requested resources as the scheduler echoes them back.
    pub wanted_resources: Option<String>,

    /// Unrecognized report fields, preserved for forward compatibility.
    pub extra: Map<String, Value>,
}

/// Validated scheduler-assigned job identifier: a positive integer.
/// Anything else is rejected before a command line is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct JobId(u64);

impl JobId {
    pub fn new(raw: u64) -> Result<Self, OarError> {
        if raw == 0 {
            return Err(OarError::Validation {
                what: "job id",
                detail: "must be a positive integer".to_string(),
            });
        }
        Ok(JobId(raw))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = OarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s.trim().parse().map_err(|_| OarError::Validation {
            what: "job id",
            detail: format!("'{s}' is not a positive integer"),
        })?;
        JobId::new(raw)
    }
}

/// Parameters for a job submission.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    /// Clusters the job may land on; empty means any.
    pub clusters: Vec<String>,
    pub nodes: u32,
    pub walltime: Walltime,
    /// Command executed on the allocation.
    pub command: String,
    pub name: Option<String>,
    /// Request the preemptible best-effort job class.
    pub best_effort: bool,
}

impl Default for JobRequest {
    fn default() -> Self {
        JobRequest {
            clusters: Vec::new(),
            nodes: 1,
            walltime: Walltime::default(),
            command: "sleep 365d".to_string(),
            name: None,
            best_effort: false,
        }
    }
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobSubmission {
    pub id: u64,
}

/// State of a walltime-change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WalltimeChangeState {
    Pending,
    Applied,
    Rejected,
}

/// A walltime-change report for one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalltimeChange {
    pub job_id: u64,
    pub state: WalltimeChangeState,
    /// Increase already granted by the scheduler, when reported.
    pub granted: Option<Walltime>,
    /// Increase still pending, when reported.
    pub requested: Option<Walltime>,
    /// Raw key/value fields of the report.
    pub fields: BTreeMap<String, String>,
}
