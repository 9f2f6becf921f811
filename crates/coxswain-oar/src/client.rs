//! High-level cluster operations.
//!
//! Each operation composes the same pipeline: build the command line,
//! execute it remotely, check the exit code against the operation's
//! policy, interpret the output. Calls are independent; nothing is
//! cached or shared between them.

use crate::error::OarError;
use crate::policy::{self, ExitOutcome};
use crate::types::{Job, JobId, JobRequest, JobSubmission, Machine, WalltimeChange};
use crate::{oardel, oarnodes, oarstat, oarsub, oarwalltime};
use coxswain_parsers::Walltime;
use coxswain_ssh::Executor;

pub struct OarClient<E> {
    exec: E,
}

impl<E: Executor> OarClient<E> {
    pub fn new(exec: E) -> Self {
        OarClient { exec }
    }

    /// Hostnames of every machine, in scheduler order.
    pub async fn list_machines(&self) -> Result<Vec<String>, OarError> {
        let output = self.exec.execute(oarnodes::LIST_COMMAND).await?;
        policy::OARNODES.check(&output)?;
        Ok(oarnodes::parse_hostnames(&output.stdout))
    }

    /// Every machine with state and resource properties.
    pub async fn list_machines_detailed(&self) -> Result<Vec<Machine>, OarError> {
        let output = self.exec.execute(oarnodes::DETAILED_COMMAND).await?;
        policy::OARNODES.check(&output)?;
        oarnodes::parse_machines(&output.stdout)
    }

    /// Distinct cluster labels, sorted.
    pub async fn list_clusters(&self) -> Result<Vec<String>, OarError> {
        Ok(oarnodes::derive_clusters(
            &self.list_machines_detailed().await?,
        ))
    }

    /// Submit a job. When clusters are named explicitly they are checked
    /// against the live cluster set first, so a typo fails as a
    /// validation error instead of an opaque scheduler rejection.
    pub async fn submit_job(&self, request: &JobRequest) -> Result<JobSubmission, OarError> {
        let command = oarsub::build_command(request)?;

        if !request.clusters.is_empty() {
            let known = self.list_clusters().await?;
            let unknown: Vec<&String> = request
                .clusters
                .iter()
                .filter(|c| !known.contains(c))
                .collect();
            if !unknown.is_empty() {
                return Err(OarError::Validation {
                    what: "cluster name",
                    detail: format!("unknown clusters {unknown:?}; available: {known:?}"),
                });
            }
        }

        tracing::debug!(command = %command, "submitting job");
        let output = self.exec.execute(&command).await?;
        policy::OARSUB.check(&output)?;
        oarsub::parse_submission(&output.stdout)
    }

    /// Request deletion. Success means the scheduler accepted the
    /// request, not that the job has fully terminated.
    pub async fn delete_job(&self, job_id: JobId) -> Result<String, OarError> {
        let output = self.exec.execute(&oardel::build_command(job_id)).await?;
        policy::OARDEL.check(&output)?;
        Ok(oardel::parse_confirmation(&output.stdout))
    }

    /// Current status of one job; None when the scheduler no longer
    /// knows it.
    pub async fn job_status(&self, job_id: JobId) -> Result<Option<Job>, OarError> {
        let output = self.exec.execute(&oarstat::status_command(job_id)).await?;
        if policy::OARSTAT.check(&output)? == ExitOutcome::Empty {
            return Ok(None);
        }
        oarstat::parse_job(&output.stdout)
    }

    /// Every job known to the scheduler.
    pub async fn list_all_jobs(&self) -> Result<Vec<Job>, OarError> {
        let output = self.exec.execute(oarstat::LIST_ALL_COMMAND).await?;
        if policy::OARSTAT.check(&output)? == ExitOutcome::Empty {
            return Ok(Vec::new());
        }
        oarstat::parse_jobs(&output.stdout)
    }

    /// Jobs of the calling remote user. Probes with the plain listing
    /// first: the JSON variant emits unparseable output when the user
    /// has no jobs.
    pub async fn list_my_jobs(&self) -> Result<Vec<Job>, OarError> {
        let probe = self.exec.execute(oarstat::LIST_MINE_PROBE_COMMAND).await?;
        if policy::OARSTAT.check(&probe)? == ExitOutcome::Empty || !oarstat::has_jobs(&probe.stdout)
        {
            return Ok(Vec::new());
        }

        let output = self.exec.execute(oarstat::LIST_MINE_COMMAND).await?;
        if policy::OARSTAT.check(&output)? == ExitOutcome::Empty {
            return Ok(Vec::new());
        }
        oarstat::parse_jobs(&output.stdout)
    }

    /// Ask for additional walltime on a running job.
    pub async fn extend_walltime(
        &self,
        job_id: JobId,
        additional: &Walltime,
        force: bool,
    ) -> Result<String, OarError> {
        let command = oarwalltime::extend_command(job_id, additional, force);
        let output = self.exec.execute(&command).await?;
        policy::OARWALLTIME.check(&output)?;
        Ok(output.stdout.trim().to_string())
    }

    /// Current walltime-change status for a job.
    pub async fn walltime_status(&self, job_id: JobId) -> Result<WalltimeChange, OarError> {
        let output = self
            .exec
            .execute(&oarwalltime::status_command(job_id))
            .await?;
        policy::OARWALLTIME.check(&output)?;
        oarwalltime::parse_status(job_id, &output.stdout)
    }
}
