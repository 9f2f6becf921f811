//! CLI argument parsing for coxswain.

use clap::{Parser, Subcommand};
use coxswain_oar::JobId;
use coxswain_parsers::Walltime;

#[derive(Parser, Debug)]
#[command(name = "coxswain")]
#[command(about = "Manage cluster jobs on the OAR frontend over SSH")]
pub struct Args {
    /// Frontend hostname (defaults to $CLUSTER_HOSTNAME, then "cluster")
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Remote command timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List machine hostnames, or full resource details with --detailed
    Machines {
        #[arg(long)]
        detailed: bool,
    },
    /// List distinct cluster names
    Clusters,
    /// List jobs
    Jobs {
        /// Only jobs of the calling remote user
        #[arg(long)]
        mine: bool,
    },
    /// Show the status of one job
    Status { job_id: JobId },
    /// Submit a new job
    Submit {
        /// Cluster to select from; repeat the flag for an OR-combination
        #[arg(long = "cluster")]
        cluster: Vec<String>,

        /// Number of nodes to request
        #[arg(long, default_value = "1")]
        nodes: u32,

        /// Walltime in h:mm:ss
        #[arg(long, default_value = "1:00:00")]
        walltime: Walltime,

        /// Command to execute on the allocation
        #[arg(long, default_value = "sleep 365d")]
        command: String,

        /// Job name
        #[arg(long)]
        name: Option<String>,

        /// Submit as a preemptible best-effort job
        #[arg(long)]
        best_effort: bool,
    },
    /// Delete a job
    Delete { job_id: JobId },
    /// Add walltime to a job
    Extend {
        job_id: JobId,

        /// Additional time in h:mm:ss
        time: Walltime,

        /// Ask the scheduler to apply the change immediately
        #[arg(long)]
        force: bool,
    },
    /// Show the walltime-change status of a job
    WalltimeStatus { job_id: JobId },
}
