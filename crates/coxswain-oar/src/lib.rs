//! OAR integration for coxswain.
//!
//! Builds injection-safe OAR command lines, hands them to the remote
//! executor, and interprets the semi-structured output into typed
//! machines, jobs, and walltime-change reports. One module per remote
//! tool: oarnodes, oarstat, oarsub, oardel, oarwalltime.

pub mod client;
pub mod error;
pub mod escape;
pub mod oardel;
pub mod oarnodes;
pub mod oarstat;
pub mod oarsub;
pub mod oarwalltime;
pub mod policy;
mod record;
pub mod types;

pub use client::OarClient;
pub use error::OarError;
pub use types::{
    Job, JobId, JobRequest, JobState, JobSubmission, Machine, MachineState, WalltimeChange,
    WalltimeChangeState,
};
