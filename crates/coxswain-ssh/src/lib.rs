//! Remote command execution for coxswain.
//!
//! Runs single OAR command lines on the cluster frontend host over a
//! pre-authenticated SSH channel, with a hard wall-clock bound.

pub mod config;
pub mod executor;

pub use config::RemoteConfig;
pub use executor::{ExecError, ExecOutput, Executor, SshExecutor};
