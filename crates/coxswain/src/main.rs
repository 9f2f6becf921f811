//! Coxswain - OAR cluster management from the command line.

mod cli;

use clap::Parser;
use cli::{Args, Command};
use coxswain_oar::{JobRequest, OarClient};
use coxswain_ssh::{RemoteConfig, SshExecutor};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.host {
        Some(host) => RemoteConfig::new(host),
        None => RemoteConfig::from_env(),
    }
    .with_timeout(Duration::from_secs(args.timeout));

    let client = OarClient::new(SshExecutor::new(config));

    match args.command {
        Command::Machines { detailed: false } => {
            for hostname in client.list_machines().await.into_diagnostic()? {
                println!("{hostname}");
            }
        }
        Command::Machines { detailed: true } => {
            print_json(&client.list_machines_detailed().await.into_diagnostic()?)?;
        }
        Command::Clusters => {
            for cluster in client.list_clusters().await.into_diagnostic()? {
                println!("{cluster}");
            }
        }
        Command::Jobs { mine } => {
            let jobs = if mine {
                client.list_my_jobs().await
            } else {
                client.list_all_jobs().await
            };
            print_json(&jobs.into_diagnostic()?)?;
        }
        Command::Status { job_id } => match client.job_status(job_id).await.into_diagnostic()? {
            Some(job) => print_json(&job)?,
            None => println!("job {job_id} not found"),
        },
        Command::Submit {
            cluster,
            nodes,
            walltime,
            command,
            name,
            best_effort,
        } => {
            let request = JobRequest {
                clusters: cluster,
                nodes,
                walltime,
                command,
                name,
                best_effort,
            };
            print_json(&client.submit_job(&request).await.into_diagnostic()?)?;
        }
        Command::Delete { job_id } => {
            println!("{}", client.delete_job(job_id).await.into_diagnostic()?);
        }
        Command::Extend {
            job_id,
            time,
            force,
        } => {
            println!(
                "{}",
                client
                    .extend_walltime(job_id, &time, force)
                    .await
                    .into_diagnostic()?
            );
        }
        Command::WalltimeStatus { job_id } => {
            print_json(&client.walltime_status(job_id).await.into_diagnostic()?)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).into_diagnostic()?
    );
    Ok(())
}
