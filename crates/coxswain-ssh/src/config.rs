//! Frontend host configuration.

use std::time::Duration;

/// Environment variable overriding the frontend hostname.
pub const HOSTNAME_ENV: &str = "CLUSTER_HOSTNAME";

/// Hostname used when no override is configured.
pub const DEFAULT_HOSTNAME: &str = "cluster";

/// Wall-clock bound on a single remote command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// The single remote target every command is executed on.
///
/// Constructed once at startup and injected into the executor, so tests
/// can supply a fake target instead of reading ambient environment state
/// at call time.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub hostname: String,
    pub command_timeout: Duration,
}

impl RemoteConfig {
    pub fn new(hostname: impl Into<String>) -> Self {
        RemoteConfig {
            hostname: hostname.into(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Read the hostname override from the environment. Intended to be
    /// called once at process startup.
    pub fn from_env() -> Self {
        match std::env::var(HOSTNAME_ENV) {
            Ok(host) if !host.trim().is_empty() => RemoteConfig::new(host.trim()),
            _ => RemoteConfig::new(DEFAULT_HOSTNAME),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig::new(DEFAULT_HOSTNAME)
    }
}
