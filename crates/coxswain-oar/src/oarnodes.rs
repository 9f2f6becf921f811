//! List cluster machines via oarnodes.

use crate::error::OarError;
use crate::record::take_string;
use crate::types::{Machine, MachineState};
use coxswain_parsers::non_blank_lines;
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

/// Plain hostname listing, one per line.
pub const LIST_COMMAND: &str = "oarnodes -l";

/// Full resource listing in JSON.
pub const DETAILED_COMMAND: &str = "oarnodes -J";

/// Hostnames from the plain listing, original order preserved.
pub fn parse_hostnames(stdout: &str) -> Vec<String> {
    non_blank_lines(stdout)
}

/// Decode the detailed listing into one `Machine` per distinct
/// hostname. Both output shapes OAR versions produce are accepted: a
/// map keyed by resource id and a flat array. OAR reports one record
/// per resource (core); the first record seen for a hostname wins, and
/// unrecognized properties are preserved opaquely.
pub fn parse_machines(stdout: &str) -> Result<Vec<Machine>, OarError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(trimmed).map_err(|e| OarError::Interpretation {
        operation: "oarnodes",
        detail: e.to_string(),
    })?;

    let records: Vec<(Option<String>, Value)> = match value {
        Value::Object(map) => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        Value::Array(items) => items.into_iter().map(|v| (None, v)).collect(),
        _ => {
            return Err(OarError::Interpretation {
                operation: "oarnodes",
                detail: "expected a JSON object or array of resources".to_string(),
            });
        }
    };

    let mut machines = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (key, record) in records {
        let Value::Object(mut map) = record else {
            return Err(OarError::Interpretation {
                operation: "oarnodes",
                detail: "resource record is not an object".to_string(),
            });
        };

        let hostname = take_string(&mut map, &["network_address", "host"])
            .or(key)
            .ok_or_else(|| OarError::Interpretation {
                operation: "oarnodes",
                detail: "resource record without a hostname".to_string(),
            })?;
        if !seen.insert(hostname.clone()) {
            continue;
        }

        let cluster = take_string(&mut map, &["cluster"])
            .or_else(|| hostname.split_once('-').map(|(prefix, _)| prefix.to_string()));
        let state = take_string(&mut map, &["state"])
            .map(|s| MachineState::parse(&s))
            .unwrap_or_else(|| MachineState::Unknown("unreported".to_string()));

        machines.push(Machine {
            hostname,
            cluster,
            state,
            properties: map,
        });
    }
    Ok(machines)
}

/// Distinct cluster labels across the listing, deduplicated and sorted
/// so the result is independent of input order.
pub fn derive_clusters(machines: &[Machine]) -> Vec<String> {
    let labels: BTreeSet<String> = machines.iter().filter_map(|m| m.cluster.clone()).collect();
    labels.into_iter().collect()
}
