//! Field extraction from semi-structured JSON records.
//!
//! OAR's JSON field names drift across versions, so each typed field is
//! pulled out of the record under its known spellings; whatever remains
//! is preserved opaquely by the caller.

use serde_json::{Map, Value};

/// Remove the first present key and read it as a string. Numbers are
/// accepted and rendered; null counts as absent.
pub(crate) fn take_string(map: &mut Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        match map.remove(*key) {
            Some(Value::String(s)) => return Some(s),
            Some(Value::Number(n)) => return Some(n.to_string()),
            Some(Value::Null) | None => continue,
            Some(other) => {
                // Unexpected shape: keep it for the opaque bag.
                map.insert((*key).to_string(), other);
                return None;
            }
        }
    }
    None
}

/// Remove the first present key and read it as an unsigned integer.
/// Accepts numbers and decimal strings.
pub(crate) fn take_u64(map: &mut Map<String, Value>, keys: &[&str]) -> Option<u64> {
    for key in keys {
        match map.remove(*key) {
            Some(Value::Number(n)) => return n.as_u64(),
            Some(Value::String(s)) => return s.trim().parse().ok(),
            Some(Value::Null) | None => continue,
            Some(other) => {
                map.insert((*key).to_string(), other);
                return None;
            }
        }
    }
    None
}

/// Remove the first present key and read it as a signed integer.
pub(crate) fn take_i64(map: &mut Map<String, Value>, keys: &[&str]) -> Option<i64> {
    for key in keys {
        match map.remove(*key) {
            Some(Value::Number(n)) => return n.as_i64(),
            Some(Value::String(s)) => return s.trim().parse().ok(),
            Some(Value::Null) | None => continue,
            Some(other) => {
                map.insert((*key).to_string(), other);
                return None;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Map<String, Value> {
        match json!({
            "state": "Running",
            "Job_Id": 4528,
            "submissionTime": "1754000000",
            "unset": null,
            "types": ["besteffort"]
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_take_string_prefers_first_present_key() {
        let mut map = record();
        assert_eq!(
            take_string(&mut map, &["status", "state"]).as_deref(),
            Some("Running")
        );
        assert!(!map.contains_key("state"));
    }

    #[test]
    fn test_take_string_skips_null() {
        let mut map = record();
        assert_eq!(take_string(&mut map, &["unset"]), None);
    }

    #[test]
    fn test_take_u64_from_number_or_string() {
        let mut map = record();
        assert_eq!(take_u64(&mut map, &["Job_Id"]), Some(4528));
        assert_eq!(take_i64(&mut map, &["submissionTime"]), Some(1754000000));
    }

    #[test]
    fn test_unexpected_shape_is_left_in_place() {
        let mut map = record();
        assert_eq!(take_string(&mut map, &["types"]), None);
        assert!(map.contains_key("types"));
    }
}
