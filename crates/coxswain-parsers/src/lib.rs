//! Shared parsing utilities for OAR command output.
//!
//! This crate provides the small text helpers used across the
//! coxswain crates: walltime handling and line/field cleanup.

pub mod walltime;

pub use walltime::{Walltime, WalltimeError};

/// Filter helper for optional string fields.
/// Returns None if the string is empty or a placeholder value.
pub fn non_empty_string(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "N/A" || trimmed == "Unknown" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split command output on line boundaries, dropping blank lines.
/// Original line order is preserved.
pub fn non_blank_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_string() {
        assert_eq!(non_empty_string("hello"), Some("hello".to_string()));
        assert_eq!(non_empty_string("  hello  "), Some("hello".to_string()));
        assert_eq!(non_empty_string(""), None);
        assert_eq!(non_empty_string("-"), None);
        assert_eq!(non_empty_string("N/A"), None);
    }

    #[test]
    fn test_non_blank_lines() {
        let output = "node-1\n\n  node-2  \n\nnode-3\n";
        assert_eq!(non_blank_lines(output), vec!["node-1", "node-2", "node-3"]);
        assert!(non_blank_lines("").is_empty());
        assert!(non_blank_lines("\n  \n").is_empty());
    }
}
