//! Shell escaping for remote command construction.
//!
//! Every user-supplied token goes through `shell_escape` (or a strict
//! character-class validation) before it is embedded in a command line.

/// Escape a string for safe use in a remote shell command line.
///
/// Wraps the value in single quotes and escapes embedded single quotes
/// with the `'\''` idiom. Values made of known-safe characters are
/// returned bare, so resource expressions like `nodes=2,walltime=1:00:00`
/// keep the form the scheduler documentation shows.
pub fn shell_escape(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.chars().all(is_safe_char) {
        return s.to_string();
    }
    let escaped = s.replace('\'', "'\\''");
    format!("'{}'", escaped)
}

fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | ',' | '+' | '%')
}

/// Cluster names end up inside OAR's property expression, where shell
/// quoting alone does not help; restrict them to identifier characters.
pub fn is_valid_cluster_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_escape_simple() {
        assert_eq!(shell_escape("hello"), "hello");
        assert_eq!(shell_escape("sleep 365d"), "'sleep 365d'");
        assert_eq!(shell_escape("nodes=2,walltime=1:00:00"), "nodes=2,walltime=1:00:00");
    }

    #[test]
    fn test_escape_empty() {
        assert_eq!(shell_escape(""), "''");
    }

    #[test]
    fn test_escape_single_quote() {
        assert_eq!(shell_escape("it's"), "'it'\\''s'");
    }

    #[test]
    fn test_escape_metacharacters() {
        assert_eq!(shell_escape("; rm -rf /"), "'; rm -rf /'");
        assert_eq!(shell_escape("`id`"), "'`id`'");
        assert_eq!(shell_escape("$(whoami)"), "'$(whoami)'");
    }

    /// Round-trip property: escape → shell interpretation → original
    /// literal value recovered, for hostile inputs.
    #[test]
    fn test_escape_round_trips_through_a_shell() {
        for hostile in [
            "; rm -rf /",
            "`id`",
            "$(whoami)",
            "it's a 'test'",
            "a && b || c > /tmp/x",
            "new\nline",
        ] {
            let output = Command::new("sh")
                .arg("-c")
                .arg(format!("printf %s {}", shell_escape(hostile)))
                .output()
                .expect("sh");
            assert_eq!(String::from_utf8_lossy(&output.stdout), hostile);
        }
    }

    #[test]
    fn test_cluster_name_validation() {
        assert!(is_valid_cluster_name("alakazam"));
        assert!(is_valid_cluster_name("gpu-node.2"));
        assert!(!is_valid_cluster_name(""));
        assert!(!is_valid_cluster_name("a'b"));
        assert!(!is_valid_cluster_name("x OR cluster='y"));
        assert!(!is_valid_cluster_name("$(whoami)"));
    }
}
