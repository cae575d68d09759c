//! Flowmap-specific error codes
//!
//! Error codes follow the pattern: FLOW-{CATEGORY}-{3-digit number}
//!
//! Categories (1-4 uppercase letters):
//! - CLI: Argument errors (unknown commands, bad flags)
//! - PAR: Parse errors (unreadable syntax, grammar failures)
//! - SNAP: Snapshot errors (load, validation)
//! - HIST: Git history errors (repository access, revision lookup)
//! - IO: I/O errors (file access, permissions)
//!
//! Each error code is stable and should not be reused.

/// Invalid command-line arguments
pub const FLOW_CLI_001_INVALID_ARGUMENTS: &str = "FLOW-CLI-001";

/// Source file failed to parse
pub const FLOW_PAR_001_PARSE_FAILURE: &str = "FLOW-PAR-001";

/// Snapshot file not found or unreadable
pub const FLOW_SNAP_001_UNREADABLE: &str = "FLOW-SNAP-001";

/// Snapshot file is not valid snapshot JSON
pub const FLOW_SNAP_002_MALFORMED: &str = "FLOW-SNAP-002";

/// Path is not inside a git repository
pub const FLOW_HIST_001_NOT_A_REPOSITORY: &str = "FLOW-HIST-001";

/// Revision could not be resolved
pub const FLOW_HIST_002_BAD_REVISION: &str = "FLOW-HIST-002";

/// File not found on filesystem
pub const FLOW_IO_001_FILE_NOT_FOUND: &str = "FLOW-IO-001";

/// Error code documentation
///
/// # Argument Errors (FLOW-CLI-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | FLOW-CLI-001 | Invalid arguments | See `flowmap --help` for usage |
///
/// # Parse Errors (FLOW-PAR-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | FLOW-PAR-001 | Source file failed to parse | Fix the syntax error or exclude the file |
///
/// # Snapshot Errors (FLOW-SNAP-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | FLOW-SNAP-001 | Snapshot unreadable | Check the path and permissions |
/// | FLOW-SNAP-002 | Snapshot malformed | Re-run `flowmap analyze` to regenerate it |
///
/// # History Errors (FLOW-HIST-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | FLOW-HIST-001 | Not a git repository | Point --repo at a repository working tree |
/// | FLOW-HIST-002 | Bad revision | Check the revision spec with `git rev-parse` |
///
/// # I/O Errors (FLOW-IO-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | FLOW-IO-001 | File not found | Check the file path |
pub const ERROR_CODE_DOCUMENTATION: &str = "Error code documentation available in source";

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CODES: &[&str] = &[
        FLOW_CLI_001_INVALID_ARGUMENTS,
        FLOW_PAR_001_PARSE_FAILURE,
        FLOW_SNAP_001_UNREADABLE,
        FLOW_SNAP_002_MALFORMED,
        FLOW_HIST_001_NOT_A_REPOSITORY,
        FLOW_HIST_002_BAD_REVISION,
        FLOW_IO_001_FILE_NOT_FOUND,
    ];

    /// Verify all error codes are unique
    #[test]
    fn test_error_codes_are_unique() {
        let mut unique = std::collections::HashSet::new();
        for code in ALL_CODES {
            assert!(
                unique.insert(code),
                "Duplicate error code detected: {}",
                code
            );
        }
    }

    /// Verify error code format
    #[test]
    fn test_error_code_format() {
        for code in ALL_CODES {
            let parts: Vec<&str> = code.split('-').collect();
            assert_eq!(parts.len(), 3, "Invalid format: {}", code);
            assert_eq!(parts[0], "FLOW");
            assert!(
                parts[1].len() <= 4 && parts[1].chars().all(|c| c.is_ascii_uppercase()),
                "Invalid category: {}",
                code
            );
            assert_eq!(parts[2].len(), 3, "Invalid number: {}", code);
            assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
        }
    }
}
