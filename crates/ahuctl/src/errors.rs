//! Error codes and exit status for ahuctl
//!
//! "No match" is a normal diagnosis and exits with success.

use ahu_common::{ConfigError, KnowledgeBaseError};

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors (unknown alarm id, I/O)
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the alarm text is blank
pub const EXIT_EMPTY_INPUT: i32 = 64;

/// Exit code when the knowledge base or config cannot be used
pub const EXIT_INVALID_SETUP: i32 = 65;

/// Map a failed command to its exit code
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<KnowledgeBaseError>().is_some()
        || err.downcast_ref::<ConfigError>().is_some()
    {
        EXIT_INVALID_SETUP
    } else {
        EXIT_GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_setup_errors_map_to_invalid_setup() {
        let err: anyhow::Error = KnowledgeBaseError::DuplicateId("x".to_string()).into();
        assert_eq!(exit_code_for(&err), EXIT_INVALID_SETUP);

        let wrapped = Err::<(), _>(ConfigError::InvalidMatcher("bad".to_string()))
            .context("Failed to load config")
            .unwrap_err();
        assert_eq!(exit_code_for(&wrapped), EXIT_INVALID_SETUP);
    }

    #[test]
    fn test_other_errors_are_general() {
        let err = anyhow::anyhow!("Unknown alarm id: nope");
        assert_eq!(exit_code_for(&err), EXIT_GENERAL_ERROR);
    }
}
