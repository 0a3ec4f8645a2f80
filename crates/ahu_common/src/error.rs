//! Error types for the AHU alarm doctor.
//!
//! Matching itself never fails. Everything here is a startup problem:
//! a malformed knowledge base or an unreadable config file.

use std::path::PathBuf;
use thiserror::Error;

/// Knowledge base construction/validation failures
#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("Alarm category with empty id at position {0}")]
    EmptyId(usize),

    #[error("Duplicate alarm category id: {0}")]
    DuplicateId(String),

    #[error("Alarm category '{0}' has no keywords")]
    NoKeywords(String),

    #[error("Alarm category '{0}' has no reasons")]
    NoReasons(String),

    #[error("Alarm category '{0}' has no actions")]
    NoActions(String),

    #[error("Alarm category '{0}' has a blank keyword")]
    BlankKeyword(String),

    #[error("Cannot read knowledge base {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse knowledge base {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot serialize knowledge base: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl KnowledgeBaseError {
    /// Stable short code, used in logs and JSON error output
    pub fn code(&self) -> &'static str {
        match self {
            KnowledgeBaseError::EmptyId(_) => "kb_empty_id",
            KnowledgeBaseError::DuplicateId(_) => "kb_duplicate_id",
            KnowledgeBaseError::NoKeywords(_) => "kb_no_keywords",
            KnowledgeBaseError::NoReasons(_) => "kb_no_reasons",
            KnowledgeBaseError::NoActions(_) => "kb_no_actions",
            KnowledgeBaseError::BlankKeyword(_) => "kb_blank_keyword",
            KnowledgeBaseError::Io { .. } => "kb_io",
            KnowledgeBaseError::Parse { .. } => "kb_parse",
            KnowledgeBaseError::Serialize(_) => "kb_serialize",
        }
    }
}

/// Configuration failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid matcher settings: {0}")]
    InvalidMatcher(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_category() {
        let err = KnowledgeBaseError::DuplicateId("fan_failure".to_string());
        assert_eq!(err.to_string(), "Duplicate alarm category id: fan_failure");
        assert_eq!(err.code(), "kb_duplicate_id");

        let err = KnowledgeBaseError::NoReasons("co2_high".to_string());
        assert!(err.to_string().contains("co2_high"));
    }

    #[test]
    fn test_parse_error_keeps_cause_out_of_message() {
        let source = toml::from_str::<toml::Value>("[broken").unwrap_err();
        let cause = source.to_string();
        let err = ConfigError::Parse {
            path: PathBuf::from("/etc/ahu/config.toml"),
            source,
        };
        assert_eq!(err.to_string(), "Cannot parse config /etc/ahu/config.toml");
        assert_eq!(
            std::error::Error::source(&err).map(|s| s.to_string()),
            Some(cause)
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidMatcher("fuzzy_cutoff must be within [0, 1]".to_string());
        assert!(err.to_string().starts_with("Invalid matcher settings"));
    }
}
