//! AHU Common - alarm knowledge base and matching core.
//!
//! Give [`AlarmMatcher::diagnose`] a free-text BAS alarm message and get back
//! the ids of the known alarm categories it most likely describes, best
//! first. Everything here is synchronous and side-effect free; the knowledge
//! base is built once and shared read-only.

pub mod alarm_catalog;
pub mod config;
pub mod error;
pub mod knowledge_base;
pub mod matcher;
pub mod report;
pub mod similarity;

pub use config::AhuConfig;
pub use error::{ConfigError, KnowledgeBaseError};
pub use knowledge_base::{AlarmCategory, KnowledgeBase, Severity};
pub use matcher::{normalize, AlarmMatcher, CategoryMatch, MatchEvidence, MatchTier, MatcherSettings};
pub use report::DiagnosticReport;
