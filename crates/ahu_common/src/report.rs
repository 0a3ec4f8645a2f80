//! Diagnostic report - what a diagnosis looks like once resolved against the
//! knowledge base, plus the copyable plain-text summary.

use crate::knowledge_base::AlarmCategory;
use crate::matcher::{AlarmMatcher, MatchEvidence, MatchTier};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// First line of the plain-text summary
pub const SUMMARY_TITLE: &str = "AHU Alarm Diagnostic Summary";

/// Shown instead of categories when nothing matched
pub const NO_MATCH_NOTICE: &str =
    "No close automatic match found. Shown below are general troubleshooting suggestions.";

/// General checks for an unmatched alarm
pub const GENERAL_GUIDANCE: [&str; 3] = [
    "Confirm sensor readings in the AHU graphic (MAT, RAT, OAT, SAT, coil leaving temps).",
    "Check damper and valve positions from BAS graphics.",
    "Inspect VFD/Fan status and filter differential pressures.",
];

/// Report timestamp format (local time, second precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time in report format
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// A matched category with how it was found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub category: AlarmCategory,
    pub tier: MatchTier,
    pub evidence: MatchEvidence,
}

/// Outcome of diagnosing one alarm message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    /// Alarm text as entered, trimmed
    pub alarm_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Best match first; empty means "show general guidance"
    pub matches: Vec<ReportEntry>,
}

impl DiagnosticReport {
    /// Diagnose `raw` and resolve every matched id against the matcher's knowledge base
    pub fn build(matcher: &AlarmMatcher, raw: &str, timestamp: Option<String>) -> Self {
        let kb = matcher.knowledge_base();
        let matches = matcher
            .diagnose_detailed(raw)
            .into_iter()
            .filter_map(|m| {
                kb.get(&m.category_id).map(|category| ReportEntry {
                    category: category.clone(),
                    tier: m.tier,
                    evidence: m.evidence,
                })
            })
            .collect();

        Self {
            alarm_text: raw.trim().to_string(),
            timestamp,
            matches,
        }
    }

    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Matched ids in rank order
    pub fn matched_ids(&self) -> Vec<&str> {
        self.matches.iter().map(|e| e.category.id.as_str()).collect()
    }

    /// Plain-text summary for pasting into a work order or log
    pub fn render_summary(&self) -> String {
        let mut lines = vec![SUMMARY_TITLE.to_string()];
        if let Some(ts) = &self.timestamp {
            lines.push(format!("Timestamp: {}", ts));
        }
        lines.push(format!("Original alarm: {}", self.alarm_text));

        for entry in &self.matches {
            let category = &entry.category;
            lines.push(String::new());
            lines.push(format!(
                "Alarm match: {}  (severity: {})",
                category.id,
                category.severity.as_str()
            ));
            lines.push("Possible reasons:".to_string());
            lines.extend(category.reasons.iter().map(|r| format!(" - {}", r)));
            lines.push("Actions:".to_string());
            lines.extend(category.actions.iter().map(|a| format!(" - {}", a)));
        }

        lines.join("\n")
    }
}
