//! Terminal rendering for diagnoses and the alarm catalog.
//!
//! Every function returns a String so the output can be tested without a
//! terminal. Color is decided once by the caller.

use ahu_common::knowledge_base::AlarmCategory;
use ahu_common::report::{DiagnosticReport, ReportEntry, GENERAL_GUIDANCE, NO_MATCH_NOTICE};
use ahu_common::{KnowledgeBase, Severity};
use owo_colors::OwoColorize;

/// Heading shown above every diagnosis
pub const APP_TITLE: &str = "AHU Alarm Doctor (SOO-based diagnostics)";

/// Renders with or without ANSI colors
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn severity(&self, severity: Severity) -> String {
        let label = severity.to_string();
        if !self.color {
            return label;
        }
        match severity {
            Severity::Critical => label.red().bold().to_string(),
            Severity::Warning => label.yellow().to_string(),
            Severity::Informational => label.cyan().to_string(),
        }
    }

    /// Full diagnosis for the terminal
    pub fn render_report(&self, report: &DiagnosticReport, explain: bool) -> String {
        let mut out = String::new();

        out.push_str(&self.bold(APP_TITLE));
        out.push_str("\n\n");
        out.push_str(&format!("Alarm received: {}\n", report.alarm_text));
        if let Some(ts) = &report.timestamp {
            out.push_str(&self.dimmed(&format!("Diagnosed at {}", ts)));
            out.push('\n');
        }
        out.push('\n');

        if !report.has_matches() {
            out.push_str(&self.render_no_match());
            return out;
        }

        let found = format!("Found {} possible alarm type(s).", report.matches.len());
        if self.color {
            out.push_str(&found.green().to_string());
        } else {
            out.push_str(&found);
        }
        out.push('\n');

        for entry in &report.matches {
            out.push('\n');
            out.push_str(&self.render_entry(entry, explain));
        }

        out
    }

    fn render_entry(&self, entry: &ReportEntry, explain: bool) -> String {
        let mut out = self.render_category(&entry.category);
        if explain {
            out.push_str(&self.dimmed(&format!(
                "Matched by {} tier: {}",
                entry.tier, entry.evidence
            )));
            out.push('\n');
        }
        out
    }

    /// One category: title, severity, ranked reasons and actions
    pub fn render_category(&self, category: &AlarmCategory) -> String {
        let mut out = format!(
            "{}  ({} severity)\n",
            self.bold(&category.display_name()),
            self.severity(category.severity)
        );

        out.push_str("Possible reasons (most likely → less likely):\n");
        for (i, reason) in category.reasons.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, reason));
        }

        out.push_str("Recommended actions / troubleshooting steps:\n");
        for (i, action) in category.actions.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, action));
        }

        out
    }

    fn render_no_match(&self) -> String {
        let mut out = String::new();
        if self.color {
            out.push_str(&NO_MATCH_NOTICE.yellow().to_string());
        } else {
            out.push_str(NO_MATCH_NOTICE);
        }
        out.push_str("\n\nGeneral checks:\n");
        for check in GENERAL_GUIDANCE {
            out.push_str(&format!("  - {}\n", check));
        }
        out
    }

    /// Catalog listing: every id with its keywords.
    ///
    /// `unreachable` holds `(id, keyword)` pairs that normalization prevents
    /// from ever matching; they are marked so the catalog can be fixed.
    pub fn render_catalog(&self, kb: &KnowledgeBase, unreachable: &[(String, String)]) -> String {
        let mut out = self.bold(&format!("Known alarm types ({})", kb.len()));
        out.push('\n');
        if let Some(source) = kb.source() {
            out.push_str(&self.dimmed(&format!("Source: {}", source.display())));
            out.push('\n');
        }
        out.push('\n');

        for category in kb.categories() {
            let keywords: Vec<String> = category
                .keywords
                .iter()
                .map(|keyword| {
                    if unreachable
                        .iter()
                        .any(|(id, k)| id == &category.id && k == keyword)
                    {
                        format!("{} (never matches)", keyword)
                    } else {
                        keyword.clone()
                    }
                })
                .collect();

            out.push_str(&format!(
                "- {} [{}]: {}\n",
                self.bold(&category.id),
                category.severity.as_str(),
                keywords.join(", ")
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahu_common::matcher::unreachable_keywords;
    use ahu_common::AlarmMatcher;
    use std::sync::Arc;

    fn matcher() -> AlarmMatcher {
        AlarmMatcher::with_defaults(Arc::new(KnowledgeBase::new()))
    }

    #[test]
    fn test_render_report_plain() {
        let report = DiagnosticReport::build(
            &matcher(),
            "Filter DP high on AHU F201",
            Some("2026-10-19 08:15:00".to_string()),
        );
        let out = Renderer::new(false).render_report(&report, false);

        assert!(out.starts_with(APP_TITLE));
        assert!(out.contains("Alarm received: Filter DP high on AHU F201\n"));
        assert!(out.contains("Diagnosed at 2026-10-19 08:15:00\n"));
        assert!(out.contains("Found 1 possible alarm type(s)."));
        assert!(out.contains("Filter Differential High  (Warning severity)\n"));
        assert!(out.contains("  1. Pre-filter or primary filter is loaded or blocked.\n"));
        assert!(out.contains("  3. Reset alarm after maintenance through BAS graphics.\n"));
        assert!(!out.contains("Matched by"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn test_render_report_explain() {
        let report = DiagnosticReport::build(&matcher(), "valv positon alarm", None);
        let out = Renderer::new(false).render_report(&report, true);
        assert!(out.contains("Matched by fallback tier: 4 token hit(s)"));
        assert!(!out.contains("Diagnosed at"));
    }

    #[test]
    fn test_render_no_match_shows_general_guidance() {
        let report = DiagnosticReport::build(&matcher(), "completely unrelated gibberish zzzqq", None);
        let out = Renderer::new(false).render_report(&report, false);
        assert!(out.contains(NO_MATCH_NOTICE));
        assert!(out.contains("General checks:"));
        for check in GENERAL_GUIDANCE {
            assert!(out.contains(check));
        }
        assert!(!out.contains("Found"));
    }

    #[test]
    fn test_render_with_color_emits_ansi() {
        let report = DiagnosticReport::build(&matcher(), "pump trip", None);
        let out = Renderer::new(true).render_report(&report, false);
        assert!(out.contains('\u{1b}'));
        assert!(out.contains("Pump Failure"));
    }

    #[test]
    fn test_render_catalog_marks_unreachable_keywords() {
        let kb = KnowledgeBase::new();
        let unreachable = unreachable_keywords(&kb);
        let out = Renderer::new(false).render_catalog(&kb, &unreachable);

        assert!(out.starts_with("Known alarm types (12)"));
        assert!(out.contains("- fan_failure [critical]: fan fail, fan proving, no fan"));
        assert!(out.contains("38° (never matches)"));
        assert!(out.contains("pre-filter (never matches)"));
        assert!(!out.contains("low limit (never matches)"));
    }
}
