//! Alarm Matcher - maps free-text BAS alarm messages to alarm categories
//!
//! Three tiers, in priority order:
//! 1. Keyword: a category keyword appears literally in the normalized text
//! 2. Fuzzy: gestalt similarity between the whole text and the category's
//!    representative string (id + keywords) reaches the cutoff
//! 3. Fallback: only when tiers 1 and 2 found nothing, any long-enough
//!    token of the text appears inside a category keyword
//!
//! Results are deduplicated keeping the first (highest tier) occurrence.
//! Within a tier, order is knowledge base order, except fuzzy hits which
//! are ranked by ratio (ties keep knowledge base order).
//!
//! Matching is conservative on purpose: no hit is a normal outcome and the
//! caller shows general guidance instead.

use crate::error::ConfigError;
use crate::knowledge_base::KnowledgeBase;
use crate::similarity::ratio_chars;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum fuzzy hits kept per call
pub const DEFAULT_MAX_FUZZY_RESULTS: usize = 5;

/// Minimum similarity ratio for a fuzzy hit
pub const DEFAULT_FUZZY_CUTOFF: f64 = 0.45;

/// Tokens shorter than this are ignored by the fallback tier
pub const DEFAULT_MIN_FALLBACK_TOKEN_CHARS: usize = 4;

/// Tunable matcher parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatcherSettings {
    #[serde(default = "default_max_fuzzy_results")]
    pub max_fuzzy_results: usize,

    #[serde(default = "default_fuzzy_cutoff")]
    pub fuzzy_cutoff: f64,

    #[serde(default = "default_min_fallback_token_chars")]
    pub min_fallback_token_chars: usize,
}

fn default_max_fuzzy_results() -> usize {
    DEFAULT_MAX_FUZZY_RESULTS
}

fn default_fuzzy_cutoff() -> f64 {
    DEFAULT_FUZZY_CUTOFF
}

fn default_min_fallback_token_chars() -> usize {
    DEFAULT_MIN_FALLBACK_TOKEN_CHARS
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            max_fuzzy_results: default_max_fuzzy_results(),
            fuzzy_cutoff: default_fuzzy_cutoff(),
            min_fallback_token_chars: default_min_fallback_token_chars(),
        }
    }
}

impl MatcherSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_fuzzy_results == 0 {
            return Err(ConfigError::InvalidMatcher(
                "max_fuzzy_results must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.fuzzy_cutoff) {
            return Err(ConfigError::InvalidMatcher(format!(
                "fuzzy_cutoff must be within [0, 1], got {}",
                self.fuzzy_cutoff
            )));
        }
        Ok(())
    }
}

/// Which tier produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Keyword,
    Fuzzy,
    Fallback,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchTier::Keyword => write!(f, "keyword"),
            MatchTier::Fuzzy => write!(f, "fuzzy"),
            MatchTier::Fallback => write!(f, "fallback"),
        }
    }
}

/// Why a category matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchEvidence {
    /// First keyword found in the text
    Keyword { keyword: String },
    /// Similarity ratio against the representative string
    Similarity { ratio: f64 },
    /// Number of (token, keyword) pairs where the token sits inside the keyword
    TokenOverlap { hits: usize },
}

impl std::fmt::Display for MatchEvidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchEvidence::Keyword { keyword } => write!(f, "keyword \"{}\"", keyword),
            MatchEvidence::Similarity { ratio } => write!(f, "similarity {:.2}", ratio),
            MatchEvidence::TokenOverlap { hits } => write!(f, "{} token hit(s)", hits),
        }
    }
}

/// One matched category with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMatch {
    pub category_id: String,
    pub tier: MatchTier,
    pub evidence: MatchEvidence,
}

/// Unicode whitespace plus the ASCII information separators U+001C..U+001F
fn is_text_whitespace(ch: char) -> bool {
    ch.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&ch)
}

/// Replace anything but ASCII letters, digits, `%`, `.` and whitespace with a
/// space, then lower-case.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '%' || ch == '.' || is_text_whitespace(ch) {
                ch.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect()
}

/// Keywords that normalization would alter, so they can never match literally.
///
/// Returned as `(category_id, keyword)` in knowledge base order. These are
/// reported, not repaired.
pub fn unreachable_keywords(kb: &KnowledgeBase) -> Vec<(String, String)> {
    kb.categories()
        .iter()
        .flat_map(|category| {
            category.keywords.iter().filter_map(move |keyword| {
                let lowered = keyword.to_lowercase();
                if normalize(&lowered) != lowered {
                    Some((category.id.clone(), keyword.clone()))
                } else {
                    None
                }
            })
        })
        .collect()
}

/// Representative string of one category, pre-split into chars
#[derive(Debug, Clone)]
struct Representative {
    category_id: String,
    chars: Vec<char>,
}

fn build_representatives(kb: &KnowledgeBase) -> Vec<Representative> {
    kb.categories()
        .iter()
        .map(|category| Representative {
            category_id: category.id.clone(),
            chars: category.representative().chars().collect(),
        })
        .collect()
}

/// Tier 1: literal keyword containment, first keyword hit per category
fn match_keywords(normalized: &str, kb: &KnowledgeBase) -> Vec<CategoryMatch> {
    kb.categories()
        .iter()
        .filter_map(|category| {
            category
                .keywords
                .iter()
                .find(|keyword| normalized.contains(keyword.to_lowercase().as_str()))
                .map(|keyword| CategoryMatch {
                    category_id: category.id.clone(),
                    tier: MatchTier::Keyword,
                    evidence: MatchEvidence::Keyword {
                        keyword: keyword.clone(),
                    },
                })
        })
        .collect()
}

/// Tier 2: whole-text similarity, best ratio first, at most `max_results`
fn match_fuzzy(
    normalized: &str,
    representatives: &[Representative],
    max_results: usize,
    cutoff: f64,
) -> Vec<CategoryMatch> {
    let text: Vec<char> = normalized.chars().collect();

    let mut scored: Vec<(&str, f64)> = representatives
        .iter()
        .map(|rep| (rep.category_id.as_str(), ratio_chars(&rep.chars, &text)))
        .filter(|(_, ratio)| *ratio >= cutoff)
        .collect();

    // Stable sort: equal ratios keep knowledge base order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(max_results);

    scored
        .into_iter()
        .map(|(id, ratio)| CategoryMatch {
            category_id: id.to_string(),
            tier: MatchTier::Fuzzy,
            evidence: MatchEvidence::Similarity { ratio },
        })
        .collect()
}

/// Tier 3: token-in-keyword overlap for tokens of at least `min_token_chars`
fn match_fallback(
    normalized: &str,
    kb: &KnowledgeBase,
    min_token_chars: usize,
) -> Vec<CategoryMatch> {
    let tokens: Vec<&str> = normalized
        .split(is_text_whitespace)
        .filter(|token| !token.is_empty() && token.chars().count() >= min_token_chars)
        .collect();

    if tokens.is_empty() {
        return Vec::new();
    }

    kb.categories()
        .iter()
        .filter_map(|category| {
            let hits: usize = category
                .keywords
                .iter()
                .map(|keyword| {
                    let keyword = keyword.to_lowercase();
                    tokens.iter().filter(|token| keyword.contains(**token)).count()
                })
                .sum();

            (hits > 0).then(|| CategoryMatch {
                category_id: category.id.clone(),
                tier: MatchTier::Fallback,
                evidence: MatchEvidence::TokenOverlap { hits },
            })
        })
        .collect()
}

/// Append `candidates` to `ordered`, skipping ids already present
fn merge_unique(
    ordered: &mut Vec<CategoryMatch>,
    seen: &mut HashSet<String>,
    candidates: Vec<CategoryMatch>,
) {
    for candidate in candidates {
        if seen.insert(candidate.category_id.clone()) {
            ordered.push(candidate);
        }
    }
}

/// Matcher bound to one knowledge base.
///
/// Holds no mutable state; share it behind an `Arc` across threads.
#[derive(Debug, Clone)]
pub struct AlarmMatcher {
    kb: Arc<KnowledgeBase>,
    settings: MatcherSettings,
    representatives: Vec<Representative>,
}

impl AlarmMatcher {
    /// Build a matcher, rejecting invalid settings
    pub fn new(kb: Arc<KnowledgeBase>, settings: MatcherSettings) -> Result<Self, ConfigError> {
        settings.validate()?;

        for (id, keyword) in unreachable_keywords(&kb) {
            info!(
                "Keyword \"{}\" of {} is changed by normalization and can never match literally",
                keyword, id
            );
        }

        Ok(Self::from_parts(kb, settings))
    }

    /// Matcher with default settings
    pub fn with_defaults(kb: Arc<KnowledgeBase>) -> Self {
        Self::from_parts(kb, MatcherSettings::default())
    }

    fn from_parts(kb: Arc<KnowledgeBase>, settings: MatcherSettings) -> Self {
        let representatives = build_representatives(&kb);
        Self {
            kb,
            settings,
            representatives,
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn settings(&self) -> &MatcherSettings {
        &self.settings
    }

    /// Ordered, duplicate-free category ids for an alarm text (possibly empty)
    pub fn diagnose(&self, raw: &str) -> Vec<String> {
        self.diagnose_detailed(raw)
            .into_iter()
            .map(|m| m.category_id)
            .collect()
    }

    /// Same ids and order as [`diagnose`](Self::diagnose), with tier and evidence
    pub fn diagnose_detailed(&self, raw: &str) -> Vec<CategoryMatch> {
        let normalized = normalize(raw);

        let direct = match_keywords(&normalized, &self.kb);
        let fuzzy = match_fuzzy(
            &normalized,
            &self.representatives,
            self.settings.max_fuzzy_results,
            self.settings.fuzzy_cutoff,
        );
        debug!(
            "Alarm matched {} keyword and {} fuzzy candidates",
            direct.len(),
            fuzzy.len()
        );

        let mut ordered = Vec::with_capacity(direct.len() + fuzzy.len());
        let mut seen = HashSet::new();
        merge_unique(&mut ordered, &mut seen, direct);
        merge_unique(&mut ordered, &mut seen, fuzzy);

        if ordered.is_empty() {
            ordered = match_fallback(
                &normalized,
                &self.kb,
                self.settings.min_fallback_token_chars,
            );
            debug!("Fallback tier matched {} categories", ordered.len());
        }

        ordered
    }
}
