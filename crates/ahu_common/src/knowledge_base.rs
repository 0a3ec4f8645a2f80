//! Knowledge Base - the fixed catalog of known AHU alarm categories
//!
//! Each category carries the keywords used to recognise it, its causes
//! (most likely first), the recommended actions and a severity. The base is
//! validated once at construction and never mutated afterwards, so one
//! instance can be shared read-only by any number of threads.
//!
//! Sources, first hit wins:
//! - `/etc/ahu/alarms.toml`
//! - `~/.config/ahu/alarms.toml`
//! - the built-in SOO-derived catalog

use crate::alarm_catalog::default_categories;
use crate::error::KnowledgeBaseError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// System-wide knowledge base file
pub const KB_PATH: &str = "/etc/ahu/alarms.toml";

/// Per-user knowledge base file, relative to the home directory
pub const KB_PATH_USER: &str = ".config/ahu/alarms.toml";

/// Current knowledge base document schema
pub const KB_SCHEMA_VERSION: u32 = 1;

/// Alarm severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Informational,
    Warning,
    Critical,
}

impl Severity {
    /// Lowercase label, as used in the plain-text export
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Informational => "informational",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Informational => write!(f, "Informational"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Critical => write!(f, "Critical"),
        }
    }
}

/// One known alarm type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmCategory {
    /// Stable identifier (e.g., "fan_failure")
    pub id: String,
    /// Short lowercase phrases matched literally against alarm text
    pub keywords: Vec<String>,
    /// Possible causes, most likely first
    pub reasons: Vec<String>,
    /// Recommended checks, in display order
    pub actions: Vec<String>,
    pub severity: Severity,
}

impl AlarmCategory {
    /// Id followed by every keyword, single-space separated
    pub fn representative(&self) -> String {
        let mut rep = self.id.clone();
        for keyword in &self.keywords {
            rep.push(' ');
            rep.push_str(keyword);
        }
        rep
    }

    /// Human title, e.g. "mixed_air_low_limit_trip" -> "Mixed Air Low Limit Trip"
    pub fn display_name(&self) -> String {
        title_case(&self.id.replace('_', " "))
    }
}

/// Upper-case every letter that follows a non-letter, lower-case the rest.
///
/// "co2 high" becomes "Co2 High".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// On-disk knowledge base document (TOML)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub categories: Vec<AlarmCategory>,
}

fn default_schema_version() -> u32 {
    KB_SCHEMA_VERSION
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            schema_version: KB_SCHEMA_VERSION,
            categories: default_categories(),
        }
    }
}

/// Validated, immutable, ordered alarm catalog
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    /// Categories in declaration order
    categories: Vec<AlarmCategory>,
    /// Position of each category by id
    index: HashMap<String, usize>,
    /// Where the catalog came from (None = built-in)
    source: Option<PathBuf>,
}

impl KnowledgeBase {
    /// Built-in catalog
    pub fn new() -> Self {
        let categories = default_categories();
        let index = categories
            .iter()
            .enumerate()
            .map(|(pos, c)| (c.id.clone(), pos))
            .collect();
        Self {
            categories,
            index,
            source: None,
        }
    }

    /// Validate and index a list of categories
    pub fn from_categories(categories: Vec<AlarmCategory>) -> Result<Self, KnowledgeBaseError> {
        let mut index = HashMap::with_capacity(categories.len());

        for (pos, category) in categories.iter().enumerate() {
            if category.id.trim().is_empty() {
                return Err(KnowledgeBaseError::EmptyId(pos));
            }
            if category.keywords.is_empty() {
                return Err(KnowledgeBaseError::NoKeywords(category.id.clone()));
            }
            if category.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(KnowledgeBaseError::BlankKeyword(category.id.clone()));
            }
            if category.reasons.is_empty() {
                return Err(KnowledgeBaseError::NoReasons(category.id.clone()));
            }
            if category.actions.is_empty() {
                return Err(KnowledgeBaseError::NoActions(category.id.clone()));
            }
            if index.insert(category.id.clone(), pos).is_some() {
                return Err(KnowledgeBaseError::DuplicateId(category.id.clone()));
            }
        }

        debug!("Knowledge base validated: {} categories", categories.len());
        Ok(Self {
            categories,
            index,
            source: None,
        })
    }

    /// Load from the first existing knowledge base file, or use the built-in catalog.
    ///
    /// A file that exists but is broken is an error, never silently skipped.
    pub fn load() -> Result<Self, KnowledgeBaseError> {
        let system = Path::new(KB_PATH);
        if system.exists() {
            return Self::load_from(system);
        }

        if let Some(home) = dirs::home_dir() {
            let user_path = home.join(KB_PATH_USER);
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        debug!("No knowledge base file found, using built-in catalog");
        Ok(Self::new())
    }

    /// Load from a specific TOML file
    pub fn load_from(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let toml_str = fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: KnowledgeBaseConfig =
            toml::from_str(&toml_str).map_err(|source| KnowledgeBaseError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut kb = Self::from_categories(config.categories)?;
        kb.source = Some(path.to_path_buf());
        info!("Loaded {} alarm categories from {}", kb.len(), path.display());
        Ok(kb)
    }

    /// Serialize the catalog as a knowledge base TOML document
    pub fn to_toml(&self) -> Result<String, KnowledgeBaseError> {
        let config = KnowledgeBaseConfig {
            schema_version: KB_SCHEMA_VERSION,
            categories: self.categories.clone(),
        };
        Ok(toml::to_string_pretty(&config)?)
    }

    /// Get a category by id
    pub fn get(&self, id: &str) -> Option<&AlarmCategory> {
        self.index.get(id).map(|&pos| &self.categories[pos])
    }

    /// All categories in declaration order
    pub fn categories(&self) -> &[AlarmCategory] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// File the catalog was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}
