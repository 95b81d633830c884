//! Policy configuration: TOML loading, defaults, and validation.
//!
//! The policy file is deserialized into raw section structs (serde defaults
//! fill in unset fields), then validated into an immutable [`Config`]. All
//! validation happens here, before any roster is read: a run either starts
//! with a fully checked policy or aborts with exit code 2.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{DefaulterAnchorMode, NonDefaulterAnchorMode, SourceId, YearOrder};
use crate::error::AppError;

/// Validated, immutable policy for one planning run.
#[derive(Debug, Clone)]
pub struct Config {
    pub lookback_years: u32,
    pub year_order: YearOrder,
    /// Last-resort anchor year when no other signal exists.
    pub default_anchor_fy: i32,
    pub defaulter_anchor_mode: DefaulterAnchorMode,
    pub non_defaulter_anchor_mode: NonDefaulterAnchorMode,
    /// Required when `non_defaulter_anchor_mode = fixed_year`.
    pub fixed_anchor_fy: Option<i32>,
    /// Raw sector label -> canonical sector label.
    pub sector_aliases: BTreeMap<String, String>,
    pub required_documents: Vec<String>,
    pub optional_documents: Vec<String>,
    pub listed_source_priority: Vec<SourceId>,
    pub unlisted_source_priority: Vec<SourceId>,
    /// CIN prefix marking listed/public companies.
    pub listed_prefix: String,
}

impl Config {
    /// Load and validate a policy TOML file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(2, format!("Failed to read config '{}': {e}", path.display()))
        })?;
        let file: ConfigFile = toml::from_str(&text).map_err(|e| {
            AppError::new(2, format!("Invalid config '{}': {e}", path.display()))
        })?;
        Self::from_file(file)
    }

    fn from_file(file: ConfigFile) -> Result<Self, AppError> {
        let config = Self {
            lookback_years: file.general.lookback_years,
            year_order: file.general.year_order,
            default_anchor_fy: file.general.default_anchor_fy,
            defaulter_anchor_mode: file.defaulters.anchor_mode,
            non_defaulter_anchor_mode: file.non_defaulters.anchor_mode,
            fixed_anchor_fy: file.non_defaulters.fixed_anchor_fy,
            sector_aliases: file.non_defaulters.sector_aliases,
            required_documents: file.documents.required,
            optional_documents: file.documents.optional,
            listed_source_priority: file.sources.priority_listed,
            unlisted_source_priority: file.sources.priority_unlisted,
            listed_prefix: file.sources.listed_prefix,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.lookback_years < 1 {
            return Err(AppError::new(2, "general.lookback_years must be >= 1"));
        }
        if self.required_documents.is_empty() {
            return Err(AppError::new(2, "documents.required cannot be empty"));
        }
        if let Some(doc) = first_duplicate(&self.required_documents) {
            return Err(AppError::new(
                2,
                format!("documents.required lists '{doc}' more than once"),
            ));
        }
        if let Some(doc) = first_duplicate(&self.optional_documents) {
            return Err(AppError::new(
                2,
                format!("documents.optional lists '{doc}' more than once"),
            ));
        }
        if let Some(doc) = self
            .required_documents
            .iter()
            .find(|d| self.optional_documents.contains(d))
        {
            return Err(AppError::new(
                2,
                format!("document type '{doc}' appears in both documents.required and documents.optional"),
            ));
        }
        if self.non_defaulter_anchor_mode == NonDefaulterAnchorMode::FixedYear
            && self.fixed_anchor_fy.is_none()
        {
            return Err(AppError::new(
                2,
                "non_defaulters.anchor_mode = \"fixed_year\" requires non_defaulters.fixed_anchor_fy",
            ));
        }
        Ok(())
    }
}

fn first_duplicate(docs: &[String]) -> Option<&str> {
    for (i, doc) in docs.iter().enumerate() {
        if docs[..i].contains(doc) {
            return Some(doc);
        }
    }
    None
}

// --- Raw file shape -------------------------------------------------------
//
// Unknown source identifiers fail at deserialization time (SourceId is a
// closed enum), which keeps the "sources belong to a fixed set" invariant in
// the type system rather than in a string check.

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    general: GeneralSection,
    #[serde(default)]
    defaulters: DefaultersSection,
    #[serde(default)]
    non_defaulters: NonDefaultersSection,
    #[serde(default)]
    documents: DocumentsSection,
    #[serde(default)]
    sources: SourcesSection,
}

#[derive(Debug, Deserialize)]
struct GeneralSection {
    #[serde(default = "default_lookback_years")]
    lookback_years: u32,
    #[serde(default = "default_year_order")]
    year_order: YearOrder,
    #[serde(default = "default_anchor_fy")]
    default_anchor_fy: i32,
}

#[derive(Debug, Deserialize)]
struct DefaultersSection {
    #[serde(default = "default_defaulter_mode")]
    anchor_mode: DefaulterAnchorMode,
}

#[derive(Debug, Deserialize)]
struct NonDefaultersSection {
    #[serde(default = "default_non_defaulter_mode")]
    anchor_mode: NonDefaulterAnchorMode,
    #[serde(default)]
    fixed_anchor_fy: Option<i32>,
    #[serde(default)]
    sector_aliases: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Default)]
struct DocumentsSection {
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    optional: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SourcesSection {
    #[serde(default = "default_priority_listed")]
    priority_listed: Vec<SourceId>,
    #[serde(default = "default_priority_unlisted")]
    priority_unlisted: Vec<SourceId>,
    #[serde(default = "default_listed_prefix")]
    listed_prefix: String,
}

fn default_lookback_years() -> u32 {
    3
}

fn default_year_order() -> YearOrder {
    YearOrder::Desc
}

fn default_anchor_fy() -> i32 {
    2023
}

fn default_defaulter_mode() -> DefaulterAnchorMode {
    DefaulterAnchorMode::ExplicitField
}

fn default_non_defaulter_mode() -> NonDefaulterAnchorMode {
    NonDefaulterAnchorMode::SectorMedianFromDefaulters
}

fn default_priority_listed() -> Vec<SourceId> {
    vec![SourceId::Bse, SourceId::Nse, SourceId::Mca]
}

fn default_priority_unlisted() -> Vec<SourceId> {
    vec![SourceId::Mca]
}

fn default_listed_prefix() -> String {
    "L".to_string()
}

impl Default for GeneralSection {
    fn default() -> Self {
        Self {
            lookback_years: default_lookback_years(),
            year_order: default_year_order(),
            default_anchor_fy: default_anchor_fy(),
        }
    }
}

impl Default for DefaultersSection {
    fn default() -> Self {
        Self {
            anchor_mode: default_defaulter_mode(),
        }
    }
}

impl Default for NonDefaultersSection {
    fn default() -> Self {
        Self {
            anchor_mode: default_non_defaulter_mode(),
            fixed_anchor_fy: None,
            sector_aliases: BTreeMap::new(),
        }
    }
}

impl Default for SourcesSection {
    fn default() -> Self {
        Self {
            priority_listed: default_priority_listed(),
            priority_unlisted: default_priority_unlisted(),
            listed_prefix: default_listed_prefix(),
        }
    }
}
