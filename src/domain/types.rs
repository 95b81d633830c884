//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while the plan is being assembled
//! - exported to the plan CSV
//! - inspected in tests without any I/O

use serde::{Deserialize, Serialize};

/// Which cohort a company belongs to.
///
/// Defaulters carry an observable anchor signal (a default year or an explicit
/// anchor column); non-defaulters never do, their anchor is always derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    Defaulter,
    NonDefaulter,
}

impl Cohort {
    pub fn as_str(self) -> &'static str {
        match self {
            Cohort::Defaulter => "defaulter",
            Cohort::NonDefaulter => "non_defaulter",
        }
    }
}

/// Ordering of the target fiscal years emitted for each company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearOrder {
    /// Anchor year first, then older years.
    Desc,
    /// Oldest year first, anchor year last.
    Asc,
}

/// How a defaulter's anchor year is resolved.
///
/// The mode selects which fallback tier is tried *first*; the remaining tiers
/// stay in the chain so every company still terminates in a defined tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaulterAnchorMode {
    /// Prefer the explicit `fy_before_default` column.
    ExplicitField,
    /// Prefer `default_year - 1`.
    DerivedOffset,
    /// Prefer the configured `default_anchor_fy`.
    GlobalDefault,
}

/// How a non-defaulter's anchor year is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonDefaulterAnchorMode {
    /// Median of defaulter anchors in the same canonical sector, with a
    /// global-median fallback for sectors that have no defaulter peers.
    SectorMedianFromDefaulters,
    /// Every non-defaulter gets `fixed_anchor_fy`.
    FixedYear,
}

/// Closed set of document sources the downstream fetcher knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Bse,
    Nse,
    Mca,
}

impl SourceId {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceId::Bse => "bse",
            SourceId::Nse => "nse",
            SourceId::Mca => "mca",
        }
    }
}

/// Render a source-priority sequence the way the plan CSV stores it.
pub fn join_sources(sources: &[SourceId]) -> String {
    let parts: Vec<&str> = sources.iter().map(|s| s.as_str()).collect();
    parts.join(",")
}

/// Which fallback tier produced an anchor year.
///
/// Reason codes are part of the plan contract: they make every anchor
/// decision explainable after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorReason {
    /// Defaulter: explicit `fy_before_default` column value used verbatim.
    Explicit,
    /// Defaulter: `default_year - 1`.
    DerivedOffset,
    /// Defaulter: configured `default_anchor_fy`.
    GlobalDefault,
    /// Non-defaulter: median anchor of same-sector defaulters.
    SectorMedian,
    /// Non-defaulter: median anchor across all defaulters (no sector peers).
    GlobalMedianFallback,
    /// Non-defaulter: configured `fixed_anchor_fy`.
    FixedYear,
}

impl AnchorReason {
    pub fn as_str(self) -> &'static str {
        match self {
            AnchorReason::Explicit => "explicit",
            AnchorReason::DerivedOffset => "derived_offset",
            AnchorReason::GlobalDefault => "global_default",
            AnchorReason::SectorMedian => "sector_median",
            AnchorReason::GlobalMedianFallback => "global_median_fallback",
            AnchorReason::FixedYear => "fixed_year",
        }
    }
}

/// One normalized roster row.
///
/// Constructed once by the roster loader and immutable afterwards. The CIN is
/// only present when it passed the 21-character format check; an invalid CIN
/// is downgraded to `None` with a row warning upstream.
#[derive(Debug, Clone)]
pub struct CompanyRecord {
    pub company_name: String,
    /// Corporate Identification Number, normalized (no spaces, uppercase).
    pub cin: Option<String>,
    /// Raw sector label as it appeared in the roster.
    pub sector: Option<String>,
    /// Defaulter-only: explicit anchor fiscal year.
    pub fy_before_default: Option<i32>,
    /// Defaulter-only: fiscal year the default was classified.
    pub default_year: Option<i32>,
}

impl CompanyRecord {
    /// Listed-ness is derived from the CIN's leading characters.
    ///
    /// No CIN means listing status is unknown, which we treat as unlisted for
    /// source-priority purposes.
    pub fn is_listed(&self, listed_prefix: &str) -> bool {
        match &self.cin {
            Some(cin) => cin.starts_with(&listed_prefix.to_ascii_uppercase()),
            None => false,
        }
    }
}

/// Anchor year plus the reason code of the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAnchor {
    pub anchor_fy: i32,
    pub reason: AnchorReason,
}

/// One planned unit of download work: a single (company, fiscal year,
/// document type) combination. The atomic row of the plan CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub cohort: Cohort,
    pub company_name: String,
    /// Empty string when the company has no valid CIN.
    pub cin: String,
    /// Canonicalized sector label (aliases applied); empty when unknown.
    pub sector: String,
    pub is_listed: bool,
    pub anchor_fy: i32,
    pub anchor_reason: AnchorReason,
    pub target_fy: i32,
    pub doc_type: String,
    pub required: bool,
    pub source_priority: Vec<SourceId>,
    /// Diagnostic passthrough from the roster row.
    pub default_year: Option<i32>,
    /// Diagnostic passthrough from the roster row.
    pub fy_before_default: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listedness_from_cin_prefix() {
        let rec = CompanyRecord {
            company_name: "Steelco Ltd".to_string(),
            cin: Some("L27100MH1995PLC084207".to_string()),
            sector: None,
            fy_before_default: None,
            default_year: None,
        };
        assert!(rec.is_listed("L"));
        assert!(!rec.is_listed("U"));
    }

    #[test]
    fn missing_cin_defaults_to_unlisted() {
        let rec = CompanyRecord {
            company_name: "Private Co".to_string(),
            cin: None,
            sector: None,
            fy_before_default: None,
            default_year: None,
        };
        assert!(!rec.is_listed("L"));
    }

    #[test]
    fn source_join_is_comma_delimited() {
        let s = join_sources(&[SourceId::Bse, SourceId::Nse, SourceId::Mca]);
        assert_eq!(s, "bse,nse,mca");
    }
}
