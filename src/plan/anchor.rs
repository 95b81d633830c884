//! Anchor-year resolution.
//!
//! Every company in both rosters receives exactly one anchor fiscal year plus
//! a reason code naming the tier that produced it. Resolution never fails:
//! absence of any signal terminates in a defined fallback tier.
//!
//! Defaulters go through an ordered chain of named tiers. The configured mode
//! only moves its preferred tier to the front of the chain; the remaining
//! tiers stay in their base order, so the fallthrough is preserved no matter
//! which mode is active.
//!
//! Non-defaulters are resolved in two passes: defaulter anchors are grouped
//! by canonical sector first (a pure aggregation with no dependency on the
//! non-defaulter roster), then each non-defaulter is a lookup against those
//! aggregates. The aggregation is the only cross-company dependency in the
//! whole pipeline.

use std::collections::BTreeMap;

use crate::config::Config;
use crate::domain::{
    AnchorReason, CompanyRecord, DefaulterAnchorMode, NonDefaulterAnchorMode, ResolvedAnchor,
};

/// One fallback tier: yields an anchor year and its reason code, or passes.
type Tier = fn(&CompanyRecord, &Config) -> Option<ResolvedAnchor>;

fn tier_explicit(record: &CompanyRecord, _config: &Config) -> Option<ResolvedAnchor> {
    record.fy_before_default.map(|year| ResolvedAnchor {
        anchor_fy: year,
        reason: AnchorReason::Explicit,
    })
}

fn tier_derived_offset(record: &CompanyRecord, _config: &Config) -> Option<ResolvedAnchor> {
    // The fiscal year *before* the default classification is the last one
    // with usable financials.
    record.default_year.map(|year| ResolvedAnchor {
        anchor_fy: year - 1,
        reason: AnchorReason::DerivedOffset,
    })
}

fn tier_global_default(_record: &CompanyRecord, config: &Config) -> Option<ResolvedAnchor> {
    Some(ResolvedAnchor {
        anchor_fy: config.default_anchor_fy,
        reason: AnchorReason::GlobalDefault,
    })
}

/// The defaulter tier chain for a given mode.
///
/// Base order is explicit -> derived_offset -> global_default; the mode's
/// tier is moved to the front without dropping the others.
pub fn defaulter_tier_chain(mode: DefaulterAnchorMode) -> Vec<Tier> {
    match mode {
        DefaulterAnchorMode::ExplicitField => {
            vec![tier_explicit, tier_derived_offset, tier_global_default]
        }
        DefaulterAnchorMode::DerivedOffset => {
            vec![tier_derived_offset, tier_explicit, tier_global_default]
        }
        DefaulterAnchorMode::GlobalDefault => {
            vec![tier_global_default, tier_explicit, tier_derived_offset]
        }
    }
}

/// Resolve one defaulter through the tier chain.
pub fn resolve_defaulter(record: &CompanyRecord, config: &Config) -> ResolvedAnchor {
    for tier in defaulter_tier_chain(config.defaulter_anchor_mode) {
        if let Some(anchor) = tier(record, config) {
            return anchor;
        }
    }
    // Unreachable: the global-default tier always yields. Kept total so the
    // chain stays a plain list of fallible tiers.
    ResolvedAnchor {
        anchor_fy: config.default_anchor_fy,
        reason: AnchorReason::GlobalDefault,
    }
}

/// Apply sector aliases and trim; empty labels collapse to `None`.
pub fn canonical_sector(raw: Option<&str>, config: &Config) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let canonical = config
        .sector_aliases
        .get(raw)
        .map(String::as_str)
        .unwrap_or(raw)
        .trim();
    if canonical.is_empty() {
        None
    } else {
        Some(canonical.to_string())
    }
}

/// Lower-middle median: sort, take index `(n - 1) / 2`.
///
/// Fiscal years are integers, so an even-count set never interpolates; ties
/// break toward the smaller year.
fn lower_median(values: &[i32]) -> Option<i32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    Some(sorted[(sorted.len() - 1) / 2])
}

/// Aggregated defaulter anchors, keyed by canonical sector.
///
/// Built once after all defaulters are resolved and before any non-defaulter
/// resolution starts.
#[derive(Debug, Clone)]
pub struct AnchorStats {
    sector_medians: BTreeMap<String, i32>,
    global_median: i32,
}

impl AnchorStats {
    pub fn from_defaulters(
        defaulters: &[(CompanyRecord, ResolvedAnchor)],
        config: &Config,
    ) -> Self {
        let anchors: Vec<i32> = defaulters.iter().map(|(_, a)| a.anchor_fy).collect();
        // An empty defaulter roster leaves no median to take; the configured
        // default anchor stands in.
        let global_median = lower_median(&anchors).unwrap_or(config.default_anchor_fy);

        let mut by_sector: BTreeMap<String, Vec<i32>> = BTreeMap::new();
        for (record, anchor) in defaulters {
            if let Some(sector) = canonical_sector(record.sector.as_deref(), config) {
                by_sector.entry(sector).or_default().push(anchor.anchor_fy);
            }
        }
        let sector_medians = by_sector
            .into_iter()
            .filter_map(|(sector, years)| lower_median(&years).map(|m| (sector, m)))
            .collect();

        Self {
            sector_medians,
            global_median,
        }
    }

    pub fn sector_median(&self, sector: &str) -> Option<i32> {
        self.sector_medians.get(sector).copied()
    }

    pub fn global_median(&self) -> i32 {
        self.global_median
    }
}

/// Resolve one non-defaulter.
pub fn resolve_non_defaulter(
    record: &CompanyRecord,
    config: &Config,
    stats: &AnchorStats,
) -> ResolvedAnchor {
    if let (NonDefaulterAnchorMode::FixedYear, Some(year)) =
        (config.non_defaulter_anchor_mode, config.fixed_anchor_fy)
    {
        return ResolvedAnchor {
            anchor_fy: year,
            reason: AnchorReason::FixedYear,
        };
    }

    let sector_median = canonical_sector(record.sector.as_deref(), config)
        .and_then(|sector| stats.sector_median(&sector));

    match sector_median {
        Some(year) => ResolvedAnchor {
            anchor_fy: year,
            reason: AnchorReason::SectorMedian,
        },
        None => ResolvedAnchor {
            anchor_fy: stats.global_median(),
            reason: AnchorReason::GlobalMedianFallback,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::YearOrder;

    fn test_config() -> Config {
        Config {
            lookback_years: 3,
            year_order: YearOrder::Desc,
            default_anchor_fy: 2023,
            defaulter_anchor_mode: DefaulterAnchorMode::ExplicitField,
            non_defaulter_anchor_mode: NonDefaulterAnchorMode::SectorMedianFromDefaulters,
            fixed_anchor_fy: None,
            sector_aliases: BTreeMap::new(),
            required_documents: vec!["annual_report".to_string()],
            optional_documents: vec![],
            listed_source_priority: vec![],
            unlisted_source_priority: vec![],
            listed_prefix: "L".to_string(),
        }
    }

    fn company(
        name: &str,
        sector: Option<&str>,
        fy_before_default: Option<i32>,
        default_year: Option<i32>,
    ) -> CompanyRecord {
        CompanyRecord {
            company_name: name.to_string(),
            cin: None,
            sector: sector.map(str::to_string),
            fy_before_default,
            default_year,
        }
    }

    #[test]
    fn explicit_field_wins_when_present() {
        let config = test_config();
        let rec = company("A", None, Some(2021), Some(2020));
        let anchor = resolve_defaulter(&rec, &config);
        assert_eq!(anchor.anchor_fy, 2021);
        assert_eq!(anchor.reason, AnchorReason::Explicit);
    }

    #[test]
    fn falls_through_to_derived_offset() {
        let config = test_config();
        let rec = company("A", None, None, Some(2020));
        let anchor = resolve_defaulter(&rec, &config);
        assert_eq!(anchor.anchor_fy, 2019);
        assert_eq!(anchor.reason, AnchorReason::DerivedOffset);
    }

    #[test]
    fn falls_through_to_global_default() {
        let config = test_config();
        let rec = company("A", None, None, None);
        let anchor = resolve_defaulter(&rec, &config);
        assert_eq!(anchor.anchor_fy, 2023);
        assert_eq!(anchor.reason, AnchorReason::GlobalDefault);
    }

    #[test]
    fn derived_offset_mode_reorders_but_keeps_fallthrough() {
        let mut config = test_config();
        config.defaulter_anchor_mode = DefaulterAnchorMode::DerivedOffset;

        // Both signals present: derived offset is preferred.
        let both = company("A", None, Some(2021), Some(2020));
        let anchor = resolve_defaulter(&both, &config);
        assert_eq!(anchor.anchor_fy, 2019);
        assert_eq!(anchor.reason, AnchorReason::DerivedOffset);

        // Only the explicit column present: the chain still reaches it.
        let explicit_only = company("B", None, Some(2021), None);
        let anchor = resolve_defaulter(&explicit_only, &config);
        assert_eq!(anchor.anchor_fy, 2021);
        assert_eq!(anchor.reason, AnchorReason::Explicit);
    }

    #[test]
    fn global_default_mode_short_circuits() {
        let mut config = test_config();
        config.defaulter_anchor_mode = DefaulterAnchorMode::GlobalDefault;
        let rec = company("A", None, Some(2021), Some(2020));
        let anchor = resolve_defaulter(&rec, &config);
        assert_eq!(anchor.anchor_fy, 2023);
        assert_eq!(anchor.reason, AnchorReason::GlobalDefault);
    }

    fn resolved(year: i32) -> ResolvedAnchor {
        ResolvedAnchor {
            anchor_fy: year,
            reason: AnchorReason::Explicit,
        }
    }

    #[test]
    fn odd_count_sector_median_is_middle_value() {
        let config = test_config();
        let defaulters = vec![
            (company("A", Some("Steel"), None, None), resolved(2019)),
            (company("B", Some("Steel"), None, None), resolved(2020)),
            (company("C", Some("Steel"), None, None), resolved(2021)),
        ];
        let stats = AnchorStats::from_defaulters(&defaulters, &config);
        assert_eq!(stats.sector_median("Steel"), Some(2020));
    }

    #[test]
    fn even_count_median_takes_lower_middle() {
        let config = test_config();
        let defaulters = vec![
            (company("A", Some("Steel"), None, None), resolved(2020)),
            (company("B", Some("Steel"), None, None), resolved(2019)),
        ];
        let stats = AnchorStats::from_defaulters(&defaulters, &config);
        assert_eq!(stats.sector_median("Steel"), Some(2019));
        assert_eq!(stats.global_median(), 2019);
    }

    #[test]
    fn sector_alias_groups_under_canonical_label() {
        let mut config = test_config();
        config.sector_aliases.insert(
            "Travel / Hospitality".to_string(),
            "Travel / Aviation / Hospitality".to_string(),
        );

        let defaulters = vec![(
            company("A", Some("Travel / Aviation / Hospitality"), None, None),
            resolved(2020),
        )];
        let stats = AnchorStats::from_defaulters(&defaulters, &config);

        let rec = company("B", Some("Travel / Hospitality"), None, None);
        let anchor = resolve_non_defaulter(&rec, &config, &stats);
        assert_eq!(anchor.anchor_fy, 2020);
        assert_eq!(anchor.reason, AnchorReason::SectorMedian);
    }

    #[test]
    fn unknown_sector_falls_back_to_global_median() {
        let config = test_config();
        let defaulters = vec![
            (company("A", Some("Steel"), None, None), resolved(2019)),
            (company("B", Some("Steel"), None, None), resolved(2021)),
            (company("C", Some("Cement"), None, None), resolved(2022)),
        ];
        let stats = AnchorStats::from_defaulters(&defaulters, &config);

        let rec = company("D", Some("Pharma"), None, None);
        let anchor = resolve_non_defaulter(&rec, &config, &stats);
        assert_eq!(anchor.reason, AnchorReason::GlobalMedianFallback);
        assert_eq!(anchor.anchor_fy, 2021);
    }

    #[test]
    fn missing_sector_falls_back_to_global_median() {
        let config = test_config();
        let defaulters = vec![(company("A", Some("Steel"), None, None), resolved(2020))];
        let stats = AnchorStats::from_defaulters(&defaulters, &config);

        let rec = company("B", None, None, None);
        let anchor = resolve_non_defaulter(&rec, &config, &stats);
        assert_eq!(anchor.reason, AnchorReason::GlobalMedianFallback);
        assert_eq!(anchor.anchor_fy, 2020);
    }

    #[test]
    fn empty_defaulter_roster_uses_default_anchor() {
        let config = test_config();
        let stats = AnchorStats::from_defaulters(&[], &config);
        let rec = company("B", Some("Steel"), None, None);
        let anchor = resolve_non_defaulter(&rec, &config, &stats);
        assert_eq!(anchor.anchor_fy, 2023);
        assert_eq!(anchor.reason, AnchorReason::GlobalMedianFallback);
    }

    #[test]
    fn fixed_year_mode_bypasses_medians() {
        let mut config = test_config();
        config.non_defaulter_anchor_mode = NonDefaulterAnchorMode::FixedYear;
        config.fixed_anchor_fy = Some(2018);

        let defaulters = vec![(company("A", Some("Steel"), None, None), resolved(2021))];
        let stats = AnchorStats::from_defaulters(&defaulters, &config);

        let rec = company("B", Some("Steel"), None, None);
        let anchor = resolve_non_defaulter(&rec, &config, &stats);
        assert_eq!(anchor.anchor_fy, 2018);
        assert_eq!(anchor.reason, AnchorReason::FixedYear);
    }
}
