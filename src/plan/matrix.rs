//! Job-matrix construction: the cross product that becomes the plan.
//!
//! `company_jobs` emits one `JobRecord` per (target year x document type) for
//! a single company; `build_plan` runs both rosters through anchor resolution
//! and emits the canonical plan order: defaulters before non-defaulters,
//! companies in roster order, years in expander order, documents in
//! configured order (required before optional). The builders share no mutable
//! state; everything reads the immutable `Config`.

use crate::config::Config;
use crate::domain::{Cohort, CompanyRecord, JobRecord, ResolvedAnchor};
use crate::plan::anchor::{
    AnchorStats, canonical_sector, resolve_defaulter, resolve_non_defaulter,
};
use crate::plan::expand::target_years;

/// Emit every job for one company.
pub fn company_jobs(
    cohort: Cohort,
    record: &CompanyRecord,
    anchor: &ResolvedAnchor,
    config: &Config,
) -> Vec<JobRecord> {
    let is_listed = record.is_listed(&config.listed_prefix);
    let source_priority = if is_listed {
        config.listed_source_priority.clone()
    } else {
        config.unlisted_source_priority.clone()
    };
    let sector = canonical_sector(record.sector.as_deref(), config).unwrap_or_default();
    let years = target_years(anchor.anchor_fy, config.lookback_years, config.year_order);

    let doc_count = config.required_documents.len() + config.optional_documents.len();
    let mut jobs = Vec::with_capacity(years.len() * doc_count);
    for &target_fy in &years {
        let docs = config
            .required_documents
            .iter()
            .map(|d| (d, true))
            .chain(config.optional_documents.iter().map(|d| (d, false)));
        for (doc_type, required) in docs {
            jobs.push(JobRecord {
                cohort,
                company_name: record.company_name.clone(),
                cin: record.cin.clone().unwrap_or_default(),
                sector: sector.clone(),
                is_listed,
                anchor_fy: anchor.anchor_fy,
                anchor_reason: anchor.reason,
                target_fy,
                doc_type: doc_type.clone(),
                required,
                source_priority: source_priority.clone(),
                default_year: record.default_year,
                fy_before_default: record.fy_before_default,
            });
        }
    }
    jobs
}

/// Build the full plan from both rosters.
///
/// Pure over its inputs: same config + same rosters always yields the same
/// row sequence. Defaulter anchors are resolved first because the
/// non-defaulter medians aggregate over them.
pub fn build_plan(
    defaulters: &[CompanyRecord],
    non_defaulters: &[CompanyRecord],
    config: &Config,
) -> Vec<JobRecord> {
    let resolved: Vec<(CompanyRecord, ResolvedAnchor)> = defaulters
        .iter()
        .map(|record| (record.clone(), resolve_defaulter(record, config)))
        .collect();

    // Barrier: every non-defaulter lookup depends on these aggregates.
    let stats = AnchorStats::from_defaulters(&resolved, config);

    let mut plan = Vec::new();
    for (record, anchor) in &resolved {
        plan.extend(company_jobs(Cohort::Defaulter, record, anchor, config));
    }
    for record in non_defaulters {
        let anchor = resolve_non_defaulter(record, config, &stats);
        plan.extend(company_jobs(Cohort::NonDefaulter, record, &anchor, config));
    }
    plan
}
