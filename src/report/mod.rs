//! Reporting utilities: plan summary aggregation and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the planning code stays clean and testable
//! - output changes are localized

pub mod format;

pub use format::*;

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Cohort, JobRecord, join_sources};

/// Aggregate counts over a finished plan.
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub companies: usize,
    pub defaulter_companies: usize,
    pub non_defaulter_companies: usize,
    /// Distinct (company, target_fy) pairs.
    pub company_year_targets: usize,
    pub required_jobs: usize,
    pub optional_jobs: usize,
    pub total_jobs: usize,
    /// Source-priority profile -> number of companies using it.
    pub source_profiles: BTreeMap<String, usize>,
    /// Anchor reason code -> number of companies resolved by that tier.
    pub anchor_reasons: BTreeMap<&'static str, usize>,
}

/// Compute the run summary from the emitted plan.
pub fn summarize_plan(plan: &[JobRecord]) -> PlanSummary {
    let mut companies: BTreeSet<(Cohort, &str)> = BTreeSet::new();
    let mut year_targets: BTreeSet<(Cohort, &str, i32)> = BTreeSet::new();
    let mut profiles: BTreeMap<String, BTreeSet<(Cohort, &str)>> = BTreeMap::new();
    let mut reasons: BTreeMap<&'static str, BTreeSet<(Cohort, &str)>> = BTreeMap::new();
    let mut required_jobs = 0usize;
    let mut optional_jobs = 0usize;

    for job in plan {
        let key = (job.cohort, job.company_name.as_str());
        companies.insert(key);
        year_targets.insert((job.cohort, job.company_name.as_str(), job.target_fy));
        profiles
            .entry(join_sources(&job.source_priority))
            .or_default()
            .insert(key);
        reasons
            .entry(job.anchor_reason.as_str())
            .or_default()
            .insert(key);
        if job.required {
            required_jobs += 1;
        } else {
            optional_jobs += 1;
        }
    }

    let defaulter_companies = companies
        .iter()
        .filter(|(c, _)| *c == Cohort::Defaulter)
        .count();

    PlanSummary {
        companies: companies.len(),
        defaulter_companies,
        non_defaulter_companies: companies.len() - defaulter_companies,
        company_year_targets: year_targets.len(),
        required_jobs,
        optional_jobs,
        total_jobs: plan.len(),
        source_profiles: profiles.into_iter().map(|(k, v)| (k, v.len())).collect(),
        anchor_reasons: reasons.into_iter().map(|(k, v)| (k, v.len())).collect(),
    }
}
