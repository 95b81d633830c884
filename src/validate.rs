//! Roster sanity checks for `fulcrum validate`.
//!
//! Errors are structural problems that would make a plan misleading
//! (duplicate companies, empty roster); warnings are data-quality findings
//! the planner can work around (missing CIN, no anchor signal). Row-level
//! warnings already collected by the loader are folded in.

use std::collections::BTreeSet;

use crate::domain::Cohort;
use crate::io::roster::{RosterData, cin_has_canonical_shape};

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub label: String,
    pub rows_used: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate one loaded roster.
pub fn validate_roster(label: &str, cohort: Cohort, data: &RosterData) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if data.records.is_empty() {
        errors.push("Roster has no usable rows.".to_string());
    }

    let mut seen = BTreeSet::new();
    let mut dupes = BTreeSet::new();
    for rec in &data.records {
        if !seen.insert(rec.company_name.as_str()) {
            dupes.insert(rec.company_name.as_str());
        }
    }
    for name in dupes {
        errors.push(format!("Duplicate company_name: '{name}'"));
    }

    for w in &data.warnings {
        warnings.push(match &w.company {
            Some(name) => format!("line {}: [{name}] {}", w.line, w.message),
            None => format!("line {}: {}", w.line, w.message),
        });
    }

    let missing_cin = data.records.iter().filter(|r| r.cin.is_none()).count();
    if missing_cin > 0 {
        warnings.push(format!(
            "{missing_cin} company(ies) without a usable CIN (treated as unlisted)."
        ));
    }

    for rec in &data.records {
        if let Some(cin) = &rec.cin {
            if !cin_has_canonical_shape(cin) {
                warnings.push(format!(
                    "[{}] CIN '{cin}' accepted best-effort (non-canonical structure).",
                    rec.company_name
                ));
            }
        }
    }

    if cohort == Cohort::Defaulter {
        let no_signal = data
            .records
            .iter()
            .filter(|r| r.fy_before_default.is_none() && r.default_year.is_none())
            .count();
        if no_signal > 0 {
            warnings.push(format!(
                "{no_signal} defaulter(s) with no anchor signal (will use the global default anchor)."
            ));
        }
    }

    ValidationReport {
        label: label.to_string(),
        rows_used: data.rows_used,
        errors,
        warnings,
    }
}
