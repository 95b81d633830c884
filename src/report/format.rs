//! Terminal output formatting.

use crate::io::roster::RowWarning;
use crate::report::PlanSummary;
use crate::validate::ValidationReport;

/// Format the run summary printed after a plan build.
pub fn format_plan_summary(summary: &PlanSummary) -> String {
    let mut out = String::new();

    out.push_str("=== fulcrum - download plan ===\n");
    out.push_str(&format!(
        "Companies in plan: {} (defaulters: {}, non-defaulters: {})\n",
        summary.companies, summary.defaulter_companies, summary.non_defaulter_companies
    ));
    out.push_str(&format!(
        "Company-year targets: {}\n",
        summary.company_year_targets
    ));
    out.push_str(&format!("Required jobs: {}\n", summary.required_jobs));
    out.push_str(&format!("Optional jobs: {}\n", summary.optional_jobs));
    out.push_str(&format!("Total jobs: {}\n", summary.total_jobs));

    out.push_str("\nAnchor reasons (companies):\n");
    for (reason, count) in &summary.anchor_reasons {
        out.push_str(&format!("  {reason:<24} {count}\n"));
    }

    out.push_str("\nSource priority profiles (companies):\n");
    for (profile, count) in &summary.source_profiles {
        out.push_str(&format!("  {profile:<24} {count}\n"));
    }

    out
}

/// Format row-level roster warnings for one roster.
pub fn format_roster_warnings(label: &str, warnings: &[RowWarning]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{label}: {} row warning(s)\n", warnings.len()));
    for w in warnings {
        match &w.company {
            Some(name) => out.push_str(&format!("  line {}: [{name}] {}\n", w.line, w.message)),
            None => out.push_str(&format!("  line {}: {}\n", w.line, w.message)),
        }
    }
    out
}

/// Format a roster validation report.
pub fn format_validation_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("--- {} ---\n", report.label));
    out.push_str(&format!("Rows used: {}\n", report.rows_used));

    if report.errors.is_empty() && report.warnings.is_empty() {
        out.push_str("OK\n");
        return out;
    }
    for e in &report.errors {
        out.push_str(&format!("ERROR: {e}\n"));
    }
    for w in &report.warnings {
        out.push_str(&format!("warning: {w}\n"));
    }
    out
}
