//! Plan CSV writer.
//!
//! The plan table is the sole contract with the downstream fetcher: one row
//! per (company, fiscal year, document type), in the exact order the builder
//! emitted. The `csv` crate handles quoting of free-text company names and
//! the comma-joined source priorities.

use std::path::Path;

use crate::domain::{JobRecord, join_sources};
use crate::error::AppError;

/// Column set of the plan CSV, in output order.
pub const PLAN_COLUMNS: [&str; 13] = [
    "cohort",
    "company_name",
    "cin",
    "sector",
    "is_listed",
    "anchor_fy",
    "anchor_reason",
    "target_fy",
    "doc_type",
    "required",
    "source_priority",
    "default_year",
    "fy_before_default",
];

/// Write the plan to a CSV file, creating parent directories as needed.
pub fn write_plan_csv(path: &Path, plan: &[JobRecord]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::new(
                    4,
                    format!("Failed to create output dir '{}': {e}", parent.display()),
                )
            })?;
        }
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(4, format!("Failed to create plan CSV '{}': {e}", path.display()))
    })?;

    writer
        .write_record(PLAN_COLUMNS)
        .map_err(|e| AppError::new(4, format!("Failed to write plan header: {e}")))?;

    for job in plan {
        let anchor_fy = job.anchor_fy.to_string();
        let target_fy = job.target_fy.to_string();
        let sources = join_sources(&job.source_priority);
        let default_year = opt_year(job.default_year);
        let fy_before_default = opt_year(job.fy_before_default);
        writer
            .write_record([
                job.cohort.as_str(),
                job.company_name.as_str(),
                job.cin.as_str(),
                job.sector.as_str(),
                if job.is_listed { "true" } else { "false" },
                anchor_fy.as_str(),
                job.anchor_reason.as_str(),
                target_fy.as_str(),
                job.doc_type.as_str(),
                if job.required { "true" } else { "false" },
                sources.as_str(),
                default_year.as_str(),
                fy_before_default.as_str(),
            ])
            .map_err(|e| AppError::new(4, format!("Failed to write plan row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush plan CSV: {e}")))?;
    Ok(())
}

fn opt_year(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_default()
}
