//! Shared "plan pipeline" logic used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! roster load -> anchor resolution -> year expansion -> job matrix -> summary
//!
//! The CLI can then focus on presentation (printing and file paths), and the
//! whole pipeline stays exercisable from tests without spawning a process.

use std::path::Path;

use crate::config::Config;
use crate::domain::JobRecord;
use crate::error::AppError;
use crate::io::roster::{RosterData, load_roster};
use crate::plan::matrix::build_plan;
use crate::report::{PlanSummary, summarize_plan};

/// All computed outputs of a single `fulcrum plan` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub plan: Vec<JobRecord>,
    pub defaulters: RosterData,
    pub non_defaulters: RosterData,
    pub summary: PlanSummary,
}

/// Execute the full planning pipeline and return the computed outputs.
pub fn run_plan(
    config: &Config,
    defaulters_path: &Path,
    non_defaulters_path: &Path,
) -> Result<RunOutput, AppError> {
    let defaulters = load_roster(defaulters_path)?;
    let non_defaulters = load_roster(non_defaulters_path)?;

    let plan = build_plan(&defaulters.records, &non_defaulters.records, config);
    let summary = summarize_plan(&plan);

    Ok(RunOutput {
        plan,
        defaulters,
        non_defaulters,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::domain::{AnchorReason, Cohort};

    const CONFIG: &str = r#"
        [general]
        lookback_years = 3
        year_order = "desc"
        default_anchor_fy = 2023

        [defaulters]
        anchor_mode = "explicit_field"

        [non_defaulters]
        anchor_mode = "sector_median_from_defaulters"
        [non_defaulters.sector_aliases]
        "Travel / Hospitality" = "Travel / Aviation / Hospitality"

        [documents]
        required = ["annual_report", "balance_sheet"]
        optional = ["annual_return"]

        [sources]
        priority_listed = ["bse", "nse", "mca"]
        priority_unlisted = ["mca"]
        listed_prefix = "L"
    "#;

    const DEFAULTERS: &str = "\
company_name,cin,sector,default_year,fy_before_default
Steelco Ltd,L27100MH1995PLC084207,Steel,2022,2021
Cemco Ltd,U26940DL2003PLC118764,Cement,2021,
Ghost Ltd,BAD CIN,Steel,,
";

    const NON_DEFAULTERS: &str = "\
company_name,cin,sector
Peerco Ltd,L27200MH1998PLC114285,Steel
Wanderer Ltd,,Travel / Hospitality
";

    #[test]
    fn end_to_end_plan_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("plan.toml");
        let defaulters_path = dir.path().join("defaulters.csv");
        let non_defaulters_path = dir.path().join("non_defaulters.csv");
        fs::write(&config_path, CONFIG).unwrap();
        fs::write(&defaulters_path, DEFAULTERS).unwrap();
        fs::write(&non_defaulters_path, NON_DEFAULTERS).unwrap();

        let config = Config::load(&config_path).unwrap();
        let run = run_plan(&config, &defaulters_path, &non_defaulters_path).unwrap();

        // 5 companies x 3 years x 3 doc types.
        assert_eq!(run.plan.len(), 5 * 3 * 3);
        assert_eq!(run.summary.companies, 5);
        assert_eq!(run.summary.total_jobs, 45);

        // The malformed CIN produced a warning, not a dropped row.
        assert_eq!(run.defaulters.rows_used, 3);
        assert_eq!(run.defaulters.warnings.len(), 1);

        let anchor_of = |name: &str| {
            run.plan
                .iter()
                .find(|j| j.company_name == name)
                .map(|j| (j.anchor_fy, j.anchor_reason))
                .unwrap()
        };

        assert_eq!(anchor_of("Steelco Ltd"), (2021, AnchorReason::Explicit));
        assert_eq!(anchor_of("Cemco Ltd"), (2020, AnchorReason::DerivedOffset));
        assert_eq!(anchor_of("Ghost Ltd"), (2023, AnchorReason::GlobalDefault));
        // Steel defaulter anchors are [2021, 2023]; lower-middle median 2021.
        assert_eq!(anchor_of("Peerco Ltd"), (2021, AnchorReason::SectorMedian));
        // Aliased sector has no defaulter peers; global median over
        // [2020, 2021, 2023] is 2021.
        assert_eq!(
            anchor_of("Wanderer Ltd"),
            (2021, AnchorReason::GlobalMedianFallback)
        );

        // Cohort order: all defaulter rows precede all non-defaulter rows.
        let first_non_defaulter = run
            .plan
            .iter()
            .position(|j| j.cohort == Cohort::NonDefaulter)
            .unwrap();
        assert!(run.plan[..first_non_defaulter]
            .iter()
            .all(|j| j.cohort == Cohort::Defaulter));
        assert_eq!(first_non_defaulter, 3 * 3 * 3);

        // Determinism across a full re-run.
        let again = run_plan(&config, &defaulters_path, &non_defaulters_path).unwrap();
        assert_eq!(run.plan, again.plan);
    }

    #[test]
    fn missing_roster_file_is_a_roster_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("plan.toml");
        fs::write(&config_path, CONFIG).unwrap();
        let config = Config::load(&config_path).unwrap();

        let missing = dir.path().join("nope.csv");
        let err = run_plan(&config, &missing, &missing).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
