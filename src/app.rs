//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the policy configuration
//! - runs the plan pipeline or roster validation
//! - prints summaries/warnings
//! - writes the plan CSV

use clap::Parser;

use crate::cli::{Command, PlanArgs, ValidateArgs};
use crate::config::Config;
use crate::domain::Cohort;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `fulcrum` binary.
pub fn run() -> Result<(), AppError> {
    // We want `fulcrum` and `fulcrum --config x.toml` to behave like
    // `fulcrum plan ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while keeping the short invocation.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Plan(args) => handle_plan(args),
        Command::Validate(args) => handle_validate(args),
    }
}

fn handle_plan(args: PlanArgs) -> Result<(), AppError> {
    let config = Config::load(&args.config)?;
    let run = pipeline::run_plan(&config, &args.defaulters, &args.non_defaulters)?;

    // Row-level findings go to stderr so the summary stays pipeable.
    for (label, data) in [
        ("defaulters", &run.defaulters),
        ("non_defaulters", &run.non_defaulters),
    ] {
        if !data.warnings.is_empty() {
            eprint!("{}", crate::report::format_roster_warnings(label, &data.warnings));
        }
    }

    print!("{}", crate::report::format_plan_summary(&run.summary));

    if args.dry_run {
        println!("\nDry run: plan not written.");
        return Ok(());
    }

    crate::io::export::write_plan_csv(&args.output, &run.plan)?;
    println!("\nWrote plan: {}", args.output.display());
    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<(), AppError> {
    let defaulters = crate::io::roster::load_roster(&args.defaulters)?;
    let non_defaulters = crate::io::roster::load_roster(&args.non_defaulters)?;

    let reports = [
        crate::validate::validate_roster("defaulters", Cohort::Defaulter, &defaulters),
        crate::validate::validate_roster("non_defaulters", Cohort::NonDefaulter, &non_defaulters),
    ];

    for report in &reports {
        print!("{}", crate::report::format_validation_report(report));
    }

    let error_count: usize = reports.iter().map(|r| r.errors.len()).sum();
    if error_count > 0 {
        return Err(AppError::new(
            3,
            format!("Roster validation failed: {error_count} error(s)."),
        ));
    }
    Ok(())
}

/// Rewrite argv so `fulcrum` defaults to `fulcrum plan`.
///
/// Rules:
/// - `fulcrum`                      -> `fulcrum plan`
/// - `fulcrum --config x ...`       -> `fulcrum plan --config x ...`
/// - `fulcrum --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("plan".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "plan" | "validate");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "plan flags".
    if arg1.starts_with('-') {
        argv.insert(1, "plan".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(args: &[&str]) -> Vec<String> {
        let mut argv = vec!["fulcrum".to_string()];
        argv.extend(args.iter().map(|s| s.to_string()));
        rewrite_args(argv)
    }

    #[test]
    fn bare_invocation_defaults_to_plan() {
        assert_eq!(rewrite(&[]), vec!["fulcrum", "plan"]);
    }

    #[test]
    fn leading_flag_gets_plan_inserted() {
        assert_eq!(
            rewrite(&["--config", "x.toml"]),
            vec!["fulcrum", "plan", "--config", "x.toml"]
        );
    }

    #[test]
    fn explicit_subcommands_pass_through() {
        assert_eq!(rewrite(&["validate"]), vec!["fulcrum", "validate"]);
        assert_eq!(rewrite(&["plan", "-o", "p.csv"]), vec!["fulcrum", "plan", "-o", "p.csv"]);
    }

    #[test]
    fn help_and_version_pass_through() {
        assert_eq!(rewrite(&["--help"]), vec!["fulcrum", "--help"]);
        assert_eq!(rewrite(&["-V"]), vec!["fulcrum", "-V"]);
    }
}
