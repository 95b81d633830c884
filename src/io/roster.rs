//! Roster CSV ingest and normalization.
//!
//! This module turns a heterogeneous company-list CSV (CIBIL exports and the
//! like) into clean `CompanyRecord`s that are safe to plan over.
//!
//! Design goals:
//! - **Flexible headers**: common export column names are aliased onto the
//!   canonical schema (company_name, cin, sector, default_year,
//!   fy_before_default)
//! - **Row-level recovery**: a malformed row is downgraded to a warning, it
//!   never aborts the batch
//! - **Deterministic behavior**: record order is roster order, no hidden
//!   reordering

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::CompanyRecord;
use crate::error::AppError;

/// A row-level issue encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowWarning {
    pub line: usize,
    pub company: Option<String>,
    pub message: String,
}

/// Ingest output: normalized records + warnings + counts.
#[derive(Debug, Clone)]
pub struct RosterData {
    pub records: Vec<CompanyRecord>,
    pub warnings: Vec<RowWarning>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a roster CSV from disk.
pub fn load_roster(path: &Path) -> Result<RosterData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(3, format!("Failed to open roster '{}': {e}", path.display()))
    })?;
    read_roster(file).map_err(|e| {
        AppError::new(e.exit_code(), format!("{}: {e}", path.display()))
    })
}

/// Read and normalize a roster from any reader.
pub fn read_roster<R: Read>(reader: R) -> Result<RosterData, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AppError::new(3, format!("Failed to read roster headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    if !header_map.contains_key("company_name") {
        return Err(AppError::new(
            3,
            "Missing required column: `company_name` (or a recognized alias such as `borrower name`)",
        ));
    }

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in csv_reader.records().enumerate() {
        // +2: records() starts after the header row, and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warnings.push(RowWarning {
                    line,
                    company: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let Some(company_name) = get_field(&record, &header_map, "company_name") else {
            warnings.push(RowWarning {
                line,
                company: None,
                message: "Missing `company_name`; row skipped.".to_string(),
            });
            continue;
        };
        let company_name = company_name.to_string();

        let cin = match get_field(&record, &header_map, "cin") {
            Some(raw) => {
                let normalized = normalize_cin(raw);
                if normalized.is_none() {
                    warnings.push(RowWarning {
                        line,
                        company: Some(company_name.clone()),
                        message: format!(
                            "Invalid CIN '{raw}' (expected 21 alphanumeric characters); treated as absent."
                        ),
                    });
                }
                normalized
            }
            None => None,
        };

        records.push(CompanyRecord {
            company_name,
            cin,
            sector: get_field(&record, &header_map, "sector").map(str::to_string),
            fy_before_default: parse_year(get_field(&record, &header_map, "fy_before_default")),
            default_year: parse_year(get_field(&record, &header_map, "default_year")),
        });
    }

    let rows_used = records.len();
    Ok(RosterData {
        records,
        warnings,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<&'static str, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        if let Some(canonical) = canonical_column(name) {
            // First matching column wins; later duplicates are ignored.
            map.entry(canonical).or_insert(idx);
        }
    }
    map
}

/// Map a raw header onto the canonical schema.
///
/// Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
/// first header; strip it before matching or the required-column check would
/// incorrectly fail.
fn canonical_column(raw: &str) -> Option<&'static str> {
    let name = raw.trim().trim_start_matches('\u{feff}').to_ascii_lowercase();
    match name.as_str() {
        "company_name" | "company name" | "borrower name" | "borrower" | "name of borrower"
        | "name" => Some("company_name"),
        "cin" | "corporate identification number" | "company registration number"
        | "registration number" | "company id" => Some("cin"),
        "sector" | "industry" => Some("sector"),
        "default_year" | "default year" | "year of default" => Some("default_year"),
        "fy_before_default" | "fy before default" | "anchor_fy" => Some("fy_before_default"),
        _ => None,
    }
}

fn get_field<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<&'static str, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Parse year-like values such as `2021`, `"2021"`, `"2021.0"`.
///
/// Spreadsheet round-trips routinely turn integer years into floats and blank
/// cells into `nan`/`NA`/`-`; all of those read as "absent". Values outside
/// 1900..=2100 are rejected as implausible.
pub fn parse_year(value: Option<&str>) -> Option<i32> {
    let text = value?.trim();
    if text.is_empty() {
        return None;
    }
    let lower = text.to_ascii_lowercase();
    if matches!(lower.as_str(), "nan" | "na" | "none" | "-") {
        return None;
    }
    let text = text.strip_suffix(".0").unwrap_or(text);
    let year: i32 = text.parse().ok()?;
    if (1900..=2100).contains(&year) {
        Some(year)
    } else {
        None
    }
}

/// Normalize and validate a CIN.
///
/// Spaces are stripped and the result uppercased. A CIN is accepted when it
/// has the canonical 21-character structure, or - best effort, matching messy
/// real-world exports - when it is any 21-character alphanumeric string.
pub fn normalize_cin(raw: &str) -> Option<String> {
    let cin: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    if cin.is_empty() || matches!(cin.as_str(), "NAN" | "NA" | "-") {
        return None;
    }
    if cin.len() == 21 && cin.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Some(cin)
    } else {
        None
    }
}

/// Whether a normalized CIN has the canonical structure:
/// listing char + 5-digit industry + 2-letter state + 4-digit year +
/// 3-letter type + 6-digit registration.
pub fn cin_has_canonical_shape(cin: &str) -> bool {
    let b = cin.as_bytes();
    b.len() == 21
        && b[0].is_ascii_alphabetic()
        && b[1..6].iter().all(u8::is_ascii_digit)
        && b[6..8].iter().all(u8::is_ascii_alphabetic)
        && b[8..12].iter().all(u8::is_ascii_digit)
        && b[12..15].iter().all(u8::is_ascii_alphabetic)
        && b[15..21].iter().all(u8::is_ascii_digit)
}
