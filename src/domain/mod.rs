//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - policy enums (`YearOrder`, anchor modes, `SourceId`)
//! - normalized roster rows (`CompanyRecord`)
//! - resolver output (`ResolvedAnchor`, `AnchorReason`)
//! - the plan's atomic output row (`JobRecord`)

pub mod types;

pub use types::*;
