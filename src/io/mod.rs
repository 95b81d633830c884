//! Input/output helpers.
//!
//! - roster CSV ingest + normalization (`roster`)
//! - plan CSV writer (`export`)

pub mod export;
pub mod roster;

pub use export::*;
pub use roster::*;
