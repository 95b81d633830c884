//! The planning core.
//!
//! Responsibilities:
//!
//! - resolve one anchor year per company, with a reason code (`anchor`)
//! - expand anchors into lookback windows (`expand`)
//! - emit the (company x year x document) job matrix (`matrix`)

pub mod anchor;
pub mod expand;
pub mod matrix;

pub use anchor::*;
pub use expand::*;
pub use matrix::*;
