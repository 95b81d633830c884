//! Target-year expansion.

use crate::domain::YearOrder;

/// Expand an anchor year into its lookback window.
///
/// Produces `lookback_years` consecutive fiscal years ending at the anchor:
/// `[anchor, anchor-1, ..]` for descending order, reversed for ascending.
/// Years are distinct by construction, so there is nothing to deduplicate.
pub fn target_years(anchor_fy: i32, lookback_years: u32, order: YearOrder) -> Vec<i32> {
    let mut years: Vec<i32> = (0..lookback_years as i32).map(|i| anchor_fy - i).collect();
    if order == YearOrder::Asc {
        years.reverse();
    }
    years
}
