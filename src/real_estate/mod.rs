//! Real-estate price index: one median price per yearly snapshot file,
//! rebased to a base year with a fallback to the earliest available year.

pub mod builder;
pub mod discover;
pub mod snapshot;

pub use builder::{RealEstateIndexBuilder, RealEstateOptions, YearSummary};
pub use discover::{discover_snapshots, year_from_filename};
pub use snapshot::PriceSnapshot;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    pub year: i32,
    pub price_index: f64,
}

/// Output of [`RealEstateIndexBuilder`]: the records plus the base year that
/// was actually used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceIndex {
    pub requested_base_year: i32,
    /// Effective base year; the record for it has `price_index == 100`.
    pub base_year: i32,
    pub records: Vec<PriceRecord>,
}

impl PriceIndex {
    pub fn base_year_substituted(&self) -> bool {
        self.requested_base_year != self.base_year
    }
}
