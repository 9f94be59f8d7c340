use rayon::prelude::*;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{info, warn};

use super::{
    discover::{discover_snapshots, year_from_filename},
    PriceIndex, PriceRecord, PriceSnapshot,
};
use crate::error::{IndexError, Result};
use crate::rebase::{to_index, AnalysisWindow, DEFAULT_BASE_YEAR};

pub const DEFAULT_PRICE_COLUMN: &str = "price_per_m2";
pub const DEFAULT_SNAPSHOT_PATTERN: &str = "flats_*.parquet";

#[derive(Debug, Clone)]
pub struct RealEstateOptions {
    pub price_column: String,
    /// Glob matched against file names inside the snapshot directory.
    pub pattern: String,
    pub base_year: i32,
    pub window: AnalysisWindow,
}

impl Default for RealEstateOptions {
    fn default() -> Self {
        Self {
            price_column: DEFAULT_PRICE_COLUMN.to_string(),
            pattern: DEFAULT_SNAPSHOT_PATTERN.to_string(),
            base_year: DEFAULT_BASE_YEAR,
            window: AnalysisWindow::DEFAULT,
        }
    }
}

/// The one statistic kept per snapshot file.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    pub file: String,
    pub price_median: f64,
}

pub struct RealEstateIndexBuilder {
    options: RealEstateOptions,
}

impl RealEstateIndexBuilder {
    pub fn new(options: RealEstateOptions) -> Self {
        Self { options }
    }

    /// Discover the snapshot files in `dir` and build the price index.
    #[tracing::instrument(level = "info", skip(self, dir), fields(dir = %dir.as_ref().display()))]
    pub fn build_from_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PriceIndex> {
        let files = discover_snapshots(dir.as_ref(), &self.options.pattern)?;
        self.build(&files)
    }

    /// Build the price index from an explicit, ordered list of snapshot files.
    pub fn build(&self, files: &[PathBuf]) -> Result<PriceIndex> {
        if files.is_empty() {
            return Err(IndexError::NoDataFound {
                dir: PathBuf::from("."),
                pattern: self.options.pattern.clone(),
            });
        }

        // every file name must carry a year before anything is read
        let dated: Vec<(i32, &PathBuf)> = files
            .iter()
            .map(|p| year_from_filename(p).map(|year| (year, p)))
            .collect::<Result<_>>()?;

        let start = Instant::now();
        let column = self.options.price_column.as_str();
        let summaries: Vec<YearSummary> = dated
            .par_iter()
            .map(|&(year, path)| -> Result<YearSummary> {
                let snapshot = PriceSnapshot::load(path, year, column)?;
                let price_median = snapshot.median(column)?;
                info!(
                    file = %snapshot.file,
                    year,
                    rows = snapshot.prices.len(),
                    price_median,
                    "summarised snapshot"
                );
                Ok(YearSummary {
                    year,
                    file: snapshot.file,
                    price_median,
                })
            })
            .collect::<Result<_>>()?;
        info!(files = summaries.len(), elapsed = ?start.elapsed(), "read snapshots");

        self.index(summaries)
    }

    /// Aggregate per-year summaries, restrict them to the window and rebase.
    /// Summaries are taken in discovery order; a later one for an already seen
    /// year replaces the earlier.
    pub fn index(&self, summaries: Vec<YearSummary>) -> Result<PriceIndex> {
        let opts = &self.options;

        let mut by_year: BTreeMap<i32, YearSummary> = BTreeMap::new();
        for summary in summaries {
            let year = summary.year;
            if let Some(previous) = by_year.insert(year, summary) {
                warn!(
                    year,
                    replaced = %previous.file,
                    kept = %by_year[&year].file,
                    "several snapshot files for one year; keeping the last"
                );
            }
        }
        by_year.retain(|year, _| opts.window.contains(*year));

        let first_year = match by_year.keys().next() {
            Some(y) => *y,
            None => {
                return Err(IndexError::EmptyWindow {
                    start: opts.window.start,
                    end: opts.window.end,
                })
            }
        };

        let base_year = if by_year.contains_key(&opts.base_year) {
            opts.base_year
        } else {
            warn!(
                requested = opts.base_year,
                effective = first_year,
                "base year not available for housing index; using earliest year"
            );
            first_year
        };

        let base = by_year[&base_year].price_median;
        if base == 0.0 {
            return Err(IndexError::ZeroBaseValue {
                key: "price_median".to_string(),
                base_year,
            });
        }

        let records = by_year
            .values()
            .map(|s| PriceRecord {
                year: s.year,
                price_index: to_index(s.price_median, base),
            })
            .collect();

        info!(base_year, "using base year for housing index");
        Ok(PriceIndex {
            requested_base_year: opts.base_year,
            base_year,
            records,
        })
    }
}
