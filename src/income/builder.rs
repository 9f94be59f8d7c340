use std::{collections::BTreeSet, ops::RangeInclusive};
use tracing::{debug, info, warn};

use super::{Group, IncomeRecord, Quantile, RawIncomeTable};
use crate::error::{IndexError, Result};
use crate::rebase::{base_values, to_index, AnalysisWindow, DEFAULT_BASE_YEAR};

/// Parameters of one income index build.
#[derive(Debug, Clone)]
pub struct IncomeOptions {
    pub base_year: i32,
    pub window: AnalysisWindow,
    /// Column holding the quantile label.
    pub label_column: usize,
    /// Column holding the (merged, sparsely filled) group label.
    pub group_column: usize,
    /// When set, only digit-only headers inside this range are year columns.
    pub expected_years: Option<RangeInclusive<i32>>,
}

impl Default for IncomeOptions {
    fn default() -> Self {
        Self {
            base_year: DEFAULT_BASE_YEAR,
            window: AnalysisWindow::DEFAULT,
            label_column: 0,
            group_column: 1,
            expected_years: None,
        }
    }
}

type Key = (Group, Quantile);

struct LongRow {
    key: Key,
    year: i32,
    raw: f64,
}

pub struct IncomeIndexBuilder {
    options: IncomeOptions,
}

impl IncomeIndexBuilder {
    pub fn new(options: IncomeOptions) -> Self {
        Self { options }
    }

    /// Reshape the wide sheet to long form and rebase every (group, quantile)
    /// series to the base year. Output is sorted by (group, quantile, year).
    #[tracing::instrument(level = "info", skip(self, table), fields(base_year = self.options.base_year))]
    pub fn build(&self, table: &RawIncomeTable) -> Result<Vec<IncomeRecord>> {
        let opts = &self.options;

        // 1) keep quantile rows only
        let mut quantile_rows: Vec<(usize, Quantile)> = Vec::new();
        let mut dropped = 0usize;
        for row in 0..table.rows.len() {
            let cell = table.cell(row, opts.label_column);
            match cell.raw_text().and_then(Quantile::from_label) {
                Some(q) => quantile_rows.push((row, q)),
                None => {
                    if let Some(label) = cell.as_text() {
                        debug!(row, label = %label, "dropping row without quantile label");
                        dropped += 1;
                    }
                }
            }
        }
        if dropped > 0 {
            warn!(dropped, "rows with unrecognised labels were excluded");
        }
        if quantile_rows.is_empty() {
            warn!("no quantile rows found in income table");
            return Ok(Vec::new());
        }

        // 2) resolve merged group cells
        let group_cells: Vec<(usize, Option<String>)> = quantile_rows
            .iter()
            .map(|&(row, _)| (row, table.cell(row, opts.group_column).as_text()))
            .collect();
        let labels = forward_fill(group_cells.iter().map(|(row, c)| (*row, c.as_deref())))?;
        let mut seen: BTreeSet<Key> = BTreeSet::new();
        let mut keys: Vec<(usize, Key)> = Vec::with_capacity(quantile_rows.len());
        for (&(row, quantile), label) in quantile_rows.iter().zip(labels) {
            let group = Group::from_label(label).ok_or_else(|| IndexError::UnknownGroup {
                label: label.to_string(),
            })?;
            if !seen.insert((group, quantile)) {
                return Err(IndexError::DuplicateSeries {
                    group: group.to_string(),
                    quantile: quantile.to_string(),
                    row,
                });
            }
            keys.push((row, (group, quantile)));
        }

        // 3) year columns
        let year_columns = self.year_columns(&table.headers);
        debug!(count = year_columns.len(), "detected year columns");

        // 4) wide -> long, restricted to the window
        let mut long: Vec<LongRow> = Vec::with_capacity(keys.len() * year_columns.len());
        for &(row, key) in &keys {
            for &(col, year) in &year_columns {
                if !opts.window.contains(year) {
                    continue;
                }
                match table.cell(row, col).as_number() {
                    Some(raw) => long.push(LongRow { key, year, raw }),
                    None => debug!(row, year, "skipping empty income cell"),
                }
            }
        }

        // 5) rebase per key
        let bases = base_values(
            long.iter().map(|r| (&r.key, r.year, r.raw)),
            opts.base_year,
        );
        let present: BTreeSet<Key> = long.iter().map(|r| r.key).collect();
        for key in &present {
            match bases.get(key) {
                None => {
                    return Err(IndexError::MissingBaseYear {
                        group: key.0.to_string(),
                        quantile: key.1.to_string(),
                        base_year: opts.base_year,
                    })
                }
                Some(base) if *base == 0.0 => {
                    return Err(IndexError::ZeroBaseValue {
                        key: format!("{}/{}", key.0, key.1),
                        base_year: opts.base_year,
                    })
                }
                Some(_) => {}
            }
        }

        let mut records: Vec<IncomeRecord> = long
            .into_iter()
            .map(|r| IncomeRecord {
                year: r.year,
                group: r.key.0,
                quantile: r.key.1,
                income_index: to_index(r.raw, bases[&r.key]),
            })
            .collect();
        records.sort_by_key(|r| (r.group, r.quantile, r.year));

        info!(
            series = present.len(),
            records = records.len(),
            "built income index"
        );
        Ok(records)
    }

    /// Headers made only of decimal digits, parsed to years, excluding the
    /// label and group columns.
    fn year_columns(&self, headers: &[String]) -> Vec<(usize, i32)> {
        let opts = &self.options;
        headers
            .iter()
            .enumerate()
            .filter(|(col, _)| *col != opts.label_column && *col != opts.group_column)
            .filter_map(|(col, header)| {
                let h = header.trim();
                if h.is_empty() || !h.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                let year: i32 = h.parse().ok()?;
                match &opts.expected_years {
                    Some(range) if !range.contains(&year) => {
                        debug!(header = h, "digit-only header outside expected years");
                        None
                    }
                    _ => Some((col, year)),
                }
            })
            .collect()
    }
}

/// Propagate the last non-blank label forward through `cells`, given as
/// `(row, label)` in sheet order. Fails if the first cell is blank.
pub fn forward_fill<'a, I>(cells: I) -> Result<Vec<&'a str>>
where
    I: IntoIterator<Item = (usize, Option<&'a str>)>,
{
    let mut current: Option<&'a str> = None;
    let mut out = Vec::new();
    for (row, cell) in cells {
        if let Some(label) = cell.map(str::trim).filter(|s| !s.is_empty()) {
            current = Some(label);
        }
        match current {
            Some(label) => out.push(label),
            None => return Err(IndexError::MissingGroupLabel { row }),
        }
    }
    Ok(out)
}
