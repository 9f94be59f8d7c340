//! Shared index arithmetic: the analysis window, rebasing to a base year
//! and the per-snapshot median.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_BASE_YEAR: i32 = 2015;

/// Inclusive range of years kept in every output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub start: i32,
    pub end: i32,
}

impl AnalysisWindow {
    pub const DEFAULT: AnalysisWindow = AnalysisWindow {
        start: 2015,
        end: 2023,
    };

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl Default for AnalysisWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// `value` as a percentage of `base`.
#[inline]
pub fn to_index(value: f64, base: f64) -> f64 {
    value / base * 100.0
}

/// Collect the value at `base_year` for every key, in one pass.
///
/// If a key carries several points at `base_year` the first one wins.
pub fn base_values<'a, K, I>(points: I, base_year: i32) -> BTreeMap<K, f64>
where
    K: Ord + Clone + 'a,
    I: IntoIterator<Item = (&'a K, i32, f64)>,
{
    let mut out = BTreeMap::new();
    for (key, year, value) in points {
        if year == base_year {
            out.entry(key.clone()).or_insert(value);
        }
    }
    out
}

/// Median of the non-NaN values, averaging the two middle values for an
/// even count. `None` for an empty input.
pub fn median<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let mut v: Vec<f64> = values.into_iter().filter(|x| !x.is_nan()).collect();
    if v.is_empty() {
        return None;
    }
    v.sort_unstable_by(f64::total_cmp);
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        Some((v[mid - 1] + v[mid]) / 2.0)
    } else {
        Some(v[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn window_is_inclusive() {
        let w = AnalysisWindow::default();
        assert!(!w.contains(2014));
        assert!(w.contains(2015));
        assert!(w.contains(2023));
        assert!(!w.contains(2024));
    }

    #[test]
    fn to_index_is_percent_of_base() {
        assert!(close(to_index(95.0, 95.0), 100.0));
        assert!(close(to_index(100.0, 95.0), 105.263_157_894_736_84));
        assert!(close(to_index(108.0, 95.0), 113.684_210_526_315_8));
    }

    #[test]
    fn base_values_per_key() {
        let a = "a".to_string();
        let b = "b".to_string();
        let points = vec![(&a, 2015, 10.0), (&a, 2016, 12.0), (&b, 2015, 4.0), (&b, 2016, 5.0)];
        let map = base_values(points, 2015);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&a], 10.0);
        assert_eq!(map[&b], 4.0);
    }

    #[test]
    fn median_odd_even_and_nan() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(vec![f64::NAN, 5.0, 1.0]), Some(3.0));
        assert_eq!(median(Vec::<f64>::new()), None);
        assert_eq!(median(vec![f64::NAN]), None);
    }
}
