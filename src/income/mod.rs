//! Income distribution index: quantile rows of a wide statistics sheet,
//! reshaped to long form and rebased per (group, quantile).

pub mod builder;
pub mod table;

pub use builder::{forward_fill, IncomeIndexBuilder, IncomeOptions};
pub use table::{read_income_csv, Cell, RawIncomeTable};

use serde::Serialize;
use std::fmt;

/// Population group a quantile row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Group {
    Both,
    Women,
    Men,
}

impl Group {
    /// Map a trimmed group label from the sheet (German or English, any case).
    pub fn from_label(label: &str) -> Option<Group> {
        match label.trim().to_lowercase().as_str() {
            "frauen und männer" | "both" => Some(Group::Both),
            "frauen" | "women" => Some(Group::Women),
            "männer" | "men" => Some(Group::Men),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Both => "Both",
            Group::Women => "Women",
            Group::Men => "Men",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantile {
    P10,
    Median,
    P90,
}

impl Quantile {
    /// Exact match on the sheet's quantile labels; anything else is not a
    /// quantile row.
    pub fn from_label(label: &str) -> Option<Quantile> {
        match label {
            "10%-Quantil" => Some(Quantile::P10),
            "Median" => Some(Quantile::Median),
            "90%-Quantil" => Some(Quantile::P90),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quantile::P10 => "p10",
            Quantile::Median => "median",
            Quantile::P90 => "p90",
        }
    }
}

impl fmt::Display for Quantile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rebased point of the income index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeRecord {
    pub year: i32,
    pub group: Group,
    pub quantile: Quantile,
    pub income_index: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_labels() {
        assert_eq!(Group::from_label(" Frauen und Männer "), Some(Group::Both));
        assert_eq!(Group::from_label("FRAUEN"), Some(Group::Women));
        assert_eq!(Group::from_label("men"), Some(Group::Men));
        assert_eq!(Group::from_label("Kinder"), None);
    }

    #[test]
    fn quantile_labels_are_exact() {
        assert_eq!(Quantile::from_label("10%-Quantil"), Some(Quantile::P10));
        assert_eq!(Quantile::from_label("Median"), Some(Quantile::Median));
        assert_eq!(Quantile::from_label("90%-Quantil"), Some(Quantile::P90));
        assert_eq!(Quantile::from_label("median"), None);
        assert_eq!(Quantile::from_label("25%-Quantil"), None);
    }
}
