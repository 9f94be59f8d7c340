//! Run configuration. Every value ends up in the options passed to a builder;
//! nothing here is global.

use serde::Deserialize;
use std::{fs, path::PathBuf};

use crate::error::{IndexError, Result};
use crate::income::IncomeOptions;
use crate::real_estate::{
    builder::{DEFAULT_PRICE_COLUMN, DEFAULT_SNAPSHOT_PATTERN},
    RealEstateOptions,
};
use crate::rebase::{AnalysisWindow, DEFAULT_BASE_YEAR};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_year: i32,
    pub window: AnalysisWindow,
    pub income: IncomeConfig,
    pub real_estate: RealEstateConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_year: DEFAULT_BASE_YEAR,
            window: AnalysisWindow::DEFAULT,
            income: IncomeConfig::default(),
            real_estate: RealEstateConfig::default(),
        }
    }
}

/// Where the income sheet export lives and how it is laid out.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IncomeConfig {
    pub path: PathBuf,
    /// Zero-based record holding the column names.
    pub header_row: usize,
    pub delimiter: char,
    pub label_column: usize,
    pub group_column: usize,
    pub expected_years: Option<YearRange>,
}

impl Default for IncomeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/income/nettojahreseinkommen.csv"),
            header_row: 1,
            delimiter: ';',
            label_column: 0,
            group_column: 1,
            expected_years: None,
        }
    }
}

impl IncomeConfig {
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| IndexError::InvalidSetting {
                name: "income.delimiter".into(),
                reason: format!("'{}' is not a single ASCII character", self.delimiter),
            })
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RealEstateConfig {
    pub dir: PathBuf,
    pub pattern: String,
    pub price_column: String,
}

impl Default for RealEstateConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/housing"),
            pattern: DEFAULT_SNAPSHOT_PATTERN.to_string(),
            price_column: DEFAULT_PRICE_COLUMN.to_string(),
        }
    }
}

impl Config {
    /// Load from a YAML file; missing keys take their defaults.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let text = fs::read_to_string(&path).map_err(|e| IndexError::io(&path, e))?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot. Run again after any override.
    pub fn validate(&self) -> Result<()> {
        if self.window.start > self.window.end {
            return Err(IndexError::InvalidSetting {
                name: "window".into(),
                reason: format!("start {} is after end {}", self.window.start, self.window.end),
            });
        }
        if self.income.label_column == self.income.group_column {
            return Err(IndexError::InvalidSetting {
                name: "income.group_column".into(),
                reason: "label and group columns must differ".into(),
            });
        }
        if self.real_estate.price_column.trim().is_empty() {
            return Err(IndexError::InvalidSetting {
                name: "real_estate.price_column".into(),
                reason: "must not be empty".into(),
            });
        }
        self.income.delimiter_byte()?;
        Ok(())
    }

    pub fn income_options(&self) -> IncomeOptions {
        IncomeOptions {
            base_year: self.base_year,
            window: self.window,
            label_column: self.income.label_column,
            group_column: self.income.group_column,
            expected_years: self.income.expected_years.map(|r| r.start..=r.end),
        }
    }

    pub fn real_estate_options(&self) -> RealEstateOptions {
        RealEstateOptions {
            price_column: self.real_estate.price_column.clone(),
            pattern: self.real_estate.pattern.clone(),
            base_year: self.base_year,
            window: self.window,
        }
    }
}
