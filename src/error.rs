//! Error taxonomy for both index builders.
//!
//! Every failure is terminal for the invocation that raised it: builders
//! return an [`IndexError`] before emitting any record.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Coarse classification of an [`IndexError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFamily {
    /// The inputs do not have the shape the run was configured for.
    Configuration,
    /// The inputs have the right shape but the values cannot be indexed.
    DataIntegrity,
    /// Reading or decoding an input failed.
    Io,
}

#[derive(Debug, Error)]
pub enum IndexError {
    // ---------------------------------------------------------------
    // Configuration
    // ---------------------------------------------------------------
    #[error("no files matching `{pattern}` found in {}", dir.display())]
    NoDataFound { dir: PathBuf, pattern: String },

    #[error("could not extract year from filename: {file}")]
    UnparseableFilename { file: String },

    #[error("column '{column}' not found in {file}. Available columns: {available:?}")]
    MissingColumn {
        file: String,
        column: String,
        available: Vec<String>,
    },

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: String, reason: String },

    // ---------------------------------------------------------------
    // Data integrity
    // ---------------------------------------------------------------
    #[error("no value for base year {base_year} for group {group}, quantile {quantile}")]
    MissingBaseYear {
        group: String,
        quantile: String,
        base_year: i32,
    },

    #[error("group {group}, quantile {quantile} appears on more than one row (row {row})")]
    DuplicateSeries {
        group: String,
        quantile: String,
        row: usize,
    },

    #[error("value for base year {base_year} is zero for {key}")]
    ZeroBaseValue { key: String, base_year: i32 },

    #[error("first quantile row (row {row}) has no group label to inherit")]
    MissingGroupLabel { row: usize },

    #[error("unknown group label '{label}'")]
    UnknownGroup { label: String },

    #[error("column '{column}' in {file} holds no numeric values")]
    NoPriceValues { file: String, column: String },

    #[error("no records left inside analysis window {start}..={end}")]
    EmptyWindow { start: i32, end: i32 },

    // ---------------------------------------------------------------
    // Wrapped sources
    // ---------------------------------------------------------------
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl IndexError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn family(&self) -> ErrorFamily {
        match self {
            IndexError::NoDataFound { .. }
            | IndexError::UnparseableFilename { .. }
            | IndexError::MissingColumn { .. }
            | IndexError::InvalidSetting { .. }
            | IndexError::Config(_) => ErrorFamily::Configuration,
            IndexError::MissingBaseYear { .. }
            | IndexError::DuplicateSeries { .. }
            | IndexError::ZeroBaseValue { .. }
            | IndexError::MissingGroupLabel { .. }
            | IndexError::UnknownGroup { .. }
            | IndexError::NoPriceValues { .. }
            | IndexError::EmptyWindow { .. } => ErrorFamily::DataIntegrity,
            IndexError::Io { .. }
            | IndexError::Csv(_)
            | IndexError::Parquet(_)
            | IndexError::Arrow(_)
            | IndexError::Glob(_) => ErrorFamily::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_lists_available_columns() {
        let err = IndexError::MissingColumn {
            file: "flats_2019.parquet".into(),
            column: "price_per_m2".into(),
            available: vec!["area".into(), "price".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("flats_2019.parquet"));
        assert!(msg.contains("\"area\""));
        assert!(msg.contains("\"price\""));
        assert_eq!(err.family(), ErrorFamily::Configuration);
    }

    #[test]
    fn base_year_errors_are_data_integrity() {
        let err = IndexError::MissingBaseYear {
            group: "Women".into(),
            quantile: "p90".into(),
            base_year: 2015,
        };
        assert!(err.to_string().contains("Women"));
        assert!(err.to_string().contains("p90"));
        assert_eq!(err.family(), ErrorFamily::DataIntegrity);
    }
}
