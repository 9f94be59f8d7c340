pub mod config;
pub mod error;
pub mod income;
pub mod real_estate;
pub mod rebase;
pub mod report;

pub use config::Config;
pub use error::{ErrorFamily, IndexError, Result};
pub use income::{Group, IncomeIndexBuilder, IncomeOptions, IncomeRecord, Quantile, RawIncomeTable};
pub use real_estate::{PriceIndex, PriceRecord, RealEstateIndexBuilder, RealEstateOptions};
pub use rebase::AnalysisWindow;
