use affordability::{
    income::read_income_csv, report, Config, IncomeIndexBuilder, RealEstateIndexBuilder,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::{
    io::{self, Write},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Rebased income and housing price indices")]
struct Args {
    /// YAML configuration; defaults apply to anything it leaves out.
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    base_year: Option<i32>,
    /// Delimited export of the income sheet.
    #[arg(long)]
    income: Option<PathBuf>,
    /// Directory holding the yearly snapshot files.
    #[arg(long)]
    housing_dir: Option<PathBuf>,
    #[arg(long)]
    price_column: Option<String>,
    /// Income rows shown at each end of the table.
    #[arg(long, default_value_t = 12)]
    rows: usize,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    // ─── 2) configuration ────────────────────────────────────────────
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(year) = args.base_year {
        config.base_year = year;
    }
    if let Some(path) = args.income {
        config.income.path = path;
    }
    if let Some(dir) = args.housing_dir {
        config.real_estate.dir = dir;
    }
    if let Some(column) = args.price_column {
        config.real_estate.price_column = column;
    }
    config.validate().context("validating configuration")?;
    info!(base_year = config.base_year, "startup");

    // ─── 3) income index ─────────────────────────────────────────────
    let delimiter = config.income.delimiter_byte()?;
    let table = read_income_csv(&config.income.path, config.income.header_row, delimiter)
        .with_context(|| format!("reading income sheet {}", config.income.path.display()))?;
    let income = IncomeIndexBuilder::new(config.income_options())
        .build(&table)
        .context("building income index")?;

    // ─── 4) real estate index ────────────────────────────────────────
    let prices = RealEstateIndexBuilder::new(config.real_estate_options())
        .build_from_dir(&config.real_estate.dir)
        .with_context(|| {
            format!(
                "building housing index from {}",
                config.real_estate.dir.display()
            )
        })?;

    // ─── 5) print ────────────────────────────────────────────────────
    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_income(&mut out, &income, args.rows)?;
    writeln!(out)?;
    report::write_prices(&mut out, &prices)?;

    info!("all done");
    Ok(())
}
