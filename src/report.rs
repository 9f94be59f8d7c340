//! Plain-text rendering of both indices for the console.

use std::io::{self, Write};

use crate::income::IncomeRecord;
use crate::real_estate::PriceIndex;

/// Write the first and last `edge` income records; everything when the index
/// is short enough.
pub fn write_income<W: Write>(out: &mut W, records: &[IncomeRecord], edge: usize) -> io::Result<()> {
    writeln!(out, "{:>6}  {:<6}  {:<8}  {:>12}", "year", "group", "quantile", "income_index")?;
    if records.len() <= edge.saturating_mul(2) {
        for r in records {
            income_row(out, r)?;
        }
    } else {
        for r in &records[..edge] {
            income_row(out, r)?;
        }
        writeln!(out, "{:>6}  ({} more)", "...", records.len() - edge.saturating_mul(2))?;
        for r in &records[records.len() - edge..] {
            income_row(out, r)?;
        }
    }
    Ok(())
}

fn income_row<W: Write>(out: &mut W, r: &IncomeRecord) -> io::Result<()> {
    writeln!(
        out,
        "{:>6}  {:<6}  {:<8}  {:>12.3}",
        r.year,
        r.group.as_str(),
        r.quantile.as_str(),
        r.income_index
    )
}

pub fn write_prices<W: Write>(out: &mut W, index: &PriceIndex) -> io::Result<()> {
    if index.base_year_substituted() {
        writeln!(
            out,
            "Using base year for housing index: {} (requested {})",
            index.base_year, index.requested_base_year
        )?;
    } else {
        writeln!(out, "Using base year for housing index: {}", index.base_year)?;
    }
    writeln!(out, "{:>6}  {:>11}", "year", "price_index")?;
    for r in &index.records {
        writeln!(out, "{:>6}  {:>11.3}", r.year, r.price_index)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::income::{Group, Quantile};
    use crate::real_estate::PriceRecord;

    fn income(n: i32) -> Vec<IncomeRecord> {
        (0..n)
            .map(|i| IncomeRecord {
                year: 2015 + i,
                group: Group::Women,
                quantile: Quantile::P90,
                income_index: 100.0 + i as f64,
            })
            .collect()
    }

    #[test]
    fn short_income_index_is_printed_whole() -> anyhow::Result<()> {
        let mut buf = Vec::new();
        write_income(&mut buf, &income(3), 12)?;
        let text = String::from_utf8(buf)?;
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("Women"));
        assert!(text.contains("p90"));
        assert!(text.contains("102.000"));
        Ok(())
    }

    #[test]
    fn long_income_index_is_elided() -> anyhow::Result<()> {
        let mut buf = Vec::new();
        write_income(&mut buf, &income(9), 2)?;
        let text = String::from_utf8(buf)?;
        assert_eq!(text.lines().count(), 1 + 2 + 1 + 2);
        assert!(text.contains("(5 more)"));
        assert!(text.contains("2023"));
        assert!(!text.contains("2019"));
        Ok(())
    }

    #[test]
    fn huge_edge_prints_everything() -> anyhow::Result<()> {
        let mut buf = Vec::new();
        write_income(&mut buf, &income(5), usize::MAX)?;
        let text = String::from_utf8(buf)?;
        assert_eq!(text.lines().count(), 1 + 5);
        assert!(!text.contains("more)"));
        Ok(())
    }

    #[test]
    fn substituted_base_year_is_reported() -> anyhow::Result<()> {
        let index = PriceIndex {
            requested_base_year: 2015,
            base_year: 2017,
            records: vec![PriceRecord {
                year: 2017,
                price_index: 100.0,
            }],
        };
        let mut buf = Vec::new();
        write_prices(&mut buf, &index)?;
        let text = String::from_utf8(buf)?;
        assert!(text.starts_with("Using base year for housing index: 2017 (requested 2015)"));
        assert!(text.contains("100.000"));
        Ok(())
    }
}
