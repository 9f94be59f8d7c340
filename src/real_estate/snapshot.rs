use arrow::{
    array::{Array, ArrayRef, Float64Array},
    compute::cast,
    datatypes::DataType,
    error::ArrowError,
};
use parquet::arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ProjectionMask};
use std::{fs::File, path::Path};

use super::discover::file_name;
use crate::error::{IndexError, Result};
use crate::rebase::median;

/// The price column of one yearly snapshot file.
#[derive(Debug, Clone)]
pub struct PriceSnapshot {
    pub file: String,
    pub year: i32,
    /// Non-missing prices, in file order.
    pub prices: Vec<f64>,
}

impl PriceSnapshot {
    /// Decode only `column` from the parquet file at `path`.
    #[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P, year: i32, column: &str) -> Result<Self> {
        let path = path.as_ref();
        let file_name = file_name(path);
        let file = File::open(path).map_err(|e| IndexError::io(path, e))?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let schema = builder.schema().clone();
        let idx = schema.index_of(column).map_err(|_| IndexError::MissingColumn {
            file: file_name.clone(),
            column: column.to_string(),
            available: schema.fields().iter().map(|f| f.name().clone()).collect(),
        })?;

        let mask = ProjectionMask::roots(builder.parquet_schema(), [idx]);
        let reader = builder.with_projection(mask).build()?;

        let mut prices = Vec::new();
        for batch in reader {
            let batch = batch?;
            push_prices(batch.column(0), &mut prices)?;
        }

        Ok(Self {
            file: file_name,
            year,
            prices,
        })
    }

    /// Median price, ignoring missing values.
    pub fn median(&self, column: &str) -> Result<f64> {
        median(self.prices.iter().copied()).ok_or_else(|| IndexError::NoPriceValues {
            file: self.file.clone(),
            column: column.to_string(),
        })
    }
}

/// Append the non-null values of `array`, cast to f64.
fn push_prices(array: &ArrayRef, out: &mut Vec<f64>) -> Result<()> {
    let casted = cast(array, &DataType::Float64)?;
    let floats = casted
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| ArrowError::CastError("price column is not numeric".into()))?;
    out.reserve(floats.len() - floats.null_count());
    out.extend(floats.iter().flatten().filter(|v| !v.is_nan()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::{
        array::{Int64Array, StringArray},
        datatypes::{Field, Schema},
        record_batch::RecordBatch,
    };
    use parquet::{
        arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties,
    };
    use std::{path::PathBuf, sync::Arc};
    use tempfile::{tempdir, TempDir};

    /// Write a `district` + `price_per_m2` snapshot and return its path.
    fn snapshot_file(prices: ArrayRef, price_type: DataType) -> anyhow::Result<(TempDir, PathBuf)> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("district", DataType::Utf8, false),
            Field::new("price_per_m2", price_type, true),
        ]));
        let districts = Arc::new(StringArray::from(vec!["1010"; prices.len()])) as ArrayRef;
        let batch = RecordBatch::try_new(schema.clone(), vec![districts, prices])?;

        let dir = tempdir()?;
        let path = dir.path().join("flats_2016.parquet");
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(File::create(&path)?, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
        Ok((dir, path))
    }

    #[test]
    fn median_skips_nulls() -> anyhow::Result<()> {
        let prices = Arc::new(Float64Array::from(vec![Some(3150.0), None, Some(3000.0), Some(3300.0)]));
        let (_dir, path) = snapshot_file(prices, DataType::Float64)?;
        let snap = PriceSnapshot::load(&path, 2016, "price_per_m2")?;
        assert_eq!(snap.file, "flats_2016.parquet");
        assert_eq!(snap.year, 2016);
        assert_eq!(snap.prices.len(), 3);
        assert_eq!(snap.median("price_per_m2")?, 3150.0);
        Ok(())
    }

    #[test]
    fn integer_prices_are_cast() -> anyhow::Result<()> {
        let prices = Arc::new(Int64Array::from(vec![4000, 2000]));
        let (_dir, path) = snapshot_file(prices, DataType::Int64)?;
        let snap = PriceSnapshot::load(&path, 2016, "price_per_m2")?;
        assert_eq!(snap.median("price_per_m2")?, 3000.0);
        Ok(())
    }

    #[test]
    fn missing_column_lists_what_is_there() -> anyhow::Result<()> {
        let prices = Arc::new(Float64Array::from(vec![1.0]));
        let (_dir, path) = snapshot_file(prices, DataType::Float64)?;
        let err = PriceSnapshot::load(&path, 2016, "eur_per_sqm").unwrap_err();
        match err {
            IndexError::MissingColumn {
                file,
                column,
                available,
            } => {
                assert_eq!(file, "flats_2016.parquet");
                assert_eq!(column, "eur_per_sqm");
                assert_eq!(available, vec!["district", "price_per_m2"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn all_null_column_has_no_median() -> anyhow::Result<()> {
        let prices = Arc::new(Float64Array::from(vec![None::<f64>, None]));
        let (_dir, path) = snapshot_file(prices, DataType::Float64)?;
        let snap = PriceSnapshot::load(&path, 2016, "price_per_m2")?;
        assert!(snap.prices.is_empty());
        assert!(matches!(
            snap.median("price_per_m2"),
            Err(IndexError::NoPriceValues { .. })
        ));
        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PriceSnapshot::load("/nonexistent/flats_2016.parquet", 2016, "price_per_m2")
            .unwrap_err();
        assert!(matches!(err, IndexError::Io { .. }));
    }
}
