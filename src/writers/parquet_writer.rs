use crate::analyzers::classifier::{category_color, ClassifiedRecord};
use crate::error::{AnalysisError, Result};
use crate::models::AggregateRecord;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{
    Array, ArrayRef, Float64Array, Int32Array, PrimitiveArray, StringArray, UInt64Array,
};
use arrow::datatypes::{ArrowPrimitiveType, DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct ParquetWriter {
    compression: Compression,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(AnalysisError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    /// Write trend or per-station aggregates
    pub fn write_aggregates(&self, records: &[AggregateRecord], path: &Path) -> Result<()> {
        let schema = create_schema(false);
        let batch = aggregates_to_batch(records, None, schema.clone())?;
        self.write_batch(batch, schema, path)?;

        info!(path = %path.display(), rows = records.len(), "Wrote aggregate table");
        Ok(())
    }

    /// Write aggregates together with their category and display color
    pub fn write_classified(&self, records: &[ClassifiedRecord], path: &Path) -> Result<()> {
        let schema = create_schema(true);
        let aggregates: Vec<AggregateRecord> = records.iter().map(|r| r.record.clone()).collect();
        let batch = aggregates_to_batch(&aggregates, Some(records), schema.clone())?;
        self.write_batch(batch, schema, path)?;

        info!(path = %path.display(), rows = records.len(), "Wrote classification table");
        Ok(())
    }

    fn write_batch(&self, batch: RecordBatch, schema: Arc<Schema>, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(DEFAULT_ROW_GROUP_SIZE)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        if batch.num_rows() > 0 {
            writer.write(&batch)?;
        }
        writer.close()?;
        Ok(())
    }

    /// Read aggregate records back from a file written by this writer
    pub fn read_aggregates(&self, path: &Path, limit: usize) -> Result<Vec<AggregateRecord>> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(limit.clamp(1, 8192))
            .build()?;

        let mut records = Vec::new();
        for batch_result in reader {
            let batch = batch_result?;

            let years = column::<Int32Array>(&batch, "year")?;
            let stations = column::<StringArray>(&batch, "station")?;
            let counts = column::<UInt64Array>(&batch, "observation_count")?;
            let pm25 = column::<Float64Array>(&batch, "pm25")?;
            let pm10 = column::<Float64Array>(&batch, "pm10")?;
            let no2 = column::<Float64Array>(&batch, "no2")?;
            let o3 = column::<Float64Array>(&batch, "o3")?;

            for i in 0..batch.num_rows() {
                if records.len() >= limit {
                    return Ok(records);
                }
                records.push(AggregateRecord {
                    year: optional(years, i),
                    station: stations.value(i).to_string(),
                    observation_count: counts.value(i) as usize,
                    pm25: optional(pm25, i),
                    pm10: optional(pm10, i),
                    no2: optional(no2, i),
                    o3: optional(o3, i),
                });
            }
        }

        Ok(records)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();
        let columns = metadata
            .file_metadata()
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            file_size,
            columns,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Arrow schema shared by all exported tables
fn create_schema(with_category: bool) -> Arc<Schema> {
    let mut fields = vec![
        Field::new("year", DataType::Int32, true),
        Field::new("station", DataType::Utf8, false),
        Field::new("observation_count", DataType::UInt64, false),
        Field::new("pm25", DataType::Float64, true),
        Field::new("pm10", DataType::Float64, true),
        Field::new("no2", DataType::Float64, true),
        Field::new("o3", DataType::Float64, true),
    ];

    if with_category {
        fields.push(Field::new("category", DataType::Utf8, false));
        fields.push(Field::new("color", DataType::Utf8, false));
    }

    Arc::new(Schema::new(fields))
}

fn aggregates_to_batch(
    records: &[AggregateRecord],
    classified: Option<&[ClassifiedRecord]>,
    schema: Arc<Schema>,
) -> Result<RecordBatch> {
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(records.iter().map(|r| r.year).collect::<Vec<_>>())),
        Arc::new(StringArray::from(
            records.iter().map(|r| r.station.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(UInt64Array::from(
            records.iter().map(|r| r.observation_count as u64).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(records.iter().map(|r| r.pm25).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(records.iter().map(|r| r.pm10).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(records.iter().map(|r| r.no2).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(records.iter().map(|r| r.o3).collect::<Vec<_>>())),
    ];

    if let Some(classified) = classified {
        columns.push(Arc::new(StringArray::from(
            classified.iter().map(|c| c.category.label()).collect::<Vec<_>>(),
        )));
        columns.push(Arc::new(StringArray::from(
            classified.iter().map(|c| category_color(c.category)).collect::<Vec<_>>(),
        )));
    }

    Ok(RecordBatch::try_new(schema, columns)?)
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or_else(|| AnalysisError::InvalidFormat(format!("Invalid or missing {} column", name)))
}

fn optional<T: ArrowPrimitiveType>(array: &PrimitiveArray<T>, i: usize) -> Option<T::Native> {
    if array.is_null(i) {
        None
    } else {
        Some(array.value(i))
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub file_size: u64,
    pub columns: Vec<String>,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Columns: {}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.columns.join(", ")
        )
    }
}
