// src/import/mod.rs

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::dates::DateNormalizer;
use crate::sheet::RawRow;

pub mod coerce;
pub mod schema;

pub use schema::{FieldKind, FieldSpec, ImportSchema};

/// Request body built from one sheet row.
pub type NormalizedRow = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub submitted: usize,
}

/// A failed import. Rows before `row` were already saved; nothing after it was sent.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import aborted at row {row} ({submitted} rows saved before it)")]
    Aborted {
        row: usize,
        submitted: usize,
        #[source]
        source: anyhow::Error,
    },
}

/// Where normalized rows go, usually a REST collection.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn submit(&self, row: NormalizedRow) -> anyhow::Result<()>;
}

/// Strategy for delivering a prepared batch.
#[async_trait]
pub trait Importer: Send + Sync {
    async fn submit_all(
        &self,
        rows: Vec<NormalizedRow>,
        sink: &dyn RecordSink,
    ) -> Result<ImportSummary, ImportError>;
}

/// One row at a time, each awaited before the next. The first failure stops the batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialImporter;

#[async_trait]
impl Importer for SequentialImporter {
    async fn submit_all(
        &self,
        rows: Vec<NormalizedRow>,
        sink: &dyn RecordSink,
    ) -> Result<ImportSummary, ImportError> {
        let mut submitted = 0;
        for (idx, row) in rows.into_iter().enumerate() {
            debug!(row = idx + 1, "submitting");
            if let Err(source) = sink.submit(row).await {
                error!(row = idx + 1, submitted, error = %source, "import aborted");
                return Err(ImportError::Aborted {
                    row: idx + 1,
                    submitted,
                    source,
                });
            }
            submitted += 1;
        }
        Ok(ImportSummary { submitted })
    }
}

/// Sheet rows → normalized requests → sink.
pub struct BulkImporter<I = SequentialImporter> {
    schema: ImportSchema,
    dates: DateNormalizer,
    strategy: I,
}

impl BulkImporter<SequentialImporter> {
    pub fn new(schema: ImportSchema, dates: DateNormalizer) -> Self {
        Self::with_strategy(schema, dates, SequentialImporter)
    }
}

impl<I: Importer> BulkImporter<I> {
    pub fn with_strategy(schema: ImportSchema, dates: DateNormalizer, strategy: I) -> Self {
        Self {
            schema,
            dates,
            strategy,
        }
    }

    pub fn schema(&self) -> &ImportSchema {
        &self.schema
    }

    pub fn prepare(&self, rows: &[RawRow], today: NaiveDate) -> Vec<NormalizedRow> {
        rows.iter()
            .map(|r| self.schema.normalize(r, &self.dates, today))
            .collect()
    }

    #[instrument(level = "info", skip_all, fields(resource = %self.schema.resource, rows = rows.len()))]
    pub async fn import(
        &self,
        rows: &[RawRow],
        sink: &dyn RecordSink,
    ) -> Result<ImportSummary, ImportError> {
        let start = Instant::now();
        let prepared = self.prepare(rows, Local::now().date_naive());
        let summary = self.strategy.submit_all(prepared, sink).await?;
        info!(submitted = summary.submitted, elapsed = ?start.elapsed(), "import finished");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::CellValue;
    use crate::resource::Resource;
    use std::sync::Mutex;

    /// Records what it receives; fails on the n-th submission (1-based) when asked to.
    struct MemorySink {
        seen: Mutex<Vec<NormalizedRow>>,
        fail_on: Option<usize>,
    }

    impl MemorySink {
        fn new(fail_on: Option<usize>) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl RecordSink for MemorySink {
        async fn submit(&self, row: NormalizedRow) -> anyhow::Result<()> {
            let mut seen = self.seen.lock().unwrap();
            if self.fail_on == Some(seen.len() + 1) {
                anyhow::bail!("server said no");
            }
            seen.push(row);
            Ok(())
        }
    }

    fn rows() -> Vec<RawRow> {
        vec![
            [("date".to_string(), CellValue::Number(45.0)), ("quantity".to_string(), 5.0.into())]
                .into_iter()
                .collect(),
            [("date".to_string(), "15-03-2024".into()), ("quantity".to_string(), 3.0.into())]
                .into_iter()
                .collect(),
            [("date".to_string(), "16-03-2024".into()), ("quantity".to_string(), "x".into())]
                .into_iter()
                .collect(),
        ]
    }

    fn importer() -> BulkImporter {
        BulkImporter::new(
            ImportSchema::for_resource(Resource::RawMaterial(crate::model::RawMaterial::Suji)),
            DateNormalizer::default(),
        )
    }

    #[tokio::test]
    async fn submits_every_row_in_order() {
        let sink = MemorySink::new(None);
        let summary = importer().import(&rows(), &sink).await.unwrap();
        assert_eq!(summary, ImportSummary { submitted: 3 });

        let seen = sink.seen.lock().unwrap();
        let dates: Vec<_> = seen.iter().map(|r| r["date"].as_str().unwrap().to_string()).collect();
        assert_eq!(dates, vec!["1900-02-13", "2024-03-15", "2024-03-16"]);
        assert_eq!(seen[2]["quantity"], Value::from(0.0));
    }

    #[tokio::test]
    async fn first_failure_aborts_the_batch() {
        let sink = MemorySink::new(Some(2));
        let err = importer().import(&rows(), &sink).await.unwrap_err();
        match err {
            ImportError::Aborted { row, submitted, .. } => {
                assert_eq!(row, 2);
                assert_eq!(submitted, 1);
            }
        }
        assert_eq!(sink.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_sheet_submits_nothing() {
        let sink = MemorySink::new(Some(1));
        let summary = importer().import(&[], &sink).await.unwrap();
        assert_eq!(summary.submitted, 0);
    }
}
