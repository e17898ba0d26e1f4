use tracing::warn;

use crate::model::{ImportSummary, RowFailure};
use crate::store::ProcessorStore;

use super::normalize::{headers, normalize_row};
use super::parse::RawRow;

/// Fate of a single row: persisted, or failed with a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Inserted,
    Failed(RowFailure),
}

/// Imports rows sequentially, one insert per row, in source order.
///
/// A row that fails, whether during numeric coercion or at the store, is
/// logged, counted, and skipped; the batch always runs to the end. There is
/// no transaction around the batch and no retry: rows inserted before a
/// failure stay persisted.
pub fn import_records<S: ProcessorStore>(store: &mut S, rows: &[RawRow]) -> ImportSummary {
    let outcomes: Vec<RowOutcome> = rows.iter().map(|raw| import_one(store, raw)).collect();
    summarize(outcomes)
}

fn import_one<S: ProcessorStore>(store: &mut S, raw: &RawRow) -> RowOutcome {
    let record = match normalize_row(raw) {
        Ok(record) => record,
        Err(err) => return row_failed(raw.text(headers::PRODUCT), &err),
    };

    match store.insert_row(&record) {
        Ok(()) => RowOutcome::Inserted,
        Err(err) => row_failed(record.product, &err),
    }
}

fn row_failed(product: String, err: &anyhow::Error) -> RowOutcome {
    let reason = format!("{err:#}");
    warn!(product = %product, reason = %reason, "row import failed");
    RowOutcome::Failed(RowFailure { product, reason })
}

fn summarize(outcomes: Vec<RowOutcome>) -> ImportSummary {
    let total_records = outcomes.len();
    let mut failures = Vec::new();

    for outcome in outcomes {
        if let RowOutcome::Failed(failure) = outcome {
            failures.push(failure);
        }
    }

    ImportSummary {
        total_records,
        successful_imports: total_records - failures.len(),
        failed_imports: failures.len(),
        failures,
    }
}
