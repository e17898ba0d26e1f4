use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Result, bail};

use crate::cli::{ImportAllArgs, ImportArgs};
use crate::model::ProcessorRecord;
use crate::store::{ProcessorStore, SqliteStore};

use super::run::{render_import_all_command, render_import_command};
use super::*;

#[derive(Default)]
struct MemoryStore {
    rows: Vec<ProcessorRecord>,
    reject_empty_product: bool,
    reject_products: HashSet<String>,
}

impl MemoryStore {
    fn rejecting(products: &[&str]) -> Self {
        Self {
            reject_products: products.iter().map(|name| name.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl ProcessorStore for MemoryStore {
    fn insert_row(&mut self, record: &ProcessorRecord) -> Result<()> {
        if self.reject_empty_product && record.product.is_empty() {
            bail!("product must not be empty");
        }
        if self.reject_products.contains(&record.product) {
            bail!("constraint violation");
        }
        self.rows.push(record.clone());
        Ok(())
    }
}

const SPEC_CSV: &str = "Product,Cores,TDP(W)\n\"Xeon A\",4,65\n\"Xeon B\",N/A,N/A\n";

#[test]
fn import_persists_values_and_maps_na_to_null() {
    let rows = parse_csv(SPEC_CSV).expect("csv parses");
    let mut store = MemoryStore::default();

    let summary = import_records(&mut store, &rows);

    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.successful_imports, 2);
    assert_eq!(summary.failed_imports, 0);

    assert_eq!(store.rows[0].product, "Xeon A");
    assert_eq!(store.rows[0].cores, Some(4));
    assert_eq!(store.rows[0].tdp, Some(65));
    assert_eq!(store.rows[1].product, "Xeon B");
    assert_eq!(store.rows[1].cores, None);
    assert_eq!(store.rows[1].tdp, None);
}

#[test]
fn na_sentinel_maps_every_numeric_column_to_null() {
    let raw = RawRow::from_pairs(&[
        (headers::PRODUCT, "Intel Xeon Bronze 3104"),
        (headers::CORES, "N/A"),
        (headers::THREADS, "N/A"),
        (headers::LITHOGRAPHY, "N/A"),
        (headers::MAX_TURBO_FREQ, "N/A"),
        (headers::BASE_FREQ, "N/A"),
        (headers::TDP, "N/A"),
        (headers::CACHE, "N/A"),
        (headers::MAX_MEMORY_SIZE, "N/A"),
        (headers::MAX_MEMORY_SPEED, "N/A"),
    ]);

    let record = normalize_row(&raw).expect("normalizes");

    assert_eq!(record.cores, None);
    assert_eq!(record.threads, None);
    assert_eq!(record.lithography, None);
    assert_eq!(record.max_turbo_freq, None);
    assert_eq!(record.base_freq, None);
    assert_eq!(record.tdp, None);
    assert_eq!(record.cache, None);
    assert_eq!(record.max_memory_size, None);
    assert_eq!(record.max_memory_speed, None);
}

#[test]
fn normalize_parses_each_declared_numeric_type() {
    let raw = RawRow::from_pairs(&[
        (headers::PRODUCT, "Intel Xeon Gold 6230"),
        (headers::STATUS, "Launched"),
        (headers::RELEASE_DATE, "Q2'19"),
        (headers::CODE_NAME, "Cascade Lake"),
        (headers::CORES, "20"),
        (headers::THREADS, "40"),
        (headers::LITHOGRAPHY, "14"),
        (headers::MAX_TURBO_FREQ, "3.9"),
        (headers::BASE_FREQ, "2.1"),
        (headers::TDP, "125"),
        (headers::CACHE, "27.5"),
        (headers::CACHE_INFO, "L3"),
        (headers::MAX_MEMORY_SIZE, "1000"),
        (headers::MEMORY_TYPES, "DDR4-2933"),
        (headers::MAX_MEMORY_SPEED, "2933"),
        (headers::INTEGRATED_GRAPHICS, "N/A"),
    ]);

    let record = normalize_row(&raw).expect("normalizes");

    assert_eq!(record.product, "Intel Xeon Gold 6230");
    assert_eq!(record.status.as_deref(), Some("Launched"));
    assert_eq!(record.cores, Some(20));
    assert_eq!(record.threads, Some(40));
    assert_eq!(record.lithography, Some(14.0));
    assert_eq!(record.max_turbo_freq, Some(3.9));
    assert_eq!(record.base_freq, Some(2.1));
    assert_eq!(record.tdp, Some(125));
    assert_eq!(record.cache, Some(27.5));
    assert_eq!(record.max_memory_size, Some(1000));
    assert_eq!(record.max_memory_speed, Some(2933));
    // "N/A" is only a sentinel for numeric columns; string columns keep it.
    assert_eq!(record.integrated_graphics.as_deref(), Some("N/A"));
}

#[test]
fn integer_columns_accept_float_formatted_cells() {
    let raw = RawRow::from_pairs(&[(headers::PRODUCT, "X"), (headers::TDP, "65.0")]);
    assert_eq!(normalize_row(&raw).unwrap().tdp, Some(65));
}

#[test]
fn empty_numeric_cells_map_to_null() {
    let raw = RawRow::from_pairs(&[(headers::PRODUCT, "X"), (headers::CORES, "")]);
    assert_eq!(normalize_row(&raw).unwrap().cores, None);
}

#[test]
fn lowercase_na_is_not_the_sentinel() {
    let raw = RawRow::from_pairs(&[(headers::PRODUCT, "X"), (headers::CORES, "n/a")]);
    assert!(normalize_row(&raw).is_err());
}

#[test]
fn missing_columns_yield_nulls_not_errors() {
    let raw = RawRow::from_pairs(&[(headers::PRODUCT, "Xeon A")]);

    let record = normalize_row(&raw).expect("normalizes");

    assert_eq!(record.product, "Xeon A");
    assert_eq!(record.status, None);
    assert_eq!(record.cores, None);
    assert_eq!(record.cache, None);
}

#[test]
fn renamed_column_silently_yields_missing_value() {
    let rows = parse_csv("Product,Core Count\nXeon A,4\n").expect("csv parses");

    let record = normalize_row(&rows[0]).expect("normalizes");

    assert_eq!(record.product, "Xeon A");
    assert_eq!(record.cores, None);
}

#[test]
fn string_cells_pass_through_unchanged() {
    let raw = RawRow::from_pairs(&[
        (headers::PRODUCT, "Xeon A"),
        (headers::STATUS, " Launched "),
        (headers::MEMORY_TYPES, "DDR4-2666, DDR4-2933"),
    ]);

    let record = normalize_row(&raw).expect("normalizes");

    assert_eq!(record.status.as_deref(), Some(" Launched "));
    assert_eq!(record.memory_types.as_deref(), Some("DDR4-2666, DDR4-2933"));
}

#[test]
fn store_rejection_is_row_local_and_counted() {
    let rows = parse_csv(SPEC_CSV).expect("csv parses");
    let mut store = MemoryStore::rejecting(&["Xeon B"]);

    let summary = import_records(&mut store, &rows);

    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.successful_imports, 1);
    assert_eq!(summary.failed_imports, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].product, "Xeon B");
    assert!(summary.failures[0].reason.contains("constraint violation"));
    assert_eq!(store.rows.len(), 1);
    assert_eq!(store.rows[0].product, "Xeon A");
}

#[test]
fn empty_product_rejections_fail_exactly_those_rows() {
    let csv = "Product,Cores\nXeon A,4\n,8\nXeon B,16\n,2\n";
    let rows = parse_csv(csv).expect("csv parses");
    let mut store = MemoryStore {
        reject_empty_product: true,
        ..MemoryStore::default()
    };

    let summary = import_records(&mut store, &rows);

    assert_eq!(summary.total_records, 4);
    assert_eq!(summary.successful_imports, 2);
    assert_eq!(summary.failed_imports, 2);
    assert_eq!(store.rows.len(), 2);
}

#[test]
fn malformed_numeric_cell_fails_that_row_only() {
    let csv = "Product,Cores\nXeon A,abc\nXeon B,8\n";
    let rows = parse_csv(csv).expect("csv parses");
    let mut store = MemoryStore::default();

    let summary = import_records(&mut store, &rows);

    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.successful_imports, 1);
    assert_eq!(summary.failed_imports, 1);
    assert_eq!(summary.failures[0].product, "Xeon A");
    assert!(summary.failures[0].reason.contains("Cores"));
    assert_eq!(store.rows.len(), 1);
    assert_eq!(store.rows[0].product, "Xeon B");
}

#[test]
fn counters_always_reconcile() {
    let csv = "Product,Cores\nXeon A,4\nXeon B,abc\nXeon C,8\n,16\n";
    let rows = parse_csv(csv).expect("csv parses");
    let mut store = MemoryStore {
        reject_empty_product: true,
        ..MemoryStore::default()
    };

    let summary = import_records(&mut store, &rows);

    assert_eq!(
        summary.successful_imports + summary.failed_imports,
        summary.total_records
    );
    assert_eq!(summary.failures.len(), summary.failed_imports);
}

#[test]
fn header_only_csv_imports_nothing_without_error() {
    let rows = parse_csv("Product,Cores,TDP(W)\n").expect("csv parses");
    let mut store = MemoryStore::default();

    let summary = import_records(&mut store, &rows);

    assert_eq!(summary.total_records, 0);
    assert_eq!(summary.successful_imports, 0);
    assert_eq!(summary.failed_imports, 0);
}

#[test]
fn repeated_import_duplicates_rows() {
    let rows = parse_csv(SPEC_CSV).expect("csv parses");
    let mut store = MemoryStore::default();

    import_records(&mut store, &rows);
    import_records(&mut store, &rows);

    assert_eq!(store.rows.len(), 4);
    let copies = store
        .rows
        .iter()
        .filter(|record| record.product == "Xeon A")
        .count();
    assert_eq!(copies, 2);
}

#[test]
fn import_through_sqlite_store_persists_typed_rows() {
    let rows = parse_csv(SPEC_CSV).expect("csv parses");
    let mut store = SqliteStore::open_in_memory().expect("store opens");
    store.ensure_schema().expect("schema applies");

    let summary = import_records(&mut store, &rows);

    assert_eq!(summary.successful_imports, 2);

    let stored = store.fetch_by_product("Xeon B").unwrap().unwrap();
    assert_eq!(stored.record.cores, None);
    assert_eq!(stored.record.tdp, None);
}

#[test]
fn parse_csv_skips_blank_lines() {
    let rows = parse_csv("Product,Cores\nXeon A,4\n\n\nXeon B,8\n").expect("csv parses");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].text(headers::PRODUCT), "Xeon B");
}

#[test]
fn parse_csv_handles_quoted_commas() {
    let rows = parse_csv("Product,Memory Types\nXeon A,\"DDR4-2666, DDR4-2933\"\n")
        .expect("csv parses");

    assert_eq!(
        rows[0].get(headers::MEMORY_TYPES),
        Some("DDR4-2666, DDR4-2933")
    );
}

#[test]
fn parse_csv_leaves_short_records_with_missing_cells() {
    let rows = parse_csv("Product,Cores,TDP(W)\nXeon A,4\n").expect("csv parses");

    assert_eq!(rows[0].get(headers::CORES), Some("4"));
    assert_eq!(rows[0].get(headers::TDP), None);
}

#[test]
fn parse_csv_rejects_input_without_a_header_row() {
    assert!(parse_csv("").is_err());
}

#[test]
fn render_import_command_includes_overrides() {
    let args = ImportArgs {
        data_root: PathBuf::from(".cache/procdb"),
        db_path: Some(PathBuf::from("catalog.sqlite")),
        csv_path: PathBuf::from("xeon.csv"),
        manifest_path: None,
        no_manifest: false,
    };

    let command = render_import_command(&args);
    assert!(command.contains("--csv-path xeon.csv"));
    assert!(command.contains("--db-path catalog.sqlite"));
}

#[test]
fn render_import_all_command_names_the_directory() {
    let args = ImportAllArgs {
        data_root: PathBuf::from(".cache/procdb"),
        db_path: None,
        csv_dir: PathBuf::from("resources/v1_8"),
        manifest_path: None,
        no_manifest: true,
    };

    let command = render_import_all_command(&args);
    assert!(command.starts_with("procdb import-all"));
    assert!(command.contains("--csv-dir resources/v1_8"));
}
