use serde::{Deserialize, Serialize};

/// One normalized catalog row, matching the `processors` table.
///
/// Every numeric field is either a parsed number or `None`; the `"N/A"`
/// sentinel from source CSVs never survives normalization. `product` is the
/// natural key but is not unique-enforced, so duplicates accumulate across
/// repeated imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorRecord {
    pub product: String,
    pub status: Option<String>,
    pub release_date: Option<String>,
    pub code_name: Option<String>,
    pub cores: Option<i64>,
    pub threads: Option<i64>,
    pub lithography: Option<f64>,
    pub max_turbo_freq: Option<f64>,
    pub base_freq: Option<f64>,
    pub tdp: Option<i64>,
    pub cache: Option<f64>,
    pub cache_info: Option<String>,
    pub max_memory_size: Option<i64>,
    pub memory_types: Option<String>,
    pub max_memory_speed: Option<i64>,
    pub integrated_graphics: Option<String>,
}

/// A persisted row: the record plus its rowid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredProcessor {
    pub id: i64,
    #[serde(flatten)]
    pub record: ProcessorRecord,
}

/// Diagnostic for one row that could not be imported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    pub product: String,
    pub reason: String,
}

/// Result of one import batch. `successful_imports + failed_imports`
/// always equals `total_records`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub total_records: usize,
    pub successful_imports: usize,
    pub failed_imports: usize,
    pub failures: Vec<RowFailure>,
}

/// Per-file entry in an import run manifest.
///
/// `error` is set when the file itself could not be read or parsed as CSV
/// (batch-fatal for that file); `failures` lists row-local failures.
#[derive(Debug, Clone, Serialize)]
pub struct CsvFileEntry {
    pub path: String,
    pub sha256: Option<String>,
    pub total_records: usize,
    pub successful_imports: usize,
    pub failed_imports: usize,
    pub error: Option<String>,
    pub failures: Vec<RowFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportCounts {
    pub csv_files_found: usize,
    pub csv_files_imported: usize,
    pub total_records: usize,
    pub successful_imports: usize,
    pub failed_imports: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub db_path: String,
    pub counts: ImportCounts,
    pub files: Vec<CsvFileEntry>,
}
