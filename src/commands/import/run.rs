use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::{ImportAllArgs, ImportArgs};
use crate::model::{CsvFileEntry, ImportCounts, ImportRunManifest};
use crate::store::{DB_FILE_NAME, SqliteStore};
use crate::util::{
    ensure_directory, now_utc_string, sha256_file, utc_compact_string, write_json_pretty,
};

use super::batch::import_records;
use super::parse::parse_csv;

const MANIFEST_VERSION: u32 = 1;

pub fn run(args: ImportArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.data_root.join(DB_FILE_NAME));
    if let Some(parent) = db_path.parent() {
        ensure_directory(parent)?;
    }

    info!(
        csv_path = %args.csv_path.display(),
        db_path = %db_path.display(),
        run_id = %run_id,
        "starting import"
    );

    let mut store = SqliteStore::open(&db_path)?;
    store.ensure_schema()?;

    let entry = import_file(&mut store, &args.csv_path)?;

    info!(
        total = entry.total_records,
        success = entry.successful_imports,
        failed = entry.failed_imports,
        "import completed"
    );

    if !args.no_manifest {
        let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
            args.data_root.join("manifests").join(format!(
                "import_run_{}.json",
                utc_compact_string(started_ts)
            ))
        });

        let counts = ImportCounts {
            csv_files_found: 1,
            csv_files_imported: 1,
            total_records: entry.total_records,
            successful_imports: entry.successful_imports,
            failed_imports: entry.failed_imports,
        };
        let manifest = ImportRunManifest {
            manifest_version: MANIFEST_VERSION,
            run_id,
            status: "completed".to_string(),
            started_at,
            updated_at: now_utc_string(),
            command: render_import_command(&args),
            db_path: db_path.display().to_string(),
            counts,
            files: vec![entry],
        };

        write_json_pretty(&manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote import run manifest");
    }

    Ok(())
}

pub fn run_all(args: ImportAllArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.data_root.join(DB_FILE_NAME));
    if let Some(parent) = db_path.parent() {
        ensure_directory(parent)?;
    }

    let files = list_csv_files(&args.csv_dir)?;
    if files.is_empty() {
        bail!("no CSV files found in {}", args.csv_dir.display());
    }

    info!(
        csv_dir = %args.csv_dir.display(),
        files = files.len(),
        db_path = %db_path.display(),
        run_id = %run_id,
        "starting import of all CSV files"
    );

    let mut store = SqliteStore::open(&db_path)?;
    store.ensure_schema()?;

    let mut entries = Vec::with_capacity(files.len());
    for file in &files {
        match import_file(&mut store, file) {
            Ok(entry) => {
                info!(
                    path = %file.display(),
                    total = entry.total_records,
                    success = entry.successful_imports,
                    failed = entry.failed_imports,
                    "imported CSV file"
                );
                entries.push(entry);
            }
            Err(err) => {
                // A file that is unreadable or not CSV at all is skipped;
                // the remaining files still import.
                let reason = format!("{err:#}");
                warn!(path = %file.display(), reason = %reason, "skipping CSV file");
                entries.push(CsvFileEntry {
                    path: file.display().to_string(),
                    sha256: None,
                    total_records: 0,
                    successful_imports: 0,
                    failed_imports: 0,
                    error: Some(reason),
                    failures: Vec::new(),
                });
            }
        }
    }

    let counts = aggregate_counts(&entries);
    info!(
        files_found = counts.csv_files_found,
        files_imported = counts.csv_files_imported,
        total = counts.total_records,
        success = counts.successful_imports,
        failed = counts.failed_imports,
        "import of all CSV files completed"
    );

    if !args.no_manifest {
        let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
            args.data_root.join("manifests").join(format!(
                "import_run_{}.json",
                utc_compact_string(started_ts)
            ))
        });

        let manifest = ImportRunManifest {
            manifest_version: MANIFEST_VERSION,
            run_id,
            status: "completed".to_string(),
            started_at,
            updated_at: now_utc_string(),
            command: render_import_all_command(&args),
            db_path: db_path.display().to_string(),
            counts,
            files: entries,
        };

        write_json_pretty(&manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote import run manifest");
    }

    Ok(())
}

fn import_file(store: &mut SqliteStore, path: &Path) -> Result<CsvFileEntry> {
    let sha256 = sha256_file(path)?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let rows = parse_csv(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    info!(path = %path.display(), records = rows.len(), "parsed CSV file");

    let summary = import_records(store, &rows);

    Ok(CsvFileEntry {
        path: path.display().to_string(),
        sha256: Some(sha256),
        total_records: summary.total_records,
        successful_imports: summary.successful_imports,
        failed_imports: summary.failed_imports,
        error: None,
        failures: summary.failures,
    })
}

fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in read_dir {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn aggregate_counts(entries: &[CsvFileEntry]) -> ImportCounts {
    ImportCounts {
        csv_files_found: entries.len(),
        csv_files_imported: entries.iter().filter(|entry| entry.error.is_none()).count(),
        total_records: entries.iter().map(|entry| entry.total_records).sum(),
        successful_imports: entries.iter().map(|entry| entry.successful_imports).sum(),
        failed_imports: entries.iter().map(|entry| entry.failed_imports).sum(),
    }
}

pub(super) fn render_import_command(args: &ImportArgs) -> String {
    let mut command = vec![
        "procdb".to_string(),
        "import".to_string(),
        "--data-root".to_string(),
        args.data_root.display().to_string(),
        "--csv-path".to_string(),
        args.csv_path.display().to_string(),
    ];

    if let Some(path) = &args.db_path {
        command.push("--db-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}

pub(super) fn render_import_all_command(args: &ImportAllArgs) -> String {
    let mut command = vec![
        "procdb".to_string(),
        "import-all".to_string(),
        "--data-root".to_string(),
        args.data_root.display().to_string(),
        "--csv-dir".to_string(),
        args.csv_dir.display().to_string(),
    ];

    if let Some(path) = &args.db_path {
        command.push("--db-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}
