use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ExportArgs;
use crate::model::{ProcessorRecord, StoredProcessor};
use crate::store::{DB_FILE_NAME, SqliteStore};
use crate::util::write_json_pretty;

const SQL_PREAMBLE: &str = "-- Create processors table if it doesn't exist
CREATE TABLE IF NOT EXISTS processors (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  product TEXT NOT NULL,
  status TEXT,
  release_date TEXT,
  code_name TEXT,
  cores INTEGER,
  threads INTEGER,
  lithography REAL,
  max_turbo_freq REAL,
  base_freq REAL,
  tdp INTEGER,
  cache REAL,
  cache_info TEXT,
  max_memory_size INTEGER,
  memory_types TEXT,
  max_memory_speed INTEGER,
  integrated_graphics TEXT
);

CREATE INDEX IF NOT EXISTS idx_processors_product ON processors(product);

-- Insert data
";

pub fn run(args: ExportArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.data_root.join(DB_FILE_NAME));

    let store = SqliteStore::open_read_only(&db_path)?;
    let rows = store.fetch_all()?;

    write_json_pretty(&args.json_path, &rows)?;
    info!(
        count = rows.len(),
        path = %args.json_path.display(),
        "exported processors to json"
    );

    write_sql(&args, &rows)?;
    info!(
        count = rows.len(),
        path = %args.sql_path.display(),
        "generated SQL insert statements"
    );

    Ok(())
}

fn write_sql(args: &ExportArgs, rows: &[StoredProcessor]) -> Result<()> {
    let file = File::create(&args.sql_path)
        .with_context(|| format!("failed to create {}", args.sql_path.display()))?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(SQL_PREAMBLE.as_bytes())
        .context("failed to write SQL preamble")?;
    for row in rows {
        writeln!(writer, "{}", insert_statement(&row.record))
            .with_context(|| format!("failed to write {}", args.sql_path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", args.sql_path.display()))?;

    Ok(())
}

fn insert_statement(record: &ProcessorRecord) -> String {
    let values = [
        sql_string(Some(&record.product)),
        sql_string(record.status.as_deref()),
        sql_string(record.release_date.as_deref()),
        sql_string(record.code_name.as_deref()),
        sql_number(record.cores),
        sql_number(record.threads),
        sql_number(record.lithography),
        sql_number(record.max_turbo_freq),
        sql_number(record.base_freq),
        sql_number(record.tdp),
        sql_number(record.cache),
        sql_string(record.cache_info.as_deref()),
        sql_number(record.max_memory_size),
        sql_string(record.memory_types.as_deref()),
        sql_number(record.max_memory_speed),
        sql_string(record.integrated_graphics.as_deref()),
    ]
    .join(", ");

    format!(
        "INSERT INTO processors (product, status, release_date, code_name, cores, threads, \
         lithography, max_turbo_freq, base_freq, tdp, cache, cache_info, max_memory_size, \
         memory_types, max_memory_speed, integrated_graphics) VALUES ({values});"
    )
}

fn sql_string(value: Option<&str>) -> String {
    match value {
        Some(text) => format!("'{}'", text.replace('\'', "''")),
        None => "NULL".to_string(),
    }
}

fn sql_number<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "NULL".to_string(), |number| number.to_string())
}
