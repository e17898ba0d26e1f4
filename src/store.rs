use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};

use crate::model::{ProcessorRecord, StoredProcessor};

pub const DB_FILE_NAME: &str = "processors.sqlite";

const SELECT_COLUMNS: &str = "id, product, status, release_date, code_name, cores, threads, \
     lithography, max_turbo_freq, base_freq, tdp, cache, cache_info, \
     max_memory_size, memory_types, max_memory_speed, integrated_graphics";

/// Persistence contract used by the batch importer.
///
/// Implementations must accept NULL for every nullable column and must not
/// enforce uniqueness of `product`; repeated imports are expected to
/// accumulate duplicate rows.
pub trait ProcessorStore {
    fn insert_row(&mut self, record: &ProcessorRecord) -> Result<()>;
}

/// SQLite-backed catalog store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .context("failed to set journal_mode=WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .context("failed to set synchronous=NORMAL")?;
        Ok(Self { conn })
    }

    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open database read-only: {}", path.display()))?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Ok(Self { conn })
    }

    pub fn ensure_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
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
                ",
            )
            .context("failed to create processors schema")?;

        Ok(())
    }

    pub fn fetch_page(&self, offset: u32, limit: u32) -> Result<Vec<StoredProcessor>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM processors ORDER BY id LIMIT ?1 OFFSET ?2"
        );
        let mut statement = self.conn.prepare(&sql)?;
        let rows = statement
            .query_map(params![limit, offset], row_to_stored)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to fetch processors page")?;
        Ok(rows)
    }

    pub fn fetch_all(&self) -> Result<Vec<StoredProcessor>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM processors ORDER BY id");
        let mut statement = self.conn.prepare(&sql)?;
        let rows = statement
            .query_map([], row_to_stored)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to fetch processors")?;
        Ok(rows)
    }

    pub fn fetch_by_id(&self, id: i64) -> Result<Option<StoredProcessor>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM processors WHERE id = ?1");
        let row = self
            .conn
            .query_row(&sql, params![id], row_to_stored)
            .optional()
            .with_context(|| format!("failed to fetch processor id {id}"))?;
        Ok(row)
    }

    /// First matching row in insertion order; duplicates are permitted, so
    /// later copies are shadowed the way the original lookup behaved.
    pub fn fetch_by_product(&self, product: &str) -> Result<Option<StoredProcessor>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM processors WHERE product = ?1 ORDER BY id LIMIT 1"
        );
        let row = self
            .conn
            .query_row(&sql, params![product], row_to_stored)
            .optional()
            .with_context(|| format!("failed to fetch processor {product:?}"))?;
        Ok(row)
    }

    pub fn fetch_tdp(&self, product: &str) -> Result<Option<(String, Option<i64>)>> {
        let row = self
            .conn
            .query_row(
                "SELECT product, tdp FROM processors WHERE product = ?1 ORDER BY id LIMIT 1",
                params![product],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .with_context(|| format!("failed to fetch TDP for {product:?}"))?;
        Ok(row)
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM processors", [], |row| row.get(0))
            .context("failed to count processors")?;
        Ok(count)
    }

    pub fn duplicate_products(&self) -> Result<Vec<(String, i64)>> {
        let mut statement = self.conn.prepare(
            "SELECT product, COUNT(*) AS occurrences FROM processors \
             GROUP BY product HAVING COUNT(*) > 1 ORDER BY occurrences DESC, product",
        )?;
        let rows = statement
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to list duplicate products")?;
        Ok(rows)
    }

    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut statement = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = statement
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to list tables")?;
        Ok(names)
    }
}

impl ProcessorStore for SqliteStore {
    fn insert_row(&mut self, record: &ProcessorRecord) -> Result<()> {
        let mut statement = self.conn.prepare_cached(
            "
            INSERT INTO processors (
              product, status, release_date, code_name, cores, threads,
              lithography, max_turbo_freq, base_freq, tdp, cache,
              cache_info, max_memory_size, memory_types, max_memory_speed,
              integrated_graphics
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            ",
        )?;

        statement
            .execute(params![
                record.product,
                record.status,
                record.release_date,
                record.code_name,
                record.cores,
                record.threads,
                record.lithography,
                record.max_turbo_freq,
                record.base_freq,
                record.tdp,
                record.cache,
                record.cache_info,
                record.max_memory_size,
                record.memory_types,
                record.max_memory_speed,
                record.integrated_graphics,
            ])
            .with_context(|| format!("failed to insert row for {:?}", record.product))?;

        Ok(())
    }
}

fn row_to_stored(row: &Row<'_>) -> rusqlite::Result<StoredProcessor> {
    Ok(StoredProcessor {
        id: row.get(0)?,
        record: ProcessorRecord {
            product: row.get(1)?,
            status: row.get(2)?,
            release_date: row.get(3)?,
            code_name: row.get(4)?,
            cores: row.get(5)?,
            threads: row.get(6)?,
            lithography: row.get(7)?,
            max_turbo_freq: row.get(8)?,
            base_freq: row.get(9)?,
            tdp: row.get(10)?,
            cache: row.get(11)?,
            cache_info: row.get(12)?,
            max_memory_size: row.get(13)?,
            memory_types: row.get(14)?,
            max_memory_speed: row.get(15)?,
            integrated_graphics: row.get(16)?,
        },
    })
}
