use anyhow::Result;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::store::{DB_FILE_NAME, SqliteStore};

pub fn run(args: StatusArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.data_root.join(DB_FILE_NAME));

    info!(path = %db_path.display(), "status requested");

    if !db_path.exists() {
        warn!(path = %db_path.display(), "database file missing; run `procdb setup` first");
        return Ok(());
    }

    let store = SqliteStore::open_read_only(&db_path)?;

    let tables = store.table_names()?;
    info!(tables = %tables.join(", "), "tables in database");

    let count = store.count()?;
    info!(processors = count, "processor rows");

    if count == 0 {
        return Ok(());
    }

    for row in store.fetch_page(0, 5)? {
        info!(
            id = row.id,
            product = %row.record.product,
            tdp = ?row.record.tdp,
            cores = ?row.record.cores,
            "sample row"
        );
    }

    let duplicates = store.duplicate_products()?;
    if duplicates.is_empty() {
        info!("no duplicate products found");
    } else {
        for (product, occurrences) in duplicates {
            info!(product = %product, occurrences, "duplicate product");
        }
    }

    Ok(())
}
