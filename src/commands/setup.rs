use anyhow::Result;
use tracing::info;

use crate::cli::SetupArgs;
use crate::store::{DB_FILE_NAME, SqliteStore};
use crate::util::ensure_directory;

pub fn run(args: SetupArgs) -> Result<()> {
    let db_path = args
        .db_path
        .unwrap_or_else(|| args.data_root.join(DB_FILE_NAME));
    if let Some(parent) = db_path.parent() {
        ensure_directory(parent)?;
    }

    let store = SqliteStore::open(&db_path)?;
    store.ensure_schema()?;

    info!(path = %db_path.display(), "database schema ready");
    Ok(())
}
