use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ListArgs;
use crate::model::StoredProcessor;
use crate::store::{DB_FILE_NAME, SqliteStore};

pub fn run(args: ListArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.data_root.join(DB_FILE_NAME));

    let store = SqliteStore::open_read_only(&db_path)?;
    let rows = store.fetch_page(args.offset, args.limit)?;

    info!(
        offset = args.offset,
        limit = args.limit,
        returned = rows.len(),
        "fetched processors page"
    );

    let mut output = BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &rows)
            .context("failed to serialize processors to json")?;
        writeln!(output)?;
    } else {
        for row in &rows {
            write_text_row(&mut output, row)?;
        }
        writeln!(output, "Returned {} processors", rows.len())?;
    }
    output.flush()?;

    Ok(())
}

fn write_text_row(output: &mut impl Write, row: &StoredProcessor) -> Result<()> {
    let record = &row.record;
    writeln!(
        output,
        "{}\t{}\tcores={} threads={} tdp={} cache={} status={}",
        row.id,
        record.product,
        format_opt(record.cores.as_ref()),
        format_opt(record.threads.as_ref()),
        format_opt(record.tdp.as_ref()),
        format_opt(record.cache.as_ref()),
        record.status.as_deref().unwrap_or("-"),
    )?;
    Ok(())
}

fn format_opt<T: std::fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}
