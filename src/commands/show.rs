use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result, bail};

use crate::cli::ShowArgs;
use crate::store::{DB_FILE_NAME, SqliteStore};

pub fn run(args: ShowArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.data_root.join(DB_FILE_NAME));

    let store = SqliteStore::open_read_only(&db_path)?;
    let row = match (&args.id, &args.product) {
        (Some(id), None) => store.fetch_by_id(*id)?,
        (None, Some(product)) => store.fetch_by_product(product)?,
        _ => bail!("pass exactly one of --id or --product"),
    };
    let Some(row) = row else {
        bail!("processor not found");
    };

    let mut output = BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &row)
            .context("failed to serialize processor to json")?;
        writeln!(output)?;
    } else {
        let record = &row.record;
        writeln!(output, "id: {}", row.id)?;
        writeln!(output, "product: {}", record.product)?;
        writeln!(output, "status: {}", display_text(record.status.as_deref()))?;
        writeln!(
            output,
            "release_date: {}",
            display_text(record.release_date.as_deref())
        )?;
        writeln!(
            output,
            "code_name: {}",
            display_text(record.code_name.as_deref())
        )?;
        writeln!(output, "cores: {}", display_value(record.cores))?;
        writeln!(output, "threads: {}", display_value(record.threads))?;
        writeln!(
            output,
            "lithography_nm: {}",
            display_value(record.lithography)
        )?;
        writeln!(
            output,
            "max_turbo_freq_ghz: {}",
            display_value(record.max_turbo_freq)
        )?;
        writeln!(output, "base_freq_ghz: {}", display_value(record.base_freq))?;
        writeln!(output, "tdp_w: {}", display_value(record.tdp))?;
        writeln!(output, "cache_mb: {}", display_value(record.cache))?;
        writeln!(
            output,
            "cache_info: {}",
            display_text(record.cache_info.as_deref())
        )?;
        writeln!(
            output,
            "max_memory_size_gb: {}",
            display_value(record.max_memory_size)
        )?;
        writeln!(
            output,
            "memory_types: {}",
            display_text(record.memory_types.as_deref())
        )?;
        writeln!(
            output,
            "max_memory_speed_mhz: {}",
            display_value(record.max_memory_speed)
        )?;
        writeln!(
            output,
            "integrated_graphics: {}",
            display_text(record.integrated_graphics.as_deref())
        )?;
    }
    output.flush()?;

    Ok(())
}

fn display_text(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn display_value<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |inner| inner.to_string())
}
