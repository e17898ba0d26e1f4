use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::cli::{TdpArgs, TdpFormat};
use crate::store::{DB_FILE_NAME, SqliteStore};

#[derive(Debug, Serialize)]
struct TdpResponse {
    processor: String,
    tdp: Option<i64>,
}

pub fn run(args: TdpArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.data_root.join(DB_FILE_NAME));

    let store = SqliteStore::open_read_only(&db_path)?;
    let Some((product, tdp)) = store.fetch_tdp(&args.product)? else {
        bail!("processor {:?} not found", args.product);
    };

    let mut output = BufWriter::new(io::stdout().lock());
    match args.format {
        TdpFormat::Json => {
            let response = TdpResponse { processor: product, tdp };
            serde_json::to_writer_pretty(&mut output, &response)
                .context("failed to serialize TDP response")?;
            writeln!(output)?;
        }
        TdpFormat::Text => {
            writeln!(
                output,
                "The TDP of {} is {} watts",
                product,
                render_tdp(tdp)
            )?;
        }
        TdpFormat::Value => {
            writeln!(output, "{}", render_tdp(tdp))?;
        }
    }
    output.flush()?;

    Ok(())
}

fn render_tdp(tdp: Option<i64>) -> String {
    tdp.map_or_else(|| "N/A".to_string(), |watts| watts.to_string())
}
