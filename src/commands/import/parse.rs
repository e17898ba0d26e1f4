use std::collections::HashMap;

use anyhow::{Context, Result, bail};

/// One data row, keyed by the exact header names from the file's first row.
///
/// Cells are kept verbatim. Lookup by a header the file does not carry
/// yields a missing value, never an error.
#[derive(Debug, Clone)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(String::as_str)
    }

    /// Raw cell for a required string column; missing becomes empty.
    pub fn text(&self, header: &str) -> String {
        self.get(header).unwrap_or_default().to_string()
    }

    /// Raw cell for a nullable string column; missing becomes NULL.
    pub fn optional_text(&self, header: &str) -> Option<String> {
        self.get(header).map(str::to_string)
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            cells: pairs
                .iter()
                .map(|(header, cell)| (header.to_string(), cell.to_string()))
                .collect(),
        }
    }
}

/// Parses CSV text into header-keyed rows, in file order.
///
/// Blank lines are skipped. Short records leave their trailing columns
/// missing. Input without a header row, or input that is not decodable as
/// CSV at all, fails the whole batch before any row is produced.
pub fn parse_csv(text: &str) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("failed to read CSV header row")?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(|header| header.is_empty()) {
        bail!("CSV input has no header row");
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("failed to read CSV record")?;

        let cells = headers
            .iter()
            .enumerate()
            .filter_map(|(index, header)| {
                record
                    .get(index)
                    .map(|cell| (header.clone(), cell.to_string()))
            })
            .collect();
        rows.push(RawRow { cells });
    }

    Ok(rows)
}
