use anyhow::{Context, Result};

use crate::model::ProcessorRecord;

use super::parse::RawRow;

/// Sentinel the source CSV exports use for an intentionally absent number.
pub const NOT_AVAILABLE: &str = "N/A";

/// The exact header names the source exports carry, units included.
/// Column lookup keys on these verbatim; schema drift is fixed here and
/// nowhere else.
pub mod headers {
    pub const PRODUCT: &str = "Product";
    pub const STATUS: &str = "Status";
    pub const RELEASE_DATE: &str = "Release Date";
    pub const CODE_NAME: &str = "Code Name";
    pub const CORES: &str = "Cores";
    pub const THREADS: &str = "Threads";
    pub const LITHOGRAPHY: &str = "Lithography(nm)";
    pub const MAX_TURBO_FREQ: &str = "Max. Turbo Freq.(GHz)";
    pub const BASE_FREQ: &str = "Base Freq.(GHz)";
    pub const TDP: &str = "TDP(W)";
    pub const CACHE: &str = "Cache(MB)";
    pub const CACHE_INFO: &str = "Cache Info";
    pub const MAX_MEMORY_SIZE: &str = "Max Memory Size(GB)";
    pub const MEMORY_TYPES: &str = "Memory Types";
    pub const MAX_MEMORY_SPEED: &str = "Max Memory Speed(MHz)";
    pub const INTEGRATED_GRAPHICS: &str = "Integrated Graphics";
}

/// Converts one raw row into a typed record.
///
/// String cells pass through verbatim. Numeric cells map `"N/A"` and empty
/// to NULL; anything else must parse as the declared type. A cell that does
/// not parse is a row-local error for the caller to count, never a reason
/// to abort the surrounding batch.
pub fn normalize_row(raw: &RawRow) -> Result<ProcessorRecord> {
    Ok(ProcessorRecord {
        product: raw.text(headers::PRODUCT),
        status: raw.optional_text(headers::STATUS),
        release_date: raw.optional_text(headers::RELEASE_DATE),
        code_name: raw.optional_text(headers::CODE_NAME),
        cores: optional_i64(raw, headers::CORES)?,
        threads: optional_i64(raw, headers::THREADS)?,
        lithography: optional_f64(raw, headers::LITHOGRAPHY)?,
        max_turbo_freq: optional_f64(raw, headers::MAX_TURBO_FREQ)?,
        base_freq: optional_f64(raw, headers::BASE_FREQ)?,
        tdp: optional_i64(raw, headers::TDP)?,
        cache: optional_f64(raw, headers::CACHE)?,
        cache_info: raw.optional_text(headers::CACHE_INFO),
        max_memory_size: optional_i64(raw, headers::MAX_MEMORY_SIZE)?,
        memory_types: raw.optional_text(headers::MEMORY_TYPES),
        max_memory_speed: optional_i64(raw, headers::MAX_MEMORY_SPEED)?,
        integrated_graphics: raw.optional_text(headers::INTEGRATED_GRAPHICS),
    })
}

/// Integer columns also accept float-formatted cells ("65.0"), truncating
/// toward zero, since some exports render whole watts and gigabytes with a
/// decimal point.
fn optional_i64(raw: &RawRow, header: &str) -> Result<Option<i64>> {
    let Some(cell) = raw.get(header) else {
        return Ok(None);
    };

    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
        return Ok(None);
    }

    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(Some(value));
    }

    let value = trimmed
        .parse::<f64>()
        .with_context(|| format!("column {header:?}: invalid integer {trimmed:?}"))?;
    Ok(Some(value.trunc() as i64))
}

fn optional_f64(raw: &RawRow, header: &str) -> Result<Option<f64>> {
    let Some(cell) = raw.get(header) else {
        return Ok(None);
    };

    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
        return Ok(None);
    }

    let value = trimmed
        .parse::<f64>()
        .with_context(|| format!("column {header:?}: invalid number {trimmed:?}"))?;
    Ok(Some(value))
}
