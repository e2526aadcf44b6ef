use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{BufRead, Write};

/// Reads newline-delimited JSON records, skipping blank lines.
pub fn jsonl_deser<T: DeserializeOwned, R: BufRead>(reader: R, max_rows: Option<usize>) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        if let Some(m) = max_rows { if out.len() >= m { break; } }
        let l = line?;
        if l.trim().is_empty() { continue; }
        let v: T = serde_json::from_str(&l).with_context(|| format!("parse JSONL line {}", i + 1))?;
        out.push(v);
    }
    Ok(out)
}

pub fn jsonl_ser<T: Serialize, W: Write>(mut writer: W, rec: &T) -> Result<()> {
    let s = serde_json::to_string(rec)?;
    writeln!(writer, "{s}")?;
    Ok(())
}
