//! # SQL Materializer
//!
//! Renders generated records into batched multi-row INSERT statements and
//! exports them as dump files. The literal formatting rules live on
//! [`Value::to_sql_literal`]; this module owns batching, statement shape and
//! the dump-file naming convention.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, SeedError};
use crate::generate::engine::Record;
use crate::table::TableDef;

/// Rows per INSERT statement.
pub const BATCH_SIZE: usize = 10_000;

/// Render records into one INSERT statement per batch of `BATCH_SIZE` rows.
///
/// The column set and order come from the first record; every record of one
/// call is expected to share them (the generator guarantees this). Empty
/// input yields no statements.
pub fn to_statements(table: &TableDef, records: &[Record]) -> Vec<String> {
    let first = match records.first() {
        Some(r) => r,
        None => return Vec::new(),
    };
    let columns: Vec<&String> = first.keys().collect();
    let col_list = columns
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let full_table = table.full_name();

    let mut statements = Vec::with_capacity(records.len().div_ceil(BATCH_SIZE));
    for batch in records.chunks(BATCH_SIZE) {
        let mut sql = format!("INSERT INTO {} ({}) VALUES ", full_table, col_list);
        for (i, record) in batch.iter().enumerate() {
            if i > 0 {
                sql.push(',');
            }
            sql.push('(');
            for (j, col) in columns.iter().enumerate() {
                if j > 0 {
                    sql.push_str(", ");
                }
                let literal = record
                    .get(*col)
                    .map(|v| v.to_sql_literal())
                    .unwrap_or_else(|| "NULL".to_string());
                sql.push_str(&literal);
            }
            sql.push(')');
        }
        sql.push(';');
        statements.push(sql);
    }
    statements
}

/// Write the materialized statements, newline-separated.
pub fn write_sql<W: Write>(writer: &mut W, table: &TableDef, records: &[Record]) -> Result<()> {
    let statements = to_statements(table, records);
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 {
            writeln!(writer).map_err(|e| output_err(table, e))?;
        }
        writer
            .write_all(stmt.as_bytes())
            .map_err(|e| output_err(table, e))?;
    }
    Ok(())
}

/// Dump file name: `<prefix>-<SCHEMA>-<TABLE>.sql`, upper-cased so reruns
/// with the same prefix overwrite rather than accumulate.
pub fn dump_file_name(table: &TableDef, prefix: &str) -> String {
    format!(
        "{}-{}-{}.sql",
        prefix,
        table.schema().to_uppercase(),
        table.name().to_uppercase()
    )
}

/// Export the records as a dump file in `dir`, truncating any previous run's
/// file. Empty record sets still produce an (empty) file.
pub fn export_file(
    table: &TableDef,
    records: &[Record],
    prefix: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let path = dir.join(dump_file_name(table, prefix));
    let file = File::create(&path).map_err(|e| SeedError::Output {
        message: format!("creating {}", path.display()),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    write_sql(&mut writer, table, records)?;
    writer.flush().map_err(|e| output_err(table, e))?;
    info!(
        "exported {} records for {} to {}",
        records.len(),
        table.full_name(),
        path.display()
    );
    Ok(path)
}

fn output_err(table: &TableDef, e: std::io::Error) -> SeedError {
    SeedError::Output {
        message: format!("writing SQL for {}", table.full_name()),
        source: e,
    }
}
