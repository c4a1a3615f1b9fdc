//! # Foreign-Key Export
//!
//! For every table that declares foreign-key columns, a CSV side file is
//! written next to the dump so downstream consumers can rebuild the candidate
//! sets that were actually used. Header row first, then one line per record.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, SeedError};
use crate::generate::engine::Record;
use crate::table::TableDef;

/// Side-file name: `<prefix>-<SCHEMA>-<TABLE>-FK.csv`.
pub fn fk_file_name(table: &TableDef, prefix: &str) -> String {
    format!(
        "{}-{}-{}-FK.csv",
        prefix,
        table.schema().to_uppercase(),
        table.name().to_uppercase()
    )
}

/// Export the foreign-key columns of `records` as CSV. Returns `None` when
/// the table declares no foreign-key columns (nothing to export).
pub fn export_foreign_keys_file(
    table: &TableDef,
    records: &[Record],
    prefix: &str,
    dir: &Path,
) -> Result<Option<PathBuf>> {
    let columns: Vec<&String> = table.foreign_keys().keys().collect();
    if columns.is_empty() {
        return Ok(None);
    }

    let path = dir.join(fk_file_name(table, prefix));
    let file = File::create(&path).map_err(|e| SeedError::Output {
        message: format!("creating {}", path.display()),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    let header = columns
        .iter()
        .map(|c| csv_escape(c))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{}", header).map_err(|e| output_err(table, e))?;

    for record in records {
        let line = columns
            .iter()
            .map(|col| {
                record
                    .get(*col)
                    .map(|v| csv_escape(&v.to_csv_field()))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{}", line).map_err(|e| output_err(table, e))?;
    }

    writer.flush().map_err(|e| output_err(table, e))?;
    info!(
        "exported foreign-key columns of {} to {}",
        table.full_name(),
        path.display()
    );
    Ok(Some(path))
}

/// Escape a CSV field: quote if it contains comma, quote, or newline.
fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn output_err(table: &TableDef, e: std::io::Error) -> SeedError {
    SeedError::Output {
        message: format!("writing FK export for {}", table.full_name()),
        source: e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::value::Value;
    use crate::table::ProviderSpec;
    use indexmap::IndexMap;

    fn users_table() -> TableDef {
        let mut fks = IndexMap::new();
        fks.insert("athlete_id".to_string(), vec![Value::Int(1)]);
        fks.insert("coach_id".to_string(), vec![Value::Int(1)]);
        TableDef::new(
            "olympus",
            "users",
            vec![
                "username".to_string(),
                "athlete_id".to_string(),
                "coach_id".to_string(),
            ],
            vec![
                ProviderSpec::named("user_name"),
                ProviderSpec::named("athlete_id"),
                ProviderSpec::named("coach_id"),
            ],
            fks,
        )
        .unwrap()
    }

    #[test]
    fn exports_header_and_fk_columns_only() {
        let dir = tempfile::tempdir().unwrap();
        let table = users_table();

        let mut record = Record::new();
        record.insert("username".to_string(), Value::String("kim".into()));
        record.insert("athlete_id".to_string(), Value::Int(3));
        record.insert("coach_id".to_string(), Value::Int(7));

        let path = export_foreign_keys_file(&table, &[record], "01", dir.path())
            .unwrap()
            .unwrap();
        assert!(path.ends_with("01-OLYMPUS-USERS-FK.csv"));

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, "athlete_id,coach_id\n3,7\n");
    }

    #[test]
    fn tables_without_fks_export_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let table = TableDef::new(
            "olympus",
            "events",
            vec!["name".to_string()],
            vec![ProviderSpec::named("catch_phrase")],
            IndexMap::new(),
        )
        .unwrap();
        assert!(export_foreign_keys_file(&table, &[], "01", dir.path())
            .unwrap()
            .is_none());
    }

    #[test]
    fn csv_escape_quotes_when_needed() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
