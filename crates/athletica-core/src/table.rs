//! # Table Definitions
//!
//! A `TableDef` is the static description of one logical table to seed:
//! schema, name, ordered columns, one value-provider spec per column, and
//! optional foreign-key candidate sets. It is pure data, built once per run
//! from configuration and never mutated.

use std::sync::Arc;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use serde_json::Map;

use crate::error::{Result, SeedError};
use crate::generate::locale::Locale;
use crate::generate::value::Value;

/// A caller-supplied generator invoked with the record's locale and the run's
/// rng. Must be `Send + Sync` so jobs can run on the worker pool.
pub type CustomProvider = Arc<dyn Fn(Locale, &mut StdRng) -> Value + Send + Sync>;

/// How to produce the value for one column.
#[derive(Clone)]
pub enum ProviderSpec {
    /// A registered generator name (e.g. `"name"`, `"city"`).
    Named(String),
    /// A registered generator name plus keyword parameters
    /// (e.g. `random_element` with an `elements` list).
    Parameterized {
        method: String,
        params: Map<String, serde_json::Value>,
    },
    /// An opaque callable taking the locale-bound context.
    Custom(CustomProvider),
}

impl ProviderSpec {
    pub fn named(name: impl Into<String>) -> Self {
        ProviderSpec::Named(name.into())
    }

    pub fn parameterized(
        method: impl Into<String>,
        params: Map<String, serde_json::Value>,
    ) -> Self {
        ProviderSpec::Parameterized {
            method: method.into(),
            params,
        }
    }

    /// Uniform choice from a fixed list, the most common parameterized form.
    pub fn random_element<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<serde_json::Value> = elements
            .into_iter()
            .map(|e| serde_json::Value::String(e.into()))
            .collect();
        let mut params = Map::new();
        params.insert("elements".to_string(), serde_json::Value::Array(list));
        ProviderSpec::Parameterized {
            method: "random_element".to_string(),
            params,
        }
    }

    /// Uniform integer in `[min, max]`.
    pub fn random_int(min: i64, max: i64) -> Self {
        let mut params = Map::new();
        params.insert("min".to_string(), serde_json::Value::from(min));
        params.insert("max".to_string(), serde_json::Value::from(max));
        ProviderSpec::Parameterized {
            method: "random_int".to_string(),
            params,
        }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Locale, &mut StdRng) -> Value + Send + Sync + 'static,
    {
        ProviderSpec::Custom(Arc::new(f))
    }
}

impl std::fmt::Debug for ProviderSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
            ProviderSpec::Parameterized { method, params } => f
                .debug_struct("Parameterized")
                .field("method", method)
                .field("params", params)
                .finish(),
            ProviderSpec::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Static description of one table to generate.
#[derive(Debug, Clone)]
pub struct TableDef {
    schema: String,
    name: String,
    columns: Vec<String>,
    providers: Vec<ProviderSpec>,
    /// Column name → candidate values for foreign-key columns. Insertion
    /// order is preserved so the FK export file has a stable column order.
    foreign_keys: IndexMap<String, Vec<Value>>,
}

impl TableDef {
    /// Build a table definition, enforcing the column/provider arity
    /// invariant at construction time.
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<String>,
        providers: Vec<ProviderSpec>,
        foreign_keys: IndexMap<String, Vec<Value>>,
    ) -> Result<Self> {
        let schema = schema.into();
        let name = name.into();
        if columns.len() != providers.len() {
            return Err(SeedError::config(format!(
                "table {}.{}: {} columns but {} providers",
                schema,
                name,
                columns.len(),
                providers.len()
            )));
        }
        for fk_column in foreign_keys.keys() {
            if !columns.contains(fk_column) {
                return Err(SeedError::config(format!(
                    "table {}.{}: foreign-key column '{}' is not in the column list",
                    schema, name, fk_column
                )));
            }
        }
        Ok(Self {
            schema,
            name,
            columns,
            providers,
            foreign_keys,
        })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `schema.table`, as it appears in the generated INSERT statements.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Columns positionally paired with their provider specs.
    pub fn column_providers(&self) -> impl Iterator<Item = (&str, &ProviderSpec)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.providers.iter())
    }

    pub fn foreign_keys(&self) -> &IndexMap<String, Vec<Value>> {
        &self.foreign_keys
    }

    /// Candidate values for a foreign-key column, if the column is declared
    /// as one.
    pub fn fk_candidates(&self, column: &str) -> Option<&[Value]> {
        self.foreign_keys.get(column).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn arity_mismatch_fails_construction() {
        let err = TableDef::new(
            "olympus",
            "clubs",
            cols(&["name", "city"]),
            vec![ProviderSpec::named("company")],
            IndexMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SeedError::Config { .. }));
        assert!(err.to_string().contains("2 columns but 1 providers"));
    }

    #[test]
    fn fk_column_must_exist() {
        let mut fks = IndexMap::new();
        fks.insert("club_id".to_string(), vec![Value::Int(1)]);
        let err = TableDef::new(
            "olympus",
            "athletes",
            cols(&["name"]),
            vec![ProviderSpec::named("name")],
            fks,
        )
        .unwrap_err();
        assert!(matches!(err, SeedError::Config { .. }));
    }

    #[test]
    fn full_name_joins_schema_and_table() {
        let table = TableDef::new(
            "olympus",
            "events",
            cols(&["name"]),
            vec![ProviderSpec::named("catch_phrase")],
            IndexMap::new(),
        )
        .unwrap();
        assert_eq!(table.full_name(), "olympus.events");
    }
}
