//! # Record Generator
//!
//! Turns a `TableDef` plus generation parameters into an ordered sequence of
//! records. One owned `StdRng`, seeded from the call's seed, drives locale
//! pool selection, per-record locale choice, foreign-key candidate choice and
//! every `fake` generator, so identical inputs produce identical records.
//!
//! Column resolution always walks the definition order and never branches on
//! record content, keeping rng consumption stable across runs.

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, SeedError};
use crate::generate::locale;
use crate::generate::providers;
use crate::generate::value::Value;
use crate::table::TableDef;

/// An ordered column → value mapping. `IndexMap` (not `HashMap`) so the
/// materialized column order matches the definition order deterministically.
pub type Record = IndexMap<String, Value>;

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 42;

/// Variability used when the caller does not supply one.
pub const DEFAULT_VARIABILITY: f64 = 0.3;

/// Parameters for one generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    /// Number of records to produce.
    pub records: usize,
    /// Seed for the call's random source.
    pub seed: u64,
    /// Locale-pool variability in `[0, 1]`.
    pub variability: f64,
}

impl GenerationParams {
    pub fn new(records: usize) -> Self {
        Self {
            records,
            seed: DEFAULT_SEED,
            variability: DEFAULT_VARIABILITY,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_variability(mut self, variability: f64) -> Self {
        self.variability = variability;
        self
    }
}

/// Progress reporting batch size, so terminal I/O is not paid on every row.
const PROGRESS_BATCH_SIZE: usize = 100;

/// Generate the full record sequence for one table.
pub fn generate(table: &TableDef, params: &GenerationParams) -> Result<Vec<Record>> {
    generate_with_progress(table, params, None)
}

/// Like [`generate`], reporting `(rows_done, rows_total)` every
/// `PROGRESS_BATCH_SIZE` rows.
pub fn generate_with_progress(
    table: &TableDef,
    params: &GenerationParams,
    progress_callback: Option<&(dyn Fn(usize, usize) + Send + Sync)>,
) -> Result<Vec<Record>> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let pool = locale::select_pool(params.variability, &mut rng);

    let mut records = Vec::with_capacity(params.records);
    for row in 0..params.records {
        let locale = pool[rng.random_range(0..pool.len())];

        let mut record = Record::with_capacity(table.columns().len());
        for (column, spec) in table.column_providers() {
            let value = if table.foreign_keys().contains_key(column) {
                pick_candidate(table, column, &mut rng)?
            } else {
                providers::resolve(spec, locale, &mut rng)?
            };
            record.insert(column.to_string(), value);
        }
        records.push(record);

        if let Some(cb) = progress_callback {
            let done = row + 1;
            if done % PROGRESS_BATCH_SIZE == 0 || done == params.records {
                cb(done, params.records);
            }
        }
    }

    Ok(records)
}

/// Uniform draw from a foreign-key candidate list. A declared FK column with
/// no candidates is a configuration error, not a silent NULL.
fn pick_candidate(table: &TableDef, column: &str, rng: &mut StdRng) -> Result<Value> {
    let candidates = table.fk_candidates(column).unwrap_or(&[]);
    if candidates.is_empty() {
        return Err(SeedError::config(format!(
            "table {}: foreign-key column '{}' has no candidate values",
            table.full_name(),
            column
        )));
    }
    Ok(candidates[rng.random_range(0..candidates.len())].clone())
}
