use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "athletica",
    about = "Generate deterministic fake data for the Athletica sports database and load it into PostgreSQL",
    version,
    after_help = "Examples:\n  athletica generate --records 500\n  athletica generate --records 100000 --parallel --keep-going --out-dir dumps\n  athletica preview --table athletes --rows 5\n  athletica load --user postgres --password postgres --db-name athletica --sql-dir dumps"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate dump and foreign-key files for every Athletica table
    Generate(GenerateArgs),

    /// Print sample rows for one table without writing files
    Preview(PreviewArgs),

    /// Execute a directory of dump files against PostgreSQL
    Load(LoadArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Number of records to generate per table
    #[arg(long, default_value = "100")]
    pub records: usize,

    /// Locale-pool variability between 0.0 (single locale) and 1.0 (all)
    #[arg(long, default_value = "0.3")]
    pub variability: f64,

    /// Numeric file prefix of the first table; later tables count up from it
    #[arg(long, default_value = "1")]
    pub prefix: u32,

    /// Random seed for deterministic generation
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Directory for the generated .sql and -FK.csv files
    #[arg(long, default_value = "data")]
    pub out_dir: PathBuf,

    /// Generate tables on a worker pool instead of one at a time
    #[arg(long)]
    pub parallel: bool,

    /// Keep generating the remaining tables after one fails
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Table to preview (e.g. athletes, clubs, users)
    #[arg(long)]
    pub table: String,

    /// Number of sample rows to print
    #[arg(long, default_value = "5")]
    pub rows: usize,

    /// Random seed for deterministic generation
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Locale-pool variability between 0.0 and 1.0
    #[arg(long, default_value = "0.3")]
    pub variability: f64,
}

#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Database host
    #[arg(long, env = "ATHLETICA_DB_HOST", default_value = "localhost")]
    pub host: String,

    /// Database port
    #[arg(long, env = "ATHLETICA_DB_PORT", default_value = "5432")]
    pub port: u16,

    /// Database user
    #[arg(long, env = "ATHLETICA_DB_USER")]
    pub user: String,

    /// Database password
    #[arg(long, env = "ATHLETICA_DB_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Database name
    #[arg(long, env = "ATHLETICA_DB_NAME")]
    pub db_name: String,

    /// Schema the dump files insert into; must already exist
    #[arg(long, default_value = "olympus")]
    pub schema_name: String,

    /// Directory holding the .sql dump files
    #[arg(long, default_value = "data")]
    pub sql_dir: PathBuf,

    /// Seconds to pause between dump files
    #[arg(long, default_value = "1.0")]
    pub delay: f64,
}
