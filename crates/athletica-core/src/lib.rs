pub mod error;
pub mod exec;
pub mod generate;
pub mod orchestrate;
pub mod output;
pub mod table;

// Re-export key types for convenience
pub use error::{Result, SeedError};
pub use exec::{ConnectParams, LineSplitter, LoadReport, RunDirOptions, StatementSplitter};
pub use generate::engine::{generate, GenerationParams, Record};
pub use generate::value::Value;
pub use orchestrate::{ExecutionMode, FailurePolicy, GenerationJob, RunReport};
pub use table::{ProviderSpec, TableDef};
