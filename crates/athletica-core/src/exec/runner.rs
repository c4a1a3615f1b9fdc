//! # Dump Runner
//!
//! Connects to PostgreSQL with retry, verifies the target schema, and
//! executes a directory of dump files in lexicographic order. Each file runs
//! in its own transaction: a failing statement rolls back that file only,
//! previously committed files stay committed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, Connection, PgConnection};
use tracing::{info, warn};

use crate::error::{Result, SeedError};
use crate::exec::splitter::StatementSplitter;

/// Connection attempts before giving up.
const CONNECT_ATTEMPTS: u32 = 3;

/// Connection coordinates for a load run.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub db_name: String,
}

impl ConnectParams {
    fn options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.db_name)
    }

    /// Loggable target description. Never includes the password.
    pub fn hint(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.db_name)
    }
}

/// Directory-run settings.
#[derive(Debug, Clone)]
pub struct RunDirOptions {
    /// Schema that must already exist in the target database.
    pub schema: String,
    /// Directory holding the `.sql` dump files.
    pub sql_dir: PathBuf,
    /// Pause between consecutive files, letting the server absorb large
    /// batches. Not applied after the last file.
    pub delay: Duration,
}

/// Outcome of a directory run.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub executed: usize,
    pub total: usize,
    /// Description of the first failed file, if any. Files after it were not
    /// attempted.
    pub failed: Option<String>,
}

impl LoadReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_none() && self.executed == self.total
    }
}

/// Retry `op` up to `attempts` times with exponential backoff: 1 second
/// after the first failure, doubling after each subsequent one. Returns the
/// last error once attempts are exhausted.
async fn with_retry<T, E, F, Fut>(attempts: u32, mut op: F) -> std::result::Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if attempt >= attempts {
                    return Err(e);
                }
                let backoff = Duration::from_secs(1u64 << (attempt - 1));
                warn!(
                    "attempt {} of {} failed ({}), retrying in {:?}",
                    attempt, attempts, e, backoff
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

/// Open a connection, retrying transient failures with exponential backoff.
pub async fn connect_with_retry(params: &ConnectParams) -> Result<PgConnection> {
    let options = params.options();
    with_retry(CONNECT_ATTEMPTS, |_| {
        let options = options.clone();
        async move { options.connect().await }
    })
    .await
    .map_err(|source| SeedError::Connection {
        attempts: CONNECT_ATTEMPTS,
        connection_hint: params.hint(),
        source,
    })
}

/// Check that `schema` exists in the connected database.
pub async fn schema_exists(conn: &mut PgConnection, schema: &str) -> Result<bool> {
    let found: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM pg_namespace WHERE nspname = $1")
            .bind(schema)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|source| SeedError::Database {
                message: format!("checking for schema '{}'", schema),
                source,
            })?;
    Ok(found.is_some())
}

/// Execute one dump file inside a single transaction. Returns the number of
/// statements committed.
///
/// A zero-byte file is an error (a generation step produced nothing); a file
/// holding only comments executes zero statements and succeeds.
pub async fn execute_dump_file(
    conn: &mut PgConnection,
    path: &Path,
    splitter: &dyn StatementSplitter,
) -> Result<usize> {
    let text = std::fs::read_to_string(path).map_err(|e| SeedError::Output {
        message: format!("reading {}", path.display()),
        source: e,
    })?;
    if text.is_empty() {
        return Err(SeedError::EmptyDump {
            path: path.display().to_string(),
        });
    }

    let statements = splitter.split(&text);
    if statements.is_empty() {
        info!("{}: no executable statements", path.display());
        return Ok(0);
    }

    let mut tx = conn.begin().await.map_err(|source| SeedError::Database {
        message: format!("opening transaction for {}", path.display()),
        source,
    })?;
    for (index, statement) in statements.iter().enumerate() {
        if let Err(source) = sqlx::query(statement.as_str()).execute(&mut *tx).await {
            let _ = tx.rollback().await;
            return Err(SeedError::Statement {
                file: path.display().to_string(),
                statement_index: index,
                source,
            });
        }
    }
    tx.commit().await.map_err(|source| SeedError::Database {
        message: format!("committing {}", path.display()),
        source,
    })?;
    Ok(statements.len())
}

/// All `.sql` files in `dir` (extension match is case-insensitive), sorted
/// lexicographically by file name. The dump naming convention makes this the
/// foreign-key dependency order.
fn collect_sql_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| SeedError::Output {
        message: format!("reading {}", dir.display()),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SeedError::Output {
            message: format!("reading {}", dir.display()),
            source: e,
        })?;
        let path = entry.path();
        let is_sql = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"));
        if path.is_file() && is_sql {
            files.push(path);
        }
    }
    files.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(files)
}

/// Run every dump file in a directory, halting at the first failed file.
///
/// Hard setup problems (missing directory, unreachable server, missing
/// schema) are returned as `Err`; a failing dump file is recorded in the
/// report so callers can still see how far the run got.
pub async fn run_dir(
    params: &ConnectParams,
    options: &RunDirOptions,
    splitter: &dyn StatementSplitter,
    progress_callback: Option<&(dyn Fn(&str, usize, usize) + Send + Sync)>,
) -> Result<LoadReport> {
    if !options.sql_dir.is_dir() {
        return Err(SeedError::MissingResource {
            message: format!("dump directory {} does not exist", options.sql_dir.display()),
        });
    }
    let files = collect_sql_files(&options.sql_dir)?;
    if files.is_empty() {
        warn!("no .sql files found in {}", options.sql_dir.display());
        return Ok(LoadReport::default());
    }

    let mut conn = connect_with_retry(params).await?;
    if !schema_exists(&mut conn, &options.schema).await? {
        return Err(SeedError::MissingResource {
            message: format!(
                "schema '{}' does not exist on {}; create it before loading",
                options.schema,
                params.hint()
            ),
        });
    }

    let total = files.len();
    let mut report = LoadReport {
        total,
        ..LoadReport::default()
    };

    for (index, file) in files.iter().enumerate() {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        match execute_dump_file(&mut conn, file, splitter).await {
            Ok(statements) => {
                info!("{}: {} statements committed", name, statements);
                report.executed += 1;
                if let Some(cb) = progress_callback {
                    cb(&name, index + 1, total);
                }
                if index + 1 < total && !options.delay.is_zero() {
                    tokio::time::sleep(options.delay).await;
                }
            }
            Err(e) => {
                warn!("{}: {}", name, e);
                report.failed = Some(format!("{}: {}", name, e));
                break;
            }
        }
    }

    info!(
        "executed {} of {} dump files on {}",
        report.executed,
        report.total,
        params.hint()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_omits_the_password() {
        let params = ConnectParams {
            host: "db.internal".to_string(),
            port: 5433,
            user: "loader".to_string(),
            password: "s3cret".to_string(),
            db_name: "athletica".to_string(),
        };
        let hint = params.hint();
        assert_eq!(hint, "loader@db.internal:5433/athletica");
        assert!(!hint.contains("s3cret"));
    }

    #[test]
    fn collects_sql_files_sorted_and_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["02-OLYMPUS-USERS.SQL", "01-OLYMPUS-CLUBS.sql", "notes.txt"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("archive.sql")).unwrap();

        let files = collect_sql_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["01-OLYMPUS-CLUBS.sql", "02-OLYMPUS-USERS.SQL"]);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_exhausts_attempts_with_exponential_backoff() {
        let start = tokio::time::Instant::now();
        let mut calls = 0u32;
        let result: std::result::Result<(), &str> = with_retry(3, |_| {
            calls += 1;
            async { Err("connection refused") }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 3);
        // Sleeps of 1 and 2 seconds between the three attempts.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_stops_as_soon_as_an_attempt_succeeds() {
        let result = with_retry(3, |attempt| async move {
            if attempt == 0 {
                Err("flaky")
            } else {
                Ok(attempt)
            }
        })
        .await;
        assert_eq!(result, Ok(1));
    }

    #[test]
    fn empty_report_is_successful() {
        assert!(LoadReport::default().all_succeeded());
        let partial = LoadReport {
            executed: 2,
            total: 5,
            failed: Some("03-OLYMPUS-ATHLETES.sql: boom".to_string()),
        };
        assert!(!partial.all_succeeded());
    }
}
