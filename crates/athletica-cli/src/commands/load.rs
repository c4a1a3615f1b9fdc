use std::time::Duration;

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};

use athletica_core::exec::runner::{self, ConnectParams, RunDirOptions};
use athletica_core::LineSplitter;

use crate::args::LoadArgs;

pub async fn run(args: &LoadArgs) -> Result<()> {
    if !args.delay.is_finite() || args.delay < 0.0 {
        bail!("--delay must be a non-negative number of seconds");
    }

    let params = ConnectParams {
        host: args.host.clone(),
        port: args.port,
        user: args.user.clone(),
        password: args.password.clone(),
        db_name: args.db_name.clone(),
    };
    let options = RunDirOptions {
        schema: args.schema_name.clone(),
        sql_dir: args.sql_dir.clone(),
        delay: Duration::from_secs_f64(args.delay),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} Loading dump files... {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let report = runner::run_dir(
        &params,
        &options,
        &LineSplitter,
        Some(&|name, done, total| {
            pb.set_message(format!("{} ({}/{})", name, done, total));
        }),
    )
    .await?;

    pb.finish_and_clear();

    eprintln!(
        "✓ Executed {} of {} dump files from {} on {}",
        report.executed,
        report.total,
        args.sql_dir.display(),
        params.hint()
    );

    if let Some(failed) = &report.failed {
        bail!("load halted: {}", failed);
    }
    Ok(())
}
