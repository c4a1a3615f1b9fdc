use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};

use athletica_core::orchestrate::{self, ExecutionMode, FailurePolicy};
use athletica_core::GenerationParams;

use crate::args::GenerateArgs;
use crate::tables;

pub async fn run(args: &GenerateArgs) -> Result<()> {
    if !(0.0..=1.0).contains(&args.variability) {
        bail!(
            "--variability must be between 0.0 and 1.0 (got {})",
            args.variability
        );
    }

    let jobs = tables::jobs(args.records, args.prefix)?;
    let total = jobs.len();
    let params = GenerationParams::new(args.records)
        .with_seed(args.seed)
        .with_variability(args.variability);

    let mode = if args.parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    };
    let policy = if args.keep_going {
        FailurePolicy::BestEffort
    } else {
        FailurePolicy::FailFast
    };

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} Generating tables... {bar:40.cyan/dim} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );

    let report = orchestrate::run_jobs(
        jobs,
        params,
        &args.out_dir,
        mode,
        policy,
        Some(&|name, done, _total| {
            pb.set_position(done as u64);
            pb.set_message(name.to_string());
        }),
    )
    .await?;

    pb.finish_with_message("done");

    if report.all_succeeded() {
        eprintln!(
            "\n✓ Generated {} records for each of {} tables into {}",
            args.records,
            report.completed.len(),
            args.out_dir.display()
        );
        Ok(())
    } else {
        for (name, reason) in &report.failed {
            eprintln!("✗ {}: {}", name, reason);
        }
        bail!(
            "{} of {} tables failed; completed tables were kept in {}",
            report.failed.len(),
            total,
            args.out_dir.display()
        );
    }
}
