use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use readmit_study::config::StudyConfig;
use readmit_study::study::run_study;

/// Retrospective 30-day readmission analysis for septic arthritis
/// hospital admissions
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the admissions CSV export
    input: PathBuf,

    /// Directory tables and figures are written to
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Field delimiter of the input table
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Readmission window in days
    #[arg(long, default_value_t = 30)]
    window_days: i64,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    anyhow::ensure!(cli.delimiter.is_ascii(), "delimiter must be ASCII");

    let config = StudyConfig {
        output_dir: cli.output_dir,
        delimiter: cli.delimiter as u8,
        readmission_window_days: cli.window_days,
        ..StudyConfig::default()
    };

    let summary = run_study(&cli.input, &config)
        .with_context(|| format!("analysis failed for {}", cli.input.display()))?;

    log::info!(
        "Done: {} cohort admissions, {} patients, readmission rate {:.2}%{}",
        summary.cohort_admissions,
        summary.distinct_patients,
        summary.overall_readmission_rate_percent,
        summary
            .auc
            .map_or_else(|| ", model unavailable".to_string(), |a| format!(", AUC {a:.3}"))
    );
    Ok(())
}
