use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use acre_pipeline::{report_latest_markdown, PipelineConfig, RankingPipeline};

#[derive(Debug, Parser)]
#[command(name = "acre-cli")]
#[command(about = "ACRE candidate ranking command-line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score and rank every candidate under the data directory.
    Rank {
        /// Fixed-weight scoring without adaptive adjustments.
        #[arg(long)]
        simple: bool,
        /// Rows in the markdown summary.
        #[arg(long)]
        top: Option<usize>,
    },
    /// Candidates most similar to a job posting.
    MatchCandidates {
        job_id: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Jobs most similar to a candidate.
    MatchJobs {
        username: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
    Jobs,
    /// Index of recent ranking runs.
    Report {
        #[arg(long, default_value_t = 5)]
        runs: usize,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("ACRE_LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut config = PipelineConfig::from_env();

    match cli.command.unwrap_or(Commands::Rank {
        simple: false,
        top: None,
    }) {
        Commands::Rank { simple, top } => {
            config.simple_ranking |= simple;
            if let Some(top) = top {
                config.top_k = top;
            }
            let summary = RankingPipeline::new(config).await?.run_once().await?;
            println!(
                "ranking complete: run_id={} method={} candidates={} top={} reports={}",
                summary.run_id,
                summary.scoring_method,
                summary.total_candidates,
                summary.top_candidate.as_deref().unwrap_or("-"),
                summary.reports_dir.display()
            );
        }
        Commands::MatchCandidates { job_id, top_k } => {
            let pipeline = RankingPipeline::new(config).await?;
            let report = pipeline.match_candidates_for_job(&job_id, top_k)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::MatchJobs { username, top_k } => {
            let pipeline = RankingPipeline::new(config).await?;
            let report = pipeline.match_jobs_for_candidate(&username, top_k)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Jobs => {
            let pipeline = RankingPipeline::new(config).await?;
            for job in pipeline.jobs()? {
                println!(
                    "{}\t{}\t{}\t{}",
                    job.job_id,
                    job.job_title.as_deref().unwrap_or("-"),
                    job.company.as_deref().unwrap_or("-"),
                    job.submitted_at.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Report { runs } => {
            println!("{}", report_latest_markdown(runs, &config.reports_dir)?);
        }
    }

    Ok(())
}
