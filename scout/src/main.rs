//! Scout binary entry point
//!
//! Runs discovery, price sweeps and price averages against a JSON store file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;

use scout::core::{CompetitorPriceQuery, DEFAULT_MAX_COMPETITORS, DiscoveryOrchestrator, PriceSearchOrchestrator, RateLimiter};
use scout::services::{InMemoryGateway, RealModelClient, SweepJobRunner, load_snapshot, save_snapshot};
use scout::{JobEvent, JobStatus, ScoutConfig, SweepRequest};
use shared::{BranchId, Component, GroupId, RoomType, logging, scout_debug, scout_info};

/// Competitor discovery and price search for hostel branches
#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Discovers competitor hostels and collects their nightly prices")]
struct Args {
    /// JSON store holding branches, groups, competitors, listings and prices
    #[arg(long, default_value = "scout-store.json")]
    store: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask the model for competitors near a branch and print the candidates
    Discover {
        #[arg(long)]
        branch_id: BranchId,

        /// private or dorm
        #[arg(long, default_value = "dorm")]
        room_type: RoomType,

        #[arg(long, default_value_t = DEFAULT_MAX_COMPETITORS)]
        max_competitors: u32,
    },
    /// Sweep a competitor group over a date range and store the prices found
    Search {
        #[arg(long)]
        group_id: GroupId,

        /// First night (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last night, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        #[arg(long, default_value = "dorm")]
        room_type: RoomType,
    },
    /// Print the average stored competitor price for a branch and night
    Average {
        #[arg(long)]
        branch_id: BranchId,

        #[arg(long)]
        date: NaiveDate,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));
    logging::log_startup(Component::Cli, &format!("scout with store {}", args.store.display()));

    if let Err(e) = run(args).await {
        logging::log_error(Component::Cli, "Scout command", &e);
        return Err(e);
    }

    logging::log_success(Component::Cli, "Done");
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let gateway = Arc::new(InMemoryGateway::from_snapshot(load_snapshot(&args.store).await?));

    match args.command {
        Command::Discover { branch_id, room_type, max_competitors } => {
            let model = Arc::new(build_model_client()?);
            let orchestrator = DiscoveryOrchestrator::new(model, gateway.clone());
            let candidates = orchestrator.discover_competitors(branch_id, room_type, max_competitors).await?;
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        }
        Command::Search { group_id, start, end, room_type } => {
            let model = Arc::new(build_model_client()?);
            let orchestrator = PriceSearchOrchestrator::new(model, gateway.clone());
            let (runner, worker) = SweepJobRunner::spawn(orchestrator);

            let mut events = runner.subscribe();
            let job_id = runner
                .submit(SweepRequest {
                    group_id,
                    start_date: start,
                    end_date: end,
                    room_type,
                })
                .await?;

            let status = loop {
                match events.recv().await {
                    Ok(JobEvent::Finished { job_id: finished, status }) if finished == job_id => break status,
                    Ok(event) => scout_debug!(Component::Cli, "Job event: {:?}", event),
                    Err(RecvError::Lagged(skipped)) => {
                        scout_debug!(Component::Cli, "Skipped {} job events", skipped);
                    }
                    Err(RecvError::Closed) => bail!("sweep job runner stopped before job {job_id} finished"),
                }
            };

            drop(runner);
            worker.await.context("sweep job runner panicked")?;
            save_snapshot(&args.store, &gateway.snapshot().await).await?;

            match status {
                JobStatus::Completed { report } => println!("{}", serde_json::to_string_pretty(&report)?),
                JobStatus::Failed { error } => bail!("price sweep failed: {error}"),
                other => bail!("price sweep ended in unexpected state {other:?}"),
            }
        }
        Command::Average { branch_id, date } => {
            let query = CompetitorPriceQuery::new(gateway.clone());
            match query.average_price(branch_id, date).await? {
                Some(average) => println!("{average:.2}"),
                None => println!("no competitor prices for branch {branch_id} on {date}"),
            }
        }
    }

    Ok(())
}

fn build_model_client() -> anyhow::Result<RealModelClient> {
    let config = ScoutConfig::from_env().context("failed to load configuration")?;
    scout_info!(
        Component::Cli,
        "🤖 Using model {} at {} (min interval {}ms)",
        config.model,
        config.api_url,
        config.min_request_interval.as_millis()
    );
    let rate_limiter = Arc::new(RateLimiter::new(config.min_request_interval));
    Ok(RealModelClient::new(config, rate_limiter)?)
}
