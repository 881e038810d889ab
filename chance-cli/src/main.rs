mod commands;
mod config;

use chance_core::{LotteryConfig, LotteryMode, LotteryStore, SqliteStorage};
use chance_lottery::LotteryError;
use clap::{Parser, Subcommand};
use config::CliConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chance")]
#[command(about = "Chance - fun lotteries for chores, options and secret pairings")]
#[command(version)]
struct Cli {
    /// Data directory for lottery storage
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip animation and reveal delays
    #[arg(long, global = true)]
    instant: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new lottery (prompts when no participants are given)
    Create {
        /// Participant name, repeat for each participant
        #[arg(short, long = "participant")]
        participants: Vec<String>,
        /// Task or option, repeat for each one
        #[arg(short, long = "task")]
        tasks: Vec<String>,
        /// Lottery mode (single, multi, matching)
        #[arg(short, long, default_value = "single")]
        mode: String,
    },
    /// Spin the wheel or reveal the assignments of a lottery
    Run {
        /// Lottery ID
        id: String,
        /// Discard the stored result and roll again
        #[arg(short, long)]
        again: bool,
    },
    /// Show a lottery and its stored result
    Show {
        /// Lottery ID
        id: String,
    },
    /// List stored lotteries
    List,
    /// Delete a lottery
    Delete {
        /// Lottery ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "chance_cli={},chance_lottery={},chance_core={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Get data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chance")
    });

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir).await?;

    let mut config = CliConfig::load(data_dir)?;
    if cli.instant {
        let spin = config.lottery.spin.clone();
        config.lottery = LotteryConfig::instant();
        config.lottery.spin.min_spins = spin.min_spins;
        config.lottery.spin.max_spins = spin.max_spins;
        config.lottery.spin.frame_interval = spin.frame_interval;
    }

    let storage = SqliteStorage::new(&config.db_path()).await?;
    let store = LotteryStore::new(Arc::new(storage));

    // Execute command
    let result = match cli.command {
        Commands::Create {
            participants,
            tasks,
            mode,
        } => match mode.parse::<LotteryMode>() {
            Ok(mode) => commands::create_lottery(&store, participants, tasks, mode).await,
            Err(e) => Err(e.into()),
        },
        Commands::Run { id, again } => {
            commands::run_lottery(&store, &config.lottery, &id, again).await
        }
        Commands::Show { id } => commands::show_lottery(&store, &id).await,
        Commands::List => commands::list_lotteries(&store).await,
        Commands::Delete { id, yes } => commands::delete_lottery(&store, &id, yes).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<LotteryError>() {
            Some(LotteryError::NotFound(id)) => {
                eprintln!("Error: Lottery '{}' not found", id);
                eprintln!("Create a new one with: chance create");
            }
            Some(
                LotteryError::EmptyParticipantName { .. }
                | LotteryError::EmptyTaskDescription { .. }
                | LotteryError::NotEnoughParticipants { .. }
                | LotteryError::TaskCountMismatch { .. }
                | LotteryError::DerangementInfeasible,
            ) => {
                eprintln!("Error: {}", e);
                eprintln!("Nothing was saved.");
            }
            _ => {
                eprintln!("Error: {:#}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
