use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

#[derive(Parser)]
#[command(name = "onebigthing", version, about = "One Big Thing CLI")]
struct Cli {
    /// Evaluate as if the current time were this RFC 3339 timestamp
    #[arg(long, global = true, value_name = "TIMESTAMP")]
    at: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Today's task
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Weekly completion and current streak
    Streak,
    /// Task history, filtered by subscription tier
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Subscription status and upgrades
    Subscription {
        #[command(subcommand)]
        action: commands::subscription::SubscriptionAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Erase the current task, history and streak counter
    Reset {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },
}

fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = onebigthing_core::Config::load_or_default();
    init_logging(&config.log_level);
    tracing::debug!(at = ?cli.at, "starting onebigthing");

    let result = context::now(cli.at.as_deref()).and_then(|now| match cli.command {
        Commands::Task { action } => commands::task::run(action, &config, now),
        Commands::Streak => commands::streak::run(&config, now),
        Commands::History { action } => commands::history::run(action, &config, now),
        Commands::Subscription { action } => commands::subscription::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Reset { yes } => commands::reset::run(yes, &config),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
