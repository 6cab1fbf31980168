use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use spycompare::core::log::init_logging;
use spycompare::core::series::LookbackWindow;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for spycompare::AppCommand {
    fn from(cmd: Commands) -> spycompare::AppCommand {
        match cmd {
            Commands::Compare { symbols, range } => {
                spycompare::AppCommand::Compare { symbols, range }
            }
            Commands::Search { query } => spycompare::AppCommand::Search { query },
            Commands::Interactive { range } => spycompare::AppCommand::Interactive { range },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Compare symbols against the benchmark
    Compare {
        /// Symbols to compare; none shows the benchmark alone
        symbols: Vec<String>,

        /// Lookback window: 1Y, 3Y, 5Y or ALL
        #[arg(short, long)]
        range: Option<LookbackWindow>,
    },
    /// Search for ticker symbols
    Search {
        /// Company name or partial symbol
        query: String,
    },
    /// Pick symbols one after another from the prompt
    Interactive {
        /// Initial lookback window: 1Y, 3Y, 5Y or ALL
        #[arg(short, long)]
        range: Option<LookbackWindow>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => spycompare::cli::setup::setup(),
        Some(cmd) => spycompare::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
