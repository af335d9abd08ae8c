use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use fxlog::core::log::init_logging;

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

impl From<Commands> for fxlog::AppCommand {
    fn from(cmd: Commands) -> fxlog::AppCommand {
        match cmd {
            Commands::Dashboard {
                currency,
                from_date,
                to_date,
                page,
                page_size,
            } => fxlog::AppCommand::Dashboard {
                currency,
                from_date,
                to_date,
                page,
                page_size,
            },
            Commands::Add {
                name,
                amount,
                from,
                to,
            } => fxlog::AppCommand::Add {
                name,
                amount,
                from,
                to,
            },
            Commands::Currencies { base, search } => {
                fxlog::AppCommand::Currencies { base, search }
            }
            Commands::Signup {
                user_name,
                email,
                password,
            } => fxlog::AppCommand::Signup {
                user_name,
                email,
                password,
            },
            Commands::Login { email, password } => fxlog::AppCommand::Login { email, password },
            Commands::Logout => fxlog::AppCommand::Logout,
            Commands::Clear { yes } => fxlog::AppCommand::Clear { yes },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show tables, totals and charts for logged conversions
    Dashboard {
        /// Show only pairs converting from this currency
        #[arg(long)]
        currency: Option<String>,
        /// Start of the date range (YYYY-MM-DD)
        #[arg(long)]
        from_date: Option<NaiveDate>,
        /// End of the date range (YYYY-MM-DD)
        #[arg(long)]
        to_date: Option<NaiveDate>,
        /// Page number to display (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page; defaults to the configured page size
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Log a new conversion entry
    Add {
        /// Submitter name
        #[arg(long)]
        name: Option<String>,
        /// Amount in the source currency
        #[arg(long)]
        amount: Option<String>,
        /// Source currency code; defaults to the configured one
        #[arg(long)]
        from: Option<String>,
        /// Target currency code; defaults to the configured one
        #[arg(long)]
        to: Option<String>,
    },
    /// List currency codes and rates for a base currency
    Currencies {
        /// Base currency code; defaults to the configured source currency
        #[arg(long)]
        base: Option<String>,
        /// Keep only codes containing this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Create an account on the identity service
    Signup {
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in and save a local session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Remove the local session
    Logout,
    /// Delete every logged record permanently
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxlog::cli::setup::setup(),
        Some(cmd) => fxlog::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
