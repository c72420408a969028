use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use spendwise::core::expense::Category;
use spendwise::core::log::init_logging;

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

impl From<Commands> for spendwise::AppCommand {
    fn from(cmd: Commands) -> spendwise::AppCommand {
        match cmd {
            Commands::Add {
                amount,
                category,
                description,
            } => spendwise::AppCommand::Add {
                amount,
                category,
                description,
            },
            Commands::List => spendwise::AppCommand::List,
            Commands::Delete { id } => spendwise::AppCommand::Delete { id },
            Commands::Clear { yes } => spendwise::AppCommand::Clear { yes },
            Commands::Dashboard => spendwise::AppCommand::Dashboard,
            Commands::Insight => spendwise::AppCommand::Insight,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Log a new expense
    Add {
        /// Amount spent
        amount: String,
        /// Category: food, transport, shopping, utilities, entertainment, health, other
        #[arg(short = 'k', long, default_value = "food", value_parser = parse_category)]
        category: Category,
        /// Optional description, defaults to the category name
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List recorded expenses, newest first
    List,
    /// Delete an expense by id (or unambiguous id prefix)
    Delete { id: String },
    /// Delete all expenses
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Display today's spending, budget status and category breakdown
    Dashboard,
    /// Ask the AI assistant to analyze your spending
    Insight,
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse::<Category>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => spendwise::cli::setup::setup(),
        Some(cmd) => spendwise::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
