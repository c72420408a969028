pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::expense::Category;
use crate::providers::GeminiProvider;
use crate::store::{DiskStorage, ExpenseStore};
use anyhow::Result;
use tracing::{debug, info};

/// Commands that operate on the configured expense store.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Add {
        amount: String,
        category: Category,
        description: Option<String>,
    },
    List,
    Delete {
        id: String,
    },
    Clear {
        yes: bool,
    },
    Dashboard,
    Insight,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("SpendWise starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let data_dir = config.data_dir()?;
    let mut store = ExpenseStore::load(DiskStorage::open(&data_dir)?);

    match command {
        AppCommand::Add {
            amount,
            category,
            description,
        } => {
            cli::expenses::add(&mut store, &amount, category, description, &config)?;
        }
        AppCommand::List => cli::expenses::list(&store, &config)?,
        AppCommand::Delete { id } => cli::expenses::delete(&mut store, &id)?,
        AppCommand::Clear { yes } => cli::expenses::clear(&mut store, yes)?,
        AppCommand::Dashboard => cli::dashboard::run(store.expenses(), &config)?,
        AppCommand::Insight => {
            let provider = GeminiProvider::new(&config.providers.gemini);
            cli::insight::run(&provider, store.expenses(), &config).await?;
        }
    }

    Ok(())
}
