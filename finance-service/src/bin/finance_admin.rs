//! Maintenance commands against the finance PostgreSQL database.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use finance_service::analytics::find_drift;
use finance_service::config::DatabaseConfig;
use finance_service::services::{Database, FinanceStore};

#[derive(Debug, Parser)]
#[command(name = "finance-admin", version, about = "Finance service maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Check connectivity and print row counts per table.
    Check,
    /// Compare stored account balances with their transaction history.
    Reconcile {
        /// Overwrite drifted balances with the recomputed value.
        #[arg(long)]
        fix: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = DatabaseConfig::from_env().context("loading database configuration")?;
    let db = Database::new(config.url(), config.max_connections, config.min_connections)
        .await
        .context("connecting to PostgreSQL")?;

    match cli.command {
        Command::Migrate => {
            db.run_migrations().await.context("running migrations")?;
            println!("Migrations applied");
        }
        Command::Check => {
            db.health_check().await.context("database health check")?;
            println!("Database reachable");
            for (table, count) in db.table_counts().await? {
                println!("{table:<18} {count}");
            }
        }
        Command::Reconcile { fix } => {
            let accounts = db.list_all_accounts().await?;
            let transactions = db.list_account_transactions().await?;
            let drifts = find_drift(&accounts, &transactions).context("recomputing balances")?;

            if drifts.is_empty() {
                println!("All {} account balances match", accounts.len());
                return Ok(());
            }

            for drift in &drifts {
                println!(
                    "{} ({}): stored {} expected {} difference {}",
                    drift.name, drift.account_id, drift.stored, drift.expected, drift.difference
                );
            }

            if fix {
                for drift in &drifts {
                    db.set_account_balance(drift.account_id, drift.expected)
                        .await
                        .with_context(|| format!("fixing account {}", drift.account_id))?;
                }
                println!("Fixed {} account balance(s)", drifts.len());
            } else {
                println!(
                    "{} account balance(s) drifted; rerun with --fix to correct them",
                    drifts.len()
                );
            }
        }
    }

    Ok(())
}
