use std::error::Error;

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::Engine;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "pledgewise_admin")]
#[command(about = "Admin utilities for PledgeWise (migrations, ledger checks)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./pledgewise.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run schema migrations and exit.
    Migrate(Migrate),
    Ledger(Ledger),
    Campaign(Campaign),
}

#[derive(Args, Debug)]
struct Migrate {
    #[arg(value_enum, default_value_t = MigrateAction::Up)]
    action: MigrateAction,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MigrateAction {
    /// Apply pending migrations.
    Up,
    /// Roll back the last applied migration.
    Down,
    /// Drop every table and reapply all migrations.
    Fresh,
    /// Print applied and pending migrations.
    Status,
}

#[derive(Args, Debug)]
struct Ledger {
    #[command(subcommand)]
    command: LedgerCommand,
}

#[derive(Subcommand, Debug)]
enum LedgerCommand {
    /// Report campaigns whose total differs from the sum of their
    /// contributions. Exits with status 1 when any is found.
    Audit,
    /// Rewrite drifted campaign totals from their contributions.
    Recompute,
}

#[derive(Args, Debug)]
struct Campaign {
    #[command(subcommand)]
    command: CampaignCommand,
}

#[derive(Subcommand, Debug)]
enum CampaignCommand {
    List,
}

/// Brings the schema up to date before handing the connection to the engine.
async fn engine(db: DatabaseConnection) -> Result<Engine, Box<dyn Error + Send + Sync>> {
    migration::Migrator::up(&db, None).await?;
    Ok(Engine::builder().database(db).build())
}

async fn migrate(
    db: &DatabaseConnection,
    action: MigrateAction,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match action {
        MigrateAction::Up => migration::Migrator::up(db, None).await?,
        MigrateAction::Down => migration::Migrator::down(db, Some(1)).await?,
        MigrateAction::Fresh => migration::Migrator::fresh(db).await?,
        MigrateAction::Status => migration::Migrator::status(db).await?,
    }
    println!("migrate {action:?}: done");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = Database::connect(&cli.database_url).await?;

    match cli.command {
        Command::Migrate(Migrate { action }) => migrate(&db, action).await?,
        Command::Ledger(Ledger {
            command: LedgerCommand::Audit,
        }) => {
            let drifts = engine(db).await?.audit_ledger().await?;
            if drifts.is_empty() {
                println!("ledger consistent");
                return Ok(());
            }
            for drift in &drifts {
                println!(
                    "{}\t{}\trecorded {}\texpected {}",
                    drift.code, drift.campaign_id, drift.recorded, drift.expected
                );
            }
            eprintln!("{} campaign(s) out of balance", drifts.len());
            std::process::exit(1);
        }
        Command::Ledger(Ledger {
            command: LedgerCommand::Recompute,
        }) => {
            let corrected = engine(db).await?.recompute_campaign_totals().await?;
            println!("recomputed {corrected} campaign total(s)");
        }
        Command::Campaign(Campaign {
            command: CampaignCommand::List,
        }) => {
            for campaign in engine(db).await?.list_campaigns().await? {
                println!(
                    "{}\t{}\t{} / {}\t{}%\t{}",
                    campaign.code,
                    campaign.id,
                    campaign.current_amount,
                    campaign.target_amount,
                    campaign.progress_percent(),
                    campaign.title
                );
            }
        }
    }

    Ok(())
}
