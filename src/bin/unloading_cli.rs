use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;
use unloading_api::{
    common::{parse_locale_decimal, validate_volume},
    config::{self, AppConfig},
    db::{self, DbPool},
    events::{Event, EventSender},
    reconciliation::discrepancy,
    services::unloading::UnloadingService,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Discrepancy(args) => handle_discrepancy(args, cli.json)?,
        Commands::Migrate => {
            let context = CliContext::initialize().await?;
            db::run_migrations(&context.db)
                .await
                .context("failed to run migrations")?;
            println!("Migrations applied");
        }
        Commands::Show { id } => {
            let context = CliContext::initialize().await?;
            let text = context
                .unloading_service()
                .summary(id)
                .await
                .with_context(|| format!("failed to load unloading {}", id))?;
            if cli.json {
                print_json(&SummaryOutput { id, text })?;
            } else {
                println!("{}", text);
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "unloading-cli",
    about = "Fuel unloading reconciliation tools",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Computes (after - before) - discharged + refuel for one set of readings
    Discrepancy(DiscrepancyArgs),
    /// Applies pending database migrations
    Migrate,
    /// Prints the operator summary of a stored unloading
    Show { id: Uuid },
}

#[derive(clap::Args)]
struct DiscrepancyArgs {
    /// Stock before the discharge (accepts "50.000,00")
    #[arg(long, value_parser = parse_decimal_arg)]
    before: Decimal,
    /// Stock after the discharge
    #[arg(long, value_parser = parse_decimal_arg)]
    after: Decimal,
    /// Volume discharged into the tank
    #[arg(long, value_parser = parse_decimal_arg)]
    discharged: Decimal,
    /// Fuel dispensed from the tank during the discharge
    #[arg(long, value_parser = parse_decimal_arg)]
    refuel: Option<Decimal>,
}

#[derive(Serialize)]
struct DiscrepancyOutput {
    discrepancy: Option<Decimal>,
}

#[derive(Serialize)]
struct SummaryOutput {
    id: Uuid,
    text: String,
}

fn parse_decimal_arg(raw: &str) -> Result<Decimal, String> {
    let value = parse_locale_decimal(raw)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "a number is required".to_string())?;
    validate_volume(&value).map_err(|e| {
        e.message
            .map(|message| message.to_string())
            .unwrap_or_else(|| e.code.to_string())
    })?;
    Ok(value)
}

fn handle_discrepancy(args: DiscrepancyArgs, json: bool) -> Result<()> {
    let result = discrepancy(
        Some(args.before),
        Some(args.after),
        args.discharged,
        args.refuel,
    );

    if json {
        return print_json(&DiscrepancyOutput {
            discrepancy: result,
        });
    }

    match result {
        Some(value) => println!("{}", value.normalize()),
        None => return Err(anyhow!("discrepancy could not be computed")),
    }
    Ok(())
}

struct CliContext {
    _config: AppConfig,
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(&config.log_level, config.log_json);

        let db_pool = db::establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to database")?;
        let db = Arc::new(db_pool);

        let (event_tx, mut event_rx) = mpsc::channel::<Event>(32);
        let event_sender = Arc::new(EventSender::new(event_tx));

        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                debug!(target: "unloading_cli", event = ?event, "received async event");
            }
        });

        Ok(Self {
            _config: config,
            db,
            event_sender,
        })
    }

    fn unloading_service(&self) -> UnloadingService {
        UnloadingService::new(self.db.clone(), self.event_sender.clone())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
