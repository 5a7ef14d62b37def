//! Storage Hub CLI - migrations and warehouse operations.
//!
//! # Usage
//!
//! ```bash
//! # Create the document table
//! storage-hub migrate
//!
//! # Register a customer and store a job with two boxes in zone A
//! storage-hub customer create -n "Siam Print" -c "02-555-0101"
//! storage-hub job create -n "Summer packaging" -p L -c CUST-AB12C -z A \
//!     --box "number=BX-1001,price=150,size=20x20x20" --box "price=80"
//!
//! # Send it to line 3, then bring it back to zone C
//! storage-hub job pull <JOB_ID> --line 3
//! storage-hub job return <JOB_ID> --zone C
//! ```
//!
//! Results are printed to stdout as JSON. Logs go to stderr; set `RUST_LOG`
//! to change the level and `HUB_LOG_JSON=1` for JSON logs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use storage_hub::{HubConfig, Warehouse};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{BoxArg, customer, job, migrate, storage_box, view};

#[derive(Parser)]
#[command(name = "storage-hub")]
#[command(author, version, about = "Storage Hub warehouse tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    #[command(flatten)]
    Warehouse(WarehouseCommand),
}

/// Commands that read or change the system document.
#[derive(Subcommand)]
enum WarehouseCommand {
    /// Print the whole system document
    Show,
    /// Manage customers
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Manage jobs
    Job {
        #[command(subcommand)]
        action: JobAction,
    },
    /// Manage individual boxes
    Box {
        #[command(subcommand)]
        action: BoxAction,
    },
    /// Search stored jobs available for pulling
    Search {
        /// Matches job number, name, product size or customer name
        #[arg(default_value = "")]
        term: String,

        /// Only jobs in this zone
        #[arg(short, long)]
        zone: Option<String>,

        /// Include pulled jobs (everything that can still be edited)
        #[arg(long)]
        all: bool,
    },
    /// List jobs currently on a production line
    Active,
    /// Per-zone job, box and value totals
    Zones,
    /// List boxes in the recycle bin
    Trash {
        /// Matches box number, job number or box size
        #[arg(default_value = "")]
        term: String,
    },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Register a new customer
    Create {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Contact details
        #[arg(short, long)]
        contact: Option<String>,
    },
    /// List all customers
    List,
    /// Delete a customer record (jobs are kept)
    Delete {
        /// Customer ID (`CUST-XXXXX`)
        id: String,
    },
}

#[derive(clap::Args)]
struct JobFields {
    /// Job name
    #[arg(short, long)]
    name: String,

    /// Product size
    #[arg(short, long)]
    product_size: String,

    /// Owning customer ID
    #[arg(short, long)]
    customer: String,

    /// Storage zone
    #[arg(short, long)]
    zone: String,

    /// Box as `key=value` pairs: id, number, color, size, price, contents.
    /// Repeat for each box.
    #[arg(long = "box", required = true, value_parser = commands::parse_box)]
    boxes: Vec<BoxArg>,
}

#[derive(Subcommand)]
enum JobAction {
    /// Register a new job in storage
    Create(JobFields),
    /// Replace a job's fields and boxes (pass `id=` to keep a box)
    Edit {
        /// Job ID
        id: String,

        #[command(flatten)]
        fields: JobFields,
    },
    /// Send a stored job to a production line
    Pull {
        /// Job ID
        id: String,

        /// Production line (1-6)
        #[arg(short, long)]
        line: u8,
    },
    /// Return a pulled job to storage
    Return {
        /// Job ID
        id: String,

        /// Zone to store the job in
        #[arg(short, long)]
        zone: String,
    },
    /// Move a job to the recycle bin
    Delete {
        /// Job ID
        id: String,
    },
    /// Permanently remove a deleted job and all its boxes
    Purge {
        /// Job ID
        id: String,
    },
}

#[derive(Subcommand)]
enum BoxAction {
    /// Flag a box with a problem
    Flag {
        job: String,
        #[arg(value_name = "BOX")]
        box_id: String,
        /// Problem description
        #[arg(short, long)]
        note: String,
    },
    /// Clear a box's problem flag
    Clear {
        job: String,
        #[arg(value_name = "BOX")]
        box_id: String,
    },
    /// Flag a clear box or clear a flagged one
    Toggle {
        job: String,
        #[arg(value_name = "BOX")]
        box_id: String,
        /// Problem description, required when flagging
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Permanently remove a box of a deleted job
    Purge {
        job: String,
        #[arg(value_name = "BOX")]
        box_id: String,
    },
}

/// Install the tracing subscriber on stderr.
fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storage_hub=info,storage_hub_cli=info".into());

    let json = std::env::var("HUB_LOG_JSON").is_ok_and(|v| !v.is_empty() && v != "0");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env before reading HUB_LOG_JSON
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn connect() -> Result<Warehouse, Box<dyn std::error::Error>> {
    let config = HubConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");
    Ok(Warehouse::from_config(&config).await?)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => migrate::run().await?,
        Commands::Warehouse(command) => execute(&connect().await?, command).await?,
    }
    Ok(())
}

async fn execute(
    warehouse: &Warehouse,
    command: WarehouseCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        WarehouseCommand::Show => view::show(warehouse).await?,
        WarehouseCommand::Customer { action } => match action {
            CustomerAction::Create { name, contact } => {
                customer::create(warehouse, name, contact).await?;
            }
            CustomerAction::List => customer::list(warehouse).await?,
            CustomerAction::Delete { id } => customer::delete(warehouse, &id).await?,
        },
        WarehouseCommand::Job { action } => match action {
            JobAction::Create(fields) => job::create(warehouse, fields.into_draft()).await?,
            JobAction::Edit { id, fields } => {
                job::edit(warehouse, &id, fields.into_draft()).await?;
            }
            JobAction::Pull { id, line } => job::pull(warehouse, &id, line).await?,
            JobAction::Return { id, zone } => job::return_to_zone(warehouse, &id, &zone).await?,
            JobAction::Delete { id } => job::soft_delete(warehouse, &id).await?,
            JobAction::Purge { id } => job::purge(warehouse, &id).await?,
        },
        WarehouseCommand::Box { action } => match action {
            BoxAction::Flag { job, box_id, note } => {
                storage_box::flag(warehouse, &job, &box_id, &note).await?;
            }
            BoxAction::Clear { job, box_id } => {
                storage_box::clear(warehouse, &job, &box_id).await?;
            }
            BoxAction::Toggle { job, box_id, note } => {
                storage_box::toggle(warehouse, &job, &box_id, note.as_deref()).await?;
            }
            BoxAction::Purge { job, box_id } => {
                storage_box::purge(warehouse, &job, &box_id).await?;
            }
        },
        WarehouseCommand::Search { term, zone, all } => {
            view::search(warehouse, &term, zone.as_deref(), all).await?;
        }
        WarehouseCommand::Active => view::active(warehouse).await?,
        WarehouseCommand::Zones => view::zones(warehouse).await?,
        WarehouseCommand::Trash { term } => view::trash(warehouse, &term).await?,
    }
    Ok(())
}

impl JobFields {
    fn into_draft(self) -> storage_hub_core::JobDraft {
        storage_hub_core::JobDraft {
            job_name: self.name,
            product_size: self.product_size,
            customer_id: self.customer.into(),
            zone: self.zone.as_str().into(),
            boxes: self.boxes.into_iter().map(BoxArg::into_draft).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_job_create() {
        let cli = Cli::try_parse_from([
            "storage-hub",
            "job",
            "create",
            "-n",
            "Summer packaging",
            "-p",
            "L",
            "-c",
            "CUST-AB12C",
            "-z",
            "A",
            "--box",
            "number=BX-1001,price=150",
            "--box",
            "price=80",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Commands::Warehouse(WarehouseCommand::Job {
                action: JobAction::Create(fields),
            }) => {
                let draft = fields.into_draft();
                assert_eq!(draft.boxes.len(), 2);
                assert_eq!(draft.zone.as_str(), "A");
            }
            _ => panic!("expected job create"),
        }
    }

    #[test]
    fn test_job_create_requires_a_box() {
        let result = Cli::try_parse_from([
            "storage-hub", "job", "create", "-n", "x", "-p", "S", "-c", "CUST-1", "-z", "A",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_migrate() {
        let cli =
            Cli::try_parse_from(["storage-hub", "migrate"]).unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(cli.command, Commands::Migrate));
    }
}
