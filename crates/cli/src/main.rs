//! `expense-tracker`: record income and expenses, move money between cash
//! and the bank, and print filtered summaries.

mod render;

use std::path::PathBuf;
use std::sync::Once;

use anyhow::Context;
use chrono::{Datelike, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::debug;

use expense_tracker_core::config::TrackerConfig;
use expense_tracker_core::models::amount::parse_amount;
use expense_tracker_core::models::category::{Category, CategoryFilter};
use expense_tracker_core::models::ledger::TransferDirection;
use expense_tracker_core::models::transaction::{TransactionId, TransactionType};
use expense_tracker_core::storage::file_store::FileStore;
use expense_tracker_core::storage::manager::KeyValueLedgerStore;
use expense_tracker_core::ExpenseTracker;

type Tracker = ExpenseTracker<KeyValueLedgerStore<FileStore>>;

#[derive(Parser, Debug)]
#[command(name = "expense-tracker")]
#[command(version)]
#[command(about = "Track income, expenses, cash on hand and bank savings", long_about = None)]
struct Cli {
    /// Configuration file path (missing file = defaults)
    #[arg(short, long, global = true, default_value = "expense-tracker.yaml")]
    config: PathBuf,

    /// Data file, overriding `storage.path` from the configuration
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Password for an encrypted store
    #[arg(long, global = true, env = "EXPENSE_TRACKER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record an income or an expense
    Add {
        kind: Kind,
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
        category: Category,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a transaction by id and reverse its effect on cash
    Delete { id: TransactionId },
    /// Move money between cash on hand and the bank
    Transfer {
        direction: Direction,
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
    },
    /// Show cash, bank and total
    Balance,
    /// List transactions for a month
    List(PeriodArgs),
    /// Group a month's transactions by category
    Categories(PeriodArgs),
    /// Show how a month's expenses split across categories
    Chart(PeriodArgs),
    /// Years that have transactions
    Years,
    /// Search descriptions and categories
    Search { query: String },
}

#[derive(Args, Debug)]
struct PeriodArgs {
    /// Month 1-12 (default: current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Year (default: current year)
    #[arg(long)]
    year: Option<i32>,

    /// Category name or "All"
    #[arg(long, default_value = "All")]
    category: CategoryFilter,
}

impl PeriodArgs {
    fn resolve(&self) -> (u32, i32, CategoryFilter) {
        let today = Utc::now().date_naive();
        (
            self.month.unwrap_or(today.month()),
            self.year.unwrap_or(today.year()),
            self.category,
        )
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Income,
    Expense,
}

impl From<Kind> for TransactionType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Income => TransactionType::Income,
            Kind::Expense => TransactionType::Expense,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Direction {
    ToBank,
    ToCash,
}

impl From<Direction> for TransferDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::ToBank => TransferDirection::ToBank,
            Direction::ToCash => TransferDirection::ToCash,
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

fn open_tracker(cli: &Cli, config: &TrackerConfig) -> anyhow::Result<Tracker> {
    let mut storage = config.storage.clone();
    if let Some(data) = &cli.data {
        storage.path = data.clone();
    }
    let store = storage
        .open_store(cli.password.as_deref())
        .with_context(|| format!("opening {}", storage.path.display()))?;
    Ok(ExpenseTracker::initialize(KeyValueLedgerStore::new(store))?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = TrackerConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_tracing(&config.logging.filter);
    debug!(?config, "starting");

    let mut tracker = open_tracker(&cli, &config)?;

    match cli.command {
        Command::Add {
            kind,
            amount,
            category,
            description,
        } => {
            let transaction =
                tracker.add_transaction(kind.into(), amount, category, description)?;
            render::added(&transaction);
        }
        Command::Delete { id } => match tracker.delete_transaction(&id)? {
            Some(removed) => render::deleted(&removed),
            None => println!("No transaction with id {id}"),
        },
        Command::Transfer { direction, amount } => {
            tracker.transfer_funds(amount, direction.into())?;
            render::balance(tracker.state());
        }
        Command::Balance => render::balance(tracker.state()),
        Command::List(period) => {
            let (month, year, filter) = period.resolve();
            render::heading(month, year, filter);
            render::transaction_rows(&tracker.filtered(month, year, filter));
            render::totals(&tracker.period_summary(month, year, filter));
        }
        Command::Categories(period) => {
            let (month, year, filter) = period.resolve();
            render::heading(month, year, filter);
            render::category_groups(&tracker.category_breakdown(month, year, filter));
        }
        Command::Chart(period) => {
            let (month, year, filter) = period.resolve();
            render::heading(month, year, filter);
            render::distribution(&tracker.expense_distribution(month, year, filter));
        }
        Command::Years => {
            for year in tracker.available_years(Utc::now().year()) {
                println!("{year}");
            }
        }
        Command::Search { query } => {
            render::transaction_rows(&tracker.search_transactions(&query));
        }
    }

    Ok(())
}
