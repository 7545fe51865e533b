//! These structs provide the CLI interface for the budget CLI.

use crate::model::{Account, Category, MonthKey, SubAccount};
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// budget: A command-line tool for keeping a personal financial ledger.
///
/// Transactions (date, category, amount) and periodic account-balance snapshots are stored in a
/// local SQLite file under the budget home directory. Run `budget init` once to create the data
/// directory, then `budget add` to record transactions, `budget balances` to record and view
/// account balances, and `budget months` / `budget report` for per-month category totals.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and an empty ledger database.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/.budget-book; pass --home (or set BUDGET_BOOK_HOME) to put it somewhere else.
    Init,
    /// Record a transaction, then show the updated recent-transactions window.
    Add(AddArgs),
    /// Show the most recent transactions, newest first.
    Recent(RecentArgs),
    /// Record or view per-account balance snapshots.
    Balances(BalancesArgs),
    /// List the months that have at least one transaction.
    Months,
    /// Show per-category transaction totals for one month.
    Report(ReportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where budget data and configuration is held. Defaults to ~/.budget-book
    #[arg(long, env = "BUDGET_BOOK_HOME", default_value_t = default_budget_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `budget add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The transaction date, e.g. 15-Mar-24 or 2024-03-15. Defaults to today.
    #[arg(long)]
    date: Option<String>,

    /// The transaction category.
    #[arg(long)]
    category: Category,

    /// The transaction amount, e.g. 50, -12.99 or $1,250.00.
    #[arg(long, allow_hyphen_values = true)]
    amount: String,
}

impl AddArgs {
    pub fn new(date: Option<String>, category: Category, amount: impl Into<String>) -> Self {
        Self {
            date,
            category,
            amount: amount.into(),
        }
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }
}

/// Args for the `budget recent` command.
#[derive(Debug, Parser, Clone)]
pub struct RecentArgs {
    /// How many transactions to show. Defaults to the configured recent window (10).
    #[arg(long)]
    limit: Option<u32>,
}

impl RecentArgs {
    pub fn new(limit: Option<u32>) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }
}

/// Args for the `budget balances` command.
#[derive(Debug, Parser, Clone)]
pub struct BalancesArgs {
    #[command(subcommand)]
    command: BalancesSubcommand,
}

impl BalancesArgs {
    pub fn command(&self) -> &BalancesSubcommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum BalancesSubcommand {
    /// Save a snapshot of account balances. One row is written per account, all sharing one
    /// timestamp; sub-accounts you do not set are stored as empty.
    Set(BalancesSetArgs),
    /// Show the most recently saved snapshot for each account.
    Show,
}

/// Args for the `budget balances set` command.
#[derive(Debug, Parser, Clone)]
pub struct BalancesSetArgs {
    /// A sub-balance entry as ACCOUNT:SUB=VALUE, e.g. --entry primary:checking=1,250.00.
    /// Repeat for each sub-balance. Accounts: primary, partner, joint. Sub-accounts:
    /// checking, savings, saver, kiwi-saver.
    #[arg(long = "entry", value_name = "ACCOUNT:SUB=VALUE", required = true)]
    entries: Vec<BalanceEntryArg>,
}

impl BalancesSetArgs {
    pub fn new(entries: Vec<BalanceEntryArg>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[BalanceEntryArg] {
        &self.entries
    }
}

/// One parsed `ACCOUNT:SUB=VALUE` balance entry. The value is kept as raw text; whether it is
/// numeric is decided by the balance sheet, not the argument parser.
#[derive(Debug, Clone)]
pub struct BalanceEntryArg {
    account: Account,
    sub_account: SubAccount,
    text: String,
}

impl BalanceEntryArg {
    pub fn account(&self) -> Account {
        self.account
    }

    pub fn sub_account(&self) -> SubAccount {
        self.sub_account
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl FromStr for BalanceEntryArg {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, text) = s
            .split_once('=')
            .with_context(|| format!("Expected ACCOUNT:SUB=VALUE, got '{s}'"))?;
        let (account_str, sub_str) = target
            .split_once(':')
            .with_context(|| format!("Expected ACCOUNT:SUB=VALUE, got '{s}'"))?;

        let account = <Account as clap::ValueEnum>::from_str(account_str.trim(), true)
            .map_err(|_| anyhow!("Unknown account '{account_str}'"))?;
        let sub_account = <SubAccount as clap::ValueEnum>::from_str(sub_str.trim(), true)
            .map_err(|_| anyhow!("Unknown sub-account '{sub_str}'"))?;

        Ok(Self {
            account,
            sub_account,
            text: text.to_string(),
        })
    }
}

/// Args for the `budget report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// The month to report on, e.g. Mar-2024. See `budget months` for the months with data.
    #[arg(long)]
    month: MonthKey,
}

impl ReportArgs {
    pub fn new(month: MonthKey) -> Self {
        Self { month }
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }
}

fn default_budget_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join(".budget-book"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or BUDGET_BOOK_HOME instead of relying on the default \
                budget home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from(".budget-book")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
