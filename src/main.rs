use budget_book::args::{Args, BalancesSubcommand, Command};
use budget_book::{commands, Config, Home, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = Home::new(args.common().home().path()).await?;

    // `init` runs before a config or database exists; everything else loads the config, which
    // owns the database handle for the duration of the command.
    if let Command::Init = args.command() {
        commands::init(&home).await?.print();
        return Ok(());
    }

    let config = Config::load(&home).await?;
    let result = dispatch(&config, args.command()).await;
    // Release the database handle on both the success and failure paths.
    config.close().await;
    result
}

async fn dispatch(config: &Config, command: &Command) -> Result<()> {
    let _: () = match command {
        // Handled in main_inner, before the store is opened.
        Command::Init => (),

        Command::Add(add_args) => commands::add(config, add_args).await?.print(),

        Command::Recent(recent_args) => commands::recent(config, recent_args).await?.print(),

        Command::Balances(balances_args) => match balances_args.command() {
            BalancesSubcommand::Set(set_args) => {
                commands::balances_set(config, set_args).await?.print()
            }
            BalancesSubcommand::Show => commands::balances_show(config).await?.print(),
        },

        Command::Months => commands::months(config).await?.print(),

        Command::Report(report_args) => commands::report(config, report_args).await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
