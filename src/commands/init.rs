use crate::commands::Out;
use crate::home::Home;
use crate::{Config, Result};
use anyhow::Context;

/// Creates the data directory and:
/// - Writes an initial `config.json` with default settings
/// - Creates a new, empty ledger database
///
/// # Errors
/// - Returns an error if the directory is already initialized or any file operation fails.
pub async fn init(home: &Home) -> Result<Out<()>> {
    let config = Config::create(home)
        .await
        .context("Unable to create the data directory and configs")?;
    config.close().await;
    Ok(format!(
        "Initialized the budget directory at '{}'",
        home.root().display()
    )
    .into())
}
