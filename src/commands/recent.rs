use crate::args::RecentArgs;
use crate::commands::{render_transactions, Out};
use crate::model::Transaction;
use crate::{Config, Result};

/// Shows the most recent transactions, newest first, bounded by `--limit` or the configured
/// recent window.
pub async fn recent(config: &Config, args: &RecentArgs) -> Result<Out<Vec<Transaction>>> {
    let limit = args.limit().unwrap_or_else(|| config.recent_limit());
    let transactions = config.db().recent_transactions(limit).await?;

    let message = if transactions.is_empty() {
        "No transactions recorded yet".to_string()
    } else {
        render_transactions(&transactions)
    };
    Ok(Out::new(message, transactions))
}
