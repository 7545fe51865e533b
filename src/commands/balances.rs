use crate::args::BalancesSetArgs;
use crate::balance::BalanceSheet;
use crate::commands::Out;
use crate::model::{Account, Snapshot, TIMESTAMP_FORMAT};
use crate::{Config, Result};
use chrono::Local;

/// Saves one balance snapshot row per account, all sharing a single timestamp, then re-reads
/// and renders what was stored.
///
/// Entries arrive as raw text. Values that do not parse as numbers are stored as empty and
/// contribute zero to the account total; the save itself never fails on bad input text.
pub async fn balances_set(config: &Config, args: &BalancesSetArgs) -> Result<Out<Vec<Snapshot>>> {
    let mut sheet = BalanceSheet::new();
    for entry in args.entries() {
        sheet.set(entry.account(), entry.sub_account(), entry.text())?;
    }

    let saved_at = Local::now().format(TIMESTAMP_FORMAT).to_string();
    config.db().save_snapshots(&sheet.snapshots(&saved_at)).await?;

    let stored = latest_snapshots(config).await?;
    let message = format!("Saved balances at {saved_at}\n{}", render_snapshots(&stored));
    Ok(Out::new(message, stored))
}

/// Shows the most recently saved snapshot for each account.
pub async fn balances_show(config: &Config) -> Result<Out<Vec<Snapshot>>> {
    let stored = latest_snapshots(config).await?;
    let message = if stored.is_empty() {
        "No balances saved yet".to_string()
    } else {
        render_snapshots(&stored)
    };
    Ok(Out::new(message, stored))
}

/// The latest snapshot per account, in presentation order, skipping accounts that have never
/// been saved.
async fn latest_snapshots(config: &Config) -> Result<Vec<Snapshot>> {
    let mut rows = Vec::new();
    for account in Account::ALL {
        if let Some(snapshot) = config.db().latest_snapshot(&account.to_string()).await? {
            rows.push(snapshot);
        }
    }
    Ok(rows)
}

fn render_snapshots(snapshots: &[Snapshot]) -> String {
    snapshots
        .iter()
        .map(Snapshot::display_line)
        .collect::<Vec<String>>()
        .join("\n")
}
