use crate::args::AddArgs;
use crate::commands::{render_transactions, Out};
use crate::model::month::DATE_FORMAT;
use crate::model::{Amount, Transaction};
use crate::{Config, Result};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use std::str::FromStr;

/// Records one transaction, then re-reads and renders the recent-transactions window so the
/// caller sees the ledger as it now stands.
///
/// The amount is validated here, before any SQL runs; the store only ever receives a numeric
/// value.
pub async fn add(config: &Config, args: &AddArgs) -> Result<Out<Vec<Transaction>>> {
    let date = resolve_date(args.date())?;
    let amount = Amount::from_str(args.amount())?;
    let category = args.category().to_string();

    let id = config
        .db()
        .insert_transaction(&date, &category, amount.to_f64())
        .await?;

    let recent = config
        .db()
        .recent_transactions(config.recent_limit())
        .await?;
    let message = format!(
        "Recorded transaction {id}: {date} {category} {amount}\n{}",
        render_transactions(&recent)
    );
    Ok(Out::new(message, recent))
}

/// Turns the optional user-supplied date into the stored `%d-%b-%y` form. With no input the
/// date is today, matching the original entry form's default.
fn resolve_date(input: Option<&str>) -> Result<String> {
    let date = match input {
        None => Local::now().date_naive(),
        Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
            .with_context(|| {
                format!("Invalid date '{text}', expected e.g. 15-Mar-24 or 2024-03-15")
            })?,
    };
    Ok(date.format(DATE_FORMAT).to_string())
}
