use crate::model::Amount;
use serde::Serialize;

/// The format of the `date` column in the `accounting_details` table.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Represents one row of the `accounting_details` table: a point-in-time recording of one
/// account's sub-balances and their sum.
///
/// Every save writes one row per account, all sharing the same `saved_at` timestamp. A
/// sub-balance column is NULL when the sub-account does not exist for the account or when the
/// user's input for it did not parse as a number.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Snapshot {
    /// Store-assigned identifier.
    pub id: i64,
    /// The save timestamp as a `%Y-%m-%d %H:%M:%S` string.
    #[sqlx(rename = "date")]
    pub saved_at: String,
    /// The account name, e.g. `Primary`.
    pub account_name: String,
    pub checking: Option<f64>,
    pub savings: Option<f64>,
    pub saver: Option<f64>,
    pub kiwi_saver: Option<f64>,
    /// The sum of the parseable sub-balances at the time of the save.
    pub total: f64,
}

impl Snapshot {
    /// One display line for list output.
    pub fn display_line(&self) -> String {
        format!(
            "{:<8}  {:>12}  {:>12}  {:>12}  {:>12}  {:>12}  (saved {})",
            self.account_name,
            display_balance(self.checking),
            display_balance(self.savings),
            display_balance(self.saver),
            display_balance(self.kiwi_saver),
            Amount::from_f64(self.total).to_string(),
            self.saved_at,
        )
    }
}

fn display_balance(balance: Option<f64>) -> String {
    match balance {
        Some(value) => Amount::from_f64(value).to_string(),
        None => "-".to_string(),
    }
}

/// A snapshot row that has not been written yet, so it has no store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSnapshot {
    pub saved_at: String,
    pub account_name: String,
    pub checking: Option<f64>,
    pub savings: Option<f64>,
    pub saver: Option<f64>,
    pub kiwi_saver: Option<f64>,
    pub total: f64,
}
