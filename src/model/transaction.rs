use crate::model::Amount;
use serde::Serialize;

/// Represents one row of the `transactions` table: a single recorded income or expense event.
///
/// Rows are append-only. The `id` is assigned by the store and is the only field with a total
/// ordering; the `date` is a `%d-%b-%y` display string and is never used for sorting.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Transaction {
    /// Store-assigned, monotonically increasing identifier.
    pub id: i64,
    /// The transaction date as a `%d-%b-%y` display string, e.g. `15-Mar-24`.
    pub date: String,
    /// The category label, e.g. `Food`. Stored as text.
    pub category: String,
    /// The monetary amount as stored in the REAL column.
    pub amount: f64,
}

impl Transaction {
    /// One display line for list output, e.g. `   3  15-Mar-24    Food         $50.00`.
    pub fn display_line(&self) -> String {
        format!(
            "{:>4}  {:<10}  {:<12} {:>12}",
            self.id,
            self.date,
            self.category,
            Amount::from_f64(self.amount).to_string()
        )
    }
}
