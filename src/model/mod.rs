//! Types that represent the core data model, such as `Transaction` and `Snapshot`.
mod account;
mod amount;
mod category;
pub mod month;
mod snapshot;
mod transaction;

pub use account::{Account, SubAccount};
pub use amount::Amount;
pub use category::Category;
pub use month::MonthKey;
pub use snapshot::{NewSnapshot, Snapshot, TIMESTAMP_FORMAT};
pub use transaction::Transaction;
