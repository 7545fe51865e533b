//! Month handling for the per-month category report.
//!
//! Transaction dates are stored as `%d-%b-%y` display strings (e.g. `15-Mar-24`), so the set of
//! months with data is derived by parsing the distinct date strings back out of the ledger. A
//! month is shown to the user as `Mon-YYYY` and matched against stored dates by its trailing
//! `Mon-YY` form.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// The format of the `date` column in the `transactions` table.
pub const DATE_FORMAT: &str = "%d-%b-%y";

/// One calendar month, displayed as `Mon-YYYY` (e.g. `Mar-2024`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    first_day: NaiveDate,
}

impl MonthKey {
    /// The month that `date` falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    /// The trailing `Mon-YY` substring shared by every stored date in this month. Used as the
    /// textual suffix filter when summing transactions by category.
    pub fn storage_suffix(&self) -> String {
        self.first_day.format("%b-%y").to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_day.format("%b-%Y"))
    }
}

impl FromStr for MonthKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Chrono needs a complete date, so pin the parse to the first of the month.
        let first_day = NaiveDate::parse_from_str(&format!("01-{s}"), "%d-%b-%Y")
            .map_err(|e| anyhow::anyhow!("Invalid month '{s}', expected e.g. 'Mar-2024': {e}"))?;
        // %Y accepts short years, which would silently turn the storage-suffix form 'Mar-24'
        // into the year 24. Require the full four-digit form here.
        anyhow::ensure!(
            first_day.year() >= 1000,
            "Invalid month '{s}', expected a four-digit year e.g. 'Mar-2024'"
        );
        Ok(Self { first_day })
    }
}

/// Returns one `MonthKey` per distinct month found in `dates`, in chronological order.
///
/// Dates that do not parse with [`DATE_FORMAT`] are skipped with a warning rather than failing
/// the whole listing.
pub fn available_months<I, S>(dates: I) -> Vec<MonthKey>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut months = BTreeSet::new();
    for date in dates {
        let date = date.as_ref();
        match NaiveDate::parse_from_str(date, DATE_FORMAT) {
            Ok(parsed) => {
                months.insert(MonthKey::from_date(parsed));
            }
            Err(e) => warn!("Skipping unparseable transaction date '{date}': {e}"),
        }
    }
    months.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_months_dedupes_and_orders() {
        let dates = ["01-Mar-24", "02-Mar-24", "15-Apr-24"];
        let months: Vec<String> = available_months(dates).iter().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["Mar-2024", "Apr-2024"]);
    }

    #[test]
    fn test_available_months_orders_chronologically_across_years() {
        let dates = ["15-Jan-24", "30-Dec-23"];
        let months: Vec<String> = available_months(dates).iter().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["Dec-2023", "Jan-2024"]);
    }

    #[test]
    fn test_available_months_skips_unparseable_dates() {
        let dates = ["01-Mar-24", "not-a-date", ""];
        let months = available_months(dates);
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].to_string(), "Mar-2024");
    }

    #[test]
    fn test_storage_suffix() {
        let month = MonthKey::from_str("Mar-2024").unwrap();
        assert_eq!(month.storage_suffix(), "Mar-24");
    }

    #[test]
    fn test_suffix_matches_stored_date() {
        let month = MonthKey::from_str("Mar-2024").unwrap();
        assert!("15-Mar-24".ends_with(&month.storage_suffix()));
    }

    #[test]
    fn test_malformed_month_key_is_an_error() {
        assert!(MonthKey::from_str("March 2024").is_err());
        assert!(MonthKey::from_str("Mar-24").is_err());
        assert!(MonthKey::from_str("").is_err());
    }
}
