use crate::args::ReportArgs;
use crate::commands::Out;
use crate::model::month::available_months;
use crate::model::Amount;
use crate::{Config, Result};
use std::collections::BTreeMap;

/// Lists the months that have at least one transaction, oldest first.
pub async fn months(config: &Config) -> Result<Out<Vec<String>>> {
    let dates = config.db().distinct_transaction_dates().await?;
    let months: Vec<String> = available_months(&dates)
        .iter()
        .map(|m| m.to_string())
        .collect();

    let message = if months.is_empty() {
        "No transactions recorded yet".to_string()
    } else {
        months.join("\n")
    };
    Ok(Out::new(message, months))
}

/// Shows per-category transaction totals for the requested month.
///
/// The month arrives as a `Mon-YYYY` key and is matched against stored dates by its trailing
/// `Mon-YY` form.
pub async fn report(config: &Config, args: &ReportArgs) -> Result<Out<BTreeMap<String, f64>>> {
    let month = args.month();
    let sums = config
        .db()
        .sum_by_category_for_month(&month.storage_suffix())
        .await?;

    let message = if sums.is_empty() {
        format!("No transactions recorded for {month}")
    } else {
        let lines: Vec<String> = sums
            .iter()
            .map(|(category, total)| {
                format!("{category:<12} {:>12}", Amount::from_f64(*total).to_string())
            })
            .collect();
        format!("{month}\n{}", lines.join("\n"))
    };
    Ok(Out::new(message, sums))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MonthKey;
    use crate::test::TestEnv;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_months_lists_distinct_months_in_order() {
        let env = TestEnv::new().await;
        env.insert_transaction("01-Mar-24", "Food", 50.0).await;
        env.insert_transaction("02-Mar-24", "Food", 10.0).await;
        env.insert_transaction("15-Apr-24", "Rent", 1200.0).await;

        let out = months(env.config()).await.unwrap();

        assert_eq!(
            out.structure().unwrap(),
            &vec!["Mar-2024".to_string(), "Apr-2024".to_string()]
        );
    }

    #[tokio::test]
    async fn test_months_empty_ledger() {
        let env = TestEnv::new().await;
        let out = months(env.config()).await.unwrap();
        assert!(out.structure().unwrap().is_empty());
        assert_eq!(out.message(), "No transactions recorded yet");
    }

    #[tokio::test]
    async fn test_report_sums_only_the_requested_month() {
        let env = TestEnv::new().await;
        env.insert_transaction("01-Mar-24", "Food", 50.0).await;
        env.insert_transaction("02-Apr-24", "Food", 30.0).await;

        let args = ReportArgs::new(MonthKey::from_str("Mar-2024").unwrap());
        let out = report(env.config(), &args).await.unwrap();

        let sums = out.structure().unwrap();
        assert_eq!(sums.len(), 1);
        assert_eq!(sums.get("Food"), Some(&50.0));
    }

    #[tokio::test]
    async fn test_report_month_without_data() {
        let env = TestEnv::new().await;
        env.insert_transaction("01-Mar-24", "Food", 50.0).await;

        let args = ReportArgs::new(MonthKey::from_str("May-2024").unwrap());
        let out = report(env.config(), &args).await.unwrap();

        assert!(out.structure().unwrap().is_empty());
        assert!(out.message().contains("No transactions recorded for May-2024"));
    }
}
