//! The balance sheet: raw user-typed sub-balance texts and the derived per-account totals.
//!
//! Balance input arrives as free text, one value per `(Account, SubAccount)` pair. The total
//! for an account is the sum of the values that parse as numbers; anything else (empty,
//! partially typed, non-numeric) contributes zero and is never an error. Saving turns the sheet
//! into one snapshot row per account, all stamped with the caller's single timestamp.

use crate::model::{Account, Amount, NewSnapshot, SubAccount};
use crate::Result;
use anyhow::bail;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

/// Raw sub-balance entries keyed by `(Account, SubAccount)`.
#[derive(Debug, Clone, Default)]
pub struct BalanceSheet {
    entries: BTreeMap<Account, BTreeMap<SubAccount, String>>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the raw text for one sub-balance. Rejects a sub-account that does not exist for
    /// the account (e.g. `Joint` has no `Kiwi Saver`).
    pub fn set(
        &mut self,
        account: Account,
        sub_account: SubAccount,
        text: impl Into<String>,
    ) -> Result<()> {
        if !account.has_sub_account(sub_account) {
            bail!("The {account} account has no '{sub_account}' sub-account");
        }
        self.entries
            .entry(account)
            .or_default()
            .insert(sub_account, text.into());
        Ok(())
    }

    /// The sum of the numerically parseable sub-balance texts for `account`.
    ///
    /// Unparseable entries are skipped, never propagated. An account with no entries totals
    /// zero.
    pub fn account_total(&self, account: Account) -> Amount {
        let mut total = Decimal::ZERO;
        if let Some(subs) = self.entries.get(&account) {
            for (sub_account, text) in subs {
                match parse_balance(text) {
                    Some(amount) => total += amount.value(),
                    None => debug!(
                        "Ignoring non-numeric balance for {account} {sub_account}: '{text}'"
                    ),
                }
            }
        }
        Amount::new(total)
    }

    /// One snapshot row per account, every row carrying the same `saved_at` timestamp.
    ///
    /// All three accounts are written on every save, matching the balances panel which always
    /// submits the whole grid. A sub-balance is `None` when the sub-account does not exist for
    /// the account or its text did not parse.
    pub fn snapshots(&self, saved_at: &str) -> Vec<NewSnapshot> {
        Account::ALL
            .iter()
            .map(|&account| NewSnapshot {
                saved_at: saved_at.to_string(),
                account_name: account.to_string(),
                checking: self.parsed(account, SubAccount::Checking),
                savings: self.parsed(account, SubAccount::Savings),
                saver: self.parsed(account, SubAccount::Saver),
                kiwi_saver: self.parsed(account, SubAccount::KiwiSaver),
                total: self.account_total(account).to_f64(),
            })
            .collect()
    }

    fn parsed(&self, account: Account, sub_account: SubAccount) -> Option<f64> {
        self.entries
            .get(&account)
            .and_then(|subs| subs.get(&sub_account))
            .and_then(|text| parse_balance(text))
            .map(|amount| amount.to_f64())
    }
}

fn parse_balance(text: &str) -> Option<Amount> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Amount::from_str(trimmed).ok()
}
