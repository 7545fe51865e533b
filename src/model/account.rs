use serde::{Deserialize, Serialize};

/// The three top-level accounts tracked by the balances panel.
///
/// The display form is what gets written to the `account_name` column of `accounting_details`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum Account {
    Primary,
    Partner,
    Joint,
}

serde_plain::derive_display_from_serialize!(Account);
serde_plain::derive_fromstr_from_deserialize!(Account);

impl Account {
    /// All accounts, in the order they are presented to the user.
    pub const ALL: [Account; 3] = [Account::Primary, Account::Partner, Account::Joint];

    /// The sub-accounts that exist for this account. Not every account carries all four.
    pub fn sub_accounts(&self) -> &'static [SubAccount] {
        match self {
            Account::Primary | Account::Partner => &[
                SubAccount::Checking,
                SubAccount::Savings,
                SubAccount::Saver,
                SubAccount::KiwiSaver,
            ],
            Account::Joint => &[SubAccount::Checking, SubAccount::Savings],
        }
    }

    /// Returns true if `sub_account` exists for this account.
    pub fn has_sub_account(&self, sub_account: SubAccount) -> bool {
        self.sub_accounts().contains(&sub_account)
    }
}

/// The named sub-balances an account can be decomposed into.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum SubAccount {
    Checking,
    Savings,
    Saver,
    #[serde(rename = "Kiwi Saver")]
    KiwiSaver,
}

serde_plain::derive_display_from_serialize!(SubAccount);
serde_plain::derive_fromstr_from_deserialize!(SubAccount);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_account_mapping() {
        assert_eq!(Account::Primary.sub_accounts().len(), 4);
        assert_eq!(Account::Partner.sub_accounts().len(), 4);
        assert_eq!(Account::Joint.sub_accounts().len(), 2);
        assert!(!Account::Joint.has_sub_account(SubAccount::KiwiSaver));
        assert!(Account::Joint.has_sub_account(SubAccount::Savings));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Account::Primary.to_string(), "Primary");
        assert_eq!(SubAccount::KiwiSaver.to_string(), "Kiwi Saver");
    }
}
