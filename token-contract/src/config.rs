//! Contract configuration

use crate::{types::Account, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Contract configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Accounts written by `init_ledger`
    pub seed_accounts: Vec<SeedAccount>,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            seed_accounts: vec![
                SeedAccount {
                    id: "TestUser".to_string(),
                    account_type: "user".to_string(),
                    balance: 100_000,
                },
                SeedAccount {
                    id: "TestSeller".to_string(),
                    account_type: "seller".to_string(),
                    balance: 0,
                },
            ],
        }
    }
}

impl ContractConfig {
    /// Check the seed set before anything is written
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for seed in &self.seed_accounts {
            if seed.id.is_empty() {
                return Err(Error::InvalidArgument(
                    "seed account id cannot be empty".to_string(),
                ));
            }
            if seed.balance < 0 {
                return Err(Error::InvalidArgument(format!(
                    "seed account {} has negative balance {}",
                    seed.id, seed.balance
                )));
            }
            if !seen.insert(seed.id.as_str()) {
                return Err(Error::InvalidArgument(format!(
                    "seed account {} listed twice",
                    seed.id
                )));
            }
        }

        Ok(())
    }
}

/// One bootstrap account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAccount {
    /// Account ID
    pub id: String,

    /// Account type tag
    #[serde(rename = "type")]
    pub account_type: String,

    /// Opening balance
    pub balance: i64,
}

impl SeedAccount {
    /// Build the account record
    pub fn to_account(&self) -> Account {
        Account::new(self.id.clone(), self.account_type.clone(), self.balance)
    }
}
