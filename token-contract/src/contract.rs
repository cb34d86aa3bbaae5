//! Token contract entry points
//!
//! Every entry point takes the invocation's [`TransactionContext`] and runs
//! to completion synchronously. Failures abort the invocation; the host then
//! discards whatever was staged, so no partially applied transfer is ever
//! committed.
//!
//! # Example
//!
//! ```
//! use token_contract::{memory::MemoryHost, ContractConfig, TokenContract};
//!
//! let contract = TokenContract::new(ContractConfig::default());
//! let mut host = MemoryHost::new();
//!
//! host.invoke(|ctx| contract.init_ledger(ctx))?;
//! host.invoke(|ctx| contract.transfer_from(ctx, "TestUser", "TestSeller", 2500))?;
//!
//! let balance = host.invoke(|ctx| contract.balance_of(ctx, "TestSeller"))?;
//! assert_eq!(balance, 2500);
//! # Ok::<(), token_contract::Error>(())
//! ```

use crate::{
    codec::{Codec, JsonCodec},
    context::TransactionContext,
    types::{Account, AccountId, Transaction, TransferEvent, TRANSFER_EVENT},
    ContractConfig, Error, Result,
};

/// Token ledger contract
#[derive(Debug, Clone)]
pub struct TokenContract<C = JsonCodec> {
    codec: C,
    config: ContractConfig,
}

impl TokenContract<JsonCodec> {
    /// Create contract with the JSON record codec
    pub fn new(config: ContractConfig) -> Self {
        Self::with_codec(config, JsonCodec)
    }
}

impl<C: Codec> TokenContract<C> {
    /// Create contract with a custom codec
    pub fn with_codec(config: ContractConfig, codec: C) -> Self {
        Self { codec, config }
    }

    /// Contract configuration
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Write the configured seed accounts
    ///
    /// Existing values under the seed keys are overwritten.
    pub fn init_ledger(&self, ctx: &mut TransactionContext<'_>) -> Result<()> {
        self.config.validate()?;

        for seed in &self.config.seed_accounts {
            let account = seed.to_account();
            let bytes = self.codec.encode_account(&account)?;

            ctx.put_state(account.id.as_str(), bytes).map_err(|e| {
                Error::Internal(format!("failed to put {} to world state: {}", account.id, e))
            })?;

            tracing::debug!(
                account = %account.id,
                account_type = %account.account_type,
                balance = account.balance,
                "Seed account written"
            );
        }

        tracing::info!(
            tx_id = %ctx.tx_id(),
            accounts = self.config.seed_accounts.len(),
            "Ledger initialized"
        );

        Ok(())
    }

    /// Balance of an existing account
    pub fn balance_of(&self, ctx: &TransactionContext<'_>, id: &str) -> Result<i64> {
        Ok(self.get_user(ctx, id)?.balance)
    }

    /// Move `value` from `from` to `to`, record it and emit `Transfer`
    pub fn transfer_from(
        &self,
        ctx: &mut TransactionContext<'_>,
        from: &str,
        to: &str,
        value: i64,
    ) -> Result<()> {
        let transaction = self.apply_transfer(ctx, from, to, value)?;

        self.record_transaction(ctx, &transaction)?;
        self.emit_transfer(ctx, &transaction)?;

        tracing::info!(
            tx_id = %transaction.tx_id,
            from = %transaction.from,
            to = %transaction.to,
            value = transaction.value,
            "Transfer staged"
        );

        Ok(())
    }

    /// Whether any value is stored under `id`
    ///
    /// The value is not decoded.
    pub fn user_exist(&self, ctx: &TransactionContext<'_>, id: &str) -> Result<bool> {
        Ok(self.read(ctx, id)?.is_some())
    }

    /// Load and decode an account
    pub fn get_user(&self, ctx: &TransactionContext<'_>, id: &str) -> Result<Account> {
        let bytes = self
            .read(ctx, id)?
            .ok_or_else(|| Error::NotFound(format!("account {} does not exist", id)))?;

        self.codec.decode_account(id, &bytes)
    }

    /// Load and decode a transaction record
    pub fn get_transaction(&self, ctx: &TransactionContext<'_>, tx_id: &str) -> Result<Transaction> {
        let bytes = self
            .read(ctx, tx_id)?
            .ok_or_else(|| Error::NotFound(format!("transaction {} does not exist", tx_id)))?;

        self.codec.decode_transaction(tx_id, &bytes)
    }

    // Transfer steps

    /// Validate, resolve both accounts and stage the new balances
    fn apply_transfer(
        &self,
        ctx: &mut TransactionContext<'_>,
        from: &str,
        to: &str,
        value: i64,
    ) -> Result<Transaction> {
        if from == to {
            return Err(Error::InvalidArgument(
                "cannot transfer to and from same client account".to_string(),
            ));
        }

        if value < 0 {
            return Err(Error::InvalidArgument(
                "transfer amount cannot be negative".to_string(),
            ));
        }

        let mut sender = self.get_user(ctx, from)?;
        let new_from = sender.debited(value)?;

        let mut recipient = self.get_user(ctx, to)?;
        let new_to = recipient.credited(value)?;

        tracing::debug!(
            account = %sender.id,
            before = sender.balance,
            after = new_from,
            "Client balance updated"
        );
        tracing::debug!(
            account = %recipient.id,
            before = recipient.balance,
            after = new_to,
            "Recipient balance updated"
        );

        sender.balance = new_from;
        recipient.balance = new_to;

        self.write_account(ctx, from, &sender)?;
        self.write_account(ctx, to, &recipient)?;

        Ok(Transaction {
            tx_id: ctx.tx_id().clone(),
            from: AccountId::new(from),
            to: AccountId::new(to),
            value,
        })
    }

    fn record_transaction(
        &self,
        ctx: &mut TransactionContext<'_>,
        transaction: &Transaction,
    ) -> Result<()> {
        let key = transaction.tx_id.as_str();

        if self.read(ctx, key)?.is_some() {
            return Err(Error::Internal(format!(
                "transaction id {} already present in world state",
                key
            )));
        }

        let bytes = self.codec.encode_transaction(transaction)?;
        ctx.put_state(key, bytes)
    }

    fn emit_transfer(&self, ctx: &mut TransactionContext<'_>, transaction: &Transaction) -> Result<()> {
        let event = TransferEvent {
            from: transaction.from.clone(),
            to: transaction.to.clone(),
            value: transaction.value,
        };

        let payload = self.codec.encode_event(&event)?;
        ctx.set_event(TRANSFER_EVENT, payload)
            .map_err(|e| Error::Event(format!("failed to set event: {}", e)))
    }

    // World-state helpers

    fn read(&self, ctx: &TransactionContext<'_>, key: &str) -> Result<Option<Vec<u8>>> {
        ctx.get_state(key).map_err(|e| match e {
            Error::Storage(msg) => {
                Error::Storage(format!("failed to read {} from world state: {}", key, msg))
            }
            other => other,
        })
    }

    fn write_account(
        &self,
        ctx: &mut TransactionContext<'_>,
        key: &str,
        account: &Account,
    ) -> Result<()> {
        let bytes = self.codec.encode_account(account)?;
        ctx.put_state(key, bytes)
    }
}
