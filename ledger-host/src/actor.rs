//! Single-writer invocation actor
//!
//! One Tokio task owns the world state and runs contract invocations one at
//! a time, which gives the host its serial commit order:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               HostHandle (Clone)                      │
//! │         Sends messages to actor mailbox               │
//! └─────────────────────┬────────────────────────────────┘
//!                       │ mpsc::channel (bounded)
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │               HostActor (Single Task)                 │
//! │   tx id (UUIDv7) → InvocationScope → TokenContract    │
//! │        Ok  → Storage::commit (one WriteBatch)         │
//! │        Err → scope dropped, nothing written           │
//! └──────────────────────────────────────────────────────┘
//! ```

use crate::{
    metrics::Metrics,
    scope::InvocationScope,
    types::Receipt,
    Error, Result, Storage,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use token_contract::{
    Account, ErrorKind, TokenContract, Transaction, TransactionContext, TxId,
};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

/// Message sent to the host actor
#[derive(Debug)]
pub enum HostMessage {
    /// Seed the configured accounts
    InitLedger {
        response: oneshot::Sender<Result<TxId>>,
    },

    /// Transfer between two accounts
    TransferFrom {
        from: String,
        to: String,
        value: i64,
        response: oneshot::Sender<Result<TxId>>,
    },

    /// Balance of an account
    BalanceOf {
        id: String,
        response: oneshot::Sender<Result<i64>>,
    },

    /// Whether a key holds a value
    UserExist {
        id: String,
        response: oneshot::Sender<Result<bool>>,
    },

    /// Decoded account record
    GetUser {
        id: String,
        response: oneshot::Sender<Result<Account>>,
    },

    /// Decoded transaction record
    GetTransaction {
        tx_id: String,
        response: oneshot::Sender<Result<Transaction>>,
    },

    /// Committed receipt of an invocation
    GetReceipt {
        tx_id: String,
        response: oneshot::Sender<Result<Receipt>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that runs contract invocations
pub struct HostActor {
    /// Storage backend
    storage: Arc<Storage>,

    /// Contract being hosted
    contract: TokenContract,

    /// Metrics
    metrics: Metrics,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<HostMessage>,
}

impl HostActor {
    /// Create new actor
    pub fn new(
        storage: Arc<Storage>,
        contract: TokenContract,
        metrics: Metrics,
        mailbox: mpsc::Receiver<HostMessage>,
    ) -> Self {
        Self {
            storage,
            contract,
            metrics,
            mailbox,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            if let HostMessage::Shutdown = msg {
                break;
            }
            self.handle_message(msg);
        }

        tracing::info!("Host actor stopped");
    }

    /// Handle a single message
    fn handle_message(&self, msg: HostMessage) {
        match msg {
            HostMessage::InitLedger { response } => {
                let result = self
                    .submit("InitLedger", |contract, ctx| contract.init_ledger(ctx))
                    .map(|(tx_id, ())| tx_id);
                let _ = response.send(result);
            }

            HostMessage::TransferFrom {
                from,
                to,
                value,
                response,
            } => {
                let result = self
                    .submit("TransferFrom", |contract, ctx| {
                        contract.transfer_from(ctx, &from, &to, value)
                    })
                    .map(|(tx_id, ())| {
                        self.metrics.record_transfer_value(value);
                        tx_id
                    });
                let _ = response.send(result);
            }

            HostMessage::BalanceOf { id, response } => {
                let result = self.evaluate("BalanceOf", |contract, ctx| contract.balance_of(ctx, &id));
                let _ = response.send(result);
            }

            HostMessage::UserExist { id, response } => {
                let result = self.evaluate("UserExist", |contract, ctx| contract.user_exist(ctx, &id));
                let _ = response.send(result);
            }

            HostMessage::GetUser { id, response } => {
                let result = self.evaluate("GetUser", |contract, ctx| contract.get_user(ctx, &id));
                let _ = response.send(result);
            }

            HostMessage::GetTransaction { tx_id, response } => {
                let result = self.evaluate("GetTransaction", |contract, ctx| {
                    contract.get_transaction(ctx, &tx_id)
                });
                let _ = response.send(result);
            }

            HostMessage::GetReceipt { tx_id, response } => {
                let _ = response.send(self.storage.get_receipt(&tx_id));
            }

            HostMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }

    /// Run a state-changing invocation and commit it on success
    fn submit<T>(
        &self,
        function: &'static str,
        call: impl FnOnce(&TokenContract, &mut TransactionContext<'_>) -> token_contract::Result<T>,
    ) -> Result<(TxId, T)> {
        let tx_id = TxId::new(Uuid::now_v7().to_string());
        let mut scope = InvocationScope::new(&self.storage);

        let outcome = {
            let mut ctx = TransactionContext::new(tx_id.clone(), &mut scope);
            call(&self.contract, &mut ctx)
        };

        let output = match outcome {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(
                    tx_id = %tx_id,
                    function,
                    kind = e.kind().as_str(),
                    error = %e,
                    "Invocation failed, staged writes discarded"
                );
                self.metrics.record_failed(function, e.kind());
                return Err(e.into());
            }
        };

        let changes = scope.into_changes();
        let receipt = Receipt {
            tx_id: tx_id.clone(),
            function: function.to_string(),
            written_keys: changes.writes.keys().cloned().collect(),
            events: changes.events.clone(),
            committed_at: Utc::now(),
        };

        let started = Instant::now();
        if let Err(e) = self.storage.commit(&changes, &receipt) {
            tracing::error!(tx_id = %tx_id, function, error = %e, "Commit failed");
            self.metrics.record_failed(function, ErrorKind::Internal);
            return Err(e);
        }
        self.metrics
            .record_commit_duration(started.elapsed().as_secs_f64());
        self.metrics.record_committed(function);

        Ok((tx_id, output))
    }

    /// Run a read-only invocation; anything it stages is discarded
    fn evaluate<T>(
        &self,
        function: &'static str,
        call: impl FnOnce(&TokenContract, &TransactionContext<'_>) -> token_contract::Result<T>,
    ) -> Result<T> {
        let tx_id = TxId::new(Uuid::now_v7().to_string());
        let mut scope = InvocationScope::new(&self.storage);
        let ctx = TransactionContext::new(tx_id, &mut scope);

        match call(&self.contract, &ctx) {
            Ok(output) => {
                self.metrics.record_query(function);
                Ok(output)
            }
            Err(e) => {
                tracing::debug!(function, error = %e, "Query failed");
                self.metrics.record_failed(function, e.kind());
                Err(e.into())
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone, Debug)]
pub struct HostHandle {
    sender: mpsc::Sender<HostMessage>,
}

impl HostHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<HostMessage>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T>>) -> HostMessage,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(build(tx))
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Seed the configured accounts
    pub async fn init_ledger(&self) -> Result<TxId> {
        self.request(|response| HostMessage::InitLedger { response })
            .await
    }

    /// Transfer `value` from `from` to `to`
    pub async fn transfer_from(
        &self,
        from: impl Into<String>,
        to: impl Into<String>,
        value: i64,
    ) -> Result<TxId> {
        let (from, to) = (from.into(), to.into());
        self.request(|response| HostMessage::TransferFrom {
            from,
            to,
            value,
            response,
        })
        .await
    }

    /// Balance of an account
    pub async fn balance_of(&self, id: impl Into<String>) -> Result<i64> {
        let id = id.into();
        self.request(|response| HostMessage::BalanceOf { id, response })
            .await
    }

    /// Whether a key holds a value
    pub async fn user_exist(&self, id: impl Into<String>) -> Result<bool> {
        let id = id.into();
        self.request(|response| HostMessage::UserExist { id, response })
            .await
    }

    /// Decoded account record
    pub async fn get_user(&self, id: impl Into<String>) -> Result<Account> {
        let id = id.into();
        self.request(|response| HostMessage::GetUser { id, response })
            .await
    }

    /// Decoded transaction record
    pub async fn get_transaction(&self, tx_id: impl Into<String>) -> Result<Transaction> {
        let tx_id = tx_id.into();
        self.request(|response| HostMessage::GetTransaction { tx_id, response })
            .await
    }

    /// Committed receipt of an invocation
    pub async fn get_receipt(&self, tx_id: impl Into<String>) -> Result<Receipt> {
        let tx_id = tx_id.into();
        self.request(|response| HostMessage::GetReceipt { tx_id, response })
            .await
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(HostMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the host actor
pub fn spawn_host_actor(
    storage: Arc<Storage>,
    contract: TokenContract,
    metrics: Metrics,
    mailbox_capacity: usize,
) -> HostHandle {
    let (tx, rx) = mpsc::channel(mailbox_capacity); // Bounded channel for backpressure
    let actor = HostActor::new(storage, contract, metrics, rx);

    tokio::spawn(async move {
        actor.run().await;
    });

    HostHandle::new(tx)
}
