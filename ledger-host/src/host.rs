//! Host orchestration layer
//!
//! Ties storage, the invocation actor and metrics together behind one
//! entry point.
//!
//! # Example
//!
//! ```no_run
//! use ledger_host::{Config, LedgerHost};
//!
//! #[tokio::main]
//! async fn main() -> ledger_host::Result<()> {
//!     let host = LedgerHost::open(Config::default()).await?;
//!
//!     host.handle().init_ledger().await?;
//!     host.handle().transfer_from("TestUser", "TestSeller", 2500).await?;
//!
//!     host.shutdown().await
//! }
//! ```

use crate::{
    actor::{spawn_host_actor, HostHandle},
    metrics::Metrics,
    storage::{Storage, StorageStats},
    Config, Result,
};
use std::sync::Arc;
use token_contract::{TokenContract, TxId};

/// Running ledger host
pub struct LedgerHost {
    /// Actor handle for invocations
    handle: HostHandle,

    /// Direct storage access (for statistics)
    storage: Arc<Storage>,

    /// Metrics
    metrics: Metrics,

    /// Configuration
    config: Config,
}

impl std::fmt::Debug for LedgerHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerHost")
            .field("storage", &self.storage)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LedgerHost {
    /// Open host with configuration
    pub async fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let storage = Arc::new(Storage::open(&config)?);
        let metrics = Metrics::new()?;
        let contract = TokenContract::new(config.contract.clone());

        let handle = spawn_host_actor(
            storage.clone(),
            contract,
            metrics.clone(),
            config.host.mailbox_capacity,
        );

        tracing::info!(
            service = %config.service_name,
            version = %config.service_version,
            "Ledger host started"
        );

        Ok(Self {
            handle,
            storage,
            metrics,
            config,
        })
    }

    /// Handle for submitting invocations
    pub fn handle(&self) -> &HostHandle {
        &self.handle
    }

    /// Metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Storage statistics
    pub fn stats(&self) -> Result<StorageStats> {
        self.storage.get_stats()
    }

    /// Run `init_ledger` unless the first seed account already exists
    ///
    /// Returns the bootstrap transaction ID when seeding happened. The check
    /// and the seeding are separate invocations, so call this before the
    /// handle is shared with other tasks.
    pub async fn bootstrap_if_empty(&self) -> Result<Option<TxId>> {
        let first = match self.config.contract.seed_accounts.first() {
            Some(seed) => seed.id.clone(),
            None => return Ok(None),
        };

        if self.handle.user_exist(first).await? {
            tracing::info!("Ledger already initialized, skipping bootstrap");
            return Ok(None);
        }

        let tx_id = self.handle.init_ledger().await?;
        Ok(Some(tx_id))
    }

    /// Shutdown host
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();
        config.rocksdb.sync_writes = false;
        config
    }

    #[tokio::test]
    async fn test_host_open() {
        let temp_dir = TempDir::new().unwrap();
        let host = LedgerHost::open(test_config(&temp_dir)).await.unwrap();
        host.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_bootstrap_if_empty_runs_once() {
        let temp_dir = TempDir::new().unwrap();
        let host = LedgerHost::open(test_config(&temp_dir)).await.unwrap();

        assert!(host.bootstrap_if_empty().await.unwrap().is_some());

        host.handle()
            .transfer_from("TestUser", "TestSeller", 10)
            .await
            .unwrap();

        // Second bootstrap must not reset balances
        assert!(host.bootstrap_if_empty().await.unwrap().is_none());
        assert_eq!(host.handle().balance_of("TestSeller").await.unwrap(), 10);

        host.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_rejects_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.host.mailbox_capacity = 0;

        assert!(LedgerHost::open(config).await.is_err());
    }
}
