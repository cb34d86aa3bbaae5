//! Storage layer using RocksDB
//!
//! # Column Families
//!
//! - `state` - World state: accounts and transaction records (key: id)
//! - `receipts` - Committed invocation receipts (key: tx id)

use crate::{
    error::{Error, Result},
    types::{ChangeSet, Receipt},
    Config,
};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options, WriteBatch, WriteOptions, DB};
use std::sync::Arc;

/// Column family names
const CF_STATE: &str = "state";
const CF_RECEIPTS: &str = "receipts";

/// Storage wrapper for RocksDB
pub struct Storage {
    db: Arc<DB>,
    sync_writes: bool,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("path", &self.db.path())
            .field("sync_writes", &self.sync_writes)
            .finish()
    }
}

impl Storage {
    /// Open or create database
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        // Create directory if not exists
        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        if config.rocksdb.enable_statistics {
            db_opts.enable_statistics();
        }

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_STATE, Self::cf_options_state()),
            ColumnFamilyDescriptor::new(CF_RECEIPTS, Self::cf_options_receipts()),
        ];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!(path = ?path, "Opened RocksDB world state");

        Ok(Self {
            db: Arc::new(db),
            sync_writes: config.rocksdb.sync_writes,
        })
    }

    // Column family options

    fn cf_options_state() -> Options {
        let mut opts = Options::default();
        // Point lookups dominate, use LZ4 for speed
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        opts.set_block_based_table_factory(&block_opts);
        opts
    }

    fn cf_options_receipts() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
        opts
    }

    fn cf_handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", name)))
    }

    // World state

    /// Read committed world-state value
    pub fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.cf_handle(CF_STATE)?;
        Ok(self.db.get_cf(cf, key.as_bytes())?)
    }

    // Receipts

    /// Get receipt by transaction ID
    pub fn get_receipt(&self, tx_id: &str) -> Result<Receipt> {
        let cf = self.cf_handle(CF_RECEIPTS)?;

        let value = self
            .db
            .get_cf(cf, tx_id.as_bytes())?
            .ok_or_else(|| Error::ReceiptNotFound(tx_id.to_string()))?;

        let receipt: Receipt = bincode::deserialize(&value)?;
        Ok(receipt)
    }

    // Batch operations (atomic)

    /// Commit an invocation's writes together with its receipt
    pub fn commit(&self, changes: &ChangeSet, receipt: &Receipt) -> Result<()> {
        let mut batch = WriteBatch::default();

        let cf_state = self.cf_handle(CF_STATE)?;
        for (key, value) in &changes.writes {
            batch.put_cf(cf_state, key.as_bytes(), value);
        }

        let cf_receipts = self.cf_handle(CF_RECEIPTS)?;
        let receipt_value = bincode::serialize(receipt)?;
        batch.put_cf(cf_receipts, receipt.tx_id.as_str().as_bytes(), &receipt_value);

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.sync_writes);

        // Atomic commit
        self.db.write_opt(batch, &write_opts)?;

        tracing::debug!(
            tx_id = %receipt.tx_id,
            function = %receipt.function,
            writes = changes.writes.len(),
            events = changes.events.len(),
            "Invocation committed"
        );

        Ok(())
    }

    // Statistics

    /// Get storage statistics
    pub fn get_stats(&self) -> Result<StorageStats> {
        let cf_state = self.cf_handle(CF_STATE)?;
        let cf_receipts = self.cf_handle(CF_RECEIPTS)?;

        Ok(StorageStats {
            approximate_state_keys: self.approximate_count(cf_state)?,
            approximate_receipts: self.approximate_count(cf_receipts)?,
        })
    }

    fn approximate_count(&self, cf: &ColumnFamily) -> Result<u64> {
        let prop = self
            .db
            .property_int_value_cf(cf, "rocksdb.estimate-num-keys")?
            .unwrap_or(0);

        Ok(prop)
    }
}

/// Storage statistics
#[derive(Debug, Clone)]
pub struct StorageStats {
    /// Estimated world-state keys
    pub approximate_state_keys: u64,
    /// Estimated committed receipts
    pub approximate_receipts: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;
    use token_contract::{EmittedEvent, TxId};

    fn test_storage() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();
        config.rocksdb.sync_writes = false;
        (Storage::open(&config).unwrap(), temp_dir)
    }

    fn test_receipt(tx_id: &str, changes: &ChangeSet) -> Receipt {
        Receipt {
            tx_id: TxId::new(tx_id),
            function: "TransferFrom".to_string(),
            written_keys: changes.writes.keys().cloned().collect(),
            events: changes.events.clone(),
            committed_at: Utc::now(),
        }
    }

    #[test]
    fn test_storage_open() {
        let (storage, _temp) = test_storage();
        assert!(storage.db.cf_handle(CF_STATE).is_some());
        assert!(storage.db.cf_handle(CF_RECEIPTS).is_some());
    }

    #[test]
    fn test_missing_key_is_none() {
        let (storage, _temp) = test_storage();
        assert!(storage.get_state("nobody").unwrap().is_none());
    }

    #[test]
    fn test_commit_writes_state_and_receipt() {
        let (storage, _temp) = test_storage();

        let mut changes = ChangeSet::default();
        changes.writes.insert("a".to_string(), b"1".to_vec());
        changes.writes.insert("b".to_string(), b"2".to_vec());
        changes.events.push(EmittedEvent {
            name: "Transfer".to_string(),
            payload: b"{}".to_vec(),
        });

        let receipt = test_receipt("tx-1", &changes);
        storage.commit(&changes, &receipt).unwrap();

        assert_eq!(storage.get_state("a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(storage.get_state("b").unwrap(), Some(b"2".to_vec()));

        let stored = storage.get_receipt("tx-1").unwrap();
        assert_eq!(stored, receipt);
        assert_eq!(stored.written_keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_missing_receipt() {
        let (storage, _temp) = test_storage();
        assert!(matches!(
            storage.get_receipt("tx-none"),
            Err(Error::ReceiptNotFound(_))
        ));
    }

    #[test]
    fn test_reopen_preserves_state() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();

        {
            let storage = Storage::open(&config).unwrap();
            let mut changes = ChangeSet::default();
            changes.writes.insert("k".to_string(), b"v".to_vec());
            storage
                .commit(&changes, &test_receipt("tx-1", &changes))
                .unwrap();
        }

        let storage = Storage::open(&config).unwrap();
        assert_eq!(storage.get_state("k").unwrap(), Some(b"v".to_vec()));
    }
}
