//! Configuration for the ledger host

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use token_contract::ContractConfig;

/// Host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data directory for RocksDB
    pub data_dir: PathBuf,

    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// RocksDB configuration
    pub rocksdb: RocksDBConfig,

    /// Invocation actor configuration
    pub host: HostConfig,

    /// Contract configuration (seed accounts)
    pub contract: ContractConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/ledger"),
            service_name: "ledger-host".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            rocksdb: RocksDBConfig::default(),
            host: HostConfig::default(),
            contract: ContractConfig::default(),
        }
    }
}

/// RocksDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RocksDBConfig {
    /// Write buffer size (MB)
    pub write_buffer_size_mb: usize,

    /// Max write buffers
    pub max_write_buffer_number: i32,

    /// Max background jobs (compaction + flush)
    pub max_background_jobs: i32,

    /// Sync WAL on every invocation commit
    pub sync_writes: bool,

    /// Enable statistics
    pub enable_statistics: bool,
}

impl Default for RocksDBConfig {
    fn default() -> Self {
        Self {
            write_buffer_size_mb: 64,
            max_write_buffer_number: 4,
            max_background_jobs: 2,
            sync_writes: true,
            enable_statistics: false,
        }
    }
}

/// Invocation actor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Bounded mailbox size (backpressure)
    pub mailbox_capacity: usize,

    /// Run `init_ledger` at startup when the first seed account is missing
    pub bootstrap_on_start: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 1000,
            bootstrap_on_start: true,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(data_dir) = std::env::var("LEDGER_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(capacity) = std::env::var("LEDGER_MAILBOX_CAPACITY") {
            config.host.mailbox_capacity = capacity.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid LEDGER_MAILBOX_CAPACITY: {}", e))
            })?;
        }

        if let Ok(bootstrap) = std::env::var("LEDGER_BOOTSTRAP") {
            config.host.bootstrap_on_start = bootstrap.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid LEDGER_BOOTSTRAP: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the host cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.host.mailbox_capacity == 0 {
            return Err(crate::Error::Config(
                "mailbox_capacity must be greater than zero".to_string(),
            ));
        }

        self.contract
            .validate()
            .map_err(|e| crate::Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "ledger-host");
        assert_eq!(config.host.mailbox_capacity, 1000);
        assert!(config.host.bootstrap_on_start);
        assert_eq!(config.contract.seed_accounts.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/var/lib/ledger"

[host]
mailbox_capacity = 16

[[contract.seed_accounts]]
id = "Treasury"
type = "user"
balance = 500
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/ledger"));
        assert_eq!(config.host.mailbox_capacity, 16);
        assert!(config.host.bootstrap_on_start);
        assert_eq!(config.contract.seed_accounts.len(), 1);
        assert_eq!(config.contract.seed_accounts[0].id, "Treasury");
        assert_eq!(config.contract.seed_accounts[0].account_type, "user");
        assert_eq!(config.rocksdb.max_write_buffer_number, 4);
    }

    #[test]
    fn test_from_file_rejects_negative_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.toml");
        std::fs::write(
            &path,
            r#"
[[contract.seed_accounts]]
id = "Broke"
type = "user"
balance = -1
"#,
        )
        .unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_zero_mailbox_rejected() {
        let mut config = Config::default();
        config.host.mailbox_capacity = 0;
        assert!(config.validate().is_err());
    }
}
