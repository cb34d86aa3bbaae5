//! End-to-end tests: contract invocations through the RocksDB host

use ledger_host::{Config, Error, LedgerHost};
use tempfile::TempDir;
use token_contract::{Codec, ErrorKind, JsonCodec, TRANSFER_EVENT};

fn test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.data_dir = temp_dir.path().to_path_buf();
    config.rocksdb.sync_writes = false;
    config
}

#[tokio::test]
async fn test_end_to_end_transfer() {
    let temp_dir = TempDir::new().unwrap();
    let host = LedgerHost::open(test_config(&temp_dir)).await.unwrap();
    let handle = host.handle().clone();

    handle.init_ledger().await.unwrap();
    assert_eq!(handle.balance_of("TestUser").await.unwrap(), 100_000);
    assert_eq!(handle.balance_of("TestSeller").await.unwrap(), 0);

    let tx_id = handle
        .transfer_from("TestUser", "TestSeller", 2500)
        .await
        .unwrap();

    assert_eq!(handle.balance_of("TestUser").await.unwrap(), 97_500);
    assert_eq!(handle.balance_of("TestSeller").await.unwrap(), 2_500);

    // Transaction record under the host-assigned id
    let record = handle.get_transaction(tx_id.as_str()).await.unwrap();
    assert_eq!(record.tx_id, tx_id);
    assert_eq!(record.from.as_str(), "TestUser");
    assert_eq!(record.to.as_str(), "TestSeller");
    assert_eq!(record.value, 2500);

    // Exactly one Transfer event committed
    let receipt = handle.get_receipt(tx_id.as_str()).await.unwrap();
    assert_eq!(receipt.events.len(), 1);
    assert_eq!(receipt.events[0].name, TRANSFER_EVENT);

    let event = JsonCodec.decode_event(&receipt.events[0].payload).unwrap();
    assert_eq!(event.from.as_str(), "TestUser");
    assert_eq!(event.to.as_str(), "TestSeller");
    assert_eq!(event.value, 2500);

    host.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rejected_transfers_commit_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let host = LedgerHost::open(test_config(&temp_dir)).await.unwrap();
    let handle = host.handle();

    handle.init_ledger().await.unwrap();

    let cases = [
        ("TestUser", "TestUser", 10, ErrorKind::InvalidArgument),
        ("TestUser", "TestSeller", -1, ErrorKind::InvalidArgument),
        ("TestSeller", "TestUser", 1, ErrorKind::FailedPrecondition),
        ("TestUser", "Nobody", 1, ErrorKind::NotFound),
        ("Nobody", "TestUser", 1, ErrorKind::NotFound),
    ];

    for (from, to, value, expected) in cases {
        let err = handle.transfer_from(from, to, value).await.unwrap_err();
        assert_eq!(err.contract_kind(), Some(expected), "{} -> {} ({})", from, to, value);
    }

    assert_eq!(handle.balance_of("TestUser").await.unwrap(), 100_000);
    assert_eq!(handle.balance_of("TestSeller").await.unwrap(), 0);
    assert!(!handle.user_exist("Nobody").await.unwrap());

    host.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_zero_value_transfer_produces_receipt() {
    let temp_dir = TempDir::new().unwrap();
    let host = LedgerHost::open(test_config(&temp_dir)).await.unwrap();
    let handle = host.handle();

    handle.init_ledger().await.unwrap();
    let tx_id = handle
        .transfer_from("TestUser", "TestSeller", 0)
        .await
        .unwrap();

    assert_eq!(handle.balance_of("TestUser").await.unwrap(), 100_000);
    assert_eq!(handle.balance_of("TestSeller").await.unwrap(), 0);

    let receipt = handle.get_receipt(tx_id.as_str()).await.unwrap();
    assert_eq!(receipt.events.len(), 1);
    assert!(handle.get_transaction(tx_id.as_str()).await.is_ok());

    host.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_transfers_conserve_supply() {
    let temp_dir = TempDir::new().unwrap();
    let host = LedgerHost::open(test_config(&temp_dir)).await.unwrap();
    let handle = host.handle().clone();
    handle.init_ledger().await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..50 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                handle.transfer_from("TestUser", "TestSeller", 1_000).await
            } else {
                handle.transfer_from("TestSeller", "TestUser", 700).await
            }
        }));
    }

    let mut committed = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            committed += 1;
        }
    }
    assert!(committed >= 25);

    let user = handle.balance_of("TestUser").await.unwrap();
    let seller = handle.balance_of("TestSeller").await.unwrap();
    assert!(user >= 0 && seller >= 0);
    assert_eq!(user + seller, 100_000);

    host.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    let tx_id = {
        let host = LedgerHost::open(test_config(&temp_dir)).await.unwrap();
        host.handle().init_ledger().await.unwrap();
        let tx_id = host
            .handle()
            .transfer_from("TestUser", "TestSeller", 42)
            .await
            .unwrap();
        host.shutdown().await.unwrap();
        tx_id
    };

    // Wait for the actor to release the database lock
    let mut reopened = None;
    for _ in 0..50 {
        match LedgerHost::open(test_config(&temp_dir)).await {
            Ok(host) => {
                reopened = Some(host);
                break;
            }
            Err(Error::Storage(_)) => {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            }
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    let host = reopened.expect("database lock was never released");

    assert_eq!(host.handle().balance_of("TestSeller").await.unwrap(), 42);
    assert!(host.bootstrap_if_empty().await.unwrap().is_none());
    assert!(host.handle().get_receipt(tx_id.as_str()).await.is_ok());

    host.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_missing_receipt() {
    let temp_dir = TempDir::new().unwrap();
    let host = LedgerHost::open(test_config(&temp_dir)).await.unwrap();

    assert!(matches!(
        host.handle().get_receipt("not-a-tx").await,
        Err(Error::ReceiptNotFound(_))
    ));

    host.shutdown().await.unwrap();
}
