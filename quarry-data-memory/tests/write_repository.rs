mod common;

use common::{seeded_driver, user, User};
use quarry_data::prelude::*;
use quarry_data_memory::MemoryDriver;
use serde_json::json;

async fn facades() -> (
    ReadRepository<User, MemoryDriver<User>>,
    WriteRepository<User, MemoryDriver<User>>,
    MemoryDriver<User>,
) {
    let driver = seeded_driver().await;
    (
        ReadRepository::new(driver.clone()),
        WriteRepository::new(driver.clone()),
        driver,
    )
}

#[tokio::test]
async fn test_save_then_find_round_trip() {
    let (reads, writes, _) = facades().await;
    let fresh = user(6, "Finn", 19, "Riga");
    let saved = writes.save(&fresh, TxScope::Auto).await.unwrap();
    assert_eq!(saved, fresh);
    assert_eq!(reads.find_one_by_id(&6).await.unwrap(), Some(fresh));
}

#[tokio::test]
async fn test_save_updates_existing_entity() {
    let (reads, writes, _) = facades().await;
    writes
        .save(&user(1, "Ann", 31, "Oslo"), TxScope::Auto)
        .await
        .unwrap();
    assert_eq!(reads.count().await.unwrap(), 5);
    let ann = reads.find_one_by_id(&1).await.unwrap().unwrap();
    assert_eq!(ann.age, 31);
}

#[tokio::test]
async fn test_save_all_preserves_input_order() {
    let (reads, writes, _) = facades().await;
    let batch = [user(7, "Gus", 22, "Riga"), user(6, "Finn", 19, "Riga")];
    let saved = writes.save_all(&batch, TxScope::Auto).await.unwrap();
    assert_eq!(saved, batch.to_vec());
    assert_eq!(reads.count().await.unwrap(), 7);
}

#[tokio::test]
async fn test_update_by_id_applies_partial_fields() {
    let (reads, writes, _) = facades().await;
    let mut patch = FieldValues::new();
    patch.insert("age".into(), json!(26));
    writes.update_by_id(&2, &patch, TxScope::Auto).await.unwrap();
    let bob = reads.find_one_by_id(&2).await.unwrap().unwrap();
    assert_eq!(bob.age, 26);
    assert_eq!(bob.name, "Bob");
}

#[tokio::test]
async fn test_update_by_id_missing_is_noop() {
    let (reads, writes, _) = facades().await;
    let mut patch = FieldValues::new();
    patch.insert("age".into(), json!(99));
    writes
        .update_by_id(&42, &patch, TxScope::Auto)
        .await
        .unwrap();
    assert_eq!(reads.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_delete_by_id_is_idempotent() {
    let (reads, writes, _) = facades().await;
    writes.delete_by_id(&3, TxScope::Auto).await.unwrap();
    assert_eq!(reads.count().await.unwrap(), 4);
    // Deleting an absent id does not raise.
    writes.delete_by_id(&3, TxScope::Auto).await.unwrap();
    assert_eq!(reads.count().await.unwrap(), 4);
}

#[tokio::test]
async fn test_delete_by_conditions() {
    let (reads, writes, _) = facades().await;
    let mut conditions = FieldValues::new();
    conditions.insert("city".into(), json!("Lima"));
    writes
        .delete_by_conditions(&conditions, TxScope::Auto)
        .await
        .unwrap();
    assert_eq!(reads.count().await.unwrap(), 3);
    assert!(!reads.exists_by("city", "Lima").await.unwrap());
}

#[tokio::test]
async fn test_delete_all() {
    let (reads, writes, _) = facades().await;
    writes.delete_all(TxScope::Auto).await.unwrap();
    assert_eq!(reads.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_soft_delete_and_restore_round_trip() {
    let (reads, writes, _) = facades().await;

    writes.soft_delete_by_id(&1, TxScope::Auto).await.unwrap();
    let live: Vec<i64> = reads
        .find_all(false)
        .await
        .unwrap()
        .iter()
        .map(|u| u.id)
        .collect();
    assert!(!live.contains(&1));
    let with_deleted: Vec<i64> = reads
        .find_all(true)
        .await
        .unwrap()
        .iter()
        .map(|u| u.id)
        .collect();
    assert!(with_deleted.contains(&1));
    assert_eq!(reads.find_one_by_id(&1).await.unwrap(), None);

    writes.restore_by_id(&1, TxScope::Auto).await.unwrap();
    let live: Vec<i64> = reads
        .find_all(false)
        .await
        .unwrap()
        .iter()
        .map(|u| u.id)
        .collect();
    assert!(live.contains(&1));
}

#[tokio::test]
async fn test_transaction_commit_persists_writes() {
    let (reads, writes, driver) = facades().await;
    writes
        .execute_in_transaction(|mut tx| {
            let writes = &writes;
            async move {
                let outcome = async {
                    writes
                        .save(&user(6, "Finn", 19, "Riga"), TxScope::Within(&mut tx))
                        .await?;
                    writes.delete_by_id(&2, TxScope::Within(&mut tx)).await?;
                    Ok(())
                }
                .await;
                (tx, outcome)
            }
        })
        .await
        .unwrap();

    assert_eq!(reads.count().await.unwrap(), 5);
    assert!(reads.find_one_by_id(&6).await.unwrap().is_some());
    assert!(reads.find_one_by_id(&2).await.unwrap().is_none());

    let stats = driver.tx_stats();
    assert_eq!(stats.begins, 1);
    assert_eq!(stats.commits, 1);
    assert_eq!(stats.rollbacks, 0);
    assert_eq!(stats.releases, 1);
}

#[tokio::test]
async fn test_transaction_rollback_leaves_state_unchanged() {
    let (reads, writes, driver) = facades().await;
    let before = reads.find_all(false).await.unwrap();

    let err = writes
        .execute_in_transaction(|mut tx| {
            let writes = &writes;
            async move {
                let outcome = async {
                    // First write lands, then the operation fails.
                    writes
                        .save(&user(6, "Finn", 19, "Riga"), TxScope::Within(&mut tx))
                        .await?;
                    Err(DataError::Other("second write refused".into()))
                }
                .await;
                (tx, outcome)
            }
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DataError::Other(msg) if msg == "second write refused"));
    assert_eq!(reads.find_all(false).await.unwrap(), before);

    let stats = driver.tx_stats();
    assert_eq!(stats.commits, 0);
    assert_eq!(stats.rollbacks, 1);
    assert_eq!(stats.releases, 1);
}

#[tokio::test]
async fn test_manual_transaction_threading() {
    let (reads, writes, driver) = facades().await;

    let mut tx = driver.begin().await.unwrap();
    writes
        .save(&user(6, "Finn", 19, "Riga"), TxScope::Within(&mut tx))
        .await
        .unwrap();
    writes
        .save(&user(7, "Gus", 22, "Riga"), TxScope::Within(&mut tx))
        .await
        .unwrap();
    tx.commit().await.unwrap();
    tx.release().await.unwrap();

    assert_eq!(reads.count().await.unwrap(), 7);
    assert_eq!(driver.tx_stats().releases, 1);
}
