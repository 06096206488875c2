mod common;

use common::{seeded_driver, user, User};
use quarry_data::prelude::*;
use quarry_data_memory::MemoryDriver;
use serde_json::json;

async fn repo() -> Repository<User, MemoryDriver<User>> {
    Repository::new(seeded_driver().await)
}

#[tokio::test]
async fn test_reads_and_writes_share_one_store() {
    let repo = repo().await;
    repo.save(&user(6, "Finn", 19, "Riga"), TxScope::Auto)
        .await
        .unwrap();
    assert_eq!(repo.count().await.unwrap(), 6);
    assert!(repo.exists_by("name", "Finn").await.unwrap());
}

#[tokio::test]
async fn test_delegates_match_the_facades() {
    let driver = seeded_driver().await;
    let repo = Repository::new(driver.clone());
    let reads = ReadRepository::new(driver);

    assert_eq!(
        repo.find_all(false).await.unwrap(),
        reads.find_all(false).await.unwrap()
    );
    assert_eq!(
        repo.find_all_sorted("age", SortOrder::Desc).await.unwrap(),
        reads.find_all_sorted("age", SortOrder::Desc).await.unwrap()
    );
}

#[tokio::test]
async fn test_dynamic_find_through_combined_repository() {
    let repo = repo().await;
    let hits = repo
        .dynamic_find("findByCityOrAge", vec![json!("Kyiv"), json!(25)])
        .await
        .unwrap();
    let ids: Vec<i64> = hits.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![2, 4, 5]);
}

#[tokio::test]
async fn test_transaction_through_combined_repository() {
    let repo = repo().await;
    let err = repo
        .execute_in_transaction(|mut tx| {
            let repo = &repo;
            async move {
                let outcome = async {
                    repo.delete_all(TxScope::Within(&mut tx)).await?;
                    Err(DataError::Other("changed my mind".into()))
                }
                .await;
                (tx, outcome)
            }
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DataError::Other(_)));
    // The delete was rolled back.
    assert_eq!(repo.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_facade_accessors() {
    let repo = repo().await;
    assert_eq!(repo.reads().count().await.unwrap(), 5);
    repo.writes()
        .delete_by_id(&1, TxScope::Auto)
        .await
        .unwrap();
    assert_eq!(repo.reads().count().await.unwrap(), 4);
}
