mod common;

use common::{seeded_driver, user, User};
use quarry_data::prelude::*;
use quarry_data_memory::MemoryDriver;
use serde_json::json;

async fn reads() -> ReadRepository<User, MemoryDriver<User>> {
    ReadRepository::new(seeded_driver().await)
}

#[tokio::test]
async fn test_find_all() {
    let repo = reads().await;
    let all = repo.find_all(false).await.unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0], user(1, "Ann", 30, "Oslo"));
}

#[tokio::test]
async fn test_find_one_by_id() {
    let repo = reads().await;
    let found = repo.find_one_by_id(&2).await.unwrap();
    assert_eq!(found, Some(user(2, "Bob", 25, "Lima")));
    // Absence is None, not an error.
    assert_eq!(repo.find_one_by_id(&99).await.unwrap(), None);
}

#[tokio::test]
async fn test_find_by_conditions_is_subset_of_find_all() {
    let repo = reads().await;
    let mut conditions = FieldValues::new();
    conditions.insert("age".into(), json!(30));
    conditions.insert("city".into(), json!("Oslo"));

    let matching = repo.find_by_conditions(&conditions).await.unwrap();
    assert_eq!(matching.len(), 2);

    let all = repo.find_all(false).await.unwrap();
    for user in &matching {
        assert!(all.contains(user));
        assert_eq!(user.age, 30);
        assert_eq!(user.city, "Oslo");
    }
}

#[tokio::test]
async fn test_find_by_empty_conditions_returns_all() {
    let repo = reads().await;
    let all = repo.find_by_conditions(&FieldValues::new()).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn test_find_paginated() {
    let repo = reads().await;
    let page = repo.find_paginated(1, 2).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, 2);
    assert_eq!(page[1].id, 3);

    let tail = repo.find_paginated(4, 10).await.unwrap();
    assert_eq!(tail.len(), 1);
}

#[tokio::test]
async fn test_find_all_sorted() {
    let repo = reads().await;
    let by_age = repo.find_all_sorted("age", SortOrder::Asc).await.unwrap();
    let ages: Vec<i64> = by_age.iter().map(|u| u.age).collect();
    assert_eq!(ages, vec![25, 25, 30, 30, 41]);

    let by_name_desc = repo.find_all_sorted("name", SortOrder::Desc).await.unwrap();
    assert_eq!(by_name_desc[0].name, "Eve");
    assert_eq!(by_name_desc[4].name, "Ann");
}

#[tokio::test]
async fn test_exists_by() {
    let repo = reads().await;
    assert!(repo.exists_by("name", "Ann").await.unwrap());
    assert!(!repo.exists_by("name", "Zoe").await.unwrap());
}

#[tokio::test]
async fn test_count_by_conditions() {
    let repo = reads().await;
    let mut conditions = FieldValues::new();
    conditions.insert("age".into(), json!(25));
    assert_eq!(repo.count_by_conditions(&conditions).await.unwrap(), 2);
    assert_eq!(repo.count_by_conditions(&FieldValues::new()).await.unwrap(), 5);
}

#[tokio::test]
async fn test_find_distinct() {
    let repo = reads().await;
    let cities = repo.find_distinct("city").await.unwrap();
    assert_eq!(cities, vec![json!("Oslo"), json!("Lima"), json!("Kyiv")]);
}

#[tokio::test]
async fn test_find_paginated_and_sorted_sorts_before_slicing() {
    let repo = reads().await;
    let slice = repo
        .find_paginated_and_sorted(1, 2, "age", SortOrder::Desc)
        .await
        .unwrap();
    let ages: Vec<i64> = slice.iter().map(|u| u.age).collect();
    assert_eq!(ages, vec![30, 30]);
}

#[tokio::test]
async fn test_find_with_pagination() {
    let repo = reads().await;
    let page = repo
        .find_with_pagination(2, 2, "name", SortOrder::Asc)
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    let names: Vec<&str> = page.data.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Cleo", "Dan"]);
}

#[tokio::test]
async fn test_pages_concatenate_to_sorted_whole() {
    let repo = reads().await;
    let mut concatenated = Vec::new();
    for page in 1..=3 {
        let result = repo
            .find_with_pagination(page, 2, "name", SortOrder::Asc)
            .await
            .unwrap();
        assert!(result.data.len() <= 2);
        concatenated.extend(result.data);
    }
    let sorted = repo.find_all_sorted("name", SortOrder::Asc).await.unwrap();
    assert_eq!(concatenated, sorted);
}

#[tokio::test]
async fn test_count() {
    let repo = reads().await;
    assert_eq!(repo.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_dynamic_find_and() {
    let repo = reads().await;
    let hits = repo
        .dynamic_find("findByNameAndAge", vec![json!("Ann"), json!(30)])
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 1);
}

#[tokio::test]
async fn test_dynamic_find_or() {
    let repo = reads().await;
    let hits = repo
        .dynamic_find("findByNameOrAge", vec![json!("Ann"), json!(25)])
        .await
        .unwrap();
    let ids: Vec<i64> = hits.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2, 5]);
}

#[tokio::test]
async fn test_dynamic_find_camel_case_mapping() {
    let repo = reads().await;
    let hits = repo
        .dynamic_find("findByCity", vec![json!("Kyiv")])
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Dan");
}

#[tokio::test]
async fn test_dynamic_find_bare_find_by_returns_all_live() {
    let repo = reads().await;
    let hits = repo.dynamic_find("findBy", Vec::new()).await.unwrap();
    assert_eq!(hits.len(), 5);
}

#[tokio::test]
async fn test_dynamic_find_arity_mismatch_is_rejected() {
    let repo = reads().await;
    let err = repo
        .dynamic_find("findByNameAndAge", vec![json!("Ann")])
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::InvalidQuery(_)));
}

#[tokio::test]
async fn test_dynamic_find_requires_find_by_prefix() {
    let repo = reads().await;
    let err = repo
        .dynamic_find("deleteByName", vec![json!("Ann")])
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::InvalidQuery(_)));
}
