use std::collections::HashMap;

use trendmuse::providers::AffinityBackend;
use trendmuse::recommend::{HashtagAffinity, JsonAffinityStore};

fn scratch_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("trendmuse-{}-{}.json", name, std::process::id()))
}

#[tokio::test]
async fn save_and_load_round_trip_across_reopen() {
    let path = scratch_path("affinity-roundtrip");
    let _ = tokio::fs::remove_file(&path).await;

    {
        let store = JsonAffinityStore::open(path.clone()).await.unwrap();
        let mut map = HashMap::new();
        map.insert(
            "coffee".to_string(),
            HashtagAffinity {
                tag: "coffee".to_string(),
                usage_count: 3,
                last_used_at: 1_720_000_000,
                category: "lifestyle".to_string(),
            },
        );
        store.save("user-1", map).await.unwrap();
    }

    let reopened = JsonAffinityStore::open(path.clone()).await.unwrap();
    let map = reopened.load("user-1").await.unwrap();
    assert_eq!(map.get("coffee").map(|aff| aff.usage_count), Some(3));
    assert_eq!(
        map.get("coffee").map(|aff| aff.category.as_str()),
        Some("lifestyle")
    );

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn unknown_user_loads_an_empty_map() {
    let path = scratch_path("affinity-empty");
    let _ = tokio::fs::remove_file(&path).await;

    let store = JsonAffinityStore::open(path.clone()).await.unwrap();
    let map = store.load("nobody").await.unwrap();
    assert!(map.is_empty());

    let _ = tokio::fs::remove_file(&path).await;
}
