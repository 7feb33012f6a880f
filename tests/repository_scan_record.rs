use chrono::{DateTime, Duration, Utc};
use linkcheck::domain::entities::{NewScanRecord, ScanSource, VerdictStatus};
use linkcheck::domain::repositories::ScanRecordRepository;
use linkcheck::infrastructure::persistence::PgScanRecordRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn record(owner: &str, url: &str, created_at: DateTime<Utc>) -> NewScanRecord {
    NewScanRecord {
        url: url.to_string(),
        status: VerdictStatus::Safe,
        score: 95,
        source: ScanSource::Url,
        owner_id: owner.to_string(),
        created_at,
    }
}

#[sqlx::test]
async fn test_append_and_read_back(pool: PgPool) {
    let repo = PgScanRecordRepository::new(Arc::new(pool));
    let created_at = DateTime::parse_from_rfc3339("2026-03-01T10:00:00Z")
        .unwrap()
        .with_timezone(&Utc);

    let new_record = NewScanRecord {
        url: "https://bad.example/path".to_string(),
        status: VerdictStatus::Danger,
        score: 10,
        source: ScanSource::Qr,
        owner_id: "user-1".to_string(),
        created_at,
    };

    let stored = repo.append(new_record).await.unwrap();

    assert!(stored.id > 0);
    assert_eq!(stored.url, "https://bad.example/path");
    assert_eq!(stored.status, VerdictStatus::Danger);
    assert_eq!(stored.score, 10);
    assert_eq!(stored.source, ScanSource::Qr);
    assert_eq!(stored.created_at, created_at);

    let items = repo.recent_for_owner("user-1", 20).await.unwrap();
    assert_eq!(items, vec![stored]);
}

#[sqlx::test]
async fn test_records_are_isolated_per_owner(pool: PgPool) {
    let repo = PgScanRecordRepository::new(Arc::new(pool));
    let now = Utc::now();

    repo.append(record("alice", "https://a.example/", now))
        .await
        .unwrap();
    repo.append(record("bob", "https://b.example/", now))
        .await
        .unwrap();

    let items = repo.recent_for_owner("alice", 20).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].owner_id, "alice");
    assert_eq!(items[0].url, "https://a.example/");

    let none = repo.recent_for_owner("carol", 20).await.unwrap();
    assert!(none.is_empty());
}

#[sqlx::test]
async fn test_recent_is_newest_first(pool: PgPool) {
    let repo = PgScanRecordRepository::new(Arc::new(pool));
    let now = Utc::now();

    // Inserted out of order on purpose.
    repo.append(record("u", "https://second.example/", now - Duration::minutes(5)))
        .await
        .unwrap();
    repo.append(record("u", "https://third.example/", now))
        .await
        .unwrap();
    repo.append(record("u", "https://first.example/", now - Duration::hours(1)))
        .await
        .unwrap();

    let urls: Vec<String> = repo
        .recent_for_owner("u", 20)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.url)
        .collect();

    assert_eq!(
        urls,
        vec![
            "https://third.example/",
            "https://second.example/",
            "https://first.example/",
        ]
    );
}

#[sqlx::test]
async fn test_same_timestamp_breaks_tie_by_id(pool: PgPool) {
    let repo = PgScanRecordRepository::new(Arc::new(pool));
    let now = Utc::now();

    let older = repo
        .append(record("u", "https://one.example/", now))
        .await
        .unwrap();
    let newer = repo
        .append(record("u", "https://two.example/", now))
        .await
        .unwrap();

    let items = repo.recent_for_owner("u", 20).await.unwrap();
    assert_eq!(items[0].id, newer.id);
    assert_eq!(items[1].id, older.id);
}

#[sqlx::test]
async fn test_recent_respects_limit(pool: PgPool) {
    let repo = PgScanRecordRepository::new(Arc::new(pool));
    let now = Utc::now();

    for i in 0..5 {
        repo.append(record(
            "u",
            &format!("https://site{i}.example/"),
            now - Duration::minutes(i),
        ))
        .await
        .unwrap();
    }

    let items = repo.recent_for_owner("u", 2).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].url, "https://site0.example/");
    assert_eq!(items[1].url, "https://site1.example/");
}

#[sqlx::test]
async fn test_out_of_range_score_is_rejected(pool: PgPool) {
    let repo = PgScanRecordRepository::new(Arc::new(pool.clone()));

    let mut bad = record("u", "https://example.com/", Utc::now());
    bad.score = 101;

    let result = repo.append(bad).await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), "internal");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scan_records")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test]
async fn test_health_check(pool: PgPool) {
    let repo = PgScanRecordRepository::new(Arc::new(pool));

    assert!(repo.health_check().await);
}
