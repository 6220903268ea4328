use campusconnect::database::{self, interests_repo};
use campusconnect::services::catalog_service::{self, DEFAULT_INTERESTS};

#[tokio::test]
async fn test_concurrent_seeding_creates_each_default_once() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("seed.db").display());
    let pool = database::connect(&url).await.unwrap();
    database::migrate(&pool).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let mut conn = pool.acquire().await.unwrap();
            catalog_service::ensure_default_interests(&mut conn)
                .await
                .unwrap()
        }));
    }

    let mut inserted = 0;
    for handle in handles {
        inserted += handle.await.unwrap();
    }
    assert_eq!(inserted, DEFAULT_INTERESTS.len() as u64);

    let interests = interests_repo::list_all(&pool).await.unwrap();
    assert_eq!(interests.len(), DEFAULT_INTERESTS.len());
    for (slug, name) in DEFAULT_INTERESTS {
        assert!(interests.iter().any(|i| i.slug == slug && i.name == name));
    }
}

#[tokio::test]
async fn test_reseeding_keeps_custom_interests() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("seed.db").display());
    let pool = database::connect(&url).await.unwrap();
    database::migrate(&pool).await.unwrap();

    catalog_service::create_interest(&pool, "Internships", None)
        .await
        .unwrap();
    catalog_service::create_interest(&pool, "Robotics", None)
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let inserted = catalog_service::seed_default_interests(&mut conn).await.unwrap();
    assert_eq!(inserted, 4);
    drop(conn);

    assert_eq!(interests_repo::count_interests(&pool).await.unwrap(), 6);
}
