use std::collections::BTreeMap;

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use examina_application::AccessRepository;
use examina_domain::build_access_tree;

use super::PostgresAccessRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

fn unique_profile_id(tag: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();

    format!("PF{tag}{nanos}")
}

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres access tests: {error}");
    }

    Some(pool)
}

async fn seed_catalog(pool: &PgPool) {
    let menus = sqlx::query(
        r#"
        INSERT INTO menus (menu_id, label, icon, route, position)
        VALUES
            ('MN9101', 'Question Bank', 'book', '/questions', 1),
            ('MN9102', 'Reports', 'chart', '/reports', 2)
        ON CONFLICT (menu_id) DO NOTHING
        "#,
    )
    .execute(pool)
    .await;
    assert!(menus.is_ok());

    let submenus = sqlx::query(
        r#"
        INSERT INTO submenus (submenu_id, menu_id, label, icon, route, position)
        VALUES ('SM9101', 'MN9101', 'Topics', 'list', '/questions/topics', 1)
        ON CONFLICT (submenu_id) DO NOTHING
        "#,
    )
    .execute(pool)
    .await;
    assert!(submenus.is_ok());

    let permissions = sqlx::query(
        r#"
        INSERT INTO permissions (permission_id, menu_id, submenu_id, label, active)
        VALUES ('PM9101', 'MN9101', 'SM9101', 'Edit topics', TRUE)
        ON CONFLICT (permission_id) DO NOTHING
        "#,
    )
    .execute(pool)
    .await;
    assert!(permissions.is_ok());
}

async fn ensure_profile(pool: &PgPool, profile_id: &str, name: &str) {
    let insert = sqlx::query(
        r#"
        INSERT INTO profiles (profile_id, name)
        VALUES ($1, $2)
        ON CONFLICT (profile_id) DO NOTHING
        "#,
    )
    .bind(profile_id)
    .bind(name)
    .execute(pool)
    .await;
    assert!(insert.is_ok());
}

#[tokio::test]
async fn merge_writes_once_then_suppresses_repeats() {
    let Some(pool) = test_pool().await else {
        return;
    };

    seed_catalog(&pool).await;
    let profile_id = unique_profile_id("91");
    ensure_profile(&pool, profile_id.as_str(), profile_id.as_str()).await;

    let repository = PostgresAccessRepository::new(pool.clone());
    let desired = BTreeMap::from([
        ("MN9101".to_owned(), true),
        ("SM9101".to_owned(), true),
        ("PM9101".to_owned(), false),
    ]);

    let first = repository.merge_access(profile_id.as_str(), &desired).await;
    assert!(matches!(first, Ok(stats) if stats.inserted + stats.updated == 3));

    let second = repository.merge_access(profile_id.as_str(), &desired).await;
    assert!(matches!(
        second,
        Ok(stats) if stats.inserted == 0 && stats.updated == 0
    ));
}

#[tokio::test]
async fn merge_skips_unresolvable_references() {
    let Some(pool) = test_pool().await else {
        return;
    };

    seed_catalog(&pool).await;
    let profile_id = unique_profile_id("92");
    ensure_profile(&pool, profile_id.as_str(), profile_id.as_str()).await;

    let repository = PostgresAccessRepository::new(pool.clone());
    let desired = BTreeMap::from([
        ("SM9999".to_owned(), true),
        ("PM9999".to_owned(), true),
        ("XX9999".to_owned(), true),
    ]);

    let stats = repository.merge_access(profile_id.as_str(), &desired).await;
    assert!(matches!(
        stats,
        Ok(stats) if stats.inserted == 0 && stats.updated == 0 && stats.skipped == 2
    ));

    let state = repository.profile_access_state(profile_id.as_str()).await;
    assert!(matches!(
        state,
        Ok(state) if state.menus.is_empty()
            && state.submenus.is_empty()
            && state.permissions.is_empty()
    ));
}

#[tokio::test]
async fn merged_overrides_round_trip_into_the_tree() {
    let Some(pool) = test_pool().await else {
        return;
    };

    seed_catalog(&pool).await;
    let profile_id = unique_profile_id("93");
    ensure_profile(&pool, profile_id.as_str(), profile_id.as_str()).await;

    let repository = PostgresAccessRepository::new(pool.clone());
    let desired = BTreeMap::from([("MN9101".to_owned(), true), ("SM9101".to_owned(), true)]);

    let merged = repository.merge_access(profile_id.as_str(), &desired).await;
    assert!(merged.is_ok());

    let catalog = match repository.menu_catalog().await {
        Ok(catalog) => catalog,
        Err(error) => panic!("failed to load menu catalog: {error}"),
    };
    let permissions = match repository.active_permissions().await {
        Ok(permissions) => permissions,
        Err(error) => panic!("failed to load permissions: {error}"),
    };
    let overrides = match repository.profile_access_state(profile_id.as_str()).await {
        Ok(overrides) => overrides,
        Err(error) => panic!("failed to load overrides: {error}"),
    };

    let tree = build_access_tree(&catalog, &permissions, &overrides);
    let Some(menu) = tree.iter().find(|node| node.id == "MN9101") else {
        panic!("seeded menu missing from tree");
    };
    assert!(menu.checked);
    let Some(submenu) = menu.children.iter().find(|node| node.id == "SM9101") else {
        panic!("seeded submenu missing from tree");
    };
    assert!(submenu.checked);
    let Some(permission) = submenu.children.iter().find(|node| node.id == "PM9101") else {
        panic!("seeded permission missing from tree");
    };
    assert!(!permission.checked);
}
