//! Runs against a live PostgreSQL when `TEST_DATABASE_URL` is set; skipped otherwise.

use chrono::NaiveDate;

use photos_portal::{
    config::DatabaseSettings,
    db,
    models::{event::NewEvent, user::{BusinessCategory, NewUser}},
    repositories::store::{EventRepository, PgStore, SessionRepository, UserRepository},
};

async fn store() -> Option<PgStore> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = db::create_pool(&DatabaseSettings {
        url,
        max_connections: 4,
    })
    .unwrap();
    db::ping(&pool).await.unwrap();
    db::ensure_schema(&pool).await.unwrap();
    Some(PgStore::new(pool))
}

#[tokio::test]
async fn stores_users_sessions_and_events() {
    let Some(store) = store().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let email = format!("pg-{}@example.com", std::process::id());
    let new_user = NewUser {
        email: email.clone(),
        full_name: "Pg User".to_string(),
        department_number: "ICM 1A".to_string(),
        business_category: BusinessCategory::Teacher,
    };
    let user = store.upsert_user(new_user.clone()).await.unwrap();
    assert_eq!(store.upsert_user(new_user).await.unwrap().id, user.id);

    let token = format!("pg-token-{}", std::process::id());
    store.create_session(&token, user.id).await.unwrap();
    let found = store.user_for_session(&token).await.unwrap().unwrap();
    assert_eq!(found.email, email);

    let event = store
        .create_event(NewEvent {
            name: "Gala".to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 5, 17).unwrap(),
            created_by: user.id,
        })
        .await
        .unwrap();
    assert_eq!(event.name, "Gala");
    assert_eq!(event.created_by, user.id);

    store.delete_session(&token).await.unwrap();
    assert!(store.get_session(&token).await.unwrap().is_none());
}
