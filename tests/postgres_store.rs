//! Runs against a live Postgres when `DATABASE_URL` is set; otherwise each
//! test returns early.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use activity_comments::core::CancellationSignal;
use activity_comments::domain::activity::{Activity, ActivityId, ActivityInput};
use activity_comments::domain::user::{AppUser, Photo};
use activity_comments::persistence::{save_changes, ContextFactory, DataContext, PgStore};

async fn store() -> Option<PgStore> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let store = PgStore::connect(&url, 2).await.unwrap();
    store.ensure_schema().await.unwrap();
    Some(store)
}

fn activity(title: &str) -> Activity {
    Activity::new(
        ActivityId::random(),
        ActivityInput {
            title: title.into(),
            date: Utc.with_ymd_and_hms(2026, 11, 5, 19, 30, 0).unwrap(),
            description: "Activity 1 month in future".into(),
            category: "culture".into(),
            city: "London".into(),
            venue: "British Museum".into(),
        },
    )
}

fn unique_user() -> AppUser {
    let suffix = Uuid::new_v4().simple().to_string();
    AppUser::new(format!("user-{suffix}"), "Tester").with_photo(Photo {
        id: format!("photo-{suffix}"),
        url: format!("https://img.example/{suffix}.jpg"),
        is_main: true,
    })
}

async fn insert(store: &PgStore, activity: &Activity) {
    let mut ctx = store.open().await.unwrap();
    ctx.add_activity(activity);
    let affected = save_changes(ctx.as_mut(), &CancellationSignal::never()).await.unwrap();
    assert_eq!(affected, 1);
}

#[tokio::test]
async fn dropped_context_rolls_back_written_rows() {
    let Some(store) = store().await else { return };
    let pending = activity("Never committed");

    {
        let mut ctx = store.open().await.unwrap();
        ctx.add_activity(&pending);
        assert_eq!(ctx.write_changes().await.unwrap(), 1);
    }

    let mut ctx = store.open().await.unwrap();
    assert!(ctx.find_activity(pending.id).await.unwrap().is_none());
}

#[tokio::test]
async fn unchanged_update_affects_no_rows() {
    let Some(store) = store().await else { return };
    let seeded = activity("Museum tour");
    insert(&store, &seeded).await;

    let mut ctx = store.open().await.unwrap();
    let loaded = ctx.find_activity(seeded.id).await.unwrap().unwrap();
    ctx.update_activity(&loaded);
    assert_eq!(save_changes(ctx.as_mut(), &CancellationSignal::never()).await.unwrap(), 0);

    let mut ctx = store.open().await.unwrap();
    let mut edited = loaded.clone();
    edited.venue = "Tate Modern".into();
    ctx.update_activity(&edited);
    assert_eq!(save_changes(ctx.as_mut(), &CancellationSignal::never()).await.unwrap(), 1);
}

#[tokio::test]
async fn user_is_found_with_photos() {
    let Some(store) = store().await else { return };
    let user = unique_user();
    store.ensure_user(&user).await.unwrap();

    let mut ctx = store.open().await.unwrap();
    let found = ctx.find_user_with_photos(&user.username).await.unwrap().unwrap();

    assert_eq!(found, user);
    assert_eq!(found.main_photo().map(|p| p.url.as_str()), Some(user.photos[0].url.as_str()));
    assert!(ctx.find_user_with_photos("nobody-by-this-name").await.unwrap().is_none());
}

#[tokio::test]
async fn committed_comment_is_loaded_with_its_author() {
    let Some(store) = store().await else { return };
    let user = unique_user();
    store.ensure_user(&user).await.unwrap();
    let seeded = activity("Gallery night");
    insert(&store, &seeded).await;

    let mut ctx = store.open().await.unwrap();
    let mut loaded = ctx.find_activity(seeded.id).await.unwrap().unwrap();
    let comment = loaded.add_comment(user.clone(), "Nice event!").unwrap().clone();
    ctx.stage_comment(&comment);
    assert_eq!(save_changes(ctx.as_mut(), &CancellationSignal::never()).await.unwrap(), 1);

    let mut ctx = store.open().await.unwrap();
    let shallow = ctx.find_activity(seeded.id).await.unwrap().unwrap();
    let full = ctx.find_activity_with_comments(seeded.id).await.unwrap().unwrap();

    assert!(shallow.comments.is_empty());
    assert_eq!(full.comments.len(), 1);
    assert_eq!(full.comments[0].id, comment.id);
    assert_eq!(full.comments[0].body, "Nice event!");
    assert_eq!(full.comments[0].author, user);
}
