/// Integration tests for the note/folder/tag models against a migrated
/// in-memory database

use notegreen_shared::db::migrations::run_migrations;
use notegreen_shared::db::pool::{create_pool, DatabaseConfig};
use notegreen_shared::models::{
    folder::{CreateFolder, Folder},
    note::{CreateNote, Note, UpdateNote},
    note_tag::NoteTag,
    tag::{CreateTag, Tag, UpdateTag},
    user::{CreateUser, User},
};
use sqlx::SqlitePool;
use uuid::Uuid;

async fn setup() -> SqlitePool {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");
    run_migrations(&pool).await.expect("Migrations failed");
    pool
}

async fn folder(pool: &SqlitePool, name: &str) -> Folder {
    Folder::create(pool, CreateFolder { name: name.to_string() })
        .await
        .unwrap()
}

async fn tag(pool: &SqlitePool, name: &str) -> Tag {
    Tag::create(
        pool,
        CreateTag {
            name: name.to_string(),
            color: "#3399FF".to_string(),
        },
    )
    .await
    .unwrap()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_foreign_key_violation())
        .unwrap_or(false)
}

#[tokio::test]
async fn test_folder_names_are_unique() {
    let pool = setup().await;
    folder(&pool, "Work").await;

    let err = Folder::create(&pool, CreateFolder { name: "Work".to_string() })
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err), "unexpected error: {err}");

    let other = folder(&pool, "Home").await;
    let err = Folder::rename(&pool, other.id, "Work").await.unwrap_err();
    assert!(is_unique_violation(&err));

    assert_eq!(
        Folder::find_by_id(&pool, other.id).await.unwrap(),
        Some(other)
    );
}

#[tokio::test]
async fn test_deleting_folder_unfiles_its_notes() {
    let pool = setup().await;
    let work = folder(&pool, "Work").await;

    let created = Note::create(
        &pool,
        CreateNote {
            title: "Standup".to_string(),
            folder_id: Some(work.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(Folder::delete(&pool, work.id).await.unwrap());
    assert!(!Folder::delete(&pool, work.id).await.unwrap());

    let note = Note::find_by_id(&pool, created.note.id).await.unwrap().unwrap();
    assert_eq!(note.folder_id, None);
    assert_eq!(Note::list_by_folder(&pool, None).await.unwrap(), vec![note]);
}

#[tokio::test]
async fn test_deleting_tag_keeps_notes() {
    let pool = setup().await;
    let urgent = tag(&pool, "urgent").await;
    let later = tag(&pool, "later").await;

    let created = Note::create(
        &pool,
        CreateNote {
            title: "Taxes".to_string(),
            tag_ids: vec![urgent.id, later.id],
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(created.tags.len(), 2);

    assert!(Tag::delete(&pool, urgent.id).await.unwrap());

    let note = Note::find_with_tags(&pool, created.note.id).await.unwrap().unwrap();
    assert_eq!(note.tags, vec![later]);
    assert!(Note::list_by_tag(&pool, urgent.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_note_removes_its_associations() {
    let pool = setup().await;
    let urgent = tag(&pool, "urgent").await;

    let created = Note::create(
        &pool,
        CreateNote {
            title: "Gone soon".to_string(),
            tag_ids: vec![urgent.id],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(Note::delete(&pool, created.note.id).await.unwrap());
    assert!(NoteTag::for_note(&pool, created.note.id).await.unwrap().is_empty());
    assert_eq!(Tag::find_by_id(&pool, urgent.id).await.unwrap(), Some(urgent));
}

#[tokio::test]
async fn test_create_note_with_unknown_tag_writes_nothing() {
    let pool = setup().await;

    let err = Note::create(
        &pool,
        CreateNote {
            title: "Orphan".to_string(),
            tag_ids: vec![Uuid::new_v4()],
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(is_foreign_key_violation(&err), "unexpected error: {err}");
    assert!(Note::list(&pool, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_note_is_partial_and_advances_timestamp() {
    let pool = setup().await;
    let work = folder(&pool, "Work").await;
    let a = tag(&pool, "a").await;
    let b = tag(&pool, "b").await;

    let created = Note::create(
        &pool,
        CreateNote {
            title: "Draft".to_string(),
            content: "<p>body</p>".to_string(),
            folder_id: Some(work.id),
            tag_ids: vec![a.id],
        },
    )
    .await
    .unwrap();

    let updated = Note::update(
        &pool,
        created.note.id,
        UpdateNote {
            title: Some("Final".to_string()),
            tag_ids: Some(vec![b.id, b.id]),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.note.title, "Final");
    assert_eq!(updated.note.content, "<p>body</p>");
    assert_eq!(updated.note.folder_id, Some(work.id));
    assert_eq!(updated.note.created_at, created.note.created_at);
    assert!(updated.note.updated_at > created.note.updated_at);
    assert_eq!(updated.tags, vec![b.clone()]);

    let unfiled = Note::update(
        &pool,
        created.note.id,
        UpdateNote {
            folder_id: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(unfiled.note.folder_id, None);
    assert_eq!(unfiled.tags, vec![b]);
    assert!(unfiled.note.updated_at > updated.note.updated_at);
}

#[tokio::test]
async fn test_update_note_with_unknown_folder_is_rolled_back() {
    let pool = setup().await;
    let created = Note::create(
        &pool,
        CreateNote {
            title: "Stay".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let err = Note::update(
        &pool,
        created.note.id,
        UpdateNote {
            title: Some("Moved".to_string()),
            folder_id: Some(Some(Uuid::new_v4())),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(is_foreign_key_violation(&err));

    let note = Note::find_by_id(&pool, created.note.id).await.unwrap().unwrap();
    assert_eq!(note, created.note);
}

#[tokio::test]
async fn test_update_missing_note_returns_none() {
    let pool = setup().await;
    let result = Note::update(&pool, Uuid::new_v4(), UpdateNote::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_list_orders_by_update_and_filters_by_search() {
    let pool = setup().await;

    let first = Note::create(
        &pool,
        CreateNote {
            title: "Shopping list".to_string(),
            content: "Milk and EGGS".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let second = Note::create(
        &pool,
        CreateNote {
            title: "Meeting 100% booked".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Touch the first note so it becomes the most recent
    Note::update(&pool, first.note.id, UpdateNote::default())
        .await
        .unwrap();

    let all = Note::list(&pool, None).await.unwrap();
    let ids: Vec<Uuid> = all.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![first.note.id, second.note.id]);

    let eggs = Note::list(&pool, Some("eggs")).await.unwrap();
    assert_eq!(eggs.len(), 1);
    assert_eq!(eggs[0].id, first.note.id);

    let percent = Note::list(&pool, Some("100%")).await.unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].id, second.note.id);

    assert!(Note::list(&pool, Some("%")).await.unwrap().len() == 1);
    assert_eq!(Note::list(&pool, Some("   ")).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_tag_partial_update() {
    let pool = setup().await;
    let t = tag(&pool, "ideas").await;

    let recolored = Tag::update(
        &pool,
        t.id,
        UpdateTag {
            color: Some("#FFCC00".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(recolored.name, "ideas");
    assert_eq!(recolored.color, "#FFCC00");

    let missing = Tag::update(&pool, Uuid::new_v4(), UpdateTag::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_note_tag_add_is_idempotent() {
    let pool = setup().await;
    let t = tag(&pool, "pinned").await;
    let created = Note::create(
        &pool,
        CreateNote {
            title: "Pin me".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    NoteTag::add(&pool, created.note.id, t.id).await.unwrap();
    NoteTag::add(&pool, created.note.id, t.id).await.unwrap();
    assert_eq!(NoteTag::for_note(&pool, created.note.id).await.unwrap().len(), 1);

    assert!(NoteTag::remove(&pool, created.note.id, t.id).await.unwrap());
    assert!(!NoteTag::remove(&pool, created.note.id, t.id).await.unwrap());
}

#[tokio::test]
async fn test_usernames_are_unique() {
    let pool = setup().await;

    let user = User::create(
        &pool,
        CreateUser {
            username: "ada".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
        },
    )
    .await
    .unwrap();

    let err = User::create(
        &pool,
        CreateUser {
            username: "ada".to_string(),
            password_hash: "$argon2id$other".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(is_unique_violation(&err));

    let found = User::find_by_username(&pool, "ada").await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert!(User::find_by_id(&pool, user.id).await.unwrap().is_some());
    assert!(User::find_by_username(&pool, "ADA").await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_note_updates_on_file_database() {
    let dir = tempfile::TempDir::new().unwrap();
    let pool = create_pool(DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("notes.db").display()),
        max_connections: 8,
        ..Default::default()
    })
    .await
    .expect("Failed to create pool");
    run_migrations(&pool).await.expect("Migrations failed");

    let mut ids = Vec::new();
    for i in 0..8 {
        let created = Note::create(
            &pool,
            CreateNote {
                title: format!("Note {i}"),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        ids.push(created.note.id);
    }

    let mut handles = Vec::new();
    for id in ids.clone() {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            for n in 0..25 {
                Note::update(
                    &pool,
                    id,
                    UpdateNote {
                        content: Some(format!("<p>draft {n}</p>")),
                        ..Default::default()
                    },
                )
                .await?
                .expect("note exists");
            }
            Ok::<_, sqlx::Error>(())
        }));
    }

    for handle in handles {
        handle.await.unwrap().expect("concurrent update failed");
    }

    for id in ids {
        let note = Note::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(note.content, "<p>draft 24</p>");
    }
}
