use std::collections::HashMap;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{PgConnection, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::activity::{Activity, ActivityId, Comment, CommentId};
use crate::domain::user::{AppUser, Photo, UserId};

use super::{Change, ContextFactory, DataContext};

// ============================================================================
// Postgres Store - sqlx adapter
// ============================================================================
//
// Each context runs inside one transaction, begun lazily on first use.
// `write_changes` sends every staged change inside it and `commit` ends it;
// a context dropped before `commit` rolls the transaction back.
//
// Tables:
// - users / photos:          identity records, read only here
// - activities / comments:   the aggregate and its children
//
// ============================================================================

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        display_name TEXT NOT NULL,
        bio TEXT
    )",
    "CREATE TABLE IF NOT EXISTS photos (
        id TEXT PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        url TEXT NOT NULL,
        is_main BOOLEAN NOT NULL DEFAULT FALSE
    )",
    "CREATE TABLE IF NOT EXISTS activities (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        date TIMESTAMPTZ NOT NULL,
        description TEXT,
        category TEXT,
        city TEXT,
        venue TEXT,
        is_cancelled BOOLEAN NOT NULL DEFAULT FALSE
    )",
    "CREATE TABLE IF NOT EXISTS comments (
        id UUID PRIMARY KEY,
        body TEXT NOT NULL,
        author_id UUID NOT NULL REFERENCES users (id),
        activity_id UUID NOT NULL REFERENCES activities (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL
    )",
];

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("failed to connect to Postgres")?;
        Ok(Self::new(pool))
    }

    /// Create the tables this crate reads and writes, if missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA.iter().copied() {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("Postgres schema ready");
        Ok(())
    }

    /// Insert the user and photos unless the username already exists.
    pub async fn ensure_user(&self, user: &AppUser) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO users (id, username, display_name, bio) VALUES ($1, $2, $3, $4)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(user.id.0)
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.bio)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted > 0 {
            for photo in &user.photos {
                sqlx::query("INSERT INTO photos (id, user_id, url, is_main) VALUES ($1, $2, $3, $4)")
                    .bind(&photo.id)
                    .bind(user.id.0)
                    .bind(&photo.url)
                    .bind(photo.is_main)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ContextFactory for PgStore {
    async fn open(&self) -> Result<Box<dyn DataContext>> {
        Ok(Box::new(PgDataContext {
            pool: self.pool.clone(),
            tx: None,
            pending: Vec::new(),
        }))
    }
}

struct PgDataContext {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
    pending: Vec<Change>,
}

impl PgDataContext {
    async fn conn(&mut self) -> Result<&mut PgConnection> {
        if self.tx.is_none() {
            self.tx = Some(self.pool.begin().await?);
        }
        match self.tx.as_mut() {
            Some(tx) => Ok(&mut **tx),
            None => anyhow::bail!("transaction not available"),
        }
    }

    async fn load_photos(&mut self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Photo>>> {
        let rows = sqlx::query("SELECT id, user_id, url, is_main FROM photos WHERE user_id = ANY($1)")
            .bind(user_ids)
            .fetch_all(self.conn().await?)
            .await?;

        let mut photos: HashMap<Uuid, Vec<Photo>> = HashMap::new();
        for row in rows {
            let user_id: Uuid = row.try_get("user_id")?;
            photos.entry(user_id).or_default().push(Photo {
                id: row.try_get("id")?,
                url: row.try_get("url")?,
                is_main: row.try_get("is_main")?,
            });
        }
        Ok(photos)
    }

    async fn load_comments(&mut self, activity_id: ActivityId) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT c.id, c.body, c.created_at,
                    u.id AS user_id, u.username, u.display_name, u.bio
             FROM comments c
             JOIN users u ON u.id = c.author_id
             WHERE c.activity_id = $1
             ORDER BY c.created_at ASC",
        )
        .bind(activity_id.0)
        .fetch_all(self.conn().await?)
        .await?;

        let user_ids: Vec<Uuid> = rows
            .iter()
            .map(|row| row.try_get::<Uuid, _>("user_id"))
            .collect::<Result<_, _>>()?;
        let photos = self.load_photos(&user_ids).await?;

        let mut comments = Vec::with_capacity(rows.len());
        for row in rows {
            let mut author = user_from_row(&row)?;
            author.photos = photos.get(&author.id.0).cloned().unwrap_or_default();
            comments.push(Comment {
                id: CommentId(row.try_get("id")?),
                body: row.try_get("body")?,
                author,
                activity_id,
                created_at: row.try_get("created_at")?,
            });
        }

        tracing::debug!(activity_id = %activity_id, count = comments.len(), "Loaded comments");
        Ok(comments)
    }

    async fn write(&mut self, change: &Change) -> Result<u64> {
        let conn = self.conn().await?;
        let result = match change {
            Change::InsertActivity(activity) => {
                sqlx::query(
                    "INSERT INTO activities (id, title, date, description, category, city, venue, is_cancelled)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                )
                .bind(activity.id.0)
                .bind(&activity.title)
                .bind(activity.date)
                .bind(&activity.description)
                .bind(&activity.category)
                .bind(&activity.city)
                .bind(&activity.venue)
                .bind(activity.is_cancelled)
                .execute(conn)
                .await?
            }
            Change::UpdateActivity(activity) => {
                // IS DISTINCT FROM keeps no-op edits at zero affected rows
                sqlx::query(
                    "UPDATE activities
                     SET title = $2, date = $3, description = $4, category = $5,
                         city = $6, venue = $7, is_cancelled = $8
                     WHERE id = $1
                       AND (title, date, description, category, city, venue, is_cancelled)
                           IS DISTINCT FROM ($2, $3, $4, $5, $6, $7, $8)",
                )
                .bind(activity.id.0)
                .bind(&activity.title)
                .bind(activity.date)
                .bind(&activity.description)
                .bind(&activity.category)
                .bind(&activity.city)
                .bind(&activity.venue)
                .bind(activity.is_cancelled)
                .execute(conn)
                .await?
            }
            Change::InsertComment(comment) => {
                sqlx::query(
                    "INSERT INTO comments (id, body, author_id, activity_id, created_at)
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(comment.id.0)
                .bind(&comment.body)
                .bind(comment.author.id.0)
                .bind(comment.activity_id.0)
                .bind(comment.created_at)
                .execute(conn)
                .await?
            }
        };
        Ok(result.rows_affected())
    }
}

fn user_from_row(row: &PgRow) -> Result<AppUser> {
    Ok(AppUser {
        id: UserId(row.try_get("user_id")?),
        username: row.try_get("username")?,
        display_name: row.try_get("display_name")?,
        bio: row.try_get("bio")?,
        photos: Vec::new(),
    })
}

#[async_trait]
impl DataContext for PgDataContext {
    async fn find_activity(&mut self, id: ActivityId) -> Result<Option<Activity>> {
        let row = sqlx::query(
            "SELECT id, title, date, description, category, city, venue, is_cancelled
             FROM activities WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(self.conn().await?)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let date: DateTime<Utc> = row.try_get("date")?;
        Ok(Some(Activity {
            id,
            title: row.try_get("title")?,
            date,
            description: row.try_get::<Option<String>, _>("description")?.unwrap_or_default(),
            category: row.try_get::<Option<String>, _>("category")?.unwrap_or_default(),
            city: row.try_get::<Option<String>, _>("city")?.unwrap_or_default(),
            venue: row.try_get::<Option<String>, _>("venue")?.unwrap_or_default(),
            is_cancelled: row.try_get("is_cancelled")?,
            comments: Vec::new(),
        }))
    }

    async fn find_activity_with_comments(&mut self, id: ActivityId) -> Result<Option<Activity>> {
        let Some(mut activity) = self.find_activity(id).await? else {
            return Ok(None);
        };
        activity.comments = self.load_comments(id).await?;
        Ok(Some(activity))
    }

    async fn find_user_with_photos(&mut self, username: &str) -> Result<Option<AppUser>> {
        let rows = sqlx::query(
            "SELECT id AS user_id, username, display_name, bio FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_all(self.conn().await?)
        .await?;

        // Single-or-default: more than one match is a data fault.
        if rows.len() > 1 {
            anyhow::bail!("username {username} matches {} users", rows.len());
        }
        let Some(row) = rows.first() else {
            return Ok(None);
        };

        let mut user = user_from_row(row)?;
        user.photos = self
            .load_photos(&[user.id.0])
            .await?
            .remove(&user.id.0)
            .unwrap_or_default();
        Ok(Some(user))
    }

    fn add_activity(&mut self, activity: &Activity) {
        self.pending.push(Change::InsertActivity(activity.clone()));
    }

    fn update_activity(&mut self, activity: &Activity) {
        self.pending.push(Change::UpdateActivity(activity.clone()));
    }

    fn stage_comment(&mut self, comment: &Comment) {
        self.pending.push(Change::InsertComment(comment.clone()));
    }

    async fn write_changes(&mut self) -> Result<u64> {
        let pending = std::mem::take(&mut self.pending);
        let mut affected = 0;
        for change in &pending {
            affected += self.write(change).await?;
        }

        tracing::debug!(affected, changes = pending.len(), "Postgres changes written");
        Ok(affected)
    }

    async fn commit(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
            tracing::debug!("Postgres transaction committed");
        }
        Ok(())
    }
}
