use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::debug;

/// Run all pending migrations.
pub async fn run(pool: &SqlitePool) -> Result<()> {
    create_migration_table(pool).await?;
    let current_version = get_schema_version(pool).await?;

    if current_version < 1 {
        debug!("Running migration v1");
        run_migration_v1(pool).await?;
        set_schema_version(pool, 1).await?;
    }

    if current_version < 2 {
        debug!("Running migration v2");
        run_migration_v2(pool).await?;
        set_schema_version(pool, 2).await?;
    }

    if current_version < 3 {
        debug!("Running migration v3");
        run_migration_v3(pool).await?;
        set_schema_version(pool, 3).await?;
    }

    Ok(())
}

async fn create_migration_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS _schema_version (
            version INTEGER PRIMARY KEY
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create schema version table")?;

    Ok(())
}

async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT version FROM _schema_version LIMIT 1")
        .fetch_optional(pool)
        .await
        .context("Failed to get schema version")?;

    Ok(row.map_or(0, |(v,)| v))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("DELETE FROM _schema_version")
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO _schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

async fn run_migration_v1(pool: &SqlitePool) -> Result<()> {
    debug!("Running migration v1: accounts, profiles and sessions");

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    // Public identity used when rendering authors
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS profiles (
            user_id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            username TEXT NOT NULL UNIQUE COLLATE NOCASE,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create profiles table")?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            token TEXT NOT NULL UNIQUE,
            user_agent TEXT,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            last_used_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create sessions table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)")
        .execute(pool)
        .await
        .context("Failed to create sessions user_id index")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at)")
        .execute(pool)
        .await
        .context("Failed to create sessions expires_at index")?;

    Ok(())
}

async fn run_migration_v2(pool: &SqlitePool) -> Result<()> {
    debug!("Running migration v2: posts, tags, comments and likes");

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create posts table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at)")
        .execute(pool)
        .await
        .context("Failed to create posts created_at index")?;

    // Tags keep their entry order; duplicates are allowed
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS post_tags (
            post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            tag TEXT NOT NULL,
            PRIMARY KEY (post_id, position)
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create post_tags table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_post_tags_tag ON post_tags(tag COLLATE NOCASE)")
        .execute(pool)
        .await
        .context("Failed to create post_tags tag index")?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            text TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create comments table")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_comments_post_created ON comments(post_id, created_at)",
    )
    .execute(pool)
    .await
    .context("Failed to create comments post_id index")?;

    // A like is a presence fact: at most one row per (post, user)
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS likes (
            post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (post_id, user_id)
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create likes table")?;

    Ok(())
}

/// Lowercased copies of searchable text. SQLite only folds ASCII, so the
/// folding is done in Rust with full Unicode rules.
async fn run_migration_v3(pool: &SqlitePool) -> Result<()> {
    debug!("Running migration v3: case-folded search columns");

    for statement in [
        "ALTER TABLE posts ADD COLUMN title_folded TEXT NOT NULL DEFAULT ''",
        "ALTER TABLE posts ADD COLUMN content_folded TEXT NOT NULL DEFAULT ''",
        "ALTER TABLE post_tags ADD COLUMN tag_folded TEXT NOT NULL DEFAULT ''",
    ] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to run: {statement}"))?;
    }

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_post_tags_tag_folded ON post_tags(tag_folded)")
        .execute(pool)
        .await
        .context("Failed to create post_tags tag_folded index")?;

    let posts: Vec<(i64, String, String)> = sqlx::query_as("SELECT id, title, content FROM posts")
        .fetch_all(pool)
        .await
        .context("Failed to read posts for backfill")?;
    for (id, title, content) in posts {
        sqlx::query("UPDATE posts SET title_folded = ?, content_folded = ? WHERE id = ?")
            .bind(title.to_lowercase())
            .bind(content.to_lowercase())
            .bind(id)
            .execute(pool)
            .await
            .context("Failed to backfill folded post text")?;
    }

    let tags: Vec<(i64, i64, String)> =
        sqlx::query_as("SELECT post_id, position, tag FROM post_tags")
            .fetch_all(pool)
            .await
            .context("Failed to read tags for backfill")?;
    for (post_id, position, tag) in tags {
        sqlx::query("UPDATE post_tags SET tag_folded = ? WHERE post_id = ? AND position = ?")
            .bind(tag.to_lowercase())
            .bind(post_id)
            .bind(position)
            .execute(pool)
            .await
            .context("Failed to backfill folded tag")?;
    }

    Ok(())
}
