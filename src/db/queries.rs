use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;

use super::models::{Comment, FeedPost, Like, LikeToggle, NewPost, Post, Profile, Session, User};

/// Upper bound on bound parameters per `IN (...)` batch.
const BATCH_SIZE: usize = 500;

const USER_SELECT: &str = r"
    SELECT u.id, u.email, p.username, u.password_hash, u.created_at
    FROM users u
    JOIN profiles p ON p.user_id = u.id
";

const POST_SELECT: &str = r"
    SELECT p.id, p.author_id, pr.username AS author_username, p.title, p.content, p.created_at
    FROM posts p
    LEFT JOIN profiles pr ON pr.user_id = p.author_id
";

/// Format a timestamp the same way the schema defaults do
/// (`2024-01-15T12:00:00.000Z`), so stored values compare as strings.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

/// Escape `LIKE` wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// The constraint message of a unique-key violation anywhere in `err`'s
/// chain, e.g. `UNIQUE constraint failed: users.email`.
#[must_use]
pub fn unique_violation(err: &anyhow::Error) -> Option<&str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<sqlx::Error>())
        .and_then(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Some(db.message()),
            _ => None,
        })
}

// ========== Users & Profiles ==========

/// Create an account and its profile in one transaction.
pub async fn create_user_with_profile(
    pool: &SqlitePool,
    email: &str,
    username: &str,
    password_hash: &str,
) -> Result<i64> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin user transaction")?;

    let result = sqlx::query("INSERT INTO users (email, password_hash) VALUES (?, ?)")
        .bind(email)
        .bind(password_hash)
        .execute(&mut *tx)
        .await
        .context("Failed to create user")?;
    let user_id = result.last_insert_rowid();

    sqlx::query("INSERT INTO profiles (user_id, username) VALUES (?, ?)")
        .bind(user_id)
        .bind(username)
        .execute(&mut *tx)
        .await
        .context("Failed to create profile")?;

    tx.commit().await.context("Failed to commit new user")?;

    Ok(user_id)
}

/// Get a user by ID.
pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    sqlx::query_as(&format!("{USER_SELECT} WHERE u.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch user by id")
}

/// Get a user by email (case-insensitive).
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    sqlx::query_as(&format!("{USER_SELECT} WHERE u.email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch user by email")
}

/// Check whether an email is already registered.
pub async fn email_exists(pool: &SqlitePool, email: &str) -> Result<bool> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await
        .context("Failed to check email")?;

    Ok(row.0 > 0)
}

/// Check whether a username is already taken.
pub async fn username_exists(pool: &SqlitePool, username: &str) -> Result<bool> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await
        .context("Failed to check username")?;

    Ok(row.0 > 0)
}

/// Get a user's public profile.
pub async fn get_profile(pool: &SqlitePool, user_id: i64) -> Result<Option<Profile>> {
    sqlx::query_as("SELECT user_id, username, created_at FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch profile")
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .context("Failed to count users")?;
    Ok(row.0)
}

// ========== Sessions ==========

/// Create a new session.
pub async fn create_session(
    pool: &SqlitePool,
    user_id: i64,
    token: &str,
    user_agent: Option<&str>,
    expires_at: &str,
) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO sessions (user_id, token, user_agent, expires_at)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(user_id)
    .bind(token)
    .bind(user_agent)
    .bind(expires_at)
    .execute(pool)
    .await
    .context("Failed to create session")?;

    Ok(result.last_insert_rowid())
}

/// Get a session by token.
pub async fn get_session_by_token(pool: &SqlitePool, token: &str) -> Result<Option<Session>> {
    sqlx::query_as("SELECT * FROM sessions WHERE token = ?")
        .bind(token)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch session by token")
}

/// Update session last_used_at.
pub async fn update_session_last_used(pool: &SqlitePool, session_id: i64) -> Result<()> {
    sqlx::query("UPDATE sessions SET last_used_at = ? WHERE id = ?")
        .bind(format_timestamp(Utc::now()))
        .bind(session_id)
        .execute(pool)
        .await
        .context("Failed to update session last_used")?;
    Ok(())
}

/// Delete a session by token.
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await
        .context("Failed to delete session")?;
    Ok(())
}

/// Delete all sessions of a user. Returns the number removed.
pub async fn delete_user_sessions(pool: &SqlitePool, user_id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to delete user sessions")?;
    Ok(result.rows_affected())
}

/// Delete sessions whose expiry is in the past. Returns the number removed.
pub async fn delete_expired_sessions(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
        .bind(format_timestamp(Utc::now()))
        .execute(pool)
        .await
        .context("Failed to delete expired sessions")?;
    Ok(result.rows_affected())
}

// ========== Posts ==========

/// Insert a post and its ordered tags.
pub async fn create_post(pool: &SqlitePool, post: &NewPost) -> Result<i64> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin post transaction")?;

    let result = sqlx::query(
        r"
        INSERT INTO posts (author_id, title, content, title_folded, content_folded)
        VALUES (?, ?, ?, ?, ?)
        ",
    )
    .bind(post.author_id)
    .bind(&post.title)
    .bind(&post.content)
    .bind(post.title.to_lowercase())
    .bind(post.content.to_lowercase())
    .execute(&mut *tx)
    .await
    .context("Failed to insert post")?;
    let post_id = result.last_insert_rowid();

    for (position, tag) in post.tags.iter().enumerate() {
        sqlx::query(
            "INSERT INTO post_tags (post_id, position, tag, tag_folded) VALUES (?, ?, ?, ?)",
        )
        .bind(post_id)
        .bind(i64::try_from(position).context("Too many tags")?)
        .bind(tag)
        .bind(tag.to_lowercase())
        .execute(&mut *tx)
        .await
        .context("Failed to insert post tag")?;
    }

    tx.commit().await.context("Failed to commit post")?;

    Ok(post_id)
}

/// Get a single post with its author and tags.
pub async fn get_post_with_author(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    let post: Option<Post> = sqlx::query_as(&format!("{POST_SELECT} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch post")?;

    let Some(mut post) = post else {
        return Ok(None);
    };

    post.tags = tags_for_posts(pool, &[id])
        .await?
        .remove(&id)
        .unwrap_or_default();

    Ok(Some(post))
}

/// List the feed, newest first, optionally filtered by a search term.
///
/// A post matches when its title or content contains the term, or one of its
/// tags equals the term, ignoring case. Matching runs against the lowercased
/// copies written at insert time, since SQLite folds ASCII only. Callers pass
/// `None` for an unrestricted feed.
pub async fn list_feed(pool: &SqlitePool, search: Option<&str>) -> Result<Vec<FeedPost>> {
    let posts: Vec<Post> = match search {
        None => {
            let sql = format!("{POST_SELECT} ORDER BY p.created_at DESC, p.id DESC");
            sqlx::query_as(&sql)
                .fetch_all(pool)
                .await
                .context("Failed to fetch feed")?
        }
        Some(term) => {
            let folded = term.to_lowercase();
            let pattern = format!("%{}%", escape_like(&folded));
            let sql = format!(
                r"
                {POST_SELECT}
                WHERE p.title_folded LIKE ? ESCAPE '\'
                   OR p.content_folded LIKE ? ESCAPE '\'
                   OR EXISTS (
                       SELECT 1 FROM post_tags t
                       WHERE t.post_id = p.id AND t.tag_folded = ?
                   )
                ORDER BY p.created_at DESC, p.id DESC
                "
            );
            sqlx::query_as(&sql)
                .bind(&pattern)
                .bind(&pattern)
                .bind(&folded)
                .fetch_all(pool)
                .await
                .context("Failed to search feed")?
        }
    };

    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    let mut tags = tags_for_posts(pool, &ids).await?;
    let mut likes = like_user_ids_for_posts(pool, &ids).await?;
    let mut comments = comment_ids_for_posts(pool, &ids).await?;

    Ok(posts
        .into_iter()
        .map(|mut post| {
            post.tags = tags.remove(&post.id).unwrap_or_default();
            FeedPost {
                like_user_ids: likes.remove(&post.id).unwrap_or_default(),
                comment_ids: comments.remove(&post.id).unwrap_or_default(),
                post,
            }
        })
        .collect())
}

/// Count total posts.
pub async fn count_posts(pool: &SqlitePool) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await
        .context("Failed to count posts")?;
    Ok(row.0)
}

async fn tags_for_posts(pool: &SqlitePool, post_ids: &[i64]) -> Result<HashMap<i64, Vec<String>>> {
    let mut grouped: HashMap<i64, Vec<String>> = HashMap::new();

    for chunk in post_ids.chunks(BATCH_SIZE) {
        let sql = format!(
            "SELECT post_id, tag FROM post_tags WHERE post_id IN ({}) ORDER BY post_id, position",
            placeholders(chunk.len())
        );
        let mut query = sqlx::query_as::<_, (i64, String)>(&sql);
        for id in chunk {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(pool)
            .await
            .context("Failed to fetch post tags")?;

        for (post_id, tag) in rows {
            grouped.entry(post_id).or_default().push(tag);
        }
    }

    Ok(grouped)
}

async fn like_user_ids_for_posts(
    pool: &SqlitePool,
    post_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>> {
    let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();

    for chunk in post_ids.chunks(BATCH_SIZE) {
        let sql = format!(
            "SELECT post_id, user_id FROM likes WHERE post_id IN ({}) ORDER BY created_at, user_id",
            placeholders(chunk.len())
        );
        let mut query = sqlx::query_as::<_, (i64, i64)>(&sql);
        for id in chunk {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(pool)
            .await
            .context("Failed to fetch post likes")?;

        for (post_id, user_id) in rows {
            grouped.entry(post_id).or_default().push(user_id);
        }
    }

    Ok(grouped)
}

async fn comment_ids_for_posts(
    pool: &SqlitePool,
    post_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>> {
    let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();

    for chunk in post_ids.chunks(BATCH_SIZE) {
        let sql = format!(
            "SELECT post_id, id FROM comments WHERE post_id IN ({}) ORDER BY created_at, id",
            placeholders(chunk.len())
        );
        let mut query = sqlx::query_as::<_, (i64, i64)>(&sql);
        for id in chunk {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(pool)
            .await
            .context("Failed to fetch post comment ids")?;

        for (post_id, comment_id) in rows {
            grouped.entry(post_id).or_default().push(comment_id);
        }
    }

    Ok(grouped)
}

// ==================== Comment Queries ====================

/// Create a comment on a post.
pub async fn create_comment(
    pool: &SqlitePool,
    post_id: i64,
    author_id: i64,
    text: &str,
) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO comments (post_id, author_id, text)
        VALUES (?, ?, ?)
        ",
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(result.last_insert_rowid())
}

/// Get all comments for a post with author info, oldest first.
pub async fn get_comments_for_post(pool: &SqlitePool, post_id: i64) -> Result<Vec<Comment>> {
    sqlx::query_as(
        r"
        SELECT c.id, c.post_id, c.author_id, p.username AS author_username, c.text, c.created_at
        FROM comments c
        LEFT JOIN profiles p ON p.user_id = c.author_id
        WHERE c.post_id = ?
        ORDER BY c.created_at ASC, c.id ASC
        ",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .context("Failed to get comments for post")
}

// ==================== Like Queries ====================

/// Get the like set of a post.
pub async fn get_likes_for_post(pool: &SqlitePool, post_id: i64) -> Result<Vec<Like>> {
    sqlx::query_as(
        "SELECT post_id, user_id, created_at FROM likes WHERE post_id = ? ORDER BY created_at, user_id",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .context("Failed to get likes for post")
}

/// Check whether a user likes a post.
pub async fn has_liked(pool: &SqlitePool, post_id: i64, user_id: i64) -> Result<bool> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
            .context("Failed to check like")?;

    Ok(row.0 > 0)
}

/// Add a like. Fails if the pair already exists.
pub async fn insert_like(pool: &SqlitePool, post_id: i64, user_id: i64) -> Result<()> {
    sqlx::query("INSERT INTO likes (post_id, user_id) VALUES (?, ?)")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to insert like")?;
    Ok(())
}

/// Remove a like. Returns whether a row was deleted.
pub async fn delete_like(pool: &SqlitePool, post_id: i64, user_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM likes WHERE post_id = ? AND user_id = ?")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to delete like")?;
    Ok(result.rows_affected() > 0)
}

/// Flip the user's like on a post: remove it if present, add it otherwise.
pub async fn toggle_like(pool: &SqlitePool, post_id: i64, user_id: i64) -> Result<LikeToggle> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin like transaction")?;

    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to check like")?;

    let outcome = if row.0 > 0 {
        sqlx::query("DELETE FROM likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete like")?;
        LikeToggle::Unliked
    } else {
        sqlx::query("INSERT INTO likes (post_id, user_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to insert like")?;
        LikeToggle::Liked
    };

    tx.commit().await.context("Failed to commit like toggle")?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("rust"), "rust");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?,?,?");
    }

    #[test]
    fn test_format_timestamp_matches_schema_default() {
        let at = DateTime::parse_from_rfc3339("2024-01-15T12:00:00.5+00:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(at), "2024-01-15T12:00:00.500Z");
    }
}
