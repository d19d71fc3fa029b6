use serde::{Deserialize, Serialize};

/// An account joined with its public profile.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Public identity of a user, the join target for author names.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub user_id: i64,
    pub username: String,
    pub created_at: String,
}

/// A login session bound to an opaque cookie token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub user_agent: Option<String>,
    pub expires_at: String,
    pub created_at: String,
    pub last_used_at: String,
}

/// A post joined with its author's username and ordered tags.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub author_username: Option<String>,
    pub title: String,
    pub content: String,
    pub created_at: String,
    #[sqlx(skip)]
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Data for inserting a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// A feed entry: a post plus the denormalized like and comment collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPost {
    #[serde(flatten)]
    pub post: Post,
    pub like_user_ids: Vec<i64>,
    pub comment_ids: Vec<i64>,
}

impl FeedPost {
    #[must_use]
    pub fn like_count(&self) -> usize {
        self.like_user_ids.len()
    }

    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.comment_ids.len()
    }

    /// Whether the given user is in this post's like set.
    #[must_use]
    pub fn is_liked_by(&self, user_id: i64) -> bool {
        self.like_user_ids.contains(&user_id)
    }
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: Option<String>,
    pub text: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub post_id: i64,
    pub user_id: i64,
    pub created_at: String,
}

/// Outcome of flipping a user's like on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeToggle {
    Liked,
    Unliked,
}

impl LikeToggle {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Liked => "liked",
            Self::Unliked => "unliked",
        }
    }
}
