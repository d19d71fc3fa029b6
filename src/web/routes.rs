use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Form;
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::auth;
use super::flash::{redirect_with_flash, Flash, FlashMessage};
use super::pages;
use super::AppState;
use crate::auth::{MaybeUser, RequireUser};
use crate::content::{normalize_search, validate_comment, PostDraft};
use crate::db::{self as queries, Comment, FeedPost, Like, Post, User};

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(feed))
        .route("/feed/posts", get(feed_fragment))
        .route("/api/posts", get(api_posts))
        .route("/auth", get(auth::auth_page).post(auth::auth_post))
        .route("/auth/logout", post(auth::logout))
        .route("/create", get(create_form).post(create_post))
        .route("/post/:id", get(post_detail))
        .route("/post/:id/comments", post(add_comment))
        .route("/post/:id/like", post(toggle_like))
        .route("/manifest.webmanifest", get(manifest))
        .route("/healthz", get(health))
}

// ========== Feed ==========

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    q: Option<String>,
}

async fn feed(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    flash: Flash,
    Query(params): Query<FeedParams>,
) -> Response {
    let query = normalize_search(params.q.as_deref());

    let (posts, failure) = match queries::list_feed(state.db.pool(), query.as_deref()).await {
        Ok(p) => (p, None),
        Err(e) => {
            tracing::error!("Failed to fetch posts: {e:#}");
            (Vec::new(), Some(FlashMessage::error("Failed to fetch posts")))
        }
    };

    let notice = failure
        .as_ref()
        .map(FlashMessage::alert)
        .or_else(|| flash.alert());

    let page_params = pages::FeedPageParams {
        user: &user,
        posts: &posts,
        query: query.as_deref(),
        debounce_ms: state.config.search_debounce_ms(),
    };

    flash.page(StatusCode::OK, pages::render_feed_page(&page_params, notice))
}

/// The post list alone, fetched by the debounced search box.
async fn feed_fragment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(params): Query<FeedParams>,
) -> Response {
    let query = normalize_search(params.q.as_deref());

    match queries::list_feed(state.db.pool(), query.as_deref()).await {
        Ok(posts) => {
            Html(pages::render_feed_list(&posts, user.id, query.as_deref()).into_string())
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch posts: {e:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch posts").into_response()
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiPostsResponse {
    data: Vec<FeedPost>,
    count: usize,
}

async fn api_posts(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Query(params): Query<FeedParams>,
) -> Response {
    let query = normalize_search(params.q.as_deref());

    match queries::list_feed(state.db.pool(), query.as_deref()).await {
        Ok(posts) => Json(ApiPostsResponse {
            count: posts.len(),
            data: posts,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch posts: {e:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch posts").into_response()
        }
    }
}

// ========== Composer ==========

async fn create_form(RequireUser(user): RequireUser) -> Response {
    Html(pages::render_create_page(&user, &PostDraft::default(), None).into_string())
        .into_response()
}

async fn create_post(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(draft): Form<PostDraft>,
) -> Response {
    let new_post = match draft.validate(user.id) {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(pages::render_create_page(&user, &draft, Some(&e.to_string())).into_string()),
            )
                .into_response();
        }
    };

    match queries::create_post(state.db.pool(), &new_post).await {
        Ok(post_id) => {
            tracing::info!(post_id, author_id = user.id, tags = new_post.tags.len(), "Post created");
            redirect_with_flash("/", &FlashMessage::success("Post created successfully!"))
        }
        Err(e) => {
            tracing::error!("Failed to create post: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(
                    pages::render_create_page(&user, &draft, Some("Failed to create post"))
                        .into_string(),
                ),
            )
                .into_response()
        }
    }
}

// ========== Post detail ==========

/// Outcome of loading everything the detail page shows.
enum Detail {
    Found {
        post: Post,
        comments: Vec<Comment>,
        likes: Vec<Like>,
    },
    Missing,
    Failed,
}

/// Run the three detail reads concurrently.
///
/// Only the post itself is required; comment or like failures degrade to
/// empty lists.
async fn load_detail(pool: &SqlitePool, id: i64) -> Detail {
    let (post, comments, likes) = tokio::join!(
        queries::get_post_with_author(pool, id),
        queries::get_comments_for_post(pool, id),
        queries::get_likes_for_post(pool, id),
    );

    let post = match post {
        Ok(Some(p)) => p,
        Ok(None) => return Detail::Missing,
        Err(e) => {
            tracing::error!(post_id = id, "Failed to fetch post: {e:#}");
            return Detail::Failed;
        }
    };

    let comments = comments.unwrap_or_else(|e| {
        tracing::error!(post_id = id, "Failed to fetch comments: {e:#}");
        Vec::new()
    });
    let likes = likes.unwrap_or_else(|e| {
        tracing::error!(post_id = id, "Failed to fetch likes: {e:#}");
        Vec::new()
    });

    Detail::Found {
        post,
        comments,
        likes,
    }
}

fn post_not_found(user: Option<&User>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(pages::render_not_found_page(user, "Post not found").into_string()),
    )
        .into_response()
}

async fn post_detail(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    flash: Flash,
    Path(raw_id): Path<String>,
) -> Response {
    let Ok(id) = raw_id.parse::<i64>() else {
        return post_not_found(Some(&user));
    };

    match load_detail(state.db.pool(), id).await {
        Detail::Found {
            post,
            comments,
            likes,
        } => {
            let params = pages::PostPageParams {
                user: &user,
                post: &post,
                comments: &comments,
                likes: &likes,
                draft: "",
            };
            flash.page(
                StatusCode::OK,
                pages::render_post_page(&params, flash.alert()),
            )
        }
        Detail::Missing => post_not_found(Some(&user)),
        Detail::Failed => redirect_with_flash("/", &FlashMessage::error("Failed to fetch post")),
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    text: String,
}

async fn add_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(raw_id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Response {
    let Ok(id) = raw_id.parse::<i64>() else {
        return post_not_found(Some(&user));
    };
    let here = format!("/post/{id}");

    let text = match validate_comment(&form.text) {
        Ok(t) => t,
        Err(e) => return redirect_with_flash(&here, &FlashMessage::error(e.to_string())),
    };

    match queries::create_comment(state.db.pool(), id, user.id, text).await {
        Ok(comment_id) => {
            tracing::debug!(comment_id, post_id = id, "Comment added");
            redirect_with_flash(&here, &FlashMessage::success("Comment added successfully!"))
        }
        Err(e) => {
            tracing::error!(post_id = id, "Failed to add comment: {e:#}");

            match load_detail(state.db.pool(), id).await {
                Detail::Found {
                    post,
                    comments,
                    likes,
                } => {
                    let failure = FlashMessage::error("Failed to add comment");
                    let params = pages::PostPageParams {
                        user: &user,
                        post: &post,
                        comments: &comments,
                        likes: &likes,
                        draft: &form.text,
                    };
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Html(
                            pages::render_post_page(&params, Some(failure.alert())).into_string(),
                        ),
                    )
                        .into_response()
                }
                Detail::Missing => post_not_found(Some(&user)),
                Detail::Failed => {
                    redirect_with_flash("/", &FlashMessage::error("Failed to add comment"))
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LikeForm {
    redirect_to: Option<String>,
}

/// Only same-site absolute paths are followed after a like toggle.
fn safe_redirect(target: Option<&str>) -> &str {
    match target {
        Some(t) if t.starts_with('/') && !t.starts_with("//") && !t.contains('\\') => t,
        _ => "/",
    }
}

async fn toggle_like(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(raw_id): Path<String>,
    Form(form): Form<LikeForm>,
) -> Response {
    let target = safe_redirect(form.redirect_to.as_deref());
    let Ok(id) = raw_id.parse::<i64>() else {
        return redirect_with_flash(target, &FlashMessage::error("Failed to update like"));
    };

    match queries::toggle_like(state.db.pool(), id, user.id).await {
        Ok(outcome) => {
            tracing::debug!(post_id = id, user_id = user.id, outcome = outcome.as_str(), "Like toggled");
            Redirect::to(target).into_response()
        }
        Err(e) => {
            tracing::error!(post_id = id, "Failed to update like: {e:#}");
            redirect_with_flash(target, &FlashMessage::error("Failed to update like"))
        }
    }
}

// ========== Misc ==========

/// Web app manifest describing the installable mobile shell.
async fn manifest(State(state): State<AppState>) -> Response {
    let config = &state.config;
    let splash_ms = u64::try_from(config.splash_duration.as_millis()).unwrap_or(u64::MAX);

    let body = serde_json::json!({
        "id": config.app_id,
        "name": config.app_name,
        "short_name": config.app_name,
        "start_url": "/",
        "display": "standalone",
        "background_color": config.splash_background_color,
        "theme_color": config.splash_background_color,
        "splash_duration_ms": splash_ms,
    });

    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        Json(body),
    )
        .into_response()
}

async fn health() -> &'static str {
    "OK"
}

/// Fallback for unknown routes.
pub async fn not_found(MaybeUser(user): MaybeUser) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(pages::render_not_found_page(user.as_ref(), "Oops! Page not found").into_string()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_redirect() {
        assert_eq!(safe_redirect(None), "/");
        assert_eq!(safe_redirect(Some("/")), "/");
        assert_eq!(safe_redirect(Some("/post/4")), "/post/4");
        assert_eq!(safe_redirect(Some("/?q=web%20dev")), "/?q=web%20dev");
        assert_eq!(safe_redirect(Some("//evil.example")), "/");
        assert_eq!(safe_redirect(Some("https://evil.example")), "/");
        assert_eq!(safe_redirect(Some("/\\evil.example")), "/");
        assert_eq!(safe_redirect(Some("")), "/");
    }
}
