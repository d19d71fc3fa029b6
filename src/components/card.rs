//! Card components for displaying posts in the feed.

use chrono::DateTime;
use maud::{html, Markup, Render};

use super::badge::{Badge, TagList};
use super::button::Button;
use super::form::{Form, HiddenInput};
use crate::db::{FeedPost, Post};

/// Format a stored timestamp as a short calendar date ("Jan 15, 2024").
///
/// Values that do not parse are shown unchanged.
#[must_use]
pub fn display_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp).map_or_else(
        |_| timestamp.to_string(),
        |dt| dt.format("%b %-d, %Y").to_string(),
    )
}

/// The "by alice • Jan 15, 2024" byline under a post title.
#[must_use]
pub fn byline(post: &Post) -> Markup {
    let author = post.author_username.as_deref().unwrap_or("unknown");
    html! {
        p class="byline" {
            "by " span class="author" { (author) } " • " time datetime=(post.created_at) { (display_date(&post.created_at)) }
        }
    }
}

/// Like toggle for a post, submitted as a small POST form.
///
/// `redirect_to` is where the browser lands after the toggle.
#[derive(Debug, Clone, Copy)]
pub struct LikeButton<'a> {
    pub post_id: i64,
    pub count: usize,
    pub liked: bool,
    pub redirect_to: &'a str,
}

impl<'a> LikeButton<'a> {
    #[must_use]
    pub const fn new(post_id: i64, count: usize, liked: bool, redirect_to: &'a str) -> Self {
        Self {
            post_id,
            count,
            liked,
            redirect_to,
        }
    }
}

impl Render for LikeButton<'_> {
    fn render(&self) -> Markup {
        let action = format!("/post/{}/like", self.post_id);
        let (icon, class, aria) = if self.liked {
            ("♥", "like-button liked", "Unlike")
        } else {
            ("♡", "like-button", "Like")
        };
        let label = format!("{icon} {}", self.count);

        Form::post(
            &action,
            html! {
                (HiddenInput::new("redirect_to", self.redirect_to))
                (Button::ghost(&label)
                    .class(class)
                    .r#type("submit")
                    .aria_label(aria)
                    .pressed(self.liked))
            },
        )
        .class("inline-form like-form")
        .render()
    }
}

/// A feed entry: title, byline, clamped content, tags, likes and comment count.
#[derive(Debug, Clone, Copy)]
pub struct PostCard<'a> {
    pub entry: &'a FeedPost,
    pub viewer_id: i64,
    pub redirect_to: &'a str,
}

impl<'a> PostCard<'a> {
    #[must_use]
    pub const fn new(entry: &'a FeedPost, viewer_id: i64, redirect_to: &'a str) -> Self {
        Self {
            entry,
            viewer_id,
            redirect_to,
        }
    }
}

impl Render for PostCard<'_> {
    fn render(&self) -> Markup {
        let post = &self.entry.post;
        let href = format!("/post/{}", post.id);
        let comments = format!("💬 {}", self.entry.comment_count());

        html! {
            article class="post-card" data-post-id=(post.id) {
                header {
                    h3 { a href=(href) { (post.title) } }
                    (byline(post))
                }
                p class="post-excerpt" { (post.content) }
                (TagList::new(&post.tags))
                footer class="post-actions" {
                    (LikeButton::new(
                        post.id,
                        self.entry.like_count(),
                        self.entry.is_liked_by(self.viewer_id),
                        self.redirect_to,
                    ))
                    a href=(href) class="comment-link" {
                        (Badge::new(&comments, "badge badge-count"))
                    }
                }
            }
        }
    }
}

/// An empty state message.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl<'a> EmptyState<'a> {
    /// Create a new empty state.
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }

    /// Feed with no posts at all.
    #[must_use]
    pub const fn no_posts() -> Self {
        Self {
            message: "No posts found. Create the first one!",
        }
    }

    /// Feed search with no matches.
    #[must_use]
    pub const fn no_results() -> Self {
        Self {
            message: "No posts match your search.",
        }
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="empty-state" { (self.message) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_post(likes: Vec<i64>, comments: Vec<i64>) -> FeedPost {
        FeedPost {
            post: Post {
                id: 42,
                author_id: 1,
                author_username: Some("alice".to_string()),
                title: "Hello".to_string(),
                content: "World".to_string(),
                created_at: "2024-01-15T12:00:00.000Z".to_string(),
                tags: vec!["x".to_string(), "y".to_string()],
            },
            like_user_ids: likes,
            comment_ids: comments,
        }
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-01-15T12:00:00.000Z"), "Jan 15, 2024");
        assert_eq!(display_date("2024-03-05T00:00:00Z"), "Mar 5, 2024");
        assert_eq!(display_date("not a date"), "not a date");
    }

    #[test]
    fn test_like_button_states() {
        let html = LikeButton::new(7, 2, true, "/").render().into_string();
        assert!(html.contains(r#"action="/post/7/like""#));
        assert!(html.contains("like-button liked"));
        assert!(html.contains("♥ 2"));
        assert!(html.contains(r#"name="redirect_to" value="/""#));

        let html = LikeButton::new(7, 0, false, "/post/7").render().into_string();
        assert!(!html.contains("liked"));
        assert!(html.contains("♡ 0"));
        assert!(html.contains(r#"value="/post/7""#));
    }

    #[test]
    fn test_post_card_render() {
        let entry = feed_post(vec![1, 2], vec![10]);
        let html = PostCard::new(&entry, 2, "/?q=rust").render().into_string();

        assert!(html.contains(r#"<a href="/post/42">Hello</a>"#));
        assert!(html.contains("alice"));
        assert!(html.contains("Jan 15, 2024"));
        assert!(html.contains("World"));
        assert!(html.contains("#x"));
        assert!(html.contains("#y"));
        assert!(html.contains("♥ 2"));
        assert!(html.contains("liked"));
        assert!(html.contains("💬 1"));
        assert!(html.contains(r#"value="/?q=rust""#));
    }

    #[test]
    fn test_post_card_not_liked_by_viewer() {
        let entry = feed_post(vec![1], vec![]);
        let html = PostCard::new(&entry, 5, "/").render().into_string();
        assert!(html.contains("♡ 1"));
        assert!(html.contains(r#"aria-pressed="false""#));
    }

    #[test]
    fn test_empty_state() {
        let html = EmptyState::no_results().render().into_string();
        assert!(html.contains("No posts match your search."));
    }
}
