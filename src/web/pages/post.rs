//! Post detail page: the post, its likes and its comment thread.

use maud::{html, Markup};

use crate::components::{
    byline, display_date, Alert, Badge, BaseLayout, Button, Form, LikeButton, TagList, TextArea,
};
use crate::db::{Comment, Like, Post, User};

/// Parameters for rendering the post detail page.
#[derive(Debug)]
pub struct PostPageParams<'a> {
    pub user: &'a User,
    pub post: &'a Post,
    pub comments: &'a [Comment],
    pub likes: &'a [Like],
    /// Comment text to put back in the box after a failed submission.
    pub draft: &'a str,
}

/// Render the post detail page.
#[must_use]
pub fn render_post_page(params: &PostPageParams<'_>, notice: Option<Alert<'_>>) -> Markup {
    let post = params.post;
    let here = format!("/post/{}", post.id);
    let liked = params.likes.iter().any(|l| l.user_id == params.user.id);
    let comment_count = format!("💬 {}", params.comments.len());
    let comments_action = format!("/post/{}/comments", post.id);

    let content = html! {
        p { (Button::outline("← Back to Feed").href("/")) }

        article class="post-detail" {
            header {
                h1 { (post.title) }
                (byline(post))
            }
            div class="post-content" { (post.content) }
            (TagList::new(&post.tags))
            footer class="post-actions" {
                (LikeButton::new(post.id, params.likes.len(), liked, &here))
                (Badge::new(&comment_count, "badge badge-count"))
            }
        }

        section class="comment-composer" {
            h2 { "Add a Comment" }
            (Form::post(&comments_action, html! {
                (TextArea::new("text")
                    .placeholder("Share your thoughts...")
                    .rows(3)
                    .value(params.draft)
                    .required())
                (Button::primary("Post Comment").r#type("submit"))
            }).id("comment-form"))
        }

        section class="comments" {
            h2 { "Comments (" (params.comments.len()) ")" }
            @if params.comments.is_empty() {
                p class="empty-state" { "No comments yet. Be the first to comment!" }
            } @else {
                @for comment in params.comments {
                    (render_comment(comment))
                }
            }
        }
    };

    BaseLayout::new(&post.title, Some(params.user))
        .with_notice(notice)
        .render(content)
}

fn render_comment(comment: &Comment) -> Markup {
    html! {
        article class="comment" id=(format!("comment-{}", comment.id)) {
            header class="comment-meta" {
                strong { (comment.author_username.as_deref().unwrap_or("unknown")) }
                time datetime=(comment.created_at) { (display_date(&comment.created_at)) }
            }
            p class="comment-text" { (comment.text) }
        }
    }
}
