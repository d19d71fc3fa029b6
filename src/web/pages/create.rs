//! Post composer page.

use maud::{html, Markup, Render};

use crate::components::{Alert, BaseLayout, Button, Form, FormGroup, Input, TextArea};
use crate::content::PostDraft;
use crate::db::User;

/// Render the composer, pre-filled with `draft`.
///
/// `error` is shown above the form when a submission was rejected.
#[must_use]
pub fn render_create_page(user: &User, draft: &PostDraft, error: Option<&str>) -> Markup {
    let content = html! {
        h1 { "Create New Post" }
        article class="composer" {
            header { h2 { "Share your thoughts with the community" } }

            @if let Some(error) = error {
                (Alert::error(error))
            }

            (Form::post("/create", html! {
                (FormGroup::new("Title", "title", Input::text("title")
                    .id("title")
                    .value(&draft.title)
                    .placeholder("Enter a catchy title for your post")
                    .required()
                    .render()))
                (FormGroup::new("Content", "content", TextArea::new("content")
                    .id("content")
                    .value(&draft.content)
                    .placeholder("Write your post content here...")
                    .rows(8)
                    .required()
                    .render()))
                (FormGroup::new("Tags (optional)", "tags", Input::text("tags")
                    .id("tags")
                    .value(&draft.tags)
                    .placeholder("Enter tags separated by commas (e.g., javascript, react, web-dev)")
                    .render())
                    .help("Tags help others discover your post"))
                div class="form-actions" {
                    (Button::primary("Create Post").r#type("submit"))
                    (Button::outline("Cancel").href("/"))
                }
            }).id("create-post-form"))
        }
    };

    BaseLayout::new("Create Post", Some(user)).render(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            password_hash: String::new(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_empty_composer() {
        let html = render_create_page(&user(), &PostDraft::default(), None).into_string();

        assert!(html.contains("Create New Post"));
        assert!(html.contains(r#"action="/create""#));
        assert!(html.contains(r#"name="title""#));
        assert!(html.contains(r#"name="content""#));
        assert!(html.contains(r#"name="tags""#));
        assert!(!html.contains(r#"class="error""#));
    }

    #[test]
    fn test_composer_keeps_draft_on_error() {
        let draft = PostDraft {
            title: "Hello".to_string(),
            content: String::new(),
            tags: "x, y".to_string(),
        };
        let html = render_create_page(&user(), &draft, Some("Please fill in title and content"))
            .into_string();

        assert!(html.contains(r#"value="Hello""#));
        assert!(html.contains(r#"value="x, y""#));
        assert!(html.contains("Please fill in title and content"));
    }
}
