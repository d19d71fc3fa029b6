//! Base layout components for the web UI.
//!
//! This module provides the main page layout structure including
//! the HTML skeleton, navigation, and footer.

use maud::{html, Markup, PreEscaped, Render, DOCTYPE};

use super::alert::Alert;
use super::button::Button;
use super::form::Form;
use crate::db::User;

/// Site name shown in the header and page titles.
pub const SITE_NAME: &str = "Swing";

/// Critical theme initialization script that runs in <head> to prevent flash of wrong theme.
/// Must be inline (not external) to execute before body renders.
const THEME_INIT_SCRIPT: &str = r#"(function() {
    var theme = localStorage.getItem('swing-theme');
    if (theme) {
        document.documentElement.setAttribute('data-theme', theme);
    } else if (window.matchMedia('(prefers-color-scheme: dark)').matches) {
        document.documentElement.setAttribute('data-theme', 'dark');
    }
})();"#;

/// Base page layout builder.
///
/// The user parameter is required so that every page states whether it is
/// rendered for a signed-in user. Pass `None` for anonymous visitors.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("My Page", Some(&user))
///     .with_notice(Some(Alert::success("Saved")))
///     .render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    user: Option<&'a User>,
    notice: Option<Alert<'a>>,
}

impl<'a> BaseLayout<'a> {
    /// Create a new base layout with the given page title and user.
    #[must_use]
    pub fn new(title: &'a str, user: Option<&'a User>) -> Self {
        Self {
            title,
            user,
            notice: None,
        }
    }

    /// Show a one-off notification above the page content.
    #[must_use]
    pub fn with_notice(mut self, notice: Option<Alert<'a>>) -> Self {
        self.notice = notice;
        self
    }

    /// Render the complete HTML page with the given content.
    ///
    /// The content will be placed inside the `<main class="container">` element.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" data-theme="light" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0, viewport-fit=cover";
                    meta name="color-scheme" content="light dark";
                    title { (self.title) " - " (SITE_NAME) }
                    link rel="stylesheet" href="/static/css/style.css";
                    link rel="manifest" href="/manifest.webmanifest";
                    script { (PreEscaped(THEME_INIT_SCRIPT)) }
                }
                body {
                    (self.render_header())
                    main class="container" {
                        @if let Some(notice) = &self.notice {
                            div class="notice" role="status" { (notice.render()) }
                        }
                        (content)
                    }
                    (Self::render_footer())
                    script src="/static/js/theme.js" {}
                }
            }
        }
    }

    /// Render the page header with navigation.
    fn render_header(&self) -> Markup {
        html! {
            header class="container site-header" {
                nav {
                    ul {
                        li {
                            a href="/" {
                                strong class="site-logo" { (SITE_NAME) }
                            }
                        }
                    }
                    ul {
                        (self.render_auth_nav())
                        li {
                            button
                                id="theme-toggle"
                                class="theme-toggle"
                                title="Toggle dark mode"
                                aria-label="Toggle dark mode" { "🌓" }
                        }
                    }
                }
            }
        }
    }

    /// Render authentication-related navigation items.
    fn render_auth_nav(&self) -> Markup {
        match self.user {
            Some(u) => html! {
                li { (Button::primary("+ Create Post").href("/create")) }
                li class="nav-username" { (u.username) }
                li {
                    (Form::post("/auth/logout", html! {
                        (Button::outline("Sign Out").r#type("submit"))
                    }).class("inline-form"))
                }
            },
            None => html! {
                li { a href="/auth" { "Sign In" } }
            },
        }
    }

    /// Render the page footer.
    fn render_footer() -> Markup {
        html! {
            footer class="container" {
                small { (SITE_NAME) " | share what you are building" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: 1,
            email: "test@example.com".to_string(),
            username: "testuser".to_string(),
            password_hash: "hash".to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_base_layout_basic_structure() {
        let content = html! { h1 { "Test Content" } };
        let html = BaseLayout::new("Test Page", None)
            .render(content)
            .into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Page - Swing</title>"));
        assert!(html.contains(r#"<link rel="stylesheet" href="/static/css/style.css">"#));
        assert!(html.contains(r#"<link rel="manifest" href="/manifest.webmanifest">"#));
        assert!(html.contains(r#"<main class="container">"#));
        assert!(html.contains("<h1>Test Content</h1>"));
        assert!(html.contains("localStorage.getItem('swing-theme')"));
    }

    #[test]
    fn test_base_layout_anonymous_user() {
        let html = BaseLayout::new("Anonymous", None)
            .render(html! {})
            .into_string();

        assert!(html.contains(r#"<a href="/auth">Sign In</a>"#));
        assert!(!html.contains("/auth/logout"));
        assert!(!html.contains(r#"href="/create""#));
    }

    #[test]
    fn test_base_layout_signed_in_user() {
        let user = test_user();
        let html = BaseLayout::new("Feed", Some(&user))
            .render(html! {})
            .into_string();

        assert!(html.contains("testuser"));
        assert!(html.contains(r#"action="/auth/logout""#));
        assert!(html.contains(r#"href="/create""#));
        assert!(!html.contains(r#"<a href="/auth">Sign In</a>"#));
    }

    #[test]
    fn test_base_layout_notice() {
        let html = BaseLayout::new("Notice", None)
            .with_notice(Some(Alert::error("Failed to fetch posts")))
            .render(html! {})
            .into_string();

        assert!(html.contains(r#"class="notice""#));
        assert!(html.contains("Failed to fetch posts"));

        let html = BaseLayout::new("Quiet", None)
            .with_notice(None)
            .render(html! {})
            .into_string();
        assert!(!html.contains(r#"class="notice""#));
    }
}
