//! Home feed page and the list fragment swapped in by the search box.

use maud::{html, Markup, PreEscaped};

use crate::components::{Alert, BaseLayout, EmptyState, Input, PostCard};
use crate::db::{FeedPost, User};

/// Re-runs the feed query a fixed delay after the last keystroke.
///
/// Responses for a query that has since been superseded are dropped, so a
/// slow earlier request can never overwrite the results of a later one.
const FEED_SEARCH_SCRIPT: &str = r#"(function() {
    var form = document.getElementById('feed-search');
    var list = document.getElementById('feed-list');
    if (!form || !list) return;
    var input = form.querySelector('input[name="q"]');
    var delay = parseInt(form.getAttribute('data-debounce-ms'), 10) || 300;
    var timer = null;
    var seq = 0;

    input.addEventListener('input', function() {
        clearTimeout(timer);
        timer = setTimeout(function() {
            var q = input.value;
            var mine = ++seq;
            fetch('/feed/posts?q=' + encodeURIComponent(q), { credentials: 'same-origin' })
                .then(function(res) {
                    if (res.redirected) { window.location = res.url; return null; }
                    return res.ok ? res.text() : null;
                })
                .then(function(html) {
                    if (html === null || mine !== seq) return;
                    list.innerHTML = html;
                    var url = q.trim() ? '/?q=' + encodeURIComponent(q) : '/';
                    history.replaceState(null, '', url);
                })
                .catch(function() {});
        }, delay);
    });
})();"#;

/// Where a like toggle on the feed should send the browser back to.
#[must_use]
pub fn feed_location(query: Option<&str>) -> String {
    match query {
        Some(q) => format!("/?q={}", urlencoding::encode(q)),
        None => "/".to_string(),
    }
}

/// Render the list of post cards (also served alone at `/feed/posts`).
#[must_use]
pub fn render_feed_list(posts: &[FeedPost], viewer_id: i64, query: Option<&str>) -> Markup {
    let back = feed_location(query);

    html! {
        @if posts.is_empty() {
            @if query.is_some() {
                (EmptyState::no_results())
            } @else {
                (EmptyState::no_posts())
            }
        } @else {
            @for entry in posts {
                (PostCard::new(entry, viewer_id, &back))
            }
        }
    }
}

/// Parameters for rendering the feed page.
#[derive(Debug)]
pub struct FeedPageParams<'a> {
    pub user: &'a User,
    pub posts: &'a [FeedPost],
    pub query: Option<&'a str>,
    pub debounce_ms: u64,
}

/// Render the full feed page.
#[must_use]
pub fn render_feed_page(params: &FeedPageParams<'_>, notice: Option<Alert<'_>>) -> Markup {
    let search = Input::search("q")
        .value(params.query.unwrap_or_default())
        .placeholder("Search posts by title, content, or tags...")
        .autocomplete("off")
        .class("search-input");

    let content = html! {
        h1 { "DevConnect Mini" }
        form id="feed-search" class="search-form" action="/" method="get" data-debounce-ms=(params.debounce_ms) {
            (search)
        }
        section id="feed-list" class="post-list" aria-live="polite" {
            (render_feed_list(params.posts, params.user.id, params.query))
        }
        script { (PreEscaped(FEED_SEARCH_SCRIPT)) }
    };

    BaseLayout::new("Feed", Some(params.user))
        .with_notice(notice)
        .render(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Post;

    fn user() -> User {
        User {
            id: 1,
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            password_hash: String::new(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn entry(id: i64, title: &str) -> FeedPost {
        FeedPost {
            post: Post {
                id,
                author_id: 1,
                author_username: Some("alice".to_string()),
                title: title.to_string(),
                content: "body".to_string(),
                created_at: "2024-01-15T12:00:00.000Z".to_string(),
                tags: Vec::new(),
            },
            like_user_ids: Vec::new(),
            comment_ids: Vec::new(),
        }
    }

    #[test]
    fn test_feed_location() {
        assert_eq!(feed_location(None), "/");
        assert_eq!(feed_location(Some("web dev")), "/?q=web%20dev");
    }

    #[test]
    fn test_feed_list_empty_states() {
        let html = render_feed_list(&[], 1, None).into_string();
        assert!(html.contains("No posts found. Create the first one!"));

        let html = render_feed_list(&[], 1, Some("zzz")).into_string();
        assert!(html.contains("No posts match your search."));
    }

    #[test]
    fn test_feed_list_keeps_order() {
        let posts = vec![entry(2, "Newer"), entry(1, "Older")];
        let html = render_feed_list(&posts, 1, None).into_string();
        assert!(html.find("Newer").unwrap() < html.find("Older").unwrap());
    }

    #[test]
    fn test_feed_page() {
        let user = user();
        let posts = vec![entry(1, "Hello")];
        let params = FeedPageParams {
            user: &user,
            posts: &posts,
            query: Some("hel"),
            debounce_ms: 300,
        };
        let html = render_feed_page(&params, None).into_string();

        assert!(html.contains(r#"data-debounce-ms="300""#));
        assert!(html.contains(r#"id="feed-search""#));
        assert!(html.contains(r#"value="hel""#));
        assert!(html.contains(r#"id="feed-list""#));
        assert!(html.contains("Hello"));
        assert!(html.contains("fetch('/feed/posts?q='"));
        assert!(html.contains(r#"value="/?q=hel""#));
    }
}
