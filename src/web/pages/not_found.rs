//! Not-found page, shown for unknown routes and missing posts.

use maud::{html, Markup};

use crate::components::{BaseLayout, Button};
use crate::db::User;

/// Render a 404 page with the given headline.
#[must_use]
pub fn render_not_found_page(user: Option<&User>, message: &str) -> Markup {
    let content = html! {
        section class="not-found" {
            h1 { "404" }
            p { (message) }
            (Button::primary("Return to Home").href("/"))
        }
    };

    BaseLayout::new("Not Found", user).render(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_page() {
        let html = render_not_found_page(None, "Oops! Page not found").into_string();
        assert!(html.contains("<h1>404</h1>"));
        assert!(html.contains("Oops! Page not found"));
        assert!(html.contains(r#"href="/""#));
    }
}
