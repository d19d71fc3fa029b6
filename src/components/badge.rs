//! Badge components for tags and counters.

use maud::{html, Markup, Render};

/// A post tag.
#[derive(Debug, Clone, Copy)]
pub struct TagBadge<'a> {
    pub tag: &'a str,
}

impl<'a> TagBadge<'a> {
    #[must_use]
    pub const fn new(tag: &'a str) -> Self {
        Self { tag }
    }
}

impl Render for TagBadge<'_> {
    fn render(&self) -> Markup {
        html! {
            span class="badge badge-tag" { "#" (self.tag) }
        }
    }
}

/// An ordered list of tag badges. Renders nothing when empty.
#[derive(Debug, Clone, Copy)]
pub struct TagList<'a> {
    pub tags: &'a [String],
}

impl<'a> TagList<'a> {
    #[must_use]
    pub const fn new(tags: &'a [String]) -> Self {
        Self { tags }
    }
}

impl Render for TagList<'_> {
    fn render(&self) -> Markup {
        html! {
            @if !self.tags.is_empty() {
                div class="tag-list" {
                    @for tag in self.tags {
                        (TagBadge::new(tag))
                    }
                }
            }
        }
    }
}

/// A generic badge with custom content and class.
#[derive(Debug, Clone)]
pub struct Badge<'a> {
    /// Badge content
    pub content: &'a str,
    /// CSS class(es)
    pub class: &'a str,
}

impl<'a> Badge<'a> {
    /// Creates a new generic badge.
    #[must_use]
    pub const fn new(content: &'a str, class: &'a str) -> Self {
        Self { content, class }
    }
}

impl Render for Badge<'_> {
    fn render(&self) -> Markup {
        html! {
            span class=(self.class) {
                (self.content)
            }
        }
    }
}
