//! Button component for the web UI.
//!
//! Provides a configurable button component that renders as either
//! a `<button>` or `<a>` element based on whether an href is provided.

use maud::{html, Markup, Render};

/// Button style variants matching CSS classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Primary button (default) - `.btn-primary`
    #[default]
    Primary,
    /// Outline button - `.btn.outline`
    Outline,
    /// Ghost button (no background, minimal styling)
    Ghost,
}

impl ButtonVariant {
    /// Returns the CSS class(es) for this variant.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Primary => "btn btn-primary",
            Self::Outline => "btn outline",
            Self::Ghost => "btn ghost",
        }
    }
}

/// A configurable button component.
///
/// # Example
///
/// ```ignore
/// use crate::components::button::Button;
///
/// let submit = Button::primary("Publish").r#type("submit");
/// let link = Button::outline("Back to Feed").href("/");
/// ```
#[derive(Debug, Clone)]
pub struct Button<'a> {
    /// Button label text
    pub label: &'a str,
    /// Button style variant
    pub variant: ButtonVariant,
    /// Optional href (renders as `<a>` if present)
    pub href: Option<&'a str>,
    /// Disabled state
    pub disabled: bool,
    /// Button type attribute (for `<button>` elements)
    pub r#type: Option<&'a str>,
    /// Additional CSS classes
    pub class: Option<&'a str>,
    /// Element ID
    pub id: Option<&'a str>,
    /// Accessible label, for icon-like buttons
    pub aria_label: Option<&'a str>,
    /// Toggle state for `aria-pressed`
    pub pressed: Option<bool>,
}

impl<'a> Button<'a> {
    /// Creates a new button with the given label and variant.
    #[must_use]
    pub const fn new(label: &'a str, variant: ButtonVariant) -> Self {
        Self {
            label,
            variant,
            href: None,
            disabled: false,
            r#type: None,
            class: None,
            id: None,
            aria_label: None,
            pressed: None,
        }
    }

    /// Creates a primary button.
    #[must_use]
    pub const fn primary(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Primary)
    }

    /// Creates an outline button.
    #[must_use]
    pub const fn outline(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Outline)
    }

    /// Creates a ghost button.
    #[must_use]
    pub const fn ghost(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Ghost)
    }

    /// Sets the href, rendering the button as an `<a>` element.
    #[must_use]
    pub const fn href(mut self, href: &'a str) -> Self {
        self.href = Some(href);
        self
    }

    /// Sets the disabled state.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Sets the button type attribute.
    #[must_use]
    pub const fn r#type(mut self, r#type: &'a str) -> Self {
        self.r#type = Some(r#type);
        self
    }

    /// Adds additional CSS classes.
    #[must_use]
    pub const fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }

    /// Sets the element ID.
    #[must_use]
    pub const fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the accessible label.
    #[must_use]
    pub const fn aria_label(mut self, label: &'a str) -> Self {
        self.aria_label = Some(label);
        self
    }

    /// Marks the button as a toggle in the given state.
    #[must_use]
    pub const fn pressed(mut self, pressed: bool) -> Self {
        self.pressed = Some(pressed);
        self
    }

    /// Builds the full CSS class string.
    fn build_class(&self) -> String {
        let mut classes = self.variant.class().to_string();
        if let Some(extra) = self.class {
            classes.push(' ');
            classes.push_str(extra);
        }
        classes
    }
}

impl Render for Button<'_> {
    fn render(&self) -> Markup {
        let classes = self.build_class();

        if let Some(href) = self.href {
            html! {
                a
                    class=(classes)
                    href=(href)
                    id=[self.id]
                    aria-label=[self.aria_label]
                    aria-disabled=[self.disabled.then_some("true")]
                {
                    (self.label)
                }
            }
        } else {
            html! {
                button
                    class=(classes)
                    type=(self.r#type.unwrap_or("button"))
                    id=[self.id]
                    aria-label=[self.aria_label]
                    aria-pressed=[self.pressed.map(|p| if p { "true" } else { "false" })]
                    disabled[self.disabled]
                {
                    (self.label)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_button() {
        let html = Button::primary("Click me").render().into_string();
        assert!(html.contains("btn btn-primary"));
        assert!(html.contains("Click me"));
        assert!(html.contains("<button"));
    }

    #[test]
    fn test_default_button_type() {
        let html = Button::primary("Default Type").render().into_string();
        assert!(html.contains(r#"type="button""#));
    }

    #[test]
    fn test_button_with_href() {
        let html = Button::outline("Back").href("/").render().into_string();
        assert!(html.contains("<a"));
        assert!(html.contains(r#"href="/""#));
        assert!(html.contains("btn outline"));
        assert!(!html.contains("<button"));
    }

    #[test]
    fn test_toggle_button() {
        let html = Button::ghost("♥ 3")
            .class("like-button liked")
            .r#type("submit")
            .aria_label("Unlike")
            .pressed(true)
            .render()
            .into_string();

        assert!(html.contains("btn ghost like-button liked"));
        assert!(html.contains(r#"type="submit""#));
        assert!(html.contains(r#"aria-label="Unlike""#));
        assert!(html.contains(r#"aria-pressed="true""#));
        assert!(html.contains("♥ 3"));
    }

    #[test]
    fn test_button_disabled() {
        let html = Button::primary("Wait").disabled().render().into_string();
        assert!(html.contains("disabled"));

        let html = Button::primary("Link").href("/x").disabled().render().into_string();
        assert!(html.contains(r#"aria-disabled="true""#));
    }

    #[test]
    fn test_button_variant_classes() {
        assert_eq!(ButtonVariant::Primary.class(), "btn btn-primary");
        assert_eq!(ButtonVariant::Outline.class(), "btn outline");
        assert_eq!(ButtonVariant::Ghost.class(), "btn ghost");
    }
}
