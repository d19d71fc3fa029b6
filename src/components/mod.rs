//! Maud HTML template components for the web UI.
//!
//! This module provides reusable maud components for generating HTML.
//! Components are organized into submodules by functionality:
//!
//! - `layout`: Base page layout and navigation
//! - `badge`: Tag and counter badges
//! - `button`: Configurable button and link-button components
//! - `alert`: Notification and validation messages
//! - `card`: Post cards, like buttons and empty states
//! - `form`: Form elements and input components
//!
//! # Example
//!
//! ```ignore
//! use maud::{html, Markup};
//! use crate::components::{Alert, BaseLayout, Button, Input};
//!
//! fn my_page() -> Markup {
//!     let content = html! {
//!         h1 { "Hello World" }
//!         (Alert::success("Page loaded!"))
//!         (Button::primary("Click me"))
//!         (Input::text("username").placeholder("Enter username"))
//!     };
//!     BaseLayout::new("My Page", None).render(content)
//! }
//! ```

pub mod alert;
pub mod badge;
pub mod button;
pub mod card;
pub mod form;
pub mod layout;

pub use layout::{BaseLayout, SITE_NAME};

pub use badge::{Badge, TagBadge, TagList};

pub use button::{Button, ButtonVariant};

pub use alert::{Alert, AlertVariant};

pub use card::{byline, display_date, EmptyState, LikeButton, PostCard};

pub use form::{Checkbox, Form, FormGroup, HiddenInput, Input, TextArea};
