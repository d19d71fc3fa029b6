//! Maud-based page templates for the web UI.
//!
//! This module contains full page implementations using maud templates.
//! Each page module exports a render function that produces the complete HTML.

pub mod auth;
pub mod create;
pub mod feed;
pub mod not_found;
pub mod post;

pub use auth::{render_auth_page, AuthMode, AuthPageParams};
pub use create::render_create_page;
pub use feed::{feed_location, render_feed_list, render_feed_page, FeedPageParams};
pub use not_found::render_not_found_page;
pub use post::{render_post_page, PostPageParams};
