//! One-shot notifications carried across a redirect in a short-lived cookie.
//!
//! A handler that redirects attaches a [`FlashMessage`]; the next page that
//! renders reads it through the [`Flash`] extractor, shows it once and clears
//! the cookie.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use maud::Markup;

use crate::auth::cookie_value;
use crate::components::Alert;

pub const FLASH_COOKIE: &str = "flash";

/// Lifetime of an unread flash cookie, in seconds.
const FLASH_MAX_AGE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub message: String,
}

impl FlashMessage {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Cookie value: `<kind>:<percent-encoded message>`.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{}:{}",
            self.kind.as_str(),
            urlencoding::encode(&self.message)
        )
    }

    /// Parse a cookie value written by [`FlashMessage::encode`].
    #[must_use]
    pub fn decode(raw: &str) -> Option<Self> {
        let (kind, message) = raw.split_once(':')?;
        let kind = match kind {
            "success" => FlashKind::Success,
            "error" => FlashKind::Error,
            _ => return None,
        };
        let message = urlencoding::decode(message).ok()?.into_owned();
        if message.is_empty() {
            return None;
        }
        Some(Self { kind, message })
    }

    #[must_use]
    pub fn alert(&self) -> Alert<'_> {
        match self.kind {
            FlashKind::Success => Alert::success(&self.message),
            FlashKind::Error => Alert::error(&self.message),
        }
    }

    /// `Set-Cookie` value that stores this message for the next page view.
    #[must_use]
    pub fn set_cookie(&self) -> String {
        format!(
            "{FLASH_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={FLASH_MAX_AGE}",
            self.encode()
        )
    }
}

fn clear_cookie() -> String {
    format!("{FLASH_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Pending notification for the current request, if any.
#[derive(Debug, Clone, Default)]
pub struct Flash(pub Option<FlashMessage>);

impl Flash {
    #[must_use]
    pub fn alert(&self) -> Option<Alert<'_>> {
        self.0.as_ref().map(FlashMessage::alert)
    }

    /// Respond with a rendered page, consuming the pending notification.
    #[must_use]
    pub fn page(&self, status: StatusCode, markup: Markup) -> Response {
        let body = Html(markup.into_string());
        if self.0.is_some() {
            (status, [(header::SET_COOKIE, clear_cookie())], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            cookie_value(&parts.headers, FLASH_COOKIE).and_then(FlashMessage::decode),
        ))
    }
}

/// Redirect (303) and show `flash` on the page the browser lands on.
#[must_use]
pub fn redirect_with_flash(to: &str, flash: &FlashMessage) -> Response {
    (
        [(header::SET_COOKIE, flash.set_cookie())],
        Redirect::to(to),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let flash = FlashMessage::success("Post created successfully!");
        let encoded = flash.encode();
        assert!(encoded.starts_with("success:"));
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains(';'));
        assert_eq!(FlashMessage::decode(&encoded), Some(flash));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(FlashMessage::decode(""), None);
        assert_eq!(FlashMessage::decode("no-separator"), None);
        assert_eq!(FlashMessage::decode("warning:hello"), None);
        assert_eq!(FlashMessage::decode("error:"), None);
    }

    #[test]
    fn test_decode_error_message() {
        let flash = FlashMessage::decode("error:Failed%20to%20fetch%20post").unwrap();
        assert_eq!(flash.kind, FlashKind::Error);
        assert_eq!(flash.message, "Failed to fetch post");
    }

    #[test]
    fn test_redirect_with_flash_sets_cookie() {
        let response = redirect_with_flash("/", &FlashMessage::success("Welcome!"));
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("flash=success:Welcome%21;"));
        assert!(cookie.contains("Max-Age=60"));
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[test]
    fn test_page_clears_consumed_flash() {
        let flash = Flash(Some(FlashMessage::error("Failed to fetch posts")));
        let response = flash.page(StatusCode::OK, maud::html! { p { "x" } });
        let cookie = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(cookie.to_str().unwrap().contains("Max-Age=0"));

        let response = Flash::default().page(StatusCode::OK, maud::html! {});
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}
