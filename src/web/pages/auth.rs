//! Sign-in and sign-up page.

use maud::{html, Markup, Render};

use crate::auth::MIN_PASSWORD_LENGTH;
use crate::components::{Alert, BaseLayout, Button, Checkbox, Form, FormGroup, HiddenInput, Input};

/// Which of the two auth forms is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    /// Read the `?mode=` query value; anything but `signup` means login.
    #[must_use]
    pub fn from_query(mode: Option<&str>) -> Self {
        if mode == Some("signup") {
            Self::Signup
        } else {
            Self::Login
        }
    }
}

/// Parameters for rendering the auth page.
#[derive(Debug, Default)]
pub struct AuthPageParams<'a> {
    pub mode: AuthMode,
    pub error: Option<&'a str>,
    pub email: &'a str,
    pub username: &'a str,
    pub remember: bool,
}

/// Render the auth page.
///
/// Field values other than passwords are echoed back so a failed submission
/// does not lose what was typed.
#[must_use]
pub fn render_auth_page(params: &AuthPageParams<'_>, notice: Option<Alert<'_>>) -> Markup {
    let title = match params.mode {
        AuthMode::Login => "Sign In",
        AuthMode::Signup => "Sign Up",
    };

    let content = html! {
        div class="auth-container" {
            h1 { "Welcome to Swing" }
            nav class="auth-tabs" {
                a href="/auth" aria-current=[(params.mode == AuthMode::Login).then_some("page")] { "Sign In" }
                a href="/auth?mode=signup" aria-current=[(params.mode == AuthMode::Signup).then_some("page")] { "Sign Up" }
            }

            @if let Some(error) = params.error {
                (Alert::error(error))
            }

            @match params.mode {
                AuthMode::Login => { (login_form(params)) }
                AuthMode::Signup => { (signup_form(params)) }
            }
        }
    };

    BaseLayout::new(title, None)
        .with_notice(notice)
        .render(content)
}

fn login_form(params: &AuthPageParams<'_>) -> Markup {
    Form::post(
        "/auth",
        html! {
            (HiddenInput::new("action", "login"))
            (FormGroup::new("Email", "email", Input::email("email")
                .id("email")
                .value(params.email)
                .autocomplete("email")
                .required()
                .render()))
            (FormGroup::new("Password", "password", Input::password("password")
                .id("password")
                .autocomplete("current-password")
                .required()
                .render()))
            (Checkbox::new("remember").label("Remember me for 30 days").checked(params.remember))
            (Button::primary("Sign In").r#type("submit"))
        },
    )
    .class("auth-form")
    .render()
}

fn signup_form(params: &AuthPageParams<'_>) -> Markup {
    let password_help = format!("At least {MIN_PASSWORD_LENGTH} characters");
    let min_length = u32::try_from(MIN_PASSWORD_LENGTH).unwrap_or(u32::MAX);

    Form::post(
        "/auth",
        html! {
            (HiddenInput::new("action", "signup"))
            (FormGroup::new("Email", "email", Input::email("email")
                .id("email")
                .value(params.email)
                .autocomplete("email")
                .required()
                .render()))
            (FormGroup::new("Username", "username", Input::text("username")
                .id("username")
                .value(params.username)
                .autocomplete("username")
                .required()
                .render())
                .help("3-30 characters: letters, numbers, _ and -"))
            (FormGroup::new("Password", "password", Input::password("password")
                .id("password")
                .autocomplete("new-password")
                .minlength(min_length)
                .required()
                .render())
                .help(&password_help))
            (Button::primary("Create Account").r#type("submit"))
        },
    )
    .class("auth-form")
    .render()
}
