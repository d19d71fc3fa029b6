use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::auth::{
    cookie_value, generate_session_token, hash_password, session_cookie,
    validate_password_strength, validate_username, verify_password, MaybeUser, SessionDuration,
    SESSION_COOKIE,
};
use crate::db as queries;
use crate::web::flash::{redirect_with_flash, Flash, FlashMessage};
use crate::web::pages::{self, AuthMode, AuthPageParams};
use crate::web::AppState;

const EMAIL_TAKEN: &str = "An account with this email already exists";
const USERNAME_TAKEN: &str = "Username is already taken";

#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    mode: Option<String>,
}

/// Sign-in / sign-up form data.
#[derive(Debug, Default, Deserialize)]
pub struct AuthForm {
    #[serde(default)]
    action: String,
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
    /// Checkbox; present (any value) when ticked.
    remember: Option<String>,
}

/// GET /auth - Show the sign-in or sign-up form.
pub async fn auth_page(
    MaybeUser(user): MaybeUser,
    flash: Flash,
    Query(query): Query<AuthQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }

    let params = AuthPageParams {
        mode: AuthMode::from_query(query.mode.as_deref()),
        ..AuthPageParams::default()
    };

    flash.page(
        StatusCode::OK,
        pages::render_auth_page(&params, flash.alert()),
    )
}

/// POST /auth - Handle sign-in or sign-up.
pub async fn auth_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AuthForm>,
) -> Response {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(String::from);

    match form.action.as_str() {
        "signup" => handle_signup(&state, user_agent.as_deref(), form).await,
        "login" | "" => handle_login(&state, user_agent.as_deref(), form).await,
        _ => (StatusCode::BAD_REQUEST, "Invalid action").into_response(),
    }
}

/// Re-render a form with an error, keeping what the user typed.
fn form_error(mode: AuthMode, status: StatusCode, error: &str, form: &AuthForm) -> Response {
    let params = AuthPageParams {
        mode,
        error: Some(error),
        email: form.email.as_deref().unwrap_or_default(),
        username: form.username.as_deref().unwrap_or_default(),
        remember: form.remember.is_some(),
    };
    (
        status,
        Html(pages::render_auth_page(&params, None).into_string()),
    )
        .into_response()
}

/// Create a session row and return the `Set-Cookie` value for it.
async fn start_session(
    state: &AppState,
    user_id: i64,
    duration: &SessionDuration,
    user_agent: Option<&str>,
) -> anyhow::Result<String> {
    let token = generate_session_token();
    let expires_at =
        queries::format_timestamp(Utc::now() + Duration::seconds(duration.as_seconds()));

    queries::create_session(state.db.pool(), user_id, &token, user_agent, &expires_at).await?;

    Ok(session_cookie(
        &token,
        duration.as_seconds(),
        state.config.session_cookie_secure,
    ))
}

/// Redirect with both a session cookie change and a notification.
fn redirect_with_cookies(to: &str, session: String, flash: &FlashMessage) -> Response {
    (
        AppendHeaders([
            (header::SET_COOKIE, session),
            (header::SET_COOKIE, flash.set_cookie()),
        ]),
        Redirect::to(to),
    )
        .into_response()
}

/// Handle account creation.
async fn handle_signup(state: &AppState, user_agent: Option<&str>, form: AuthForm) -> Response {
    let mode = AuthMode::Signup;
    let pool = state.db.pool();

    let email = form.email.as_deref().map(str::trim).unwrap_or_default();
    if email.is_empty() {
        return form_error(mode, StatusCode::UNPROCESSABLE_ENTITY, "Email is required", &form);
    }

    let username = form.username.as_deref().map(str::trim).unwrap_or_default();
    if let Err(msg) = validate_username(username) {
        return form_error(mode, StatusCode::UNPROCESSABLE_ENTITY, msg, &form);
    }

    let password = form.password.as_deref().unwrap_or_default();
    if let Err(e) = validate_password_strength(password) {
        return form_error(mode, StatusCode::UNPROCESSABLE_ENTITY, &e.to_string(), &form);
    }

    match queries::email_exists(pool, email).await {
        Ok(true) => {
            return form_error(
                mode,
                StatusCode::CONFLICT,
                EMAIL_TAKEN,
                &form,
            );
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Failed to check email: {e:#}");
            return form_error(mode, StatusCode::INTERNAL_SERVER_ERROR, "Sign up failed", &form);
        }
    }

    match queries::username_exists(pool, username).await {
        Ok(true) => {
            return form_error(mode, StatusCode::CONFLICT, USERNAME_TAKEN, &form);
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Failed to check username: {e:#}");
            return form_error(mode, StatusCode::INTERNAL_SERVER_ERROR, "Sign up failed", &form);
        }
    }

    let password_hash = match hash_password(password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("Failed to hash password: {e:#}");
            return form_error(mode, StatusCode::INTERNAL_SERVER_ERROR, "Sign up failed", &form);
        }
    };

    let user_id =
        match queries::create_user_with_profile(pool, email, username, &password_hash).await {
            Ok(id) => id,
            Err(e) => {
                // A concurrent sign-up can win between the checks above and the insert.
                if let Some(constraint) = queries::unique_violation(&e) {
                    let message = if constraint.contains("profiles.username") {
                        USERNAME_TAKEN
                    } else {
                        EMAIL_TAKEN
                    };
                    return form_error(mode, StatusCode::CONFLICT, message, &form);
                }
                tracing::error!("Failed to create user: {e:#}");
                return form_error(
                    mode,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Sign up failed",
                    &form,
                );
            }
        };

    tracing::info!(user_id, username, "New account created");

    let cookie = match start_session(state, user_id, &SessionDuration::Short, user_agent).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(user_id, "Failed to create session after sign up: {e:#}");
            return redirect_with_flash(
                "/auth",
                &FlashMessage::error("Account created, please sign in"),
            );
        }
    };

    redirect_with_cookies(
        "/",
        cookie,
        &FlashMessage::success(format!("Welcome to Swing, {username}!")),
    )
}

/// Handle sign-in.
async fn handle_login(state: &AppState, user_agent: Option<&str>, form: AuthForm) -> Response {
    let mode = AuthMode::Login;

    let email = form.email.as_deref().map(str::trim).unwrap_or_default();
    let password = form.password.as_deref().unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return form_error(
            mode,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Email and password are required",
            &form,
        );
    }

    let user = match queries::get_user_by_email(state.db.pool(), email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return form_error(
                mode,
                StatusCode::UNAUTHORIZED,
                "Invalid email or password",
                &form,
            );
        }
        Err(e) => {
            tracing::error!("Database error during login: {e:#}");
            return form_error(mode, StatusCode::INTERNAL_SERVER_ERROR, "Login failed", &form);
        }
    };

    match verify_password(password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return form_error(
                mode,
                StatusCode::UNAUTHORIZED,
                "Invalid email or password",
                &form,
            );
        }
        Err(e) => {
            tracing::error!("Password verification error: {e:#}");
            return form_error(mode, StatusCode::INTERNAL_SERVER_ERROR, "Login failed", &form);
        }
    }

    let duration = if form.remember.is_some() {
        SessionDuration::Long
    } else {
        SessionDuration::Short
    };

    let cookie = match start_session(state, user.id, &duration, user_agent).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to create session: {e:#}");
            return form_error(mode, StatusCode::INTERNAL_SERVER_ERROR, "Login failed", &form);
        }
    };

    tracing::debug!(user_id = user.id, "User signed in");

    redirect_with_cookies(
        "/",
        cookie,
        &FlashMessage::success(format!("Welcome back, {}!", user.username)),
    )
}

/// POST /auth/logout - Sign out (deletes the current session only).
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = cookie_value(&headers, SESSION_COOKIE).filter(|t| !t.is_empty()) {
        if let Err(e) = queries::delete_session(state.db.pool(), token).await {
            tracing::warn!("Failed to delete session on logout: {e:#}");
        }
    }

    redirect_with_cookies(
        "/auth",
        session_cookie("", 0, state.config.session_cookie_secure),
        &FlashMessage::success("You have been signed out"),
    )
}
