pub mod cleanup;
pub mod middleware;
pub mod password;
pub mod session;
pub mod username;

pub use cleanup::{run_cleanup_worker, CleanupConfig};
pub use middleware::{cookie_value, MaybeUser, RequireUser, SESSION_COOKIE};
pub use password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
pub use session::{generate_session_token, session_cookie, SessionDuration};
pub use username::validate_username;
