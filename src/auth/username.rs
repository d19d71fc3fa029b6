/// Shortest accepted username.
pub const MIN_USERNAME_LENGTH: usize = 3;
/// Longest accepted username.
pub const MAX_USERNAME_LENGTH: usize = 30;

/// Validate a username: 3-30 ASCII letters, digits, `_` or `-`.
///
/// Returns the message to show when the username is rejected.
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_USERNAME_LENGTH {
        return Err("Username must be between 3 and 30 characters");
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err("Username may only contain letters, numbers, '_' and '-'");
    }

    Ok(())
}
