use crate::api::ApiError;

pub fn validate_credentials(username: &str, password: &str) -> Result<(), ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::validation("Please enter your username"));
    }
    if password.is_empty() {
        return Err(ApiError::validation("Please enter your password"));
    }
    Ok(())
}
