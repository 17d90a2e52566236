use crate::error::{validation::ValidationError, AppError};

/// Parses a u64 id typed by a user into a command option.
///
/// # Arguments
/// - `value` - The text to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed the id
/// - `Err(AppError::ValidationErr(InvalidId))` - The text is not a decimal id
pub fn parse_u64_from_string(value: &str) -> Result<u64, AppError> {
    let trimmed = value.trim();
    let result = trimmed
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidId(trimmed.to_string()))?;

    Ok(result)
}
