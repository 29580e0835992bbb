use sea_orm::DbErr;

/// Parses a u64 Discord id from its stored String form.
///
/// # Arguments
/// - `field` - Column name, used in the error message
/// - `value` - The String to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed String to `u64`
/// - `Err(DbErr::Custom)` - Failed to parse the string as a u64
pub fn parse_u64_from_string(field: &str, value: String) -> Result<u64, DbErr> {
    value
        .parse::<u64>()
        .map_err(|e| DbErr::Custom(format!("Failed to parse {} '{}': {}", field, value, e)))
}
