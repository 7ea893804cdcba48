//! Write-time checks shared by create and update.

use chrono::NaiveDate;

use super::domain::UserInput;
use super::errors::UserError;

pub const MISSING_FIELDS_MESSAGE: &str = "first name, last name and email are required";
pub const INVALID_EMAIL_MESSAGE: &str = "invalid email";

/// Input that passed validation; mandatory fields are no longer optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Option<String>,
    pub status: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// `Some` when the value holds at least one non-whitespace character.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Mandatory fields first, then the email shape. The first failure wins.
pub fn validate(input: UserInput) -> Result<ValidUser, UserError> {
    let UserInput { first_name, last_name, email, role, status, birth_date } = input;
    let keep = |v: Option<String>| v.filter(|s| non_blank(Some(s.as_str())).is_some());
    let (Some(first_name), Some(last_name), Some(email)) = (keep(first_name), keep(last_name), keep(email)) else {
        return Err(UserError::InvalidInput(MISSING_FIELDS_MESSAGE.into()));
    };
    // Only the presence of '@' is checked.
    if !email.contains('@') {
        return Err(UserError::InvalidInput(INVALID_EMAIL_MESSAGE.into()));
    }
    Ok(ValidUser { first_name, last_name, email, role, status, birth_date })
}
