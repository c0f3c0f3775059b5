//! Credential and name shape checks.

use crate::error::AppError;
use regex::Regex;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;

/// `*-_` is a range (0x2A..=0x5F), so digits and uppercase letters also count as symbols.
const SYMBOL_PATTERN: &str = r"[!@#$%^&*-_+=/\\|,.()]";

pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 50;

/// True when `text` has between `min` and `max` characters, inclusive.
pub fn in_length_range(text: &str, min: usize, max: usize) -> bool {
    let len = text.chars().count();
    len >= min && len <= max
}

pub fn has_uppercase(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_uppercase())
}

pub fn has_lowercase(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_lowercase())
}

pub fn has_number(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

pub fn has_symbol(text: &str) -> bool {
    static SYMBOL: OnceLock<Regex> = OnceLock::new();
    SYMBOL
        .get_or_init(|| Regex::new(SYMBOL_PATTERN).expect("symbol pattern compiles"))
        .is_match(text)
}

pub fn is_email(text: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
        .is_match(text)
}

/// Outcome of [`validate_password`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCheck {
    pub success: bool,
    pub message: String,
}

/// Runs every password rule in order. Each failing rule overwrites `message`, so only the last
/// failure is reported even when several rules fail.
pub fn validate_password(password: &str) -> PasswordCheck {
    let rules: [(bool, &str); 5] = [
        (
            in_length_range(password, PASSWORD_MIN, PASSWORD_MAX),
            "Password must be between 8-50 characters.",
        ),
        (has_uppercase(password), "Password must contain an uppercase."),
        (has_lowercase(password), "Password must contain a lowercase."),
        (has_number(password), "Password must contain a number."),
        (has_symbol(password), "Password must contain a special character."),
    ];

    let mut check = PasswordCheck {
        success: true,
        message: String::new(),
    };
    for (passed, message) in rules {
        if !passed {
            check.success = false;
            check.message = message.to_string();
        }
    }
    check
}

/// Rejects with the password check's message when any rule fails.
pub fn require_password(password: &str) -> Result<(), AppError> {
    let check = validate_password(password);
    if check.success {
        Ok(())
    } else {
        Err(AppError::Validation(check.message))
    }
}

pub fn require_email(email: &str) -> Result<(), AppError> {
    if is_email(email) {
        Ok(())
    } else {
        Err(AppError::Validation("Please provide a valid email.".into()))
    }
}

/// `label` must be between `min` and `max` characters.
pub fn require_length(label: &str, text: &str, min: usize, max: usize) -> Result<(), AppError> {
    if in_length_range(text, min, max) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must be between {}-{} characters.",
            label, min, max
        )))
    }
}
