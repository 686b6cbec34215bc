//! Pet name format rules.
//!
//! Profanity screening needs the server's word list and lives there; this
//! module only checks the shape of a name.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::constants::{PET_NAME_MAX_LEN, PET_NAME_MIN_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameRejection {
    #[error("name must be at least 2 characters")]
    TooShort,
    #[error("name must be at most 16 characters")]
    TooLong,
    #[error("name may not start or end with whitespace")]
    SurroundingWhitespace,
    #[error("name may only contain letters, spaces, hyphens and apostrophes")]
    InvalidCharacters,
}

/// Checks a candidate pet name exactly as typed.
///
/// Accepted names are 2 to 16 characters, start and end with a letter, and
/// otherwise contain only letters, spaces, hyphens and apostrophes.
pub fn validate_pet_name(name: &str) -> Result<(), NameRejection> {
    lazy_static! {
        static ref PET_NAME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z \-']*[A-Za-z]$").unwrap();
    }

    let len = name.chars().count();
    if len < PET_NAME_MIN_LEN {
        return Err(NameRejection::TooShort);
    }
    if len > PET_NAME_MAX_LEN {
        return Err(NameRejection::TooLong);
    }
    if name.starts_with(char::is_whitespace) || name.ends_with(char::is_whitespace) {
        return Err(NameRejection::SurroundingWhitespace);
    }
    if !PET_NAME_RE.is_match(name) {
        return Err(NameRejection::InvalidCharacters);
    }

    Ok(())
}
