//! Request payloads and the validated types they get parsed into.
//! Includes the parsing implementations and tests for those.

use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;
use validator::ValidateEmail;

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable Email payload, the body of `POST /emails` and `PUT /emails/{id}`.
/// Can be Deserialized but can hold an invalid email.
#[derive(Debug, Deserialize)]
pub struct DeserEmail {
    pub email_name: String,
}

/// Validated and normalized email address.
/// Surrounding whitespace is trimmed and the domain is lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<DeserEmail> for ValidEmail {
    type Error = DataParsingError;

    fn try_from(deser_email: DeserEmail) -> Result<Self, Self::Error> {
        ValidEmail::parse(deser_email.email_name)
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref().trim();

        if value.is_empty() {
            return Err(DataParsingError::EmailEmpty);
        }
        if value.graphemes(true).count() > 256 {
            return Err(DataParsingError::EmailTooLong);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(DataParsingError::EmailWhitespace);
        }

        let Some((local, domain)) = value.rsplit_once('@') else {
            return Err(DataParsingError::EmailInvalid);
        };
        if local.is_empty() || !value.validate_email() {
            return Err(DataParsingError::EmailInvalid);
        }

        // The validator crate accepts single label hosts like `localhost`, we want a dotted domain.
        let dotted = domain.split_once('.').is_some_and(|(head, tail)| {
            !head.is_empty() && !tail.is_empty() && !tail.starts_with('.')
        }) && !domain.ends_with('.');
        if !dotted {
            return Err(DataParsingError::EmailDomainInvalid);
        }

        Ok(ValidEmail(format!("{local}@{}", domain.to_lowercase())))
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email is empty")]
    EmailEmpty,
    #[error("email is too long")]
    EmailTooLong,
    #[error("email contains whitespace")]
    EmailWhitespace,
    #[error("value is not a valid email address")]
    EmailInvalid,
    #[error("email domain must contain a dot")]
    EmailDomainInvalid,
}
