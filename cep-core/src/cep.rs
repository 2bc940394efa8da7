//! Brazilian postal code (CEP) validation shared by both services.

use std::fmt;

/// Separator accepted between the 5-digit prefix and the 3-digit suffix.
pub const SEPARATOR: char = '-';

/// Number of digits in a normalized CEP.
pub const CEP_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CepError {
    #[error("invalid CEP '{0}': expected exactly 8 digits")]
    Invalid(String),
}

/// A validated, separator-free CEP. Always exactly 8 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    /// Lenient parse: strips separators first, so `"01310-930"` is accepted.
    pub fn parse(raw: &str) -> Result<Self, CepError> {
        Self::parse_normalized(&normalize(raw)).map_err(|_| CepError::Invalid(raw.to_string()))
    }

    /// Strict parse: the input must already be 8 digits with no separator.
    pub fn parse_normalized(code: &str) -> Result<Self, CepError> {
        if is_valid(code) {
            Ok(Self(code.to_string()))
        } else {
            Err(CepError::Invalid(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Cep {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Remove every separator character from `raw`.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| *c != SEPARATOR).collect()
}

/// `true` iff `code` is exactly 8 ASCII digits.
pub fn is_valid(code: &str) -> bool {
    code.len() == CEP_LEN && code.bytes().all(|b| b.is_ascii_digit())
}
