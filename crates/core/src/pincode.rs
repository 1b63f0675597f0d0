use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const PIN_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PinCodeError {
    #[error("PIN code must be exactly {PIN_LEN} characters, got {0}")]
    WrongLength(usize),
    #[error("PIN code must be decimal digits only: '{0}'")]
    NonDigit(String),
}

/// A 6-digit postal index number, stored verbatim.
///
/// The code is text, not a number — leading zeros are significant and no
/// arithmetic interpretation is ever applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PinCode(String);

impl PinCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PinCode {
    type Err = PinCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != PIN_LEN {
            return Err(PinCodeError::WrongLength(s.len()));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PinCodeError::NonDigit(s.to_string()));
        }
        Ok(PinCode(s.to_string()))
    }
}

impl TryFrom<String> for PinCode {
    type Error = PinCodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PinCode> for String {
    fn from(pin: PinCode) -> Self {
        pin.0
    }
}

impl fmt::Display for PinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
