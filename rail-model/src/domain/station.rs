//! Station code and station types.

use std::fmt;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code {code:?}: {reason}")]
pub struct InvalidStationCode {
    code: String,
    reason: &'static str,
}

/// Longest code we accept. Mainline CRS codes are 3 letters; model-only
/// stations (e.g. Underground platforms) sometimes need a fourth character.
const MAX_LEN: usize = 4;

/// A short station identifier such as `WIM` or `UGP`.
///
/// Codes are 1 to 4 uppercase ASCII letters or digits. This type guarantees
/// that any `StationCode` value is valid by construction, and it is `Copy`
/// so it can be used freely as a map key and graph label.
///
/// # Examples
///
/// ```
/// use rail_model::domain::StationCode;
///
/// let wim = StationCode::parse("WIM").unwrap();
/// assert_eq!(wim.as_str(), "WIM");
///
/// // Lowercase is rejected
/// assert!(StationCode::parse("wim").is_err());
///
/// // Too long is rejected
/// assert!(StationCode::parse("WIMBL").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode {
    bytes: [u8; MAX_LEN],
    len: u8,
}

impl StationCode {
    /// Parse a station code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let input = s.as_bytes();

        if input.is_empty() || input.len() > MAX_LEN {
            return Err(InvalidStationCode {
                code: s.to_string(),
                reason: "must be 1 to 4 characters",
            });
        }

        if !input
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(InvalidStationCode {
                code: s.to_string(),
                reason: "must be uppercase ASCII letters or digits",
            });
        }

        let mut bytes = [0u8; MAX_LEN];
        bytes[..input.len()].copy_from_slice(input);

        Ok(StationCode {
            bytes,
            len: input.len() as u8,
        })
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII is ever stored, so this cannot fail.
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A station: identifier plus display name.
///
/// Two stations are equal when their codes are equal; the name is
/// presentation only.
#[derive(Debug, Clone)]
pub struct Station {
    pub code: StationCode,
    pub name: String,
}

impl Station {
    /// Creates a new station.
    pub fn new(code: StationCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
        }
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Station {}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(StationCode::parse("WIM").is_ok());
        assert!(StationCode::parse("UGP").is_ok());
        assert!(StationCode::parse("X").is_ok());
        assert!(StationCode::parse("T5").is_ok());
        assert!(StationCode::parse("ABCD").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(StationCode::parse("wim").is_err());
        assert!(StationCode::parse("Wim").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(StationCode::parse("").is_err());
        assert!(StationCode::parse("ABCDE").is_err());
        assert!(StationCode::parse("WIMBLEDON").is_err());
    }

    #[test]
    fn reject_punctuation_and_non_ascii() {
        assert!(StationCode::parse("W-M").is_err());
        assert!(StationCode::parse("W M").is_err());
        assert!(StationCode::parse("WÖM").is_err());
    }

    #[test]
    fn error_message_names_the_code() {
        let err = StationCode::parse("wim").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid station code \"wim\": must be uppercase ASCII letters or digits"
        );
    }

    #[test]
    fn display_and_debug() {
        let code = StationCode::parse("CLJ").unwrap();
        assert_eq!(format!("{}", code), "CLJ");
        assert_eq!(format!("{:?}", code), "StationCode(CLJ)");
    }

    #[test]
    fn codes_of_different_length_differ() {
        let a = StationCode::parse("AB").unwrap();
        let b = StationCode::parse("ABC").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "AB");
    }

    #[test]
    fn station_equality_is_by_code() {
        let code = StationCode::parse("VIC").unwrap();
        let a = Station::new(code, "Victoria");
        let b = Station::new(code, "London Victoria");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Victoria (VIC)");
    }
}
