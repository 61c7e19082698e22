//! Validated text primitives shared by the pathway crates.
//!
//! Each type can only be constructed through its checking constructor, so holding one is proof
//! that the value already passed the shape rules the intake form relies on.

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The input does not look like an email address
    #[error("not a valid email address")]
    InvalidEmail,

    /// A referral code must be exactly six ASCII letters or digits
    #[error("referral code must be {expected} letters or digits, got {actual} characters")]
    InvalidReferralCode { expected: usize, actual: usize },
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// An email address with a plausible shape.
///
/// Only the shape is checked: one `@`, a non-empty local part, and a dotted domain
/// whose labels are not empty. Deliverability is proven by the one-time code, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validates and wraps an email address, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] for blank input and [`TextError::InvalidEmail`] when the
    /// address does not have a `local@domain.tld` shape.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if !Self::has_plausible_shape(trimmed) {
            return Err(TextError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    fn has_plausible_shape(value: &str) -> bool {
        if value.chars().any(char::is_whitespace) {
            return false;
        }
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        if local.is_empty() || domain.contains('@') {
            return false;
        }
        let labels: Vec<&str> = domain.split('.').collect();
        labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A six character referral code in canonical upper-case form.
///
/// Doctors type the code from a printed referral, so input is trimmed and upper-cased before
/// the length and character checks run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Number of characters in every referral code.
    pub const LEN: usize = 6;

    /// Normalises and validates a referral code.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::InvalidReferralCode`] when the normalised code is not exactly
    /// [`ReferralCode::LEN`] ASCII alphanumeric characters.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let normalised = input.as_ref().trim().to_ascii_uppercase();
        let actual = normalised.chars().count();
        if actual != Self::LEN || !normalised.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(TextError::InvalidReferralCode {
                expected: Self::LEN,
                actual,
            });
        }
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ReferralCode {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ReferralCode> for String {
    fn from(value: ReferralCode) -> Self {
        value.0
    }
}

impl std::fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Anna  ").expect("should accept padded name");
        assert_eq!(text.as_str(), "Anna");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        let err = NonEmptyText::new("   ").expect_err("should reject blank text");
        assert_eq!(err, TextError::Empty);
    }

    #[test]
    fn email_accepts_common_addresses() {
        for ok in ["anna@example.ch", "dr.meier@praxis.hin.ch", " x@y.io "] {
            assert!(EmailAddress::parse(ok).is_ok(), "{ok} should be accepted");
        }
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for bad in [
            "anna",
            "anna@",
            "@example.ch",
            "anna@example",
            "anna@.ch",
            "anna@example.",
            "an na@example.ch",
            "a@b@example.ch",
        ] {
            assert_eq!(
                EmailAddress::parse(bad),
                Err(TextError::InvalidEmail),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn referral_code_is_upper_cased() {
        let code = ReferralCode::parse(" abc123 ").expect("should normalise code");
        assert_eq!(code.as_str(), "ABC123");
    }

    #[test]
    fn referral_code_rejects_wrong_length() {
        let err = ReferralCode::parse("AB12C").expect_err("five characters is too short");
        assert_eq!(
            err,
            TextError::InvalidReferralCode {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn referral_code_rejects_symbols() {
        assert!(ReferralCode::parse("AB-12C").is_err());
        assert!(ReferralCode::parse("ÄBC123").is_err());
    }

    #[test]
    fn referral_code_deserialises_through_validation() {
        let code: ReferralCode = serde_json::from_str("\"xyz789\"").expect("valid json code");
        assert_eq!(code.as_str(), "XYZ789");
        assert!(serde_json::from_str::<ReferralCode>("\"short\"").is_err());
    }
}
