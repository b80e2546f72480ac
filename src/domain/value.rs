use std::sync::LazyLock;

use phonenumber::country;
use regex::Regex;

use crate::domain::id_number::ID_NUMBER_LEN;
use crate::domain::validation::ValidationError;

static MOBILE_NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+27|0)[6-8][0-9]{8}$").expect("mobile number pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A client's first or last name.
///
/// Invariant: not blank. The text is kept exactly as given.
pub struct PersonName(String);

impl PersonName {
    /// Wire name of the first-name field.
    pub const FIRST_NAME_FIELD: &'static str = "firstName";
    /// Wire name of the last-name field.
    pub const LAST_NAME_FIELD: &'static str = "lastName";

    /// Create a validated name, reporting `field` when it is blank.
    pub fn new(field: &'static str, value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Blank { field });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a search term.
    pub fn matches_ignore_case(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }
}

#[derive(Debug, Clone)]
/// South African mobile number.
///
/// Invariant: matches `^(\+27|0)[6-8][0-9]{8}$`. The number is kept exactly as
/// given; the E.164 form is derived once at construction.
///
/// Equality and hashing use the text as given, so `0712345678` and
/// `+27712345678` are different numbers even though their E.164 forms agree.
pub struct MobileNumber {
    raw: String,
    e164: String,
}

impl MobileNumber {
    /// Wire name of the field (`mobileNumber`).
    pub const FIELD: &'static str = "mobileNumber";

    /// Validate and normalize a mobile number.
    pub fn parse(input: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = input.into();
        if !MOBILE_NUMBER_PATTERN.is_match(&raw) {
            return Err(ValidationError::InvalidMobileNumber { input: raw });
        }

        let parsed = phonenumber::parse(Some(country::Id::ZA), &raw)
            .map_err(|_| ValidationError::InvalidMobileNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164 })
    }

    /// The number as supplied by the caller.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation (`+27...`).
    pub fn e164(&self) -> &str {
        &self.e164
    }
}

impl PartialEq for MobileNumber {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for MobileNumber {}

impl std::hash::Hash for MobileNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// National ID number as entered.
///
/// Invariant: not blank and exactly 13 characters long. Digit and checksum
/// rules are enforced by the registry through [`crate::domain::id_number::validate`].
pub struct IdNumber(String);

impl IdNumber {
    /// Wire name of the field (`idNumber`).
    pub const FIELD: &'static str = "idNumber";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Blank { field: Self::FIELD });
        }
        let actual = value.chars().count();
        if actual != ID_NUMBER_LEN {
            return Err(ValidationError::IdNumberLength {
                expected: ID_NUMBER_LEN,
                actual,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
