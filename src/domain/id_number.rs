//! South African national ID checksum.
//!
//! Digits are weighted left to right with an alternating multiplier starting at
//! 1 (`1, 2, 1, 2, ...`). A doubled digit above 9 is folded by summing its two
//! decimal digits. The number is valid when the total is a multiple of 10.

/// Number of digits in a national ID number.
pub const ID_NUMBER_LEN: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
/// Input rejected before a checksum could be computed.
pub enum IdNumberError {
    #[error("ID number cannot be empty")]
    EmptyInput,

    #[error("ID number must contain only digits")]
    NonDigit,

    #[error("ID number must be exactly 13 digits (got {actual})")]
    WrongLength { actual: usize },
}

/// Validate a national ID number.
///
/// Returns `Ok(true)` when the checksum holds, `Ok(false)` when a well-formed
/// 13 digit number fails it, and an error when the input is not a 13 digit
/// string at all. Checks run in order: empty, non-digit, length.
pub fn validate(id_number: &str) -> Result<bool, IdNumberError> {
    if id_number.is_empty() {
        return Err(IdNumberError::EmptyInput);
    }

    let digits = id_number
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
        .ok_or(IdNumberError::NonDigit)?;

    if digits.len() != ID_NUMBER_LEN {
        return Err(IdNumberError::WrongLength {
            actual: digits.len(),
        });
    }

    let mut sum: u32 = 0;
    let mut multiplier = 1;
    for digit in digits {
        let product = digit * multiplier;
        sum += if product > 9 { product - 9 } else { product };
        multiplier = if multiplier == 1 { 2 } else { 1 };
    }

    Ok(sum % 10 == 0)
}

/// Like [`validate`], treating malformed input as invalid.
pub fn is_valid(id_number: &str) -> bool {
    validate(id_number).unwrap_or(false)
}
