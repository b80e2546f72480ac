use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Blank { field: &'static str },
    InvalidMobileNumber { input: String },
    IdNumberLength { expected: usize, actual: usize },
}

impl ValidationError {
    /// Wire name of the field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field } => field,
            Self::InvalidMobileNumber { .. } => "mobileNumber",
            Self::IdNumberLength { .. } => "idNumber",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} is mandatory"),
            Self::InvalidMobileNumber { input } => write!(f, "mobile number is invalid: {input}"),
            Self::IdNumberLength { expected, actual } => {
                write!(
                    f,
                    "ID number must be exactly {expected} digits (got {actual})"
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
