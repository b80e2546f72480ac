//! Domain layer: client record, validated value types and the ID checksum (no I/O).

mod client;
pub mod id_number;
mod validation;
mod value;

pub use client::{Client, SearchCriteria};
pub use id_number::{ID_NUMBER_LEN, IdNumberError};
pub use validation::ValidationError;
pub use value::{IdNumber, MobileNumber, PersonName};

impl Client {
    /// Build a client from raw field values, validating each field in order.
    ///
    /// A blank `physical_address` is stored as absent.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        mobile_number: impl Into<String>,
        id_number: impl Into<String>,
        physical_address: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            first_name: PersonName::new(PersonName::FIRST_NAME_FIELD, first_name)?,
            last_name: PersonName::new(PersonName::LAST_NAME_FIELD, last_name)?,
            mobile_number: MobileNumber::parse(mobile_number)?,
            id_number: IdNumber::new(id_number)?,
            physical_address: physical_address.filter(|address| !address.trim().is_empty()),
        })
    }
}
