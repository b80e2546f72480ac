use crate::domain::value::{IdNumber, MobileNumber, PersonName};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A registered client.
///
/// Field-level rules are carried by the value types. Registry-wide rules
/// (checksum, uniqueness of ID and mobile number) are checked on write by
/// [`crate::ClientRegistry`].
pub struct Client {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub mobile_number: MobileNumber,
    pub id_number: IdNumber,
    pub physical_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Optional search criteria. Absent criteria match every client; present
/// criteria must all match.
pub struct SearchCriteria {
    /// Compared case-insensitively.
    pub first_name: Option<String>,
    /// Compared exactly.
    pub id_number: Option<String>,
    /// Compared exactly against the number as stored.
    pub mobile_number: Option<String>,
}

impl SearchCriteria {
    pub fn by_first_name(first_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            ..Self::default()
        }
    }

    pub fn by_id_number(id_number: impl Into<String>) -> Self {
        Self {
            id_number: Some(id_number.into()),
            ..Self::default()
        }
    }

    pub fn by_mobile_number(mobile_number: impl Into<String>) -> Self {
        Self {
            mobile_number: Some(mobile_number.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.id_number.is_none() && self.mobile_number.is_none()
    }

    pub fn matches(&self, client: &Client) -> bool {
        let first_name = self
            .first_name
            .as_deref()
            .is_none_or(|name| client.first_name.matches_ignore_case(name));
        let id_number = self
            .id_number
            .as_deref()
            .is_none_or(|id| client.id_number.as_str() == id);
        let mobile_number = self
            .mobile_number
            .as_deref()
            .is_none_or(|mobile| client.mobile_number.as_str() == mobile);

        first_name && id_number && mobile_number
    }
}
