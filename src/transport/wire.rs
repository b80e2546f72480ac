use serde::{Deserialize, Serialize};

use crate::domain::{Client, SearchCriteria, ValidationError};

/// Result and message codes carried in every [`Envelope`].
pub mod codes {
    pub const OK: i32 = 0;
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const INTERNAL: i32 = 500;

    pub const CREATED: &str = "api-fm-012";
    pub const UPDATED: &str = "api-fm-013";
    pub const FOUND: &str = "api-fm-014";
    pub const DELETED: &str = "api-fm-015";
    pub const BAD_REQUEST_MESSAGE: &str = "api-fm-400";
    pub const NOT_FOUND_MESSAGE: &str = "api-fm-404";
    pub const INTERNAL_MESSAGE: &str = "api-fm-500";
}

/// Client record as it appears on the wire.
///
/// Every field is optional when decoding so that a missing field surfaces as a
/// [`ValidationError`] for that field instead of a generic parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientJson {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub physical_address: Option<String>,
}

impl TryFrom<ClientJson> for Client {
    type Error = ValidationError;

    fn try_from(value: ClientJson) -> Result<Self, Self::Error> {
        Client::new(
            value.first_name.unwrap_or_default(),
            value.last_name.unwrap_or_default(),
            value.mobile_number.unwrap_or_default(),
            value.id_number.unwrap_or_default(),
            value.physical_address,
        )
    }
}

impl From<&Client> for ClientJson {
    fn from(client: &Client) -> Self {
        Self {
            first_name: Some(client.first_name.as_str().to_owned()),
            last_name: Some(client.last_name.as_str().to_owned()),
            mobile_number: Some(client.mobile_number.as_str().to_owned()),
            id_number: Some(client.id_number.as_str().to_owned()),
            physical_address: client.physical_address.clone(),
        }
    }
}

/// Query string of the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl From<SearchQuery> for SearchCriteria {
    fn from(query: SearchQuery) -> Self {
        Self {
            first_name: non_empty(query.first_name),
            id_number: non_empty(query.id_number),
            mobile_number: non_empty(query.phone_number),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Response wrapper used by every endpoint, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub result_code: i32,
    pub result_message_code: String,
    pub result_message: String,
    pub friendly_customer_message: String,
    pub payload: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(message_code: &str, message: &str, friendly: &str, payload: T) -> Self {
        Self {
            result_code: codes::OK,
            result_message_code: message_code.to_owned(),
            result_message: message.to_owned(),
            friendly_customer_message: friendly.to_owned(),
            payload: Some(payload),
        }
    }

    pub fn failure(
        result_code: i32,
        message_code: &str,
        message: impl Into<String>,
        friendly: &str,
    ) -> Self {
        Self {
            result_code,
            result_message_code: message_code.to_owned(),
            result_message: message.into(),
            friendly_customer_message: friendly.to_owned(),
            payload: None,
        }
    }
}
