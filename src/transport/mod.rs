//! Transport layer: HTTP routes and wire-format details (serialization/deserialization).

mod http;
mod wire;

pub use http::{ApiError, CREATE_PATH, DELETE_PATH, SEARCH_PATH, UPDATE_PATH, router, serve};
pub use wire::{ClientJson, Envelope, SearchQuery, codes};
