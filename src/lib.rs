//! In-memory registry of client records with South African ID and mobile
//! number validation, exposed over HTTP.
//!
//! The crate is split into a domain layer of strong types (no I/O), a registry
//! owning the client collection and its uniqueness rules, and a transport layer
//! mapping the registry onto JSON-over-HTTP.
//!
//! ```rust
//! use clientreg::{Client, ClientRegistry, SearchCriteria};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ClientRegistry::new();
//! let client = Client::new("John", "Doe", "0812345678", "4801104800088", None)?;
//! registry.create(client.clone())?;
//!
//! let found = registry.search(&SearchCriteria::by_id_number("4801104800088"))?;
//! assert_eq!(found, client);
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

pub mod domain;
pub mod registry;
pub mod transport;

pub use domain::{
    Client, ID_NUMBER_LEN, IdNumber, IdNumberError, MobileNumber, PersonName, SearchCriteria,
    ValidationError,
};
pub use registry::{ClientRegistry, DEMO_CLIENTS, RegistryError};
