//! Registry layer: the in-memory client store and its uniqueness rules.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{Client, IdNumberError, SearchCriteria, ValidationError, id_number};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Errors returned by [`ClientRegistry`].
///
/// Every failure leaves the registry unchanged.
pub enum RegistryError {
    /// No client is stored under the requested key, or no client matches a search.
    #[error("client not found")]
    ClientNotFound,

    /// Another stored client already uses this ID number.
    #[error("duplicate ID number found: {id_number}")]
    DuplicateId { id_number: String },

    /// The ID number is 13 digits but fails the checksum.
    #[error("invalid South African ID number: {id_number}")]
    InvalidIdNumber { id_number: String },

    /// The ID number is not a 13 digit string.
    #[error("malformed ID number: {0}")]
    MalformedIdNumber(#[from] IdNumberError),

    /// Another stored client already uses this mobile number.
    #[error("duplicate mobile number found: {mobile_number}")]
    DuplicateMobileNumber { mobile_number: String },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Demo clients inserted by [`ClientRegistry::seed_demo_data`].
pub const DEMO_CLIENTS: [(&str, &str, &str, &str, &str); 2] = [
    ("John", "Doe", "0712345678", "9601104800087", "123 Elm Street"),
    ("Jane", "Smith", "0723456789", "9901104800081", "456 Maple Avenue"),
];

#[derive(Debug, Default)]
/// In-memory client store keyed by ID number.
///
/// All checks and the mutation they guard run under one write lock, so
/// concurrent writers cannot both pass a uniqueness check for the same value.
/// Iteration (and therefore "first match" in [`ClientRegistry::search`]) follows
/// ascending key order.
pub struct ClientRegistry {
    clients: RwLock<BTreeMap<String, Client>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new client under its ID number.
    ///
    /// Checks, in order: duplicate ID, checksum, duplicate mobile number.
    pub fn create(&self, candidate: Client) -> Result<Client, RegistryError> {
        let mut clients = self.clients.write();
        check_candidate(&clients, &candidate, None)?;

        let key = candidate.id_number.as_str().to_owned();
        clients.insert(key.clone(), candidate.clone());
        debug!(id_number = %key, total = clients.len(), "client created");
        Ok(candidate)
    }

    /// Replace the client stored under `key`.
    ///
    /// The candidate is stored under the original `key` even when it carries a
    /// different ID number. The record being replaced does not count as a
    /// duplicate, so a client can be updated without changing its ID or mobile
    /// number.
    pub fn update(&self, key: &str, candidate: Client) -> Result<Client, RegistryError> {
        let mut clients = self.clients.write();
        if !clients.contains_key(key) {
            return Err(RegistryError::ClientNotFound);
        }
        check_candidate(&clients, &candidate, Some(key))?;

        clients.insert(key.to_owned(), candidate.clone());
        debug!(key, id_number = %candidate.id_number.as_str(), "client updated");
        Ok(candidate)
    }

    /// Remove the client stored under `key`.
    pub fn delete(&self, key: &str) -> Result<(), RegistryError> {
        let mut clients = self.clients.write();
        if clients.remove(key).is_none() {
            return Err(RegistryError::ClientNotFound);
        }
        debug!(key, total = clients.len(), "client deleted");
        Ok(())
    }

    /// Return the first client matching every present criterion.
    ///
    /// With no criteria the first stored client is returned.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<Client, RegistryError> {
        self.clients
            .read()
            .values()
            .find(|client| criteria.matches(client))
            .cloned()
            .ok_or(RegistryError::ClientNotFound)
    }

    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }

    /// All stored clients in key order.
    pub fn snapshot(&self) -> Vec<Client> {
        self.clients.read().values().cloned().collect()
    }

    /// Insert [`DEMO_CLIENTS`] with the same checks as [`ClientRegistry::create`].
    ///
    /// All or nothing: if any demo client is rejected, none are inserted.
    pub fn seed_demo_data(&self) -> Result<(), RegistryError> {
        let candidates = DEMO_CLIENTS
            .into_iter()
            .map(|(first, last, mobile, id, address)| {
                Client::new(first, last, mobile, id, Some(address.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut clients = self.clients.write();
        let mut staged = clients.clone();
        for candidate in candidates {
            check_candidate(&staged, &candidate, None)?;
            staged.insert(candidate.id_number.as_str().to_owned(), candidate);
        }
        *clients = staged;
        debug!(total = clients.len(), "demo clients seeded");
        Ok(())
    }
}

/// Run the write-time checks for `candidate`, ignoring the entry stored under
/// `replacing` (the record an update overwrites).
fn check_candidate(
    clients: &BTreeMap<String, Client>,
    candidate: &Client,
    replacing: Option<&str>,
) -> Result<(), RegistryError> {
    let id = candidate.id_number.as_str();
    if others(clients, replacing)
        .any(|(key, client)| key == id || client.id_number.as_str() == id)
    {
        return Err(RegistryError::DuplicateId {
            id_number: id.to_owned(),
        });
    }

    if !id_number::validate(id)? {
        return Err(RegistryError::InvalidIdNumber {
            id_number: id.to_owned(),
        });
    }

    if others(clients, replacing)
        .any(|(_, client)| client.mobile_number == candidate.mobile_number)
    {
        return Err(RegistryError::DuplicateMobileNumber {
            mobile_number: candidate.mobile_number.as_str().to_owned(),
        });
    }

    Ok(())
}

fn others<'a>(
    clients: &'a BTreeMap<String, Client>,
    replacing: Option<&'a str>,
) -> impl Iterator<Item = (&'a String, &'a Client)> + 'a {
    clients
        .iter()
        .filter(move |(key, _)| Some(key.as_str()) != replacing)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn client(first: &str, mobile: &str, id: &str) -> Client {
        Client::new(first, "Tester", mobile, id, None).unwrap()
    }

    fn john() -> Client {
        Client::new(
            "John",
            "Doe",
            "0812345678",
            "4801104800088",
            Some("123 Elm Street".to_owned()),
        )
        .unwrap()
    }

    fn jane() -> Client {
        Client::new(
            "Jane",
            "Smith",
            "0723456789",
            "3901014800086",
            Some("456 Maple Avenue".to_owned()),
        )
        .unwrap()
    }

    #[test]
    fn create_then_search_by_id_round_trips() {
        let registry = ClientRegistry::new();
        let created = registry.create(john()).unwrap();
        assert_eq!(created, john());

        let found = registry
            .search(&SearchCriteria::by_id_number("4801104800088"))
            .unwrap();
        assert_eq!(found, john());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn create_rejects_duplicate_id() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();

        let err = registry
            .create(client("Other", "0600000000", "4801104800088"))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateId {
                id_number: "4801104800088".to_owned()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn create_rejects_duplicate_mobile() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();

        let err = registry
            .create(client("Other", "0812345678", "3901014800086"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateMobileNumber { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_mobile_detection_compares_text_exactly() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();

        // Same subscriber written in international form is a different mobile number.
        let other = client("Other", "+27812345678", "3901014800086");
        let created = registry.create(other.clone()).unwrap();
        assert_eq!(created, other);

        let found = registry
            .search(&SearchCriteria::by_mobile_number("+27812345678"))
            .unwrap();
        assert_eq!(found, other);

        let err = registry
            .create(client("Third", "+27812345678", "9601104800087"))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateMobileNumber {
                mobile_number: "+27812345678".to_owned()
            }
        );
    }

    #[test]
    fn create_rejects_bad_checksum() {
        let registry = ClientRegistry::new();
        let err = registry
            .create(client("Bad", "0600000000", "9001015800083"))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::InvalidIdNumber {
                id_number: "9001015800083".to_owned()
            }
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn create_rejects_malformed_id() {
        let registry = ClientRegistry::new();
        let err = registry
            .create(client("Bad", "0600000000", "48011048000AB"))
            .unwrap_err();
        assert_eq!(err, RegistryError::MalformedIdNumber(IdNumberError::NonDigit));
    }

    #[test]
    fn duplicate_id_is_reported_before_checksum_and_mobile() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();

        // Same ID and same mobile: the ID check wins.
        let err = registry.create(john()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId { .. }));
    }

    #[test]
    fn checksum_is_reported_before_duplicate_mobile() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();

        let err = registry
            .create(client("Bad", "0812345678", "9001015800083"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidIdNumber { .. }));
    }

    #[test]
    fn update_missing_key_is_not_found() {
        let registry = ClientRegistry::new();
        let err = registry.update("nonexistent-id", jane()).unwrap_err();
        assert_eq!(err, RegistryError::ClientNotFound);
    }

    #[test]
    fn update_replaces_record_in_place() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();

        let updated = registry.update("4801104800088", jane()).unwrap();
        assert_eq!(updated, jane());
        assert_eq!(registry.len(), 1);

        let found = registry
            .search(&SearchCriteria::by_id_number("3901014800086"))
            .unwrap();
        assert_eq!(found, jane());
        assert!(
            registry
                .search(&SearchCriteria::by_id_number("4801104800088"))
                .is_err()
        );

        // Still keyed by the original ID number.
        registry.delete("4801104800088").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn update_without_changing_id_or_mobile_is_allowed() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();

        let mut moved = john();
        moved.physical_address = Some("9 New Road".to_owned());
        let updated = registry.update("4801104800088", moved.clone()).unwrap();
        assert_eq!(updated, moved);
        assert_eq!(registry.snapshot(), vec![moved]);
    }

    #[test]
    fn update_rejects_collisions_with_other_clients() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();
        registry.create(jane()).unwrap();

        let mut stolen_id = jane();
        stolen_id.id_number = john().id_number;
        let err = registry.update("3901014800086", stolen_id).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId { .. }));

        let mut stolen_mobile = jane();
        stolen_mobile.mobile_number = john().mobile_number;
        let err = registry.update("3901014800086", stolen_mobile).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateMobileNumber { .. }));

        assert_eq!(registry.snapshot(), vec![jane(), john()]);
    }

    #[test]
    fn re_identified_record_still_blocks_its_new_id() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();
        registry.update("4801104800088", jane()).unwrap();

        // Jane's ID now lives under John's key; creating it again must fail.
        let err = registry
            .create(client("Copy", "0600000000", "3901014800086"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId { .. }));
    }

    #[test]
    fn delete_missing_key_fails_repeatedly() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();

        assert_eq!(registry.delete("9601104800087"), Err(RegistryError::ClientNotFound));
        assert_eq!(registry.delete("9601104800087"), Err(RegistryError::ClientNotFound));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn delete_removes_client() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();
        registry.delete("4801104800088").unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.delete("4801104800088"), Err(RegistryError::ClientNotFound));
    }

    #[test]
    fn empty_search_on_empty_registry_is_not_found() {
        let registry = ClientRegistry::new();
        let criteria = SearchCriteria::default();
        assert_eq!(registry.search(&criteria), Err(RegistryError::ClientNotFound));

        registry.create(john()).unwrap();
        assert_eq!(registry.search(&criteria), Ok(john()));
    }

    #[test]
    fn empty_search_returns_first_by_key_order() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();
        registry.create(jane()).unwrap();
        assert_eq!(registry.search(&SearchCriteria::default()), Ok(jane()));
    }

    #[test]
    fn search_combines_criteria() {
        let registry = ClientRegistry::new();
        registry.create(john()).unwrap();
        registry.create(jane()).unwrap();

        let found = registry.search(&SearchCriteria::by_first_name("JOHN")).unwrap();
        assert_eq!(found, john());

        let found = registry
            .search(&SearchCriteria::by_mobile_number("0723456789"))
            .unwrap();
        assert_eq!(found, jane());

        let mismatch = SearchCriteria {
            first_name: Some("john".to_owned()),
            id_number: Some("3901014800086".to_owned()),
            mobile_number: None,
        };
        assert_eq!(registry.search(&mismatch), Err(RegistryError::ClientNotFound));
    }

    #[test]
    fn seed_demo_data_inserts_both_clients() {
        let registry = ClientRegistry::new();
        registry.seed_demo_data().unwrap();
        assert_eq!(registry.len(), DEMO_CLIENTS.len());

        let seeded = registry.search(&SearchCriteria::by_first_name("john")).unwrap();
        assert_eq!(seeded.id_number.as_str(), "9601104800087");

        // Seeding twice trips the duplicate check instead of overwriting.
        assert!(matches!(
            registry.seed_demo_data(),
            Err(RegistryError::DuplicateId { .. })
        ));
        assert_eq!(registry.len(), DEMO_CLIENTS.len());
    }

    #[test]
    fn failed_seed_inserts_nothing() {
        let registry = ClientRegistry::new();
        // Takes Jane's demo mobile number, so only the second demo client collides.
        registry
            .create(client("Squatter", "0723456789", "4801104800088"))
            .unwrap();

        let err = registry.seed_demo_data().unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateMobileNumber {
                mobile_number: "0723456789".to_owned()
            }
        );
        assert_eq!(registry.len(), 1);
        assert!(
            registry
                .search(&SearchCriteria::by_id_number("9601104800087"))
                .is_err()
        );
    }

    #[test]
    fn concurrent_creates_keep_mobile_numbers_unique() {
        let registry = Arc::new(ClientRegistry::new());
        let ids = ["4801104800088", "3901014800086", "9601104800087", "9901104800081"];

        let handles = ids
            .into_iter()
            .map(|id| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.create(client("Racer", "0600000000", id)))
            })
            .collect::<Vec<_>>();

        let successes = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(Result::is_ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(registry.len(), 1);
    }
}
