//! Two-slot credential persistence: the raw bearer token and the serialized
//! user record.
//!
//! # Invariants
//! - `load` never returns half a credential; a lone slot is cleared.
//! - A user slot that does not parse clears both slots.
//! - A failed `save` leaves nothing behind for `load` to find.

use timeportal_auth::{Credential, UserRecord};

use crate::config::SessionConfig;
use crate::storage::{KeyValueStorage, StorageError};

/// Result of reading persisted credential state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(Credential),
    Empty,
    Corrupt,
}

#[derive(Debug, Clone)]
pub struct CredentialStore<S> {
    storage: S,
    token_key: String,
    user_key: String,
}

impl<S: KeyValueStorage> CredentialStore<S> {
    pub fn new(storage: S, config: &SessionConfig) -> Self {
        Self {
            storage,
            token_key: config.token_key(),
            user_key: config.user_key(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load(&self) -> LoadOutcome {
        let (token, user) = match (
            self.read_slot(&self.token_key),
            self.read_slot(&self.user_key),
        ) {
            (Ok(token), Ok(user)) => (token, user),
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(%err, "credential storage unreadable; clearing");
                self.clear();
                return LoadOutcome::Corrupt;
            }
        };

        let (token, user) = match (token, user) {
            (Some(token), Some(user)) => (token, user),
            (token, user) => {
                if token.is_some() || user.is_some() {
                    tracing::debug!("found a lone credential slot; clearing");
                }
                // Also drops slots holding empty strings.
                self.clear();
                return LoadOutcome::Empty;
            }
        };

        match serde_json::from_str::<UserRecord>(&user) {
            Ok(user) => LoadOutcome::Loaded(Credential { token, user }),
            Err(err) => {
                tracing::warn!(%err, "persisted user record is corrupt; clearing");
                self.clear();
                LoadOutcome::Corrupt
            }
        }
    }

    pub fn load_credential(&self) -> Option<Credential> {
        match self.load() {
            LoadOutcome::Loaded(credential) => Some(credential),
            LoadOutcome::Empty | LoadOutcome::Corrupt => None,
        }
    }

    /// Persist both slots, replacing whatever was there.
    pub fn save(&self, credential: &Credential) -> Result<(), StorageError> {
        let user = serde_json::to_string(&credential.user)
            .map_err(|err| StorageError::Write(err.to_string()))?;

        let written = self
            .storage
            .set_item(&self.token_key, &credential.token)
            .and_then(|()| self.storage.set_item(&self.user_key, &user));

        if let Err(err) = written {
            tracing::warn!(%err, "credential write failed; rolling back");
            self.clear();
            return Err(err);
        }
        Ok(())
    }

    /// Remove both slots. Idempotent; removal errors are logged, not raised.
    pub fn clear(&self) {
        for key in [&self.token_key, &self.user_key] {
            if let Err(err) = self.storage.remove_item(key) {
                tracing::warn!(%err, key = %key, "failed to remove credential slot");
            }
        }
    }

    // An empty string counts as absent.
    fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.storage.get_item(key)?.filter(|value| !value.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::storage::MemoryStorage;
    use timeportal_auth::Role;

    fn credential() -> Credential {
        Credential::new(
            "h.p.s",
            UserRecord {
                id: "u-1".to_string(),
                name: "Robin".to_string(),
                email: "robin@example.com".to_string(),
                role: Role::User,
            },
        )
    }

    fn store(storage: MemoryStorage) -> CredentialStore<MemoryStorage> {
        CredentialStore::new(storage, &SessionConfig::default())
    }

    #[test]
    fn save_then_load() {
        let store = store(MemoryStorage::new());
        store.save(&credential()).unwrap();
        assert_eq!(store.load(), LoadOutcome::Loaded(credential()));
    }

    #[test]
    fn empty_storage_loads_empty() {
        assert_eq!(store(MemoryStorage::new()).load(), LoadOutcome::Empty);
    }

    #[test]
    fn lone_token_is_cleared() {
        let storage = MemoryStorage::new();
        storage.set_item("token", "h.p.s").unwrap();

        assert_eq!(store(storage.clone()).load(), LoadOutcome::Empty);
        assert!(storage.is_empty());
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let storage = MemoryStorage::new();
        storage.set_item("token", "").unwrap();
        storage
            .set_item("user", &serde_json::to_string(&credential().user).unwrap())
            .unwrap();

        assert_eq!(store(storage.clone()).load(), LoadOutcome::Empty);
        assert!(storage.is_empty());
    }

    #[test]
    fn corrupt_user_clears_both_slots() {
        let storage = MemoryStorage::new();
        storage.set_item("token", "h.p.s").unwrap();
        storage.set_item("user", "{not json").unwrap();

        let store = store(storage.clone());
        assert_eq!(store.load(), LoadOutcome::Corrupt);
        assert!(storage.is_empty());
        assert_eq!(store.load(), LoadOutcome::Empty);
    }

    #[test]
    fn unknown_role_in_user_slot_is_corrupt() {
        let storage = MemoryStorage::new();
        storage.set_item("token", "h.p.s").unwrap();
        storage
            .set_item(
                "user",
                r#"{"id":"1","name":"Casey","email":"c@example.com","role":"client"}"#,
            )
            .unwrap();

        assert_eq!(store(storage).load(), LoadOutcome::Corrupt);
    }

    #[test]
    fn clear_is_idempotent() {
        let storage = MemoryStorage::new();
        let store = store(storage.clone());
        store.save(&credential()).unwrap();

        store.clear();
        store.clear();
        assert!(storage.is_empty());
        assert_eq!(store.load_credential(), None);
    }

    #[test]
    fn prefix_scopes_slots() {
        let storage = MemoryStorage::new();
        let config = SessionConfig {
            storage_prefix: "timeportal.".to_string(),
            ..SessionConfig::default()
        };
        let store = CredentialStore::new(storage.clone(), &config);
        store.save(&credential()).unwrap();

        assert!(storage.get_item("timeportal.token").unwrap().is_some());
        assert!(storage.get_item("token").unwrap().is_none());
    }

    /// Fails every write after the first `allowed` ones.
    struct FlakyStorage {
        inner: MemoryStorage,
        allowed: Cell<usize>,
    }

    impl KeyValueStorage for FlakyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.allowed.get() == 0 {
                return Err(StorageError::Write("quota exceeded".to_string()));
            }
            self.allowed.set(self.allowed.get() - 1);
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn failed_second_write_leaves_nothing() {
        let inner = MemoryStorage::new();
        let store = CredentialStore::new(
            FlakyStorage {
                inner: inner.clone(),
                allowed: Cell::new(1),
            },
            &SessionConfig::default(),
        );

        let err = store.save(&credential()).unwrap_err();
        assert_eq!(err, StorageError::Write("quota exceeded".to_string()));
        assert!(inner.is_empty());
        assert_eq!(store.load(), LoadOutcome::Empty);
    }

    /// Every read fails.
    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn unreadable_storage_is_corrupt() {
        let store = CredentialStore::new(BrokenStorage, &SessionConfig::default());
        assert_eq!(store.load(), LoadOutcome::Corrupt);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: whatever the slots hold, `load` either returns a full
            /// credential or leaves both slots empty.
            #[test]
            fn load_never_leaves_half_a_credential(
                token in proptest::option::of(".{0,24}"),
                user in proptest::option::of(".{0,48}"),
            ) {
                let storage = MemoryStorage::new();
                if let Some(token) = &token {
                    storage.set_item("token", token).unwrap();
                }
                if let Some(user) = &user {
                    storage.set_item("user", user).unwrap();
                }

                match store(storage.clone()).load() {
                    LoadOutcome::Loaded(credential) => {
                        prop_assert_eq!(Some(credential.token), token);
                        prop_assert_eq!(storage.len(), 2);
                    }
                    LoadOutcome::Empty | LoadOutcome::Corrupt => {
                        prop_assert!(storage.is_empty());
                    }
                }
            }
        }
    }
}
