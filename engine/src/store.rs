//! UserStore - reconciles the remote users with the local overlay.
//!
//! Reads combine both origins, remote first. Writes go to the remote origin
//! first; only when that succeeds is the overlay read, changed and rewritten
//! in full. A failed remote call leaves the overlay untouched. A failed
//! overlay write fails the operation and publishes no event.
//!
//! Mutations do a plain read-modify-write of the overlay with no lock and no
//! version check. Two mutations that both read before either writes will lose
//! the first writer's change.

use crate::{
    error::Result, Clock, Error, EventBus, HttpRemote, LocalIds, Overlay, OverlayEvent,
    OverlayStorage, RemoteError, RemoteUsers, StorageError, StoreConfig, UserFields, UserId,
    UserRecord,
};
use std::sync::Arc;
use tokio::sync::broadcast;

/// CRUD over the union of remote users and the local overlay.
#[derive(Debug)]
pub struct UserStore<R, S> {
    remote: R,
    storage: S,
    storage_key: String,
    ids: LocalIds,
    events: EventBus,
}

impl<S: OverlayStorage> UserStore<HttpRemote, S> {
    /// Build a store talking HTTP to the configured remote origin.
    pub fn from_config(config: StoreConfig, storage: S) -> std::result::Result<Self, RemoteError> {
        let remote = HttpRemote::new(config.clone())?;
        Ok(Self::new(remote, storage, &config))
    }
}

impl<R: RemoteUsers, S: OverlayStorage> UserStore<R, S> {
    /// Create a store over the given remote and storage.
    pub fn new(remote: R, storage: S, config: &StoreConfig) -> Self {
        Self {
            remote,
            storage,
            storage_key: config.storage_key.clone(),
            ids: LocalIds::default(),
            events: EventBus::new(),
        }
    }

    /// Replace the clock used for local ids.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.ids = LocalIds::new(clock);
        self
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Subscribe to overlay changes.
    pub fn subscribe(&self) -> broadcast::Receiver<OverlayEvent> {
        self.events.subscribe()
    }

    /// Read the persisted overlay.
    pub async fn overlay(&self) -> Overlay {
        let blob = self.storage.get(&self.storage_key).await;
        Overlay::decode(blob.as_deref())
    }

    async fn write_overlay(&self, overlay: &Overlay) -> std::result::Result<(), StorageError> {
        self.storage.set(&self.storage_key, overlay.encode()).await
    }

    /// Remote users followed by overlay users.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let remote = self.remote.list().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to fetch users");
            Error::Fetch
        })?;

        let overlay = self.overlay().await;
        tracing::debug!(
            remote = remote.len(),
            local = overlay.len(),
            "Listed users"
        );
        Ok(overlay.combine(remote))
    }

    /// Look a user up in the overlay, falling back to the remote origin.
    pub async fn get_user(&self, id: UserId) -> Result<UserRecord> {
        if let Some(record) = self.overlay().await.get(id) {
            tracing::debug!(id, "User found in overlay");
            return Ok(record.clone());
        }

        self.remote.get(id).await.map_err(|e| {
            if e.is_not_found() {
                Error::NotFound(id)
            } else {
                tracing::warn!(id, error = %e, "Failed to fetch user");
                Error::Fetch
            }
        })
    }

    /// Create a user remotely and keep the echoed record in the overlay.
    ///
    /// The returned record is the remote response body under a fresh local id.
    pub async fn create_user(&self, fields: UserFields) -> Result<UserRecord> {
        fields.validate()?;

        let echoed = self.remote.create(&fields).await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to create user");
            Error::Create
        })?;

        let record = UserRecord::from_fields(self.ids.next(), echoed);

        let mut overlay = self.overlay().await;
        overlay.push(record.clone());
        self.write_overlay(&overlay).await.map_err(|e| {
            tracing::warn!(id = record.id, error = %e, "Failed to persist created user");
            Error::Create
        })?;

        tracing::debug!(id = record.id, "Created user");
        self.events.publish(OverlayEvent::Created(record.id));
        Ok(record)
    }

    /// Update a user remotely and replace it in the overlay.
    ///
    /// If the id is not in the overlay the persisted state is left as it was,
    /// even though the remote call succeeded.
    pub async fn update_user(&self, id: UserId, fields: UserFields) -> Result<UserRecord> {
        fields.validate()?;

        self.remote.update(id, &fields).await.map_err(|e| {
            tracing::warn!(id, error = %e, "Failed to update user");
            Error::Update
        })?;

        let mut overlay = self.overlay().await;
        let replaced = overlay.replace(id, &fields);
        self.write_overlay(&overlay).await.map_err(|e| {
            tracing::warn!(id, error = %e, "Failed to persist updated user");
            Error::Update
        })?;

        tracing::debug!(id, replaced, "Updated user");
        self.events.publish(OverlayEvent::Updated(id));
        Ok(UserRecord::from_fields(id, fields))
    }

    /// Delete a user remotely and drop it from the overlay.
    ///
    /// Deleting an id that is not in the overlay is not an error.
    pub async fn delete_user(&self, id: UserId) -> Result<()> {
        self.remote.delete(id).await.map_err(|e| {
            tracing::warn!(id, error = %e, "Failed to delete user");
            Error::Delete
        })?;

        let mut overlay = self.overlay().await;
        let removed = overlay.remove(id);
        self.write_overlay(&overlay).await.map_err(|e| {
            tracing::warn!(id, error = %e, "Failed to persist deleted user");
            Error::Delete
        })?;

        tracing::debug!(id, removed, "Deleted user");
        self.events.publish(OverlayEvent::Deleted(id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedClock, MemoryStorage};
    use std::sync::Mutex;

    /// Remote that serves a fixed list and records the calls it receives.
    #[derive(Default)]
    struct StubRemote {
        users: Vec<UserRecord>,
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    impl StubRemote {
        fn with_users(users: Vec<UserRecord>) -> Self {
            Self {
                users,
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn record(&self, call: String) -> std::result::Result<(), RemoteError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(RemoteError::Status(500))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RemoteUsers for StubRemote {
        async fn list(&self) -> std::result::Result<Vec<UserRecord>, RemoteError> {
            self.record("list".into())?;
            Ok(self.users.clone())
        }

        async fn get(&self, id: UserId) -> std::result::Result<UserRecord, RemoteError> {
            self.record(format!("get {id}"))?;
            self.users
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .ok_or(RemoteError::Status(404))
        }

        async fn create(&self, fields: &UserFields) -> std::result::Result<UserFields, RemoteError> {
            self.record("create".into())?;
            Ok(fields.clone())
        }

        async fn update(&self, id: UserId, _: &UserFields) -> std::result::Result<(), RemoteError> {
            self.record(format!("update {id}"))
        }

        async fn delete(&self, id: UserId) -> std::result::Result<(), RemoteError> {
            self.record(format!("delete {id}"))
        }
    }

    /// Storage that can be read but refuses every write.
    #[derive(Clone)]
    struct ReadOnlyStorage(MemoryStorage);

    impl OverlayStorage for ReadOnlyStorage {
        async fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).await
        }

        async fn set(&self, _: &str, _: String) -> std::result::Result<(), StorageError> {
            Err(StorageError::Write("read-only".into()))
        }
    }

    fn ann() -> UserRecord {
        UserRecord::from_fields(1, UserFields::new("Ann", "a@x.com", "0"))
    }

    fn store(remote: StubRemote, storage: MemoryStorage) -> UserStore<StubRemote, MemoryStorage> {
        UserStore::new(remote, storage, &StoreConfig::default())
            .with_clock(Arc::new(FixedClock(1_700_000_000_000)))
    }

    #[tokio::test]
    async fn list_with_empty_overlay_is_remote_only() {
        let store = store(StubRemote::with_users(vec![ann()]), MemoryStorage::new());
        assert_eq!(store.list_users().await.unwrap(), vec![ann()]);
    }

    #[tokio::test]
    async fn list_failure_is_fetch_error() {
        let storage = MemoryStorage::with_slot("users", r#"[{"id":5,"name":"L"}]"#);
        let store = store(StubRemote::failing(), storage);
        assert_eq!(store.list_users().await.unwrap_err(), Error::Fetch);
    }

    #[tokio::test]
    async fn create_appends_with_local_id() {
        let store = store(StubRemote::with_users(vec![ann()]), MemoryStorage::new());

        let bob = store
            .create_user(UserFields::new("Bob", "b@x.com", "1"))
            .await
            .unwrap();
        assert_eq!(bob.id, 1_700_000_000_000);

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1], bob);
    }

    #[tokio::test]
    async fn create_uses_key_from_config() {
        let storage = MemoryStorage::new();
        let config = StoreConfig::default().with_storage_key("people");
        let store = UserStore::new(StubRemote::default(), storage.clone(), &config);

        store
            .create_user(UserFields::new("Bob", "b@x.com", "1"))
            .await
            .unwrap();

        assert!(storage.get("people").await.is_some());
        assert!(storage.get("users").await.is_none());
    }

    #[tokio::test]
    async fn create_rejects_empty_fields_before_calling_remote() {
        let store = store(StubRemote::default(), MemoryStorage::new());
        let err = store
            .create_user(UserFields::new("Bob", "", "1"))
            .await
            .unwrap_err();

        assert_eq!(err, Error::EmptyField("email"));
        assert!(store.remote().calls().is_empty());
    }

    #[tokio::test]
    async fn get_prefers_overlay_without_remote_call() {
        let storage = MemoryStorage::with_slot("users", r#"[{"id":1,"name":"Local Ann"}]"#);
        let store = store(StubRemote::with_users(vec![ann()]), storage);

        let user = store.get_user(1).await.unwrap();
        assert_eq!(user.name, "Local Ann");
        assert!(store.remote().calls().is_empty());
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let store = store(StubRemote::default(), MemoryStorage::new());
        assert_eq!(store.get_user(99).await.unwrap_err(), Error::NotFound(99));
    }

    #[tokio::test]
    async fn get_remote_failure_is_fetch_error() {
        let store = store(StubRemote::failing(), MemoryStorage::new());
        assert_eq!(store.get_user(1).await.unwrap_err(), Error::Fetch);
    }

    #[tokio::test]
    async fn update_of_remote_only_user_leaves_overlay_alone() {
        let storage = MemoryStorage::new();
        let store = store(StubRemote::with_users(vec![ann()]), storage.clone());

        let updated = store
            .update_user(1, UserFields::new("Annie", "a@x.com", "0"))
            .await
            .unwrap();

        assert_eq!(updated.name, "Annie");
        assert!(store.overlay().await.is_empty());
        assert_eq!(storage.get("users").await.as_deref(), Some("[]"));
        assert_eq!(store.remote().calls(), vec!["update 1"]);
    }

    #[tokio::test]
    async fn failed_mutations_leave_overlay_untouched() {
        let blob = r#"[{"id":5,"name":"L","email":"l@x.com","phone":"5"}]"#;
        let storage = MemoryStorage::with_slot("users", blob);
        let store = store(StubRemote::failing(), storage.clone());
        let fields = UserFields::new("N", "n@x.com", "9");

        assert_eq!(store.create_user(fields.clone()).await.unwrap_err(), Error::Create);
        assert_eq!(store.update_user(5, fields).await.unwrap_err(), Error::Update);
        assert_eq!(store.delete_user(5).await.unwrap_err(), Error::Delete);

        assert_eq!(storage.get("users").await.as_deref(), Some(blob));
    }

    #[tokio::test]
    async fn mutations_publish_events() {
        let store = store(StubRemote::default(), MemoryStorage::new());
        let mut events = store.subscribe();

        let user = store
            .create_user(UserFields::new("Bob", "b@x.com", "1"))
            .await
            .unwrap();
        store
            .update_user(user.id, UserFields::new("Rob", "b@x.com", "1"))
            .await
            .unwrap();
        store.delete_user(user.id).await.unwrap();

        assert_eq!(events.recv().await.unwrap(), OverlayEvent::Created(user.id));
        assert_eq!(events.recv().await.unwrap(), OverlayEvent::Updated(user.id));
        assert_eq!(events.recv().await.unwrap(), OverlayEvent::Deleted(user.id));
    }

    #[tokio::test]
    async fn unpersisted_mutations_fail_without_events() {
        let blob = r#"[{"id":5,"name":"L","email":"l@x.com","phone":"5"}]"#;
        let storage = ReadOnlyStorage(MemoryStorage::with_slot("users", blob));
        let store = UserStore::new(StubRemote::default(), storage.clone(), &StoreConfig::default());
        let mut events = store.subscribe();
        let fields = UserFields::new("N", "n@x.com", "9");

        assert_eq!(store.create_user(fields.clone()).await.unwrap_err(), Error::Create);
        assert_eq!(store.update_user(5, fields).await.unwrap_err(), Error::Update);
        assert_eq!(store.delete_user(5).await.unwrap_err(), Error::Delete);

        assert_eq!(
            events.try_recv().unwrap_err(),
            broadcast::error::TryRecvError::Empty
        );
        assert_eq!(storage.get("users").await.as_deref(), Some(blob));
        assert_eq!(store.remote().calls(), vec!["create", "update 5", "delete 5"]);
    }
}
