use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use models::{User, UserId, UserInput};
use tokio::sync::RwLock;
use tracing::warn;

use crate::directory::UserDirectory;
use crate::errors::ServiceError;

/// Records keyed by id plus the last id handed out. Both live behind the same
/// lock so minting an id and inserting its record is one step.
#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<UserId, User>,
    last_id: UserId,
}

/// In-memory user record store.
///
/// Reads take the shared lock and hand back clones; create/update/delete take
/// the exclusive lock after input validation has already passed. Ids increase
/// monotonically for the lifetime of the store and are never reused.
#[derive(Debug, Default)]
pub struct UserStore {
    inner: RwLock<Inner>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the seed dataset, keeping the given ids.
    ///
    /// Records that fail validation or repeat an id already accepted are
    /// skipped with a warning. The id counter starts at the highest accepted id.
    pub fn from_seed(records: impl IntoIterator<Item = User>) -> Arc<Self> {
        let mut users = BTreeMap::new();
        for user in records {
            let violations = user.violations();
            if !violations.is_empty() {
                warn!(id = user.id, errors = ?violations, "skipping invalid seed record");
                continue;
            }
            if users.contains_key(&user.id) {
                warn!(id = user.id, "skipping seed record with duplicate id");
                continue;
            }
            users.insert(user.id, user);
        }
        let last_id = users.keys().next_back().copied().unwrap_or(0);
        Arc::new(Self { inner: RwLock::new(Inner { users, last_id }) })
    }

    /// All records ascending by id.
    pub async fn list(&self) -> Vec<User> {
        let inner = self.inner.read().await;
        inner.users.values().cloned().collect()
    }

    pub async fn get(&self, id: UserId) -> Result<User, ServiceError> {
        let inner = self.inner.read().await;
        inner.users.get(&id).cloned().ok_or(ServiceError::NotFound(id))
    }

    /// Validate, mint the next id and store the record.
    ///
    /// Once the counter reaches `UserId::MAX` every further create fails with
    /// `IdsExhausted`; the counter never wraps onto an existing record.
    pub async fn create(&self, input: UserInput) -> Result<User, ServiceError> {
        input.validate()?;
        let mut inner = self.inner.write().await;
        let id = inner.last_id.checked_add(1).ok_or(ServiceError::IdsExhausted)?;
        if inner.users.contains_key(&id) {
            return Err(ServiceError::IdsExhausted);
        }
        inner.last_id = id;
        let user = User::from_input(id, input);
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    /// Replace every field of an existing record, keeping its id.
    pub async fn update(&self, id: UserId, input: UserInput) -> Result<User, ServiceError> {
        input.validate()?;
        let mut inner = self.inner.write().await;
        let existing = inner.users.get_mut(&id).ok_or(ServiceError::NotFound(id))?;
        *existing = User::from_input(id, input);
        Ok(existing.clone())
    }

    pub async fn delete(&self, id: UserId) -> Result<(), ServiceError> {
        let mut inner = self.inner.write().await;
        inner.users.remove(&id).map(|_| ()).ok_or(ServiceError::NotFound(id))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserDirectory for UserStore {
    async fn list(&self) -> Vec<User> {
        self.list().await
    }

    async fn get(&self, id: UserId) -> Result<User, ServiceError> {
        self.get(id).await
    }

    async fn create(&self, input: UserInput) -> Result<User, ServiceError> {
        self.create(input).await
    }

    async fn update(&self, id: UserId, input: UserInput) -> Result<User, ServiceError> {
        self.update(id, input).await
    }

    async fn delete(&self, id: UserId) -> Result<(), ServiceError> {
        self.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::{EMAIL_INVALID, EMAIL_REQUIRED, NAME_REQUIRED, USERNAME_REQUIRED};

    fn seed_user(id: UserId, name: &str, username: &str, email: &str) -> User {
        User {
            id,
            name: name.into(),
            username: username.into(),
            email: email.into(),
            phone: None,
            website: None,
        }
    }

    fn seeded() -> Arc<UserStore> {
        UserStore::from_seed(vec![
            User {
                phone: Some("123-456-7890".into()),
                website: Some("example.com".into()),
                ..seed_user(1, "John Doe", "johndoe", "john@example.com")
            },
            User {
                phone: Some("987-654-3210".into()),
                website: Some("janesmith.com".into()),
                ..seed_user(2, "Jane Smith", "janesmith", "jane@example.com")
            },
        ])
    }

    fn input(name: &str, username: &str, email: &str) -> UserInput {
        UserInput {
            name: Some(name.into()),
            username: Some(username.into()),
            email: Some(email.into()),
            phone: Some("555-555-5555".into()),
            website: Some("test.com".into()),
        }
    }

    #[tokio::test]
    async fn list_is_sorted_by_id() {
        let store = UserStore::from_seed(vec![
            seed_user(5, "E", "e", "e@example.com"),
            seed_user(2, "B", "b", "b@example.com"),
            seed_user(9, "I", "i", "i@example.com"),
        ]);
        let ids: Vec<UserId> = store.list().await.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing_and_starts_at_one() {
        let store = UserStore::new();
        assert!(store.list().await.is_empty());
        assert!(store.is_empty().await);
        let created = store.create(input("Test User", "testuser", "test@example.com")).await.unwrap();
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn get_existing_and_missing() {
        let store = seeded();
        assert_eq!(store.get(1).await.unwrap().username, "johndoe");
        assert_eq!(store.get(999).await, Err(ServiceError::NotFound(999)));
    }

    #[tokio::test]
    async fn seeded_scenario() {
        let store = seeded();

        let created = store.create(input("Test User", "testuser", "test@example.com")).await.unwrap();
        assert_eq!(created.id, 3);
        assert_eq!(created.name, "Test User");
        assert_eq!(store.list().await.len(), 3);

        store.delete(1).await.unwrap();
        let ids: Vec<UserId> = store.list().await.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(store.get(1).await, Err(ServiceError::NotFound(1)));

        let before = store.get(2).await.unwrap();
        let err = store.update(2, input("", "janesmith", "jane@example.com")).await.unwrap_err();
        assert_eq!(err, ServiceError::Validation(vec![NAME_REQUIRED.to_string()]));
        assert_eq!(store.get(2).await.unwrap(), before);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn create_rejects_invalid_email_without_mutation() {
        let store = seeded();
        let err = store.create(input("Test User", "testuser", "invalid-email")).await.unwrap_err();
        assert!(err.messages().contains(&EMAIL_INVALID.to_string()));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn create_reports_all_violations() {
        let store = seeded();
        let err = store.create(input(" ", "", "sssss")).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Validation(vec![
                NAME_REQUIRED.to_string(),
                USERNAME_REQUIRED.to_string(),
                EMAIL_INVALID.to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn ids_are_never_reused_after_delete() {
        let store = seeded();
        let third = store.create(input("A", "a", "a@example.com")).await.unwrap();
        store.delete(third.id).await.unwrap();
        assert_eq!(store.get(third.id).await, Err(ServiceError::NotFound(third.id)));
        let fourth = store.create(input("B", "b", "b@example.com")).await.unwrap();
        assert!(fourth.id > third.id);

        // deleting the highest seeded id does not lower the counter either
        store.delete(fourth.id).await.unwrap();
        store.delete(2).await.unwrap();
        let next = store.create(input("C", "c", "c@example.com")).await.unwrap();
        assert_eq!(next.id, 5);
    }

    #[tokio::test]
    async fn update_replaces_all_fields_and_keeps_id() {
        let store = seeded();
        let updated = store
            .update(
                1,
                UserInput {
                    phone: None,
                    website: None,
                    ..input("Updated Name", "updated", "updated@example.com")
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, 1);
        assert_eq!(updated.name, "Updated Name");
        assert_eq!(updated.phone, None);
        assert_eq!(store.get(1).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_missing_id_leaves_store_untouched() {
        let store = seeded();
        let before = store.list().await;
        let err = store
            .update(999, input("Updated Name", "updated", "updated@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User with ID 999 not found.");
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn update_validates_before_existence() {
        let store = seeded();
        let err = store.update(999, input("", "u", "u@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn update_rejects_blank_username_without_mutation() {
        let store = seeded();
        let before = store.get(2).await.unwrap();
        let err = store.update(2, input("Jane", "", "jane@example.com")).await.unwrap_err();
        assert_eq!(err, ServiceError::Validation(vec![USERNAME_REQUIRED.to_string()]));
        assert_eq!(store.get(2).await.unwrap(), before);
    }

    #[tokio::test]
    async fn update_rejects_malformed_email_without_mutation() {
        let store = seeded();
        let before = store.get(2).await.unwrap();
        let err = store.update(2, input("Jane", "jane", "jane@example")).await.unwrap_err();
        assert_eq!(err, ServiceError::Validation(vec![EMAIL_INVALID.to_string()]));
        assert_eq!(store.get(2).await.unwrap(), before);
    }

    #[tokio::test]
    async fn update_requires_every_field() {
        let store = seeded();
        let before = store.list().await;
        let partial = UserInput { name: Some("X".into()), ..UserInput::default() };
        let err = store.update(2, partial).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Validation(vec![USERNAME_REQUIRED.to_string(), EMAIL_REQUIRED.to_string()])
        );
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn create_after_max_id_seed_fails_without_overwriting() {
        let store = UserStore::from_seed(vec![
            seed_user(1, "John Doe", "johndoe", "john@example.com"),
            seed_user(UserId::MAX, "Last", "last", "last@example.com"),
        ]);
        let before = store.list().await;
        for _ in 0..2 {
            let err = store.create(input("X", "x", "x@example.com")).await.unwrap_err();
            assert_eq!(err, ServiceError::IdsExhausted);
        }
        assert_eq!(store.list().await, before);
        assert_eq!(store.get(1).await.unwrap().name, "John Doe");

        // updates and deletes keep working
        store.update(1, input("Johnny", "johnny", "johnny@example.com")).await.unwrap();
        store.delete(UserId::MAX).await.unwrap();
        assert_eq!(
            store.create(input("X", "x", "x@example.com")).await,
            Err(ServiceError::IdsExhausted)
        );
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_found() {
        let store = seeded();
        assert_eq!(store.delete(999).await, Err(ServiceError::NotFound(999)));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn seed_skips_invalid_and_duplicate_records() {
        let store = UserStore::from_seed(vec![
            seed_user(1, "John Doe", "johndoe", "john@example.com"),
            seed_user(1, "Impostor", "impostor", "imp@example.com"),
            seed_user(40, "", "ghost", "ghost@example.com"),
            seed_user(3, "Jane", "jane", "jane@example.com"),
        ]);
        let users = store.list().await;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "John Doe");
        // counter follows accepted records only
        let created = store.create(input("New", "new", "new@example.com")).await.unwrap();
        assert_eq!(created.id, 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_distinct_contiguous_ids() {
        let store = seeded();
        let n: u64 = 64;
        let mut handles = Vec::new();
        for i in 0..n {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .create(input(
                        &format!("User {i}"),
                        &format!("user{i}"),
                        &format!("user{i}@example.com"),
                    ))
                    .await
                    .map(|u| u.id)
            }));
        }
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await.unwrap().unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (3..3 + n).collect::<Vec<_>>());
        assert_eq!(store.len().await, 2 + n as usize);

        let listed: Vec<UserId> = store.list().await.iter().map(|u| u.id).collect();
        let mut sorted = listed.clone();
        sorted.dedup();
        assert_eq!(listed, sorted);
    }

    #[tokio::test]
    async fn usable_through_trait_object() {
        let dir: Arc<dyn UserDirectory> = seeded();
        assert_eq!(dir.list().await.len(), 2);
        let created = dir.create(input("T", "t", "t@example.com")).await.unwrap();
        assert_eq!(dir.get(created.id).await.unwrap(), created);
        dir.delete(created.id).await.unwrap();
        assert_eq!(dir.list().await.len(), 2);
    }
}
