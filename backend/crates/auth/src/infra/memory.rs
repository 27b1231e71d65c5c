//! In-Memory Repository Implementation
//!
//! Used when no database is configured, and by the HTTP tests. State is lost
//! on restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::entity::identity::{Identity, IdentityChanges, NewIdentity};
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    last_id: i64,
    identities: BTreeMap<i64, Identity>,
}

/// Process-local credential store
#[derive(Clone, Default)]
pub struct InMemoryIdentityRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityRepository for InMemoryIdentityRepository {
    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Identity>> {
        let state = self.state.read().await;
        Ok(state
            .identities
            .values()
            .find(|i| &i.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<Identity>> {
        let state = self.state.read().await;
        Ok(state.identities.get(&id.get()).cloned())
    }

    async fn exists_by_username(&self, username: &UserName) -> AuthResult<bool> {
        let state = self.state.read().await;
        Ok(state.identities.values().any(|i| &i.username == username))
    }

    async fn insert(&self, identity: &NewIdentity) -> AuthResult<Identity> {
        // Check and insert under one write lock
        let mut state = self.state.write().await;

        if state
            .identities
            .values()
            .any(|i| i.username == identity.username)
        {
            return Err(AuthError::UsernameTaken);
        }

        state.last_id += 1;
        let id = state.last_id;
        let now = Utc::now();
        let stored = Identity {
            id: UserId::new(id),
            username: identity.username.clone(),
            password_hash: identity.password_hash.clone(),
            role: identity.role.clone(),
            is_blocked: false,
            is_admin: identity.is_admin,
            created_at: now,
            updated_at: now,
        };
        state.identities.insert(id, stored.clone());

        Ok(stored)
    }

    async fn update(&self, id: UserId, changes: &IdentityChanges) -> AuthResult<()> {
        if changes.is_empty() {
            return Err(AuthError::NoFields);
        }

        let mut state = self.state.write().await;

        if !state.identities.contains_key(&id.get()) {
            return Err(AuthError::UserNotFound);
        }
        if let Some(username) = &changes.username
            && state
                .identities
                .values()
                .any(|i| &i.username == username && i.id != id)
        {
            return Err(AuthError::UsernameTaken);
        }

        if let Some(identity) = state.identities.get_mut(&id.get()) {
            changes.apply_to(identity, Utc::now());
        }

        Ok(())
    }

    async fn list(&self) -> AuthResult<Vec<Identity>> {
        let state = self.state.read().await;
        Ok(state.identities.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{user_password::UserPassword, user_role::UserRole};

    fn new_identity(name: &str) -> NewIdentity {
        NewIdentity::new(
            UserName::new(name).unwrap(),
            UserPassword::from_db("$argon2id$stub".to_string()),
            UserRole::default(),
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let repo = InMemoryIdentityRepository::new();
        let a = repo.insert(&new_identity("alice")).await.unwrap();
        let b = repo.insert(&new_identity("bob")).await.unwrap();

        assert!(a.id < b.id);
        assert!(!a.is_blocked);
        assert!(!a.is_admin);

        let stored = repo.find_by_id(b.id).await.unwrap().unwrap();
        assert_eq!(stored.username.as_str(), "bob");
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = InMemoryIdentityRepository::new();
        repo.insert(&new_identity("alice")).await.unwrap();

        let err = repo.insert(&new_identity("alice")).await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let repo = InMemoryIdentityRepository::new();
        let err = repo
            .update(UserId::new(42), &IdentityChanges::block())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_changes_nothing() {
        let repo = InMemoryIdentityRepository::new();
        let alice = repo.insert(&new_identity("alice")).await.unwrap();
        repo.insert(&new_identity("bob")).await.unwrap();

        let changes = IdentityChanges {
            username: Some(UserName::new("bob").unwrap()),
            is_blocked: Some(true),
            ..Default::default()
        };
        let err = repo.update(alice.id, &changes).await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));

        let alice = repo.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(alice.username.as_str(), "alice");
        assert!(!alice.is_blocked);
    }

    #[tokio::test]
    async fn test_list_ordered_by_id() {
        let repo = InMemoryIdentityRepository::new();
        for name in ["carol", "alice", "bob"] {
            repo.insert(&new_identity(name)).await.unwrap();
        }
        let names: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.username.to_string())
            .collect();
        assert_eq!(names, ["carol", "alice", "bob"]);
    }
}
