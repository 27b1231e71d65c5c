//! Identity Entity
//!
//! The canonical user record used for every authentication and
//! authorization decision.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    user_id::UserId, user_name::UserName, user_password::UserPassword, user_role::UserRole,
};

/// Identity entity
///
/// Owned by the credential store and immutable in memory; changes go
/// through [`IdentityChanges`] and the repository.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Store-assigned key
    pub id: UserId,
    /// Unique login handle
    pub username: UserName,
    /// Argon2id PHC string (`Debug` is redacted)
    pub password_hash: UserPassword,
    /// Free-form role label
    pub role: UserRole,
    /// Blocked identities cannot log in
    pub is_blocked: bool,
    /// Elevated privilege bypassing ownership checks
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    pub fn can_login(&self) -> bool {
        !self.is_blocked
    }
}

/// A not-yet-persisted identity
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub username: UserName,
    pub password_hash: UserPassword,
    pub role: UserRole,
    pub is_admin: bool,
}

impl NewIdentity {
    /// Regular registration: never blocked, never admin
    pub fn new(username: UserName, password_hash: UserPassword, role: UserRole) -> Self {
        Self {
            username,
            password_hash,
            role,
            is_admin: false,
        }
    }

    /// Operator-provisioned administrator
    pub fn admin(username: UserName, password_hash: UserPassword) -> Self {
        Self {
            is_admin: true,
            ..Self::new(username, password_hash, UserRole::default())
        }
    }
}

/// Column-level changes to an identity
///
/// `None` means "leave untouched"; `Some(false)` for `is_blocked` is an
/// explicit unblock.
#[derive(Debug, Clone, Default)]
pub struct IdentityChanges {
    pub username: Option<UserName>,
    pub password_hash: Option<UserPassword>,
    pub role: Option<UserRole>,
    pub is_blocked: Option<bool>,
}

impl IdentityChanges {
    pub fn block() -> Self {
        Self {
            is_blocked: Some(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.is_blocked.is_none()
    }

    /// Names of the columns this change touches (safe to log)
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.username.is_some() {
            fields.push("username");
        }
        if self.password_hash.is_some() {
            fields.push("hashed_password");
        }
        if self.role.is_some() {
            fields.push("role");
        }
        if self.is_blocked.is_some() {
            fields.push("is_blocked");
        }
        fields
    }

    /// Apply all present fields at once
    pub fn apply_to(&self, identity: &mut Identity, now: DateTime<Utc>) {
        if let Some(username) = &self.username {
            identity.username = username.clone();
        }
        if let Some(password_hash) = &self.password_hash {
            identity.password_hash = password_hash.clone();
        }
        if let Some(role) = &self.role {
            identity.role = role.clone();
        }
        if let Some(is_blocked) = self.is_blocked {
            identity.is_blocked = is_blocked;
        }
        identity.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        let now = Utc::now();
        Identity {
            id: UserId::new(1),
            username: UserName::new("alice").unwrap(),
            password_hash: UserPassword::from_db("$argon2id$stub".to_string()),
            role: UserRole::default(),
            is_blocked: true,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_changes() {
        assert!(IdentityChanges::default().is_empty());
        assert!(IdentityChanges::default().changed_fields().is_empty());
    }

    #[test]
    fn test_explicit_false_is_a_change() {
        let changes = IdentityChanges {
            is_blocked: Some(false),
            ..Default::default()
        };
        assert!(!changes.is_empty());

        let mut target = identity();
        changes.apply_to(&mut target, Utc::now());
        assert!(!target.is_blocked);
        assert!(target.can_login());
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let changes = IdentityChanges {
            role: Some(UserRole::new("editor").unwrap()),
            ..Default::default()
        };
        let mut target = identity();
        changes.apply_to(&mut target, Utc::now());

        assert_eq!(target.role.code(), "editor");
        assert_eq!(target.username.as_str(), "alice");
        assert!(target.is_blocked);
        assert_eq!(changes.changed_fields(), vec!["role"]);
    }

    #[test]
    fn test_block_changes() {
        let changes = IdentityChanges::block();
        assert_eq!(changes.is_blocked, Some(true));
        assert_eq!(changes.changed_fields(), vec!["is_blocked"]);
    }

    #[test]
    fn test_new_identity_is_never_admin() {
        let new = NewIdentity::new(
            UserName::new("bob").unwrap(),
            UserPassword::from_db(String::new()),
            UserRole::new("admin").unwrap(),
        );
        assert!(!new.is_admin);
    }
}
