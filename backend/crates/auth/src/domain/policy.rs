//! Authorization Policy
//!
//! Stateless allow/deny decisions for an authenticated actor. A denial is
//! always `Forbidden`; a missing or bad token never reaches this module.

use crate::domain::entity::identity::Identity;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// A protected operation, carrying its target where it has one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListIdentities,
    EditIdentity { target: UserId },
    BlockIdentity { target: UserId },
}

impl Action {
    pub(crate) fn denial_message(&self) -> &'static str {
        match self {
            Action::EditIdentity { .. } => "Not authorized to edit this user",
            Action::ListIdentities | Action::BlockIdentity { .. } => {
                "Not authorized to perform this action"
            }
        }
    }
}

/// | Action | Rule |
/// |---|---|
/// | list all identities | actor is admin |
/// | edit identity fields | actor is the target, or actor is admin |
/// | block an identity | actor is admin |
pub fn allow(actor: &Identity, action: Action) -> bool {
    match action {
        Action::ListIdentities | Action::BlockIdentity { .. } => actor.is_admin,
        Action::EditIdentity { target } => actor.id == target || actor.is_admin,
    }
}

pub fn authorize(actor: &Identity, action: Action) -> AuthResult<()> {
    if allow(actor, action) {
        Ok(())
    } else {
        tracing::warn!(actor_id = %actor.id, ?action, "Authorization denied");
        Err(AuthError::Forbidden(action.denial_message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        user_name::UserName, user_password::UserPassword, user_role::UserRole,
    };
    use chrono::Utc;

    fn actor(id: i64, is_admin: bool) -> Identity {
        let now = Utc::now();
        Identity {
            id: UserId::new(id),
            username: UserName::new(format!("user{id}")).unwrap(),
            password_hash: UserPassword::from_db(String::new()),
            role: UserRole::default(),
            is_blocked: false,
            is_admin,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_list_requires_admin() {
        assert!(allow(&actor(1, true), Action::ListIdentities));
        assert!(!allow(&actor(1, false), Action::ListIdentities));
    }

    #[test]
    fn test_edit_self_or_admin() {
        let target = UserId::new(2);
        assert!(allow(&actor(2, false), Action::EditIdentity { target }));
        assert!(allow(&actor(1, true), Action::EditIdentity { target }));
        assert!(!allow(&actor(1, false), Action::EditIdentity { target }));
    }

    #[test]
    fn test_block_requires_admin_even_for_self() {
        let target = UserId::new(2);
        assert!(!allow(&actor(2, false), Action::BlockIdentity { target }));
        assert!(allow(&actor(1, true), Action::BlockIdentity { target }));
    }

    #[test]
    fn test_denial_is_forbidden() {
        let err = authorize(&actor(1, false), Action::ListIdentities).unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));
        assert_eq!(err.kind(), kernel::error::kind::ErrorKind::Forbidden);

        let err = authorize(
            &actor(1, false),
            Action::EditIdentity {
                target: UserId::new(5),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Not authorized to edit this user");
    }
}
