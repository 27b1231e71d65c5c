//! Password hashing off the async executor
//!
//! Argon2id is memory- and CPU-hard; running it on a runtime worker would
//! stall every other request on that thread.

use tokio::task;

use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Hash `password` on the blocking pool
pub async fn hash_password(
    password: RawPassword,
    pepper: Option<Vec<u8>>,
) -> AuthResult<UserPassword> {
    task::spawn_blocking(move || UserPassword::from_raw(&password, pepper.as_deref()))
        .await
        .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {e}")))?
}

/// Verify `password` against `stored` on the blocking pool
pub async fn verify_password(
    password: RawPassword,
    stored: UserPassword,
    pepper: Option<Vec<u8>>,
) -> AuthResult<bool> {
    task::spawn_blocking(move || stored.verify(&password, pepper.as_deref()))
        .await
        .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password(RawPassword::new("pw1".to_string()).unwrap(), None)
            .await
            .unwrap();

        let ok = verify_password(RawPassword::new("pw1".to_string()).unwrap(), hash.clone(), None)
            .await
            .unwrap();
        let wrong = verify_password(RawPassword::new("pw2".to_string()).unwrap(), hash, None)
            .await
            .unwrap();

        assert!(ok);
        assert!(!wrong);
    }

    #[tokio::test]
    async fn test_pepper_must_match() {
        let pepper = Some(b"pepper".to_vec());
        let hash = hash_password(RawPassword::new("secret".to_string()).unwrap(), pepper.clone())
            .await
            .unwrap();

        assert!(
            verify_password(RawPassword::new("secret".to_string()).unwrap(), hash.clone(), pepper)
                .await
                .unwrap()
        );
        assert!(
            !verify_password(RawPassword::new("secret".to_string()).unwrap(), hash, None)
                .await
                .unwrap()
        );
    }
}
