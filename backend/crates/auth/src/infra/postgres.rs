//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::entity::identity::{Identity, IdentityChanges, NewIdentity};
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    user_id::UserId, user_name::UserName, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

const IDENTITY_COLUMNS: &str =
    "id, username, hashed_password, role, is_blocked, is_admin, created_at, updated_at";

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl IdentityRepository for PgIdentityRepository {
    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(IdentityRow::into_identity))
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(IdentityRow::into_identity))
    }

    async fn exists_by_username(&self, username: &UserName) -> AuthResult<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    async fn insert(&self, identity: &NewIdentity) -> AuthResult<Identity> {
        // The unique index decides the race between concurrent registrations
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            r#"
            INSERT INTO users (username, hashed_password, role, is_blocked, is_admin)
            VALUES ($1, $2, $3, FALSE, $4)
            ON CONFLICT (username) DO NOTHING
            RETURNING {IDENTITY_COLUMNS}
            "#
        ))
        .bind(identity.username.as_str())
        .bind(identity.password_hash.as_str())
        .bind(identity.role.code())
        .bind(identity.is_admin)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        row.map(IdentityRow::into_identity)
            .ok_or(AuthError::UsernameTaken)
    }

    async fn update(&self, id: UserId, changes: &IdentityChanges) -> AuthResult<()> {
        if changes.is_empty() {
            return Err(AuthError::NoFields);
        }

        let mut tx = self.pool.begin().await?;

        let result = build_update(id, changes, Utc::now())
            .build()
            .execute(&mut *tx)
            .await
            .map_err(map_unique_violation)?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(AuthError::UserNotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list(&self) -> AuthResult<Vec<Identity>> {
        let rows = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(IdentityRow::into_identity).collect())
    }
}

/// `UPDATE users SET <present columns>, updated_at = $n WHERE id = $m`
fn build_update(
    id: UserId,
    changes: &IdentityChanges,
    now: DateTime<Utc>,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE users SET ");
    let mut set = qb.separated(", ");

    if let Some(username) = &changes.username {
        set.push("username = ")
            .push_bind_unseparated(username.as_str().to_string());
    }
    if let Some(password_hash) = &changes.password_hash {
        set.push("hashed_password = ")
            .push_bind_unseparated(password_hash.as_str().to_string());
    }
    if let Some(role) = &changes.role {
        set.push("role = ")
            .push_bind_unseparated(role.code().to_string());
    }
    if let Some(is_blocked) = changes.is_blocked {
        set.push("is_blocked = ").push_bind_unseparated(is_blocked);
    }
    set.push("updated_at = ").push_bind_unseparated(now);

    qb.push(" WHERE id = ").push_bind(id.get());
    qb
}

fn map_unique_violation(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::UsernameTaken,
        _ => AuthError::Store(err),
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: i64,
    username: String,
    hashed_password: String,
    role: String,
    is_blocked: bool,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_identity(self) -> Identity {
        Identity {
            id: UserId::new(self.id),
            username: UserName::from_db(self.username),
            password_hash: UserPassword::from_db(self.hashed_password),
            role: UserRole::from_db(self.role),
            is_blocked: self.is_blocked,
            is_admin: self.is_admin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
