//! User repository.
//!
//! Users are never registered directly: the external OAuth provider owns
//! sign-in, and a row is created lazily from session claims the first time
//! an authenticated caller writes. Both upload paths and article creation
//! share [`UserRepository::resolve_or_create`] so owner resolution cannot
//! diverge between them.

use kinarc_core::models::{SessionIdentity, UploaderInfo, User};
use kinarc_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, name, image, created_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the stored user for a session identity, creating one when
    /// absent. Resolution order: by email, then by id, then create. The
    /// create is an upsert so a concurrent first request for the same
    /// account settles on one row.
    pub async fn resolve_or_create(&self, identity: &SessionIdentity) -> Result<User, AppError> {
        if let Some(email) = &identity.email {
            if let Some(user) = self.find_by_email(email).await? {
                return Ok(user);
            }
        }

        if let Some(user) = self.find_by_id(identity.user_id).await? {
            return Ok(user);
        }

        let user = if let Some(email) = &identity.email {
            sqlx::query_as::<_, User>(&format!(
                r#"
                INSERT INTO users (email, name, image)
                VALUES ($1, $2, $3)
                ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
                RETURNING {}
                "#,
                USER_COLUMNS
            ))
            .bind(email)
            .bind(&identity.name)
            .bind(&identity.image)
            .fetch_one(&self.pool)
            .await?
        } else {
            // No email claim: pin the row to the session id so the foreign
            // key matches the asserted identity on every later request.
            sqlx::query_as::<_, User>(&format!(
                r#"
                INSERT INTO users (id, name, image)
                VALUES ($1, $2, $3)
                ON CONFLICT (id) DO UPDATE SET name = COALESCE(users.name, EXCLUDED.name)
                RETURNING {}
                "#,
                USER_COLUMNS
            ))
            .bind(identity.user_id)
            .bind(&identity.name)
            .bind(&identity.image)
            .fetch_one(&self.pool)
            .await?
        };

        tracing::info!(user_id = %user.id, "Created user from session claims");

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn public_info(&self, id: Uuid) -> Result<Option<UploaderInfo>, AppError> {
        Ok(self.find_by_id(id).await?.map(|u| u.public_info()))
    }
}
