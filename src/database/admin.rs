use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::admin::Admin;
use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use std::sync::LazyLock;
use uuid::Uuid;

/// A real Argon2 hash generated once at startup, used as a timing decoy
/// so that login requests for non-existent admins take the same time as
/// requests for existing admins.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"dummy-never-matches", &salt)
        .expect("failed to generate dummy hash")
        .to_string()
});

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

pub fn verify_password(admin: &Admin, password: &str) -> Result<(), AppError> {
    let parsed = PasswordHash::new(&admin.password_hash).map_err(|e| AppError::password_hash("Failed to parse stored password hash", e))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::InvalidCredentials)?;

    Ok(())
}

/// Perform a throwaway Argon2 verification to equalize response timing
/// regardless of whether the target account exists.
pub fn dummy_verify(password: &str) {
    let hash = PasswordHash::new(&DUMMY_HASH).expect("invalid dummy hash");
    let _ = Argon2::default().verify_password(password.as_bytes(), &hash);
}

#[async_trait::async_trait]
pub trait AdminRepository {
    async fn create_admin(&self, username: &str, password_hash: &str, department_id: &Uuid) -> Result<Admin, AppError>;
    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>, AppError>;
}

#[async_trait::async_trait]
impl AdminRepository for PostgresRepository {
    async fn create_admin(&self, username: &str, password_hash: &str, department_id: &Uuid) -> Result<Admin, AppError> {
        let result = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (username, password_hash, department_id)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, department_id, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(department_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(admin) => Ok(admin),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::AdminAlreadyExists(username.to_string())),
            Err(e) => Err(AppError::db("Failed to create admin", e)),
        }
    }

    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, username, password_hash, department_id, created_at
            FROM admins
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn admin_with_hash(hash: &str) -> Admin {
        Admin {
            id: Uuid::new_v4(),
            username: "invigilator".to_string(),
            password_hash: hash.to_string(),
            department_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("correct horse battery").expect("hash");
        let admin = admin_with_hash(&hash);
        assert!(verify_password(&admin, "correct horse battery").is_ok());
        assert!(matches!(verify_password(&admin, "wrong password"), Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn garbage_stored_hash_is_an_internal_error() {
        let admin = admin_with_hash("not-a-phc-string");
        assert!(matches!(verify_password(&admin, "anything"), Err(AppError::PasswordHash { .. })));
    }

    #[test]
    fn dummy_verify_does_not_panic() {
        dummy_verify("any password at all");
    }
}
