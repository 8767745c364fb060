use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::error_log::{ErrorLog, RejectionReason};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait ErrorLogRepository {
    async fn insert_error_log(
        &self,
        session_id: &Uuid,
        matriculation_number: Option<&str>,
        reason: RejectionReason,
        details: &str,
        recorded_at: &DateTime<Utc>,
    ) -> Result<ErrorLog, AppError>;
    async fn list_errors_for_session(&self, session_id: &Uuid) -> Result<Vec<ErrorLog>, AppError>;
}

#[async_trait::async_trait]
impl ErrorLogRepository for PostgresRepository {
    async fn insert_error_log(
        &self,
        session_id: &Uuid,
        matriculation_number: Option<&str>,
        reason: RejectionReason,
        details: &str,
        recorded_at: &DateTime<Utc>,
    ) -> Result<ErrorLog, AppError> {
        let log = sqlx::query_as::<_, ErrorLog>(
            r#"
            INSERT INTO error_logs (session_id, matriculation_number, error_type, details, recorded_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, session_id, matriculation_number, error_type, details, recorded_at
            "#,
        )
        .bind(session_id)
        .bind(matriculation_number)
        .bind(reason.as_db())
        .bind(details)
        .bind(recorded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to record error log", e))?;

        Ok(log)
    }

    async fn list_errors_for_session(&self, session_id: &Uuid) -> Result<Vec<ErrorLog>, AppError> {
        let logs = sqlx::query_as::<_, ErrorLog>(
            r#"
            SELECT id, session_id, matriculation_number, error_type, details, recorded_at
            FROM error_logs
            WHERE session_id = $1
            ORDER BY recorded_at
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to list error logs", e))?;

        Ok(logs)
    }
}
