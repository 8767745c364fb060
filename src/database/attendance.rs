use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::{Attendance, AttendedStudent};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait AttendanceRepository {
    async fn get_attendance(&self, session_id: &Uuid, matriculation_number: &str) -> Result<Option<Attendance>, AppError>;
    /// Insert the success row. Returns `None` when the `(session, matric)`
    /// unique constraint fired, i.e. this attempt lost a race with another
    /// one that already recorded the student.
    async fn try_insert_attendance(
        &self,
        session_id: &Uuid,
        matriculation_number: &str,
        recorded_at: &DateTime<Utc>,
    ) -> Result<Option<Attendance>, AppError>;
    async fn list_attendance_for_session(&self, session_id: &Uuid) -> Result<Vec<AttendedStudent>, AppError>;
}

#[async_trait::async_trait]
impl AttendanceRepository for PostgresRepository {
    async fn get_attendance(&self, session_id: &Uuid, matriculation_number: &str) -> Result<Option<Attendance>, AppError> {
        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT id, session_id, matriculation_number, authenticated, recorded_at
            FROM attendance
            WHERE session_id = $1 AND matriculation_number = $2
            "#,
        )
        .bind(session_id)
        .bind(matriculation_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    async fn try_insert_attendance(
        &self,
        session_id: &Uuid,
        matriculation_number: &str,
        recorded_at: &DateTime<Utc>,
    ) -> Result<Option<Attendance>, AppError> {
        let result = sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendance (session_id, matriculation_number, authenticated, recorded_at)
            VALUES ($1, $2, TRUE, $3)
            RETURNING id, session_id, matriculation_number, authenticated, recorded_at
            "#,
        )
        .bind(session_id)
        .bind(matriculation_number)
        .bind(recorded_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(attendance) => Ok(Some(attendance)),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Ok(None),
            Err(e) => Err(AppError::db("Failed to record attendance", e)),
        }
    }

    async fn list_attendance_for_session(&self, session_id: &Uuid) -> Result<Vec<AttendedStudent>, AppError> {
        let rows = sqlx::query_as::<_, AttendedStudent>(
            r#"
            SELECT a.matriculation_number, s.name, a.recorded_at
            FROM attendance a
            JOIN students s ON s.matriculation_number = a.matriculation_number
            WHERE a.session_id = $1 AND a.authenticated
            ORDER BY a.recorded_at
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to list attendance", e))?;

        Ok(rows)
    }
}
