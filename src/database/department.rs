use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::department::{Department, Level};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait DepartmentRepository {
    async fn list_departments(&self) -> Result<Vec<Department>, AppError>;
    async fn get_department(&self, id: &Uuid) -> Result<Option<Department>, AppError>;
    async fn get_level(&self, id: &Uuid) -> Result<Option<Level>, AppError>;
    async fn list_levels_for_department(&self, department_id: &Uuid) -> Result<Vec<Level>, AppError>;
}

#[async_trait::async_trait]
impl DepartmentRepository for PostgresRepository {
    async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::db("Failed to list departments", e))?;

        Ok(departments)
    }

    async fn get_department(&self, id: &Uuid) -> Result<Option<Department>, AppError> {
        let department = sqlx::query_as::<_, Department>("SELECT id, name FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(department)
    }

    async fn get_level(&self, id: &Uuid) -> Result<Option<Level>, AppError> {
        let level = sqlx::query_as::<_, Level>("SELECT id, name, department_id FROM levels WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(level)
    }

    async fn list_levels_for_department(&self, department_id: &Uuid) -> Result<Vec<Level>, AppError> {
        let levels = sqlx::query_as::<_, Level>(
            r#"
            SELECT id, name, department_id
            FROM levels
            WHERE department_id = $1
            ORDER BY name
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to list levels", e))?;

        Ok(levels)
    }
}
