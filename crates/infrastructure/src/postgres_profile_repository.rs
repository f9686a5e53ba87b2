use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use examina_application::{ProfileRecord, ProfileRepository};
use examina_core::{AppError, AppResult};
use examina_domain::next_code;

/// PostgreSQL-backed repository for profile administration.
#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    profile_id: String,
    name: String,
    created_at: String,
    updated_at: String,
}

impl From<ProfileRow> for ProfileRecord {
    fn from(row: ProfileRow) -> Self {
        Self {
            profile_id: row.profile_id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PROFILE_COLUMNS: &str = r#"
    profile_id,
    name,
    to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
    to_char(updated_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
"#;

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn list_profiles(&self) -> AppResult<Vec<ProfileRecord>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM profiles
            ORDER BY profile_id
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list profiles: {error}")))?;

        Ok(rows.into_iter().map(ProfileRecord::from).collect())
    }

    async fn find_profile(&self, profile_id: &str) -> AppResult<Option<ProfileRecord>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM profiles
            WHERE profile_id = $1
            "#
        ))
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find profile: {error}")))?;

        Ok(row.map(ProfileRecord::from))
    }

    async fn profile_name_exists(
        &self,
        name: &str,
        exclude_profile_id: Option<&str>,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM profiles
                WHERE LOWER(name) = LOWER($1)
                    AND ($2::text IS NULL OR profile_id <> $2)
            )
            "#,
        )
        .bind(name)
        .bind(exclude_profile_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check profile name: {error}")))
    }

    async fn create_profile(&self, name: &str) -> AppResult<ProfileRecord> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let last_profile_id = sqlx::query_scalar::<_, String>(
            r#"
            SELECT profile_id
            FROM profiles
            ORDER BY profile_id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to resolve last profile id: {error}"))
        })?
        .unwrap_or_else(|| "PF0000".to_owned());

        let profile_id = next_code(last_profile_id.as_str());

        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            INSERT INTO profiles (profile_id, name)
            VALUES ($1, $2)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile_id.as_str())
        .bind(name)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| map_profile_conflict(error, name))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(ProfileRecord::from(row))
    }

    async fn rename_profile(&self, profile_id: &str, name: &str) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE profiles
            SET name = $1, updated_at = now()
            WHERE profile_id = $2
            "#,
        )
        .bind(name)
        .bind(profile_id)
        .execute(&self.pool)
        .await
        .map_err(|error| map_profile_conflict(error, name))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "profile '{profile_id}' was not found"
            )));
        }

        Ok(())
    }

    async fn delete_profile(&self, profile_id: &str) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM profiles
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete profile: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "profile '{profile_id}' was not found"
            )));
        }

        Ok(())
    }

    async fn has_access_assignments(&self, profile_id: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM profile_menu_access
                WHERE profile_id = $1
            )
            "#,
        )
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to check profile assignments: {error}"))
        })
    }
}

fn map_profile_conflict(error: sqlx::Error, name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("profile name '{name}' is already in use"));
    }

    AppError::Internal(format!("failed to persist profile: {error}"))
}
