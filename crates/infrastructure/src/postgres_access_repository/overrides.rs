use super::*;

use examina_core::AppError;

impl PostgresAccessRepository {
    pub(super) async fn profile_access_state_impl(
        &self,
        profile_id: &str,
    ) -> AppResult<ProfileAccessState> {
        let menus = sqlx::query_as::<_, OverrideFlagRow>(
            r#"
            SELECT menu_id AS id, enabled
            FROM profile_menu_access
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load menu overrides: {error}")))?;

        let submenus = sqlx::query_as::<_, OverrideFlagRow>(
            r#"
            SELECT submenu_id AS id, enabled
            FROM profile_submenu_access
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load submenu overrides: {error}"))
        })?;

        let permissions = sqlx::query_as::<_, OverrideFlagRow>(
            r#"
            SELECT permission_id AS id, enabled
            FROM profile_permission_access
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load permission overrides: {error}"))
        })?;

        Ok(ProfileAccessState {
            menus: menus.into_iter().map(|row| (row.id, row.enabled)).collect(),
            submenus: submenus
                .into_iter()
                .map(|row| (row.id, row.enabled))
                .collect(),
            permissions: permissions
                .into_iter()
                .map(|row| (row.id, row.enabled))
                .collect(),
        })
    }
}
