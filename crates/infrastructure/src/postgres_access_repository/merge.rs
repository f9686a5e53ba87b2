use std::collections::HashMap;

use sqlx::{Postgres, Transaction};
use tracing::debug;

use super::*;

use examina_core::AppError;
use examina_domain::{PermissionParents, plan_access_merge};

impl PostgresAccessRepository {
    /// Reconciles the submitted access map inside one transaction.
    ///
    /// The current overrides, the submenu parent index, and the full
    /// permission catalog are read within the transaction, the write set is
    /// planned in memory, and only changed rows are written. Any failure
    /// rolls the whole merge back. Two concurrent merges for the same
    /// profile may both plan against the pre-write state; the last writer
    /// wins.
    pub(super) async fn merge_access_impl(
        &self,
        profile_id: &str,
        desired: &BTreeMap<String, bool>,
    ) -> AppResult<AccessMergeStats> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let current =
            load_profile_state(&mut transaction, profile_id).await?;

        let submenu_parents = sqlx::query_as::<_, SubmenuParentRow>(
            r#"
            SELECT submenu_id, menu_id
            FROM submenus
            "#,
        )
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load submenu parents: {error}")))?
        .into_iter()
        .map(|row| (row.submenu_id, row.menu_id))
        .collect::<HashMap<_, _>>();

        let permission_parents = sqlx::query_as::<_, PermissionParentRow>(
            r#"
            SELECT permission_id, menu_id, submenu_id
            FROM permissions
            "#,
        )
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load permission parents: {error}"))
        })?
        .into_iter()
        .map(|row| {
            (
                row.permission_id,
                PermissionParents {
                    menu_id: row.menu_id,
                    submenu_id: row.submenu_id,
                },
            )
        })
        .collect::<HashMap<_, _>>();

        let plan = plan_access_merge(&current, &submenu_parents, &permission_parents, desired);

        for change in &plan.menu_updates {
            sqlx::query(
                r#"
                UPDATE profile_menu_access
                SET enabled = $1
                WHERE profile_id = $2 AND menu_id = $3
                "#,
            )
            .bind(change.enabled)
            .bind(profile_id)
            .bind(change.id.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to update menu override: {error}"))
            })?;
        }

        for row in &plan.menu_inserts {
            sqlx::query(
                r#"
                INSERT INTO profile_menu_access (profile_id, menu_id, enabled)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(profile_id)
            .bind(row.menu_id.as_str())
            .bind(row.enabled)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to insert menu override: {error}"))
            })?;
        }

        for change in &plan.submenu_updates {
            sqlx::query(
                r#"
                UPDATE profile_submenu_access
                SET enabled = $1
                WHERE profile_id = $2 AND submenu_id = $3
                "#,
            )
            .bind(change.enabled)
            .bind(profile_id)
            .bind(change.id.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to update submenu override: {error}"))
            })?;
        }

        for row in &plan.submenu_inserts {
            sqlx::query(
                r#"
                INSERT INTO profile_submenu_access (profile_id, menu_id, submenu_id, enabled)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(profile_id)
            .bind(row.menu_id.as_str())
            .bind(row.submenu_id.as_str())
            .bind(row.enabled)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to insert submenu override: {error}"))
            })?;
        }

        for change in &plan.permission_updates {
            sqlx::query(
                r#"
                UPDATE profile_permission_access
                SET enabled = $1
                WHERE profile_id = $2 AND permission_id = $3
                "#,
            )
            .bind(change.enabled)
            .bind(profile_id)
            .bind(change.id.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to update permission override: {error}"))
            })?;
        }

        for row in &plan.permission_inserts {
            sqlx::query(
                r#"
                INSERT INTO profile_permission_access
                    (profile_id, menu_id, submenu_id, permission_id, enabled)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(profile_id)
            .bind(row.menu_id.as_str())
            .bind(row.submenu_id.as_deref())
            .bind(row.permission_id.as_str())
            .bind(row.enabled)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to insert permission override: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        let stats = plan.stats();
        debug!(
            profile_id,
            inserted = stats.inserted,
            updated = stats.updated,
            skipped = stats.skipped,
            "merged profile accesses"
        );

        Ok(stats)
    }
}

async fn load_profile_state(
    transaction: &mut Transaction<'_, Postgres>,
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
    .fetch_all(&mut **transaction)
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
    .fetch_all(&mut **transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to load submenu overrides: {error}")))?;

    let permissions = sqlx::query_as::<_, OverrideFlagRow>(
        r#"
        SELECT permission_id AS id, enabled
        FROM profile_permission_access
        WHERE profile_id = $1
        "#,
    )
    .bind(profile_id)
    .fetch_all(&mut **transaction)
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
