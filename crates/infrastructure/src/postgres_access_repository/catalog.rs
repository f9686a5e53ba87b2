use super::*;

use examina_core::AppError;
use examina_domain::{NavigationRow, group_navigation_rows};

impl PostgresAccessRepository {
    pub(super) async fn list_menus_impl(&self) -> AppResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT menu_id, label, icon, route, extra_routes, position
            FROM menus
            ORDER BY position, menu_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list menus: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| MenuItem {
                menu_id: row.menu_id,
                label: row.label,
                icon: row.icon,
                route: row.route,
                extra_routes: row.extra_routes,
                position: row.position,
            })
            .collect())
    }

    pub(super) async fn menu_catalog_impl(&self) -> AppResult<Vec<MenuCatalogRow>> {
        let rows = sqlx::query_as::<_, MenuCatalogJoinRow>(
            r#"
            SELECT
                menus.menu_id,
                menus.label AS menu_label,
                submenus.submenu_id,
                submenus.label AS submenu_label
            FROM menus
            LEFT JOIN submenus
                ON submenus.menu_id = menus.menu_id
            ORDER BY menus.position, menus.menu_id, submenus.position, submenus.submenu_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load menu catalog: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| MenuCatalogRow {
                menu_id: row.menu_id,
                menu_label: row.menu_label,
                submenu_id: row.submenu_id,
                submenu_label: row.submenu_label,
            })
            .collect())
    }

    pub(super) async fn active_permissions_impl(&self) -> AppResult<Vec<PermissionEntry>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT permission_id, menu_id, submenu_id, label, description
            FROM permissions
            WHERE active
            ORDER BY permission_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load permissions: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| PermissionEntry {
                permission_id: row.permission_id,
                menu_id: row.menu_id,
                submenu_id: row.submenu_id,
                label: row.label,
                description: row.description,
            })
            .collect())
    }

    pub(super) async fn navigation_for_profile_impl(
        &self,
        profile_id: &str,
    ) -> AppResult<Vec<NavigationMenu>> {
        let rows = sqlx::query_as::<_, NavigationJoinRow>(
            r#"
            SELECT
                menus.menu_id,
                menus.label AS menu_label,
                menus.icon,
                menus.route,
                menus.extra_routes,
                access.enabled,
                submenus.submenu_id,
                submenus.label AS submenu_label,
                submenus.icon AS submenu_icon,
                submenus.route AS submenu_route
            FROM profile_menu_access AS access
            INNER JOIN menus
                ON menus.menu_id = access.menu_id
            LEFT JOIN submenus
                ON submenus.menu_id = menus.menu_id
            WHERE access.profile_id = $1
            ORDER BY menus.position, menus.menu_id, submenus.position, submenus.submenu_id
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load navigation: {error}")))?;

        Ok(group_navigation_rows(
            rows.into_iter()
                .map(|row| NavigationRow {
                    menu_id: row.menu_id,
                    menu_label: row.menu_label,
                    icon: row.icon,
                    route: row.route,
                    extra_routes: row.extra_routes,
                    enabled: row.enabled,
                    submenu_id: row.submenu_id,
                    submenu_label: row.submenu_label,
                    submenu_icon: row.submenu_icon,
                    submenu_route: row.submenu_route,
                })
                .collect(),
        ))
    }
}
