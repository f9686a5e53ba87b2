use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use examina_application::AccessRepository;
use examina_core::AppResult;
use examina_domain::{
    AccessMergeStats, MenuCatalogRow, MenuItem, NavigationMenu, PermissionEntry,
    ProfileAccessState,
};

mod catalog;
mod merge;
mod overrides;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed repository for the navigation catalog and the
/// per-profile override tables.
#[derive(Clone)]
pub struct PostgresAccessRepository {
    pool: PgPool,
}

impl PostgresAccessRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MenuRow {
    menu_id: String,
    label: String,
    icon: String,
    route: String,
    extra_routes: Option<String>,
    position: i32,
}

#[derive(Debug, FromRow)]
struct MenuCatalogJoinRow {
    menu_id: String,
    menu_label: String,
    submenu_id: Option<String>,
    submenu_label: Option<String>,
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    permission_id: String,
    menu_id: String,
    submenu_id: Option<String>,
    label: String,
    description: Option<String>,
}

#[derive(Debug, FromRow)]
struct OverrideFlagRow {
    id: String,
    enabled: bool,
}

#[derive(Debug, FromRow)]
struct SubmenuParentRow {
    submenu_id: String,
    menu_id: String,
}

#[derive(Debug, FromRow)]
struct PermissionParentRow {
    permission_id: String,
    menu_id: String,
    submenu_id: Option<String>,
}

#[derive(Debug, FromRow)]
struct NavigationJoinRow {
    menu_id: String,
    menu_label: String,
    icon: String,
    route: String,
    extra_routes: Option<String>,
    enabled: bool,
    submenu_id: Option<String>,
    submenu_label: Option<String>,
    submenu_icon: Option<String>,
    submenu_route: Option<String>,
}

#[async_trait]
impl AccessRepository for PostgresAccessRepository {
    async fn list_menus(&self) -> AppResult<Vec<MenuItem>> {
        self.list_menus_impl().await
    }

    async fn menu_catalog(&self) -> AppResult<Vec<MenuCatalogRow>> {
        self.menu_catalog_impl().await
    }

    async fn active_permissions(&self) -> AppResult<Vec<PermissionEntry>> {
        self.active_permissions_impl().await
    }

    async fn profile_access_state(&self, profile_id: &str) -> AppResult<ProfileAccessState> {
        self.profile_access_state_impl(profile_id).await
    }

    async fn merge_access(
        &self,
        profile_id: &str,
        desired: &BTreeMap<String, bool>,
    ) -> AppResult<AccessMergeStats> {
        self.merge_access_impl(profile_id, desired).await
    }

    async fn navigation_for_profile(&self, profile_id: &str) -> AppResult<Vec<NavigationMenu>> {
        self.navigation_for_profile_impl(profile_id).await
    }
}
