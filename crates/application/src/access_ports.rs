use std::collections::BTreeMap;

use async_trait::async_trait;

use examina_core::AppResult;
use examina_domain::{
    AccessMergeStats, MenuCatalogRow, MenuItem, NavigationMenu, PermissionEntry,
    ProfileAccessState,
};

/// Repository port over the navigation catalog and the per-profile override
/// tables.
#[async_trait]
pub trait AccessRepository: Send + Sync {
    /// Lists the full menu catalog in stored position order.
    async fn list_menus(&self) -> AppResult<Vec<MenuItem>>;

    /// Returns the left-joined (menu, submenu) catalog rows in stored
    /// position order.
    async fn menu_catalog(&self) -> AppResult<Vec<MenuCatalogRow>>;

    /// Returns all permissions currently eligible for assignment.
    async fn active_permissions(&self) -> AppResult<Vec<PermissionEntry>>;

    /// Loads one profile's override rows across the three access tables.
    async fn profile_access_state(&self, profile_id: &str) -> AppResult<ProfileAccessState>;

    /// Reconciles a submitted `{id: enabled}` map against the profile's
    /// stored overrides inside one transaction.
    ///
    /// Only changed rows are written; entries whose catalog reference cannot
    /// be resolved are skipped without failing the call. Any storage error
    /// rolls the whole merge back. Concurrent merges for the same profile
    /// are not serialized against each other: both load before either
    /// writes, and the last writer wins.
    async fn merge_access(
        &self,
        profile_id: &str,
        desired: &BTreeMap<String, bool>,
    ) -> AppResult<AccessMergeStats>;

    /// Returns the configured navigation menus for one profile, grouped
    /// with their submenus in catalog order.
    async fn navigation_for_profile(&self, profile_id: &str) -> AppResult<Vec<NavigationMenu>>;
}
