use std::collections::BTreeMap;
use std::sync::Arc;

use examina_core::{AppError, AppResult};
use examina_domain::{
    AccessMergeStats, AccessTreeNode, MenuItem, NavigationMenu, build_access_tree,
    is_admin_profile,
};

use crate::access_ports::AccessRepository;

/// Application service for the profile access overlay: the admin checkbox
/// tree on the read side and the override merge on the write side.
#[derive(Clone)]
pub struct AccessService {
    repository: Arc<dyn AccessRepository>,
}

impl AccessService {
    /// Creates a new service from its repository.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessRepository>) -> Self {
        Self { repository }
    }

    /// Lists the full menu catalog.
    pub async fn list_menus(&self) -> AppResult<Vec<MenuItem>> {
        self.repository.list_menus().await
    }

    /// Builds the access tree for one profile.
    ///
    /// Profile existence is not validated here: an unknown profile simply
    /// has no overrides and renders a fully unchecked tree.
    pub async fn access_tree(&self, profile_id: &str) -> AppResult<Vec<AccessTreeNode>> {
        let catalog = self.repository.menu_catalog().await?;
        let permissions = self.repository.active_permissions().await?;
        let overrides = self.repository.profile_access_state(profile_id).await?;

        Ok(build_access_tree(&catalog, &permissions, &overrides))
    }

    /// Merges a submitted `{id: enabled}` map into the profile's overrides.
    ///
    /// The Administrator profile is rejected before any storage work; its
    /// overlay is not manipulable through this path.
    pub async fn update_access(
        &self,
        profile_id: &str,
        desired: &BTreeMap<String, bool>,
    ) -> AppResult<AccessMergeStats> {
        if is_admin_profile(profile_id) {
            return Err(AppError::Forbidden(
                "the administrator profile accesses cannot be modified".to_owned(),
            ));
        }

        self.repository.merge_access(profile_id, desired).await
    }

    /// Returns the configured navigation menus for one profile.
    pub async fn navigation(&self, profile_id: &str) -> AppResult<Vec<NavigationMenu>> {
        self.repository.navigation_for_profile(profile_id).await
    }
}
