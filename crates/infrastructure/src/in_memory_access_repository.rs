use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use examina_application::AccessRepository;
use examina_core::{AppError, AppResult};
use examina_domain::{
    AccessMergeStats, MenuCatalogRow, MenuItem, NavigationMenu, NavigationRow, PermissionEntry,
    PermissionParents, ProfileAccessState, group_navigation_rows, plan_access_merge,
};

#[derive(Debug, Clone)]
struct StoredSubmenu {
    submenu_id: String,
    menu_id: String,
    label: String,
    position: i32,
}

#[derive(Debug, Clone)]
struct StoredPermission {
    entry: PermissionEntry,
    active: bool,
}

#[derive(Debug, Default)]
struct Store {
    menus: Vec<MenuItem>,
    submenus: Vec<StoredSubmenu>,
    permissions: Vec<StoredPermission>,
    menu_overrides: HashMap<(String, String), bool>,
    submenu_overrides: HashMap<(String, String), (String, bool)>,
    permission_overrides: HashMap<(String, String), (String, Option<String>, bool)>,
    writes: usize,
    fail_after_writes: Option<usize>,
}

impl Store {
    fn state_for(&self, profile_id: &str) -> ProfileAccessState {
        let mut state = ProfileAccessState::default();

        for ((stored_profile_id, menu_id), enabled) in &self.menu_overrides {
            if stored_profile_id == profile_id {
                state.menus.insert(menu_id.clone(), *enabled);
            }
        }
        for ((stored_profile_id, submenu_id), (_, enabled)) in &self.submenu_overrides {
            if stored_profile_id == profile_id {
                state.submenus.insert(submenu_id.clone(), *enabled);
            }
        }
        for ((stored_profile_id, permission_id), (_, _, enabled)) in &self.permission_overrides {
            if stored_profile_id == profile_id {
                state.permissions.insert(permission_id.clone(), *enabled);
            }
        }

        state
    }

    fn sorted_menus(&self) -> Vec<MenuItem> {
        let mut menus = self.menus.clone();
        menus.sort_by(|left, right| {
            left.position
                .cmp(&right.position)
                .then_with(|| left.menu_id.cmp(&right.menu_id))
        });
        menus
    }

    fn sorted_submenus_of(&self, menu_id: &str) -> Vec<StoredSubmenu> {
        let mut submenus: Vec<StoredSubmenu> = self
            .submenus
            .iter()
            .filter(|submenu| submenu.menu_id == menu_id)
            .cloned()
            .collect();
        submenus.sort_by(|left, right| {
            left.position
                .cmp(&right.position)
                .then_with(|| left.submenu_id.cmp(&right.submenu_id))
        });
        submenus
    }
}

/// In-memory access repository used by handler tests.
///
/// Merges stage their writes on cloned override maps and only publish them
/// when every write succeeds, mirroring the transactional all-or-nothing
/// behavior of the Postgres implementation. A configurable write budget
/// simulates a storage failure mid-merge.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    store: RwLock<Store>,
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
        }
    }

    /// Adds a menu to the catalog.
    pub async fn seed_menu(&self, menu: MenuItem) {
        self.store.write().await.menus.push(menu);
    }

    /// Adds a submenu under an existing menu.
    pub async fn seed_submenu(&self, submenu_id: &str, menu_id: &str, label: &str, position: i32) {
        self.store.write().await.submenus.push(StoredSubmenu {
            submenu_id: submenu_id.to_owned(),
            menu_id: menu_id.to_owned(),
            label: label.to_owned(),
            position,
        });
    }

    /// Adds a permission to the catalog.
    pub async fn seed_permission(&self, entry: PermissionEntry, active: bool) {
        self.store
            .write()
            .await
            .permissions
            .push(StoredPermission { entry, active });
    }

    /// Total number of override rows written so far.
    pub async fn write_count(&self) -> usize {
        self.store.read().await.writes
    }

    /// Makes the next merge fail once `limit` writes have been attempted.
    pub async fn fail_after_writes(&self, limit: usize) {
        self.store.write().await.fail_after_writes = Some(limit);
    }
}

#[async_trait]
impl AccessRepository for InMemoryAccessRepository {
    async fn list_menus(&self) -> AppResult<Vec<MenuItem>> {
        Ok(self.store.read().await.sorted_menus())
    }

    async fn menu_catalog(&self) -> AppResult<Vec<MenuCatalogRow>> {
        let store = self.store.read().await;

        let mut rows = Vec::new();
        for menu in store.sorted_menus() {
            let submenus = store.sorted_submenus_of(&menu.menu_id);
            if submenus.is_empty() {
                rows.push(MenuCatalogRow {
                    menu_id: menu.menu_id.clone(),
                    menu_label: menu.label.clone(),
                    submenu_id: None,
                    submenu_label: None,
                });
                continue;
            }

            for submenu in submenus {
                rows.push(MenuCatalogRow {
                    menu_id: menu.menu_id.clone(),
                    menu_label: menu.label.clone(),
                    submenu_id: Some(submenu.submenu_id),
                    submenu_label: Some(submenu.label),
                });
            }
        }

        Ok(rows)
    }

    async fn active_permissions(&self) -> AppResult<Vec<PermissionEntry>> {
        let store = self.store.read().await;

        let mut entries: Vec<PermissionEntry> = store
            .permissions
            .iter()
            .filter(|permission| permission.active)
            .map(|permission| permission.entry.clone())
            .collect();
        entries.sort_by(|left, right| left.permission_id.cmp(&right.permission_id));

        Ok(entries)
    }

    async fn profile_access_state(&self, profile_id: &str) -> AppResult<ProfileAccessState> {
        Ok(self.store.read().await.state_for(profile_id))
    }

    async fn merge_access(
        &self,
        profile_id: &str,
        desired: &BTreeMap<String, bool>,
    ) -> AppResult<AccessMergeStats> {
        let mut store = self.store.write().await;

        let current = store.state_for(profile_id);
        let submenu_parents: HashMap<String, String> = store
            .submenus
            .iter()
            .map(|submenu| (submenu.submenu_id.clone(), submenu.menu_id.clone()))
            .collect();
        let permission_parents: HashMap<String, PermissionParents> = store
            .permissions
            .iter()
            .map(|permission| {
                (
                    permission.entry.permission_id.clone(),
                    PermissionParents {
                        menu_id: permission.entry.menu_id.clone(),
                        submenu_id: permission.entry.submenu_id.clone(),
                    },
                )
            })
            .collect();

        let plan = plan_access_merge(&current, &submenu_parents, &permission_parents, desired);

        // Stage every write on clones; publish only when all of them fit
        // within the configured write budget.
        let mut menu_overrides = store.menu_overrides.clone();
        let mut submenu_overrides = store.submenu_overrides.clone();
        let mut permission_overrides = store.permission_overrides.clone();

        let budget = store.fail_after_writes;
        let mut attempted = 0usize;
        let mut charge = || -> AppResult<()> {
            if let Some(limit) = budget
                && attempted >= limit
            {
                return Err(AppError::Internal(
                    "simulated write failure during merge".to_owned(),
                ));
            }
            attempted += 1;
            Ok(())
        };

        for change in &plan.menu_updates {
            charge()?;
            menu_overrides.insert((profile_id.to_owned(), change.id.clone()), change.enabled);
        }
        for row in &plan.menu_inserts {
            // Menu entries carry no parent lookup, so an identifier outside
            // the catalog surfaces here the way the foreign key does in
            // Postgres: the whole merge fails.
            if !store.menus.iter().any(|menu| menu.menu_id == row.menu_id) {
                return Err(AppError::Internal(format!(
                    "menu '{}' is not in the catalog",
                    row.menu_id
                )));
            }
            charge()?;
            menu_overrides.insert((profile_id.to_owned(), row.menu_id.clone()), row.enabled);
        }
        for change in &plan.submenu_updates {
            charge()?;
            if let Some((_, enabled)) =
                submenu_overrides.get_mut(&(profile_id.to_owned(), change.id.clone()))
            {
                *enabled = change.enabled;
            }
        }
        for row in &plan.submenu_inserts {
            charge()?;
            submenu_overrides.insert(
                (profile_id.to_owned(), row.submenu_id.clone()),
                (row.menu_id.clone(), row.enabled),
            );
        }
        for change in &plan.permission_updates {
            charge()?;
            if let Some((_, _, enabled)) =
                permission_overrides.get_mut(&(profile_id.to_owned(), change.id.clone()))
            {
                *enabled = change.enabled;
            }
        }
        for row in &plan.permission_inserts {
            charge()?;
            permission_overrides.insert(
                (profile_id.to_owned(), row.permission_id.clone()),
                (row.menu_id.clone(), row.submenu_id.clone(), row.enabled),
            );
        }

        store.menu_overrides = menu_overrides;
        store.submenu_overrides = submenu_overrides;
        store.permission_overrides = permission_overrides;
        store.writes += plan.write_count();

        Ok(plan.stats())
    }

    async fn navigation_for_profile(&self, profile_id: &str) -> AppResult<Vec<NavigationMenu>> {
        let store = self.store.read().await;

        let mut rows = Vec::new();
        for menu in store.sorted_menus() {
            let Some(&enabled) = store
                .menu_overrides
                .get(&(profile_id.to_owned(), menu.menu_id.clone()))
            else {
                continue;
            };

            let submenus = store.sorted_submenus_of(&menu.menu_id);
            if submenus.is_empty() {
                rows.push(NavigationRow {
                    menu_id: menu.menu_id.clone(),
                    menu_label: menu.label.clone(),
                    icon: menu.icon.clone(),
                    route: menu.route.clone(),
                    extra_routes: menu.extra_routes.clone(),
                    enabled,
                    submenu_id: None,
                    submenu_label: None,
                    submenu_icon: None,
                    submenu_route: None,
                });
                continue;
            }

            for submenu in submenus {
                rows.push(NavigationRow {
                    menu_id: menu.menu_id.clone(),
                    menu_label: menu.label.clone(),
                    icon: menu.icon.clone(),
                    route: menu.route.clone(),
                    extra_routes: menu.extra_routes.clone(),
                    enabled,
                    submenu_id: Some(submenu.submenu_id),
                    submenu_label: Some(submenu.label),
                    submenu_icon: Some(String::new()),
                    submenu_route: Some(String::new()),
                });
            }
        }

        Ok(group_navigation_rows(rows))
    }
}
