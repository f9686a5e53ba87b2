use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One row of the profile navigation join: a configured menu override joined
/// with the menu catalog and left-joined with its submenus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRow {
    /// Menu identifier.
    pub menu_id: String,
    /// Menu label.
    pub menu_label: String,
    /// Menu icon.
    pub icon: String,
    /// Menu route.
    pub route: String,
    /// Optional comma-separated alternate routes.
    pub extra_routes: Option<String>,
    /// Stored override flag for the menu.
    pub enabled: bool,
    /// Submenu identifier, when the menu has submenus.
    pub submenu_id: Option<String>,
    /// Submenu label.
    pub submenu_label: Option<String>,
    /// Submenu icon.
    pub submenu_icon: Option<String>,
    /// Submenu route.
    pub submenu_route: Option<String>,
}

/// A navigation menu resolved for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationMenu {
    /// Menu identifier.
    pub menu_id: String,
    /// Menu label.
    pub label: String,
    /// Menu icon.
    pub icon: String,
    /// Menu route.
    pub route: String,
    /// Optional comma-separated alternate routes.
    pub extra_routes: Option<String>,
    /// Whether the profile's override enables this menu.
    pub enabled: bool,
    /// Submenus under the menu, in row order.
    pub items: Vec<NavigationItem>,
}

/// A submenu entry under a navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    /// Submenu identifier.
    pub submenu_id: String,
    /// Submenu label.
    pub submenu_label: String,
    /// Submenu icon.
    pub icon: String,
    /// Submenu route.
    pub route: String,
}

/// Groups flat navigation join rows into menus in first-seen order.
///
/// Rows are expected pre-sorted by the stored menu/submenu positions; a menu
/// without submenus contributes one row with null submenu columns and ends
/// up with an empty item list.
#[must_use]
pub fn group_navigation_rows(rows: Vec<NavigationRow>) -> Vec<NavigationMenu> {
    let mut menus: Vec<NavigationMenu> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let slot = match slots.get(&row.menu_id) {
            Some(&slot) => slot,
            None => {
                menus.push(NavigationMenu {
                    menu_id: row.menu_id.clone(),
                    label: row.menu_label.clone(),
                    icon: row.icon.clone(),
                    route: row.route.clone(),
                    extra_routes: row.extra_routes.clone(),
                    enabled: row.enabled,
                    items: Vec::new(),
                });
                slots.insert(row.menu_id.clone(), menus.len() - 1);
                menus.len() - 1
            }
        };

        if let (Some(submenu_id), Some(submenu_label)) = (row.submenu_id, row.submenu_label) {
            menus[slot].items.push(NavigationItem {
                submenu_id,
                submenu_label,
                icon: row.submenu_icon.unwrap_or_default(),
                route: row.submenu_route.unwrap_or_default(),
            });
        }
    }

    menus
}

#[cfg(test)]
mod tests {
    use super::{NavigationRow, group_navigation_rows};

    fn row(menu_id: &str, enabled: bool, submenu_id: Option<&str>) -> NavigationRow {
        NavigationRow {
            menu_id: menu_id.to_owned(),
            menu_label: format!("menu {menu_id}"),
            icon: "layers".to_owned(),
            route: format!("/{menu_id}"),
            extra_routes: None,
            enabled,
            submenu_id: submenu_id.map(ToOwned::to_owned),
            submenu_label: submenu_id.map(|id| format!("submenu {id}")),
            submenu_icon: submenu_id.map(|_| "dot".to_owned()),
            submenu_route: submenu_id.map(|id| format!("/{menu_id}/{id}")),
        }
    }

    #[test]
    fn rows_group_into_menus_in_first_seen_order() {
        let rows = vec![
            row("MN02", true, Some("SM03")),
            row("MN02", true, Some("SM04")),
            row("MN01", false, None),
        ];

        let menus = group_navigation_rows(rows);

        assert_eq!(menus.len(), 2);
        assert_eq!(menus[0].menu_id, "MN02");
        assert!(menus[0].enabled);
        assert_eq!(menus[0].items.len(), 2);
        assert_eq!(menus[0].items[1].submenu_id, "SM04");
        assert_eq!(menus[1].menu_id, "MN01");
        assert!(!menus[1].enabled);
        assert!(menus[1].items.is_empty());
    }
}
