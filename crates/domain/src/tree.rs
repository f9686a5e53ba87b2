use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::access::{AccessItemKind, MenuCatalogRow, PermissionEntry, ProfileAccessState};

/// One node of the profile access tree rendered by the admin UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTreeNode {
    /// Item identifier (`MN`/`SM`/`PM` prefixed).
    pub id: String,
    /// Node kind, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: AccessItemKind,
    /// Display label.
    pub label: String,
    /// Whether the item is enabled for the profile.
    pub checked: bool,
    /// Child nodes; empty for permissions.
    pub children: Vec<AccessTreeNode>,
}

/// Merges the catalog with one profile's overrides into a nested tree.
///
/// Menus are emitted in first-seen catalog order and submenus in row order;
/// callers pre-sort the catalog query by the stored positions. Submenu rows
/// are appended without deduplication, which is safe because the catalog
/// query groups each (menu, submenu) pair into a single row. A permission
/// whose submenu does not appear in the catalog is dropped silently.
#[must_use]
pub fn build_access_tree(
    menu_catalog: &[MenuCatalogRow],
    permissions: &[PermissionEntry],
    overrides: &ProfileAccessState,
) -> Vec<AccessTreeNode> {
    let mut nodes: Vec<AccessTreeNode> = Vec::new();
    let mut menu_slots: HashMap<&str, usize> = HashMap::new();

    for row in menu_catalog {
        let slot = *menu_slots.entry(row.menu_id.as_str()).or_insert_with(|| {
            nodes.push(AccessTreeNode {
                id: row.menu_id.clone(),
                kind: AccessItemKind::Menu,
                label: row.menu_label.clone(),
                checked: overrides.menu_enabled(&row.menu_id),
                children: Vec::new(),
            });
            nodes.len() - 1
        });

        if let (Some(submenu_id), Some(submenu_label)) = (&row.submenu_id, &row.submenu_label) {
            nodes[slot].children.push(AccessTreeNode {
                id: submenu_id.clone(),
                kind: AccessItemKind::Submenu,
                label: submenu_label.clone(),
                checked: overrides.submenu_enabled(submenu_id),
                children: Vec::new(),
            });
        }
    }

    let mut submenu_slots: HashMap<String, (usize, usize)> = HashMap::new();
    for (menu_slot, menu) in nodes.iter().enumerate() {
        for (child_slot, submenu) in menu.children.iter().enumerate() {
            submenu_slots.insert(submenu.id.clone(), (menu_slot, child_slot));
        }
    }

    for permission in permissions {
        let Some(submenu_id) = permission.submenu_id.as_deref() else {
            continue;
        };
        let Some(&(menu_slot, child_slot)) = submenu_slots.get(submenu_id) else {
            continue;
        };

        nodes[menu_slot].children[child_slot]
            .children
            .push(AccessTreeNode {
                id: permission.permission_id.clone(),
                kind: AccessItemKind::Permission,
                label: permission.label.clone(),
                checked: overrides.permission_enabled(&permission.permission_id),
                children: Vec::new(),
            });
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::{AccessTreeNode, build_access_tree};
    use crate::access::{AccessItemKind, MenuCatalogRow, PermissionEntry, ProfileAccessState};

    fn catalog_row(
        menu_id: &str,
        menu_label: &str,
        submenu: Option<(&str, &str)>,
    ) -> MenuCatalogRow {
        MenuCatalogRow {
            menu_id: menu_id.to_owned(),
            menu_label: menu_label.to_owned(),
            submenu_id: submenu.map(|(id, _)| id.to_owned()),
            submenu_label: submenu.map(|(_, label)| label.to_owned()),
        }
    }

    fn permission(permission_id: &str, menu_id: &str, submenu_id: &str) -> PermissionEntry {
        PermissionEntry {
            permission_id: permission_id.to_owned(),
            menu_id: menu_id.to_owned(),
            submenu_id: Some(submenu_id.to_owned()),
            label: format!("permission {permission_id}"),
            description: None,
        }
    }

    #[test]
    fn empty_overrides_render_unchecked() {
        let catalog = vec![catalog_row("MN01", "Exams", Some(("SM01", "Simulations")))];
        let permissions = vec![permission("PM01", "MN01", "SM01")];

        let tree = build_access_tree(&catalog, &permissions, &ProfileAccessState::default());

        assert_eq!(tree.len(), 1);
        let menu = &tree[0];
        assert_eq!(menu.id, "MN01");
        assert_eq!(menu.kind, AccessItemKind::Menu);
        assert!(!menu.checked);
        assert_eq!(menu.children.len(), 1);
        let submenu = &menu.children[0];
        assert_eq!(submenu.id, "SM01");
        assert!(!submenu.checked);
        assert_eq!(submenu.children.len(), 1);
        let leaf = &submenu.children[0];
        assert_eq!(leaf.id, "PM01");
        assert!(!leaf.checked);
        assert!(leaf.children.is_empty());
    }

    #[test]
    fn checked_follows_enabled_overrides_only() {
        let catalog = vec![
            catalog_row("MN01", "Exams", Some(("SM01", "Simulations"))),
            catalog_row("MN02", "Reports", None),
        ];
        let mut overrides = ProfileAccessState::default();
        overrides.menus.insert("MN01".to_owned(), true);
        overrides.menus.insert("MN02".to_owned(), false);
        overrides.submenus.insert("SM01".to_owned(), true);

        let tree = build_access_tree(&catalog, &[], &overrides);

        assert!(tree[0].checked);
        assert!(tree[0].children[0].checked);
        assert!(!tree[1].checked);
    }

    #[test]
    fn menu_without_submenus_keeps_empty_children() {
        let catalog = vec![catalog_row("MN02", "Reports", None)];

        let tree = build_access_tree(&catalog, &[], &ProfileAccessState::default());

        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn permission_with_unknown_submenu_is_dropped() {
        let catalog = vec![catalog_row("MN01", "Exams", Some(("SM01", "Simulations")))];
        let permissions = vec![
            permission("PM01", "MN01", "SM01"),
            permission("PM02", "MN01", "SM99"),
        ];

        let tree = build_access_tree(&catalog, &permissions, &ProfileAccessState::default());

        let submenu = &tree[0].children[0];
        assert_eq!(submenu.children.len(), 1);
        assert_eq!(submenu.children[0].id, "PM01");
        assert!(!contains_id(&tree, "PM02"));
    }

    #[test]
    fn menu_only_permission_is_dropped() {
        let catalog = vec![catalog_row("MN01", "Exams", Some(("SM01", "Simulations")))];
        let permissions = vec![PermissionEntry {
            permission_id: "PM03".to_owned(),
            menu_id: "MN01".to_owned(),
            submenu_id: None,
            label: "orphan".to_owned(),
            description: None,
        }];

        let tree = build_access_tree(&catalog, &permissions, &ProfileAccessState::default());

        assert!(!contains_id(&tree, "PM03"));
    }

    #[test]
    fn menu_order_mirrors_catalog_order() {
        let catalog = vec![
            catalog_row("MN03", "Progress", None),
            catalog_row("MN01", "Exams", Some(("SM01", "Simulations"))),
            catalog_row("MN01", "Exams", Some(("SM02", "Drills"))),
        ];

        let tree = build_access_tree(&catalog, &[], &ProfileAccessState::default());

        let ids: Vec<&str> = tree.iter().map(|node| node.id.as_str()).collect();
        assert_eq!(ids, vec!["MN03", "MN01"]);
        let submenu_ids: Vec<&str> = tree[1]
            .children
            .iter()
            .map(|node| node.id.as_str())
            .collect();
        assert_eq!(submenu_ids, vec!["SM01", "SM02"]);
    }

    #[test]
    fn nodes_serialize_with_wire_labels() {
        let catalog = vec![catalog_row("MN01", "Exams", None)];
        let tree = build_access_tree(&catalog, &[], &ProfileAccessState::default());

        let encoded = serde_json::to_value(&tree[0]);
        assert!(matches!(
            encoded,
            Ok(value) if value["type"] == "MENU" && value["checked"] == false
        ));
    }

    fn contains_id(nodes: &[AccessTreeNode], id: &str) -> bool {
        nodes
            .iter()
            .any(|node| node.id == id || contains_id(&node.children, id))
    }
}
