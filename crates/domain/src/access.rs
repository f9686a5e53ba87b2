use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The kind of a navigation-surface item, derived from its identifier prefix.
///
/// Identifiers carry their kind as a two-letter prefix (`MN0001`, `SM0003`,
/// `PM0010`). The prefix is the sole dispatch key for routing generic
/// `{id: enabled}` entries to the matching override table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessItemKind {
    /// Top-level menu entry.
    #[serde(rename = "MENU")]
    Menu,
    /// Submenu entry under a menu.
    #[serde(rename = "SUBMENU")]
    Submenu,
    /// Permission attached to a menu/submenu pair.
    #[serde(rename = "PERMISO")]
    Permission,
}

impl AccessItemKind {
    /// Classifies an identifier by its prefix.
    ///
    /// Returns `None` for identifiers outside the three known prefixes;
    /// callers are expected to ignore those entries silently.
    #[must_use]
    pub fn classify(id: &str) -> Option<Self> {
        if id.starts_with("MN") {
            Some(Self::Menu)
        } else if id.starts_with("SM") {
            Some(Self::Submenu)
        } else if id.starts_with("PM") {
            Some(Self::Permission)
        } else {
            None
        }
    }

    /// Returns the stable node-type label used on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Menu => "MENU",
            Self::Submenu => "SUBMENU",
            Self::Permission => "PERMISO",
        }
    }
}

/// A top-level menu catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Stable menu identifier (`MN` prefix).
    pub menu_id: String,
    /// Display label.
    pub label: String,
    /// Icon name for UI rendering.
    pub icon: String,
    /// Primary route.
    pub route: String,
    /// Optional comma-separated alternate routes.
    pub extra_routes: Option<String>,
    /// Sort position within the navigation bar.
    pub position: i32,
}

/// One row of the left-joined (menu, submenu) catalog query.
///
/// A menu without submenus appears exactly once with a null submenu; a menu
/// with submenus appears once per submenu. Callers are expected to supply
/// rows pre-sorted by the stored positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCatalogRow {
    /// Parent menu identifier.
    pub menu_id: String,
    /// Parent menu label.
    pub menu_label: String,
    /// Submenu identifier, when the menu has submenus.
    pub submenu_id: Option<String>,
    /// Submenu label, when the menu has submenus.
    pub submenu_label: Option<String>,
}

/// An assignable permission from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionEntry {
    /// Stable permission identifier (`PM` prefix).
    pub permission_id: String,
    /// Owning menu identifier.
    pub menu_id: String,
    /// Owning submenu identifier, when the permission hangs off a submenu.
    pub submenu_id: Option<String>,
    /// Display label.
    pub label: String,
    /// Optional free-form description.
    pub description: Option<String>,
}

/// One profile's override rows across the three access tables, keyed by item
/// identifier.
///
/// The maps hold the stored flag verbatim, including explicit `false` rows.
/// Resolution helpers treat a stored `false` identically to an absent row:
/// an item is enabled only by an explicit `true` override (deny by default).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileAccessState {
    /// Menu overrides: menu id to stored flag.
    pub menus: HashMap<String, bool>,
    /// Submenu overrides: submenu id to stored flag.
    pub submenus: HashMap<String, bool>,
    /// Permission overrides: permission id to stored flag.
    pub permissions: HashMap<String, bool>,
}

impl ProfileAccessState {
    /// Returns whether a menu is enabled for the profile.
    #[must_use]
    pub fn menu_enabled(&self, menu_id: &str) -> bool {
        matches!(self.menus.get(menu_id), Some(true))
    }

    /// Returns whether a submenu is enabled for the profile.
    #[must_use]
    pub fn submenu_enabled(&self, submenu_id: &str) -> bool {
        matches!(self.submenus.get(submenu_id), Some(true))
    }

    /// Returns whether a permission is enabled for the profile.
    #[must_use]
    pub fn permission_enabled(&self, permission_id: &str) -> bool {
        matches!(self.permissions.get(permission_id), Some(true))
    }
}

#[cfg(test)]
mod tests {
    use super::{AccessItemKind, ProfileAccessState};

    #[test]
    fn classify_dispatches_on_prefix() {
        assert_eq!(AccessItemKind::classify("MN0001"), Some(AccessItemKind::Menu));
        assert_eq!(
            AccessItemKind::classify("SM0002"),
            Some(AccessItemKind::Submenu)
        );
        assert_eq!(
            AccessItemKind::classify("PM0003"),
            Some(AccessItemKind::Permission)
        );
    }

    #[test]
    fn classify_rejects_unknown_prefixes() {
        assert_eq!(AccessItemKind::classify("XX0001"), None);
        assert_eq!(AccessItemKind::classify(""), None);
        assert_eq!(AccessItemKind::classify("mn0001"), None);
    }

    #[test]
    fn stored_false_behaves_as_absent() {
        let mut state = ProfileAccessState::default();
        state.menus.insert("MN0001".to_owned(), false);

        assert!(!state.menu_enabled("MN0001"));
        assert!(!state.menu_enabled("MN0002"));
    }
}
