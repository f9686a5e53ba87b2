use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use examina_domain::{AccessTreeNode, MenuItem, NavigationItem, NavigationMenu};

/// One node of the profile access tree.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-tree-node-response.ts"
)]
pub struct AccessTreeNodeResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub label: String,
    pub checked: bool,
    pub children: Vec<AccessTreeNodeResponse>,
}

impl From<AccessTreeNode> for AccessTreeNodeResponse {
    fn from(value: AccessTreeNode) -> Self {
        Self {
            id: value.id,
            node_type: value.kind.as_str().to_owned(),
            label: value.label,
            checked: value.checked,
            children: value
                .children
                .into_iter()
                .map(AccessTreeNodeResponse::from)
                .collect(),
        }
    }
}

/// Incoming payload for a profile access update.
///
/// `accesos` is the flat `{itemId: enabled}` map produced by the UI
/// checkbox tree.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-access-request.ts"
)]
pub struct UpdateAccessRequest {
    #[serde(rename = "profileId")]
    pub profile_id: String,
    pub accesos: BTreeMap<String, bool>,
}

/// Outcome payload for a profile access update.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-access-response.ts"
)]
pub struct UpdateAccessResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// API representation of a menu catalog entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/menu-response.ts"
)]
pub struct MenuResponse {
    pub menu_id: String,
    pub label: String,
    pub icon: String,
    pub route: String,
    pub extra_routes: Option<String>,
    pub position: i32,
}

impl From<MenuItem> for MenuResponse {
    fn from(value: MenuItem) -> Self {
        Self {
            menu_id: value.menu_id,
            label: value.label,
            icon: value.icon,
            route: value.route,
            extra_routes: value.extra_routes,
            position: value.position,
        }
    }
}

/// API representation of a navigation menu resolved for one profile.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/navigation-menu-response.ts"
)]
pub struct NavigationMenuResponse {
    pub menu_id: String,
    pub label: String,
    pub icon: String,
    pub route: String,
    pub extra_routes: Option<String>,
    pub enabled: bool,
    pub items: Vec<NavigationItemResponse>,
}

/// API representation of a submenu entry under a navigation menu.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/navigation-item-response.ts"
)]
pub struct NavigationItemResponse {
    pub submenu_id: String,
    pub label: String,
    pub icon: String,
    pub route: String,
}

impl From<NavigationMenu> for NavigationMenuResponse {
    fn from(value: NavigationMenu) -> Self {
        Self {
            menu_id: value.menu_id,
            label: value.label,
            icon: value.icon,
            route: value.route,
            extra_routes: value.extra_routes,
            enabled: value.enabled,
            items: value
                .items
                .into_iter()
                .map(NavigationItemResponse::from)
                .collect(),
        }
    }
}

impl From<NavigationItem> for NavigationItemResponse {
    fn from(value: NavigationItem) -> Self {
        Self {
            submenu_id: value.submenu_id,
            label: value.submenu_label,
            icon: value.icon,
            route: value.route,
        }
    }
}
