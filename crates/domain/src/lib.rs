//! Domain entities and invariants for the Examina access-control service.

#![forbid(unsafe_code)]

mod access;
mod merge;
mod navigation;
mod profile;
mod tree;

pub use access::{
    AccessItemKind, MenuCatalogRow, MenuItem, PermissionEntry, ProfileAccessState,
};
pub use merge::{
    AccessMergePlan, AccessMergeStats, MenuOverrideRow, OverrideStateChange, PermissionOverrideRow,
    PermissionParents, SubmenuOverrideRow, plan_access_merge,
};
pub use navigation::{NavigationItem, NavigationMenu, NavigationRow, group_navigation_rows};
pub use profile::{ADMIN_PROFILE_ID, is_admin_profile, next_code};
pub use tree::{AccessTreeNode, build_access_tree};
