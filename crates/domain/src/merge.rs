use std::collections::{BTreeMap, HashMap};

use crate::access::{AccessItemKind, ProfileAccessState};

/// A pending `UPDATE` of an existing override row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideStateChange {
    /// Item identifier of the row to update.
    pub id: String,
    /// New stored flag.
    pub enabled: bool,
}

/// A pending menu override `INSERT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOverrideRow {
    /// Menu identifier.
    pub menu_id: String,
    /// Stored flag.
    pub enabled: bool,
}

/// A pending submenu override `INSERT`, with the parent menu denormalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmenuOverrideRow {
    /// Parent menu identifier, resolved from the submenu catalog.
    pub menu_id: String,
    /// Submenu identifier.
    pub submenu_id: String,
    /// Stored flag.
    pub enabled: bool,
}

/// A pending permission override `INSERT`, with parents denormalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionOverrideRow {
    /// Owning menu identifier, resolved from the permission catalog.
    pub menu_id: String,
    /// Owning submenu identifier, when present in the catalog.
    pub submenu_id: Option<String>,
    /// Permission identifier.
    pub permission_id: String,
    /// Stored flag.
    pub enabled: bool,
}

/// Denormalized parent identifiers of one catalog permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionParents {
    /// Owning menu identifier.
    pub menu_id: String,
    /// Owning submenu identifier, when present.
    pub submenu_id: Option<String>,
}

/// Write counters reported back after a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessMergeStats {
    /// Rows inserted.
    pub inserted: usize,
    /// Rows updated.
    pub updated: usize,
    /// Entries skipped because their catalog reference could not be resolved.
    pub skipped: usize,
}

/// The minimal set of writes reconciling a submitted access map against a
/// profile's stored overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessMergePlan {
    /// New menu override rows.
    pub menu_inserts: Vec<MenuOverrideRow>,
    /// Menu override rows whose stored flag differs from the submitted one.
    pub menu_updates: Vec<OverrideStateChange>,
    /// New submenu override rows.
    pub submenu_inserts: Vec<SubmenuOverrideRow>,
    /// Submenu override rows whose stored flag differs.
    pub submenu_updates: Vec<OverrideStateChange>,
    /// New permission override rows.
    pub permission_inserts: Vec<PermissionOverrideRow>,
    /// Permission override rows whose stored flag differs.
    pub permission_updates: Vec<OverrideStateChange>,
    /// Identifiers skipped because their parent could not be resolved.
    pub skipped: Vec<String>,
}

impl AccessMergePlan {
    /// Total number of rows the plan would write.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.menu_inserts.len()
            + self.menu_updates.len()
            + self.submenu_inserts.len()
            + self.submenu_updates.len()
            + self.permission_inserts.len()
            + self.permission_updates.len()
    }

    /// Returns whether the plan performs no writes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.write_count() == 0
    }

    /// Summarizes the plan as reportable counters.
    #[must_use]
    pub fn stats(&self) -> AccessMergeStats {
        AccessMergeStats {
            inserted: self.menu_inserts.len()
                + self.submenu_inserts.len()
                + self.permission_inserts.len(),
            updated: self.menu_updates.len()
                + self.submenu_updates.len()
                + self.permission_updates.len(),
            skipped: self.skipped.len(),
        }
    }
}

/// Plans the writes needed to reconcile `desired` with the stored overrides.
///
/// Each entry dispatches on its identifier prefix. Rows already storing the
/// submitted flag are suppressed, so re-submitting an unchanged map plans
/// zero writes. New submenu rows resolve their parent menu from
/// `submenu_parents`; permission entries resolve both parents from
/// `permission_parents` before anything else, matching the stored
/// denormalization. Entries whose parent cannot be resolved are recorded in
/// `skipped`; entries with an unrecognized prefix are dropped without trace.
#[must_use]
pub fn plan_access_merge(
    current: &ProfileAccessState,
    submenu_parents: &HashMap<String, String>,
    permission_parents: &HashMap<String, PermissionParents>,
    desired: &BTreeMap<String, bool>,
) -> AccessMergePlan {
    let mut plan = AccessMergePlan::default();

    for (id, &enabled) in desired {
        match AccessItemKind::classify(id) {
            Some(AccessItemKind::Menu) => match current.menus.get(id) {
                Some(&stored) if stored == enabled => {}
                Some(_) => plan.menu_updates.push(OverrideStateChange {
                    id: id.clone(),
                    enabled,
                }),
                None => plan.menu_inserts.push(MenuOverrideRow {
                    menu_id: id.clone(),
                    enabled,
                }),
            },
            Some(AccessItemKind::Submenu) => match current.submenus.get(id) {
                Some(&stored) if stored == enabled => {}
                Some(_) => plan.submenu_updates.push(OverrideStateChange {
                    id: id.clone(),
                    enabled,
                }),
                None => match submenu_parents.get(id) {
                    Some(menu_id) => plan.submenu_inserts.push(SubmenuOverrideRow {
                        menu_id: menu_id.clone(),
                        submenu_id: id.clone(),
                        enabled,
                    }),
                    None => plan.skipped.push(id.clone()),
                },
            },
            Some(AccessItemKind::Permission) => {
                let Some(parents) = permission_parents.get(id) else {
                    plan.skipped.push(id.clone());
                    continue;
                };

                match current.permissions.get(id) {
                    Some(&stored) if stored == enabled => {}
                    Some(_) => plan.permission_updates.push(OverrideStateChange {
                        id: id.clone(),
                        enabled,
                    }),
                    None => plan.permission_inserts.push(PermissionOverrideRow {
                        menu_id: parents.menu_id.clone(),
                        submenu_id: parents.submenu_id.clone(),
                        permission_id: id.clone(),
                        enabled,
                    }),
                }
            }
            None => {}
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use proptest::prelude::*;

    use super::{AccessMergePlan, PermissionParents, plan_access_merge};
    use crate::access::ProfileAccessState;

    fn submenu_parents() -> HashMap<String, String> {
        HashMap::from([("SM01".to_owned(), "MN01".to_owned())])
    }

    fn permission_parents() -> HashMap<String, PermissionParents> {
        HashMap::from([(
            "PM01".to_owned(),
            PermissionParents {
                menu_id: "MN01".to_owned(),
                submenu_id: Some("SM01".to_owned()),
            },
        )])
    }

    fn apply(state: &mut ProfileAccessState, plan: &AccessMergePlan) {
        for row in &plan.menu_inserts {
            state.menus.insert(row.menu_id.clone(), row.enabled);
        }
        for change in &plan.menu_updates {
            state.menus.insert(change.id.clone(), change.enabled);
        }
        for row in &plan.submenu_inserts {
            state.submenus.insert(row.submenu_id.clone(), row.enabled);
        }
        for change in &plan.submenu_updates {
            state.submenus.insert(change.id.clone(), change.enabled);
        }
        for row in &plan.permission_inserts {
            state
                .permissions
                .insert(row.permission_id.clone(), row.enabled);
        }
        for change in &plan.permission_updates {
            state.permissions.insert(change.id.clone(), change.enabled);
        }
    }

    #[test]
    fn first_toggle_plans_inserts_with_resolved_parents() {
        let desired = BTreeMap::from([
            ("MN01".to_owned(), true),
            ("SM01".to_owned(), true),
            ("PM01".to_owned(), true),
        ]);

        let plan = plan_access_merge(
            &ProfileAccessState::default(),
            &submenu_parents(),
            &permission_parents(),
            &desired,
        );

        assert_eq!(plan.menu_inserts.len(), 1);
        assert_eq!(plan.submenu_inserts.len(), 1);
        assert_eq!(plan.submenu_inserts[0].menu_id, "MN01");
        assert_eq!(plan.permission_inserts.len(), 1);
        assert_eq!(
            plan.permission_inserts[0].submenu_id.as_deref(),
            Some("SM01")
        );
        assert_eq!(plan.write_count(), 3);
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn unchanged_rows_are_suppressed() {
        let mut current = ProfileAccessState::default();
        current.menus.insert("MN01".to_owned(), true);
        current.submenus.insert("SM01".to_owned(), false);

        let desired = BTreeMap::from([("MN01".to_owned(), true), ("SM01".to_owned(), false)]);

        let plan = plan_access_merge(
            &current,
            &submenu_parents(),
            &permission_parents(),
            &desired,
        );

        assert!(plan.is_empty());
    }

    #[test]
    fn flipped_rows_plan_updates() {
        let mut current = ProfileAccessState::default();
        current.menus.insert("MN01".to_owned(), true);

        let desired = BTreeMap::from([("MN01".to_owned(), false)]);

        let plan = plan_access_merge(
            &current,
            &submenu_parents(),
            &permission_parents(),
            &desired,
        );

        assert_eq!(plan.menu_updates.len(), 1);
        assert!(!plan.menu_updates[0].enabled);
        assert_eq!(plan.write_count(), 1);
    }

    #[test]
    fn unresolvable_parents_are_skipped() {
        let desired = BTreeMap::from([("SM99".to_owned(), true), ("PM99".to_owned(), true)]);

        let plan = plan_access_merge(
            &ProfileAccessState::default(),
            &submenu_parents(),
            &permission_parents(),
            &desired,
        );

        assert!(plan.is_empty());
        assert_eq!(plan.skipped.len(), 2);
    }

    #[test]
    fn unknown_permission_is_skipped_even_when_a_row_exists() {
        let mut current = ProfileAccessState::default();
        current.permissions.insert("PM99".to_owned(), true);

        let desired = BTreeMap::from([("PM99".to_owned(), false)]);

        let plan = plan_access_merge(
            &current,
            &submenu_parents(),
            &permission_parents(),
            &desired,
        );

        assert!(plan.is_empty());
        assert_eq!(plan.skipped, vec!["PM99".to_owned()]);
    }

    #[test]
    fn replanning_after_apply_is_empty() {
        let desired = BTreeMap::from([
            ("MN01".to_owned(), true),
            ("SM01".to_owned(), false),
            ("PM01".to_owned(), true),
        ]);

        let mut state = ProfileAccessState::default();
        let first = plan_access_merge(
            &state,
            &submenu_parents(),
            &permission_parents(),
            &desired,
        );
        apply(&mut state, &first);

        let second = plan_access_merge(
            &state,
            &submenu_parents(),
            &permission_parents(),
            &desired,
        );

        assert_eq!(first.write_count(), 3);
        assert!(second.is_empty());
    }

    proptest! {
        #[test]
        fn foreign_prefixes_never_plan_writes(
            ids in proptest::collection::btree_map("[A-LN-OQ-RT-Z][A-Z0-9]{0,7}", any::<bool>(), 0..24)
        ) {
            let desired: BTreeMap<String, bool> = ids;
            let plan = plan_access_merge(
                &ProfileAccessState::default(),
                &submenu_parents(),
                &permission_parents(),
                &desired,
            );

            // Generated ids never start with M, S, or P, so none can carry
            // a recognized prefix.
            prop_assert!(plan.is_empty());
            prop_assert!(plan.skipped.is_empty());
        }

        #[test]
        fn planning_is_idempotent_over_catalog_ids(
            menu_flag in any::<bool>(),
            submenu_flag in any::<bool>(),
            permission_flag in any::<bool>(),
        ) {
            let desired = BTreeMap::from([
                ("MN01".to_owned(), menu_flag),
                ("SM01".to_owned(), submenu_flag),
                ("PM01".to_owned(), permission_flag),
            ]);

            let mut state = ProfileAccessState::default();
            let first = plan_access_merge(
                &state,
                &submenu_parents(),
                &permission_parents(),
                &desired,
            );
            apply(&mut state, &first);

            let second = plan_access_merge(
                &state,
                &submenu_parents(),
                &permission_parents(),
                &desired,
            );

            prop_assert!(second.is_empty());
        }
    }
}
