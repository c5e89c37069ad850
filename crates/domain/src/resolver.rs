//! Pure permission resolution over role assignments.
//!
//! No I/O and no interior mutability; safe under unbounded concurrent
//! invocation. Inactive assignments never contribute, and `is_primary`
//! is irrelevant to every predicate here.

use std::collections::BTreeSet;

use crate::{Permission, RoleAssignment, RoleCatalog, RoleType};

/// Aggregates the effective permission set for a list of assignments.
///
/// Filters to active assignments, unions the catalog permission sets of
/// their roles, and deduplicates.
#[must_use]
pub fn resolve_permissions(
    catalog: &RoleCatalog,
    assignments: &[RoleAssignment],
) -> BTreeSet<Permission> {
    assignments
        .iter()
        .filter(|assignment| assignment.is_active)
        .flat_map(|assignment| {
            catalog
                .definition(assignment.role_type)
                .permissions
                .iter()
                .copied()
        })
        .collect()
}

/// Returns whether any active assignment grants the permission.
#[must_use]
pub fn has_permission(
    catalog: &RoleCatalog,
    assignments: &[RoleAssignment],
    permission: Permission,
) -> bool {
    assignments
        .iter()
        .filter(|assignment| assignment.is_active)
        .any(|assignment| {
            catalog
                .definition(assignment.role_type)
                .permissions
                .contains(&permission)
        })
}

/// Returns whether an active assignment carries the role type.
#[must_use]
pub fn has_role(assignments: &[RoleAssignment], role_type: RoleType) -> bool {
    assignments
        .iter()
        .any(|assignment| assignment.is_active && assignment.role_type == role_type)
}

/// Returns the active assignment with the highest catalog priority.
///
/// Display ranking only; priority never gates access.
#[must_use]
pub fn most_authoritative_role<'a>(
    catalog: &RoleCatalog,
    assignments: &'a [RoleAssignment],
) -> Option<&'a RoleAssignment> {
    assignments
        .iter()
        .filter(|assignment| assignment.is_active)
        .max_by_key(|assignment| catalog.definition(assignment.role_type).priority)
}
