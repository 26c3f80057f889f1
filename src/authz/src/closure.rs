//! Closure computation over the static role hierarchy
//!
//! Flattens the inheritance graph into per-role closures so that runtime
//! authorization checks become constant-time set lookups instead of graph
//! traversals:
//!
//! 1. **Hierarchy closure**: every role transitively inherited by a role.
//! 2. **Permission closure**: a role's direct grants union the direct grants
//!    of every role in its hierarchy closure.
//!
//! The traversal threads a visited set through the recursion, so a malformed
//! configuration containing a cycle degrades to an incomplete closure rather
//! than looping forever. A genuine cycle (an edge back onto the current
//! traversal path, as opposed to a diamond re-visit) is logged with `warn!`
//! but still truncated; callers that want hard failure run [`detect_cycles`]
//! on the table first.

use crate::error::{AuthzError, Result};
use crate::types::{PermissionGrants, PermissionId, RoleHierarchy, RoleId};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Compute the hierarchy closure for every role key in the table
///
/// Each closure holds the roles reachable by following inheritance edges
/// transitively. A role is not a member of its own closure unless the
/// configuration contains a cycle back to it.
pub(crate) fn hierarchy_closures(hierarchy: &RoleHierarchy) -> HashMap<RoleId, HashSet<RoleId>> {
    let mut closures = HashMap::with_capacity(hierarchy.len());

    for role in hierarchy.roles() {
        let mut reachable = HashSet::new();
        let mut visited = HashSet::new();
        let mut path = Vec::new();

        visited.insert(role.clone());
        collect_ancestors(hierarchy, role, &mut visited, &mut path, &mut reachable);
        closures.insert(role.clone(), reachable);
    }

    closures
}

/// Depth-first ancestor collection with a visited-set termination guard
///
/// `visited` memoizes every role already expanded in this traversal so a
/// diamond-shaped graph is walked once per node; `path` tracks the current
/// recursion stack so an edge back onto it can be reported as a real cycle.
fn collect_ancestors(
    hierarchy: &RoleHierarchy,
    role: &RoleId,
    visited: &mut HashSet<RoleId>,
    path: &mut Vec<RoleId>,
    reachable: &mut HashSet<RoleId>,
) {
    path.push(role.clone());

    for parent in hierarchy.parents(role) {
        reachable.insert(parent.clone());

        if path.contains(parent) {
            // Malformed configuration: truncate instead of recursing.
            warn!(
                role = %parent,
                path = %path.join(" -> "),
                "circular role inheritance detected, truncating traversal"
            );
            continue;
        }

        if visited.insert(parent.clone()) {
            collect_ancestors(hierarchy, parent, visited, path, reachable);
        }
    }

    path.pop();
}

/// Compute the permission closure for every role in either table
///
/// Requires hierarchy closures to be computed first: a role's permission set
/// is its own direct grants union the direct grants of every role in its
/// (already flattened) hierarchy closure. Roles that appear only in the
/// hierarchy table still get an entry, so a role with no direct grants
/// resolves its inherited permissions.
pub(crate) fn permission_closures(
    grants: &PermissionGrants,
    hierarchy_closures: &HashMap<RoleId, HashSet<RoleId>>,
) -> HashMap<RoleId, HashSet<PermissionId>> {
    let roles: HashSet<&RoleId> = grants.roles().chain(hierarchy_closures.keys()).collect();
    let mut closures = HashMap::with_capacity(roles.len());

    for role in roles {
        let mut permissions: HashSet<PermissionId> = grants.direct(role).iter().cloned().collect();

        if let Some(ancestors) = hierarchy_closures.get(role) {
            for ancestor in ancestors {
                permissions.extend(grants.direct(ancestor).iter().cloned());
            }
        }

        closures.insert(role.clone(), permissions);
    }

    closures
}

/// Check a hierarchy table for circular inheritance
///
/// Depth-first search with three node states (unvisited, on the current
/// stack, fully processed). Fails on the first cycle found, reporting the
/// offending path.
///
/// This is the loud counterpart to the defensive truncation inside closure
/// computation: run it at configuration-load time when malformed input
/// should be rejected outright.
///
/// # Errors
///
/// Returns [`AuthzError::CycleDetected`] with the cycle path joined by
/// `" -> "` if the table contains a cycle.
pub fn detect_cycles(hierarchy: &RoleHierarchy) -> Result<()> {
    // State: 0 = unvisited, 1 = on the current stack (gray), 2 = done (black)
    let mut state: HashMap<&RoleId, u8> = HashMap::with_capacity(hierarchy.len());
    for role in hierarchy.roles() {
        state.insert(role, 0);
    }

    for start in hierarchy.roles() {
        if state.get(start) == Some(&0) {
            let mut path = Vec::new();
            dfs_cycle_check(hierarchy, start, &mut state, &mut path)?;
        }
    }

    Ok(())
}

fn dfs_cycle_check<'a>(
    hierarchy: &'a RoleHierarchy,
    role: &'a RoleId,
    state: &mut HashMap<&'a RoleId, u8>,
    path: &mut Vec<&'a RoleId>,
) -> Result<()> {
    match state.get(role) {
        Some(1) => {
            // Gray node on the current stack: reconstruct the cycle
            let cycle_start = path.iter().position(|r| *r == role).unwrap_or(0);
            let cycle: Vec<&str> = path[cycle_start..]
                .iter()
                .map(|r| r.as_str())
                .chain(std::iter::once(role.as_str()))
                .collect();
            return Err(AuthzError::CycleDetected(cycle.join(" -> ")));
        }
        Some(2) => return Ok(()),
        _ => {}
    }

    state.insert(role, 1);
    path.push(role);

    for parent in hierarchy.parents(role) {
        // Parents that are not hierarchy keys are leaves, nothing to visit
        if state.contains_key(parent) {
            dfs_cycle_check(hierarchy, parent, state, path)?;
        }
    }

    state.insert(role, 2);
    path.pop();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> RoleHierarchy {
        // admin -> manager -> employee
        RoleHierarchy::new()
            .with_role("admin", vec!["manager".to_string()])
            .with_role("manager", vec!["employee".to_string()])
            .with_role("employee", vec![])
    }

    #[test]
    fn test_empty_hierarchy() {
        let closures = hierarchy_closures(&RoleHierarchy::new());
        assert!(closures.is_empty());
    }

    #[test]
    fn test_linear_chain_closure() {
        let closures = hierarchy_closures(&chain());

        assert_eq!(closures["admin"].len(), 2);
        assert!(closures["admin"].contains("manager"));
        assert!(closures["admin"].contains("employee"));
        assert_eq!(closures["manager"].len(), 1);
        assert!(closures["employee"].is_empty());
    }

    #[test]
    fn test_no_self_membership() {
        let closures = hierarchy_closures(&chain());
        for (role, closure) in &closures {
            assert!(!closure.contains(role), "{role} inherits itself");
        }
    }

    #[test]
    fn test_diamond_closure() {
        // lead inherits manager and developer, both inherit employee
        let hierarchy = RoleHierarchy::new()
            .with_role("lead", vec!["manager".to_string(), "developer".to_string()])
            .with_role("manager", vec!["employee".to_string()])
            .with_role("developer", vec!["employee".to_string()])
            .with_role("employee", vec![]);

        let closures = hierarchy_closures(&hierarchy);
        let lead = &closures["lead"];

        assert_eq!(lead.len(), 3);
        assert!(lead.contains("manager"));
        assert!(lead.contains("developer"));
        assert!(lead.contains("employee"));
    }

    #[test]
    fn test_cycle_truncates_instead_of_looping() {
        // a -> b -> a
        let hierarchy = RoleHierarchy::new()
            .with_role("a", vec!["b".to_string()])
            .with_role("b", vec!["a".to_string()]);

        let closures = hierarchy_closures(&hierarchy);

        // The traversal terminates; each role reaches the other and, via the
        // cycle edge, itself.
        assert!(closures["a"].contains("b"));
        assert!(closures["a"].contains("a"));
        assert!(closures["b"].contains("a"));
    }

    #[test]
    fn test_permission_closure_includes_inherited_grants() {
        let grants = PermissionGrants::new()
            .with_grants("manager", vec!["user:read".to_string()])
            .with_grants("employee", vec!["product:read".to_string()]);

        let role_closures = hierarchy_closures(&chain());
        let perm_closures = permission_closures(&grants, &role_closures);

        // admin has no direct grants but inherits everything below it
        let admin = &perm_closures["admin"];
        assert!(admin.contains("user:read"));
        assert!(admin.contains("product:read"));

        let manager = &perm_closures["manager"];
        assert!(manager.contains("user:read"));
        assert!(manager.contains("product:read"));

        let employee = &perm_closures["employee"];
        assert_eq!(employee.len(), 1);
        assert!(employee.contains("product:read"));
    }

    #[test]
    fn test_permission_closure_covers_grant_only_roles() {
        // auditor grants exist but the role has no hierarchy entry
        let grants = PermissionGrants::new()
            .with_grants("auditor", vec!["report:read".to_string()]);

        let perm_closures = permission_closures(&grants, &HashMap::new());
        assert!(perm_closures["auditor"].contains("report:read"));
    }

    #[test]
    fn test_detect_cycles_accepts_dag() {
        assert_eq!(detect_cycles(&chain()), Ok(()));

        let diamond = RoleHierarchy::new()
            .with_role("lead", vec!["manager".to_string(), "developer".to_string()])
            .with_role("manager", vec!["employee".to_string()])
            .with_role("developer", vec!["employee".to_string()])
            .with_role("employee", vec![]);
        assert_eq!(detect_cycles(&diamond), Ok(()));
    }

    #[test]
    fn test_detect_cycles_reports_cycle_path() {
        let hierarchy = RoleHierarchy::new()
            .with_role("a", vec!["b".to_string()])
            .with_role("b", vec!["c".to_string()])
            .with_role("c", vec!["a".to_string()]);

        let err = detect_cycles(&hierarchy).unwrap_err();
        let AuthzError::CycleDetected(path) = err else {
            panic!("expected CycleDetected");
        };
        assert!(path.contains("a") && path.contains("b") && path.contains("c"));
    }

    #[test]
    fn test_detect_cycles_self_loop() {
        let hierarchy = RoleHierarchy::new().with_role("a", vec!["a".to_string()]);
        assert!(detect_cycles(&hierarchy).is_err());
    }
}
