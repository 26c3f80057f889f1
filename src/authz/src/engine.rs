//! Authorization decision engine
//!
//! [`AuthzEngine`] binds one principal's [`AuthorizationContext`] to the
//! closures precomputed from the static hierarchy and grant tables. All cache
//! population happens in [`AuthzEngine::new`]; every query afterward is a
//! pure, read-only set lookup, so a constructed engine can be shared across
//! threads without locking.

use crate::closure;
use crate::error::{AuthzError, Result};
use crate::types::{AuthorizationContext, PermissionGrants, PermissionId, RoleHierarchy, RoleId};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Authorization decision engine for a single principal
///
/// # Example
///
/// ```
/// use rolegate_authz::{AuthorizationContext, AuthzEngine, PermissionGrants, RoleHierarchy};
///
/// let hierarchy = RoleHierarchy::new()
///     .with_role("manager", vec!["employee".to_string()])
///     .with_role("employee", vec![]);
///
/// let grants = PermissionGrants::new()
///     .with_grants("employee", vec!["product:read".to_string()]);
///
/// let context = AuthorizationContext::default().with_role("manager");
/// let engine = AuthzEngine::new(&hierarchy, &grants, context);
///
/// assert!(engine.has_permission("product:read"));
/// assert!(engine.has_role("employee"));
/// assert_eq!(engine.max_role().unwrap(), "manager");
/// ```
#[derive(Debug, Clone)]
pub struct AuthzEngine {
    /// The principal's roles and direct permissions
    context: AuthorizationContext,

    /// Role -> every role it transitively inherits
    role_closures: HashMap<RoleId, HashSet<RoleId>>,

    /// Role -> every permission it holds, direct or inherited
    permission_closures: HashMap<RoleId, HashSet<PermissionId>>,

    /// The principal's direct permissions as a set for O(1) lookup
    direct_permissions: HashSet<PermissionId>,
}

impl AuthzEngine {
    /// Construct an engine, computing both closure caches up front
    ///
    /// Hierarchy closures are computed first, then permission closures on
    /// top of them; the permission set of a role is only complete once its
    /// full ancestor set is known. There is no lazy or partial state: every
    /// role in either table has its closures populated before this returns.
    pub fn new(
        hierarchy: &RoleHierarchy,
        grants: &PermissionGrants,
        context: AuthorizationContext,
    ) -> Self {
        let role_closures = closure::hierarchy_closures(hierarchy);
        let permission_closures = closure::permission_closures(grants, &role_closures);

        debug!(
            roles = role_closures.len(),
            permission_sets = permission_closures.len(),
            "authorization caches populated"
        );

        let direct_permissions = context.permissions.iter().cloned().collect();

        Self {
            context,
            role_closures,
            permission_closures,
            direct_permissions,
        }
    }

    /// Whether the principal is authorized for a permission
    ///
    /// True if the permission was granted to the principal directly, or if
    /// any held role carries it in its permission closure. Unknown
    /// permissions yield `false`, never an error.
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.direct_permissions.contains(permission) {
            return true;
        }

        self.context.roles.iter().any(|role| {
            self.permission_closures
                .get(role)
                .map_or(false, |permissions| permissions.contains(permission))
        })
    }

    /// Whether the principal is authorized for every listed permission
    ///
    /// An empty list is vacuously satisfied.
    pub fn has_permissions(&self, permissions: &[&str]) -> bool {
        permissions.iter().all(|p| self.has_permission(p))
    }

    /// Whether the principal is authorized for at least one listed permission
    ///
    /// An empty list yields `false`.
    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.has_permission(p))
    }

    /// Whether the principal holds a role, directly or by inheritance
    ///
    /// Unknown roles yield `false`.
    pub fn has_role(&self, role: &str) -> bool {
        self.context.roles.iter().any(|held| {
            held == role
                || self
                    .role_closures
                    .get(held)
                    .map_or(false, |closure| closure.contains(role))
        })
    }

    /// The most senior role among the principal's held roles
    ///
    /// Folds the role list left to right: the running candidate is replaced
    /// by the next role unless the candidate's hierarchy closure already
    /// contains it. The fold is positional and order-sensitive, not a total
    /// order comparison; incomparable roles resolve in favor of the later
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::EmptyRoleSet`] if the principal holds no roles.
    pub fn max_role(&self) -> Result<&RoleId> {
        let mut roles = self.context.roles.iter();
        let mut candidate = roles.next().ok_or(AuthzError::EmptyRoleSet)?;

        for role in roles {
            let outranked = self
                .role_closures
                .get(candidate)
                .map_or(false, |closure| closure.contains(role));
            if !outranked {
                candidate = role;
            }
        }

        Ok(candidate)
    }

    /// The principal's authorization context
    pub fn context(&self) -> &AuthorizationContext {
        &self.context
    }

    /// Cached hierarchy closure of a role, if the role is known
    pub fn hierarchy_closure(&self, role: &str) -> Option<&HashSet<RoleId>> {
        self.role_closures.get(role)
    }

    /// Cached permission closure of a role, if the role is known
    pub fn permission_closure(&self, role: &str) -> Option<&HashSet<PermissionId>> {
        self.permission_closures.get(role)
    }
}
