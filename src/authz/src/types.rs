//! Core authorization types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique role identifier
pub type RoleId = String;

/// Unique permission identifier
pub type PermissionId = String;

/// Static role inheritance table
///
/// Maps each role to the ordered list of roles it directly inherits from.
/// Edges point from a role to the roles it is at least as privileged as,
/// so the table describes a directed graph that is expected to be acyclic.
///
/// The table is plain configuration: it performs no referential-integrity
/// checks of its own. Callers that want loud validation can run
/// [`detect_cycles`](crate::closure::detect_cycles) before handing the
/// table to an engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleHierarchy {
    parents: HashMap<RoleId, Vec<RoleId>>,
}

impl RoleHierarchy {
    /// Create an empty hierarchy table
    pub fn new() -> Self {
        Self {
            parents: HashMap::new(),
        }
    }

    /// Add a role and the roles it directly inherits from
    pub fn with_role(mut self, role: impl Into<RoleId>, inherits: Vec<RoleId>) -> Self {
        self.insert(role, inherits);
        self
    }

    /// Insert or replace a role's direct parent list
    pub fn insert(&mut self, role: impl Into<RoleId>, inherits: Vec<RoleId>) {
        self.parents.insert(role.into(), inherits);
    }

    /// Direct parents of a role, empty for unknown roles
    pub fn parents(&self, role: &str) -> &[RoleId] {
        self.parents.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All role keys present in the table
    pub fn roles(&self) -> impl Iterator<Item = &RoleId> {
        self.parents.keys()
    }

    /// Number of roles in the table
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Static role-to-permission grant table
///
/// Maps each role to the permissions directly granted to it. Inherited
/// permissions are not listed here; the engine derives them from the
/// hierarchy table at construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionGrants {
    grants: HashMap<RoleId, Vec<PermissionId>>,
}

impl PermissionGrants {
    /// Create an empty grant table
    pub fn new() -> Self {
        Self {
            grants: HashMap::new(),
        }
    }

    /// Add a role and its directly granted permissions
    pub fn with_grants(mut self, role: impl Into<RoleId>, permissions: Vec<PermissionId>) -> Self {
        self.insert(role, permissions);
        self
    }

    /// Insert or replace a role's direct grants
    pub fn insert(&mut self, role: impl Into<RoleId>, permissions: Vec<PermissionId>) {
        self.grants.insert(role.into(), permissions);
    }

    /// Direct grants of a role, empty for unknown roles
    pub fn direct(&self, role: &str) -> &[PermissionId] {
        self.grants.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All role keys present in the table
    pub fn roles(&self) -> impl Iterator<Item = &RoleId> {
        self.grants.keys()
    }

    /// Number of roles in the table
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

/// Per-principal authorization context
///
/// The ordered roles assigned to one principal plus the permissions granted
/// to it directly, outside of any role. Supplied once at engine construction
/// and treated as immutable for the engine's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    /// Roles held by the principal, in assignment order
    #[serde(default)]
    pub roles: Vec<RoleId>,

    /// Permissions granted directly to the principal
    #[serde(default)]
    pub permissions: Vec<PermissionId>,
}

impl AuthorizationContext {
    /// Create a context from explicit role and permission lists
    pub fn new(roles: Vec<RoleId>, permissions: Vec<PermissionId>) -> Self {
        Self { roles, permissions }
    }

    /// Add a role to the context
    pub fn with_role(mut self, role: impl Into<RoleId>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Add a directly granted permission to the context
    pub fn with_permission(mut self, permission: impl Into<PermissionId>) -> Self {
        self.permissions.push(permission.into());
        self
    }
}
