//! # Rolegate Authorization Engine
//!
//! Role-hierarchy authorization decision engine. Given a principal's assigned
//! roles and directly granted permissions, it answers whether the principal
//! is authorized for a permission, whether it holds a role (directly or via
//! inheritance), and which of its roles is most senior.
//!
//! ## Features
//!
//! - **Precomputed closures**: the role inheritance DAG is flattened at
//!   construction time, so every query is a constant-time set lookup
//! - **Cycle-safe traversal**: malformed configuration with a cycle degrades
//!   to an incomplete closure instead of looping, with a `tracing` warning
//! - **Total query functions**: unknown roles and permissions yield `false`,
//!   never an error
//! - **Lock-free sharing**: the engine is immutable after construction and
//!   safe to query concurrently
//!
//! ## Example
//!
//! ```
//! use rolegate_authz::{AuthorizationContext, AuthzEngine, PermissionGrants, RoleHierarchy};
//!
//! let hierarchy = RoleHierarchy::new()
//!     .with_role("admin", vec!["manager".to_string()])
//!     .with_role("manager", vec!["user".to_string()])
//!     .with_role("user", vec![]);
//!
//! let grants = PermissionGrants::new()
//!     .with_grants("manager", vec!["product:create".to_string()])
//!     .with_grants("user", vec!["product:read".to_string()]);
//!
//! let context = AuthorizationContext::default().with_role("manager");
//! let engine = AuthzEngine::new(&hierarchy, &grants, context);
//!
//! assert!(engine.has_permission("product:read"));
//! assert!(engine.has_role("user"));
//! assert!(!engine.has_role("admin"));
//! ```

pub mod closure;
pub mod engine;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use closure::detect_cycles;
pub use engine::AuthzEngine;
pub use error::{AuthzError, Result};
pub use types::{AuthorizationContext, PermissionGrants, PermissionId, RoleHierarchy, RoleId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
