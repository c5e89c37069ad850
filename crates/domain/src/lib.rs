//! Domain entities and invariants for the marketplace authorization core.

#![forbid(unsafe_code)]

mod assignment;
mod audit;
mod catalog;
mod permission;
mod resolver;
mod role;

pub use assignment::RoleAssignment;
pub use audit::AuditAction;
pub use catalog::{RoleCatalog, RoleDefinition};
pub use permission::Permission;
pub use resolver::{has_permission, has_role, most_authoritative_role, resolve_permissions};
pub use role::{RoleType, Specialization};
