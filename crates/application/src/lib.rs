//! Application services and ports for the authorization core.

#![forbid(unsafe_code)]

mod authorization_gate;
mod ports;
mod role_assignment_service;

pub use authorization_gate::{AuthorizationGate, Verdict};
pub use ports::{AuditEvent, AuditRepository, RoleAssignmentRepository, UserRoleView};
pub use role_assignment_service::RoleAssignmentService;
