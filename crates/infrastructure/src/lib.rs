//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_role_assignment_repository;
mod postgres_role_assignment_repository;
mod storage_config;
mod tracing_audit_repository;

pub use in_memory_role_assignment_repository::InMemoryRoleAssignmentRepository;
pub use postgres_role_assignment_repository::PostgresRoleAssignmentRepository;
pub use storage_config::StorageConfig;
pub use tracing_audit_repository::TracingAuditRepository;
