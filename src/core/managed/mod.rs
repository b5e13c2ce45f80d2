// Core managed-role module: who may hand out which role, and who may decide that.

pub mod assignment;
pub mod managed_models;
pub mod managed_service;
pub mod managed_store;
pub mod manager_listing;
pub mod permissions;

pub use assignment::{decide_assignment, AssignmentAction, AssignmentDecision};
pub use managed_models::{managed_roles_by_hierarchy, GuildManaged, ManagedData, RoleSummary};
pub use managed_service::{AddManagerOutcome, ManagedRoleService, RemoveManagerOutcome};
pub use managed_store::{ManagedStore, StoreError};
pub use manager_listing::{render_manager_listing, ManagerName, RoleManagersBlock};
pub use permissions::{AccessPolicy, Invoker};
