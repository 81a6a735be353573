//! Field-level visibility and editability permissions
//!
//! # Architecture
//!
//! - **Types** (`types.rs`): `PermissionSet` and the `visible`/`editable` predicates
//! - **Engine** (`engine.rs`): per-session cache with load state and mutations
//! - **Service** (`service.rs`): LRU of session engines
//! - **Handler** (`handler.rs`): HTTP API endpoints
//!
//! # Permissive default
//!
//! A field with no stored rule is visible and editable. Super-admins bypass
//! every rule: their sessions load an empty set, and the predicates also
//! short-circuit on the super-admin flag.

pub mod engine;
pub mod handler;
pub mod service;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use engine::{FieldPermissionEngine, LoadState};
pub use service::FieldPermissionService;
pub use types::{FieldAccess, Lookup, PermissionSet, access, editable, visible};

// vim: ts=4
