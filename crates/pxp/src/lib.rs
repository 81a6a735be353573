//! PXP is a multi-tenant school management platform.
//!
//! # Features
//!
//! - Multi-tenant
//!		- every school is served from its own subdomain
//!		- `dashboard.` subdomain for the platform operators
//! - Field-level permissions
//!		- per-field visibility and editability of student and staff records
//!		- super-admins bypass every rule

#![forbid(unsafe_code)]

pub mod app;
pub mod prelude;
pub mod routes;

pub use crate::app::{App, AppBuilder};
pub use pxp_core::app::{AppBuilderOpts, AppState, VERSION};

// vim: ts=4
