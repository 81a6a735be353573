//! Core infrastructure for the PXP platform.
//!
//! Two pieces carry the multi-tenant behavior of the application:
//!
//! - [`site`] maps the request hostname to the site mode (marketing site,
//!   operator dashboard or a school's subdomain).
//! - [`field_perm`] decides, per entity field, whether the current viewer may
//!   see or edit it.
//!
//! The remaining modules wire both into axum: application state, extractors
//! and the viewer middleware.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod extract;
pub mod field_perm;
pub mod middleware;
pub mod organization;
pub mod prelude;
pub mod site;

// Re-export commonly used types
pub use app::{App, AppBuilderOpts, AppState};
pub use extract::{SessionKey, Site, Viewer};
pub use site::{SiteContext, resolve_site};

// vim: ts=4
