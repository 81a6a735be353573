//! App state type

use std::sync::Arc;

use pxp_types::meta_adapter::MetaAdapter;

use crate::field_perm::FieldPermissionService;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub meta_adapter: Arc<dyn MetaAdapter>,

	// Field permission sessions
	pub field_perms: FieldPermissionService,
}

impl AppState {
	pub fn new(opts: AppBuilderOpts, meta_adapter: Arc<dyn MetaAdapter>) -> Self {
		let field_perms = FieldPermissionService::new(meta_adapter.clone(), opts.session_cache_size);
		Self { opts, meta_adapter, field_perms }
	}
}

pub type App = Arc<AppState>;

#[derive(Debug, Clone)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	/// Maximum number of sessions whose field permissions are cached
	pub session_cache_size: usize,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		Self { listen: "127.0.0.1:8080".into(), session_cache_size: 1000 }
	}
}

// vim: ts=4
