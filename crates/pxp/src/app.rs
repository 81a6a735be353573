//! App builder - constructs and runs the PXP application

use std::sync::Arc;

use pxp_types::meta_adapter::MetaAdapter;

use crate::prelude::*;
use crate::routes;
pub use pxp_core::app::{App, AppBuilderOpts, AppState, VERSION};

pub struct AppBuilder {
	opts: AppBuilderOpts,
	meta_adapter: Option<Arc<dyn MetaAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		if tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init()
			.is_err()
		{
			debug!("Tracing subscriber already installed");
		}
		AppBuilder { opts: AppBuilderOpts::default(), meta_adapter: None }
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn session_cache_size(&mut self, size: usize) -> &mut Self {
		self.opts.session_cache_size = size;
		self
	}

	// Adapters
	pub fn meta_adapter(&mut self, meta_adapter: Arc<dyn MetaAdapter>) -> &mut Self {
		self.meta_adapter = Some(meta_adapter);
		self
	}

	/// Builds the shared application state
	pub fn build(self) -> ClResult<App> {
		let Some(meta_adapter) = self.meta_adapter else {
			error!("FATAL: No meta adapter configured");
			return Err(Error::Internal("No meta adapter configured".to_string()));
		};
		Ok(Arc::new(AppState::new(self.opts, meta_adapter)))
	}

	pub async fn run(self) -> ClResult<()> {
		info!("PXP V{}", VERSION);

		let app = self.build()?;
		let listen = app.opts.listen.clone();
		let router = routes::init(app);

		let listener = tokio::net::TcpListener::bind(listen.as_ref()).await.inspect_err(|err| {
			error!("FATAL: Cannot listen on {}: {}", listen, err);
		})?;
		info!("Listening on {}", listen);

		axum::serve(listener, router).await?;
		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_second_builder_keeps_subscriber() {
		let _first = AppBuilder::new();
		let mut second = AppBuilder::new();
		second.session_cache_size(4);
		assert_eq!(second.opts.session_cache_size, 4);
	}

	#[test]
	fn test_build_requires_meta_adapter() {
		assert!(matches!(AppBuilder::new().build(), Err(Error::Internal(_))));
	}
}

// vim: ts=4
