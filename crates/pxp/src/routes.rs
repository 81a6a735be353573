use axum::{
	Router, middleware,
	routing::{get, patch},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use pxp_core::field_perm::handler as field_perm;
use pxp_core::{middleware::require_viewer, organization};

use crate::prelude::*;

pub fn init(app: App) -> Router {
	let protected_router = Router::new()
		.route("/api/field-permissions", get(field_perm::list_field_permissions))
		.route("/api/field-permissions/effective", get(field_perm::get_effective_permissions))
		.route("/api/field-permissions/{id}", patch(field_perm::update_field_permission))
		.route_layer(middleware::from_fn_with_state(app.clone(), require_viewer));

	let public_router = Router::new().route("/api/site", get(organization::get_site));

	Router::new()
		.merge(public_router)
		.merge(protected_router)
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(app)
}

// vim: ts=4
