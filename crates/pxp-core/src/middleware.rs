//! Custom middlewares

use axum::{
	body::Body,
	extract::State,
	http::{Request, Response, header},
	middleware::Next,
};

use crate::extract::{SessionKey, Viewer};
use crate::prelude::*;

fn bearer_token(req: &Request<Body>) -> Option<&str> {
	req.headers()
		.get(header::AUTHORIZATION)
		.and_then(|h| h.to_str().ok())
		.and_then(|h| h.strip_prefix("Bearer "))
		.map(str::trim)
		.filter(|token| !token.is_empty())
}

/// Resolves the session token to a viewer through the metadata store
pub async fn require_viewer(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> ClResult<Response<Body>> {
	let token: Box<str> = bearer_token(&req).ok_or(Error::PermissionDenied)?.into();
	let viewer = match app.meta_adapter.read_viewer(&token).await {
		Ok(viewer) => viewer,
		Err(Error::NotFound | Error::PermissionDenied) => {
			debug!("Unknown session token");
			return Err(Error::PermissionDenied);
		}
		Err(err) => return Err(err),
	};
	let session_key = SessionKey(token);

	req.extensions_mut().insert(Viewer(viewer));
	req.extensions_mut().insert(session_key);

	Ok(next.run(req).await)
}

// vim: ts=4
