//! Custom extractors for PXP-specific data

use axum::extract::{FromRequestParts, Query};
use axum::http::{header, request::Parts};
use serde::Deserialize;

use pxp_types::meta_adapter::ViewerCtx;

use crate::prelude::*;
use crate::site::{SiteContext, normalize_host, resolve_site};

// Site //
//******//
/// Site of the request, resolved from the `Host` header
#[derive(Clone, Debug)]
pub struct Site(pub SiteContext);

#[derive(Deserialize)]
struct SiteQuery {
	subdomain: Option<String>,
}

impl<S> FromRequestParts<S> for Site
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let host = parts
			.headers
			.get(header::HOST)
			.and_then(|h| h.to_str().ok())
			.or_else(|| parts.uri.host())
			.map(normalize_host)
			.unwrap_or_default();
		let subdomain = Query::<SiteQuery>::try_from_uri(&parts.uri)
			.ok()
			.and_then(|Query(q)| q.subdomain);

		Ok(Site(resolve_site(&host, subdomain.as_deref())))
	}
}

// Viewer //
//********//
/// Authenticated viewer, inserted by the `require_viewer` middleware
#[derive(Clone, Debug)]
pub struct Viewer(pub ViewerCtx);

impl<S> FromRequestParts<S> for Viewer
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		parts.extensions.get::<Viewer>().cloned().ok_or(Error::PermissionDenied)
	}
}

// SessionKey //
//************//
/// Key of the viewer's session in the field permission cache
#[derive(Clone, Debug)]
pub struct SessionKey(pub Box<str>);

impl<S> FromRequestParts<S> for SessionKey
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		parts.extensions.get::<SessionKey>().cloned().ok_or(Error::PermissionDenied)
	}
}

// vim: ts=4
