//! Organization (school) lookup for the resolved site

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use pxp_types::meta_adapter::{MetaAdapter, Organization};

use crate::extract::Site;
use crate::prelude::*;
use crate::site::SiteContext;

/// Loads the active organization of an organization site.
///
/// The main site and the operator dashboard have no organization, and the
/// store is not queried for them.
pub async fn load_organization(
	meta: &dyn MetaAdapter,
	site: &SiteContext,
) -> ClResult<Option<Organization>> {
	let Some(tenant_key) = site.tenant_key() else {
		return Ok(None);
	};

	let organization = meta.read_organization_by_subdomain(tenant_key).await.inspect_err(|err| {
		warn!("Error loading organization {}: {}", tenant_key, err);
	})?;
	if organization.is_none() {
		info!("No active organization for subdomain {}", tenant_key);
	}
	Ok(organization)
}

#[derive(Debug, Serialize)]
pub struct SiteView {
	#[serde(flatten)]
	pub site: SiteContext,
	pub organization: Option<Organization>,
}

/// GET /api/site - Resolved site mode and, for school subdomains, the school
pub async fn get_site(
	State(app): State<App>,
	Site(site): Site,
) -> ClResult<(StatusCode, Json<ApiResponse<SiteView>>)> {
	let organization = load_organization(app.meta_adapter.as_ref(), &site).await?;
	debug!(?site, found = organization.is_some(), "GET /api/site");

	Ok((StatusCode::OK, Json(ApiResponse::new(SiteView { site, organization }))))
}


// vim: ts=4
