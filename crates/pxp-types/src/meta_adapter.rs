//! Metadata adapter trait and the records it exchanges.
//!
//! The metadata store is the backend that owns field permission rows,
//! organizations and viewer profiles. The core never talks to a database
//! directly, only through this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;

// Field permissions //
//*******************//
/// Per-field visibility and editability rule for restricted viewers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPermission {
	pub id: RecordId,
	pub entity_type: EntityType,
	pub field_name: Box<str>,
	pub field_label: Box<str>,
	pub visible_to_restricted_viewer: bool,
	pub editable_by_restricted_viewer: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFieldPermission {
	pub entity_type: EntityType,
	pub field_name: Box<str>,
	pub field_label: Box<str>,
	pub visible_to_restricted_viewer: bool,
	pub editable_by_restricted_viewer: bool,
}

/// Partial update of a field permission row; `None` leaves a column untouched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPermissionPatch {
	pub visible_to_restricted_viewer: Option<bool>,
	pub editable_by_restricted_viewer: Option<bool>,
}

impl FieldPermissionPatch {
	pub fn visibility(value: bool) -> Self {
		Self { visible_to_restricted_viewer: Some(value), editable_by_restricted_viewer: None }
	}

	pub fn editability(value: bool) -> Self {
		Self { visible_to_restricted_viewer: None, editable_by_restricted_viewer: Some(value) }
	}

	pub fn is_empty(&self) -> bool {
		self.visible_to_restricted_viewer.is_none() && self.editable_by_restricted_viewer.is_none()
	}
}

// Organizations //
//***************//
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
	pub id: RecordId,
	pub name: Box<str>,
	pub subdomain: Box<str>,
	pub custom_domain: Option<Box<str>>,
	pub email: Box<str>,
	pub status: Box<str>,
	pub seo_title: Option<Box<str>>,
	pub seo_description: Option<Box<str>>,
	pub seo_keywords: Option<Box<str>>,
	pub logo_url: Option<Box<str>>,
	pub primary_color: Box<str>,
	pub secondary_color: Box<str>,
	/// Whether the legal pages below are published on the school site
	pub legal_pages_enabled: bool,
	pub privacy_policy: Option<Box<str>>,
	pub terms_of_service: Option<Box<str>>,
	pub cookie_policy: Option<Box<str>>,
}

// Viewer //
//********//
/// The authenticated viewer of a session, as reported by the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerCtx {
	pub profile_id: RecordId,
	pub is_super_admin: bool,
	pub role: Role,
}

#[async_trait]
pub trait MetaAdapter: Debug + Send + Sync {
	/// # Field permissions
	///
	/// Reads every field permission row
	async fn list_field_permissions(&self) -> ClResult<Vec<FieldPermission>>;
	async fn read_field_permission(&self, id: RecordId) -> ClResult<FieldPermission>;
	/// Updates the columns set in `patch`. Returns `NotFound` if no row matched.
	async fn update_field_permission(&self, id: RecordId, patch: &FieldPermissionPatch)
	-> ClResult<()>;
	async fn create_field_permission(&self, perm: &NewFieldPermission)
	-> ClResult<FieldPermission>;

	/// # Organizations
	///
	/// Reads an active organization by its subdomain
	async fn read_organization_by_subdomain(&self, subdomain: &str)
	-> ClResult<Option<Organization>>;

	/// # Viewers
	///
	/// Resolves a session token issued by the auth backend to a viewer
	async fn read_viewer(&self, session_token: &str) -> ClResult<ViewerCtx>;
}

// vim: ts=4
