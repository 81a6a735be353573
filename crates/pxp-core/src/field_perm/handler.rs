//! Field permission handlers
//!
//! The listing and update endpoints back the super-admin settings screen.
//! The effective endpoint is the read path used by student and staff forms.

use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use pxp_types::meta_adapter::{FieldPermission, ViewerCtx};

use super::types::{FieldAccess, access, editable, visible};
use crate::extract::{SessionKey, Viewer};
use crate::prelude::*;

fn require_super_admin(viewer: &ViewerCtx) -> ClResult<()> {
	if viewer.is_super_admin {
		Ok(())
	} else {
		warn!("Profile {} attempted to manage field permissions", viewer.profile_id);
		Err(Error::PermissionDenied)
	}
}

fn matches_search(perm: &FieldPermission, q: &str) -> bool {
	let q = q.to_lowercase();
	perm.field_label.to_lowercase().contains(&q) || perm.field_name.to_lowercase().contains(&q)
}

/// Query parameters for listing field permissions
#[derive(Debug, Default, Deserialize)]
pub struct ListFieldPermissionsQuery {
	pub entity: Option<EntityType>,
	pub q: Option<String>,
}

/// GET /api/field-permissions - List rules ordered by label
pub async fn list_field_permissions(
	State(app): State<App>,
	Viewer(viewer): Viewer,
	Query(query): Query<ListFieldPermissionsQuery>,
) -> ClResult<(StatusCode, Json<ApiResponse<Vec<FieldPermission>>>)> {
	require_super_admin(&viewer)?;

	let table = app.field_perms.settings().load_full().await?;
	let mut perms: Vec<FieldPermission> = match query.entity {
		Some(entity) => table.entity(entity).values().cloned().collect(),
		None => table.student.values().chain(table.staff.values()).cloned().collect(),
	};
	if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
		perms.retain(|perm| matches_search(perm, q));
	}
	perms.sort_by(|a, b| {
		a.field_label.cmp(&b.field_label).then_with(|| a.field_name.cmp(&b.field_name))
	});

	let total = perms.len();
	Ok((StatusCode::OK, Json(ApiResponse::new(perms).with_total(total))))
}

#[derive(Debug, Deserialize)]
pub struct UpdateFieldPermissionRequest {
	pub visible: Option<bool>,
	pub editable: Option<bool>,
}

/// PATCH /api/field-permissions/{id} - Toggle visibility and/or editability
///
/// Changes go through the settings engine, which shows them at once and
/// restores the previous value if the store rejects the write.
pub async fn update_field_permission(
	State(app): State<App>,
	Viewer(viewer): Viewer,
	Path(id): Path<RecordId>,
	Json(req): Json<UpdateFieldPermissionRequest>,
) -> ClResult<(StatusCode, Json<ApiResponse<FieldPermission>>)> {
	require_super_admin(&viewer)?;
	if req.visible.is_none() && req.editable.is_none() {
		return Err(Error::ValidationError("Nothing to update".into()));
	}

	let current = app.field_perms.settings_rule(id).await?;
	let visible_after = req.visible.unwrap_or(current.visible_to_restricted_viewer);
	if req.editable == Some(true) && !visible_after {
		return Err(Error::ValidationError(format!(
			"Field '{}' is hidden and cannot be made editable",
			current.field_name
		)));
	}

	let engine = app.field_perms.settings();
	let res = async {
		if let Some(value) = req.visible {
			engine.set_visibility(id, value).await?;
		}
		if let Some(value) = req.editable {
			engine.set_editability(id, value).await?;
		}
		Ok::<(), Error>(())
	}
	.await;
	// Sessions may hold the old rule even if only the first write went through
	app.field_perms.invalidate_all();
	res?;

	info!(
		"Profile {} updated field permission {}.{}",
		viewer.profile_id, current.entity_type, current.field_name
	);
	let updated = engine.snapshot().by_id(id).cloned().ok_or(Error::NotFound)?;

	Ok((StatusCode::OK, Json(ApiResponse::new(updated))))
}

#[derive(Debug, Deserialize)]
pub struct EffectiveQuery {
	pub entity: EntityType,
	/// Comma-separated field names; defaults to every field with a stored rule
	pub fields: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EffectiveField {
	pub visible: bool,
	pub editable: bool,
	pub access: FieldAccess,
}

/// GET /api/field-permissions/effective - Field decisions for the current viewer
pub async fn get_effective_permissions(
	State(app): State<App>,
	Viewer(viewer): Viewer,
	SessionKey(session_key): SessionKey,
	Query(query): Query<EffectiveQuery>,
) -> ClResult<(StatusCode, Json<ApiResponse<BTreeMap<Box<str>, EffectiveField>>>)> {
	let set = app.field_perms.permissions(&session_key, &viewer).await;
	let is_super_admin = viewer.is_super_admin;

	let fields: Vec<Box<str>> = match query.fields.as_deref() {
		Some(fields) => fields
			.split(',')
			.map(str::trim)
			.filter(|f| !f.is_empty())
			.map(Box::from)
			.collect(),
		None => set.entity(query.entity).keys().cloned().collect(),
	};

	let result = fields
		.into_iter()
		.map(|field| {
			let decision = EffectiveField {
				visible: visible(&set, query.entity, &field, is_super_admin),
				editable: editable(&set, query.entity, &field, is_super_admin),
				access: access(&set, query.entity, &field, is_super_admin),
			};
			(field, decision)
		})
		.collect::<BTreeMap<_, _>>();

	Ok((StatusCode::OK, Json(ApiResponse::new(result))))
}


// vim: ts=4
