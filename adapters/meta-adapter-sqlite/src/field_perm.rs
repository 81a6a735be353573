//! Field permission rows

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use pxp_types::meta_adapter::{FieldPermission, FieldPermissionPatch, NewFieldPermission};
use pxp_types::prelude::*;

const COLUMNS: &str =
	"id, entity_type, field_name, field_label, is_visible_to_admin, is_editable_by_admin";

fn from_row(row: &SqliteRow) -> Result<FieldPermission, sqlx::Error> {
	Ok(FieldPermission {
		id: parse_col(row.try_get("id")?)?,
		entity_type: parse_col(row.try_get("entity_type")?)?,
		field_name: row.try_get::<String, _>("field_name")?.into(),
		field_label: row.try_get::<String, _>("field_label")?.into(),
		visible_to_restricted_viewer: row.try_get("is_visible_to_admin")?,
		editable_by_restricted_viewer: row.try_get("is_editable_by_admin")?,
	})
}

/// List every rule
pub(crate) async fn list(db: &SqlitePool) -> ClResult<Vec<FieldPermission>> {
	let rows = sqlx::query(&format!("SELECT {} FROM field_permissions", COLUMNS))
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(rows.iter().map(from_row))
}

/// Read a single rule by id
pub(crate) async fn read(db: &SqlitePool, id: RecordId) -> ClResult<FieldPermission> {
	let res = sqlx::query(&format!("SELECT {} FROM field_permissions WHERE id = ?", COLUMNS))
		.bind(id.to_string())
		.fetch_one(db)
		.await;

	map_res(res, |row| from_row(&row))
}

/// Update the flags present in the patch
pub(crate) async fn update(
	db: &SqlitePool,
	id: RecordId,
	patch: &FieldPermissionPatch,
) -> ClResult<()> {
	if patch.is_empty() {
		return Err(Error::ValidationError("Empty field permission patch".into()));
	}

	let mut query = sqlx::QueryBuilder::<sqlx::Sqlite>::new("UPDATE field_permissions SET ");
	let mut sets = query.separated(", ");
	if let Some(visible) = patch.visible_to_restricted_viewer {
		sets.push("is_visible_to_admin = ").push_bind_unseparated(visible);
	}
	if let Some(editable) = patch.editable_by_restricted_viewer {
		sets.push("is_editable_by_admin = ").push_bind_unseparated(editable);
	}
	query.push(" WHERE id = ").push_bind(id.to_string());

	let res = query
		.build()
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

/// Create a rule; `(entity_type, field_name)` must be unique
pub(crate) async fn create(
	db: &SqlitePool,
	perm: &NewFieldPermission,
) -> ClResult<FieldPermission> {
	let id = RecordId::new();
	sqlx::query(
		"INSERT INTO field_permissions
		(id, entity_type, field_name, field_label, is_visible_to_admin, is_editable_by_admin)
		VALUES (?, ?, ?, ?, ?, ?)",
	)
	.bind(id.to_string())
	.bind(perm.entity_type.as_str())
	.bind(perm.field_name.as_ref())
	.bind(perm.field_label.as_ref())
	.bind(perm.visible_to_restricted_viewer)
	.bind(perm.editable_by_restricted_viewer)
	.execute(db)
	.await
	.map_err(|err| {
		if is_unique_violation(&err) {
			Error::ValidationError(format!(
				"Field permission for {}.{} already exists",
				perm.entity_type, perm.field_name
			))
		} else {
			inspect(&err);
			Error::DbError
		}
	})?;

	Ok(FieldPermission {
		id,
		entity_type: perm.entity_type,
		field_name: perm.field_name.clone(),
		field_label: perm.field_label.clone(),
		visible_to_restricted_viewer: perm.visible_to_restricted_viewer,
		editable_by_restricted_viewer: perm.editable_by_restricted_viewer,
	})
}

// vim: ts=4
