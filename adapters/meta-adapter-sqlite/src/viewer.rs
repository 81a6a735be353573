//! Profiles and the session tokens that identify them

use sqlx::{Row, SqlitePool};

use crate::utils::*;
use pxp_types::meta_adapter::ViewerCtx;
use pxp_types::prelude::*;

pub struct NewProfile<'a> {
	pub organization_id: Option<RecordId>,
	pub email: &'a str,
	pub full_name: Option<&'a str>,
	pub role: Role,
	pub is_super_admin: bool,
}

/// Resolve a live session token to its viewer
pub(crate) async fn read(db: &SqlitePool, token: &str) -> ClResult<ViewerCtx> {
	let res = sqlx::query(
		"SELECT p.id, p.role, p.is_super_admin
		FROM sessions s JOIN profiles p ON p.id = s.profile_id
		WHERE s.token = ? AND (s.expires_at IS NULL OR s.expires_at > unixepoch())",
	)
	.bind(token)
	.fetch_one(db)
	.await;

	map_res(res, |row| {
		Ok(ViewerCtx {
			profile_id: parse_col(row.try_get("id")?)?,
			is_super_admin: row.try_get("is_super_admin")?,
			role: parse_col(row.try_get("role")?)?,
		})
	})
}

pub(crate) async fn create_profile(db: &SqlitePool, profile: &NewProfile<'_>) -> ClResult<RecordId> {
	let id = RecordId::new();
	sqlx::query(
		"INSERT INTO profiles (id, organization_id, email, full_name, role, is_super_admin)
		VALUES (?, ?, ?, ?, ?, ?)",
	)
	.bind(id.to_string())
	.bind(profile.organization_id.map(|id| id.to_string()))
	.bind(profile.email)
	.bind(profile.full_name)
	.bind(profile.role.as_str())
	.bind(profile.is_super_admin)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	Ok(id)
}

pub(crate) async fn create_session(
	db: &SqlitePool,
	token: &str,
	profile_id: RecordId,
	expires_at: Option<i64>,
) -> ClResult<()> {
	sqlx::query("INSERT OR REPLACE INTO sessions (token, profile_id, expires_at) VALUES (?, ?, ?)")
		.bind(token)
		.bind(profile_id.to_string())
		.bind(expires_at)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(())
}

// vim: ts=4
