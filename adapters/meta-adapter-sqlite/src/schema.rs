//! Database schema initialization
//!
//! Creates tables and indexes if they do not exist yet.

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Organizations
	//***************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS organizations (
		id text NOT NULL,
		name text NOT NULL,
		subdomain text NOT NULL,
		custom_domain text,
		email text NOT NULL,
		status text NOT NULL DEFAULT 'active',
		seo_title text,
		seo_description text,
		seo_keywords text,
		logo_url text,
		primary_color text NOT NULL DEFAULT '#1e40af',
		secondary_color text NOT NULL DEFAULT '#f59e0b',
		legal_pages_enabled integer NOT NULL DEFAULT 0,
		privacy_policy text,
		terms_of_service text,
		cookie_policy text,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_organizations_subdomain ON organizations(subdomain)",
	)
	.execute(&mut *tx)
	.await?;

	// Profiles and sessions
	//***********************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS profiles (
		id text NOT NULL,
		organization_id text,
		email text NOT NULL,
		full_name text,
		role text NOT NULL,
		is_super_admin integer NOT NULL DEFAULT 0,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS sessions (
		token text NOT NULL,
		profile_id text NOT NULL,
		expires_at integer,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(token)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_profile ON sessions(profile_id)")
		.execute(&mut *tx)
		.await?;

	// Field permissions
	//*******************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS field_permissions (
		id text NOT NULL,
		entity_type text NOT NULL CHECK (entity_type IN ('student', 'staff')),
		field_name text NOT NULL,
		field_label text NOT NULL,
		is_visible_to_admin integer NOT NULL DEFAULT 1,
		is_editable_by_admin integer NOT NULL DEFAULT 1,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(id),
		UNIQUE(entity_type, field_name)
	)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
