//! SQLite implementation of the PXP metadata adapter.
//!
//! Stores field permission rules, organizations, profiles and the session
//! tokens issued by the auth backend in a single database file.

#![forbid(unsafe_code)]

mod field_perm;
mod organization;
mod schema;
mod utils;
mod viewer;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use pxp_types::meta_adapter::{
	FieldPermission, FieldPermissionPatch, MetaAdapter, NewFieldPermission, Organization,
	ViewerCtx,
};
use pxp_types::prelude::*;

pub use viewer::NewProfile;

const DB_FILE: &str = "meta.db";

#[derive(Debug)]
pub struct MetaAdapterSqlite {
	db: SqlitePool,
}

impl MetaAdapterSqlite {
	/// Opens (or creates) the database in `dir` and brings the schema up to date
	pub async fn new(dir: impl AsRef<Path>) -> ClResult<Self> {
		tokio::fs::create_dir_all(dir.as_ref()).await?;
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(dir.as_ref().join(DB_FILE))
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		Ok(Self { db })
	}

	/// Registers an organization (used by the registration flow and seeding)
	pub async fn create_organization(&self, org: &Organization) -> ClResult<()> {
		organization::create(&self.db, org).await
	}

	/// Creates a profile as the auth backend would after sign-up
	pub async fn create_profile(&self, profile: &NewProfile<'_>) -> ClResult<RecordId> {
		viewer::create_profile(&self.db, profile).await
	}

	/// Stores a session token issued by the auth backend.
	/// `expires_at` is a unix timestamp; `None` never expires.
	pub async fn create_session(
		&self,
		token: &str,
		profile_id: RecordId,
		expires_at: Option<i64>,
	) -> ClResult<()> {
		viewer::create_session(&self.db, token, profile_id, expires_at).await
	}
}

#[async_trait]
impl MetaAdapter for MetaAdapterSqlite {
	// Field permissions
	//*******************
	async fn list_field_permissions(&self) -> ClResult<Vec<FieldPermission>> {
		field_perm::list(&self.db).await
	}

	async fn read_field_permission(&self, id: RecordId) -> ClResult<FieldPermission> {
		field_perm::read(&self.db, id).await
	}

	async fn update_field_permission(
		&self,
		id: RecordId,
		patch: &FieldPermissionPatch,
	) -> ClResult<()> {
		field_perm::update(&self.db, id, patch).await
	}

	async fn create_field_permission(
		&self,
		perm: &NewFieldPermission,
	) -> ClResult<FieldPermission> {
		field_perm::create(&self.db, perm).await
	}

	// Organizations
	//***************
	async fn read_organization_by_subdomain(
		&self,
		subdomain: &str,
	) -> ClResult<Option<Organization>> {
		organization::read_by_subdomain(&self.db, subdomain).await
	}

	// Viewers
	//*********
	async fn read_viewer(&self, session_token: &str) -> ClResult<ViewerCtx> {
		viewer::read(&self.db, session_token).await
	}
}

// vim: ts=4
