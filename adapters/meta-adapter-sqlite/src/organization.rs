//! Organization rows

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use pxp_types::meta_adapter::Organization;
use pxp_types::prelude::*;

fn opt_str(row: &SqliteRow, col: &str) -> Result<Option<Box<str>>, sqlx::Error> {
	Ok(row.try_get::<Option<String>, _>(col)?.map(Into::into))
}

fn from_row(row: &SqliteRow) -> Result<Organization, sqlx::Error> {
	Ok(Organization {
		id: parse_col(row.try_get("id")?)?,
		name: row.try_get::<String, _>("name")?.into(),
		subdomain: row.try_get::<String, _>("subdomain")?.into(),
		custom_domain: opt_str(row, "custom_domain")?,
		email: row.try_get::<String, _>("email")?.into(),
		status: row.try_get::<String, _>("status")?.into(),
		seo_title: opt_str(row, "seo_title")?,
		seo_description: opt_str(row, "seo_description")?,
		seo_keywords: opt_str(row, "seo_keywords")?,
		logo_url: opt_str(row, "logo_url")?,
		primary_color: row.try_get::<String, _>("primary_color")?.into(),
		secondary_color: row.try_get::<String, _>("secondary_color")?.into(),
		legal_pages_enabled: row.try_get("legal_pages_enabled")?,
		privacy_policy: opt_str(row, "privacy_policy")?,
		terms_of_service: opt_str(row, "terms_of_service")?,
		cookie_policy: opt_str(row, "cookie_policy")?,
	})
}

/// Read the active organization registered under `subdomain`
pub(crate) async fn read_by_subdomain(
	db: &SqlitePool,
	subdomain: &str,
) -> ClResult<Option<Organization>> {
	let res = sqlx::query(
		"SELECT id, name, subdomain, custom_domain, email, status, seo_title, seo_description,
		seo_keywords, logo_url, primary_color, secondary_color, legal_pages_enabled,
		privacy_policy, terms_of_service, cookie_policy
		FROM organizations WHERE subdomain = ? AND status = 'active'",
	)
	.bind(subdomain)
	.fetch_optional(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	match res {
		Some(row) => from_row(&row).map(Some).inspect_err(inspect).map_err(|_| Error::DbError),
		None => Ok(None),
	}
}

pub(crate) async fn create(db: &SqlitePool, org: &Organization) -> ClResult<()> {
	sqlx::query(
		"INSERT INTO organizations (id, name, subdomain, custom_domain, email, status,
		seo_title, seo_description, seo_keywords, logo_url, primary_color, secondary_color,
		legal_pages_enabled, privacy_policy, terms_of_service, cookie_policy)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
	)
	.bind(org.id.to_string())
	.bind(org.name.as_ref())
	.bind(org.subdomain.as_ref())
	.bind(org.custom_domain.as_deref())
	.bind(org.email.as_ref())
	.bind(org.status.as_ref())
	.bind(org.seo_title.as_deref())
	.bind(org.seo_description.as_deref())
	.bind(org.seo_keywords.as_deref())
	.bind(org.logo_url.as_deref())
	.bind(org.primary_color.as_ref())
	.bind(org.secondary_color.as_ref())
	.bind(org.legal_pages_enabled)
	.bind(org.privacy_policy.as_deref())
	.bind(org.terms_of_service.as_deref())
	.bind(org.cookie_policy.as_deref())
	.execute(db)
	.await
	.map_err(|err| {
		if is_unique_violation(&err) {
			Error::ValidationError(format!("Subdomain '{}' is already taken", org.subdomain))
		} else {
			inspect(&err);
			Error::DbError
		}
	})?;

	Ok(())
}

// vim: ts=4
