//! Shared utilities for SQLite adapter

use sqlx::sqlite::SqliteRow;
use std::str::FromStr;

use pxp_types::prelude::*;

pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Maps a single-row result, turning `RowNotFound` into `Error::NotFound`
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>>,
) -> ClResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

/// Parses a text column into a typed value, reporting failures as decode errors
pub(crate) fn parse_col<T>(value: &str) -> Result<T, sqlx::Error>
where
	T: FromStr<Err = Error>,
{
	value.parse::<T>().map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
	err.as_database_error().is_some_and(|db_err| db_err.is_unique_violation())
}

// vim: ts=4
