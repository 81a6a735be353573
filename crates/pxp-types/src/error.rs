//! Error type shared by every PXP crate

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::Serialize;

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	PermissionDenied,
	DbError,
	ValidationError(String),
	Internal(String),

	/// The field permission table could not be read or was malformed
	LoadError(String),
	/// A single field permission mutation could not be persisted
	UpdateError(String),

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::ValidationError(err.to_string())
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::DbError => write!(f, "database error"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::LoadError(msg) => write!(f, "failed to load field permissions: {}", msg),
			Error::UpdateError(msg) => write!(f, "failed to update field permission: {}", msg),
			Error::Io(err) => write!(f, "I/O error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::ValidationError(_) => StatusCode::BAD_REQUEST,
			Error::UpdateError(_) => StatusCode::BAD_GATEWAY,
			Error::DbError | Error::Internal(_) | Error::LoadError(_) | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "E-CORE-NOTFOUND",
			Error::PermissionDenied => "E-AUTH-NOPERM",
			Error::DbError => "E-CORE-DBERR",
			Error::ValidationError(_) => "E-VAL-INVALID",
			Error::Internal(_) => "E-CORE-INTERNAL",
			Error::LoadError(_) => "E-PERM-LOAD",
			Error::UpdateError(_) => "E-PERM-UPDATE",
			Error::Io(_) => "E-CORE-IO",
		}
	}
}

#[derive(Serialize)]
struct ErrorBody {
	code: &'static str,
	message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
	error: ErrorBody,
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		// Internal details stay in the logs
		let message = match &self {
			Error::DbError | Error::Internal(_) | Error::Io(_) => "internal error".to_string(),
			_ => self.to_string(),
		};
		if status.is_server_error() {
			tracing::warn!("Request failed: {}", self);
		}
		(status, Json(ErrorResponse { error: ErrorBody { code: self.code(), message } }))
			.into_response()
	}
}


// vim: ts=4
