//! Common types used throughout the PXP platform.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::prelude::*;

// RecordId //
//**********//
/// Identifier of a stored row (field permission, organization, profile)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub uuid::Uuid);

impl RecordId {
	pub fn new() -> Self {
		RecordId(uuid::Uuid::new_v4())
	}
}

impl Default for RecordId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for RecordId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for RecordId {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		uuid::Uuid::parse_str(s)
			.map(RecordId)
			.map_err(|_| Error::ValidationError(format!("Invalid record id: {}", s)))
	}
}

// EntityType //
//************//
/// Record kind a field permission applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
	Student,
	Staff,
}

impl EntityType {
	pub fn as_str(self) -> &'static str {
		match self {
			EntityType::Student => "student",
			EntityType::Staff => "staff",
		}
	}
}

impl std::fmt::Display for EntityType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for EntityType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"student" => Ok(EntityType::Student),
			"staff" => Ok(EntityType::Staff),
			_ => Err(Error::ValidationError(format!("Unknown entity type: {}", s))),
		}
	}
}

// Role //
//******//
/// Functional role of a profile inside an organization
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	Admin,
	Teacher,
	Librarian,
	Staff,
	Student,
}

impl Role {
	pub fn as_str(self) -> &'static str {
		match self {
			Role::Admin => "admin",
			Role::Teacher => "teacher",
			Role::Librarian => "librarian",
			Role::Staff => "staff",
			Role::Student => "student",
		}
	}
}

impl std::fmt::Display for Role {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Role {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"admin" => Ok(Role::Admin),
			"teacher" => Ok(Role::Teacher),
			"librarian" => Ok(Role::Librarian),
			"staff" => Ok(Role::Staff),
			"student" => Ok(Role::Student),
			_ => Err(Error::ValidationError(format!("Unknown role: {}", s))),
		}
	}
}

// ApiResponse //
//*************//
/// Envelope of every successful JSON response
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
	pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, total: None }
	}

	pub fn with_total(mut self, total: usize) -> Self {
		self.total = Some(total);
		self
	}
}


// vim: ts=4
