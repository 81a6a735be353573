//! Permission set and the read-path predicates

use std::collections::HashMap;

use pxp_types::meta_adapter::FieldPermission;

use crate::prelude::*;

/// Field permission rules of both entity kinds, keyed by field name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionSet {
	pub student: HashMap<Box<str>, FieldPermission>,
	pub staff: HashMap<Box<str>, FieldPermission>,
}

/// Result of looking up a field rule
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup<'a> {
	Found(&'a FieldPermission),
	NotFound,
}

impl PermissionSet {
	/// Partitions rows by entity type. A later row for the same field wins.
	pub fn from_records(records: impl IntoIterator<Item = FieldPermission>) -> Self {
		let mut set = PermissionSet::default();
		for perm in records {
			set.entity_mut(perm.entity_type).insert(perm.field_name.clone(), perm);
		}
		set
	}

	pub fn entity(&self, entity: EntityType) -> &HashMap<Box<str>, FieldPermission> {
		match entity {
			EntityType::Student => &self.student,
			EntityType::Staff => &self.staff,
		}
	}

	fn entity_mut(&mut self, entity: EntityType) -> &mut HashMap<Box<str>, FieldPermission> {
		match entity {
			EntityType::Student => &mut self.student,
			EntityType::Staff => &mut self.staff,
		}
	}

	pub fn lookup(&self, entity: EntityType, field_name: &str) -> Lookup<'_> {
		self.entity(entity).get(field_name).map_or(Lookup::NotFound, Lookup::Found)
	}

	pub fn by_id(&self, id: RecordId) -> Option<&FieldPermission> {
		self.student.values().chain(self.staff.values()).find(|perm| perm.id == id)
	}

	/// Finds a cached rule by its record id
	pub fn by_id_mut(&mut self, id: RecordId) -> Option<&mut FieldPermission> {
		self.student.values_mut().chain(self.staff.values_mut()).find(|perm| perm.id == id)
	}

	pub fn is_empty(&self) -> bool {
		self.student.is_empty() && self.staff.is_empty()
	}

	pub fn len(&self) -> usize {
		self.student.len() + self.staff.len()
	}
}

/// May the viewer see the field at all?
pub fn visible(
	set: &PermissionSet,
	entity: EntityType,
	field_name: &str,
	is_super_admin: bool,
) -> bool {
	if is_super_admin {
		return true;
	}
	match set.lookup(entity, field_name) {
		Lookup::Found(perm) => perm.visible_to_restricted_viewer,
		Lookup::NotFound => true,
	}
}

/// May the viewer change the field's value?
///
/// Independent of [`visible`]: a hidden field may still report `true` here.
pub fn editable(
	set: &PermissionSet,
	entity: EntityType,
	field_name: &str,
	is_super_admin: bool,
) -> bool {
	if is_super_admin {
		return true;
	}
	match set.lookup(entity, field_name) {
		Lookup::Found(perm) => perm.editable_by_restricted_viewer,
		Lookup::NotFound => true,
	}
}

/// Single rendering decision for form surfaces
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldAccess {
	Hidden,
	ReadOnly,
	Editable,
}

/// Combines both predicates; a hidden field is `Hidden` whatever its editable flag
pub fn access(
	set: &PermissionSet,
	entity: EntityType,
	field_name: &str,
	is_super_admin: bool,
) -> FieldAccess {
	if !visible(set, entity, field_name, is_super_admin) {
		FieldAccess::Hidden
	} else if editable(set, entity, field_name, is_super_admin) {
		FieldAccess::Editable
	} else {
		FieldAccess::ReadOnly
	}
}


// vim: ts=4
