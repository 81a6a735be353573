//! In-memory metadata store for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

use pxp_types::meta_adapter::{
	FieldPermission, FieldPermissionPatch, MetaAdapter, NewFieldPermission, Organization,
	ViewerCtx,
};

use crate::prelude::*;

/// Canned answer for one `list_field_permissions` call
#[derive(Debug)]
struct ListScript {
	gate: Option<Arc<Notify>>,
	/// `None` fails the call
	rules: Option<Vec<FieldPermission>>,
}

#[derive(Debug, Default)]
pub struct MemoryMetaAdapter {
	rules: Mutex<Vec<FieldPermission>>,
	scripts: Mutex<VecDeque<ListScript>>,
	write_gate: Mutex<Option<Arc<Notify>>>,
	update_calls: AtomicUsize,
	organizations: Mutex<Vec<Organization>>,
	viewers: Mutex<HashMap<Box<str>, ViewerCtx>>,
	fail_reads: AtomicBool,
	fail_writes: AtomicBool,
	list_calls: AtomicUsize,
}

impl MemoryMetaAdapter {
	pub fn with_sample_rules() -> Self {
		let adapter = Self::default();
		for (entity, field, visible, editable) in [
			(EntityType::Student, "birth_date", true, false),
			(EntityType::Student, "medical_notes", false, false),
			(EntityType::Staff, "salary", false, false),
		] {
			adapter.rules.lock().push(FieldPermission {
				id: RecordId::new(),
				entity_type: entity,
				field_name: field.into(),
				field_label: field.into(),
				visible_to_restricted_viewer: visible,
				editable_by_restricted_viewer: editable,
			});
		}
		adapter
	}

	pub fn add_organization(&self, subdomain: &str, status: &str) {
		self.organizations.lock().push(Organization {
			id: RecordId::new(),
			name: format!("{} school", subdomain).into(),
			subdomain: subdomain.into(),
			custom_domain: None,
			email: format!("office@{}.example.com", subdomain).into(),
			status: status.into(),
			seo_title: Some(format!("{} | PXP", subdomain).into()),
			seo_description: None,
			seo_keywords: None,
			logo_url: None,
			primary_color: "#1e40af".into(),
			secondary_color: "#f59e0b".into(),
			legal_pages_enabled: false,
			privacy_policy: None,
			terms_of_service: None,
			cookie_policy: None,
		});
	}

	pub fn add_viewer(&self, token: &str, viewer: ViewerCtx) {
		self.viewers.lock().insert(token.into(), viewer);
	}

	pub fn fail_reads(&self, fail: bool) {
		self.fail_reads.store(fail, Ordering::SeqCst);
	}

	pub fn fail_writes(&self, fail: bool) {
		self.fail_writes.store(fail, Ordering::SeqCst);
	}

	/// Queues the answer of the next list call. With a gate, the call
	/// waits for `notify_one` before answering.
	pub fn script_list(&self, gate: Option<Arc<Notify>>, rules: Option<Vec<FieldPermission>>) {
		self.scripts.lock().push_back(ListScript { gate, rules });
	}

	/// Makes every update wait for `notify_one` on `gate` before answering
	pub fn hold_writes(&self, gate: Arc<Notify>) {
		*self.write_gate.lock() = Some(gate);
	}

	pub fn update_calls(&self) -> usize {
		self.update_calls.load(Ordering::SeqCst)
	}

	pub fn rules(&self) -> Vec<FieldPermission> {
		self.rules.lock().clone()
	}

	pub fn list_calls(&self) -> usize {
		self.list_calls.load(Ordering::SeqCst)
	}

	pub fn id_of(&self, entity: EntityType, field_name: &str) -> Option<RecordId> {
		self.rules
			.lock()
			.iter()
			.find(|r| r.entity_type == entity && r.field_name.as_ref() == field_name)
			.map(|r| r.id)
	}

	pub fn get(&self, id: RecordId) -> Option<FieldPermission> {
		self.rules.lock().iter().find(|r| r.id == id).cloned()
	}

	fn check_reads(&self) -> ClResult<()> {
		if self.fail_reads.load(Ordering::SeqCst) { Err(Error::DbError) } else { Ok(()) }
	}
}

#[async_trait]
impl MetaAdapter for MemoryMetaAdapter {
	async fn list_field_permissions(&self) -> ClResult<Vec<FieldPermission>> {
		let script = self.scripts.lock().pop_front();
		self.list_calls.fetch_add(1, Ordering::SeqCst);
		if let Some(ListScript { gate, rules }) = script {
			if let Some(gate) = gate {
				gate.notified().await;
			}
			return rules.ok_or(Error::DbError);
		}
		self.check_reads()?;
		Ok(self.rules())
	}

	async fn read_field_permission(&self, id: RecordId) -> ClResult<FieldPermission> {
		self.check_reads()?;
		self.get(id).ok_or(Error::NotFound)
	}

	async fn update_field_permission(
		&self,
		id: RecordId,
		patch: &FieldPermissionPatch,
	) -> ClResult<()> {
		let gate = self.write_gate.lock().clone();
		self.update_calls.fetch_add(1, Ordering::SeqCst);
		if let Some(gate) = gate {
			gate.notified().await;
		}
		if self.fail_writes.load(Ordering::SeqCst) {
			return Err(Error::DbError);
		}
		let mut rules = self.rules.lock();
		let rule = rules.iter_mut().find(|r| r.id == id).ok_or(Error::NotFound)?;
		if let Some(visible) = patch.visible_to_restricted_viewer {
			rule.visible_to_restricted_viewer = visible;
		}
		if let Some(editable) = patch.editable_by_restricted_viewer {
			rule.editable_by_restricted_viewer = editable;
		}
		Ok(())
	}

	async fn create_field_permission(
		&self,
		perm: &NewFieldPermission,
	) -> ClResult<FieldPermission> {
		let created = FieldPermission {
			id: RecordId::new(),
			entity_type: perm.entity_type,
			field_name: perm.field_name.clone(),
			field_label: perm.field_label.clone(),
			visible_to_restricted_viewer: perm.visible_to_restricted_viewer,
			editable_by_restricted_viewer: perm.editable_by_restricted_viewer,
		};
		self.rules.lock().push(created.clone());
		Ok(created)
	}

	async fn read_organization_by_subdomain(
		&self,
		subdomain: &str,
	) -> ClResult<Option<Organization>> {
		self.check_reads()?;
		Ok(self
			.organizations
			.lock()
			.iter()
			.find(|o| o.subdomain.as_ref() == subdomain && o.status.as_ref() == "active")
			.cloned())
	}

	async fn read_viewer(&self, session_token: &str) -> ClResult<ViewerCtx> {
		self.viewers.lock().get(session_token).cloned().ok_or(Error::PermissionDenied)
	}
}

// vim: ts=4
