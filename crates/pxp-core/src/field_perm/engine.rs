//! Per-session field permission engine
//!
//! Holds the permission table of one authenticated session. Reads are
//! synchronous snapshots; loads and mutations go through the metadata store.

use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use pxp_types::meta_adapter::{FieldPermissionPatch, MetaAdapter, ViewerCtx};

use super::types::PermissionSet;
use crate::prelude::*;

/// Load state of a session's permission table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
	Uninitialized,
	Loading,
	Ready,
	/// Reads behave as `Ready` with an empty set
	Failed,
}

#[derive(Debug)]
struct Inner {
	state: LoadState,
	set: Arc<PermissionSet>,
	/// Sequence number of the load that produced `set`
	installed_seq: u64,
}

#[derive(Debug)]
pub struct FieldPermissionEngine {
	meta: Arc<dyn MetaAdapter>,
	inner: RwLock<Inner>,
	load_seq: AtomicU64,
}

#[derive(Clone, Copy)]
enum Flag {
	Visibility,
	Editability,
}

impl Flag {
	fn name(self) -> &'static str {
		match self {
			Flag::Visibility => "visibility",
			Flag::Editability => "editability",
		}
	}

	fn patch(self, value: bool) -> FieldPermissionPatch {
		match self {
			Flag::Visibility => FieldPermissionPatch::visibility(value),
			Flag::Editability => FieldPermissionPatch::editability(value),
		}
	}
}

impl FieldPermissionEngine {
	pub fn new(meta: Arc<dyn MetaAdapter>) -> Self {
		Self {
			meta,
			inner: RwLock::new(Inner {
				state: LoadState::Uninitialized,
				set: Arc::new(PermissionSet::default()),
				installed_seq: 0,
			}),
			load_seq: AtomicU64::new(0),
		}
	}

	pub fn state(&self) -> LoadState {
		self.inner.read().state
	}

	/// Current permission table. Empty unless a load has succeeded.
	pub fn snapshot(&self) -> Arc<PermissionSet> {
		self.inner.read().set.clone()
	}

	fn install(&self, seq: u64, state: LoadState, set: Arc<PermissionSet>) -> bool {
		let mut inner = self.inner.write();
		// A load that started earlier than the installed one is stale
		if seq < inner.installed_seq {
			return false;
		}
		inner.state = state;
		inner.set = set;
		inner.installed_seq = seq;
		true
	}

	fn next_seq(&self) -> u64 {
		self.load_seq.fetch_add(1, Ordering::SeqCst) + 1
	}

	/// Loads the permission table for `viewer`, replacing the cached one.
	///
	/// Super-admins get an empty set without a store query.
	pub async fn load(&self, viewer: &ViewerCtx) -> ClResult<Arc<PermissionSet>> {
		let seq = self.next_seq();

		if viewer.is_super_admin {
			let set = Arc::new(PermissionSet::default());
			self.install(seq, LoadState::Ready, set.clone());
			debug!("Field permissions: super-admin session {}, no rules loaded", viewer.profile_id);
			return Ok(set);
		}

		self.fetch(seq).await
	}

	/// Loads every stored rule regardless of the viewer. Used by the
	/// settings surface, which manages the rules themselves.
	pub async fn load_full(&self) -> ClResult<Arc<PermissionSet>> {
		let seq = self.next_seq();
		self.fetch(seq).await
	}

	async fn fetch(&self, seq: u64) -> ClResult<Arc<PermissionSet>> {
		{
			let mut inner = self.inner.write();
			if seq > inner.installed_seq {
				inner.state = LoadState::Loading;
			}
		}

		match self.meta.list_field_permissions().await {
			Ok(records) => {
				let set = Arc::new(PermissionSet::from_records(records));
				if self.install(seq, LoadState::Ready, set.clone()) {
					debug!(
						"Field permissions loaded (#{}): {} student, {} staff",
						seq,
						set.student.len(),
						set.staff.len()
					);
					Ok(set)
				} else {
					debug!("Discarding stale field permission load #{}", seq);
					Ok(self.snapshot())
				}
			}
			Err(err) => {
				warn!("Error loading field permissions: {}", err);
				if self.install(seq, LoadState::Failed, Arc::new(PermissionSet::default())) {
					Err(Error::LoadError(err.to_string()))
				} else {
					// A newer load already settled the table
					Ok(self.snapshot())
				}
			}
		}
	}

	/// Like [`load`](Self::load) but falls back to the permissive empty set
	pub async fn load_or_default(&self, viewer: &ViewerCtx) -> Arc<PermissionSet> {
		match self.load(viewer).await {
			Ok(set) => set,
			Err(_) => Arc::new(PermissionSet::default()),
		}
	}

	pub async fn set_visibility(&self, id: RecordId, value: bool) -> ClResult<()> {
		self.set_flag(id, Flag::Visibility, value).await
	}

	pub async fn set_editability(&self, id: RecordId, value: bool) -> ClResult<()> {
		self.set_flag(id, Flag::Editability, value).await
	}

	/// Applies `value` to the cached rule, then persists it. If persisting
	/// fails the cached rule gets back its previous value.
	async fn set_flag(&self, id: RecordId, flag: Flag, value: bool) -> ClResult<()> {
		let previous = self.apply_local(id, flag, value);

		match self.meta.update_field_permission(id, &flag.patch(value)).await {
			Ok(()) => {
				info!("Field permission {} {} set to {}", id, flag.name(), value);
				Ok(())
			}
			Err(err) => {
				warn!("Failed to update field permission {} {}: {}", id, flag.name(), err);
				if let Some(previous) = previous {
					self.apply_local(id, flag, previous);
				}
				Err(Error::UpdateError(err.to_string()))
			}
		}
	}

	/// Writes a flag of a cached rule, returning the value it replaced
	fn apply_local(&self, id: RecordId, flag: Flag, value: bool) -> Option<bool> {
		let mut inner = self.inner.write();
		let perm = Arc::make_mut(&mut inner.set).by_id_mut(id)?;
		let slot = match flag {
			Flag::Visibility => &mut perm.visible_to_restricted_viewer,
			Flag::Editability => &mut perm.editable_by_restricted_viewer,
		};
		Some(std::mem::replace(slot, value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field_perm::types::{editable, visible};
	use crate::field_perm::test_utils::MemoryMetaAdapter;
	use tokio::sync::Notify;

	fn viewer(is_super_admin: bool) -> ViewerCtx {
		ViewerCtx { profile_id: RecordId::new(), is_super_admin, role: Role::Admin }
	}

	fn engine_with(meta: &Arc<MemoryMetaAdapter>) -> FieldPermissionEngine {
		FieldPermissionEngine::new(meta.clone())
	}

	#[tokio::test]
	async fn test_starts_uninitialized_and_open() {
		let meta = Arc::new(MemoryMetaAdapter::with_sample_rules());
		let engine = engine_with(&meta);
		assert_eq!(engine.state(), LoadState::Uninitialized);
		let set = engine.snapshot();
		assert!(set.is_empty());
		assert!(visible(&set, EntityType::Staff, "salary", false));
	}

	#[tokio::test]
	async fn test_load_partitions_rules() {
		let meta = Arc::new(MemoryMetaAdapter::with_sample_rules());
		let engine = engine_with(&meta);
		let set = engine.load(&viewer(false)).await.expect("load");
		assert_eq!(engine.state(), LoadState::Ready);
		assert_eq!(set.student.len(), 2);
		assert_eq!(set.staff.len(), 1);
		assert!(!visible(&set, EntityType::Staff, "salary", false));
		assert!(!editable(&set, EntityType::Student, "birth_date", false));
		assert_eq!(meta.list_calls(), 1);
	}

	#[tokio::test]
	async fn test_super_admin_skips_store() {
		let meta = Arc::new(MemoryMetaAdapter::with_sample_rules());
		let engine = engine_with(&meta);
		let set = engine.load(&viewer(true)).await.expect("load");
		assert!(set.is_empty());
		assert_eq!(engine.state(), LoadState::Ready);
		assert_eq!(meta.list_calls(), 0);
		// Empty set alone already opens every field, even without the bypass flag
		assert!(visible(&set, EntityType::Staff, "salary", false));
		assert!(editable(&set, EntityType::Staff, "salary", false));
	}

	#[tokio::test]
	async fn test_failed_load_is_permissive() {
		let meta = Arc::new(MemoryMetaAdapter::with_sample_rules());
		let engine = engine_with(&meta);
		engine.load(&viewer(false)).await.expect("first load");
		meta.fail_reads(true);

		let res = engine.load(&viewer(false)).await;
		assert!(matches!(res, Err(Error::LoadError(_))));
		assert_eq!(engine.state(), LoadState::Failed);
		let set = engine.snapshot();
		assert!(set.is_empty());
		assert!(visible(&set, EntityType::Staff, "salary", false));

		let set = engine.load_or_default(&viewer(false)).await;
		assert!(set.is_empty());
	}

	#[tokio::test]
	async fn test_reload_is_idempotent() {
		let meta = Arc::new(MemoryMetaAdapter::with_sample_rules());
		let engine = engine_with(&meta);
		let first = engine.load(&viewer(false)).await.expect("load");
		let second = engine.load(&viewer(false)).await.expect("reload");
		assert_eq!(*first, *second);
		for field in ["salary", "birth_date", "medical_notes", "phone"] {
			for entity in [EntityType::Student, EntityType::Staff] {
				assert_eq!(
					visible(&first, entity, field, false),
					visible(&second, entity, field, false)
				);
				assert_eq!(
					editable(&first, entity, field, false),
					editable(&second, entity, field, false)
				);
			}
		}
	}

	/// Starts a load whose store answer is held back until `gate` opens
	async fn start_held_load(
		engine: &Arc<FieldPermissionEngine>,
		meta: &MemoryMetaAdapter,
	) -> tokio::task::JoinHandle<ClResult<Arc<PermissionSet>>> {
		let calls = meta.list_calls();
		let handle = tokio::spawn({
			let engine = engine.clone();
			async move { engine.load(&viewer(false)).await }
		});
		while meta.list_calls() == calls {
			tokio::task::yield_now().await;
		}
		handle
	}

	#[tokio::test]
	async fn test_older_load_settling_last_is_discarded() {
		let meta = Arc::new(MemoryMetaAdapter::with_sample_rules());
		let engine = Arc::new(engine_with(&meta));
		let salary = meta.id_of(EntityType::Staff, "salary").expect("salary rule");

		let mut outdated = meta.rules();
		for rule in &mut outdated {
			if rule.id == salary {
				rule.visible_to_restricted_viewer = true;
			}
		}
		let gate = Arc::new(Notify::new());
		meta.script_list(Some(gate.clone()), Some(outdated));

		let older = start_held_load(&engine, &meta).await;
		assert_eq!(engine.state(), LoadState::Loading);

		let newer = engine.load(&viewer(false)).await.expect("newer load");
		assert!(!visible(&newer, EntityType::Staff, "salary", false));

		gate.notify_one();
		let older = older.await.expect("join").expect("older load");
		assert!(!visible(&older, EntityType::Staff, "salary", false));
		assert_eq!(engine.state(), LoadState::Ready);
		assert!(!visible(&engine.snapshot(), EntityType::Staff, "salary", false));
	}

	#[tokio::test]
	async fn test_older_failure_settling_last_keeps_ready() {
		let meta = Arc::new(MemoryMetaAdapter::with_sample_rules());
		let engine = Arc::new(engine_with(&meta));

		let gate = Arc::new(Notify::new());
		meta.script_list(Some(gate.clone()), None);

		let older = start_held_load(&engine, &meta).await;
		engine.load(&viewer(false)).await.expect("newer load");
		assert_eq!(engine.state(), LoadState::Ready);

		gate.notify_one();
		let older = older.await.expect("join").expect("superseded failure");
		assert!(!visible(&older, EntityType::Staff, "salary", false));
		assert_eq!(engine.state(), LoadState::Ready);
		assert_eq!(engine.snapshot().len(), 3);
	}

	#[tokio::test]
	async fn test_load_full_ignores_super_admin_bypass() {
		let meta = Arc::new(MemoryMetaAdapter::with_sample_rules());
		let engine = engine_with(&meta);
		let set = engine.load_full().await.expect("load");
		assert_eq!(set.len(), 3);
		assert_eq!(meta.list_calls(), 1);
	}

	#[tokio::test]
	async fn test_sequential_updates_last_writer_wins() {
		let meta = Arc::new(MemoryMetaAdapter::with_sample_rules());
		let engine = engine_with(&meta);
		engine.load(&viewer(false)).await.expect("load");
		let id = meta.id_of(EntityType::Staff, "salary").expect("salary rule");

		engine.set_visibility(id, true).await.expect("first update");
		engine.set_visibility(id, false).await.expect("second update");

		assert!(!visible(&engine.snapshot(), EntityType::Staff, "salary", false));
		let stored = meta.get(id).expect("stored rule");
		assert!(!stored.visible_to_restricted_viewer);
	}

	#[tokio::test]
	async fn test_failed_update_rolls_back() {
		let meta = Arc::new(MemoryMetaAdapter::with_sample_rules());
		let engine = engine_with(&meta);
		engine.load(&viewer(false)).await.expect("load");
		let id = meta.id_of(EntityType::Student, "birth_date").expect("birth_date rule");
		meta.fail_writes(true);

		let res = engine.set_editability(id, true).await;
		assert!(matches!(res, Err(Error::UpdateError(_))));
		assert!(!editable(&engine.snapshot(), EntityType::Student, "birth_date", false));
	}

	#[tokio::test]
	async fn test_update_unknown_record() {
		let meta = Arc::new(MemoryMetaAdapter::with_sample_rules());
		let engine = engine_with(&meta);
		let res = engine.set_visibility(RecordId::new(), false).await;
		assert!(matches!(res, Err(Error::UpdateError(_))));
	}

	#[tokio::test]
	async fn test_visibility_and_editability_are_independent() {
		let meta = Arc::new(MemoryMetaAdapter::with_sample_rules());
		let engine = engine_with(&meta);
		engine.load(&viewer(false)).await.expect("load");
		let id = meta.id_of(EntityType::Student, "medical_notes").expect("rule");

		engine.set_editability(id, true).await.expect("update");
		let set = engine.snapshot();
		assert!(!visible(&set, EntityType::Student, "medical_notes", false));
		assert!(editable(&set, EntityType::Student, "medical_notes", false));
	}
}

// vim: ts=4
