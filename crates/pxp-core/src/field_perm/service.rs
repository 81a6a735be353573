//! Session registry for field permission engines

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

use pxp_types::meta_adapter::{FieldPermission, MetaAdapter, ViewerCtx};

use super::engine::{FieldPermissionEngine, LoadState};
use super::types::PermissionSet;
use crate::prelude::*;

const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::MIN.saturating_add(999);

/// Keeps one engine per session, evicting the least recently used ones,
/// plus the engine behind the settings surface, which holds every rule
pub struct FieldPermissionService {
	meta: Arc<dyn MetaAdapter>,
	sessions: Mutex<LruCache<Box<str>, Arc<FieldPermissionEngine>>>,
	settings: Arc<FieldPermissionEngine>,
}

impl FieldPermissionService {
	pub fn new(meta: Arc<dyn MetaAdapter>, capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
		let settings = Arc::new(FieldPermissionEngine::new(meta.clone()));
		Self { meta, sessions: Mutex::new(LruCache::new(capacity)), settings }
	}

	pub fn settings(&self) -> &Arc<FieldPermissionEngine> {
		&self.settings
	}

	/// Full rule table for the settings surface, loaded on first use.
	/// Unlike session reads, a failed load is an error here.
	pub async fn settings_table(&self) -> ClResult<Arc<PermissionSet>> {
		match self.settings.state() {
			LoadState::Ready => Ok(self.settings.snapshot()),
			_ => self.settings.load_full().await,
		}
	}

	/// A rule of the settings table. Reloads once if the rule is not cached,
	/// so rules created since the last load are found.
	pub async fn settings_rule(&self, id: RecordId) -> ClResult<FieldPermission> {
		if let Some(rule) = self.settings_table().await?.by_id(id) {
			return Ok(rule.clone());
		}
		self.settings.load_full().await?.by_id(id).cloned().ok_or(Error::NotFound)
	}

	/// Engine of a session, created uninitialized on first use
	pub fn session(&self, session_key: &str) -> Arc<FieldPermissionEngine> {
		let mut sessions = self.sessions.lock();
		if let Some(engine) = sessions.get(session_key) {
			return engine.clone();
		}
		let engine = Arc::new(FieldPermissionEngine::new(self.meta.clone()));
		sessions.put(session_key.into(), engine.clone());
		engine
	}

	/// Permission table of a session, loading it if needed. Never fails:
	/// a failed load reads as the permissive empty set.
	///
	/// A session that is still `Loading` has no rules yet, so the request
	/// runs its own load instead of reading the empty snapshot.
	pub async fn permissions(&self, session_key: &str, viewer: &ViewerCtx) -> Arc<PermissionSet> {
		let engine = self.session(session_key);
		match engine.state() {
			LoadState::Ready => {
				debug!("Field permission cache hit for session");
				engine.snapshot()
			}
			LoadState::Uninitialized | LoadState::Loading | LoadState::Failed => {
				engine.load_or_default(viewer).await
			}
		}
	}

	/// Drops every cached session so the next read loads fresh rules.
	/// The settings engine is kept; it already holds the written values.
	pub fn invalidate_all(&self) {
		self.sessions.lock().clear();
	}

	pub fn len(&self) -> usize {
		self.sessions.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.sessions.lock().is_empty()
	}
}


// vim: ts=4
