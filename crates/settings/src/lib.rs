//! Settings persistence over two independently writable stores.
//!
//! Settings live in a **local** store (fast, always available) and a
//! **synced** store (roams across machines, may fail). Each store holds a
//! full [`SettingsRecord`]; the record with the larger `saved_at` wins, and
//! the losing store is brought up to date as a side effect of loading. A
//! failed write to the synced store is never fatal: it surfaces as a warning
//! string for the UI to show, and the local copy carries on as the source of
//! truth.
//!
//! There is no locking between the two stores. A mutation racing an
//! in-flight propagation write can leave the stores briefly divergent; the
//! next load reconverges them by timestamp.

pub mod memory;

pub use memory::MemoryBackend;

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// One full settings snapshot as persisted in a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsRecord {
	pub payload: IndexMap<String, Value>,
	/// Milliseconds since the Unix epoch at the last mutation.
	#[serde(rename = "savedAt", default)]
	pub saved_at: u64,
}

impl SettingsRecord {
	pub fn new(payload: IndexMap<String, Value>, saved_at: u64) -> Self {
		Self { payload, saved_at }
	}
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	#[error("storage backend failed: {0}")]
	Backend(String),
}

/// One of the two physical stores.
///
/// `get_all` returning `Ok(None)` means the store has never been written;
/// it participates in reconciliation as an empty record with `saved_at` 0.
#[async_trait]
pub trait StorageBackend: Send + Sync {
	async fn get_all(&self) -> Result<Option<SettingsRecord>, StorageError>;
	async fn set_all(&self, record: &SettingsRecord) -> Result<(), StorageError>;
}

/// The reconciled settings plus both backends, ready for mutations.
pub struct SettingsStore<L, S> {
	local: L,
	synced: S,
	defaults: IndexMap<String, Value>,
	record: SettingsRecord,
	warning: Option<String>,
}

impl<L: StorageBackend, S: StorageBackend> SettingsStore<L, S> {
	/// Reads both stores and reconciles by `saved_at`.
	///
	/// - local newer: local wins; its record is written into synced, and a
	///   synced write failure becomes [`SettingsStore::warning`];
	/// - synced newer: synced wins and is copied back into local; a local
	///   copy failure is only logged, the caller already has the data;
	/// - equal: local's record is used as-is, nothing is written.
	///
	/// Keys present in `defaults` but absent from the winning payload are
	/// filled in without bumping `saved_at`.
	pub async fn load(local: L, synced: S, defaults: IndexMap<String, Value>) -> Self {
		let local_record = read_or_empty(&local, "local").await;
		let synced_record = read_or_empty(&synced, "synced").await;

		let mut warning = None;
		let mut record = match local_record.saved_at.cmp(&synced_record.saved_at) {
			std::cmp::Ordering::Greater => {
				if let Err(err) = synced.set_all(&local_record).await {
					warning = Some(format!("failed to sync settings: {err}"));
				}
				local_record
			}
			std::cmp::Ordering::Less => {
				if let Err(err) = local.set_all(&synced_record).await {
					warn!(%err, "failed to copy synced settings into local store");
				}
				synced_record
			}
			std::cmp::Ordering::Equal => local_record,
		};

		for (key, value) in &defaults {
			if !record.payload.contains_key(key) {
				record.payload.insert(key.clone(), value.clone());
			}
		}

		Self {
			local,
			synced,
			defaults,
			record,
			warning,
		}
	}

	pub fn payload(&self) -> &IndexMap<String, Value> {
		&self.record.payload
	}

	pub fn saved_at(&self) -> u64 {
		self.record.saved_at
	}

	/// Warning left behind by the most recent load or mutation, if any.
	pub fn warning(&self) -> Option<&str> {
		self.warning.as_deref()
	}

	/// Merges `patch` into the payload and persists, stamping the current
	/// system time.
	pub async fn update(
		&mut self,
		patch: IndexMap<String, Value>,
	) -> Result<Option<String>, StorageError> {
		self.update_at(patch, now_ms()).await
	}

	/// [`SettingsStore::update`] with an explicit timestamp.
	///
	/// The local write is the success signal: its failure is the returned
	/// error. The synced write is attempted on the same path but only ever
	/// produces the returned warning.
	pub async fn update_at(
		&mut self,
		patch: IndexMap<String, Value>,
		now_ms: u64,
	) -> Result<Option<String>, StorageError> {
		for (key, value) in patch {
			self.record.payload.insert(key, value);
		}
		self.record.saved_at = now_ms;
		self.persist().await
	}

	/// Drops all user edits, restores the defaults, and persists.
	pub async fn reset(&mut self) -> Result<Option<String>, StorageError> {
		self.reset_at(now_ms()).await
	}

	pub async fn reset_at(&mut self, now_ms: u64) -> Result<Option<String>, StorageError> {
		self.record.payload = self.defaults.clone();
		self.record.saved_at = now_ms;
		self.persist().await
	}

	/// Replaces a free-text field with `sample` when its current value is
	/// not a string accepted by `validate`. Malformed user text (e.g. an
	/// unparsable snippet) must never break the settings surface.
	pub fn substitute_invalid_text(
		&mut self,
		key: &str,
		validate: impl Fn(&str) -> bool,
		sample: &str,
	) {
		let valid = self
			.record
			.payload
			.get(key)
			.and_then(Value::as_str)
			.is_some_and(&validate);
		if !valid {
			debug!(key, "replacing invalid text field with sample value");
			self.record
				.payload
				.insert(key.to_owned(), Value::String(sample.to_owned()));
		}
	}

	async fn persist(&mut self) -> Result<Option<String>, StorageError> {
		self.local.set_all(&self.record).await?;
		self.warning = match self.synced.set_all(&self.record).await {
			Ok(()) => None,
			Err(err) => Some(format!("failed to sync settings: {err}")),
		};
		Ok(self.warning.clone())
	}
}

async fn read_or_empty<B: StorageBackend>(backend: &B, which: &str) -> SettingsRecord {
	match backend.get_all().await {
		Ok(Some(record)) => record,
		Ok(None) => SettingsRecord::default(),
		Err(err) => {
			warn!(store = which, %err, "settings store unreadable, treating as empty");
			SettingsRecord::default()
		}
	}
}

fn now_ms() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_millis() as u64
}
