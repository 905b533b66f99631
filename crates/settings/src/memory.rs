//! In-memory backend for tests and headless embedding.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{SettingsRecord, StorageBackend, StorageError};

#[derive(Debug, Default)]
struct Inner {
	record: Option<SettingsRecord>,
	fail_reads: bool,
	fail_writes: bool,
	write_count: usize,
}

/// A [`StorageBackend`] backed by process memory.
///
/// Clones share state, so a test can keep a handle while the store owns
/// another. Read and write failures can be injected to exercise the
/// degraded paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
	inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_record(record: SettingsRecord) -> Self {
		let backend = Self::new();
		backend.lock().record = Some(record);
		backend
	}

	pub fn fail_reads(&self, fail: bool) {
		self.lock().fail_reads = fail;
	}

	pub fn fail_writes(&self, fail: bool) {
		self.lock().fail_writes = fail;
	}

	/// The record currently stored, if any.
	pub fn record(&self) -> Option<SettingsRecord> {
		self.lock().record.clone()
	}

	/// Number of successful `set_all` calls observed.
	pub fn write_count(&self) -> usize {
		self.lock().write_count
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
		self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

#[async_trait]
impl StorageBackend for MemoryBackend {
	async fn get_all(&self) -> Result<Option<SettingsRecord>, StorageError> {
		let inner = self.lock();
		if inner.fail_reads {
			return Err(StorageError::Backend("injected read failure".into()));
		}
		Ok(inner.record.clone())
	}

	async fn set_all(&self, record: &SettingsRecord) -> Result<(), StorageError> {
		let mut inner = self.lock();
		if inner.fail_writes {
			return Err(StorageError::Backend("injected write failure".into()));
		}
		inner.record = Some(record.clone());
		inner.write_count += 1;
		Ok(())
	}
}
