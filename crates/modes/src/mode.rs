use std::fmt;

use glide_keystroke::Key;
use tracing::debug;

use crate::types::Mappings;

/// What a key-event listener did with a raw key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventDisposition {
	/// The listener consumed the key; mapping resolution is skipped.
	Consumed,
	/// Hand the key to the next listener, or to the mapping table.
	Propagate,
}

/// Lifecycle notification delivered to mode listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
	Entered,
	Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
	Inactive,
	Active,
}

/// A named, stackable keyboard-input context.
///
/// A mode owns one mapping table and its own pending key buffer. Modes are
/// created once and reused across enter/exit cycles: [`Mode::enter`] resets
/// transient state, [`Mode::exit`] clears the pending buffer and runs the
/// finalize hook if one was supplied.
pub struct Mode {
	name: String,
	mappings: Mappings,
	pending: Vec<Key>,
	state: Lifecycle,
	key_listeners: Vec<Box<dyn FnMut(&Key) -> KeyEventDisposition>>,
	listeners: Vec<Box<dyn FnMut(ModeEvent)>>,
	finalize: Option<Box<dyn FnOnce()>>,
}

impl Mode {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			mappings: Mappings::new(),
			pending: Vec::new(),
			state: Lifecycle::Inactive,
			key_listeners: Vec::new(),
			listeners: Vec::new(),
			finalize: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn is_active(&self) -> bool {
		self.state == Lifecycle::Active
	}

	pub fn mappings(&self) -> &Mappings {
		&self.mappings
	}

	pub fn mappings_mut(&mut self) -> &mut Mappings {
		&mut self.mappings
	}

	/// The keys accumulated toward a multi-key sequence.
	pub fn pending_keys(&self) -> &[Key] {
		&self.pending
	}

	pub(crate) fn pending_mut(&mut self) -> &mut Vec<Key> {
		&mut self.pending
	}

	/// Registers a raw key listener ahead of mapping resolution. Listeners
	/// run in registration order; the first to consume the key wins.
	pub fn add_key_listener(&mut self, listener: impl FnMut(&Key) -> KeyEventDisposition + 'static) {
		self.key_listeners.push(Box::new(listener));
	}

	/// Registers a lifecycle listener notified on enter and exit.
	pub fn add_listener(&mut self, listener: impl FnMut(ModeEvent) + 'static) {
		self.listeners.push(Box::new(listener));
	}

	/// Supplies a one-shot hook run on the next exit, used by picker-style
	/// modes to commit their state on close.
	pub fn set_finalize(&mut self, hook: impl FnOnce() + 'static) {
		self.finalize = Some(Box::new(hook));
	}

	/// Activates the mode: transient state is reset and listeners notified.
	pub(crate) fn enter(&mut self) {
		debug!(mode = %self.name, "enter");
		self.pending.clear();
		self.state = Lifecycle::Active;
		for listener in &mut self.listeners {
			listener(ModeEvent::Entered);
		}
	}

	/// Deactivates the mode: the pending buffer is cleared, listeners are
	/// notified, and the finalize hook (if any) runs.
	pub(crate) fn exit(&mut self) {
		debug!(mode = %self.name, "exit");
		self.pending.clear();
		self.state = Lifecycle::Inactive;
		for listener in &mut self.listeners {
			listener(ModeEvent::Exited);
		}
		if let Some(hook) = self.finalize.take() {
			hook();
		}
	}

	/// Runs the key listener chain for a raw key.
	pub(crate) fn run_key_listeners(&mut self, key: &Key) -> KeyEventDisposition {
		for listener in &mut self.key_listeners {
			if listener(key) == KeyEventDisposition::Consumed {
				return KeyEventDisposition::Consumed;
			}
		}
		KeyEventDisposition::Propagate
	}
}

impl fmt::Debug for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Mode")
			.field("name", &self.name)
			.field("bindings", &self.mappings.len())
			.field("pending", &self.pending.len())
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}
