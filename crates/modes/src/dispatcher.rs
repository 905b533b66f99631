use std::time::{Duration, Instant};

use glide_keystroke::Key;
use glide_mappings::PrefixMatch;
use tracing::{debug, trace};

use crate::mode::{KeyEventDisposition, Mode};
use crate::types::{ActionCtx, ActionHandler, KeyOutcome, ModeEffect};

/// Tuning knobs for dispatch behavior.
#[derive(Debug, Clone, Copy)]
pub struct DispatcherOptions {
	/// How long to wait for a disambiguating key when the pending buffer is
	/// simultaneously an exact match and a prefix of longer sequences.
	pub grace_window: Duration,
}

impl Default for DispatcherOptions {
	fn default() -> Self {
		Self {
			grace_window: Duration::from_millis(300),
		}
	}
}

enum Resolution {
	Fire(ActionHandler),
	Ambiguous,
	Pending(usize),
	Dead,
}

/// Single-threaded dispatch glue: owns the mode stack, feeds raw keys to the
/// top mode, and resolves its pending buffer against that mode's table.
///
/// Timing is caller-driven: pass the current [`Instant`] to
/// [`Dispatcher::handle_key`], and call [`Dispatcher::poll`] once
/// [`Dispatcher::next_deadline`] elapses to commit a waiting exact match.
pub struct Dispatcher {
	stack: Vec<Mode>,
	options: DispatcherOptions,
	grace_deadline: Option<Instant>,
}

impl Dispatcher {
	/// Builds a dispatcher with `root` as the bottom (and active) mode.
	pub fn new(mut root: Mode, options: DispatcherOptions) -> Self {
		root.enter();
		Self {
			stack: vec![root],
			options,
			grace_deadline: None,
		}
	}

	/// The active (top-of-stack) mode.
	pub fn top(&self) -> &Mode {
		self.stack.last().expect("mode stack is never empty")
	}

	/// Mutable access to the active mode, for registration and remapping.
	pub fn top_mut(&mut self) -> &mut Mode {
		self.stack.last_mut().expect("mode stack is never empty")
	}

	/// The bottom (root) mode, regardless of what is stacked above it.
	pub fn root(&self) -> &Mode {
		self.stack.first().expect("mode stack is never empty")
	}

	/// Mutable access to the root mode. Settings-driven rebinds target the
	/// root table even while a picker-style mode is on top.
	pub fn root_mut(&mut self) -> &mut Mode {
		self.stack.first_mut().expect("mode stack is never empty")
	}

	/// Number of modes on the stack.
	pub fn depth(&self) -> usize {
		self.stack.len()
	}

	/// Suspends the current top and activates `mode`. Returns the new top.
	pub fn push_mode(&mut self, mut mode: Mode) -> &Mode {
		self.grace_deadline = None;
		mode.enter();
		self.stack.push(mode);
		self.top()
	}

	/// Exits and removes the current top mode. The bottom mode is never
	/// popped. Returns the new top.
	pub fn pop_mode(&mut self) -> &Mode {
		self.grace_deadline = None;
		if self.stack.len() > 1 {
			let mut top = self.stack.pop().expect("stack checked non-empty");
			top.exit();
		}
		self.top()
	}

	/// When the grace window expires, if a disambiguation wait is active.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.grace_deadline
	}

	/// Commits a waiting exact match whose grace window has elapsed.
	pub fn poll(&mut self, now: Instant) -> Option<KeyOutcome> {
		let deadline = self.grace_deadline?;
		if now < deadline {
			return None;
		}
		self.grace_deadline = None;
		self.commit_pending_exact();
		Some(KeyOutcome::Dispatched)
	}

	/// Feeds one raw key event through the active mode.
	///
	/// An already-elapsed grace window is committed first, so key events are
	/// always processed in arrival order relative to timer outcomes.
	pub fn handle_key(&mut self, key: Key, now: Instant) -> KeyOutcome {
		if self.grace_deadline.is_some_and(|deadline| now >= deadline) {
			self.grace_deadline = None;
			self.commit_pending_exact();
		}
		// Any keystroke cancels a still-open grace window.
		self.grace_deadline = None;

		let top = self.stack.last_mut().expect("mode stack is never empty");
		if top.run_key_listeners(&key) == KeyEventDisposition::Consumed {
			trace!(mode = %top.name(), %key, "consumed by key listener");
			return KeyOutcome::Consumed;
		}

		if key.is_escape() && !top.pending_keys().is_empty() {
			top.pending_mut().clear();
			return KeyOutcome::Consumed;
		}

		top.pending_mut().push(key);
		let resolution = match top.mappings().match_prefix(top.pending_keys()) {
			PrefixMatch::Complete(desc) => Resolution::Fire(desc.handler.clone()),
			PrefixMatch::Ambiguous(_) => Resolution::Ambiguous,
			PrefixMatch::Pending { completions } => Resolution::Pending(completions),
			PrefixMatch::None => Resolution::Dead,
		};

		match resolution {
			Resolution::Fire(handler) => {
				top.pending_mut().clear();
				self.invoke(&handler);
				KeyOutcome::Dispatched
			}
			Resolution::Ambiguous => {
				let keys_so_far = top.pending_keys().len();
				debug!(mode = %top.name(), keys_so_far, "exact match shadowed by longer sequences, opening grace window");
				self.grace_deadline = Some(now + self.options.grace_window);
				KeyOutcome::Buffered { keys_so_far }
			}
			Resolution::Pending(completions) => {
				trace!(mode = %top.name(), completions, "buffering");
				KeyOutcome::Buffered {
					keys_so_far: top.pending_keys().len(),
				}
			}
			Resolution::Dead => {
				// Silent "no binding" outcome, not an error.
				top.pending_mut().clear();
				KeyOutcome::Unhandled
			}
		}
	}

	/// Fires the exact match for the current pending buffer, if still bound.
	fn commit_pending_exact(&mut self) {
		let top = self.stack.last_mut().expect("mode stack is never empty");
		let handler = {
			let pending = top.pending_keys();
			top.mappings().find(pending).map(|desc| desc.handler.clone())
		};
		top.pending_mut().clear();
		if let Some(handler) = handler {
			self.invoke(&handler);
		}
	}

	fn invoke(&mut self, handler: &ActionHandler) {
		let mut ctx = ActionCtx::default();
		handler.run(&mut ctx);
		for effect in ctx.effects {
			match effect {
				ModeEffect::Push(mode) => {
					self.push_mode(mode);
				}
				ModeEffect::Pop => {
					self.pop_mode();
				}
			}
		}
	}
}
