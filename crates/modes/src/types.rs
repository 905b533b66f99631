use std::fmt;
use std::sync::Arc;

use glide_mappings::{ActionDescriptor, MappingTable};

use crate::mode::Mode;

/// Mapping table payload used by modes.
pub type Descriptor = ActionDescriptor<ActionHandler>;

/// The concrete table type owned by each mode.
pub type Mappings = MappingTable<Descriptor>;

/// Cheap-to-clone handle to an action callable.
///
/// Handlers receive an [`ActionCtx`] and queue mode-stack effects; they are
/// expected to be safe to invoke again if a slow asynchronous follow-up from
/// an earlier invocation is still outstanding.
#[derive(Clone)]
pub struct ActionHandler(Arc<dyn Fn(&mut ActionCtx)>);

impl ActionHandler {
	pub fn new(f: impl Fn(&mut ActionCtx) + 'static) -> Self {
		Self(Arc::new(f))
	}

	/// A handler with no side effects, useful as a placeholder binding.
	pub fn noop() -> Self {
		Self::new(|_| {})
	}

	pub fn run(&self, ctx: &mut ActionCtx) {
		(self.0)(ctx);
	}
}

impl fmt::Debug for ActionHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("ActionHandler(..)")
	}
}

/// Mode-stack mutation queued by an action handler.
///
/// Effects apply in order after the handler returns; when several handlers
/// race (a delayed handler completing after newer input), the last writer
/// wins on the stack top.
pub enum ModeEffect {
	/// Suspend the current top and activate this mode.
	Push(Mode),
	/// Exit and remove the current top.
	Pop,
}

impl fmt::Debug for ModeEffect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ModeEffect::Push(mode) => write!(f, "Push({})", mode.name()),
			ModeEffect::Pop => f.write_str("Pop"),
		}
	}
}

/// Context handed to action handlers.
#[derive(Debug, Default)]
pub struct ActionCtx {
	pub(crate) effects: Vec<ModeEffect>,
}

impl ActionCtx {
	/// Queues a mode push, applied when the handler returns.
	pub fn push_mode(&mut self, mode: Mode) {
		self.effects.push(ModeEffect::Push(mode));
	}

	/// Queues a pop of the current top mode.
	pub fn pop_mode(&mut self) {
		self.effects.push(ModeEffect::Pop);
	}
}

/// Result of feeding one key event through the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
	/// An action handler was invoked; the pending buffer is clear.
	Dispatched,
	/// The buffer is a prefix of at least one binding; waiting for more keys.
	Buffered {
		/// Number of keys accumulated so far.
		keys_so_far: usize,
	},
	/// The key was swallowed with no action (listener chain, Esc clearing a
	/// pending buffer, or a grace window now ticking).
	Consumed,
	/// Dead end: no binding and no possible completion. The buffer was
	/// discarded silently.
	Unhandled,
}
