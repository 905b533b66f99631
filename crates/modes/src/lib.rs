//! Modal input state machine.
//!
//! * [`Mode`] — a named keyboard-input context owning one mapping table, a
//!   key-event listener chain, and enter/exit lifecycle hooks
//! * [`Dispatcher`] — owns the mode stack, accumulates the pending key
//!   buffer of the top mode, and resolves it against that mode's table
//! * [`KeyOutcome`] — what the embedding event loop does with a key
//!
//! Dispatch is sans-IO: the caller passes an [`std::time::Instant`] into
//! [`Dispatcher::handle_key`] and drives the disambiguation grace window via
//! [`Dispatcher::poll`]. Nothing here blocks or spawns.

pub mod dispatcher;
pub mod mode;
pub mod types;

#[cfg(test)]
mod tests;

pub use dispatcher::{Dispatcher, DispatcherOptions};
pub use mode::{KeyEventDisposition, Mode, ModeEvent};
pub use types::{ActionCtx, ActionHandler, Descriptor, KeyOutcome, Mappings, ModeEffect};
