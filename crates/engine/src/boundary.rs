//! Boundaries to the privileged background process and the page UI.

use serde_json::Value;

/// Message channel to the privileged background process.
///
/// Delivery is best-effort: an implementation that fails to deliver simply
/// never invokes `on_response`, and callers treat that as an empty result.
pub trait Transport {
	fn send_action(&self, name: &str, payload: Value, on_response: Option<Box<dyn FnOnce(Value)>>);
}

/// Fire-and-forget user-facing notifications.
pub trait Notifier {
	/// Transient message, dismissed after `timeout_ms`.
	fn show_banner(&self, message: &str, timeout_ms: u64);

	/// Larger modal surface (help listing, errors with detail).
	fn show_popup(&self, html: &str);
}
