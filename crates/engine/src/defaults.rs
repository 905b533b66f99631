//! Stock normal-mode bindings and default settings.

use std::cell::Cell;
use std::rc::Rc;

use glide_hints::DEFAULT_ALPHABET;
use glide_keystroke::encode_keystroke;
use glide_modes::{ActionHandler, Descriptor, Mode};
use indexmap::IndexMap;
use serde_json::{Value, json};
use tracing::warn;

use crate::Transport;

/// Settings payload shipped before the user edits anything.
pub fn default_settings() -> IndexMap<String, Value> {
	IndexMap::from_iter([
		("scrollStep".to_owned(), json!(70)),
		("smoothScroll".to_owned(), json!(true)),
		("hintKeys".to_owned(), json!(DEFAULT_ALPHABET)),
	])
}

fn bind(mode: &mut Mode, sequence: &str, annotation: &str, handler: ActionHandler) {
	let keys = encode_keystroke(sequence);
	if mode.mappings_mut().add(&keys, Descriptor::new(handler, annotation)).is_err() {
		warn!(sequence, "default binding skipped, sequence already bound");
	}
}

fn send(transport: &Rc<dyn Transport>, name: &'static str, payload: Value) -> ActionHandler {
	let transport = Rc::clone(transport);
	ActionHandler::new(move |_ctx| transport.send_action(name, payload.clone(), None))
}

fn scroll(transport: &Rc<dyn Transport>, step: &Rc<Cell<i64>>, direction: i64) -> ActionHandler {
	let transport = Rc::clone(transport);
	let step = Rc::clone(step);
	ActionHandler::new(move |_ctx| {
		transport.send_action("scroll", json!({ "dy": direction * step.get() }), None);
	})
}

fn raise(flag: &Rc<Cell<bool>>) -> ActionHandler {
	let flag = Rc::clone(flag);
	ActionHandler::new(move |_ctx| flag.set(true))
}

/// Installs the stock normal-mode table.
///
/// Scroll distances read `scroll_step` at fire time, so a settings change
/// takes effect without re-registering. `f` and `?` only raise request
/// flags; the embedding supplies the document (hints) or the engine renders
/// the listing (help) after the keystroke settles.
pub fn install_default_bindings(
	mode: &mut Mode,
	transport: &Rc<dyn Transport>,
	scroll_step: &Rc<Cell<i64>>,
	hint_requested: &Rc<Cell<bool>>,
	help_requested: &Rc<Cell<bool>>,
) {
	bind(mode, "j", "#2Scroll down", scroll(transport, scroll_step, 1));
	bind(mode, "k", "#2Scroll up", scroll(transport, scroll_step, -1));
	bind(mode, "d", "#2Scroll a half page down", send(transport, "scroll.halfPage", json!({ "direction": 1 })));
	bind(mode, "e", "#2Scroll a half page up", send(transport, "scroll.halfPage", json!({ "direction": -1 })));
	bind(mode, "gg", "#2Scroll to the top of the page", send(transport, "scroll.edge", json!({ "edge": "top" })));
	bind(mode, "G", "#2Scroll to the bottom of the page", send(transport, "scroll.edge", json!({ "edge": "bottom" })));
	bind(mode, "f", "#1Open a link", raise(hint_requested));
	bind(mode, "r", "#4Reload the page", send(transport, "page.reload", json!({})));
	bind(mode, "x", "#3Close current tab", send(transport, "tab.close", json!({})));
	bind(mode, "?", "#0Show usage", raise(help_requested));
}
