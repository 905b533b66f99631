//! Glue layer: modal dispatch, the hint pipeline, and settings, wired to an
//! embedding through two narrow boundaries.
//!
//! The embedding owns the event loop and the document. Its obligations:
//!
//! 1. feed every raw key event into [`Engine::handle_key`] and drive the
//!    disambiguation timer via [`Engine::poll`]/[`Engine::next_deadline`];
//! 2. after each call, check [`Engine::take_hint_request`] and answer it with
//!    [`Engine::start_hints`] and the current document;
//! 3. render [`Engine::hint_overlay`] whenever hint mode is active.
//!
//! Everything outward-facing goes through [`Transport`] (actions for the
//! privileged background process) and [`Notifier`] (banners and popups),
//! both fire-and-forget.

pub mod boundary;
pub mod defaults;


pub use boundary::{Notifier, Transport};
pub use defaults::{default_settings, install_default_bindings};

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use glide_dom::Document;
use glide_hints::{
	Candidate, CollectOptions, FilterOutcome, HintState, LabelAssigner, Visibility,
	hintable_elements,
};
use glide_keystroke::{Key, KeyCode, NamedKey, encode_keystroke};
use glide_modes::{Dispatcher, DispatcherOptions, KeyEventDisposition, KeyOutcome, Mode};
use glide_settings::{SettingsStore, StorageBackend};
use indexmap::IndexMap;
use serde_json::{Value, json};
use tracing::{debug, warn};

const BANNER_SHORT_MS: u64 = 1600;
const BANNER_LONG_MS: u64 = 5000;

struct HintSession {
	state: HintState,
	resolved: Option<Candidate>,
	dismissed: bool,
}

/// One hint marker as the embedding should draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct HintMarker {
	pub label: String,
	pub candidate: Candidate,
	pub visibility: Visibility,
}

/// The assembled interactive core.
pub struct Engine {
	dispatcher: Dispatcher,
	transport: Rc<dyn Transport>,
	notifier: Rc<dyn Notifier>,
	label_assigner: LabelAssigner,
	scroll_step: Rc<Cell<i64>>,
	hint_requested: Rc<Cell<bool>>,
	help_requested: Rc<Cell<bool>>,
	hint_session: Rc<RefCell<Option<HintSession>>>,
}

impl Engine {
	/// Builds the engine with the stock normal-mode bindings installed.
	pub fn new(
		transport: Rc<dyn Transport>,
		notifier: Rc<dyn Notifier>,
		options: DispatcherOptions,
	) -> Self {
		let scroll_step = Rc::new(Cell::new(70));
		let hint_requested = Rc::new(Cell::new(false));
		let help_requested = Rc::new(Cell::new(false));

		let mut normal = Mode::new("normal");
		install_default_bindings(
			&mut normal,
			&transport,
			&scroll_step,
			&hint_requested,
			&help_requested,
		);

		Self {
			dispatcher: Dispatcher::new(normal, options),
			transport,
			notifier,
			label_assigner: LabelAssigner::default(),
			scroll_step,
			hint_requested,
			help_requested,
			hint_session: Rc::new(RefCell::new(None)),
		}
	}

	/// Feeds one raw key event through the active mode and settles any hint
	/// resolution or help request it produced.
	pub fn handle_key(&mut self, key: Key, now: Instant) -> KeyOutcome {
		let outcome = self.dispatcher.handle_key(key, now);
		self.settle_hints();
		if self.help_requested.replace(false) {
			self.show_help();
		}
		outcome
	}

	/// Commits a waiting exact match whose grace window has elapsed.
	pub fn poll(&mut self, now: Instant) -> Option<KeyOutcome> {
		let outcome = self.dispatcher.poll(now);
		if outcome.is_some() {
			self.settle_hints();
			if self.help_requested.replace(false) {
				self.show_help();
			}
		}
		outcome
	}

	/// When [`Engine::poll`] next needs to run, if a grace window is open.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.dispatcher.next_deadline()
	}

	/// Name of the active mode.
	pub fn active_mode(&self) -> &str {
		self.dispatcher.top().name()
	}

	/// Number of modes on the stack (1 = normal mode only).
	pub fn mode_depth(&self) -> usize {
		self.dispatcher.depth()
	}

	/// True once per `f`-style keystroke: the embedding should respond by
	/// calling [`Engine::start_hints`] with the current document.
	pub fn take_hint_request(&self) -> bool {
		self.hint_requested.replace(false)
	}

	/// Runs the hint pipeline over `doc` and enters hint mode.
	///
	/// A single surviving candidate is activated outright, with no mode
	/// push and no keystroke required. An empty candidate set only banners.
	pub fn start_hints<D: Document + ?Sized>(&mut self, doc: &D, options: &CollectOptions<'_>) {
		let candidates = hintable_elements(doc, options);
		if candidates.is_empty() {
			self.notifier.show_banner("No hints", BANNER_SHORT_MS);
			return;
		}

		let mut state = HintState::new(candidates, &self.label_assigner);
		if let FilterOutcome::Matched(candidate) = state.refresh() {
			self.activate_hint(candidate);
			return;
		}

		*self.hint_session.borrow_mut() = Some(HintSession {
			state,
			resolved: None,
			dismissed: false,
		});

		let mut mode = Mode::new("hints");
		let session = Rc::clone(&self.hint_session);
		mode.add_key_listener(move |key| hint_key(&session, key));
		let session = Rc::clone(&self.hint_session);
		mode.set_finalize(move || {
			*session.borrow_mut() = None;
		});
		self.dispatcher.push_mode(mode);
	}

	/// Current hint markers for rendering, empty when hint mode is off.
	pub fn hint_overlay(&self) -> Vec<HintMarker> {
		self.hint_session
			.borrow()
			.as_ref()
			.map(|session| {
				session
					.state
					.hints()
					.iter()
					.map(|hint| HintMarker {
						label: hint.label.clone(),
						candidate: hint.candidate,
						visibility: hint.visibility,
					})
					.collect()
			})
			.unwrap_or_default()
	}

	/// Loads settings through two-store reconciliation, banners any
	/// reconciliation warning, and applies the payload.
	pub async fn load_settings<L: StorageBackend, S: StorageBackend>(
		&mut self,
		local: L,
		synced: S,
		defaults: IndexMap<String, Value>,
	) -> SettingsStore<L, S> {
		let store = SettingsStore::load(local, synced, defaults).await;
		if let Some(warning) = store.warning() {
			self.notifier.show_banner(warning, BANNER_LONG_MS);
		}
		self.apply_settings(store.payload());
		store
	}

	/// Persists a settings edit and banners the result. Local write success
	/// is the success signal; a synced-store failure only warns.
	pub async fn save_settings<L: StorageBackend, S: StorageBackend>(
		&mut self,
		store: &mut SettingsStore<L, S>,
		patch: IndexMap<String, Value>,
	) {
		match store.update(patch).await {
			Ok(None) => self.notifier.show_banner("Settings saved", BANNER_SHORT_MS),
			Ok(Some(warning)) => self.notifier.show_banner(&warning, BANNER_LONG_MS),
			Err(err) => self
				.notifier
				.show_banner(&format!("Failed to save settings: {err}"), BANNER_LONG_MS),
		}
		self.apply_settings(store.payload());
	}

	/// Applies a settings payload to the live engine: scroll step, hint
	/// label alphabet, and `basicMappings` rebinds.
	pub fn apply_settings(&mut self, payload: &IndexMap<String, Value>) {
		if let Some(step) = payload.get("scrollStep").and_then(Value::as_i64) {
			self.scroll_step.set(step);
		}
		if let Some(alphabet) = payload.get("hintKeys").and_then(Value::as_str) {
			self.label_assigner = LabelAssigner::new(alphabet);
		}
		if let Some(map) = payload.get("basicMappings").and_then(Value::as_object) {
			let pairs: Vec<(String, String)> = map
				.iter()
				.filter_map(|(new, old)| Some((new.clone(), old.as_str()?.to_owned())))
				.collect();
			self.apply_basic_mappings(&pairs);
		}
	}

	/// Rebinds actions to user-chosen keystrokes, recording the origin
	/// keystroke on each moved descriptor. Pairs are `(new, old)` in
	/// human-readable form; a pair whose `old` is unbound is skipped.
	///
	/// Basic mappings belong to the normal mode, so the rebind targets the
	/// root table even when a settings edit lands while hint mode is up.
	pub fn apply_basic_mappings(&mut self, pairs: &[(String, String)]) {
		for (new, old) in pairs {
			let new_keys = encode_keystroke(new);
			let old_keys = encode_keystroke(old);
			let mappings = self.dispatcher.root_mut().mappings_mut();
			if mappings.remap(&new_keys, &old_keys, None).is_none() {
				warn!(new = %new, old = %old, "ignoring remap from unbound keystroke");
			}
		}
	}

	/// Renders the active mode's annotated bindings into the help popup.
	pub fn show_help(&self) {
		let mut html = String::from("<div class=\"usage\">");
		for entry in self.dispatcher.top().mappings().annotations() {
			html.push_str(&format!(
				"<div><span class=\"kbd\">{}</span><span>{}</span></div>",
				entry.word, entry.annotation
			));
		}
		html.push_str("</div>");
		self.notifier.show_popup(&html);
	}

	/// Applies a finished hint selection or dismissal: pops hint mode (whose
	/// exit hook discards the session) and activates the chosen target.
	fn settle_hints(&mut self) {
		enum Settled {
			Activate(Candidate),
			Dismiss,
		}

		let settled = {
			let mut guard = self.hint_session.borrow_mut();
			match guard.as_mut() {
				Some(session) => {
					if let Some(candidate) = session.resolved.take() {
						Some(Settled::Activate(candidate))
					} else if session.dismissed {
						Some(Settled::Dismiss)
					} else {
						None
					}
				}
				None => None,
			}
		};

		match settled {
			Some(Settled::Activate(candidate)) => {
				self.dispatcher.pop_mode();
				self.activate_hint(candidate);
			}
			Some(Settled::Dismiss) => {
				self.dispatcher.pop_mode();
			}
			None => {}
		}
	}

	fn activate_hint(&self, candidate: Candidate) {
		debug!(element = ?candidate.element, "activating hint target");
		let (x, y) = candidate.rect.center();
		self.transport.send_action(
			"hint.activate",
			json!({ "element": candidate.element.0, "x": x, "y": y }),
			None,
		);
	}
}

/// Hint-mode key listener: label characters and Backspace narrow the set,
/// Esc dismisses, modified keys fall through to the (empty) hint table.
fn hint_key(session: &Rc<RefCell<Option<HintSession>>>, key: &Key) -> KeyEventDisposition {
	let mut guard = session.borrow_mut();
	let Some(session) = guard.as_mut() else {
		return KeyEventDisposition::Propagate;
	};

	if key.is_escape() {
		session.dismissed = true;
		return KeyEventDisposition::Consumed;
	}
	if !key.modifiers.is_empty() {
		return KeyEventDisposition::Propagate;
	}

	let outcome = match key.code {
		KeyCode::Char(c) => session.state.push_char(c),
		KeyCode::Named(NamedKey::Backspace) => session.state.backspace(),
		KeyCode::Named(_) => return KeyEventDisposition::Propagate,
	};
	if let FilterOutcome::Matched(candidate) = outcome {
		session.resolved = Some(candidate);
	}
	KeyEventDisposition::Consumed
}
