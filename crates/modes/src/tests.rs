use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use glide_keystroke::{Key, NamedKey, encode_keystroke};
use glide_mappings::ActionDescriptor;

use super::*;

type Log = Rc<RefCell<Vec<&'static str>>>;

fn recording(log: &Log, name: &'static str) -> ActionHandler {
	let log = Rc::clone(log);
	ActionHandler::new(move |_| log.borrow_mut().push(name))
}

fn bind(mode: &mut Mode, seq: &str, log: &Log, name: &'static str) {
	mode.mappings_mut()
		.add(&encode_keystroke(seq), ActionDescriptor::new(recording(log, name), ""))
		.unwrap();
}

fn dispatcher_with(bindings: &[&'static str], log: &Log) -> Dispatcher {
	let mut normal = Mode::new("normal");
	for seq in bindings {
		bind(&mut normal, seq, log, seq);
	}
	Dispatcher::new(normal, DispatcherOptions::default())
}

#[test]
fn single_key_fires_immediately_with_no_residue() {
	let log = Log::default();
	let mut d = dispatcher_with(&["j"], &log);
	let now = Instant::now();

	assert_eq!(d.handle_key(Key::char('j'), now), KeyOutcome::Dispatched);
	assert_eq!(*log.borrow(), vec!["j"]);
	assert!(d.top().pending_keys().is_empty());
	assert!(d.next_deadline().is_none());
}

#[test]
fn multi_key_sequence_buffers_then_fires() {
	let log = Log::default();
	let mut d = dispatcher_with(&["gg"], &log);
	let now = Instant::now();

	assert_eq!(d.handle_key(Key::char('g'), now), KeyOutcome::Buffered { keys_so_far: 1 });
	assert!(log.borrow().is_empty());
	assert_eq!(d.handle_key(Key::char('g'), now), KeyOutcome::Dispatched);
	assert_eq!(*log.borrow(), vec!["gg"]);
}

#[test]
fn ambiguous_prefix_waits_for_grace_window() {
	let log = Log::default();
	let mut d = dispatcher_with(&["g", "gg"], &log);
	let t0 = Instant::now();

	// `g` is an exact match but also a prefix of `gg`: nothing fires yet.
	assert_eq!(d.handle_key(Key::char('g'), t0), KeyOutcome::Buffered { keys_so_far: 1 });
	assert!(log.borrow().is_empty());
	assert!(d.next_deadline().is_some());

	// Second `g` inside the window resolves to `gg`, not `g`.
	assert_eq!(d.handle_key(Key::char('g'), t0 + Duration::from_millis(50)), KeyOutcome::Dispatched);
	assert_eq!(*log.borrow(), vec!["gg"]);
	assert!(d.next_deadline().is_none());
}

#[test]
fn grace_window_elapsing_commits_the_exact_match() {
	let log = Log::default();
	let mut d = dispatcher_with(&["g", "gg"], &log);
	let t0 = Instant::now();

	d.handle_key(Key::char('g'), t0);
	// Not elapsed yet.
	assert_eq!(d.poll(t0 + Duration::from_millis(100)), None);
	assert!(log.borrow().is_empty());

	assert_eq!(d.poll(t0 + Duration::from_millis(301)), Some(KeyOutcome::Dispatched));
	assert_eq!(*log.borrow(), vec!["g"]);
	assert!(d.top().pending_keys().is_empty());
}

#[test]
fn late_key_after_deadline_commits_exact_match_first() {
	let log = Log::default();
	let mut d = dispatcher_with(&["g", "gg", "j"], &log);
	let t0 = Instant::now();

	d.handle_key(Key::char('g'), t0);
	// The caller missed the poll; the next key arrives after the deadline.
	assert_eq!(d.handle_key(Key::char('j'), t0 + Duration::from_secs(1)), KeyOutcome::Dispatched);
	assert_eq!(*log.borrow(), vec!["g", "j"]);
}

#[test]
fn disambiguating_key_can_pick_a_sibling_sequence() {
	let log = Log::default();
	let mut d = dispatcher_with(&["g", "gg", "g$"], &log);
	let t0 = Instant::now();

	d.handle_key(Key::char('g'), t0);
	assert_eq!(d.handle_key(Key::char('$'), t0 + Duration::from_millis(10)), KeyOutcome::Dispatched);
	assert_eq!(*log.borrow(), vec!["g$"]);
}

#[test]
fn dead_end_discards_buffer_silently() {
	let log = Log::default();
	let mut d = dispatcher_with(&["gg"], &log);
	let now = Instant::now();

	d.handle_key(Key::char('g'), now);
	assert_eq!(d.handle_key(Key::char('x'), now), KeyOutcome::Unhandled);
	assert!(d.top().pending_keys().is_empty());
	assert!(log.borrow().is_empty());

	// The table is intact afterwards.
	assert_eq!(d.handle_key(Key::char('g'), now), KeyOutcome::Buffered { keys_so_far: 1 });
	assert_eq!(d.handle_key(Key::char('g'), now), KeyOutcome::Dispatched);
}

#[test]
fn unbound_key_is_unhandled() {
	let log = Log::default();
	let mut d = dispatcher_with(&["j"], &log);
	assert_eq!(d.handle_key(Key::char('q'), Instant::now()), KeyOutcome::Unhandled);
	assert!(log.borrow().is_empty());
}

#[test]
fn escape_clears_pending_buffer_without_firing() {
	let log = Log::default();
	let mut d = dispatcher_with(&["gg"], &log);
	let now = Instant::now();

	d.handle_key(Key::char('g'), now);
	assert_eq!(d.handle_key(Key::named(NamedKey::Esc), now), KeyOutcome::Consumed);
	assert!(d.top().pending_keys().is_empty());
	assert!(log.borrow().is_empty());
}

#[test]
fn key_listener_consumes_before_mapping_resolution() {
	let log = Log::default();
	let mut normal = Mode::new("normal");
	bind(&mut normal, "j", &log, "j");
	let seen: Log = Log::default();
	let seen_in_listener = Rc::clone(&seen);
	normal.add_key_listener(move |_| {
		seen_in_listener.borrow_mut().push("listener");
		KeyEventDisposition::Consumed
	});

	let mut d = Dispatcher::new(normal, DispatcherOptions::default());
	assert_eq!(d.handle_key(Key::char('j'), Instant::now()), KeyOutcome::Consumed);
	assert!(log.borrow().is_empty());
	assert_eq!(*seen.borrow(), vec!["listener"]);
}

#[test]
fn handler_pushes_a_mode_and_new_top_receives_keys() {
	let log = Log::default();
	let mut normal = Mode::new("normal");
	bind(&mut normal, "j", &log, "normal_j");

	// `f` enters a picker-like mode where `j` means something else and
	// `q` pops back out.
	let picker_log = Rc::clone(&log);
	let enter_picker = ActionHandler::new(move |ctx| {
		let mut picker = Mode::new("picker");
		bind(&mut picker, "j", &picker_log, "picker_j");
		let pop = ActionHandler::new(|ctx: &mut ActionCtx| ctx.pop_mode());
		picker
			.mappings_mut()
			.add(&encode_keystroke("q"), ActionDescriptor::new(pop, ""))
			.unwrap();
		ctx.push_mode(picker);
	});
	normal
		.mappings_mut()
		.add(&encode_keystroke("f"), ActionDescriptor::new(enter_picker, ""))
		.unwrap();

	let mut d = Dispatcher::new(normal, DispatcherOptions::default());
	let now = Instant::now();

	d.handle_key(Key::char('f'), now);
	assert_eq!(d.top().name(), "picker");
	assert!(d.top().is_active());
	assert_eq!(d.depth(), 2);

	d.handle_key(Key::char('j'), now);
	assert_eq!(*log.borrow(), vec!["picker_j"]);

	d.handle_key(Key::char('q'), now);
	assert_eq!(d.top().name(), "normal");

	d.handle_key(Key::char('j'), now);
	assert_eq!(*log.borrow(), vec!["picker_j", "normal_j"]);
}

#[test]
fn suspended_mode_retains_pending_state() {
	let log = Log::default();
	let mut normal = Mode::new("normal");
	bind(&mut normal, "gg", &log, "gg");
	let mut d = Dispatcher::new(normal, DispatcherOptions::default());
	let now = Instant::now();

	d.handle_key(Key::char('g'), now);
	assert_eq!(d.top().pending_keys().len(), 1);

	d.push_mode(Mode::new("overlay"));
	assert_eq!(d.top().name(), "overlay");
	// The suspended normal mode keeps its buffered `g`; the fresh top has none.
	assert!(d.top().pending_keys().is_empty());

	d.pop_mode();
	assert_eq!(d.top().pending_keys().len(), 1);
	d.handle_key(Key::char('g'), now);
	assert_eq!(*log.borrow(), vec!["gg"]);
}

#[test]
fn bottom_mode_is_never_popped() {
	let log = Log::default();
	let mut d = dispatcher_with(&["j"], &log);
	d.pop_mode();
	assert_eq!(d.top().name(), "normal");
	assert_eq!(d.depth(), 1);
}

#[test]
fn exit_runs_finalize_hook_once() {
	let committed = Rc::new(RefCell::new(0));
	let mut overlay = Mode::new("overlay");
	let committed_in_hook = Rc::clone(&committed);
	overlay.set_finalize(move || *committed_in_hook.borrow_mut() += 1);

	let mut d = Dispatcher::new(Mode::new("normal"), DispatcherOptions::default());
	d.push_mode(overlay);
	d.pop_mode();
	d.pop_mode();
	assert_eq!(*committed.borrow(), 1);
}

#[test]
fn lifecycle_listeners_observe_enter_and_exit() {
	let events = Rc::new(RefCell::new(Vec::new()));
	let mut overlay = Mode::new("overlay");
	let sink = Rc::clone(&events);
	overlay.add_listener(move |event| sink.borrow_mut().push(event));

	let mut d = Dispatcher::new(Mode::new("normal"), DispatcherOptions::default());
	d.push_mode(overlay);
	d.pop_mode();
	assert_eq!(*events.borrow(), vec![ModeEvent::Entered, ModeEvent::Exited]);
}
