//! Canonical keystroke tokens and conversion to/from human-readable strings.
//!
//! A physical key event is represented as a [`Key`]: modifier flags plus a
//! key code. Sequences of keys round-trip through the textual token form used
//! everywhere else in glide:
//!
//! - printable characters stand for themselves (`g`, `$`)
//! - everything else uses angle form with modifiers in canonical order
//!   (`<Ctrl-6>`, `<Esc>`, `<Ctrl-Shift-F2>`)
//!
//! [`encode_keystroke`] and [`decode_keystroke`] form a bijection over the
//! supported key space: `decode_keystroke(&encode_keystroke(s)) == s` for any
//! canonical human string `s`. Unrecognized angle groups degrade to their
//! literal characters instead of failing, so an unmapped key can never take
//! down the dispatcher.

pub mod key;
pub mod parser;

pub use key::{Key, KeyCode, Modifiers, NamedKey};
pub use parser::ParseError;

/// Parses a human-readable keystroke string into a key sequence.
///
/// Never fails: any fragment that does not parse as an angle group is taken
/// as its literal characters.
///
/// # Examples
///
/// ```
/// use glide_keystroke::{encode_keystroke, Key};
///
/// let seq = encode_keystroke("gg");
/// assert_eq!(seq, vec![Key::char('g'), Key::char('g')]);
///
/// let seq = encode_keystroke("<Ctrl-6>");
/// assert_eq!(seq, vec![Key::ctrl('6')]);
/// ```
pub fn encode_keystroke(human: &str) -> Vec<Key> {
	parser::parse_sequence(human)
}

/// Renders a key sequence back to its canonical human-readable form.
pub fn decode_keystroke(keys: &[Key]) -> String {
	keys.iter().map(Key::to_string).collect()
}
