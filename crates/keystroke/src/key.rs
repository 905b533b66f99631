//! Key event primitives.

use std::fmt;

/// Modifier flags attached to a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
	pub ctrl: bool,
	pub alt: bool,
	pub meta: bool,
	pub shift: bool,
}

impl Modifiers {
	/// No modifiers held.
	pub const NONE: Modifiers = Modifiers {
		ctrl: false,
		alt: false,
		meta: false,
		shift: false,
	};

	/// Returns `true` if no modifier is held.
	pub fn is_empty(&self) -> bool {
		*self == Self::NONE
	}
}

/// Non-character keys addressable by name in angle form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
	Esc,
	Enter,
	Tab,
	Space,
	Backspace,
	Delete,
	Insert,
	Home,
	End,
	PageUp,
	PageDown,
	Up,
	Down,
	Left,
	Right,
	F(u8),
}

impl NamedKey {
	/// Canonical name as rendered inside angle form.
	pub fn name(&self) -> String {
		match self {
			NamedKey::Esc => "Esc".into(),
			NamedKey::Enter => "Enter".into(),
			NamedKey::Tab => "Tab".into(),
			NamedKey::Space => "Space".into(),
			NamedKey::Backspace => "Backspace".into(),
			NamedKey::Delete => "Delete".into(),
			NamedKey::Insert => "Insert".into(),
			NamedKey::Home => "Home".into(),
			NamedKey::End => "End".into(),
			NamedKey::PageUp => "PageUp".into(),
			NamedKey::PageDown => "PageDown".into(),
			NamedKey::Up => "Up".into(),
			NamedKey::Down => "Down".into(),
			NamedKey::Left => "Left".into(),
			NamedKey::Right => "Right".into(),
			NamedKey::F(n) => format!("F{n}"),
		}
	}

	/// Parses a canonical name (case-insensitive). Returns `None` for
	/// unrecognized names.
	pub fn from_name(name: &str) -> Option<NamedKey> {
		let lower = name.to_ascii_lowercase();
		Some(match lower.as_str() {
			"esc" => NamedKey::Esc,
			"enter" | "return" | "cr" => NamedKey::Enter,
			"tab" => NamedKey::Tab,
			"space" => NamedKey::Space,
			"backspace" | "bs" => NamedKey::Backspace,
			"delete" | "del" => NamedKey::Delete,
			"insert" => NamedKey::Insert,
			"home" => NamedKey::Home,
			"end" => NamedKey::End,
			"pageup" => NamedKey::PageUp,
			"pagedown" => NamedKey::PageDown,
			"up" => NamedKey::Up,
			"down" => NamedKey::Down,
			"left" => NamedKey::Left,
			"right" => NamedKey::Right,
			_ => {
				let n = lower.strip_prefix('f')?.parse::<u8>().ok()?;
				if !(1..=12).contains(&n) {
					return None;
				}
				NamedKey::F(n)
			}
		})
	}
}

/// The key itself: a printable character or a named key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
	Char(char),
	Named(NamedKey),
}

/// A canonical keystroke token: modifier flags plus a key code.
///
/// Two tokens are equal iff their canonical string renderings are equal,
/// which the derived equality guarantees since rendering is injective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
	pub modifiers: Modifiers,
	pub code: KeyCode,
}

impl Key {
	/// A bare printable character key.
	pub fn char(c: char) -> Key {
		Key {
			modifiers: Modifiers::NONE,
			code: KeyCode::Char(c),
		}
	}

	/// A Ctrl-modified character key.
	pub fn ctrl(c: char) -> Key {
		Key {
			modifiers: Modifiers {
				ctrl: true,
				..Modifiers::NONE
			},
			code: KeyCode::Char(c),
		}
	}

	/// A bare named key.
	pub fn named(named: NamedKey) -> Key {
		Key {
			modifiers: Modifiers::NONE,
			code: KeyCode::Named(named),
		}
	}

	/// Builds a token from raw event parts: a DOM-style `key` value (for
	/// example `"ArrowDown"`, `"Escape"`, `"a"`) and modifier flags.
	///
	/// Returns `None` for pure modifier presses (`"Shift"`, `"Control"`, …)
	/// and for named keys glide does not track; the dispatcher ignores those
	/// silently. Single characters always map, so an exotic layout degrades
	/// to a best-effort character token rather than an error.
	pub fn from_parts(modifiers: Modifiers, key_name: &str) -> Option<Key> {
		let mut chars = key_name.chars();
		let code = match (chars.next(), chars.next()) {
			(Some(' '), None) => KeyCode::Named(NamedKey::Space),
			(Some(c), None) => KeyCode::Char(c),
			_ => match key_name {
				"Escape" => KeyCode::Named(NamedKey::Esc),
				"Enter" => KeyCode::Named(NamedKey::Enter),
				"Tab" => KeyCode::Named(NamedKey::Tab),
				"Backspace" => KeyCode::Named(NamedKey::Backspace),
				"Delete" => KeyCode::Named(NamedKey::Delete),
				"Insert" => KeyCode::Named(NamedKey::Insert),
				"Home" => KeyCode::Named(NamedKey::Home),
				"End" => KeyCode::Named(NamedKey::End),
				"PageUp" => KeyCode::Named(NamedKey::PageUp),
				"PageDown" => KeyCode::Named(NamedKey::PageDown),
				"ArrowUp" => KeyCode::Named(NamedKey::Up),
				"ArrowDown" => KeyCode::Named(NamedKey::Down),
				"ArrowLeft" => KeyCode::Named(NamedKey::Left),
				"ArrowRight" => KeyCode::Named(NamedKey::Right),
				name => KeyCode::Named(NamedKey::from_name(name)?),
			},
		};

		// Shift on a printable character is already reflected in the
		// character itself ("A" arrives as 'A' with shift held); keeping the
		// flag would split one logical key into two unequal tokens.
		let modifiers = match code {
			KeyCode::Char(_) => Modifiers {
				shift: false,
				..modifiers
			},
			KeyCode::Named(_) => modifiers,
		};

		Some(Key { modifiers, code })
	}

	/// Returns `true` for a bare Esc token.
	pub fn is_escape(&self) -> bool {
		self.modifiers.is_empty() && self.code == KeyCode::Named(NamedKey::Esc)
	}

	/// Returns `true` if the token requires angle form when rendered.
	fn needs_angle_form(&self) -> bool {
		!self.modifiers.is_empty()
			|| matches!(self.code, KeyCode::Named(_))
			|| matches!(self.code, KeyCode::Char(c) if c == '<' || c.is_control())
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if !self.needs_angle_form() {
			let KeyCode::Char(c) = self.code else {
				unreachable!("named keys always use angle form")
			};
			return write!(f, "{c}");
		}

		write!(f, "<")?;
		if self.modifiers.ctrl {
			write!(f, "Ctrl-")?;
		}
		if self.modifiers.alt {
			write!(f, "Alt-")?;
		}
		if self.modifiers.meta {
			write!(f, "Meta-")?;
		}
		if self.modifiers.shift {
			write!(f, "Shift-")?;
		}
		match self.code {
			KeyCode::Char(c) => write!(f, "{c}")?,
			KeyCode::Named(named) => write!(f, "{}", named.name())?,
		}
		write!(f, ">")
	}
}
