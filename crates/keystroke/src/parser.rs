//! Recursive-descent parser for human-readable keystroke strings.
//!
//! Grammar:
//!
//! ```text
//! sequence  = token*
//! token     = angle | char
//! angle     = "<" modifiers* key ">"
//! modifiers = modifier "-"
//! modifier  = "Ctrl" | "Alt" | "Meta" | "Shift"   (case-insensitive)
//! key       = named-key | char
//! ```
//!
//! Outside angle form every character stands for itself. A malformed angle
//! group is not an error at the sequence level: [`parse_sequence`] degrades
//! it to its literal characters so unmapped input flows through the
//! dispatcher as ordinary (unbound) keys.

use thiserror::Error;

use crate::key::{Key, KeyCode, Modifiers, NamedKey};

/// Error raised by the strict angle-group grammar.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("keystroke parse error at position {position}: {message}")]
pub struct ParseError {
	/// Human-readable description of the parse error.
	pub message: String,
	/// Byte offset in the input where the error occurred.
	pub position: usize,
}

/// Maintains parser state over the remaining input.
struct Parser<'a> {
	input: &'a str,
	position: usize,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		Self { input, position: 0 }
	}

	fn peek(&self) -> Option<char> {
		self.input.chars().next()
	}

	fn next(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.position += ch.len_utf8();
		self.input = &self.input[ch.len_utf8()..];
		Some(ch)
	}

	fn is_end(&self) -> bool {
		self.input.is_empty()
	}

	/// Consumes the next character if it matches the expected one.
	fn take(&mut self, expected: char) -> Result<(), ParseError> {
		match self.next() {
			Some(ch) if ch == expected => Ok(()),
			Some(ch) => Err(ParseError {
				message: format!("expected '{expected}', found '{ch}'"),
				position: self.position - ch.len_utf8(),
			}),
			None => Err(ParseError {
				message: format!("expected '{expected}', found end of input"),
				position: self.position,
			}),
		}
	}

	/// Attempts a sub-parse, restoring state if it yields nothing or fails.
	fn try_parse<T, F>(&mut self, f: F) -> Option<T>
	where
		F: FnOnce(&mut Parser<'a>) -> Result<Option<T>, ParseError>,
	{
		let snapshot = (self.input, self.position);
		match f(self) {
			Ok(Some(value)) => Some(value),
			Ok(None) | Err(_) => {
				self.input = snapshot.0;
				self.position = snapshot.1;
				None
			}
		}
	}

	fn take_while<F>(&mut self, predicate: F) -> String
	where
		F: Fn(char) -> bool,
	{
		let mut result = String::new();
		while let Some(ch) = self.peek() {
			if !predicate(ch) {
				break;
			}
			result.push(ch);
			self.next();
		}
		result
	}

	fn error(&self, message: String) -> ParseError {
		ParseError {
			message,
			position: self.position,
		}
	}
}

/// Parses a whole human-readable sequence, degrading malformed angle groups
/// to literal characters.
pub fn parse_sequence(s: &str) -> Vec<Key> {
	let mut parser = Parser::new(s);
	let mut keys = Vec::new();

	while let Some(ch) = parser.peek() {
		if ch == '<'
			&& let Some(key) = parser.try_parse(|p| parse_angle(p).map(Some))
		{
			keys.push(key);
			continue;
		}
		parser.next();
		keys.push(Key::char(ch));
	}

	keys
}

/// Parses a single angle group, strictly.
///
/// # Errors
///
/// Returns a [`ParseError`] if the input does not match the angle grammar.
pub fn parse_angle_group(s: &str) -> Result<Key, ParseError> {
	let mut parser = Parser::new(s);
	let key = parse_angle(&mut parser)?;
	if !parser.is_end() {
		return Err(parser.error(format!(
			"expected end of input, found: {}",
			parser.peek().unwrap()
		)));
	}
	Ok(key)
}

/// Grammar: `angle = "<" modifiers* key ">"`.
fn parse_angle(parser: &mut Parser) -> Result<Key, ParseError> {
	parser.take('<')?;

	let mut modifiers = Modifiers::NONE;
	for _ in 0..4 {
		match try_parse_modifier(parser) {
			Some("ctrl") => modifiers.ctrl = true,
			Some("alt") => modifiers.alt = true,
			Some("meta") => modifiers.meta = true,
			Some("shift") => modifiers.shift = true,
			_ => break,
		}
	}

	let code = parse_angle_key(parser)?;
	parser.take('>')?;

	// Shift folds into printable characters, mirroring Key::from_parts.
	if let KeyCode::Char(_) = code {
		modifiers.shift = false;
	}

	Ok(Key { modifiers, code })
}

/// Attempts to parse one modifier name followed by `-`.
fn try_parse_modifier<'a>(parser: &mut Parser<'a>) -> Option<&'static str> {
	parser.try_parse(|p| {
		let name = p.take_while(|ch| ch.is_ascii_alphabetic()).to_ascii_lowercase();
		let canonical = match name.as_str() {
			"ctrl" => "ctrl",
			"alt" => "alt",
			"meta" => "meta",
			"shift" => "shift",
			_ => return Ok(None),
		};
		p.take('-')?;
		Ok(Some(canonical))
	})
}

/// Parses the key inside an angle group: a named key, or any single
/// character immediately before the closing `>`.
fn parse_angle_key(parser: &mut Parser) -> Result<KeyCode, ParseError> {
	if let Some(named) = parser.try_parse(|p| {
		let name = p.take_while(|ch| ch.is_ascii_alphanumeric());
		if name.len() < 2 {
			return Ok(None);
		}
		if p.peek() != Some('>') {
			return Ok(None);
		}
		Ok(NamedKey::from_name(&name))
	}) {
		return Ok(KeyCode::Named(named));
	}

	match parser.next() {
		Some(ch) if ch != '>' => Ok(KeyCode::Char(ch)),
		_ => Err(parser.error("expected a key before '>'".to_string())),
	}
}
