//! Label assignment and incremental keystroke filtering.
//!
//! Labels are prefix-free: no assigned label is a prefix of another, so a
//! fully typed label always identifies exactly one hint. When more targets
//! exist than the alphabet has characters, characters from the end of the
//! alphabet become prefixes of longer labels while the front of the alphabet
//! keeps single-character labels.

use std::fmt;

use tracing::debug;

use crate::collect::Candidate;

/// Home-row-first default, matching what the hints are comfortable to type.
pub const DEFAULT_ALPHABET: &str = "asdfgqwertzxcvb";

/// Generates prefix-free label sets over a fixed alphabet.
#[derive(Debug, Clone)]
pub struct LabelAssigner {
	alphabet: Vec<char>,
}

impl Default for LabelAssigner {
	fn default() -> Self {
		Self::new(DEFAULT_ALPHABET)
	}
}

impl LabelAssigner {
	/// Alphabets shorter than two characters cannot form prefix-free sets of
	/// useful size; such input falls back to the default alphabet.
	pub fn new(alphabet: &str) -> Self {
		let chars: Vec<char> = alphabet.chars().collect();
		if chars.len() < 2 {
			debug!(alphabet, "label alphabet too short, using default");
			return Self {
				alphabet: DEFAULT_ALPHABET.chars().collect(),
			};
		}
		Self { alphabet: chars }
	}

	/// Produces `count` distinct prefix-free labels, shortest first.
	pub fn assign(&self, count: usize) -> Vec<String> {
		self.assign_over(count, &self.alphabet)
	}

	fn assign_over(&self, count: usize, alphabet: &[char]) -> Vec<String> {
		let k = alphabet.len();
		if count <= k {
			return alphabet[..count].iter().map(|c| c.to_string()).collect();
		}
		// Reserve the last `prefixes` characters as lead-ins for longer
		// labels; everything before them stays a single-character label.
		let prefixes = (count - k).div_ceil(k - 1).min(k);
		let singles = k - prefixes;
		let mut labels: Vec<String> = alphabet[..singles].iter().map(|c| c.to_string()).collect();

		let mut remaining = count - singles;
		for (i, &prefix) in alphabet[singles..].iter().enumerate() {
			let groups_left = prefixes - i;
			let chunk = remaining.div_ceil(groups_left);
			for suffix in self.assign_over(chunk, alphabet) {
				labels.push(format!("{prefix}{suffix}"));
			}
			remaining -= chunk;
		}
		labels
	}
}

/// How a single hint should currently render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
	/// Shown with its full label.
	Full,
	/// Still in play; the first `consumed` label characters render dimmed.
	Dimmed { consumed: usize },
	/// No longer matches what was typed.
	Hidden,
}

/// A labeled hint over one resolved candidate.
#[derive(Debug, Clone)]
pub struct Hint {
	pub label: String,
	pub candidate: Candidate,
	pub visibility: Visibility,
}

/// Result of (re)filtering the hint set against the typed characters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOutcome {
	/// Exactly one hint is selected; hint mode should act on it and end.
	Matched(Candidate),
	/// More than one hint still matches.
	Narrowed { remaining: usize },
	/// Nothing matches the typed characters.
	NoCandidates,
}

/// The live hint set for one hint-mode activation.
///
/// State is rebuilt from scratch on every keystroke (including backspace), so
/// visibility never drifts from the typed buffer.
#[derive(Debug)]
pub struct HintState {
	hints: Vec<Hint>,
	typed: String,
}

impl HintState {
	pub fn new(candidates: Vec<Candidate>, assigner: &LabelAssigner) -> Self {
		let labels = assigner.assign(candidates.len());
		let hints = labels
			.into_iter()
			.zip(candidates)
			.map(|(label, candidate)| Hint {
				label,
				candidate,
				visibility: Visibility::Full,
			})
			.collect();
		let mut state = Self {
			hints,
			typed: String::new(),
		};
		state.refresh();
		state
	}

	/// Builds a state from caller-chosen labels (per-element custom labels).
	/// Labels are trusted to be distinct; duplicates resolve to the first.
	pub fn with_labels(hints: Vec<(String, Candidate)>) -> Self {
		let hints = hints
			.into_iter()
			.map(|(label, candidate)| Hint {
				label,
				candidate,
				visibility: Visibility::Full,
			})
			.collect();
		let mut state = Self {
			hints,
			typed: String::new(),
		};
		state.refresh();
		state
	}

	pub fn hints(&self) -> &[Hint] {
		&self.hints
	}

	pub fn typed(&self) -> &str {
		&self.typed
	}

	/// Appends one label character and refilters.
	pub fn push_char(&mut self, ch: char) -> FilterOutcome {
		self.typed.push(ch);
		self.refresh()
	}

	/// Removes the last typed character and refilters. With nothing typed
	/// this is a no-op refresh.
	pub fn backspace(&mut self) -> FilterOutcome {
		self.typed.pop();
		self.refresh()
	}

	/// Recomputes every hint's visibility from the typed buffer.
	///
	/// An exact label match wins immediately even when other labels share the
	/// typed string as a prefix. A lone surviving hint also resolves, so a
	/// single-candidate hint set never requires a keystroke.
	pub fn refresh(&mut self) -> FilterOutcome {
		if let Some(hint) = self.hints.iter().find(|h| h.label == self.typed) {
			return FilterOutcome::Matched(hint.candidate);
		}

		let mut remaining = 0;
		let mut last_match = None;
		for hint in &mut self.hints {
			if hint.label.starts_with(&self.typed) {
				hint.visibility = if self.typed.is_empty() {
					Visibility::Full
				} else {
					Visibility::Dimmed {
						consumed: self.typed.len(),
					}
				};
				remaining += 1;
				last_match = Some(hint.candidate);
			} else {
				hint.visibility = Visibility::Hidden;
			}
		}

		match (remaining, last_match) {
			(0, _) => FilterOutcome::NoCandidates,
			(1, Some(candidate)) => FilterOutcome::Matched(candidate),
			_ => FilterOutcome::Narrowed { remaining },
		}
	}
}

impl fmt::Display for Visibility {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Visibility::Full => write!(f, "full"),
			Visibility::Dimmed { consumed } => write!(f, "dimmed({consumed})"),
			Visibility::Hidden => write!(f, "hidden"),
		}
	}
}
