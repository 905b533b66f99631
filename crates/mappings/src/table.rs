use std::collections::HashMap;

use glide_keystroke::{Key, decode_keystroke};
use thiserror::Error;
use tracing::warn;

/// Raised when `add` targets a sequence that already has a binding.
///
/// The original binding is preserved; replacing it requires an explicit
/// `remove` (or `remap`) first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("keystroke sequence '{sequence}' is already bound")]
pub struct MapConflict {
	/// The conflicting sequence in canonical human-readable form.
	pub sequence: String,
}

/// Result of resolving a pending key buffer against a table.
#[derive(Debug)]
pub enum PrefixMatch<'a, T> {
	/// Exact match with no longer completions: safe to fire immediately.
	Complete(&'a T),
	/// Exact match that is also a strict prefix of other sequences; the
	/// dispatcher must wait out the grace window before committing.
	Ambiguous(&'a T),
	/// Strict prefix of at least one binding, no exact match yet.
	Pending {
		/// How many bound sequences extend this buffer.
		completions: usize,
	},
	/// Dead end: neither a match nor a prefix of one.
	None,
}

#[derive(Debug)]
struct Node<T> {
	value: Option<T>,
	children: HashMap<Key, Node<T>>,
}

impl<T> Default for Node<T> {
	fn default() -> Self {
		Self {
			value: None,
			children: HashMap::new(),
		}
	}
}

impl<T> Node<T> {
	/// Number of bound sequences at or below this node.
	fn descendant_values(&self) -> usize {
		let own = usize::from(self.value.is_some());
		own + self.children.values().map(Node::descendant_values).sum::<usize>()
	}
}

/// Prefix tree from keystroke sequences to exactly one bound value each.
///
/// A sequence may be a strict prefix of another (`g` and `gg`); lookup via
/// [`MappingTable::match_prefix`] reports both whether the buffer is complete
/// and whether longer completions remain.
#[derive(Debug)]
pub struct MappingTable<T> {
	root: Node<T>,
	len: usize,
}

impl<T> Default for MappingTable<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> MappingTable<T> {
	pub fn new() -> Self {
		Self {
			root: Node::default(),
			len: 0,
		}
	}

	/// Number of bound sequences.
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Binds `value` to `sequence`.
	///
	/// # Errors
	///
	/// Returns [`MapConflict`] (and keeps the existing binding) if the exact
	/// sequence is already bound. Conflicts are logged; callers registering
	/// defaults typically ignore the error, per the fail-closed policy.
	pub fn add(&mut self, sequence: &[Key], value: T) -> Result<(), MapConflict> {
		let mut node = &mut self.root;
		for key in sequence {
			node = node.children.entry(*key).or_default();
		}
		if node.value.is_some() {
			let conflict = MapConflict {
				sequence: decode_keystroke(sequence),
			};
			warn!(sequence = %conflict.sequence, "mapping conflict, keeping original binding");
			return Err(conflict);
		}
		node.value = Some(value);
		self.len += 1;
		Ok(())
	}

	/// Removes the exact binding for `sequence`, pruning empty branches.
	/// No-op if the sequence is unbound.
	pub fn remove(&mut self, sequence: &[Key]) -> Option<T> {
		let removed = Self::remove_at(&mut self.root, sequence);
		if removed.is_some() {
			self.len -= 1;
		}
		removed
	}

	fn remove_at(node: &mut Node<T>, sequence: &[Key]) -> Option<T> {
		let Some((first, rest)) = sequence.split_first() else {
			return node.value.take();
		};
		let child = node.children.get_mut(first)?;
		let removed = Self::remove_at(child, rest);
		if removed.is_some() && child.value.is_none() && child.children.is_empty() {
			node.children.remove(first);
		}
		removed
	}

	/// Exact lookup.
	pub fn find(&self, sequence: &[Key]) -> Option<&T> {
		self.node_at(sequence)?.value.as_ref()
	}

	/// Resolves a pending buffer: exact match, ambiguity, strict prefix, or
	/// dead end. Called by the dispatcher on every keystroke.
	pub fn match_prefix(&self, buffer: &[Key]) -> PrefixMatch<'_, T> {
		let Some(node) = self.node_at(buffer) else {
			return PrefixMatch::None;
		};
		let completions = node.children.values().map(Node::descendant_values).sum::<usize>();
		match (&node.value, completions) {
			(Some(value), 0) => PrefixMatch::Complete(value),
			(Some(value), _) => PrefixMatch::Ambiguous(value),
			(None, 0) => PrefixMatch::None,
			(None, n) => PrefixMatch::Pending { completions: n },
		}
	}

	/// All bound sequences, sorted by their canonical rendering.
	pub fn bound_sequences(&self) -> Vec<Vec<Key>> {
		let mut out = Vec::with_capacity(self.len);
		let mut prefix = Vec::new();
		Self::collect(&self.root, &mut prefix, &mut out);
		out.sort_by_key(|seq| decode_keystroke(seq));
		out
	}

	fn collect(node: &Node<T>, prefix: &mut Vec<Key>, out: &mut Vec<Vec<Key>>) {
		if node.value.is_some() {
			out.push(prefix.clone());
		}
		for (key, child) in &node.children {
			prefix.push(*key);
			Self::collect(child, prefix, out);
			prefix.pop();
		}
	}

	fn node_at(&self, sequence: &[Key]) -> Option<&Node<T>> {
		let mut node = &self.root;
		for key in sequence {
			node = node.children.get(key)?;
		}
		Some(node)
	}
}
