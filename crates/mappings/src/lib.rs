//! Keystroke-sequence mapping tables.
//!
//! A [`MappingTable`] is a prefix tree from keystroke sequences to one bound
//! value each. Lookup distinguishes an executable exact match from a buffer
//! that is still a prefix of longer sequences ([`PrefixMatch`]), which is what
//! lets the dispatcher handle `g` vs `gg` style bindings.
//!
//! [`ActionDescriptor`] is the payload bound in mode tables: a handler plus
//! registration metadata (annotation text, feature group, remap origin).

mod annotation;
mod table;

#[cfg(test)]
mod tests;

pub use annotation::Annotation;
pub use table::{MapConflict, MappingTable, PrefixMatch};

/// Payload bound to a keystroke sequence in a mode's mapping table.
///
/// Generic over the handler type so the table layer stays independent of how
/// callers represent callables.
#[derive(Debug, Clone)]
pub struct ActionDescriptor<H> {
	/// The action to invoke when the sequence resolves.
	pub handler: H,
	/// Help text, with any feature-group prefix already parsed out.
	pub annotation: Annotation,
	/// The keystroke this binding was remapped from, if any.
	pub origin_keystroke: Option<String>,
}

impl<H> ActionDescriptor<H> {
	/// Builds a descriptor, parsing the feature-group prefix out of the raw
	/// annotation string.
	pub fn new(handler: H, raw_annotation: &str) -> Self {
		Self {
			handler,
			annotation: Annotation::parse(raw_annotation),
			origin_keystroke: None,
		}
	}
}

/// One row of an annotation listing: a bound sequence and its help text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationEntry {
	/// The bound sequence in canonical human-readable form.
	pub word: String,
	/// Help text for the binding.
	pub annotation: String,
	/// Feature group the binding belongs to, if declared.
	pub feature_group: Option<u32>,
}

impl<H> MappingTable<ActionDescriptor<H>> {
	/// Lists all bindings that carry a non-empty annotation, for help UIs.
	pub fn annotations(&self) -> Vec<AnnotationEntry> {
		self.bound_sequences()
			.into_iter()
			.filter_map(|seq| {
				let desc = self.find(&seq)?;
				if desc.annotation.text.is_empty() {
					return None;
				}
				Some(AnnotationEntry {
					word: glide_keystroke::decode_keystroke(&seq),
					annotation: desc.annotation.text.clone(),
					feature_group: desc.annotation.feature_group,
				})
			})
			.collect()
	}

	/// Rebinds the action at `old_seq` under `new_seq`, recording the origin
	/// keystroke so custom bindings can be inspected and restored.
	///
	/// Whatever was previously bound at `new_seq` is removed first; the old
	/// binding itself is left in place only if it does not exist. Returns the
	/// descriptor now bound at `new_seq`, or `None` if `old_seq` was unbound.
	pub fn remap(
		&mut self,
		new_seq: &[glide_keystroke::Key],
		old_seq: &[glide_keystroke::Key],
		new_annotation: Option<&str>,
	) -> Option<&ActionDescriptor<H>> {
		let mut desc = self.remove(old_seq)?;
		self.remove(new_seq);
		if let Some(raw) = new_annotation {
			desc.annotation = Annotation::parse(raw);
		}
		desc.origin_keystroke = Some(glide_keystroke::decode_keystroke(old_seq));
		// The slot was just cleared, so this cannot conflict.
		self.add(new_seq, desc).ok()?;
		self.find(new_seq)
	}
}
