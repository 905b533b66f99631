//! Candidate discovery: which elements deserve a hint at all.

use glide_dom::{Document, NodeId, Rect, walk_tree};
use regex::Regex;

/// Selector for elements that are clickable by their nature or ARIA role.
const CLICKABLE_SELECTOR: &str = "a, button, select, input, textarea, summary, \
	*[onclick], *[contenteditable=true], *[role=button], *[role=link], \
	*[role=menuitem], *[role=option], *[role=switch], *[role=tab], \
	*[role=checkbox], *[role=combobox], *[role=menuitemcheckbox], *[role=menuitemradio]";

/// Input types that take text and therefore count as editable.
const NON_EDITABLE_INPUT_TYPES: &[&str] = &[
	"button", "checkbox", "file", "hidden", "image", "radio", "reset", "submit",
];

/// Minimum rendered box, in logical pixels, for a non-editable candidate.
const MIN_HINT_SIZE: f32 = 4.0;

/// An actionable element discovered by the collector.
///
/// `element` is a live reference into the document, not owned; candidates
/// are only valid as long as the document they came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
	pub element: NodeId,
	pub rect: Rect,
	/// The element matched the caller-supplied selector override, which wins
	/// all containment tie-breaks downstream.
	pub explicit: bool,
}

/// Caller extensions to the built-in notion of "clickable".
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectOptions<'a> {
	/// Extra CSS selector for clickable elements the built-in set misses.
	pub extra_selector: Option<&'a str>,
	/// Regex matched against element text or `aria-label`.
	pub text_pattern: Option<&'a Regex>,
}

/// Returns `true` for elements that accept text editing: such elements stay
/// hintable even with tiny rendered boxes.
pub fn is_editable<D: Document + ?Sized>(doc: &D, element: NodeId) -> bool {
	if doc.attribute(element, "disabled").is_some() {
		return false;
	}
	match doc.tag(element) {
		"textarea" | "select" => true,
		"input" => {
			let input_type = doc.attribute(element, "type").unwrap_or("text").to_ascii_lowercase();
			!NON_EDITABLE_INPUT_TYPES.contains(&input_type.as_str())
		}
		_ => doc.attribute(element, "contenteditable") == Some("true"),
	}
}

/// Walks the visible document, including nested shadow trees, and returns
/// every actionable element in document order.
pub fn collect_candidates<D: Document + ?Sized>(doc: &D, options: &CollectOptions<'_>) -> Vec<Candidate> {
	let viewport = doc.viewport();
	let mut candidates = Vec::new();

	for element in walk_tree(doc, doc.root()) {
		let rect = doc.bounding_box(element);
		if !is_visible(doc, element, rect, viewport) {
			continue;
		}
		if !passes_size_threshold(doc, element, rect) {
			continue;
		}

		let explicit = options
			.extra_selector
			.is_some_and(|selector| doc.matches(element, selector));
		if explicit || is_clickable(doc, element, options) {
			candidates.push(Candidate {
				element,
				rect,
				explicit,
			});
		}
	}

	candidates
}

fn is_visible<D: Document + ?Sized>(doc: &D, element: NodeId, rect: Rect, viewport: Rect) -> bool {
	!rect.is_empty() && rect.intersects(&viewport) && !doc.style(element).visibility_hidden
}

fn passes_size_threshold<D: Document + ?Sized>(doc: &D, element: NodeId, rect: Rect) -> bool {
	if is_editable(doc, element) {
		// Inputs stay interactable however small they render.
		return true;
	}
	rect.width > MIN_HINT_SIZE && rect.height > MIN_HINT_SIZE
}

fn is_clickable<D: Document + ?Sized>(doc: &D, element: NodeId, options: &CollectOptions<'_>) -> bool {
	if doc.matches(element, CLICKABLE_SELECTOR) || doc.style(element).cursor_pointer {
		return true;
	}
	options.text_pattern.is_some_and(|pattern| {
		pattern.is_match(&doc.text_content(element))
			|| doc.attribute(element, "aria-label").is_some_and(|label| pattern.is_match(label))
	})
}
