//! Overlap resolution: one hint per click target.
//!
//! Raw collection produces chains of nested candidates (an anchor and the
//! span inside it, a card and its pointer-styled wrapper). For any
//! containment chain exactly one candidate survives, and occluded elements
//! that cannot actually be clicked at their center point are dropped.

use glide_dom::{Document, NodeId};
use tracing::trace;

use crate::collect::Candidate;

/// Candidates kept regardless of occlusion: hit testing misreports form
/// controls rendered under decorative overlays, and explicit matches were
/// asked for by name.
fn always_kept<D: Document + ?Sized>(doc: &D, candidate: &Candidate) -> bool {
	candidate.explicit
		|| matches!(doc.tag(candidate.element), "input" | "textarea" | "select" | "form")
		|| doc.attribute(candidate.element, "contenteditable") == Some("true")
}

fn is_anchor_with_href<D: Document + ?Sized>(doc: &D, element: NodeId) -> bool {
	doc.tag(element) == "a" && doc.attribute(element, "href").is_some()
}

/// Drops candidates whose painted center resolves to an unrelated element.
fn is_occluded<D: Document + ?Sized>(doc: &D, candidate: &Candidate) -> bool {
	let (cx, cy) = candidate.rect.center();
	let Some(covering) = doc.hit_test(candidate.element, cx, cy) else {
		return false;
	};
	if doc.contains(covering, candidate.element) || doc.contains(candidate.element, covering) {
		return false;
	}
	// A shadow host reported by hit testing may still be presenting the
	// candidate from inside its shadow tree.
	if let Some(shadow) = doc.shadow_root(covering)
		&& (doc.children(covering).is_empty() || doc.contains_deep(shadow, candidate.element))
	{
		return false;
	}
	true
}

/// Collapses a candidate set so each containment chain keeps exactly one
/// element, preserving document order.
///
/// Tie-breaks, in priority order:
/// 1. explicit candidates always survive;
/// 2. between nested non-explicit candidates the descendant wins, unless the
///    ancestor is an anchor with a resolved `href`;
/// 3. occluded candidates are dropped unless they are form controls,
///    content-editable, or explicit.
pub fn resolve_overlaps<D: Document + ?Sized>(doc: &D, candidates: Vec<Candidate>) -> Vec<Candidate> {
	let mut result: Vec<Candidate> = Vec::new();

	'next: for candidate in candidates {
		// Inert controls never get a hint, even form controls that would
		// otherwise bypass the occlusion filter.
		if doc.attribute(candidate.element, "disabled").is_some()
			|| doc.attribute(candidate.element, "readonly").is_some()
		{
			continue;
		}
		if !always_kept(doc, &candidate) && is_occluded(doc, &candidate) {
			trace!(element = ?candidate.element, "dropping occluded candidate");
			continue;
		}

		if candidate.explicit {
			result.push(candidate);
			continue;
		}

		for kept in result.iter_mut() {
			if doc.contains(kept.element, candidate.element) {
				// Prefer the descendant, keeping the ancestor's slot so
				// output order stays stable. Explicit ancestors and anchors
				// with an href are not superseded.
				if !kept.explicit && !is_anchor_with_href(doc, kept.element) {
					*kept = candidate;
				}
				continue 'next;
			}
			if let Some(shadow) = doc.shadow_root(kept.element)
				&& doc.contains(shadow, candidate.element)
			{
				// Child inside the shadow tree of an element already kept.
				continue 'next;
			}
			if doc.contains(candidate.element, kept.element) {
				trace!(element = ?candidate.element, "skipping ancestor of kept candidate");
				continue 'next;
			}
		}

		result.push(candidate);
	}

	result
}
