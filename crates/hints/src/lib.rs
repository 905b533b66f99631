//! The hint overlay pipeline.
//!
//! Turning a document into labeled, keyboard-selectable hints happens in
//! three stages:
//!
//! 1. [`collect_candidates`] — walk the visible document (including nested
//!    shadow trees) and gather every actionable element
//! 2. [`resolve_overlaps`] — collapse nested and occluded candidates so one
//!    hint stands for one click target
//! 3. [`HintState`] — assign short labels and narrow the visible set as the
//!    user types label characters
//!
//! Candidates and labels are created fresh per hint-mode activation and
//! discarded when it ends; nothing here persists.

pub mod collect;
pub mod label;
pub mod overlap;

pub use collect::{Candidate, CollectOptions, collect_candidates, is_editable};
pub use label::{DEFAULT_ALPHABET, FilterOutcome, Hint, HintState, LabelAssigner, Visibility};
pub use overlap::resolve_overlaps;

use glide_dom::Document;

/// Runs the full discovery pipeline: collection then overlap resolution.
pub fn hintable_elements<D: Document + ?Sized>(doc: &D, options: &CollectOptions<'_>) -> Vec<Candidate> {
	let candidates = collect_candidates(doc, options);
	resolve_overlaps(doc, candidates)
}
