//! Tree-walkable document model used by the hint pipeline.
//!
//! The hint pipeline only needs a narrow slice of a real DOM: element
//! iteration, shadow-root access, geometry, a couple of computed-style bits,
//! selector matching, and point hit testing. [`Document`] captures exactly
//! that boundary; a browser embedding adapts its live document behind it,
//! and [`MemoryDocument`] provides an in-memory tree for tests and headless
//! use.

pub mod geometry;
pub mod memory;
pub mod selector;

pub use geometry::Rect;
pub use memory::{ElementSpec, MemoryDocument};

/// Opaque handle to an element node. Handles index into a live document and
/// are only meaningful for the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// The computed-style bits the hint pipeline inspects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputedStyle {
	/// `cursor: pointer` (or a cursor url) resolves on the element.
	pub cursor_pointer: bool,
	/// `visibility: hidden` resolves on the element.
	pub visibility_hidden: bool,
}

/// A document tree the hint pipeline can walk.
///
/// Children are in document order. Shadow subtrees hang off their host via
/// [`Document::shadow_root`] and are not part of the host's light children.
pub trait Document {
	/// The document (light tree) root element.
	fn root(&self) -> NodeId;

	/// Light-tree children of `node`, in document order.
	fn children(&self, node: NodeId) -> &[NodeId];

	/// Light-tree parent, if any. The root of a shadow subtree has no parent.
	fn parent(&self, node: NodeId) -> Option<NodeId>;

	/// Root of the shadow subtree hosted by `node`, if one is attached.
	fn shadow_root(&self, node: NodeId) -> Option<NodeId>;

	/// Lowercase tag name.
	fn tag(&self, node: NodeId) -> &str;

	/// Attribute value, if present.
	fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

	/// Concatenated text of the element and its light-tree descendants.
	fn text_content(&self, node: NodeId) -> String;

	/// The element's rendered bounding box in viewport coordinates.
	fn bounding_box(&self, node: NodeId) -> Rect;

	/// Computed-style bits for the element.
	fn style(&self, node: NodeId) -> ComputedStyle;

	/// The visible viewport rectangle.
	fn viewport(&self) -> Rect;

	/// Whether the element matches a CSS selector list.
	fn matches(&self, node: NodeId, selector: &str) -> bool;

	/// Light-tree containment (`ancestor == node` counts as contained).
	fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

	/// The element painted at `(x, y)` in the tree that `context` belongs to
	/// (hit testing does not pierce shadow boundaries, like
	/// `Element::elementFromPoint` on the node's root).
	fn hit_test(&self, context: NodeId, x: f32, y: f32) -> Option<NodeId>;

	/// Containment across shadow boundaries: walks `ancestor`'s light tree
	/// and every hosted shadow tree with an explicit worklist.
	fn contains_deep(&self, ancestor: NodeId, node: NodeId) -> bool {
		let mut queue = vec![ancestor];
		while let Some(current) = queue.pop() {
			if self.contains(current, node) {
				return true;
			}
			// Otherwise `node` can only hide inside a hosted shadow tree.
			let mut walk = vec![current];
			while let Some(elem) = walk.pop() {
				if let Some(shadow) = self.shadow_root(elem) {
					queue.push(shadow);
				}
				walk.extend_from_slice(self.children(elem));
			}
		}
		false
	}
}

/// Iterates a subtree in document order, descending into shadow roots.
///
/// An element hosting a shadow root contributes itself, everything reachable
/// inside its shadow tree, and then its light children. The traversal is an
/// explicit worklist, so the output list never grows while it is being
/// iterated.
pub fn walk_tree<D: Document + ?Sized>(doc: &D, root: NodeId) -> Vec<NodeId> {
	let mut out = Vec::new();
	let mut stack = vec![root];
	while let Some(node) = stack.pop() {
		out.push(node);
		for child in doc.children(node).iter().rev() {
			stack.push(*child);
		}
		if let Some(shadow) = doc.shadow_root(node) {
			stack.push(shadow);
		}
	}
	out
}
