//! In-memory [`Document`] implementation with a builder API.
//!
//! Used by the test suites and by headless embeddings. Geometry is supplied
//! by the builder rather than computed by layout; hit testing treats later
//! document order as painting on top.

use crate::geometry::Rect;
use crate::selector::{list_matches, parse_selector_list};
use crate::{ComputedStyle, Document, NodeId};

/// Builder for one element of a [`MemoryDocument`].
#[derive(Debug, Clone)]
pub struct ElementSpec {
	tag: String,
	attrs: Vec<(String, String)>,
	text: String,
	rect: Rect,
	style: ComputedStyle,
}

impl ElementSpec {
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into().to_ascii_lowercase(),
			attrs: Vec::new(),
			text: String::new(),
			rect: Rect::ZERO,
			style: ComputedStyle::default(),
		}
	}

	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.text = text.into();
		self
	}

	pub fn rect(mut self, rect: Rect) -> Self {
		self.rect = rect;
		self
	}

	/// Shorthand for [`ElementSpec::rect`].
	pub fn at(self, left: f32, top: f32, width: f32, height: f32) -> Self {
		self.rect(Rect::new(left, top, width, height))
	}

	/// Marks the element as resolving `cursor: pointer`.
	pub fn cursor_pointer(mut self) -> Self {
		self.style.cursor_pointer = true;
		self
	}

	/// Marks the element as `visibility: hidden`.
	pub fn hidden(mut self) -> Self {
		self.style.visibility_hidden = true;
		self
	}
}

#[derive(Debug)]
struct NodeData {
	tag: String,
	attrs: Vec<(String, String)>,
	text: String,
	rect: Rect,
	style: ComputedStyle,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	shadow: Option<NodeId>,
}

/// An owned document tree for tests and headless embeddings.
#[derive(Debug)]
pub struct MemoryDocument {
	nodes: Vec<NodeData>,
	viewport: Rect,
}

impl Default for MemoryDocument {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryDocument {
	/// Creates a document whose root is a `body` element covering the
	/// default 1280×800 viewport.
	pub fn new() -> Self {
		let viewport = Rect::new(0.0, 0.0, 1280.0, 800.0);
		let body = NodeData {
			tag: "body".to_string(),
			attrs: Vec::new(),
			text: String::new(),
			rect: viewport,
			style: ComputedStyle::default(),
			parent: None,
			children: Vec::new(),
			shadow: None,
		};
		Self {
			nodes: vec![body],
			viewport,
		}
	}

	pub fn set_viewport(&mut self, viewport: Rect) {
		self.viewport = viewport;
	}

	/// Appends a child element under `parent` and returns its handle.
	pub fn append(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
		let id = NodeId(self.nodes.len() as u32);
		self.nodes.push(NodeData {
			tag: spec.tag,
			attrs: spec.attrs,
			text: spec.text,
			rect: spec.rect,
			style: spec.style,
			parent: Some(parent),
			children: Vec::new(),
			shadow: None,
		});
		self.node_mut(parent).children.push(id);
		id
	}

	/// Attaches a shadow root to `host` and returns it. Elements appended
	/// under the returned node form the host's shadow tree.
	pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
		let id = NodeId(self.nodes.len() as u32);
		self.nodes.push(NodeData {
			tag: "#shadow-root".to_string(),
			attrs: Vec::new(),
			text: String::new(),
			rect: self.node(host).rect,
			style: ComputedStyle::default(),
			parent: None,
			children: Vec::new(),
			shadow: None,
		});
		self.node_mut(host).shadow = Some(id);
		id
	}

	fn node(&self, id: NodeId) -> &NodeData {
		&self.nodes[id.0 as usize]
	}

	fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
		&mut self.nodes[id.0 as usize]
	}

	/// Root of the (light or shadow) tree that `node` belongs to.
	fn tree_root(&self, node: NodeId) -> NodeId {
		let mut current = node;
		while let Some(parent) = self.node(current).parent {
			current = parent;
		}
		current
	}

	fn collect_text(&self, node: NodeId, out: &mut String) {
		out.push_str(&self.node(node).text);
		for child in &self.node(node).children {
			self.collect_text(*child, out);
		}
	}
}

impl Document for MemoryDocument {
	fn root(&self) -> NodeId {
		NodeId(0)
	}

	fn children(&self, node: NodeId) -> &[NodeId] {
		&self.node(node).children
	}

	fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.node(node).parent
	}

	fn shadow_root(&self, node: NodeId) -> Option<NodeId> {
		self.node(node).shadow
	}

	fn tag(&self, node: NodeId) -> &str {
		&self.node(node).tag
	}

	fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
		self.node(node)
			.attrs
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}

	fn text_content(&self, node: NodeId) -> String {
		let mut out = String::new();
		self.collect_text(node, &mut out);
		out
	}

	fn bounding_box(&self, node: NodeId) -> Rect {
		self.node(node).rect
	}

	fn style(&self, node: NodeId) -> ComputedStyle {
		self.node(node).style
	}

	fn viewport(&self) -> Rect {
		self.viewport
	}

	fn matches(&self, node: NodeId, selector: &str) -> bool {
		let compounds = parse_selector_list(selector);
		list_matches(&compounds, self.tag(node), |name| self.attribute(node, name))
	}

	fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
		let mut current = Some(node);
		while let Some(id) = current {
			if id == ancestor {
				return true;
			}
			current = self.node(id).parent;
		}
		false
	}

	fn hit_test(&self, context: NodeId, x: f32, y: f32) -> Option<NodeId> {
		let root = self.tree_root(context);
		// Later document order paints on top; keep the last hit.
		let mut hit = None;
		let mut stack = vec![root];
		while let Some(node) = stack.pop() {
			let data = self.node(node);
			if !data.style.visibility_hidden && !data.rect.is_empty() && data.rect.contains_point(x, y) {
				hit = Some(match hit {
					Some(prev) if prev > node => prev,
					_ => node,
				});
			}
			stack.extend_from_slice(&data.children);
		}
		hit
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::walk_tree;

	#[test]
	fn builder_produces_document_order() {
		let mut doc = MemoryDocument::new();
		let a = doc.append(doc.root(), ElementSpec::new("a").at(0.0, 0.0, 100.0, 20.0));
		let span = doc.append(a, ElementSpec::new("span").text("hi"));
		let b = doc.append(doc.root(), ElementSpec::new("button"));

		assert_eq!(doc.children(doc.root()), &[a, b]);
		assert_eq!(doc.parent(span), Some(a));
		assert_eq!(doc.tag(b), "button");
		assert_eq!(doc.text_content(a), "hi");
	}

	#[test]
	fn walk_descends_into_shadow_trees() {
		let mut doc = MemoryDocument::new();
		let host = doc.append(doc.root(), ElementSpec::new("widget-card"));
		let shadow = doc.attach_shadow(host);
		let inner = doc.append(shadow, ElementSpec::new("button"));
		let nested_host = doc.append(shadow, ElementSpec::new("nested-widget"));
		let nested_shadow = doc.attach_shadow(nested_host);
		let deep = doc.append(nested_shadow, ElementSpec::new("a"));

		let all = walk_tree(&doc, doc.root());
		assert!(all.contains(&inner));
		assert!(all.contains(&deep));
	}

	#[test]
	fn contains_stops_at_shadow_boundary_but_contains_deep_crosses() {
		let mut doc = MemoryDocument::new();
		let host = doc.append(doc.root(), ElementSpec::new("widget-card"));
		let shadow = doc.attach_shadow(host);
		let inner = doc.append(shadow, ElementSpec::new("button"));

		assert!(!doc.contains(host, inner));
		assert!(doc.contains(shadow, inner));
		assert!(doc.contains_deep(host, inner));
		assert!(doc.contains_deep(doc.root(), inner));
		assert!(!doc.contains_deep(inner, host));
	}

	#[test]
	fn hit_test_prefers_topmost_in_document_order() {
		let mut doc = MemoryDocument::new();
		let below = doc.append(doc.root(), ElementSpec::new("div").at(0.0, 0.0, 100.0, 100.0));
		let above = doc.append(doc.root(), ElementSpec::new("div").at(0.0, 0.0, 100.0, 100.0));
		assert_eq!(doc.hit_test(below, 50.0, 50.0), Some(above));
	}

	#[test]
	fn hit_test_ignores_hidden_and_respects_tree_boundaries() {
		let mut doc = MemoryDocument::new();
		let link = doc.append(doc.root(), ElementSpec::new("a").at(0.0, 0.0, 50.0, 20.0));
		let _curtain = doc.append(
			doc.root(),
			ElementSpec::new("div").at(0.0, 0.0, 200.0, 200.0).hidden(),
		);
		assert_eq!(doc.hit_test(link, 10.0, 10.0), Some(link));

		let host = doc.append(doc.root(), ElementSpec::new("widget-card").at(300.0, 0.0, 50.0, 50.0));
		let shadow = doc.attach_shadow(host);
		let inner = doc.append(shadow, ElementSpec::new("button").at(300.0, 0.0, 50.0, 50.0));
		// Hit testing in the shadow tree never sees light-tree elements.
		assert_eq!(doc.hit_test(inner, 310.0, 10.0), Some(inner));
	}

	#[test]
	fn selector_matching_uses_attributes() {
		let mut doc = MemoryDocument::new();
		let div = doc.append(doc.root(), ElementSpec::new("div").attr("role", "button"));
		assert!(doc.matches(div, "*[role=button]"));
		assert!(!doc.matches(div, "a, button"));
	}
}
