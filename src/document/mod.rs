//! Arena document model for vector illustrations.
//!
//! A loaded SVG lives in an arena of node records indexed by stable
//! [`NodeId`] handles. Keeping the tree out of any rendering library's hands
//! means fill edits and reset are plain data manipulation, testable without a
//! raster backend; the rasterizer only ever sees serialized markup.

mod parse;
mod write;

pub(crate) use parse::parse_forest;

use crate::editor::FillPolicy;

// ============================================================================
// Node records
// ============================================================================

/// A stable handle to a node within one [`Illustration`].
///
/// Handles are only meaningful for the illustration that produced them;
/// the tree structure never changes after load, so a handle stays valid for
/// the illustration's whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Element {
        /// Tag name as written in the source, namespace prefix included.
        name: String,
        /// Attributes in source order; order survives serialization.
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

/// The SVG namespace, stamped on roots that lack a declaration.
pub(crate) const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Strips a namespace prefix from a tag name.
pub(crate) fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

// ============================================================================
// ViewBox
// ============================================================================

/// An illustration's intrinsic geometry: origin offset plus width/height in
/// user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Parses a `viewBox` attribute value.
    ///
    /// Accepts whitespace- or comma-separated coordinates. Returns `None`
    /// unless all four components parse and the size is positive.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(str::parse::<f32>);

        let x = parts.next()?.ok()?;
        let y = parts.next()?.ok()?;
        let width = parts.next()?.ok()?;
        let height = parts.next()?.ok()?;
        if parts.next().is_some() || width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Self::new(x, y, width, height))
    }
}

// ============================================================================
// Colorable bookkeeping
// ============================================================================

/// Per-node bookkeeping for a colorable element.
///
/// `original_fill` is captured exactly once, at load, before any edit can
/// happen; `None` is the transparent sentinel for a node that had no explicit
/// fill (or `fill="none"`). `region` is the resolved logical group under the
/// scoped policy.
#[derive(Debug, Clone)]
pub(crate) struct ColorableRecord {
    pub(crate) node: NodeId,
    pub(crate) original_fill: Option<String>,
    pub(crate) region: Option<NodeId>,
}

// ============================================================================
// Illustration
// ============================================================================

/// One vector document, ready for region recoloring.
///
/// Built once at load time and never structurally mutated afterwards; the
/// only state that changes is the `fill` attribute of individual nodes.
#[derive(Debug, Clone)]
pub struct Illustration {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) view_box: Option<ViewBox>,
    pub(crate) colorable: Vec<ColorableRecord>,
    pub(crate) policy: FillPolicy,
}

impl Illustration {
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId, policy: FillPolicy) -> Self {
        Self {
            nodes,
            root,
            view_box: None,
            colorable: Vec::new(),
            policy,
        }
    }

    /// The colorable-node scope policy this illustration was loaded with.
    pub fn policy(&self) -> FillPolicy {
        self.policy
    }

    /// The `<svg>` root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The intrinsic viewport declared by the source document, if any.
    pub fn view_box(&self) -> Option<ViewBox> {
        self.view_box
    }

    /// Handles of all colorable nodes, in document order.
    pub fn colorable_ids(&self) -> Vec<NodeId> {
        self.colorable.iter().map(|c| c.node).collect()
    }

    /// Number of colorable nodes.
    pub fn colorable_count(&self) -> usize {
        self.colorable.len()
    }

    /// Returns true if `id` is eligible for recoloring.
    pub fn is_colorable(&self, id: NodeId) -> bool {
        self.colorable.iter().any(|c| c.node == id)
    }

    /// The fill a colorable node had at load time.
    ///
    /// `None` means either the transparent sentinel (no explicit fill, or
    /// `fill="none"`) or a handle that is not colorable at all.
    pub fn original_fill(&self, id: NodeId) -> Option<&str> {
        self.colorable
            .iter()
            .find(|c| c.node == id)?
            .original_fill
            .as_deref()
    }

    /// The node's current `fill` attribute, if present.
    pub fn fill(&self, id: NodeId) -> Option<&str> {
        self.attr(id, "fill")
    }

    /// Sets the node's current `fill` attribute. Never touches original fills.
    pub fn set_fill(&mut self, id: NodeId, value: &str) {
        self.set_attr(id, "fill", value);
    }

    /// Removes any `fill` override, letting inherited rendering show through.
    pub fn remove_fill(&mut self, id: NodeId) {
        self.remove_attr(id, "fill");
    }

    /// Serializes the current document state back to SVG markup.
    pub fn to_svg(&self) -> String {
        write::write_markup(self, None)
    }

    /// Serializes the current state with the root stamped with `view_box`
    /// and matching width/height, for fixed-geometry rasterization.
    pub(crate) fn to_svg_sized(&self, view_box: &ViewBox) -> String {
        write::write_markup(self, Some(view_box))
    }

    // ---- Tree access ----
    //
    // Lookups go through `get`, so a handle forged against some other
    // illustration reads as absent instead of panicking.

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    pub(crate) fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.nodes.get(id.0).map(|node| &node.kind),
            Some(NodeKind::Element { .. })
        )
    }

    pub(crate) fn element_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::Text(_) => None,
        }
    }

    /// All element descendants of `id`, in document order, excluding `id`.
    pub(crate) fn element_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(start) = self.nodes.get(id.0) else {
            return out;
        };
        let mut stack: Vec<NodeId> = start.children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            if self.is_element(next) {
                out.push(next);
                stack.extend(self.nodes[next.0].children.iter().rev().copied());
            }
        }
        out
    }

    pub(crate) fn region_of(&self, id: NodeId) -> Option<NodeId> {
        self.colorable.iter().find(|c| c.node == id)?.region
    }

    // ---- Attribute access ----

    pub(crate) fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub(crate) fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(NodeKind::Element { attrs, .. }) =
            self.nodes.get_mut(id.0).map(|node| &mut node.kind)
        {
            match attrs.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => {
                    existing.clear();
                    existing.push_str(value);
                }
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub(crate) fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(NodeKind::Element { attrs, .. }) =
            self.nodes.get_mut(id.0).map(|node| &mut node.kind)
        {
            attrs.retain(|(key, _)| key != name);
        }
    }

    /// Drops fixed pixel width/height from the root so the document scales
    /// to its container. Called once at load.
    pub(crate) fn strip_root_size(&mut self) {
        self.remove_attr(self.root, "width");
        self.remove_attr(self.root, "height");
    }

    /// Stamps the SVG namespace on the root when the source lacks a
    /// declaration. Inline markup often omits it, but the rasterizer refuses
    /// a document without one. Called once at load.
    pub(crate) fn ensure_svg_namespace(&mut self) {
        if self.attr(self.root, "xmlns").is_none() {
            self.set_attr(self.root, "xmlns", SVG_NS);
        }
    }
}

/// Finds the first `<svg>` element anywhere in a parsed forest.
pub(crate) fn find_svg_root(nodes: &[Node], top_level: &[NodeId]) -> Option<NodeId> {
    let mut stack: Vec<NodeId> = top_level.iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        if let NodeKind::Element { name, .. } = &nodes[id.0].kind {
            if local_name(name) == "svg" {
                return Some(id);
            }
        }
        stack.extend(nodes[id.0].children.iter().rev().copied());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_box_parses_whitespace_and_commas() {
        let vb = ViewBox::parse("0 0 800 600").unwrap();
        assert_eq!(vb, ViewBox::new(0.0, 0.0, 800.0, 600.0));

        let vb = ViewBox::parse("10, -5, 120.5, 40").unwrap();
        assert_eq!(vb, ViewBox::new(10.0, -5.0, 120.5, 40.0));
    }

    #[test]
    fn view_box_rejects_bad_input() {
        assert!(ViewBox::parse("").is_none());
        assert!(ViewBox::parse("0 0 800").is_none());
        assert!(ViewBox::parse("0 0 800 600 7").is_none());
        assert!(ViewBox::parse("0 0 0 600").is_none());
        assert!(ViewBox::parse("0 0 800 -600").is_none());
        assert!(ViewBox::parse("a b c d").is_none());
    }

    #[test]
    fn local_name_strips_prefix() {
        assert_eq!(local_name("svg"), "svg");
        assert_eq!(local_name("svg:svg"), "svg");
        assert_eq!(local_name("xlink:href"), "href");
    }
}
