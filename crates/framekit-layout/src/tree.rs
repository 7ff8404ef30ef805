//! Element tree data structures.
//!
//! The host toolkit owns the real view hierarchy. The layout engine sees it
//! through this arena: every element is addressed by an [`ElementId`] that is
//! never reused, so a stale id behaves like a dead weak reference.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use framekit_core::{ContractViolation, EdgeInsets, LayoutError, Rect, Size};
use glam::DVec2;
use smallvec::SmallVec;

use crate::configure::LayoutOptions;
use crate::keyboard::KeyboardTracker;
use crate::text::{ContentMeasure, TextContent};

/// State every element starts in.
pub const DEFAULT_STATE: &str = "DEFAULT STATE";

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Raw numeric value, as used in diagnostics.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capabilities of a view-like element.
#[derive(Debug, Clone, Default)]
pub struct ViewContent {
    /// Insets of the area not covered by system chrome
    pub safe_area_insets: EdgeInsets,
    /// Scrollable content extent; `Some` marks a scroll container
    pub content_size: Option<Size>,
    /// Content measurement delegate
    pub measure: Option<Rc<dyn ContentMeasure>>,
}

/// The two kinds of positionable things.
#[derive(Debug, Clone)]
pub enum ElementKind {
    /// Supports content measurement and safe-area insets
    View(ViewContent),
    /// Plain geometry only
    Layer,
}

/// A node in the element tree.
#[derive(Debug, Clone)]
pub struct Element {
    /// Optional name for debugging
    pub name: Option<String>,
    pub kind: ElementKind,
    /// Rectangle in the parent's coordinate space
    pub frame: Rect,
    /// Origin of the local coordinate space (scroll offset)
    pub bounds_origin: DVec2,
    pub corner_radius: f64,
    parent: Option<ElementId>,
    children: SmallVec<[ElementId; 4]>,
}

impl Element {
    fn new(kind: ElementKind) -> Self {
        Self {
            name: None,
            kind,
            frame: Rect::ZERO,
            bounds_origin: DVec2::ZERO,
            corner_radius: 0.0,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Create a view-like element.
    pub fn view() -> Self {
        Self::new(ElementKind::View(ViewContent::default()))
    }

    /// Create a layer-like element.
    pub fn layer() -> Self {
        Self::new(ElementKind::Layer)
    }

    /// Set the frame.
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the scroll offset.
    pub fn with_bounds_origin(mut self, origin: DVec2) -> Self {
        self.bounds_origin = origin;
        self
    }

    /// Set safe-area insets. Ignored for layers.
    pub fn with_safe_area_insets(mut self, insets: EdgeInsets) -> Self {
        if let ElementKind::View(content) = &mut self.kind {
            content.safe_area_insets = insets;
        }
        self
    }

    /// Mark the element as a scroll container. Ignored for layers.
    pub fn with_content_size(mut self, size: Size) -> Self {
        if let ElementKind::View(content) = &mut self.kind {
            content.content_size = Some(size);
        }
        self
    }

    /// Attach a measurement delegate. Ignored for layers.
    pub fn with_measure(mut self, measure: impl ContentMeasure + 'static) -> Self {
        if let ElementKind::View(content) = &mut self.kind {
            content.measure = Some(Rc::new(measure));
        }
        self
    }

    /// Attach text content with the default style.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_measure(TextContent::new(text))
    }

    pub fn is_view(&self) -> bool {
        matches!(self.kind, ElementKind::View(_))
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Local coordinate space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.bounds_origin, self.frame.size())
    }

    fn view_content(&self) -> Option<&ViewContent> {
        match &self.kind {
            ElementKind::View(content) => Some(content),
            ElementKind::Layer => None,
        }
    }
}

/// The element hierarchy the layout engine operates on.
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    /// All elements, indexed by ID
    nodes: HashMap<ElementId, Element>,
    /// Elements without a parent, in insertion order
    roots: Vec<ElementId>,
    /// Counter for generating unique IDs
    next_id: u64,
    /// Current named state per element; absent means [`DEFAULT_STATE`]
    states: HashMap<ElementId, String>,
    options: LayoutOptions,
    pub(crate) keyboard: KeyboardTracker,
}

impl ElementTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with the given options.
    pub fn with_options(options: LayoutOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    fn next_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an element without a parent.
    pub fn add_root(&mut self, element: Element) -> ElementId {
        let id = self.next_id();
        let mut element = element;
        element.parent = None;
        element.children.clear();
        self.nodes.insert(id, element);
        self.roots.push(id);
        id
    }

    /// Add an element as the last child of `parent`.
    pub fn add_child(&mut self, parent: ElementId, element: Element) -> Result<ElementId, LayoutError> {
        if !self.is_alive(parent) {
            return Err(unknown(parent));
        }
        let id = self.next_id();
        let mut element = element;
        element.parent = Some(parent);
        element.children.clear();
        self.nodes.insert(id, element);

        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.push(id);
        }
        Ok(id)
    }

    /// Move an existing element under `parent`, detaching it from its
    /// previous parent. A no-op when it already is a child of `parent`.
    pub fn insert_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), LayoutError> {
        if !self.is_alive(parent) {
            return Err(unknown(parent));
        }
        if !self.is_alive(child) {
            return Err(unknown(child));
        }
        if self.parent(child) == Some(parent) {
            return Ok(());
        }
        if child == parent || self.contains(child, parent) {
            return Err(ContractViolation::CyclicHierarchy {
                element: parent.raw(),
                ancestor: child.raw(),
            }
            .into());
        }

        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        Ok(())
    }

    fn detach(&mut self, id: ElementId) {
        match self.parent(id) {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(&parent) {
                    node.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
    }

    /// Remove an element and its whole subtree. Returns false for unknown ids.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.detach(id);

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                pending.extend(node.children.iter().copied());
            }
            self.states.remove(&current);
            self.keyboard.forget(current);
        }
        true
    }

    /// Whether the id still refers to an element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get an element by ID.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(&id)
    }

    /// Get a mutable element by ID.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(&id)
    }

    /// Get an element or report it as unknown.
    pub fn element(&self, id: ElementId) -> Result<&Element, LayoutError> {
        self.nodes.get(&id).ok_or_else(|| unknown(id))
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut Element, LayoutError> {
        self.nodes.get_mut(&id).ok_or_else(|| unknown(id))
    }

    /// Get the root elements.
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Children in insertion order. Empty for unknown ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes.get(&id).map(|node| node.children()).unwrap_or(&[])
    }

    /// The topmost ancestor of an element (the element itself for roots).
    pub fn root_of(&self, id: ElementId) -> Option<ElementId> {
        let mut current = id;
        let mut node = self.nodes.get(&current)?;
        while let Some(parent) = node.parent {
            current = parent;
            node = self.nodes.get(&current)?;
        }
        Some(current)
    }

    /// Whether `id` is a strict descendant of `ancestor`.
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Nearest element that is `a`, `b` or an ancestor of both.
    pub fn common_ancestor(&self, a: ElementId, b: ElementId) -> Option<ElementId> {
        let mut lineage: SmallVec<[ElementId; 16]> = SmallVec::new();
        let mut current = Some(a).filter(|id| self.is_alive(*id));
        while let Some(id) = current {
            lineage.push(id);
            current = self.parent(id);
        }

        let mut current = Some(b).filter(|id| self.is_alive(*id));
        while let Some(id) = current {
            if lineage.contains(&id) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    pub fn frame(&self, id: ElementId) -> Option<Rect> {
        self.nodes.get(&id).map(|node| node.frame)
    }

    /// Write an element's frame.
    pub fn set_frame(&mut self, id: ElementId, frame: Rect) -> Result<(), LayoutError> {
        let node = self.element_mut(id)?;
        let old = node.bounds();
        node.frame = frame;
        let new = node.bounds();

        if self.keyboard.window() == Some(id) {
            self.track_window_bounds(old, new);
        }
        Ok(())
    }

    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.nodes.get(&id).map(|node| node.bounds())
    }

    /// Resize the element, keeping its frame origin.
    pub fn set_bounds_size(&mut self, id: ElementId, size: Size) -> Result<(), LayoutError> {
        let frame = self.element(id)?.frame;
        self.set_frame(id, Rect::new(frame.x, frame.y, size.width, size.height))
    }

    pub fn corner_radius(&self, id: ElementId) -> Option<f64> {
        self.nodes.get(&id).map(|node| node.corner_radius)
    }

    pub fn set_corner_radius(&mut self, id: ElementId, radius: f64) -> Result<(), LayoutError> {
        self.element_mut(id)?.corner_radius = radius;
        Ok(())
    }

    /// Safe-area insets; zero for layers and unknown ids.
    pub fn safe_area_insets(&self, id: ElementId) -> EdgeInsets {
        self.nodes
            .get(&id)
            .and_then(Element::view_content)
            .map(|content| content.safe_area_insets)
            .unwrap_or_default()
    }

    /// Update safe-area insets. Layers have none, so the call is ignored for them.
    pub fn set_safe_area_insets(&mut self, id: ElementId, insets: EdgeInsets) -> Result<(), LayoutError> {
        match &mut self.element_mut(id)?.kind {
            ElementKind::View(content) => content.safe_area_insets = insets,
            ElementKind::Layer => {
                tracing::debug!(element = %id, "layers have no safe area; insets ignored");
            }
        }
        Ok(())
    }

    /// Scrollable content extent, if the element is a scroll container.
    pub fn content_size(&self, id: ElementId) -> Option<Size> {
        self.nodes
            .get(&id)
            .and_then(Element::view_content)
            .and_then(|content| content.content_size)
    }

    pub fn set_content_size(&mut self, id: ElementId, size: Option<Size>) -> Result<(), LayoutError> {
        match &mut self.element_mut(id)?.kind {
            ElementKind::View(content) => {
                content.content_size = size;
                Ok(())
            }
            ElementKind::Layer => Err(LayoutError::MeasurementUnavailable { element: id.raw() }),
        }
    }

    /// Size the element's content needs within `constraint`.
    ///
    /// Views without a measurement delegate report their current size.
    pub fn size_that_fits(&self, id: ElementId, constraint: Size) -> Result<Size, LayoutError> {
        let node = self.element(id)?;
        match &node.kind {
            ElementKind::View(content) => Ok(content
                .measure
                .as_ref()
                .map(|measure| measure.size_that_fits(constraint))
                .unwrap_or_else(|| node.frame.size())),
            ElementKind::Layer => Err(LayoutError::MeasurementUnavailable { element: id.raw() }),
        }
    }

    /// Resize the element to its unconstrained content size.
    pub fn size_to_fit(&mut self, id: ElementId) -> Result<Size, LayoutError> {
        let size = self.size_that_fits(id, Size::UNBOUNDED)?;
        self.set_bounds_size(id, size)?;
        Ok(size)
    }

    /// Offset of an element's local space relative to its root's space.
    fn space_offset(&self, id: ElementId) -> Result<DVec2, LayoutError> {
        let mut offset = DVec2::ZERO;
        let mut current = self.element(id)?;
        while let Some(parent) = current.parent {
            offset += current.frame.origin() - current.bounds_origin;
            current = self.element(parent)?;
        }
        Ok(offset)
    }

    /// Convert a rectangle from the local space of `from` into the local
    /// space of `to`. `from = None` means the root space of `to`'s tree.
    pub fn convert_rect(&self, rect: Rect, from: Option<ElementId>, to: ElementId) -> Result<Rect, LayoutError> {
        let to_root = self.root_of(to).ok_or_else(|| unknown(to))?;
        let from_offset = match from {
            Some(from) => {
                let from_root = self.root_of(from).ok_or_else(|| unknown(from))?;
                if from_root != to_root {
                    return Err(ContractViolation::NoCommonAncestor {
                        element: to.raw(),
                        other: from.raw(),
                    }
                    .into());
                }
                self.space_offset(from)?
            }
            None => DVec2::ZERO,
        };
        Ok(rect.translate(from_offset - self.space_offset(to)?))
    }

    /// Current named state of an element.
    pub fn state(&self, id: ElementId) -> &str {
        self.states.get(&id).map(String::as_str).unwrap_or(DEFAULT_STATE)
    }

    /// Switch an element to a named state without touching its frame.
    pub fn set_state(&mut self, id: ElementId, state: impl Into<String>) -> Result<(), LayoutError> {
        if !self.is_alive(id) {
            return Err(unknown(id));
        }
        let state = state.into();
        if state == DEFAULT_STATE {
            self.states.remove(&id);
        } else {
            self.states.insert(id, state);
        }
        Ok(())
    }
}

fn unknown(id: ElementId) -> LayoutError {
    LayoutError::UnknownElement { element: id.raw() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (ElementTree, ElementId, ElementId, ElementId) {
        let mut tree = ElementTree::new();
        let root = tree.add_root(Element::view().with_frame(Rect::new(0.0, 0.0, 800.0, 600.0)));
        let child = tree
            .add_child(root, Element::view().with_frame(Rect::new(10.0, 20.0, 300.0, 200.0)))
            .unwrap();
        let grandchild = tree
            .add_child(child, Element::layer().with_frame(Rect::new(5.0, 5.0, 50.0, 50.0)))
            .unwrap();
        (tree, root, child, grandchild)
    }

    #[test]
    fn test_hierarchy_queries() {
        let (tree, root, child, grandchild) = sample_tree();

        assert_eq!(tree.roots(), &[root]);
        assert_eq!(tree.parent(grandchild), Some(child));
        assert_eq!(tree.children(root), &[child]);
        assert_eq!(tree.root_of(grandchild), Some(root));
        assert!(tree.contains(root, grandchild));
        assert!(!tree.contains(grandchild, root));
        assert!(!tree.contains(child, child));
    }

    #[test]
    fn test_common_ancestor() {
        let (mut tree, root, child, grandchild) = sample_tree();
        let sibling = tree.add_child(root, Element::view()).unwrap();
        let stranger = tree.add_root(Element::view());

        assert_eq!(tree.common_ancestor(grandchild, sibling), Some(root));
        assert_eq!(tree.common_ancestor(grandchild, child), Some(child));
        assert_eq!(tree.common_ancestor(child, child), Some(child));
        assert_eq!(tree.common_ancestor(grandchild, stranger), None);
    }

    #[test]
    fn test_convert_rect_through_ancestors() {
        let (tree, root, child, grandchild) = sample_tree();
        let frame = tree.frame(grandchild).unwrap();

        let in_root = tree.convert_rect(frame, Some(child), root).unwrap();
        assert_eq!(in_root, Rect::new(15.0, 25.0, 50.0, 50.0));

        let back = tree.convert_rect(in_root, None, child).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn test_convert_rect_respects_scroll_offset() {
        let mut tree = ElementTree::new();
        let root = tree.add_root(Element::view().with_frame(Rect::new(0.0, 0.0, 320.0, 480.0)));
        let scroll = tree
            .add_child(
                root,
                Element::view()
                    .with_frame(Rect::new(0.0, 40.0, 320.0, 400.0))
                    .with_bounds_origin(DVec2::new(0.0, 100.0)),
            )
            .unwrap();

        let rect = tree
            .convert_rect(Rect::new(0.0, 150.0, 10.0, 10.0), Some(scroll), root)
            .unwrap();
        assert_eq!(rect, Rect::new(0.0, 90.0, 10.0, 10.0));
    }

    #[test]
    fn test_convert_between_trees_is_rejected() {
        let (mut tree, root, _, _) = sample_tree();
        let other = tree.add_root(Element::view());

        let result = tree.convert_rect(Rect::ZERO, Some(other), root);
        assert!(matches!(
            result,
            Err(LayoutError::Contract(ContractViolation::NoCommonAncestor { .. }))
        ));
    }

    #[test]
    fn test_insert_child_reparents() {
        let (mut tree, root, child, grandchild) = sample_tree();

        tree.insert_child(root, grandchild).unwrap();
        assert_eq!(tree.parent(grandchild), Some(root));
        assert!(tree.children(child).is_empty());
        assert_eq!(tree.children(root), &[child, grandchild]);

        let cyclic = tree.insert_child(child, root);
        assert!(matches!(
            cyclic,
            Err(LayoutError::Contract(ContractViolation::CyclicHierarchy { .. }))
        ));
    }

    #[test]
    fn test_remove_subtree() {
        let (mut tree, root, child, grandchild) = sample_tree();
        tree.set_state(grandchild, "expanded").unwrap();

        assert!(tree.remove(child));
        assert!(!tree.is_alive(child));
        assert!(!tree.is_alive(grandchild));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.state(grandchild), DEFAULT_STATE);
        assert!(!tree.remove(child));
    }

    #[test]
    fn test_layer_cannot_measure() {
        let (mut tree, _, child, grandchild) = sample_tree();

        assert_eq!(
            tree.size_that_fits(grandchild, Size::UNBOUNDED),
            Err(LayoutError::MeasurementUnavailable { element: grandchild.raw() })
        );
        assert_eq!(tree.safe_area_insets(grandchild), EdgeInsets::ZERO);

        // A view without content keeps its size
        assert_eq!(tree.size_to_fit(child).unwrap(), Size::new(300.0, 200.0));
    }

    #[test]
    fn test_state_side_table() {
        let (mut tree, _, child, _) = sample_tree();
        assert_eq!(tree.state(child), DEFAULT_STATE);

        tree.set_state(child, "collapsed").unwrap();
        assert_eq!(tree.state(child), "collapsed");

        tree.set_state(child, DEFAULT_STATE).unwrap();
        assert_eq!(tree.state(child), DEFAULT_STATE);
    }
}
