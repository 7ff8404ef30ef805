//! The relation builder and evaluator.
//!
//! A [`Maker`] is bound to one element for one layout pass. Every declaration
//! records a deferred handler with a fixed priority; at commit the
//! handlers run in priority order (stable, so declaration order breaks ties)
//! against a working copy of the frame, which is then written back once.

mod edges;
mod position;
mod size;

use framekit_core::{ContractViolation, Diagnostics, Dimension, LayoutError, Rect, Size};
use smallvec::SmallVec;

use crate::relation::{Anchor, Attribute, Axis, Relation};
use crate::tree::{ElementId, ElementTree};

/// Evaluation tier of a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Priority {
    /// Absolute edges and sizes
    High,
    /// Opposite edges, which may turn into sizes
    Middle,
    /// Centers and cosmetic values that need the final size
    Low,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Handler {
    Value { attribute: Attribute, value: f64 },
    Left { anchor: Anchor, inset: f64 },
    Top { anchor: Anchor, inset: f64 },
    Right { anchor: Anchor, inset: f64 },
    Bottom { anchor: Anchor, inset: f64 },
    WidthTo { anchor: Anchor, multiplier: f64 },
    HeightTo { anchor: Anchor, multiplier: f64 },
    WidthThatFits { max: f64, resize: bool },
    HeightThatFits { max: f64, resize: bool },
    CenterX { anchor: Anchor, offset: f64 },
    CenterY { anchor: Anchor, offset: f64 },
    CenterXBetween(Anchor, Anchor),
    CenterYBetween(Anchor, Anchor),
    CenterXBetweenElements(ElementId, ElementId),
    CenterYBetweenElements(ElementId, ElementId),
    CornerRadius(f64),
    CornerRadiusByHalf(Dimension),
}

/// A remembered edge or aspect declaration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SideParameter {
    pub anchor: Anchor,
    /// Inset for edges, multiplier for aspect relations
    pub value: f64,
}

/// Last declaration of each kind, read when handlers run.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Parameters {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub width_to: Option<SideParameter>,
    pub height_to: Option<SideParameter>,
    pub left: Option<SideParameter>,
    pub top: Option<SideParameter>,
    pub right: Option<SideParameter>,
    pub bottom: Option<SideParameter>,
}

/// Relation builder for a single element.
///
/// Obtained through [`ElementTree::configure_frame`]; every method returns
/// the Maker again so declarations can be chained.
#[derive(Debug)]
pub struct Maker<'t> {
    tree: &'t mut ElementTree,
    element: ElementId,
    pending: Rect,
    handlers: SmallVec<[(Priority, Handler); 8]>,
    params: Parameters,
    diagnostics: Diagnostics,
}

impl<'t> Maker<'t> {
    pub(crate) fn new(tree: &'t mut ElementTree, element: ElementId, frame: Rect) -> Self {
        Self {
            tree,
            element,
            pending: frame,
            handlers: SmallVec::new(),
            params: Parameters::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// The element being configured.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Read access to the tree while declaring relations.
    pub fn tree(&self) -> &ElementTree {
        &*self.tree
    }

    /// Readability no-op.
    pub fn and(&mut self) -> &mut Self {
        self
    }

    /// Set the corner radius once the frame is resolved.
    pub fn corner_radius(&mut self, radius: f64) -> &mut Self {
        self.push(Priority::Low, Handler::CornerRadius(radius))
    }

    /// Set the corner radius to half of the resolved width or height.
    pub fn corner_radius_by_half(&mut self, dimension: Dimension) -> &mut Self {
        self.push(Priority::Low, Handler::CornerRadiusByHalf(dimension))
    }

    /// Wrap the element around its already positioned children.
    ///
    /// Children are shifted so none has a negative origin, then the element's
    /// size is set to the union of their frames, starting from the origin.
    pub fn container(&mut self) -> &mut Self {
        let children: SmallVec<[ElementId; 8]> = self.tree.children(self.element).iter().copied().collect();

        let mut min = glam::DVec2::ZERO;
        for child in &children {
            if let Some(frame) = self.tree.frame(*child) {
                min = min.min(frame.origin());
            }
        }

        let mut union = Rect::ZERO;
        for child in children {
            let Some(frame) = self.tree.frame(child) else {
                continue;
            };
            let shifted = frame.translate(-min);
            if shifted != frame {
                if let Err(error) = self.tree.set_frame(child, shifted) {
                    self.report(error);
                    continue;
                }
            }
            union = union.union(&shifted);
        }

        self.set_value(Attribute::Width, union.width);
        self.set_value(Attribute::Height, union.height)
    }

    /// Whichever relation resolves to the larger value. Ties pick `rhs`.
    pub fn max<A: Axis>(&mut self, lhs: Relation<A>, rhs: Relation<A>) -> Relation<A> {
        match (self.picker_value(lhs.anchor()), self.picker_value(rhs.anchor())) {
            (Some(l), Some(r)) if l > r => lhs,
            _ => rhs,
        }
    }

    /// Whichever relation resolves to the smaller value. Ties pick `rhs`.
    pub fn min<A: Axis>(&mut self, lhs: Relation<A>, rhs: Relation<A>) -> Relation<A> {
        match (self.picker_value(lhs.anchor()), self.picker_value(rhs.anchor())) {
            (Some(l), Some(r)) if l < r => lhs,
            _ => rhs,
        }
    }

    fn picker_value(&mut self, anchor: Anchor) -> Option<f64> {
        let value = if anchor.attribute.is_size() {
            self.relation_size(anchor)
        } else {
            self.converted_value(anchor)
        };
        value.map_err(|error| self.report(error)).ok()
    }

    pub(crate) fn push(&mut self, priority: Priority, handler: Handler) -> &mut Self {
        self.handlers.push((priority, handler));
        self
    }

    /// Record a constant at high priority, remembering sizes for aspect lookups.
    pub(crate) fn set_value(&mut self, attribute: Attribute, value: f64) -> &mut Self {
        match attribute {
            Attribute::Width => self.params.width = Some(value),
            Attribute::Height => self.params.height = Some(value),
            _ => {}
        }
        self.push(Priority::High, Handler::Value { attribute, value })
    }

    /// Parent of the element, or a reported contract violation.
    pub(crate) fn parent_for(&mut self, relation: &'static str) -> Option<ElementId> {
        let parent = self.tree.parent(self.element);
        if parent.is_none() {
            self.report(
                ContractViolation::MissingParent {
                    element: self.element.raw(),
                    relation,
                }
                .into(),
            );
        }
        parent
    }

    /// Check that `other` can be related to the element at all.
    pub(crate) fn relatable(&mut self, other: ElementId) -> bool {
        match self.check_common_root(other) {
            Ok(()) => true,
            Err(error) => {
                self.report(error);
                false
            }
        }
    }

    fn check_common_root(&self, other: ElementId) -> Result<(), LayoutError> {
        let own = self.tree.root_of(self.element);
        let theirs = self
            .tree
            .root_of(other)
            .ok_or(LayoutError::UnknownElement { element: other.raw() })?;
        if own != Some(theirs) {
            return Err(ContractViolation::NoCommonAncestor {
                element: self.element.raw(),
                other: other.raw(),
            }
            .into());
        }
        Ok(())
    }

    pub(crate) fn report(&mut self, error: LayoutError) {
        tracing::warn!(element = %self.element, %error, "relation skipped");
        if self.tree.options().strict_contracts && matches!(error, LayoutError::Contract(_)) {
            panic!("layout contract violated: {error}");
        }
        self.diagnostics.push(error);
    }

    /// Frame of `other` expressed in the element's parent space.
    fn converted_rect(&self, other: ElementId) -> Result<Rect, LayoutError> {
        self.check_common_root(other)?;
        let parent = self.tree.parent(self.element);
        let frame = self.tree.element(other)?.frame;

        let mut rect = if parent == Some(other) {
            Rect::with_size(frame.size())
        } else {
            // Roots have no parent space; their own space stands in for it.
            let space = parent.unwrap_or(self.element);
            self.tree.convert_rect(frame, self.tree.parent(other), space)?
        };

        // Scrollable content is laid out against its content size
        if let Some(parent) = parent {
            let parent_content = self.tree.content_size(parent).filter(|size| !size.is_zero());
            if let (Some(content), Some(_)) = (parent_content, self.tree.content_size(other)) {
                rect = Rect::from_origin_size(rect.origin(), content);
            }
        }
        Ok(rect)
    }

    /// Position of an attribute of another element in the parent space.
    pub(crate) fn converted_value(&self, anchor: Anchor) -> Result<f64, LayoutError> {
        let rect = self.converted_rect(anchor.element)?;
        let encloses = self.tree.contains(anchor.element, self.element);
        let insets = self.tree.safe_area_insets(anchor.element);

        Ok(match anchor.attribute {
            Attribute::CenterX if encloses => rect.width / 2.0,
            Attribute::CenterY if encloses => rect.height / 2.0,
            attribute => attribute.value_in(rect, insets),
        })
    }

    /// Current bounds width or height of an element.
    pub(crate) fn relation_size(&self, anchor: Anchor) -> Result<f64, LayoutError> {
        let bounds = self.tree.element(anchor.element)?.bounds();
        Ok(match anchor.attribute {
            Attribute::Width => bounds.width,
            Attribute::Height => bounds.height,
            _ => 0.0,
        })
    }

    /// Run all handlers and write the frame back.
    pub(crate) fn commit(mut self) -> Diagnostics {
        let mut handlers = std::mem::take(&mut self.handlers);
        handlers.sort_by_key(|(priority, _)| *priority);
        tracing::trace!(element = %self.element, handlers = handlers.len(), "evaluating relations");

        for (_, handler) in handlers {
            if let Err(error) = self.apply(handler) {
                self.report(error);
            }
        }

        if let Err(error) = self.tree.set_frame(self.element, self.pending) {
            self.report(error);
        }
        tracing::debug!(element = %self.element, frame = ?self.pending, "frame resolved");
        self.diagnostics
    }

    fn apply(&mut self, handler: Handler) -> Result<(), LayoutError> {
        match handler {
            Handler::Value { attribute, value } => set_rect_value(&mut self.pending, attribute, value),
            Handler::Left { .. } | Handler::Top { .. } | Handler::Right { .. } | Handler::Bottom { .. } => {
                self.apply_edge(handler)?
            }
            Handler::WidthTo { anchor, multiplier } => self.apply_aspect(Dimension::Width, anchor, multiplier)?,
            Handler::HeightTo { anchor, multiplier } => self.apply_aspect(Dimension::Height, anchor, multiplier)?,
            Handler::WidthThatFits { max, resize } => self.apply_fit(Dimension::Width, max, resize)?,
            Handler::HeightThatFits { max, resize } => self.apply_fit(Dimension::Height, max, resize)?,
            Handler::CenterX { .. }
            | Handler::CenterY { .. }
            | Handler::CenterXBetween(..)
            | Handler::CenterYBetween(..)
            | Handler::CenterXBetweenElements(..)
            | Handler::CenterYBetweenElements(..) => self.apply_center(handler)?,
            Handler::CornerRadius(radius) => self.tree.set_corner_radius(self.element, radius)?,
            Handler::CornerRadiusByHalf(dimension) => {
                let extent = match dimension {
                    Dimension::Width => self.pending.width,
                    Dimension::Height => self.pending.height,
                };
                self.tree.set_corner_radius(self.element, extent / 2.0)?
            }
        }
        Ok(())
    }
}

/// Write one attribute of a rectangle. Centers move the origin.
pub(crate) fn set_rect_value(rect: &mut Rect, attribute: Attribute, value: f64) {
    match attribute {
        Attribute::Width => rect.width = value,
        Attribute::Height => rect.height = value,
        Attribute::Left => rect.x = value,
        Attribute::Top => rect.y = value,
        Attribute::CenterX => rect.x = value - rect.width / 2.0,
        Attribute::CenterY => rect.y = value - rect.height / 2.0,
        _ => {}
    }
}

/// Constraint size used when measuring content.
pub(crate) fn fit_constraint(dimension: Dimension, known: f64) -> Size {
    match dimension {
        Dimension::Width => Size::new(f64::MAX, known),
        Dimension::Height => Size::new(known, f64::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Element;

    fn setup() -> (ElementTree, ElementId, ElementId) {
        let mut tree = ElementTree::new();
        let root = tree.add_root(Element::view().with_frame(Rect::new(0.0, 0.0, 200.0, 100.0)));
        let child = tree
            .add_child(root, Element::view().with_frame(Rect::new(10.0, 10.0, 20.0, 20.0)))
            .unwrap();
        (tree, root, child)
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High < Priority::Middle);
        assert!(Priority::Middle < Priority::Low);
    }

    #[test]
    fn test_set_rect_value_centers_on_size() {
        let mut rect = Rect::new(0.0, 0.0, 40.0, 10.0);
        set_rect_value(&mut rect, Attribute::CenterX, 100.0);
        set_rect_value(&mut rect, Attribute::CenterY, 50.0);
        assert_eq!(rect, Rect::new(80.0, 45.0, 40.0, 10.0));
    }

    #[test]
    fn test_parent_converts_to_its_size() {
        let (mut tree, root, child) = setup();
        let frame = tree.frame(child).unwrap();
        let maker = Maker::new(&mut tree, child, frame);

        assert_eq!(maker.converted_rect(root).unwrap(), Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(maker.converted_value(root.center_x().anchor()).unwrap(), 100.0);
    }

    #[test]
    fn test_container_sizes_to_children() {
        let (mut tree, _, child) = setup();
        tree.add_child(child, Element::view().with_frame(Rect::new(50.0, 50.0, 50.0, 50.0)))
            .unwrap();
        tree.add_child(child, Element::view().with_frame(Rect::new(70.0, 70.0, 50.0, 50.0)))
            .unwrap();

        let frame = tree.frame(child).unwrap();
        let mut maker = Maker::new(&mut tree, child, frame);
        maker.container();
        assert!(maker.commit().is_clean());
        assert_eq!(tree.frame(child).unwrap(), Rect::new(10.0, 10.0, 120.0, 120.0));
    }

    #[test]
    fn test_container_shifts_children_together() {
        let (mut tree, _, child) = setup();
        let first = tree
            .add_child(child, Element::view().with_frame(Rect::new(-20.0, 10.0, 40.0, 40.0)))
            .unwrap();
        let second = tree
            .add_child(child, Element::view().with_frame(Rect::new(30.0, -5.0, 20.0, 20.0)))
            .unwrap();

        let frame = tree.frame(child).unwrap();
        let mut maker = Maker::new(&mut tree, child, frame);
        maker.container();
        maker.commit();

        assert_eq!(tree.frame(first).unwrap(), Rect::new(0.0, 15.0, 40.0, 40.0));
        assert_eq!(tree.frame(second).unwrap(), Rect::new(50.0, 0.0, 20.0, 20.0));
        assert_eq!(tree.frame(child).unwrap().size(), Size::new(70.0, 55.0));
    }

    #[test]
    fn test_unrelated_tree_is_reported() {
        let (mut tree, _, child) = setup();
        let stranger = tree.add_root(Element::view());
        let frame = tree.frame(child).unwrap();

        let mut maker = Maker::new(&mut tree, child, frame);
        assert!(!maker.relatable(stranger));
        assert!(maker.diagnostics.has_contract_violation());
    }

    #[test]
    fn test_min_max_tie_picks_rhs() {
        let (mut tree, root, child) = setup();
        let frame = tree.frame(child).unwrap();
        let mut maker = Maker::new(&mut tree, child, frame);

        let lhs = root.left();
        let rhs = root.safe_area().left;
        assert_eq!(maker.min(lhs, rhs), rhs);
        assert_eq!(maker.max(lhs, rhs), rhs);
    }
}
