//! Relation references.
//!
//! A [`Relation`] names one attribute of one element. The axis marker keeps a
//! vertical edge from being passed where a horizontal one is expected: the
//! check happens at compile time, the Maker never sees a mismatched pair.

use std::fmt;
use std::marker::PhantomData;

use bitflags::bitflags;
use framekit_core::{ContractViolation, EdgeInsets, LayoutError, Rect};

use crate::tree::{ElementId, ElementTree};

/// Inset-adjusted edges of an element's safe area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafeAreaEdge {
    Top,
    Left,
    Bottom,
    Right,
}

/// Geometric attribute of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Left,
    Right,
    Top,
    Bottom,
    CenterX,
    CenterY,
    Width,
    Height,
    SafeArea(SafeAreaEdge),
}

impl Attribute {
    /// Width and height are read from bounds, not converted.
    pub fn is_size(self) -> bool {
        matches!(self, Attribute::Width | Attribute::Height)
    }

    /// Read the attribute off a rectangle. Safe-area edges move inwards by
    /// the matching inset.
    pub(crate) fn value_in(self, rect: Rect, insets: EdgeInsets) -> f64 {
        match self {
            Attribute::Left => rect.min_x(),
            Attribute::Right => rect.max_x(),
            Attribute::Top => rect.min_y(),
            Attribute::Bottom => rect.max_y(),
            Attribute::CenterX => rect.mid_x(),
            Attribute::CenterY => rect.mid_y(),
            Attribute::Width => rect.width,
            Attribute::Height => rect.height,
            Attribute::SafeArea(SafeAreaEdge::Top) => rect.min_y() + insets.top,
            Attribute::SafeArea(SafeAreaEdge::Left) => rect.min_x() + insets.left,
            Attribute::SafeArea(SafeAreaEdge::Bottom) => rect.max_y() - insets.bottom,
            Attribute::SafeArea(SafeAreaEdge::Right) => rect.max_x() - insets.right,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Axis class of a relation. Implemented only by the marker types below.
pub trait Axis: sealed::Sealed + fmt::Debug + Copy + 'static {}

/// Left, right, centerX and the horizontal safe-area edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {}

/// Top, bottom, centerY and the vertical safe-area edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {}

/// Width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {}

impl sealed::Sealed for Horizontal {}
impl sealed::Sealed for Vertical {}
impl sealed::Sealed for Extent {}
impl Axis for Horizontal {}
impl Axis for Vertical {}
impl Axis for Extent {}

/// Reference to an attribute of an element, tagged with its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation<A: Axis> {
    element: ElementId,
    attribute: Attribute,
    axis: PhantomData<fn() -> A>,
}

impl<A: Axis> Relation<A> {
    fn new(element: ElementId, attribute: Attribute) -> Self {
        Self {
            element,
            attribute,
            axis: PhantomData,
        }
    }

    /// Element the relation points at.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Which edge, center or size of the element.
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub(crate) fn anchor(&self) -> Anchor {
        Anchor {
            element: self.element,
            attribute: self.attribute,
        }
    }
}

/// Untyped form of a relation, stored by the Maker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub element: ElementId,
    pub attribute: Attribute,
}

impl ElementTree {
    /// Whichever relation resolves to the smaller value, compared in the
    /// space of the nearest common ancestor of both elements. Ties pick `rhs`.
    ///
    /// Unlike [`Maker::min`](crate::Maker::min) this needs no element under
    /// configuration.
    pub fn min<A: Axis>(&self, lhs: Relation<A>, rhs: Relation<A>) -> Result<Relation<A>, LayoutError> {
        let (l, r) = self.picker_values(lhs.anchor(), rhs.anchor())?;
        Ok(if l < r { lhs } else { rhs })
    }

    /// Whichever relation resolves to the larger value. Ties pick `rhs`.
    pub fn max<A: Axis>(&self, lhs: Relation<A>, rhs: Relation<A>) -> Result<Relation<A>, LayoutError> {
        let (l, r) = self.picker_values(lhs.anchor(), rhs.anchor())?;
        Ok(if l > r { lhs } else { rhs })
    }

    fn picker_values(&self, lhs: Anchor, rhs: Anchor) -> Result<(f64, f64), LayoutError> {
        self.element(lhs.element)?;
        self.element(rhs.element)?;
        let space = self.common_ancestor(lhs.element, rhs.element).ok_or(
            ContractViolation::NoCommonAncestor {
                element: lhs.element.raw(),
                other: rhs.element.raw(),
            },
        )?;
        Ok((self.value_in_space(lhs, space)?, self.value_in_space(rhs, space)?))
    }

    /// Attribute value in the local space of `space`. Sizes come from bounds.
    fn value_in_space(&self, anchor: Anchor, space: ElementId) -> Result<f64, LayoutError> {
        let element = self.element(anchor.element)?;
        if anchor.attribute.is_size() {
            return Ok(anchor.attribute.value_in(element.bounds(), EdgeInsets::ZERO));
        }
        let rect = if anchor.element == space {
            Rect::with_size(element.frame.size())
        } else {
            self.convert_rect(element.frame, element.parent(), space)?
        };
        Ok(anchor.attribute.value_in(rect, self.safe_area_insets(anchor.element)))
    }
}

/// The four edges of an element (or of its safe area).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRelations {
    pub top: Relation<Vertical>,
    pub left: Relation<Horizontal>,
    pub bottom: Relation<Vertical>,
    pub right: Relation<Horizontal>,
}

impl ElementId {
    /// Left edge.
    pub fn left(self) -> Relation<Horizontal> {
        Relation::new(self, Attribute::Left)
    }

    pub fn right(self) -> Relation<Horizontal> {
        Relation::new(self, Attribute::Right)
    }

    pub fn center_x(self) -> Relation<Horizontal> {
        Relation::new(self, Attribute::CenterX)
    }

    pub fn top(self) -> Relation<Vertical> {
        Relation::new(self, Attribute::Top)
    }

    pub fn bottom(self) -> Relation<Vertical> {
        Relation::new(self, Attribute::Bottom)
    }

    pub fn center_y(self) -> Relation<Vertical> {
        Relation::new(self, Attribute::CenterY)
    }

    /// Current width, for size relations and aspect ratios.
    pub fn width(self) -> Relation<Extent> {
        Relation::new(self, Attribute::Width)
    }

    pub fn height(self) -> Relation<Extent> {
        Relation::new(self, Attribute::Height)
    }

    /// Plain edges of the element.
    pub fn edges(self) -> EdgeRelations {
        EdgeRelations {
            top: self.top(),
            left: self.left(),
            bottom: self.bottom(),
            right: self.right(),
        }
    }

    /// Safe-area edges. For layers these resolve like plain edges.
    pub fn safe_area(self) -> EdgeRelations {
        EdgeRelations {
            top: Relation::new(self, Attribute::SafeArea(SafeAreaEdge::Top)),
            left: Relation::new(self, Attribute::SafeArea(SafeAreaEdge::Left)),
            bottom: Relation::new(self, Attribute::SafeArea(SafeAreaEdge::Bottom)),
            right: Relation::new(self, Attribute::SafeArea(SafeAreaEdge::Right)),
        }
    }
}

bitflags! {
    /// Which sides of an [`EdgeInsets`](framekit_core::EdgeInsets) to apply.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Sides: u8 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;

        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const ALL = Self::VERTICAL.bits() | Self::HORIZONTAL.bits();
    }
}

impl Default for Sides {
    fn default() -> Self {
        Sides::ALL
    }
}

/// Extra constraint applied to a container while it wraps its children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContainerRelation {
    /// Fixed width, height follows the children
    Width(f64),
    /// Fixed height, width follows the children
    Height(f64),
    /// Width spans between the parent's edges with these insets
    Horizontal { left: f64, right: f64 },
    /// Height spans between the parent's edges with these insets
    Vertical { top: f64, bottom: f64 },
}
