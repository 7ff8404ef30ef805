use framekit_core::LayoutError;

use super::{set_rect_value, Handler, Maker, Priority};
use crate::relation::{Anchor, Attribute, Horizontal, Relation, Vertical};
use crate::tree::ElementId;

impl<'t> Maker<'t> {
    /// Center in the parent on both axes.
    pub fn center(&mut self) -> &mut Self {
        match self.parent_for("center") {
            Some(parent) => self.center_to(parent),
            None => self,
        }
    }

    /// Center on another element on both axes.
    pub fn center_to(&mut self, element: ElementId) -> &mut Self {
        self.center_x_to(element.center_x(), 0.0)
            .center_y_to(element.center_y(), 0.0)
    }

    /// Place the center on a circle of `radius` around the center of
    /// `element`, at `angle` radians.
    pub fn center_around(&mut self, element: ElementId, radius: f64, angle: f64) -> &mut Self {
        let offset_x = -radius * (-angle).cos();
        let offset_y = radius * (-angle).sin();
        self.center_x_to(element.center_x(), offset_x)
            .center_y_to(element.center_y(), offset_y)
    }

    /// Horizontal center of the parent, moved left by `offset`.
    pub fn center_x(&mut self, offset: f64) -> &mut Self {
        match self.parent_for("centerX") {
            Some(parent) => self.center_x_to(parent.center_x(), offset),
            None => self,
        }
    }

    /// Vertical center of the parent, moved up by `offset`.
    pub fn center_y(&mut self, offset: f64) -> &mut Self {
        match self.parent_for("centerY") {
            Some(parent) => self.center_y_to(parent.center_y(), offset),
            None => self,
        }
    }

    /// Center horizontally on a horizontal attribute of another element,
    /// shifted by `offset`.
    pub fn center_x_to(&mut self, relation: Relation<Horizontal>, offset: f64) -> &mut Self {
        if !self.relatable(relation.element()) {
            return self;
        }
        let anchor = relation.anchor();
        self.push(Priority::Low, Handler::CenterX { anchor, offset })
    }

    /// Center vertically on a vertical attribute of another element.
    pub fn center_y_to(&mut self, relation: Relation<Vertical>, offset: f64) -> &mut Self {
        if !self.relatable(relation.element()) {
            return self;
        }
        let anchor = relation.anchor();
        self.push(Priority::Low, Handler::CenterY { anchor, offset })
    }

    /// Center horizontally halfway between two relations, in either order.
    pub fn center_x_between(&mut self, first: Relation<Horizontal>, second: Relation<Horizontal>) -> &mut Self {
        if !self.relatable(first.element()) || !self.relatable(second.element()) {
            return self;
        }
        self.push(
            Priority::Low,
            Handler::CenterXBetween(first.anchor(), second.anchor()),
        )
    }

    /// Center vertically halfway between two relations, in either order.
    pub fn center_y_between(&mut self, first: Relation<Vertical>, second: Relation<Vertical>) -> &mut Self {
        if !self.relatable(first.element()) || !self.relatable(second.element()) {
            return self;
        }
        self.push(
            Priority::Low,
            Handler::CenterYBetween(first.anchor(), second.anchor()),
        )
    }

    /// Center horizontally in the gap between two elements.
    ///
    /// The element whose center lies further left is treated as the leading
    /// one, so the argument order does not matter.
    pub fn center_x_between_elements(&mut self, first: ElementId, second: ElementId) -> &mut Self {
        if !self.relatable(first) || !self.relatable(second) {
            return self;
        }
        self.push(Priority::Low, Handler::CenterXBetweenElements(first, second))
    }

    /// Center vertically in the gap between two elements.
    pub fn center_y_between_elements(&mut self, first: ElementId, second: ElementId) -> &mut Self {
        if !self.relatable(first) || !self.relatable(second) {
            return self;
        }
        self.push(Priority::Low, Handler::CenterYBetweenElements(first, second))
    }

    /// Place the horizontal center at an absolute position.
    pub fn set_center_x(&mut self, value: f64) -> &mut Self {
        self.push(
            Priority::Low,
            Handler::Value {
                attribute: Attribute::CenterX,
                value,
            },
        )
    }

    /// Place the vertical center at an absolute position.
    pub fn set_center_y(&mut self, value: f64) -> &mut Self {
        self.push(
            Priority::Low,
            Handler::Value {
                attribute: Attribute::CenterY,
                value,
            },
        )
    }

    pub(super) fn apply_center(&mut self, handler: Handler) -> Result<(), LayoutError> {
        let (attribute, center) = match handler {
            Handler::CenterX { anchor, offset } => (Attribute::CenterX, self.converted_value(anchor)? - offset),
            Handler::CenterY { anchor, offset } => (Attribute::CenterY, self.converted_value(anchor)? - offset),
            Handler::CenterXBetween(first, second) => (
                Attribute::CenterX,
                midpoint(self.converted_value(first)?, self.converted_value(second)?),
            ),
            Handler::CenterYBetween(first, second) => (
                Attribute::CenterY,
                midpoint(self.converted_value(first)?, self.converted_value(second)?),
            ),
            Handler::CenterXBetweenElements(first, second) => {
                let (leading, trailing) = self.ordered(first, second, Attribute::CenterX)?;
                (
                    Attribute::CenterX,
                    midpoint(
                        self.converted_value(leading.right().anchor())?,
                        self.converted_value(trailing.left().anchor())?,
                    ),
                )
            }
            Handler::CenterYBetweenElements(first, second) => {
                let (leading, trailing) = self.ordered(first, second, Attribute::CenterY)?;
                (
                    Attribute::CenterY,
                    midpoint(
                        self.converted_value(leading.bottom().anchor())?,
                        self.converted_value(trailing.top().anchor())?,
                    ),
                )
            }
            _ => return Ok(()),
        };
        set_rect_value(&mut self.pending, attribute, center);
        Ok(())
    }

    /// Order two elements by their converted centers on one axis.
    fn ordered(
        &self,
        first: ElementId,
        second: ElementId,
        center: Attribute,
    ) -> Result<(ElementId, ElementId), LayoutError> {
        let first_center = self.converted_value(Anchor { element: first, attribute: center })?;
        let second_center = self.converted_value(Anchor { element: second, attribute: center })?;
        Ok(if first_center <= second_center {
            (first, second)
        } else {
            (second, first)
        })
    }
}

fn midpoint(a: f64, b: f64) -> f64 {
    a.min(b) + (a - b).abs() / 2.0
}
