use framekit_core::{Dimension, LayoutError, Size};

use super::{fit_constraint, set_rect_value, Handler, Maker, Priority, SideParameter};
use crate::relation::{Anchor, Attribute, Extent, Relation};

impl<'t> Maker<'t> {
    /// Constant width.
    pub fn width(&mut self, width: f64) -> &mut Self {
        self.set_value(Attribute::Width, width)
    }

    /// Constant height.
    pub fn height(&mut self, height: f64) -> &mut Self {
        self.set_value(Attribute::Height, height)
    }

    /// Constant width and height.
    pub fn size(&mut self, width: f64, height: f64) -> &mut Self {
        self.width(width).height(height)
    }

    /// Constant size taken from a [`Size`].
    pub fn size_of(&mut self, size: Size) -> &mut Self {
        self.size(size.width, size.height)
    }

    /// Width as a multiple of a size of another element.
    ///
    /// Relating to the element's own size is an aspect ratio: the height is
    /// taken from a constant height, then a height relation, then the
    /// top/bottom pair.
    pub fn width_to(&mut self, relation: Relation<Extent>, multiplier: f64) -> &mut Self {
        if !self.relatable(relation.element()) {
            return self;
        }
        let anchor = relation.anchor();
        self.params.width_to = Some(SideParameter { anchor, value: multiplier });
        self.push(Priority::High, Handler::WidthTo { anchor, multiplier })
    }

    /// Height as a multiple of a size of another element. See [`Maker::width_to`].
    pub fn height_to(&mut self, relation: Relation<Extent>, multiplier: f64) -> &mut Self {
        if !self.relatable(relation.element()) {
            return self;
        }
        let anchor = relation.anchor();
        self.params.height_to = Some(SideParameter { anchor, value: multiplier });
        self.push(Priority::High, Handler::HeightTo { anchor, multiplier })
    }

    /// Resize the element to its natural content size.
    pub fn size_to_fit(&mut self) -> &mut Self {
        let size = match self.tree.size_to_fit(self.element) {
            Ok(size) => size,
            Err(error) => {
                self.report(error);
                Size::ZERO
            }
        };
        self.size_of(size)
    }

    /// Content size within `constraint`, never exceeding it.
    pub fn size_that_fits(&mut self, constraint: Size) -> &mut Self {
        let fit = match self.tree.size_that_fits(self.element, constraint) {
            Ok(size) => size,
            Err(error) => {
                self.report(error);
                Size::ZERO
            }
        };
        self.size(constraint.width.min(fit.width), constraint.height.min(fit.height))
    }

    /// Content height at the declared width, also resizing the bounds.
    pub fn height_to_fit(&mut self) -> &mut Self {
        self.push(
            Priority::High,
            Handler::HeightThatFits {
                max: f64::MAX,
                resize: true,
            },
        )
    }

    /// Content width at the declared height, also resizing the bounds.
    pub fn width_to_fit(&mut self) -> &mut Self {
        self.push(
            Priority::High,
            Handler::WidthThatFits {
                max: f64::MAX,
                resize: true,
            },
        )
    }

    /// Content height at the declared width, capped at `max`.
    ///
    /// The width comes from a constant width, a width relation or the
    /// left/right pair; without any of them the content is unbounded.
    pub fn height_that_fits(&mut self, max: f64) -> &mut Self {
        self.push(Priority::High, Handler::HeightThatFits { max, resize: false })
    }

    /// Content width at the declared height, capped at `max`.
    pub fn width_that_fits(&mut self, max: f64) -> &mut Self {
        self.push(Priority::High, Handler::WidthThatFits { max, resize: false })
    }

    pub(super) fn apply_aspect(
        &mut self,
        dimension: Dimension,
        anchor: Anchor,
        multiplier: f64,
    ) -> Result<(), LayoutError> {
        let target = match dimension {
            Dimension::Width => Attribute::Width,
            Dimension::Height => Attribute::Height,
        };

        if anchor.element != self.element {
            let value = self.relation_size(anchor)? * multiplier;
            set_rect_value(&mut self.pending, target, value);
            return Ok(());
        }

        let value = match self.opposite_extent(dimension)? {
            Some(extent) => extent * multiplier,
            None => {
                return Err(LayoutError::AmbiguousAspectSource {
                    element: self.element.raw(),
                    dimension,
                })
            }
        };
        set_rect_value(&mut self.pending, target, value);
        Ok(())
    }

    /// Extent declared on the axis opposite to `dimension`.
    fn opposite_extent(&self, dimension: Dimension) -> Result<Option<f64>, LayoutError> {
        let (constant, related, leading, trailing) = match dimension {
            Dimension::Width => (
                self.params.height,
                self.params.height_to,
                self.params.top,
                self.params.bottom,
            ),
            Dimension::Height => (
                self.params.width,
                self.params.width_to,
                self.params.left,
                self.params.right,
            ),
        };

        if let Some(value) = constant {
            return Ok(Some(value));
        }
        if let Some(parameter) = related {
            return Ok(Some(self.relation_size(parameter.anchor)? * parameter.value));
        }
        self.edge_pair_extent(leading, trailing)
    }

    pub(super) fn apply_fit(&mut self, dimension: Dimension, max: f64, resize: bool) -> Result<(), LayoutError> {
        let fixed = self.opposite_extent(dimension)?;
        let constraint = fit_constraint(dimension, fixed.unwrap_or(f64::MAX));

        let fit = match self.tree.size_that_fits(self.element, constraint) {
            Ok(size) => size,
            Err(error) => {
                self.report(error);
                Size::ZERO
            }
        };

        let (attribute, value) = match dimension {
            Dimension::Width => (Attribute::Width, max.min(fit.width)),
            Dimension::Height => (Attribute::Height, max.min(fit.height)),
        };
        set_rect_value(&mut self.pending, attribute, value);

        if resize {
            let mut bounds = self.tree.element(self.element)?.bounds().size();
            match dimension {
                Dimension::Width => bounds.width = value,
                Dimension::Height => bounds.height = value,
            }
            self.tree.set_bounds_size(self.element, bounds)?;
        }
        Ok(())
    }
}
