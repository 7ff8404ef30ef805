use framekit_core::{EdgeInsets, LayoutError};

use super::{set_rect_value, Handler, Maker, Priority, SideParameter};
use crate::relation::{Attribute, Horizontal, Relation, Sides, Vertical};
use crate::tree::ElementId;

impl<'t> Maker<'t> {
    /// Pin the left edge to the parent's left edge.
    pub fn left(&mut self, inset: f64) -> &mut Self {
        match self.parent_for("left") {
            Some(parent) => self.left_to(parent.left(), inset),
            None => self,
        }
    }

    /// Pin the left edge to a horizontal attribute of another element.
    pub fn left_to(&mut self, relation: Relation<Horizontal>, inset: f64) -> &mut Self {
        if !self.relatable(relation.element()) {
            return self;
        }
        let anchor = relation.anchor();
        self.params.left = Some(SideParameter { anchor, value: inset });
        self.push(Priority::High, Handler::Left { anchor, inset })
    }

    /// Pin the top edge to the parent's top edge.
    pub fn top(&mut self, inset: f64) -> &mut Self {
        match self.parent_for("top") {
            Some(parent) => self.top_to(parent.top(), inset),
            None => self,
        }
    }

    /// Pin the top edge to a vertical attribute of another element.
    pub fn top_to(&mut self, relation: Relation<Vertical>, inset: f64) -> &mut Self {
        if !self.relatable(relation.element()) {
            return self;
        }
        let anchor = relation.anchor();
        self.params.top = Some(SideParameter { anchor, value: inset });
        self.push(Priority::High, Handler::Top { anchor, inset })
    }

    /// Pin the right edge to the parent's right edge.
    pub fn right(&mut self, inset: f64) -> &mut Self {
        match self.parent_for("right") {
            Some(parent) => self.right_to(parent.right(), inset),
            None => self,
        }
    }

    /// Pin the right edge. Together with a left relation this sets the width
    /// instead of moving the element.
    pub fn right_to(&mut self, relation: Relation<Horizontal>, inset: f64) -> &mut Self {
        if !self.relatable(relation.element()) {
            return self;
        }
        let anchor = relation.anchor();
        self.params.right = Some(SideParameter { anchor, value: inset });
        self.push(Priority::Middle, Handler::Right { anchor, inset })
    }

    /// Pin the bottom edge to the parent's bottom edge.
    pub fn bottom(&mut self, inset: f64) -> &mut Self {
        match self.parent_for("bottom") {
            Some(parent) => self.bottom_to(parent.bottom(), inset),
            None => self,
        }
    }

    /// Pin the bottom edge. Together with a top relation this sets the
    /// height instead of moving the element.
    pub fn bottom_to(&mut self, relation: Relation<Vertical>, inset: f64) -> &mut Self {
        if !self.relatable(relation.element()) {
            return self;
        }
        let anchor = relation.anchor();
        self.params.bottom = Some(SideParameter { anchor, value: inset });
        self.push(Priority::Middle, Handler::Bottom { anchor, inset })
    }

    /// Pin any subset of edges to the parent.
    pub fn edges(
        &mut self,
        top: Option<f64>,
        left: Option<f64>,
        bottom: Option<f64>,
        right: Option<f64>,
    ) -> &mut Self {
        if let Some(inset) = top {
            self.top(inset);
        }
        if let Some(inset) = left {
            self.left(inset);
        }
        if let Some(inset) = bottom {
            self.bottom(inset);
        }
        if let Some(inset) = right {
            self.right(inset);
        }
        self
    }

    /// Pin the selected sides to the parent with the matching insets.
    pub fn edge_insets(&mut self, insets: EdgeInsets, sides: Sides) -> &mut Self {
        self.edges(
            sides.contains(Sides::TOP).then_some(insets.top),
            sides.contains(Sides::LEFT).then_some(insets.left),
            sides.contains(Sides::BOTTOM).then_some(insets.bottom),
            sides.contains(Sides::RIGHT).then_some(insets.right),
        )
    }

    /// Same inset on all four sides of the parent.
    pub fn margin(&mut self, inset: f64) -> &mut Self {
        self.edge_insets(EdgeInsets::uniform(inset), Sides::ALL)
    }

    /// Match the four edges of another element.
    pub fn equal_to(&mut self, element: ElementId, insets: EdgeInsets) -> &mut Self {
        let edges = element.edges();
        self.top_to(edges.top, insets.top)
            .left_to(edges.left, insets.left)
            .bottom_to(edges.bottom, insets.bottom)
            .right_to(edges.right, insets.right)
    }

    pub(super) fn apply_edge(&mut self, handler: Handler) -> Result<(), LayoutError> {
        match handler {
            Handler::Left { anchor, inset } => {
                let x = self.converted_value(anchor)? + inset;
                set_rect_value(&mut self.pending, Attribute::Left, x);
            }
            Handler::Top { anchor, inset } => {
                let y = self.converted_value(anchor)? + inset;
                set_rect_value(&mut self.pending, Attribute::Top, y);
            }
            Handler::Right { anchor, inset } => {
                let edge = self.converted_value(anchor)?;
                if self.params.left.is_some() {
                    let width = (self.pending.min_x() - edge).abs() - inset;
                    set_rect_value(&mut self.pending, Attribute::Width, width);
                } else {
                    let x = edge - inset - self.pending.width;
                    set_rect_value(&mut self.pending, Attribute::Left, x);
                }
            }
            Handler::Bottom { anchor, inset } => {
                let edge = self.converted_value(anchor)?;
                if self.params.top.is_some() {
                    let height = (self.pending.min_y() - edge).abs() - inset;
                    set_rect_value(&mut self.pending, Attribute::Height, height);
                } else {
                    let y = edge - inset - self.pending.height;
                    set_rect_value(&mut self.pending, Attribute::Top, y);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Distance between a declared pair of opposite edges, if both exist.
    pub(super) fn edge_pair_extent(
        &self,
        leading: Option<SideParameter>,
        trailing: Option<SideParameter>,
    ) -> Result<Option<f64>, LayoutError> {
        let (Some(leading), Some(trailing)) = (leading, trailing) else {
            return Ok(None);
        };
        let start = self.converted_value(leading.anchor)? + leading.value;
        let end = self.converted_value(trailing.anchor)? - trailing.value;
        Ok(Some(end - start))
    }
}

#[cfg(test)]
mod tests {
    use framekit_core::{ContractViolation, EdgeInsets, LayoutError, Rect};

    use crate::relation::Sides;
    use crate::tree::{Element, ElementTree};

    #[test]
    fn test_right_without_left_moves() {
        let mut tree = ElementTree::new();
        let root = tree.add_root(Element::view().with_frame(Rect::new(0.0, 0.0, 300.0, 300.0)));
        let child = tree
            .add_child(root, Element::view().with_frame(Rect::new(0.0, 0.0, 40.0, 40.0)))
            .unwrap();

        tree.configure_frame(child, |maker| {
            maker.right(10.0).bottom(20.0);
        });
        assert_eq!(tree.frame(child).unwrap(), Rect::new(250.0, 240.0, 40.0, 40.0));
    }

    #[test]
    fn test_vertical_sides_only() {
        let mut tree = ElementTree::new();
        let root = tree.add_root(Element::view().with_frame(Rect::new(0.0, 0.0, 300.0, 300.0)));
        let child = tree
            .add_child(root, Element::view().with_frame(Rect::new(7.0, 0.0, 40.0, 40.0)))
            .unwrap();

        tree.configure_frame(child, |maker| {
            maker.edge_insets(EdgeInsets::uniform(10.0), Sides::VERTICAL);
        });
        assert_eq!(tree.frame(child).unwrap(), Rect::new(7.0, 10.0, 40.0, 280.0));
    }

    #[test]
    fn test_root_edge_is_a_contract_violation() {
        let mut tree = ElementTree::new();
        let root = tree.add_root(Element::view().with_frame(Rect::new(5.0, 5.0, 10.0, 10.0)));

        let diagnostics = tree.configure_frame(root, |maker| {
            maker.left(0.0).width(30.0);
        });

        assert_eq!(
            diagnostics.iter().next(),
            Some(&LayoutError::Contract(ContractViolation::MissingParent {
                element: root.raw(),
                relation: "left",
            }))
        );
        assert_eq!(tree.frame(root).unwrap(), Rect::new(5.0, 5.0, 30.0, 10.0));
    }
}
