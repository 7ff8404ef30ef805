//! Shared element tree used by the integration tests.

#![allow(dead_code)]

use framekit_layout::{Element, ElementId, ElementTree, Rect};

pub struct Fixture {
    pub tree: ElementTree,
    /// 500x500 root
    pub main: ElementId,
    /// (100, 100, 300, 300) inside `main`
    pub nested1: ElementId,
    /// (50, 50, 200, 200) inside `nested1`, so (150, 150, 200, 200) in `main`
    pub nested2: ElementId,
    /// 50x50 at the origin of `main`
    pub testing: ElementId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut tree = ElementTree::new();
        let main = tree.add_root(
            Element::view()
                .with_name("main")
                .with_frame(Rect::new(0.0, 0.0, 500.0, 500.0)),
        );
        let nested1 = tree
            .add_child(
                main,
                Element::view()
                    .with_name("nested1")
                    .with_frame(Rect::new(100.0, 100.0, 300.0, 300.0)),
            )
            .unwrap();
        let nested2 = tree
            .add_child(
                nested1,
                Element::view()
                    .with_name("nested2")
                    .with_frame(Rect::new(50.0, 50.0, 200.0, 200.0)),
            )
            .unwrap();
        let testing = tree
            .add_child(
                main,
                Element::view()
                    .with_name("testing")
                    .with_frame(Rect::new(0.0, 0.0, 50.0, 50.0)),
            )
            .unwrap();

        Self {
            tree,
            main,
            nested1,
            nested2,
            testing,
        }
    }

    pub fn testing_frame(&self) -> Rect {
        self.tree.frame(self.testing).unwrap()
    }
}

/// Compare two rectangles with a small tolerance.
pub fn assert_rect_eq(actual: Rect, expected: Rect) {
    let close = |a: f64, b: f64| (a - b).abs() < 0.001;
    assert!(
        close(actual.x, expected.x)
            && close(actual.y, expected.y)
            && close(actual.width, expected.width)
            && close(actual.height, expected.height),
        "expected {expected:?}, got {actual:?}"
    );
}
