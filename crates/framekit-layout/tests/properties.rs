//! Property tests for the evaluation rules.

use framekit_layout::{EdgeInsets, Element, ElementId, ElementTree, Rect};
use proptest::prelude::*;

fn parent_and_child(width: f64, height: f64) -> (ElementTree, ElementId, ElementId) {
    let mut tree = ElementTree::new();
    let parent = tree.add_root(Element::view().with_frame(Rect::new(0.0, 0.0, width, height)));
    let child = tree
        .add_child(parent, Element::view().with_frame(Rect::new(3.0, 4.0, 20.0, 10.0)))
        .unwrap();
    (tree, parent, child)
}

proptest! {
    #[test]
    fn left_inset_is_origin(inset in -200i32..200) {
        let (mut tree, _, child) = parent_and_child(400.0, 400.0);
        tree.configure_frame(child, |maker| {
            maker.left(inset as f64);
        });
        prop_assert_eq!(tree.frame(child).unwrap().x, inset as f64);
    }

    #[test]
    fn declaration_order_of_opposite_edges_is_irrelevant(
        left in 0i32..150,
        right in 0i32..150,
        top in 0i32..150,
        bottom in 0i32..150,
    ) {
        let (left, right, top, bottom) = (left as f64, right as f64, top as f64, bottom as f64);
        let (mut tree, _, child) = parent_and_child(400.0, 300.0);

        tree.configure_frame(child, |maker| {
            maker.left(left).right(right).top(top).bottom(bottom);
        });
        let forward = tree.frame(child).unwrap();

        tree.configure_frame(child, |maker| {
            maker.bottom(bottom).top(top).right(right).left(left);
        });
        let backward = tree.frame(child).unwrap();

        prop_assert_eq!(forward, backward);
        prop_assert_eq!(forward, Rect::new(left, top, 400.0 - left - right, 300.0 - top - bottom));
    }

    #[test]
    fn repeated_passes_are_stable(
        inset in 0i32..100,
        width in 1i32..100,
        offset in -50i32..50,
    ) {
        let (mut tree, _, child) = parent_and_child(400.0, 400.0);
        let install = |tree: &mut ElementTree| {
            tree.configure_frame(child, |maker| {
                maker.right(inset as f64).width(width as f64).center_y(offset as f64);
            });
            tree.frame(child).unwrap()
        };

        let first = install(&mut tree);
        let second = install(&mut tree);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn equal_to_sibling_copies_its_frame(
        x in -100i32..100,
        y in -100i32..100,
        width in 0i32..200,
        height in 0i32..200,
    ) {
        let (mut tree, parent, child) = parent_and_child(400.0, 400.0);
        let frame = Rect::new(x as f64, y as f64, width as f64, height as f64);
        let sibling = tree
            .add_child(parent, Element::view().with_frame(frame))
            .unwrap();

        tree.configure_frame(child, |maker| {
            maker.equal_to(sibling, EdgeInsets::ZERO);
        });
        prop_assert_eq!(tree.frame(child).unwrap(), frame);
    }

    #[test]
    fn wider_labels_are_never_taller(narrow in 40i32..200, extra in 0i32..200, words in 1usize..30) {
        let text = vec!["layout"; words].join(" ");
        let mut tree = ElementTree::new();
        let root = tree.add_root(Element::view().with_frame(Rect::new(0.0, 0.0, 1000.0, 1000.0)));
        let label = tree.add_child(root, Element::view().with_text(text)).unwrap();

        let mut height_at = |width: f64| {
            tree.configure_frame(label, |maker| {
                maker.width(width).height_to_fit();
            });
            tree.frame(label).unwrap().height
        };

        let narrow_height = height_at(narrow as f64);
        let wide_height = height_at((narrow + extra) as f64);
        prop_assert!(wide_height <= narrow_height);
    }

    #[test]
    fn min_and_max_pick_the_extreme_edge(a in 0i32..300, b in 0i32..300) {
        let (mut tree, parent, child) = parent_and_child(400.0, 400.0);
        let first = tree
            .add_child(parent, Element::view().with_frame(Rect::new(a as f64, 0.0, 10.0, 10.0)))
            .unwrap();
        let second = tree
            .add_child(parent, Element::view().with_frame(Rect::new(b as f64, 0.0, 10.0, 10.0)))
            .unwrap();

        tree.configure_frame(child, |maker| {
            let edge = maker.min(first.left(), second.left());
            maker.left_to(edge, 0.0);
        });
        prop_assert_eq!(tree.frame(child).unwrap().x, a.min(b) as f64);

        tree.configure_frame(child, |maker| {
            let edge = maker.max(first.left(), second.left());
            maker.left_to(edge, 0.0);
        });
        prop_assert_eq!(tree.frame(child).unwrap().x, a.max(b) as f64);
    }
}
