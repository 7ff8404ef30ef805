//! Declarative frame layout.
//!
//! Elements are positioned by declaring relations between their edges,
//! centers and sizes. There is no constraint solver: each pass evaluates the
//! declarations for one element in a fixed priority order and writes exactly
//! one frame.
//!
//! ```
//! use framekit_layout::{Element, ElementTree, Rect};
//!
//! let mut tree = ElementTree::new();
//! let root = tree.add_root(Element::view().with_frame(Rect::new(0.0, 0.0, 320.0, 480.0)));
//! let header = tree.add_child(root, Element::view()).unwrap();
//! let body = tree.add_child(root, Element::view()).unwrap();
//!
//! tree.configure_frame(header, |maker| {
//!     maker.top(20.0).left(0.0).right(0.0).height(44.0);
//! });
//! tree.configure_frame(body, |maker| {
//!     maker.top_to(header.bottom(), 8.0).left(16.0).right(16.0).bottom(0.0);
//! });
//!
//! assert_eq!(tree.frame(body), Some(Rect::new(16.0, 72.0, 288.0, 408.0)));
//! ```

pub mod configure;
pub mod keyboard;
pub mod maker;
pub mod relation;
pub mod text;
pub mod tree;

pub use configure::LayoutOptions;
pub use framekit_core::{ContractViolation, Diagnostics, Dimension, EdgeInsets, LayoutError, Rect, Size};
pub use keyboard::{KeyboardTracker, LayoutHook};
pub use maker::Maker;
pub use relation::{Attribute, ContainerRelation, EdgeRelations, Extent, Horizontal, Relation, SafeAreaEdge, Sides, Vertical};
pub use text::{measure_text, ContentMeasure, TextContent, TextMetrics, TextStyle};
pub use tree::{Element, ElementId, ElementKind, ElementTree, ViewContent, DEFAULT_STATE};
