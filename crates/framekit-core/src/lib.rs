//! Core value types for the framekit layout engine.
//!
//! This crate provides the types shared by the layout crate and by hosts
//! feeding it:
//! - Geometry (rectangles, sizes, edge insets)
//! - The error and diagnostic taxonomy

pub mod errors;
pub mod geometry;

pub use errors::*;
pub use geometry::*;
