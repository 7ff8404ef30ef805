//! Error and diagnostic types for the framekit engine.
//!
//! A layout pass never fails as a whole. Problems with individual relations
//! are collected as [`LayoutError`] values in a [`Diagnostics`] list while the
//! rest of the pass keeps evaluating.

use std::fmt;

use thiserror::Error;

/// Which dimension a size computation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    Width,
    Height,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Width => f.write_str("width"),
            Dimension::Height => f.write_str("height"),
        }
    }
}

/// Errors reported while building or evaluating relations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Contract(#[from] ContractViolation),

    #[error("Element {element} cannot measure its content")]
    MeasurementUnavailable { element: u64 },

    #[error("No source for the {dimension} of element {element}: declare a constant size, an aspect relation or both opposite edges")]
    AmbiguousAspectSource { element: u64, dimension: Dimension },

    #[error("Unknown element {element}")]
    UnknownElement { element: u64 },
}

/// Declarations the caller was not allowed to make.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("Cannot configure a {relation} relation for element {element} without a parent")]
    MissingParent { element: u64, relation: &'static str },

    #[error("Elements {element} and {other} do not share a common ancestor")]
    NoCommonAncestor { element: u64, other: u64 },

    #[error("Element {ancestor} cannot become a child of its descendant {element}")]
    CyclicHierarchy { element: u64, ancestor: u64 },
}

/// Problems recorded during one or more layout passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    errors: Vec<LayoutError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: LayoutError) {
        self.errors.push(error);
    }

    /// Append every diagnostic from another pass.
    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
    }

    /// True when nothing went wrong.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutError> {
        self.errors.iter()
    }

    pub fn has_contract_violation(&self) -> bool {
        self.errors
            .iter()
            .any(|error| matches!(error, LayoutError::Contract(_)))
    }
}

impl IntoIterator for Diagnostics {
    type Item = LayoutError;
    type IntoIter = std::vec::IntoIter<LayoutError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violation_message() {
        let error: LayoutError = ContractViolation::MissingParent {
            element: 3,
            relation: "left",
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Cannot configure a left relation for element 3 without a parent"
        );
    }

    #[test]
    fn test_diagnostics_collects() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_clean());

        diagnostics.push(LayoutError::MeasurementUnavailable { element: 1 });
        assert!(!diagnostics.has_contract_violation());

        let mut other = Diagnostics::new();
        other.push(ContractViolation::NoCommonAncestor { element: 1, other: 2 }.into());
        diagnostics.extend(other);

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.has_contract_violation());
    }
}
