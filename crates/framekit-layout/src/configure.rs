//! Entry points for running layout passes.

use framekit_core::{Diagnostics, LayoutError, Rect};

use crate::maker::Maker;
use crate::relation::ContainerRelation;
use crate::tree::{Element, ElementId, ElementTree, DEFAULT_STATE};

/// Layout configuration options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Panic on contract violations instead of recording them
    pub strict_contracts: bool,
}

impl LayoutOptions {
    /// Options that turn contract violations into panics, for tests and
    /// development builds.
    pub fn strict() -> Self {
        Self {
            strict_contracts: true,
        }
    }
}

impl ElementTree {
    /// Run one layout pass for an element in its default state.
    ///
    /// The installer declares relations on the [`Maker`]; the resolved frame
    /// is written back once it returns. Elements switched to another named
    /// state are left untouched.
    pub fn configure_frame<F>(&mut self, id: ElementId, installer: F) -> Diagnostics
    where
        F: FnOnce(&mut Maker<'_>),
    {
        self.configure_frame_for_state(id, DEFAULT_STATE, installer)
    }

    /// Run one layout pass only if the element is currently in `state`.
    pub fn configure_frame_for_state<F>(&mut self, id: ElementId, state: &str, installer: F) -> Diagnostics
    where
        F: FnOnce(&mut Maker<'_>),
    {
        if !self.is_alive(id) {
            return unknown_element(id);
        }
        if self.state(id) != state {
            tracing::trace!(element = %id, state, current = self.state(id), "state differs; pass skipped");
            return Diagnostics::new();
        }
        self.run_maker(id, installer)
    }

    /// Run a layout pass for every listed state the element is in.
    pub fn configure_frame_for_states<F>(&mut self, id: ElementId, states: &[&str], mut installer: F) -> Diagnostics
    where
        F: FnMut(&mut Maker<'_>),
    {
        let mut diagnostics = Diagnostics::new();
        for state in states {
            diagnostics.extend(self.configure_frame_for_state(id, state, &mut installer));
        }
        diagnostics
    }

    /// Apply the same declarations to several elements.
    pub fn configure_frames<F>(&mut self, ids: &[ElementId], mut installer: F) -> Diagnostics
    where
        F: FnMut(&mut Maker<'_>),
    {
        let mut diagnostics = Diagnostics::new();
        for id in ids {
            diagnostics.extend(self.configure_frame(*id, &mut installer));
        }
        diagnostics
    }

    fn run_maker<F>(&mut self, id: ElementId, installer: F) -> Diagnostics
    where
        F: FnOnce(&mut Maker<'_>),
    {
        let Some(frame) = self.frame(id) else {
            return unknown_element(id);
        };
        let mut maker = Maker::new(self, id, frame);
        installer(&mut maker);
        maker.commit()
    }

    /// Move `children` into `container` and size the container around them.
    ///
    /// The installer lays out the children (and usually the container
    /// itself). It runs once before the container is wrapped and once after,
    /// so relations to the container see its final size. A
    /// [`ContainerRelation`] fixes one axis for both runs.
    pub fn configure_container<F>(
        &mut self,
        children: &[ElementId],
        container: ElementId,
        relation: Option<ContainerRelation>,
        mut installer: F,
    ) -> Diagnostics
    where
        F: FnMut(&mut ElementTree),
    {
        let mut diagnostics = Diagnostics::new();
        if let Err(error) = self.set_frame(container, Rect::ZERO) {
            diagnostics.push(error);
            return diagnostics;
        }

        let mut pinned_width = None;
        let mut pinned_height = None;
        match relation {
            Some(ContainerRelation::Width(width)) => pinned_width = Some(width),
            Some(ContainerRelation::Height(height)) => pinned_height = Some(height),
            Some(ContainerRelation::Horizontal { left, right }) => {
                diagnostics.extend(self.configure_frame(container, |maker| {
                    maker.left(left).right(right);
                }));
                pinned_width = self.frame(container).map(|frame| frame.width);
            }
            Some(ContainerRelation::Vertical { top, bottom }) => {
                diagnostics.extend(self.configure_frame(container, |maker| {
                    maker.top(top).bottom(bottom);
                }));
                pinned_height = self.frame(container).map(|frame| frame.height);
            }
            None => {}
        }
        let pinned = Rect::new(0.0, 0.0, pinned_width.unwrap_or(0.0), pinned_height.unwrap_or(0.0));
        if let Err(error) = self.set_frame(container, pinned) {
            diagnostics.push(error);
        }

        for child in children {
            if self.parent(*child) != Some(container) {
                if let Err(error) = self.insert_child(container, *child) {
                    diagnostics.push(error);
                }
            }
        }

        installer(self);
        diagnostics.extend(self.configure_frame(container, |maker| {
            maker.container();
        }));

        if let Some(mut frame) = self.frame(container) {
            frame.width = pinned_width.unwrap_or(frame.width);
            frame.height = pinned_height.unwrap_or(frame.height);
            if let Err(error) = self.set_frame(container, frame) {
                diagnostics.push(error);
            }
        }

        installer(self);
        tracing::debug!(container = %container, children = children.len(), frame = ?self.frame(container), "container configured");
        diagnostics
    }

    /// Wrap `children` in a container placed inside `parent`.
    ///
    /// A container created by an earlier call (the first child's current
    /// parent, when that is not `parent` itself) is reused; otherwise a new
    /// element of the same kind as `parent` is added.
    pub fn container_in<F>(
        &mut self,
        children: &[ElementId],
        parent: ElementId,
        relation: Option<ContainerRelation>,
        installer: F,
    ) -> Result<(ElementId, Diagnostics), LayoutError>
    where
        F: FnMut(&mut ElementTree),
    {
        let reusable = children
            .first()
            .and_then(|child| self.parent(*child))
            .filter(|current| *current != parent);

        let container = match reusable {
            Some(container) => {
                self.insert_child(parent, container)?;
                container
            }
            None => {
                let element = if self.element(parent)?.is_view() {
                    Element::view()
                } else {
                    Element::layer()
                };
                self.add_child(parent, element.with_name("container"))?
            }
        };

        let diagnostics = self.configure_container(children, container, relation, installer);
        Ok((container, diagnostics))
    }
}

fn unknown_element(id: ElementId) -> Diagnostics {
    let error = LayoutError::UnknownElement { element: id.raw() };
    tracing::warn!(element = %id, %error, "layout pass skipped");
    let mut diagnostics = Diagnostics::new();
    diagnostics.push(error);
    diagnostics
}
