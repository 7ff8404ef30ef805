//! On-screen keyboard tracking.
//!
//! The keyboard is mirrored by a pseudo-element living inside the host
//! window, so relations can target its edges like any other element. The
//! host feeds keyboard frame notifications through
//! [`ElementTree::keyboard_frame_changed`]; subscribed elements are then laid
//! out again.

use std::fmt;
use std::rc::Rc;

use framekit_core::{LayoutError, Rect};
use indexmap::IndexMap;

use crate::relation::EdgeRelations;
use crate::tree::{Element, ElementId, ElementTree};

/// Callback that re-runs the layout of a subscribed element.
pub type LayoutHook = Rc<dyn Fn(&mut ElementTree, ElementId)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyboardAnchor {
    /// The pseudo-element mirroring the keyboard
    element: ElementId,
    window: ElementId,
}

/// Keyboard pseudo-element and its subscribers.
#[derive(Clone, Default)]
pub struct KeyboardTracker {
    anchor: Option<KeyboardAnchor>,
    subscribers: IndexMap<ElementId, LayoutHook>,
}

impl fmt::Debug for KeyboardTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardTracker")
            .field("anchor", &self.anchor)
            .field("subscribers", &self.subscribers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl KeyboardTracker {
    pub(crate) fn window(&self) -> Option<ElementId> {
        self.anchor.map(|anchor| anchor.window)
    }

    pub(crate) fn element(&self) -> Option<ElementId> {
        self.anchor.map(|anchor| anchor.element)
    }

    /// Drop every reference to a removed element.
    pub(crate) fn forget(&mut self, id: ElementId) {
        self.subscribers.shift_remove(&id);
        if self
            .anchor
            .is_some_and(|anchor| anchor.element == id || anchor.window == id)
        {
            self.anchor = None;
        }
    }
}

impl ElementTree {
    /// Attach the keyboard pseudo-element to `window`, resting below its
    /// bottom edge. Calling it again moves the tracker to another window.
    pub fn initialize_keyboard_tracking(&mut self, window: ElementId) -> Result<ElementId, LayoutError> {
        let bounds = self.element(window)?.bounds();

        let element = match self.keyboard.element() {
            Some(element) if self.is_alive(element) => {
                self.insert_child(window, element)?;
                element
            }
            _ => self.add_child(window, Element::view().with_name("keyboard"))?,
        };
        self.keyboard.anchor = Some(KeyboardAnchor { element, window });

        let frame = self.frame(element).unwrap_or_default();
        self.set_frame(element, Rect::new(frame.x, bounds.max_y(), bounds.width, frame.height))?;
        tracing::debug!(window = %window, keyboard = %element, "keyboard tracking initialized");
        Ok(element)
    }

    /// The pseudo-element, once tracking is initialized.
    pub fn keyboard_element(&self) -> Option<ElementId> {
        self.keyboard.element()
    }

    /// Edges of the keyboard as relation sources.
    ///
    /// Tracking starts on the first root element if it was not initialized
    /// explicitly. Returns `None` for an empty tree.
    pub fn keyboard_relations(&mut self) -> Option<EdgeRelations> {
        if self.keyboard.element().is_none() {
            let window = self.roots().first().copied()?;
            if let Err(error) = self.initialize_keyboard_tracking(window) {
                tracing::warn!(%error, "keyboard tracking unavailable");
                return None;
            }
        }
        self.keyboard.element().map(ElementId::edges)
    }

    /// Current keyboard rectangle in window space.
    pub fn keyboard_rect(&self) -> Option<Rect> {
        self.keyboard.element().and_then(|element| self.frame(element))
    }

    /// Whether the keyboard has moved away from the window's bottom edge.
    pub fn is_keyboard_visible(&self) -> bool {
        let Some(anchor) = self.keyboard.anchor else {
            return false;
        };
        match (self.frame(anchor.element), self.bounds(anchor.window)) {
            (Some(keyboard), Some(window)) => keyboard.min_y() != window.max_y(),
            _ => false,
        }
    }

    /// Re-run `hook` for `id` whenever the keyboard frame changes.
    /// Subscribing twice keeps a single entry with the newest hook.
    pub fn listen_for_keyboard_events(&mut self, id: ElementId, hook: LayoutHook) {
        self.keyboard.subscribers.insert(id, hook);
    }

    pub fn stop_listening_for_keyboard_events(&mut self, id: ElementId) {
        self.keyboard.subscribers.shift_remove(&id);
    }

    /// Feed a keyboard frame notification from the host.
    ///
    /// An empty rectangle means the keyboard is hidden and parks the
    /// pseudo-element below the window. Live subscribers inside the window
    /// are laid out again in subscription order.
    pub fn keyboard_frame_changed(&mut self, rect: Rect) -> Result<(), LayoutError> {
        let Some(anchor) = self.keyboard.anchor else {
            tracing::debug!("keyboard notification before tracking was initialized");
            return Ok(());
        };

        let frame = if rect.is_empty() {
            let bounds = self.element(anchor.window)?.bounds();
            Rect::new(bounds.x, bounds.max_y(), bounds.width, bounds.height)
        } else {
            rect
        };
        self.set_frame(anchor.element, frame)?;
        tracing::debug!(?frame, visible = self.is_keyboard_visible(), "keyboard frame changed");

        let hooks: Vec<(ElementId, LayoutHook)> = self
            .keyboard
            .subscribers
            .iter()
            .filter(|(id, _)| **id == anchor.window || self.contains(anchor.window, **id))
            .map(|(id, hook)| (*id, Rc::clone(hook)))
            .collect();

        for (id, hook) in hooks {
            // An earlier hook may have removed it
            if self.is_alive(id) {
                hook(self, id);
            }
        }
        Ok(())
    }

    /// Keep the pseudo-element pinned to the window's bottom edge and as
    /// wide as the window when the window is resized.
    pub(crate) fn track_window_bounds(&mut self, old: Rect, new: Rect) {
        let Some(element) = self.keyboard.element() else {
            return;
        };
        let Some(node) = self.get_mut(element) else {
            return;
        };
        node.frame.width = new.width;
        if node.frame.min_y() == old.max_y() {
            node.frame.y = new.max_y();
        }
    }
}
