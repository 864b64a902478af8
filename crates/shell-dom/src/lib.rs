//! Document contract for the app shell controllers.
//!
//! The controllers never hold element references across events; they resolve
//! selectors against a [`Dom`] every time, and every operation over an empty
//! selection is a no-op. [`MemoryDom`] is a deterministic in-memory document
//! used by headless hosts and tests.

pub mod fixture;
pub mod memory;
pub mod selector;

pub use fixture::{DocumentFixture, FixtureError, NodeSpec, WindowMetrics};
pub use memory::{MemoryDom, MemoryElement};
pub use selector::SelectorList;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to an element of a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Live document operations the controllers depend on.
///
/// Selections are possibly empty and always in document order. Measurements
/// are in CSS pixels.
pub trait Dom {
    /// All attached elements matching `selector`.
    fn select(&self, selector: &str) -> Vec<ElementId>;

    /// Attached descendants of `root` matching `selector`.
    fn select_within(&self, root: ElementId, selector: &str) -> Vec<ElementId>;

    /// Whether `element` matches `selector`.
    fn matches(&self, element: ElementId, selector: &str) -> bool;

    fn parent(&self, element: ElementId) -> Option<ElementId>;

    fn has_class(&self, element: ElementId, class: &str) -> bool;
    fn add_class(&mut self, element: ElementId, class: &str);
    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Inline style value, if set.
    fn style(&self, element: ElementId, property: &str) -> Option<String>;
    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Detach `element` (and its subtree) from the document.
    fn remove(&mut self, element: ElementId);

    /// Whether an image element finished loading (successfully or not).
    fn image_complete(&self, element: ElementId) -> bool;

    fn measure_height(&self, element: ElementId) -> f64;
    fn measure_width(&self, element: ElementId) -> f64;

    fn window_height(&self) -> f64;
    fn window_width(&self) -> f64;

    /// URL of the referring document, empty when there is none.
    fn referrer(&self) -> String;

    /// Host (and port, when present) of the current location.
    fn location_host(&self) -> String;

    /// Send the browser to `url`.
    fn navigate(&mut self, url: &str);

    /// Whether any element matches `selector`.
    fn exists(&self, selector: &str) -> bool {
        !self.select(selector).is_empty()
    }

    /// First element matching `selector`.
    fn first(&self, selector: &str) -> Option<ElementId> {
        self.select(selector).into_iter().next()
    }

    /// Whether any element matching `selector` carries `class`.
    fn any_has_class(&self, selector: &str, class: &str) -> bool {
        self.select(selector)
            .into_iter()
            .any(|element| self.has_class(element, class))
    }

    fn add_class_all(&mut self, selector: &str, class: &str) {
        for element in self.select(selector) {
            self.add_class(element, class);
        }
    }

    fn remove_class_all(&mut self, selector: &str, class: &str) {
        for element in self.select(selector) {
            self.remove_class(element, class);
        }
    }

    fn set_style_all(&mut self, selector: &str, property: &str, value: &str) {
        for element in self.select(selector) {
            self.set_style(element, property, value);
        }
    }

    fn remove_all(&mut self, selector: &str) {
        for element in self.select(selector) {
            self.remove(element);
        }
    }

    /// Nearest inclusive ancestor of `element` matching `selector`.
    fn closest(&self, element: ElementId, selector: &str) -> Option<ElementId> {
        let mut current = Some(element);
        while let Some(candidate) = current {
            if self.matches(candidate, selector) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }
}
