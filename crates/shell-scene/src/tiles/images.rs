//! Tracks the images of a container until every one has settled.

use std::collections::BTreeSet;

use shell_dom::{Dom, ElementId};

/// Completion signal for a container's images, raised exactly once.
///
/// Success and failure are not distinguished: a broken image settles just
/// like a loaded one.
#[derive(Debug, Clone, Default)]
pub struct ImageLoadTracker {
    pending: BTreeSet<ElementId>,
    fired: bool,
}

impl ImageLoadTracker {
    /// Start tracking every `img` under `container` that is still loading.
    pub fn watch(dom: &dyn Dom, container: ElementId) -> Self {
        let pending = dom
            .select_within(container, "img")
            .into_iter()
            .filter(|image| !dom.image_complete(*image))
            .collect();
        Self {
            pending,
            fired: false,
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Whether completion has already been signalled.
    pub fn is_complete(&self) -> bool {
        self.fired
    }

    /// True the first time nothing is pending; false forever after.
    pub fn poll(&mut self) -> bool {
        if self.fired || !self.pending.is_empty() {
            return false;
        }
        self.fired = true;
        true
    }

    /// Record that `image` settled, then [`ImageLoadTracker::poll`].
    pub fn settle(&mut self, image: ElementId) -> bool {
        self.pending.remove(&image);
        self.poll()
    }
}
