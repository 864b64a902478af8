//! Shell input events and the notices emitted while handling them.
//!
//! Hosts feed [`ShellEvent`]s in the order the browser dispatches them; each
//! one runs to completion before the next. Every observable state change is
//! recorded as a [`ShellNotice`] that can be drained after handling.

use serde::{Deserialize, Serialize};
use shell_dom::ElementId;
use std::collections::VecDeque;

use crate::navigation::PanelState;
use crate::scheduler::TaskHandle;
use crate::viewport::ViewportFit;

/// Browser events the shell registers for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellEvent {
    /// DOM finished loading.
    PageLoad,
    /// Click on `target` (routed to the toggle or a tile).
    Click { target: ElementId },
    /// Window was resized; new metrics are read from the document.
    Resize,
    /// An image finished loading or failed.
    ImageSettled { element: ElementId },
}

/// Observable outcome of handling an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellNotice {
    /// Page-load finished wiring the controllers.
    Initialized {
        navigation_present: bool,
        panel: Option<PanelState>,
        entry_transition: bool,
    },
    /// No navigation region: the toggle affordance was removed.
    ToggleRemoved,
    /// Panel flipped to `state`.
    PanelToggled { state: PanelState },
    /// Viewport fit differs from the previous measurement.
    ViewportFitChanged { fit: ViewportFit },
    /// The grid engine laid out `items` tiles.
    LayoutPass { pass: u32, items: usize },
    /// Every tile image settled.
    ImagesLoaded,
    /// Hand-off started; navigation fires at `due_ms`.
    TileActivated {
        tile: ElementId,
        url: String,
        task: TaskHandle,
        due_ms: u64,
    },
    /// A pending navigation was cancelled.
    TaskCancelled { task: TaskHandle },
    /// The browser was sent to `url`.
    Navigated { url: String },
    /// The page went away; `dropped_tasks` pending tasks never ran.
    TornDown { dropped_tasks: usize },
}

/// FIFO of notices awaiting the host.
#[derive(Debug, Default, Clone)]
pub struct NoticeQueue {
    notices: VecDeque<ShellNotice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: ShellNotice) {
        self.notices.push_back(notice);
    }

    /// Remove and return every queued notice, oldest first.
    pub fn drain(&mut self) -> Vec<ShellNotice> {
        self.notices.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut queue = NoticeQueue::new();
        queue.push(ShellNotice::ToggleRemoved);
        queue.push(ShellNotice::ImagesLoaded);
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained, vec![ShellNotice::ToggleRemoved, ShellNotice::ImagesLoaded]);
        assert!(queue.is_empty());
    }

    #[test]
    fn notices_serialize_with_type_tag() {
        let json = serde_json::to_value(ShellNotice::PanelToggled {
            state: PanelState::Open,
        })
        .unwrap();
        assert_eq!(json["type"], "panel_toggled");
        assert_eq!(json["state"], "open");

        let event: ShellEvent = serde_json::from_str(r#"{"type":"click","target":4}"#).unwrap();
        assert_eq!(event, ShellEvent::Click { target: ElementId(4) });
    }
}
