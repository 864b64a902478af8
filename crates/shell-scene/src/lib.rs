//! View-state controllers for the app shell and the app library page.
//!
//! [`AppShell`] is constructed once per page and owns the document handle,
//! the three controllers and a host-driven clock:
//!
//! ```text
//! AppShell
//!   ├── NavigationPanel   (show-nav toggle, toggle affordance)
//!   ├── ViewportHeight    (wrapper fills the window or overflows)
//!   ├── EntryTransition   (one-time, referrer driven)
//!   ├── AppTileGrid       (grid engine, image settle, hand-off)
//!   └── TaskScheduler     (delayed navigation)
//! ```

pub mod entry;
pub mod error;
pub mod events;
pub mod navigation;
pub mod scheduler;
pub mod shell;
pub mod tiles;
pub mod viewport;

pub use entry::{EntryTransition, arrived_from_library};
pub use error::{Result, ShellError};
pub use events::{NoticeQueue, ShellEvent, ShellNotice};
pub use navigation::{NavigationPanel, PanelState};
pub use scheduler::{TaskHandle, TaskScheduler};
pub use shell::{AppShell, Lifecycle, ShellTask};
pub use tiles::{
    AppTileGrid, GridEngineFactory, GridLayoutEngine, GridOptions, ImageLoadTracker,
    MasonryLayout, masonry_factory,
};
pub use viewport::{ViewportFit, ViewportHeight};

/// Class names shared with the page stylesheets.
pub mod classes {
    /// Wrapper marker for an open navigation panel.
    pub const SHOW_NAV: &str = "show-nav";
    /// Enables CSS transitions on the marked element.
    pub const WITH_TRANSITION: &str = "with-transition";
    pub const SHOW_HEADER: &str = "show-header";
    pub const SHOW_APP_CONTENT: &str = "show-app-content";
    /// Makes the hand-off curtain visible.
    pub const SHOW_CURTAIN: &str = "show";
}
