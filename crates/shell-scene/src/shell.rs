//! Page-level composition of the controllers.
//!
//! One [`AppShell`] exists per page. The page-load event wires listeners and
//! runs the first layout; afterwards the shell reacts only to the events it
//! registered for and to clock advancement. After teardown every call is
//! rejected.

use serde::{Deserialize, Serialize};
use shell_config::ShellConfig;
use shell_dom::{Dom, ElementId};
use tracing::{debug, info};

use crate::entry::EntryTransition;
use crate::error::{Result, ShellError};
use crate::events::{NoticeQueue, ShellEvent, ShellNotice};
use crate::navigation::{NavigationPanel, PanelState};
use crate::scheduler::{TaskHandle, TaskScheduler};
use crate::tiles::{AppTileGrid, GridEngineFactory, masonry_factory};
use crate::viewport::{ViewportFit, ViewportHeight};

/// Shell lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Uninitialized,
    Running,
    TornDown,
}

/// Deferred work owned by the shell's scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellTask {
    Navigate { url: String },
}

/// Listeners registered at page-load.
#[derive(Debug, Default, Clone, Copy)]
struct Listeners {
    toggle_click: bool,
    resize: bool,
    tile_click: bool,
}

pub struct AppShell<D: Dom> {
    config: ShellConfig,
    dom: D,
    lifecycle: Lifecycle,
    panel: NavigationPanel,
    viewport: ViewportHeight,
    entry: EntryTransition,
    grid: AppTileGrid,
    grid_factory: GridEngineFactory,
    scheduler: TaskScheduler<ShellTask>,
    listeners: Listeners,
    notices: NoticeQueue,
    entry_transition: bool,
}

impl<D: Dom> AppShell<D> {
    /// Build an uninitialized shell; nothing touches the document yet.
    pub fn new(config: ShellConfig, dom: D) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            panel: NavigationPanel::new(&config),
            viewport: ViewportHeight::new(&config),
            entry: EntryTransition::new(&config),
            grid: AppTileGrid::new(&config),
            grid_factory: masonry_factory(),
            config,
            dom,
            lifecycle: Lifecycle::Uninitialized,
            scheduler: TaskScheduler::new(),
            listeners: Listeners::default(),
            notices: NoticeQueue::new(),
            entry_transition: false,
        })
    }

    /// Replace the built-in masonry engine.
    pub fn with_grid_engine(mut self, factory: GridEngineFactory) -> Self {
        self.grid_factory = factory;
        self
    }

    /// Build the shell and run the page-load sequence.
    pub fn initialize(config: ShellConfig, dom: D) -> Result<Self> {
        let mut shell = Self::new(config, dom)?;
        shell.handle_event(ShellEvent::PageLoad)?;
        Ok(shell)
    }

    /// Dispatch one browser event. Events without a registered listener are
    /// ignored.
    pub fn handle_event(&mut self, event: ShellEvent) -> Result<()> {
        match (self.lifecycle, event) {
            (Lifecycle::TornDown, _) => Err(ShellError::TornDown),
            (Lifecycle::Running, ShellEvent::PageLoad) => Err(ShellError::AlreadyInitialized),
            (Lifecycle::Uninitialized, ShellEvent::PageLoad) => {
                self.page_load();
                Ok(())
            }
            (Lifecycle::Uninitialized, event) => {
                debug!(?event, "event before page-load ignored");
                Ok(())
            }
            (Lifecycle::Running, ShellEvent::Click { target }) => {
                self.route_click(target);
                Ok(())
            }
            (Lifecycle::Running, ShellEvent::Resize) => {
                if self.listeners.resize {
                    self.apply_height();
                }
                Ok(())
            }
            (Lifecycle::Running, ShellEvent::ImageSettled { element }) => {
                if self.grid.image_settled(element) {
                    self.images_loaded();
                }
                Ok(())
            }
        }
    }

    /// Flip the navigation panel and resynchronize the wrapper height.
    pub fn toggle(&mut self) -> Result<PanelState> {
        self.ensure_running()?;
        Ok(self.toggle_panel())
    }

    /// Recompute the viewport fit from fresh measurements.
    pub fn reapply_height(&mut self) -> Result<Option<ViewportFit>> {
        self.ensure_running()?;
        Ok(self.apply_height())
    }

    /// Start the hand-off for `tile` and schedule navigation to `url`.
    ///
    /// The returned handle can be passed to [`AppShell::cancel`]; otherwise the
    /// navigation fires once the hand-off delay has elapsed, whatever happened
    /// in between.
    pub fn activate_tile(&mut self, tile: ElementId, url: &str) -> Result<TaskHandle> {
        self.ensure_running()?;
        Ok(self.start_handoff(tile, url))
    }

    /// Cancel a pending task. Returns false when it already ran.
    pub fn cancel(&mut self, task: TaskHandle) -> bool {
        let cancelled = self.scheduler.cancel(task);
        if cancelled {
            self.notices.push(ShellNotice::TaskCancelled { task });
        }
        cancelled
    }

    /// Move the clock forward and run every task that became due.
    ///
    /// Returns how many tasks ran.
    pub fn advance(&mut self, delta_ms: u64) -> Result<usize> {
        if self.lifecycle == Lifecycle::TornDown {
            return Err(ShellError::TornDown);
        }
        let due = self.scheduler.advance(delta_ms);
        let ran = due.len();
        for (task, work) in due {
            debug!(%task, "running scheduled task");
            self.run_task(work);
        }
        Ok(ran)
    }

    /// The page is going away: drop listeners and pending tasks.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        let dropped_tasks = self.scheduler.clear();
        self.listeners = Listeners::default();
        self.lifecycle = Lifecycle::TornDown;
        self.notices.push(ShellNotice::TornDown { dropped_tasks });
        info!(dropped_tasks, "app shell torn down");
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn into_dom(self) -> D {
        self.dom
    }

    /// Panel state; `None` before page-load or when the navigation shell is
    /// disabled.
    pub fn panel_state(&self) -> Option<PanelState> {
        self.panel.is_initialized().then(|| self.panel.state())
    }

    pub fn navigation_present(&self) -> bool {
        self.panel.navigation_present()
    }

    pub fn transitions_enabled(&self) -> bool {
        self.panel.transitions_enabled()
    }

    pub fn viewport_fit(&self) -> Option<ViewportFit> {
        self.viewport.last()
    }

    pub fn entry_transition(&self) -> bool {
        self.entry_transition
    }

    pub fn layout_passes(&self) -> u32 {
        self.grid.layout_passes()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending_len()
    }

    pub fn drain_notices(&mut self) -> Vec<ShellNotice> {
        self.notices.drain()
    }

    fn ensure_running(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Running => Ok(()),
            Lifecycle::Uninitialized => Err(ShellError::NotInitialized),
            Lifecycle::TornDown => Err(ShellError::TornDown),
        }
    }

    fn page_load(&mut self) {
        self.lifecycle = Lifecycle::Running;
        let features = self.config.features.clone();

        if features.navigation_shell {
            let present = self.panel.initialize(&mut self.dom);
            self.listeners.toggle_click = present;
            self.listeners.resize = true;
            if !present {
                self.notices.push(ShellNotice::ToggleRemoved);
            }
            self.apply_height();
            self.entry_transition = self.entry.apply(&mut self.dom);
        }

        if features.app_library
            && let Some(items) = self.grid.initialize(&mut self.dom, &self.grid_factory)
        {
            self.listeners.tile_click = true;
            self.notices.push(ShellNotice::LayoutPass {
                pass: self.grid.layout_passes(),
                items,
            });
            if self.grid.poll_images() {
                self.images_loaded();
            }
        }

        self.notices.push(ShellNotice::Initialized {
            navigation_present: self.panel.navigation_present(),
            panel: self.panel_state(),
            entry_transition: self.entry_transition,
        });
        info!(
            navigation_present = self.panel.navigation_present(),
            entry_transition = self.entry_transition,
            tiles = self.listeners.tile_click,
            "app shell initialized"
        );
    }

    fn route_click(&mut self, target: ElementId) {
        if self.listeners.toggle_click
            && self
                .dom
                .closest(target, self.panel.toggle_selector())
                .is_some()
        {
            self.toggle_panel();
            return;
        }

        if self.listeners.tile_click
            && let Some((tile, url)) = self.grid.tile_for(&self.dom, target)
        {
            self.start_handoff(tile, &url);
            return;
        }

        debug!(%target, "click without listener");
    }

    fn toggle_panel(&mut self) -> PanelState {
        let before = self.panel.state();
        let state = self.panel.toggle(&mut self.dom);
        if state != before {
            self.notices.push(ShellNotice::PanelToggled { state });
        }
        self.apply_height();
        state
    }

    fn apply_height(&mut self) -> Option<ViewportFit> {
        if !self.config.features.navigation_shell {
            return None;
        }
        let previous = self.viewport.last();
        let fit = self.viewport.reapply(&mut self.dom)?;
        if previous != Some(fit) {
            self.notices.push(ShellNotice::ViewportFitChanged { fit });
        }
        Some(fit)
    }

    fn images_loaded(&mut self) {
        self.notices.push(ShellNotice::ImagesLoaded);
        if let Some(items) = self.grid.on_images_loaded(&mut self.dom) {
            self.notices.push(ShellNotice::LayoutPass {
                pass: self.grid.layout_passes(),
                items,
            });
        }
    }

    fn start_handoff(&mut self, tile: ElementId, url: &str) -> TaskHandle {
        self.grid.begin_handoff(&mut self.dom, tile);

        let delay_ms = self.grid.handoff_delay_ms();
        let task = self.scheduler.schedule(
            delay_ms,
            ShellTask::Navigate {
                url: url.to_string(),
            },
        );
        let due_ms = self
            .scheduler
            .due_at(task)
            .unwrap_or_else(|| self.scheduler.now_ms().saturating_add(delay_ms));
        self.notices.push(ShellNotice::TileActivated {
            tile,
            url: url.to_string(),
            task,
            due_ms,
        });
        info!(%tile, url, due_ms, "tile activated");
        task
    }

    fn run_task(&mut self, task: ShellTask) {
        match task {
            ShellTask::Navigate { url } => {
                self.dom.navigate(&url);
                info!(%url, "navigated");
                self.notices.push(ShellNotice::Navigated { url });
            }
        }
    }
}
