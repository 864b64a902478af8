//! Side navigation panel controller.
//!
//! The panel state lives on the wrapper as the `show-nav` class. Pages
//! rendered without a navigation region lose the toggle affordance for good:
//! presence is checked once, at initialize, and never again.

use serde::{Deserialize, Serialize};
use shell_config::{NavigationConfig, ShellConfig};
use shell_dom::Dom;
use std::fmt;
use tracing::debug;

use crate::classes::{SHOW_NAV, WITH_TRANSITION};

/// Whether the side navigation region is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    Open,
    Closed,
}

impl PanelState {
    pub fn flipped(self) -> Self {
        match self {
            PanelState::Open => PanelState::Closed,
            PanelState::Closed => PanelState::Open,
        }
    }

    pub fn is_open(self) -> bool {
        self == PanelState::Open
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelState::Open => f.write_str("open"),
            PanelState::Closed => f.write_str("closed"),
        }
    }
}

/// Navigation panel configuration and state
#[derive(Debug, Clone)]
pub struct NavigationPanel {
    wrapper: String,
    toggle: String,
    navigation: String,
    content: String,
    geometry: NavigationConfig,
    width_animation: bool,
    state: PanelState,
    transitions_enabled: bool,
    navigation_present: bool,
    initialized: bool,
}

impl NavigationPanel {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            wrapper: config.selectors.wrapper.clone(),
            toggle: config.selectors.toggle_nav.clone(),
            navigation: config.selectors.app_navigation.clone(),
            content: config.selectors.app_content.clone(),
            geometry: config.navigation.clone(),
            width_animation: config.features.toggle_width_animation,
            state: PanelState::Closed,
            transitions_enabled: false,
            navigation_present: false,
            initialized: false,
        }
    }

    /// Read the server-rendered panel state and check for a navigation region.
    ///
    /// Returns whether the toggle click handler should be registered.
    pub fn initialize(&mut self, dom: &mut dyn Dom) -> bool {
        self.state = if dom.any_has_class(&self.wrapper, SHOW_NAV) {
            PanelState::Open
        } else {
            PanelState::Closed
        };
        self.navigation_present = dom.exists(&self.navigation);
        self.initialized = true;

        if !self.navigation_present {
            dom.set_style_all(&self.content, "transition", "none");
            dom.remove_class_all(&self.wrapper, SHOW_NAV);
            self.state = PanelState::Closed;

            dom.set_style_all(&self.toggle, "display", "none");
            dom.remove_all(&self.toggle);
            debug!("no navigation region; toggle removed");
        }

        debug!(state = %self.state, present = self.navigation_present, "navigation panel initialized");
        self.navigation_present
    }

    /// Flip the panel. A no-op when the page has no navigation region.
    pub fn toggle(&mut self, dom: &mut dyn Dom) -> PanelState {
        if !self.initialized || !self.navigation_present {
            return self.state;
        }

        // Skip animating the server-rendered state; animate every change after.
        if !self.transitions_enabled {
            dom.add_class_all(&self.wrapper, WITH_TRANSITION);
            self.transitions_enabled = true;
        }

        self.state = self.state.flipped();
        match self.state {
            PanelState::Closed => {
                dom.remove_class_all(&self.wrapper, SHOW_NAV);
                if self.width_animation {
                    dom.set_style_all(&self.toggle, "width", &self.geometry.closed_toggle_width);
                    dom.set_style_all(&self.toggle, "margin-right", &self.geometry.closed_toggle_margin);
                }
            }
            PanelState::Open => {
                dom.add_class_all(&self.wrapper, SHOW_NAV);
                if self.width_animation {
                    dom.set_style_all(&self.toggle, "width", &self.geometry.open_toggle_width);
                    dom.set_style_all(&self.toggle, "margin-right", &self.geometry.open_toggle_margin);
                }
            }
        }

        debug!(state = %self.state, "navigation panel toggled");
        self.state
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn transitions_enabled(&self) -> bool {
        self.transitions_enabled
    }

    pub fn navigation_present(&self) -> bool {
        self.navigation_present
    }

    /// Selector of the toggle affordance, used to route clicks.
    pub fn toggle_selector(&self) -> &str {
        &self.toggle
    }
}
