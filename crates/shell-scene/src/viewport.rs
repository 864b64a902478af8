//! Viewport height controller.
//!
//! Short pages stretch the wrapper to the window; long pages let it grow with
//! the content. The decision is recomputed from fresh measurements each time.

use serde::{Deserialize, Serialize};
use shell_config::ShellConfig;
use shell_dom::Dom;
use tracing::debug;

/// Whether the wrapper fills the window or overflows with its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportFit {
    Fill,
    Overflow,
}

impl ViewportFit {
    /// `Fill` when the content fits the window (inclusive). Unmeasurable
    /// (NaN) heights never compare as fitting.
    pub fn classify(content_height: f64, window_height: f64) -> Self {
        if content_height <= window_height {
            ViewportFit::Fill
        } else {
            ViewportFit::Overflow
        }
    }

    /// Wrapper `height` value for this fit.
    pub fn wrapper_height(self) -> &'static str {
        match self {
            ViewportFit::Fill => "100%",
            ViewportFit::Overflow => "auto",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewportHeight {
    wrapper: String,
    content: String,
    last: Option<ViewportFit>,
}

impl ViewportHeight {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            wrapper: config.selectors.wrapper.clone(),
            content: config.selectors.app_content.clone(),
            last: None,
        }
    }

    /// Clear the height override, measure, and apply the resulting fit.
    ///
    /// Returns `None` when the page has no content region to measure.
    pub fn reapply(&mut self, dom: &mut dyn Dom) -> Option<ViewportFit> {
        // Measure without our own override in place.
        dom.set_style_all(&self.wrapper, "height", "auto");

        let content = dom.first(&self.content)?;
        let content_height = dom.measure_height(content);
        let window_height = dom.window_height();

        let fit = ViewportFit::classify(content_height, window_height);
        dom.set_style_all(&self.wrapper, "height", fit.wrapper_height());
        debug!(content_height, window_height, ?fit, "viewport height applied");

        self.last = Some(fit);
        Some(fit)
    }

    /// Fit applied by the most recent [`ViewportHeight::reapply`].
    pub fn last(&self) -> Option<ViewportFit> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shell_dom::{MemoryDom, NodeSpec};

    fn page(content_height: f64, window_height: f64) -> MemoryDom {
        let mut dom = MemoryDom::new();
        dom.set_window_size(1280.0, window_height);
        let body = dom.body();
        dom.append(
            body,
            &NodeSpec::new("div")
                .with_id("app-content-wrapper")
                .with_child(NodeSpec::new("div").with_id("app-content").with_height(content_height)),
        );
        dom
    }

    fn wrapper_height(dom: &MemoryDom) -> Option<String> {
        let wrapper = dom.first("#app-content-wrapper").unwrap();
        dom.style(wrapper, "height")
    }

    #[test]
    fn classify_boundaries() {
        assert_eq!(ViewportFit::classify(500.0, 800.0), ViewportFit::Fill);
        assert_eq!(ViewportFit::classify(900.0, 800.0), ViewportFit::Overflow);
        assert_eq!(ViewportFit::classify(800.0, 800.0), ViewportFit::Fill);
        assert_eq!(ViewportFit::classify(f64::NAN, 800.0), ViewportFit::Overflow);
    }

    #[test]
    fn short_content_fills_window() {
        let mut dom = page(500.0, 800.0);
        let mut viewport = ViewportHeight::new(&ShellConfig::default());
        assert_eq!(viewport.reapply(&mut dom), Some(ViewportFit::Fill));
        assert_eq!(wrapper_height(&dom).as_deref(), Some("100%"));
    }

    #[test]
    fn tall_content_overflows() {
        let mut dom = page(900.0, 800.0);
        let mut viewport = ViewportHeight::new(&ShellConfig::default());
        assert_eq!(viewport.reapply(&mut dom), Some(ViewportFit::Overflow));
        assert_eq!(wrapper_height(&dom).as_deref(), Some("auto"));
    }

    #[test]
    fn reapply_is_idempotent() {
        let mut dom = page(640.0, 800.0);
        let mut viewport = ViewportHeight::new(&ShellConfig::default());
        let first = viewport.reapply(&mut dom);
        let second = viewport.reapply(&mut dom);
        assert_eq!(first, second);
        assert_eq!(viewport.last(), first);
    }

    #[test]
    fn follows_window_resize() {
        let mut dom = page(700.0, 800.0);
        let mut viewport = ViewportHeight::new(&ShellConfig::default());
        assert_eq!(viewport.reapply(&mut dom), Some(ViewportFit::Fill));

        dom.set_window_size(1280.0, 600.0);
        assert_eq!(viewport.reapply(&mut dom), Some(ViewportFit::Overflow));
    }

    #[test]
    fn missing_content_region_measures_nothing() {
        let mut dom = MemoryDom::new();
        let mut viewport = ViewportHeight::new(&ShellConfig::default());
        assert_eq!(viewport.reapply(&mut dom), None);
        assert_eq!(viewport.last(), None);
    }
}
