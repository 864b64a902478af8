//! App library tile grid controller.
//!
//! Arrangement is delegated to a [`GridLayoutEngine`]; the grid is laid out
//! once on load and once more after the tile images settle, since late
//! images change tile heights. Activating a tile applies the hand-off styling
//! immediately and leaves navigation to a delayed task owned by the caller.

pub mod images;
pub mod masonry;

pub use images::ImageLoadTracker;
pub use masonry::{
    GridEngineFactory, GridLayoutEngine, GridOptions, MasonryLayout, Placement, masonry_factory,
};

use shell_config::{HandoffConfig, ShellConfig};
use shell_dom::{Dom, ElementId};
use tracing::{debug, warn};

use crate::classes::{SHOW_CURTAIN, WITH_TRANSITION};

pub struct AppTileGrid {
    container_selector: String,
    options: GridOptions,
    url_attribute: String,
    headers: Vec<String>,
    curtain: String,
    handoff: HandoffConfig,
    container: Option<ElementId>,
    engine: Option<Box<dyn GridLayoutEngine>>,
    images: ImageLoadTracker,
    layout_passes: u32,
}

impl AppTileGrid {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            container_selector: config.selectors.tile_container.clone(),
            options: GridOptions {
                column_width: config.library.column_width,
                item_selector: config.selectors.tile_item.clone(),
                gutter: config.library.gutter,
            },
            url_attribute: config.library.url_attribute.clone(),
            headers: config.selectors.library_headers.clone(),
            curtain: config.selectors.curtain.clone(),
            handoff: config.handoff.clone(),
            container: None,
            engine: None,
            images: ImageLoadTracker::default(),
            layout_passes: 0,
        }
    }

    /// Locate the container, build the engine and run the first layout pass.
    ///
    /// Returns the number of tiles placed, or `None` when the page has no tile
    /// container (nothing is wired in that case).
    pub fn initialize(&mut self, dom: &mut dyn Dom, factory: &GridEngineFactory) -> Option<usize> {
        let Some(container) = dom.first(&self.container_selector) else {
            warn!(selector = %self.container_selector, "tile container not found");
            return None;
        };
        self.container = Some(container);
        self.engine = Some(factory(container, self.options.clone()));
        self.images = ImageLoadTracker::watch(dom, container);
        debug!(pending_images = self.images.pending(), "tile grid initialized");
        self.layout(dom)
    }

    /// Run one layout pass.
    pub fn layout(&mut self, dom: &mut dyn Dom) -> Option<usize> {
        let engine = self.engine.as_mut()?;
        let items = engine.layout(dom);
        self.layout_passes += 1;
        debug!(pass = self.layout_passes, items, "tile layout pass");
        Some(items)
    }

    /// True once, when no tracked image is still loading.
    pub fn poll_images(&mut self) -> bool {
        self.container.is_some() && self.images.poll()
    }

    /// Record a settled image; true when that completes the set.
    pub fn image_settled(&mut self, image: ElementId) -> bool {
        self.container.is_some() && self.images.settle(image)
    }

    /// Correct the layout for images that finished after the first pass.
    pub fn on_images_loaded(&mut self, dom: &mut dyn Dom) -> Option<usize> {
        self.layout(dom)
    }

    /// Tile containing `target` and its destination URL.
    ///
    /// The URL comes from the tile's configured attribute, falling back to the
    /// first descendant that carries it.
    pub fn tile_for(&self, dom: &dyn Dom, target: ElementId) -> Option<(ElementId, String)> {
        let container = self.container?;
        let tile = dom.closest(target, &self.options.item_selector)?;
        if !dom
            .select_within(container, &self.options.item_selector)
            .contains(&tile)
        {
            return None;
        }
        let url = dom.attribute(tile, &self.url_attribute).or_else(|| {
            dom.select_within(tile, "*")
                .into_iter()
                .find_map(|element| dom.attribute(element, &self.url_attribute))
        })?;
        Some((tile, url))
    }

    /// Apply the synchronous part of the hand-off to `tile`.
    pub fn begin_handoff(&self, dom: &mut dyn Dom, tile: ElementId) {
        dom.set_style(tile, "z-index", &self.handoff.tile_z_index.to_string());

        for header in &self.headers {
            dom.add_class_all(header, WITH_TRANSITION);
            dom.set_style_all(header, "margin-top", &self.handoff.header_exit_margin);
        }

        dom.add_class_all(&self.curtain, WITH_TRANSITION);
        dom.add_class_all(&self.curtain, SHOW_CURTAIN);

        dom.add_class(tile, WITH_TRANSITION);
        dom.set_style(tile, "opacity", "0");
    }

    pub fn handoff_delay_ms(&self) -> u64 {
        self.handoff.delay_ms
    }

    pub fn container(&self) -> Option<ElementId> {
        self.container
    }

    pub fn layout_passes(&self) -> u32 {
        self.layout_passes
    }

    pub fn pending_images(&self) -> usize {
        self.images.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shell_dom::{MemoryDom, NodeSpec};

    fn library(pending_images: bool) -> MemoryDom {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        dom.append(body, &NodeSpec::new("div").with_class("header-wrapper"));
        dom.append(body, &NodeSpec::new("div").with_id("app-curtain"));
        let mut icon = NodeSpec::new("img");
        if pending_images {
            icon = icon.pending();
        }
        dom.append(
            body,
            &NodeSpec::new("div")
                .with_id("app-list")
                .with_width(960.0)
                .with_child(
                    NodeSpec::new("div")
                        .with_class("app-container")
                        .with_attribute("href", "/apps/myapp/")
                        .with_height(200.0)
                        .with_child(icon),
                )
                .with_child(
                    NodeSpec::new("div")
                        .with_class("app-container")
                        .with_height(120.0)
                        .with_child(NodeSpec::new("a").with_attribute("href", "/apps/other/")),
                ),
        );
        dom.append(body, &NodeSpec::new("div").with_class("app-container"));
        dom
    }

    #[test]
    fn initialize_runs_first_pass() {
        let mut dom = library(true);
        let mut grid = AppTileGrid::new(&ShellConfig::default());
        assert_eq!(grid.initialize(&mut dom, &masonry_factory()), Some(2));
        assert_eq!(grid.layout_passes(), 1);
        assert_eq!(grid.pending_images(), 1);
        assert!(!grid.poll_images());

        let image = dom.first("img").unwrap();
        assert!(grid.image_settled(image));
        assert_eq!(grid.on_images_loaded(&mut dom), Some(2));
        assert_eq!(grid.layout_passes(), 2);
    }

    #[test]
    fn missing_container_wires_nothing() {
        let mut dom = MemoryDom::new();
        let mut grid = AppTileGrid::new(&ShellConfig::default());
        assert_eq!(grid.initialize(&mut dom, &masonry_factory()), None);
        assert!(!grid.poll_images());
        assert_eq!(grid.layout(&mut dom), None);
        assert_eq!(grid.layout_passes(), 0);
    }

    #[test]
    fn resolves_tile_and_destination() {
        let mut dom = library(false);
        let mut grid = AppTileGrid::new(&ShellConfig::default());
        grid.initialize(&mut dom, &masonry_factory());

        let image = dom.first("img").unwrap();
        let tiles = dom.select("#app-list .app-container");
        assert_eq!(grid.tile_for(&dom, image), Some((tiles[0], "/apps/myapp/".to_string())));

        let link = dom.first("a").unwrap();
        assert_eq!(grid.tile_for(&dom, link), Some((tiles[1], "/apps/other/".to_string())));

        // Outside the container, and without a destination.
        let stray = dom.select(".app-container")[2];
        assert_eq!(grid.tile_for(&dom, stray), None);
        let container = grid.container().unwrap();
        assert_eq!(grid.tile_for(&dom, container), None);
    }

    #[test]
    fn handoff_styles_apply_immediately() {
        let mut dom = library(false);
        let grid = AppTileGrid::new(&ShellConfig::default());
        let tile = dom.first(".app-container").unwrap();

        grid.begin_handoff(&mut dom, tile);

        assert_eq!(dom.style(tile, "z-index").as_deref(), Some("100"));
        assert_eq!(dom.style(tile, "opacity").as_deref(), Some("0"));
        let header = dom.first(".header-wrapper").unwrap();
        assert_eq!(dom.style(header, "margin-top").as_deref(), Some("-100px"));
        assert!(dom.has_class(header, WITH_TRANSITION));
        assert!(dom.any_has_class("#app-curtain", SHOW_CURTAIN));
        assert_eq!(grid.handoff_delay_ms(), 800);
    }
}
