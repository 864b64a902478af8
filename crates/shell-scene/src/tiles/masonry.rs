//! Masonry-style column packing.
//!
//! Items are placed in document order, each into the currently shortest
//! column (leftmost on ties), so variable-height tiles stack without gaps.

use shell_dom::{Dom, ElementId};
use tracing::trace;

/// Options handed to a grid layout engine at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    /// Fixed column width in pixels.
    pub column_width: f64,
    /// Items to arrange, scoped to the container.
    pub item_selector: String,
    /// Horizontal gap between columns in pixels.
    pub gutter: f64,
}

/// Layout engine arranging the tiles of one container.
pub trait GridLayoutEngine {
    /// Arrange the current items; returns how many were placed.
    fn layout(&mut self, dom: &mut dyn Dom) -> usize;
}

/// Builds the engine once the container has been located.
pub type GridEngineFactory = Box<dyn Fn(ElementId, GridOptions) -> Box<dyn GridLayoutEngine>>;

/// Factory for the built-in [`MasonryLayout`].
pub fn masonry_factory() -> GridEngineFactory {
    Box::new(
        |container: ElementId, options: GridOptions| -> Box<dyn GridLayoutEngine> {
            Box::new(MasonryLayout::new(container, options))
        },
    )
}

/// Placement of one item, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub item: ElementId,
    pub column: usize,
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone)]
pub struct MasonryLayout {
    container: ElementId,
    options: GridOptions,
    placements: Vec<Placement>,
}

impl MasonryLayout {
    pub fn new(container: ElementId, options: GridOptions) -> Self {
        Self {
            container,
            options,
            placements: Vec::new(),
        }
    }

    /// Columns that fit the container's current width; at least one.
    pub fn column_count(&self, dom: &dyn Dom) -> usize {
        let stride = self.options.column_width + self.options.gutter;
        if stride <= 0.0 {
            return 1;
        }
        let width = dom.measure_width(self.container);
        let columns = ((width + self.options.gutter) / stride).floor();
        if columns.is_finite() && columns >= 1.0 {
            columns as usize
        } else {
            1
        }
    }

    /// Placements from the most recent layout pass.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    fn compute(&self, dom: &dyn Dom) -> (Vec<Placement>, f64) {
        let stride = self.options.column_width + self.options.gutter;
        let mut heights = vec![0.0_f64; self.column_count(dom)];
        let mut placements = Vec::new();

        for item in dom.select_within(self.container, &self.options.item_selector) {
            let column = shortest(&heights);
            let placement = Placement {
                item,
                column,
                left: column as f64 * stride,
                top: heights[column],
            };
            heights[column] += dom.measure_height(item);
            placements.push(placement);
        }

        let tallest = heights.iter().copied().fold(0.0, f64::max);
        (placements, tallest)
    }
}

fn shortest(heights: &[f64]) -> usize {
    let mut best = 0;
    for (index, height) in heights.iter().enumerate() {
        if *height < heights[best] {
            best = index;
        }
    }
    best
}

impl GridLayoutEngine for MasonryLayout {
    fn layout(&mut self, dom: &mut dyn Dom) -> usize {
        let (placements, tallest) = self.compute(dom);

        dom.set_style(self.container, "position", "relative");
        dom.set_style(self.container, "height", &format!("{tallest}px"));
        for placement in &placements {
            dom.set_style(placement.item, "position", "absolute");
            dom.set_style(placement.item, "left", &format!("{}px", placement.left));
            dom.set_style(placement.item, "top", &format!("{}px", placement.top));
            trace!(item = %placement.item, column = placement.column, "tile placed");
        }

        self.placements = placements;
        self.placements.len()
    }
}
