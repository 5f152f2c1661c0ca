//! Fixed-column grid layout with square cells.
//!
//! Every cell gets the same square size: the largest natural width or height
//! of any child. Children are placed row by row, left to right. The engine
//! is pure; callers re-run it whenever the child set, the column count or the
//! spacing changes.

use tracing::warn;
use vgrid_types::{ActorBox, Size};

/// Anything the grid can lay out.
pub trait LayoutChild {
    /// Natural (preferred) size of the child.
    fn natural_size(&self) -> Size;
}

impl LayoutChild for Size {
    fn natural_size(&self) -> Size {
        *self
    }
}

impl<T: LayoutChild + ?Sized> LayoutChild for std::rc::Rc<T> {
    fn natural_size(&self) -> Size {
        (**self).natural_size()
    }
}

/// Derived geometry of one layout pass. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGeometry {
    pub columns: usize,
    pub spacing: f32,
    pub cell_size: f32,
    pub rows: usize,
    pub preferred: Size,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayoutEngine {
    columns: usize,
    spacing: f32,
}

impl Default for GridLayoutEngine {
    fn default() -> Self {
        Self::new(1, 0.0)
    }
}

impl GridLayoutEngine {
    /// Create an engine. Zero columns clamp to one, negative spacing to zero.
    #[must_use]
    pub fn new(columns: usize, spacing: f32) -> Self {
        let mut engine = Self {
            columns: 1,
            spacing: 0.0,
        };
        engine.set_columns(columns);
        engine.set_spacing(spacing);
        engine
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Returns true when the value changed and a relayout is needed.
    pub fn set_columns(&mut self, columns: usize) -> bool {
        let columns = if columns == 0 {
            warn!("Grid column count must be at least 1, clamping");
            1
        } else {
            columns
        };

        let changed = self.columns != columns;
        self.columns = columns;
        changed
    }

    /// Returns true when the value changed and a relayout is needed.
    pub fn set_spacing(&mut self, spacing: f32) -> bool {
        let spacing = if spacing.is_finite() { spacing.max(0.0) } else { 0.0 };
        let changed = (self.spacing - spacing).abs() > f32::EPSILON;
        self.spacing = spacing;
        changed
    }

    /// Square cell size: max over all children of max(width, height).
    #[must_use]
    pub fn cell_size<C: LayoutChild>(&self, children: &[C]) -> f32 {
        children
            .iter()
            .map(|child| {
                let size = child.natural_size();
                size.width.max(size.height)
            })
            .fold(0.0, f32::max)
    }

    #[must_use]
    pub fn rows(&self, count: usize) -> usize {
        count.div_ceil(self.columns)
    }

    /// `columns * cell + (columns - 1) * spacing`, or zero without children.
    // Column counts are small, f32 is exact for them
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn preferred_width<C: LayoutChild>(&self, children: &[C]) -> f32 {
        if children.is_empty() {
            return 0.0;
        }
        let cell = self.cell_size(children);
        let columns = self.columns as f32;
        columns * cell + (columns - 1.0) * self.spacing
    }

    /// `rows * cell + (rows - 1) * spacing`, or zero without children.
    // Row counts are small, f32 is exact for them
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn preferred_height<C: LayoutChild>(&self, children: &[C]) -> f32 {
        let rows = self.rows(children.len());
        if rows == 0 {
            return 0.0;
        }
        let cell = self.cell_size(children);
        let rows = rows as f32;
        rows * cell + (rows - 1.0) * self.spacing
    }

    #[must_use]
    pub fn geometry<C: LayoutChild>(&self, children: &[C]) -> LayoutGeometry {
        LayoutGeometry {
            columns: self.columns,
            spacing: self.spacing,
            cell_size: self.cell_size(children),
            rows: self.rows(children.len()),
            preferred: Size::new(
                self.preferred_width(children),
                self.preferred_height(children),
            ),
        }
    }

    /// Allocation box of every child, in the grid's own coordinates.
    // Grid indices are small, f32 is exact for them
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn allocate<C: LayoutChild>(&self, children: &[C]) -> Vec<ActorBox> {
        let cell = self.cell_size(children);
        let stride = cell + self.spacing;

        children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                let col = i % self.columns;
                let row = i / self.columns;

                let x = (col as f32 * stride).floor();
                let y = (row as f32 * stride).floor();

                let natural = child.natural_size();
                ActorBox::new(x, y, cell.max(natural.width), cell.max(natural.height))
            })
            .collect()
    }

    /// Row and column of the child at `index`.
    #[must_use]
    pub fn cell_of(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }
}
