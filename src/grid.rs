//! Occupancy grid for a stash and the geometric queries the packers share.
//!
//! The grid is a flat row-major vector where each cell holds the id of the
//! item covering it, or `None` when empty. Row `y` spans
//! `cells[y * width..(y + 1) * width]`.

use serde::{Deserialize, Serialize};

use crate::items::{ItemId, PlacedItem};

/// Largest empty rectangle anchored at a query cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Space {
    pub width: usize,
    pub height: usize,
}

/// Returns true if a `w x h` rectangle at `(x, y)` lies inside a
/// `grid_width x grid_height` grid.
#[inline]
pub fn fits(x: usize, y: usize, w: usize, h: usize, grid_width: usize, grid_height: usize) -> bool {
    x + w <= grid_width && y + h <= grid_height
}

/// A `height x width` matrix of cell owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<ItemId>>,
}

impl OccupancyGrid {
    /// Creates an empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Creates a grid with every item in `items` marked.
    pub fn with_items<'a>(
        width: usize,
        height: usize,
        items: impl IntoIterator<Item = &'a PlacedItem>,
    ) -> Self {
        let mut grid = Self::new(width, height);
        for item in items {
            grid.place(item);
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Id of the item covering `(x, y)`, or `None` if empty or out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&str> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[self.index(x, y)].as_deref()
    }

    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some()
    }

    /// Returns true if the rectangle lies inside this grid.
    #[inline]
    pub fn fits(&self, x: usize, y: usize, w: usize, h: usize) -> bool {
        fits(x, y, w, h, self.width, self.height)
    }

    /// Returns true if any cell of the rectangle belongs to an item other
    /// than `exclude`. Cells outside the grid are ignored; check [`fits`] first.
    pub fn overlaps(&self, x: usize, y: usize, w: usize, h: usize, exclude: Option<&str>) -> bool {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        (y..y_end).any(|row| {
            (x..x_end).any(|col| match self.cells[self.index(col, row)].as_deref() {
                None => false,
                Some(owner) => exclude != Some(owner),
            })
        })
    }

    /// True if the rectangle is inside the grid and entirely empty.
    #[inline]
    pub fn is_free(&self, x: usize, y: usize, w: usize, h: usize) -> bool {
        self.fits(x, y, w, h) && !self.overlaps(x, y, w, h, None)
    }

    /// Number of contiguous empty cells in row `y` starting at `x`, stopping
    /// after `limit` cells.
    fn empty_run(&self, x: usize, y: usize, limit: usize) -> usize {
        (x..self.width)
            .take(limit)
            .take_while(|&col| self.cells[self.index(col, y)].is_none())
            .count()
    }

    /// The largest empty rectangle whose top-left corner is exactly `(x, y)`.
    ///
    /// Width starts as the empty run along row `y`, height as the empty run
    /// down column `x`, then width shrinks to the shortest run among the rows
    /// within that height. Rectangles not anchored at `(x, y)` are not found.
    pub fn available_space(&self, x: usize, y: usize) -> Space {
        if x >= self.width || y >= self.height {
            return Space::default();
        }

        let mut width = self.empty_run(x, y, usize::MAX);
        let height = (y..self.height)
            .take_while(|&row| self.cells[self.index(x, row)].is_none())
            .count();

        for row in y + 1..y + height {
            width = width.min(self.empty_run(x, row, width));
        }

        Space { width, height }
    }

    /// Fills every cell of the rectangle with `id`.
    ///
    /// Performs no overlap check; the part of the rectangle outside the grid
    /// is dropped.
    pub fn mark(&mut self, x: usize, y: usize, w: usize, h: usize, id: &str) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                let index = self.index(col, row);
                self.cells[index] = Some(id.to_string());
            }
        }
    }

    /// Marks the cells covered by `item`.
    pub fn place(&mut self, item: &PlacedItem) {
        self.mark(item.x, item.y, item.width, item.height, &item.id);
    }

    /// Empties the cells covered by `item` that still carry its id.
    pub fn remove(&mut self, item: &PlacedItem) {
        let x_end = item.right().min(self.width);
        let y_end = item.bottom().min(self.height);
        for row in item.y..y_end {
            for col in item.x..x_end {
                let index = self.index(col, row);
                if self.cells[index].as_deref() == Some(item.id.as_str()) {
                    self.cells[index] = None;
                }
            }
        }
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

/// Display character for the item at position `index` of a layout.
fn item_char(index: usize) -> char {
    const SYMBOLS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    SYMBOLS.get(index).map_or('#', |&symbol| char::from(symbol))
}

/// Formats a layout as text, one character per cell.
///
/// Items are numbered by their position in `items` (0-9, then A-Z, then
/// a-z, then `#`). Empty cells show as '.'.
pub fn format_layout(items: &[PlacedItem], width: usize, height: usize) -> String {
    let mut canvas = vec!['.'; width * height];
    for (item_index, item) in items.iter().enumerate() {
        let symbol = item_char(item_index);
        for row in item.y..item.bottom().min(height) {
            for col in item.x..item.right().min(width) {
                canvas[row * width + col] = symbol;
            }
        }
    }

    let mut output = String::with_capacity((width + 1) * height);
    for row in canvas.chunks(width.max(1)) {
        output.extend(row.iter());
        output.push('\n');
    }
    output
}
