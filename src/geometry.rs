//! Axis-aligned rectangle utilities.
//!
//! An item has at most two orientations in the stash: as defined, or turned
//! 90 degrees. Square items have only one.

use crate::items::PlacedItem;

/// A width/height pairing for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    pub width: usize,
    pub height: usize,
    pub rotated: bool,
}

/// Returns the distinct orientations of a `width x height` item.
///
/// The original orientation always comes first, so callers that keep the
/// first of equally good candidates prefer unrotated placements.
pub fn orientations(width: usize, height: usize) -> impl Iterator<Item = Orientation> {
    let original = Orientation {
        width,
        height,
        rotated: false,
    };
    let turned = (width != height).then_some(Orientation {
        width: height,
        height: width,
        rotated: true,
    });
    std::iter::once(original).chain(turned)
}

/// A rectangle in grid cells, `x..x + width` by `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// True if the two rectangles share at least one cell.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

impl From<&PlacedItem> for Rect {
    fn from(item: &PlacedItem) -> Self {
        Rect::new(item.x, item.y, item.width, item.height)
    }
}

/// Smallest rectangle containing every item, or `None` for an empty layout.
pub fn bounding_box<'a>(items: impl IntoIterator<Item = &'a PlacedItem>) -> Option<Rect> {
    items.into_iter().fold(None, |acc: Option<Rect>, item| {
        let (min_x, min_y, max_x, max_y) = match acc {
            None => (item.x, item.y, item.right(), item.bottom()),
            Some(rect) => (
                rect.x.min(item.x),
                rect.y.min(item.y),
                (rect.x + rect.width).max(item.right()),
                (rect.y + rect.height).max(item.bottom()),
            ),
        };
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    })
}
