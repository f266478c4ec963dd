//! Grid traversal orders and batch planning.
//!
//! Two orders are supported:
//!
//! - **Boustrophedon**: one continuous snake over the whole grid. Column 0 is
//!   walked with `y` ascending, column 1 with `y` descending, and so on. The
//!   snake is cut into batches of at most `max_batch_size` samples wherever
//!   the limit falls, which gives the smallest possible number of requests.
//! - **Per-column**: one batch per column, `y` ascending. Useful when the
//!   service refuses large requests.
//!
//! The snake is addressed by a flat index `i` in `0..width * height`;
//! [`snake_unflatten`] and [`snake_flatten`] convert between the two.

use std::fmt;
use std::ops::Range;

use crate::grid::GridPosition;

/// Default maximum number of samples per request.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 5000;

/// Order in which grid cells are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Snake across the whole grid, cut into fixed-size batches.
    #[default]
    Boustrophedon,
    /// One batch per column.
    PerColumn,
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Traversal::Boustrophedon => f.write_str("complex"),
            Traversal::PerColumn => f.write_str("simple"),
        }
    }
}

/// Convert a flat snake index to a grid position.
///
/// `height` is the column length and must be non-zero.
pub fn snake_unflatten(index: usize, height: usize) -> GridPosition {
    let x = index / height;
    let y = index % height;
    if x % 2 == 1 {
        GridPosition::new(x, height - y - 1)
    } else {
        GridPosition::new(x, y)
    }
}

/// Convert a grid position to its flat snake index.
///
/// Exact inverse of [`snake_unflatten`] for `pos.y < height`.
pub fn snake_flatten(pos: GridPosition, height: usize) -> usize {
    let y = if pos.x % 2 == 1 {
        height - pos.y - 1
    } else {
        pos.y
    };
    pos.x * height + y
}

/// Grid position of the `index`-th cell visited by `traversal` in a grid of
/// columns `height` cells long.
pub fn position_at(index: usize, height: usize, traversal: Traversal) -> GridPosition {
    match traversal {
        Traversal::Boustrophedon => snake_unflatten(index, height),
        Traversal::PerColumn => GridPosition::new(index / height, index % height),
    }
}

/// Enumerate every cell of a `width × height` grid in traversal order.
pub fn enumerate(
    width: usize,
    height: usize,
    traversal: Traversal,
) -> impl Iterator<Item = GridPosition> {
    let total = if height == 0 { 0 } else { width * height };
    (0..total).map(move |i| position_at(i, height, traversal))
}

/// The split of a grid into request batches.
///
/// Batches are produced lazily; only one batch's positions exist at a time.
///
/// # Example
///
/// ```
/// use heightmapper::traversal::{BatchPlan, Traversal};
///
/// let plan = BatchPlan::new(4, 3, Traversal::Boustrophedon, 5);
/// let sizes: Vec<usize> = plan.iter().map(|b| b.len()).collect();
/// assert_eq!(sizes, vec![5, 5, 2]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    width: usize,
    height: usize,
    traversal: Traversal,
    max_batch_size: usize,
}

impl BatchPlan {
    /// Plan batches for a `width × height` grid.
    ///
    /// `max_batch_size` is only used by [`Traversal::Boustrophedon`] and is
    /// raised to 1 if zero.
    pub fn new(width: usize, height: usize, traversal: Traversal, max_batch_size: usize) -> Self {
        Self {
            width,
            height,
            traversal,
            max_batch_size: max_batch_size.max(1),
        }
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// Total number of cells covered by the plan.
    pub fn cell_count(&self) -> usize {
        if self.height == 0 {
            0
        } else {
            self.width * self.height
        }
    }

    /// Number of batches.
    pub fn len(&self) -> usize {
        match self.traversal {
            Traversal::Boustrophedon => self.cell_count().div_ceil(self.max_batch_size),
            Traversal::PerColumn if self.height == 0 => 0,
            Traversal::PerColumn => self.width,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index range covered by batch `index` (0-based).
    fn flat_range(&self, index: usize) -> Range<usize> {
        let chunk = match self.traversal {
            Traversal::Boustrophedon => self.max_batch_size,
            Traversal::PerColumn => self.height,
        };
        let start = (index * chunk).min(self.cell_count());
        let end = (start + chunk).min(self.cell_count());
        start..end
    }

    /// Positions of batch `index` (0-based), in request order.
    pub fn positions(&self, index: usize) -> Vec<GridPosition> {
        self.flat_range(index)
            .map(|i| position_at(i, self.height, self.traversal))
            .collect()
    }

    /// Iterate over the position lists of all batches.
    pub fn iter(&self) -> impl Iterator<Item = Vec<GridPosition>> + '_ {
        (0..self.len()).map(move |i| self.positions(i))
    }
}
