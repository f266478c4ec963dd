//! Request batches and response reconciliation.
//!
//! A [`Batch`] pairs the grid positions of one request with their mapped
//! coordinates. [`reconcile`] writes a response back into the grid using the
//! order fixed when the batch was built.

use crate::coords::GridMapper;
use crate::grid::{GridPosition, HeightGrid};
use crate::traversal::Traversal;
use crate::wire::{GridRequest, GridResponse};

/// One request's worth of grid positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// 1-based batch number, used in progress output and warnings.
    pub number: usize,
    /// Grid positions in request order.
    pub positions: Vec<GridPosition>,
    /// `(easting, northing)` of each position.
    pub coordinates: Vec<(i64, i64)>,
}

impl Batch {
    /// Map `positions` to coordinates and build the batch.
    pub fn new(number: usize, positions: Vec<GridPosition>, mapper: &GridMapper) -> Self {
        let coordinates = positions.iter().map(|&p| mapper.to_coordinate(p)).collect();
        Self {
            number,
            positions,
            coordinates,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The request body for this batch, preserving position order.
    pub fn request(&self) -> GridRequest {
        GridRequest::line_string(self.coordinates.iter().copied())
    }
}

/// How response records are matched to batch positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Record `k` goes to position `k`; surplus positions keep their value.
    Positional,
    /// Records are spread over the batch: record `k` of `n` goes to position
    /// `k * len / n`. Identical to positional when `n == len`.
    Proportional,
}

impl From<Traversal> for Reconciliation {
    fn from(traversal: Traversal) -> Self {
        match traversal {
            Traversal::Boustrophedon => Reconciliation::Positional,
            Traversal::PerColumn => Reconciliation::Proportional,
        }
    }
}

/// Write the altitudes of `response` into `grid` at the positions of `batch`.
///
/// Positions without a matching record are left untouched, as are positions
/// outside the grid. Returns the number of samples written.
pub fn reconcile(
    batch: &Batch,
    response: &GridResponse,
    policy: Reconciliation,
    grid: &mut HeightGrid,
) -> usize {
    let records = response.records();
    let len = batch.positions.len();
    let count = records.len();
    if len == 0 || count == 0 {
        return 0;
    }

    let mut written = 0;
    match policy {
        Reconciliation::Positional => {
            for (pos, record) in batch.positions.iter().zip(records) {
                if grid.set(pos.x, pos.y, record.altitude()) {
                    written += 1;
                }
            }
        }
        Reconciliation::Proportional => {
            for (k, record) in records.iter().enumerate() {
                let target = k * len / count;
                let Some(pos) = batch.positions.get(target) else {
                    continue;
                };
                if grid.set(pos.x, pos.y, record.altitude()) {
                    written += 1;
                }
            }
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::BatchPlan;

    fn column_batch(x: usize, height: usize) -> Batch {
        let mapper = GridMapper::new(0, 0, 100, 100, 10);
        let positions = (0..height).map(|y| GridPosition::new(x, y)).collect();
        Batch::new(1, positions, &mapper)
    }

    #[test]
    fn test_batch_request_order() {
        let mapper = GridMapper::new(1000, 2000, 20, 20, 10);
        let plan = BatchPlan::new(4, 4, Traversal::Boustrophedon, 6);
        let batch = Batch::new(1, plan.positions(0), &mapper);
        let request = batch.request();
        assert_eq!(request.len(), 6);
        // Down column 0 then back up column 1
        assert_eq!(request.coordinates[0], [980, 1980]);
        assert_eq!(request.coordinates[3], [980, 2010]);
        assert_eq!(request.coordinates[4], [990, 2010]);
        assert_eq!(request.coordinates[5], [990, 2000]);
    }

    #[test]
    fn test_positional_full_response() {
        let mut grid = HeightGrid::new(4, 3);
        let plan = BatchPlan::new(4, 3, Traversal::Boustrophedon, 5);
        let mapper = GridMapper::new(0, 0, 20, 15, 10);
        let batch = Batch::new(2, plan.positions(1), &mapper);
        let response = GridResponse::from_altitudes([10.0, 11.0, 12.0, 13.0, 14.0]);

        let written = reconcile(&batch, &response, Reconciliation::Positional, &mut grid);
        assert_eq!(written, 5);
        assert_eq!(grid.at(1, 0), 10.0);
        assert_eq!(grid.at(2, 0), 11.0);
        assert_eq!(grid.at(2, 2), 13.0);
        assert_eq!(grid.at(3, 2), 14.0);
        assert_eq!(grid.at(0, 0), 0.0);
    }

    #[test]
    fn test_positional_short_response() {
        let mut grid = HeightGrid::new(1, 5);
        let batch = column_batch(0, 5);
        let response = GridResponse::from_altitudes([400.0, 401.0]);

        let written = reconcile(&batch, &response, Reconciliation::Positional, &mut grid);
        assert_eq!(written, 2);
        assert_eq!(grid.at(0, 0), 400.0);
        assert_eq!(grid.at(0, 1), 401.0);
        assert_eq!(grid.at(0, 2), 0.0);
        assert_eq!(grid.at(0, 4), 0.0);
    }

    #[test]
    fn test_positional_long_response_is_truncated() {
        let mut grid = HeightGrid::new(1, 2);
        let batch = column_batch(0, 2);
        let response = GridResponse::from_altitudes([5.0, 6.0, 7.0, 8.0]);

        let written = reconcile(&batch, &response, Reconciliation::Positional, &mut grid);
        assert_eq!(written, 2);
        assert_eq!(grid.values(), &[5.0, 6.0]);
    }

    #[test]
    fn test_empty_response_leaves_grid() {
        let mut grid = HeightGrid::new(1, 3);
        grid.set(0, 1, 99.0);
        let batch = column_batch(0, 3);
        let written = reconcile(
            &batch,
            &GridResponse::default(),
            Reconciliation::Positional,
            &mut grid,
        );
        assert_eq!(written, 0);
        assert_eq!(grid.values(), &[0.0, 99.0, 0.0]);
    }

    #[test]
    fn test_out_of_grid_positions_are_skipped() {
        let mut grid = HeightGrid::new(1, 2);
        let batch = column_batch(0, 4);
        let response = GridResponse::from_altitudes([1.0, 2.0, 3.0, 4.0]);
        let written = reconcile(&batch, &response, Reconciliation::Positional, &mut grid);
        assert_eq!(written, 2);
        assert_eq!(grid.values(), &[1.0, 2.0]);
    }

    #[test]
    fn test_proportional_exact_count() {
        let mut grid = HeightGrid::new(2, 4);
        let batch = column_batch(1, 4);
        let response = GridResponse::from_altitudes([1.0, 2.0, 3.0, 4.0]);
        let written = reconcile(&batch, &response, Reconciliation::Proportional, &mut grid);
        assert_eq!(written, 4);
        assert_eq!(grid.at(1, 0), 1.0);
        assert_eq!(grid.at(1, 3), 4.0);
    }

    #[test]
    fn test_proportional_sparse_response() {
        // Two records spread across a column of four
        let mut grid = HeightGrid::new(1, 4);
        let batch = column_batch(0, 4);
        let response = GridResponse::from_altitudes([100.0, 200.0]);
        reconcile(&batch, &response, Reconciliation::Proportional, &mut grid);
        assert_eq!(grid.values(), &[100.0, 0.0, 200.0, 0.0]);
    }

    #[test]
    fn test_proportional_dense_response() {
        // Eight records squeezed into four rows: later records overwrite
        let mut grid = HeightGrid::new(1, 4);
        let batch = column_batch(0, 4);
        let response = GridResponse::from_altitudes((0..8).map(|i| i as f32));
        let written = reconcile(&batch, &response, Reconciliation::Proportional, &mut grid);
        assert_eq!(written, 8);
        assert_eq!(grid.values(), &[1.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_reconciliation_from_traversal() {
        assert_eq!(
            Reconciliation::from(Traversal::Boustrophedon),
            Reconciliation::Positional
        );
        assert_eq!(
            Reconciliation::from(Traversal::PerColumn),
            Reconciliation::Proportional
        );
    }
}
