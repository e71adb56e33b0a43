//! Optimal assignment over real-valued cost matrices
//!
//! Thin wrapper around a Kuhn-Munkres solve that accepts rectangular
//! matrices and real costs. Unlike a per-frame greedy matcher, the result
//! carries a global optimality guarantee: no other one-to-one matching of
//! the same size has a lower total cost.

use ndarray::ArrayView2;
use pathfinding::prelude::{kuhn_munkres_min, Matrix};

/// Fixed-point scale applied to costs before the integer solve.
const COST_SCALE: f64 = (1u64 << 20) as f64;

/// Result of an optimal assignment solve
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentResult {
    /// Matched (row, column) pairs, ascending by row
    pub assignments: Vec<(usize, usize)>,
    /// Rows left unmatched (non-empty only when rows > columns)
    pub unassigned_rows: Vec<usize>,
    /// Columns left unmatched (non-empty only when columns > rows)
    pub unassigned_cols: Vec<usize>,
    /// Summed real cost of the matched pairs
    pub total_cost: f64,
}

/// Rectangular linear-assignment solver
pub struct AssignmentSolver;

impl AssignmentSolver {
    /// Find the minimum-total-cost one-to-one matching of size
    /// min(rows, columns).
    ///
    /// Costs are scaled to 2^20 fixed point for the integer solve, so cost
    /// differences below that resolution count as ties. Ties are broken by
    /// the solver's row scan order, stable for identical input.
    pub fn solve(cost_matrix: ArrayView2<f64>) -> AssignmentResult {
        let num_rows = cost_matrix.nrows();
        let num_cols = cost_matrix.ncols();

        if num_rows == 0 || num_cols == 0 {
            return AssignmentResult {
                assignments: Vec::new(),
                unassigned_rows: (0..num_rows).collect(),
                unassigned_cols: (0..num_cols).collect(),
                total_cost: 0.0,
            };
        }

        // The underlying solve requires rows <= columns; run the transposed
        // problem when rows outnumber columns and swap the pairs back.
        let transposed = num_rows > num_cols;
        let weights = if transposed {
            Matrix::from_fn(num_cols, num_rows, |(i, j)| {
                (cost_matrix[[j, i]] * COST_SCALE).round() as i64
            })
        } else {
            Matrix::from_fn(num_rows, num_cols, |(i, j)| {
                (cost_matrix[[i, j]] * COST_SCALE).round() as i64
            })
        };

        let (_, raw_assignments) = kuhn_munkres_min(&weights);

        let mut assignments: Vec<(usize, usize)> = raw_assignments
            .iter()
            .enumerate()
            .map(|(i, &j)| if transposed { (j, i) } else { (i, j) })
            .collect();
        assignments.sort_unstable();

        let mut row_matched = vec![false; num_rows];
        let mut col_matched = vec![false; num_cols];
        for &(row, col) in &assignments {
            row_matched[row] = true;
            col_matched[col] = true;
        }

        let unassigned_rows: Vec<usize> = (0..num_rows).filter(|&i| !row_matched[i]).collect();
        let unassigned_cols: Vec<usize> = (0..num_cols).filter(|&j| !col_matched[j]).collect();

        let total_cost = assignments
            .iter()
            .map(|&(row, col)| cost_matrix[[row, col]])
            .sum();

        AssignmentResult {
            assignments,
            unassigned_rows,
            unassigned_cols,
            total_cost,
        }
    }
}
