//! Tanner graph of a parity check matrix.
//!
//! The graph is stored edge-major. Edges are numbered row by row of H, so the
//! edges of each check node form a contiguous range, and each variable node
//! keeps the list of its edge numbers. All the arrays are sized from H and
//! filled in a single pass, so each check node and each variable node owns
//! exactly one slot.

use crate::sparse::SparseMatrix;
use std::ops::Range;

/// Tanner graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TannerGraph {
    // check c owns edges check_offsets[c]..check_offsets[c + 1]
    check_offsets: Box<[usize]>,
    // variable v owns variable_edges[variable_offsets[v]..variable_offsets[v + 1]]
    variable_offsets: Box<[usize]>,
    variable_edges: Box<[usize]>,
    edge_variable: Box<[usize]>,
    edge_check: Box<[usize]>,
}

impl TannerGraph {
    /// Builds the Tanner graph of a parity check matrix.
    pub fn new(h: &SparseMatrix) -> TannerGraph {
        let num_edges = h.num_ones();

        let mut check_offsets = Vec::with_capacity(h.num_rows() + 1);
        let mut edge_variable = Vec::with_capacity(num_edges);
        let mut edge_check = Vec::with_capacity(num_edges);
        check_offsets.push(0);
        for c in 0..h.num_rows() {
            for &v in h.iter_row(c) {
                edge_variable.push(v);
                edge_check.push(c);
            }
            check_offsets.push(edge_variable.len());
        }

        let mut variable_offsets = Vec::with_capacity(h.num_cols() + 1);
        variable_offsets.push(0);
        for v in 0..h.num_cols() {
            variable_offsets.push(variable_offsets[v] + h.col_weight(v));
        }

        // edges are visited in check order, so each variable lists its edges
        // sorted by check
        let mut fill = variable_offsets[..h.num_cols()].to_vec();
        let mut variable_edges = vec![0; num_edges];
        for (e, &v) in edge_variable.iter().enumerate() {
            variable_edges[fill[v]] = e;
            fill[v] += 1;
        }

        TannerGraph {
            check_offsets: check_offsets.into_boxed_slice(),
            variable_offsets: variable_offsets.into_boxed_slice(),
            variable_edges: variable_edges.into_boxed_slice(),
            edge_variable: edge_variable.into_boxed_slice(),
            edge_check: edge_check.into_boxed_slice(),
        }
    }

    /// Returns the number of check nodes.
    pub fn num_checks(&self) -> usize {
        self.check_offsets.len() - 1
    }

    /// Returns the number of variable nodes.
    pub fn num_variables(&self) -> usize {
        self.variable_offsets.len() - 1
    }

    /// Returns the number of edges.
    pub fn num_edges(&self) -> usize {
        self.edge_variable.len()
    }

    /// Returns the range of edges incident to a check node.
    pub fn check_edges(&self, check: usize) -> Range<usize> {
        self.check_offsets[check]..self.check_offsets[check + 1]
    }

    /// Returns the edges incident to a variable node.
    pub fn variable_edges(&self, variable: usize) -> &[usize] {
        &self.variable_edges[self.variable_offsets[variable]..self.variable_offsets[variable + 1]]
    }

    /// Returns the variable nodes connected to a check node.
    pub fn check_neighbors(&self, check: usize) -> &[usize] {
        &self.edge_variable[self.check_edges(check)]
    }

    /// Returns an [Iterator] over the check nodes connected to a variable
    /// node.
    pub fn variable_neighbors(&self, variable: usize) -> impl Iterator<Item = usize> + '_ {
        self.variable_edges(variable)
            .iter()
            .map(|&e| self.edge_check[e])
    }

    /// Returns the variable node of an edge.
    pub fn edge_variable(&self, edge: usize) -> usize {
        self.edge_variable[edge]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codes::CodeTable;
    use std::collections::HashSet;

    fn check_graph(h: &SparseMatrix) {
        let graph = TannerGraph::new(h);
        assert_eq!(graph.num_checks(), h.num_rows());
        assert_eq!(graph.num_variables(), h.num_cols());
        assert_eq!(graph.num_edges(), h.num_ones());

        let check_side: usize = (0..graph.num_checks())
            .map(|c| graph.check_edges(c).len())
            .sum();
        let variable_side: usize = (0..graph.num_variables())
            .map(|v| graph.variable_edges(v).len())
            .sum();
        assert_eq!(check_side, variable_side);

        // check ranges tile the edges without overlap
        let mut next = 0;
        for c in 0..graph.num_checks() {
            let range = graph.check_edges(c);
            assert_eq!(range.start, next);
            next = range.end;
            assert_eq!(graph.check_neighbors(c), &h.rows()[c][..]);
        }
        assert_eq!(next, graph.num_edges());

        // every edge belongs to exactly one variable node
        let mut seen = HashSet::new();
        for v in 0..graph.num_variables() {
            for &e in graph.variable_edges(v) {
                assert!(seen.insert(e));
                assert_eq!(graph.edge_variable(e), v);
            }
            let checks: Vec<usize> = graph.variable_neighbors(v).collect();
            let expected: Vec<usize> = h.iter_col(v).copied().collect();
            assert_eq!(checks, expected);
        }
        assert_eq!(seen.len(), graph.num_edges());
    }

    #[test]
    fn small() {
        let h = SparseMatrix::from_rows(
            6,
            &[vec![0, 1, 3], vec![1, 2, 4], vec![0, 4, 5], vec![2, 3, 5]],
        )
        .unwrap();
        check_graph(&h);
        let graph = TannerGraph::new(&h);
        assert_eq!(graph.check_edges(1), 3..6);
        assert_eq!(graph.variable_edges(4), &[5, 7]);
    }

    #[test]
    fn ieee80211() {
        for (_, _, code) in CodeTable::global().unwrap().iter() {
            check_graph(code.h());
        }
    }
}
