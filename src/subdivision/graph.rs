//! The graph capability of a subdivision: vertices are nodes, edges are
//! steps.

use super::Subdivision;
use crate::collections::PointMap;
use crate::geometry::Point;
use crate::graph::GraphLike;

/// A graph view over a subdivision's vertices and edges.
///
/// Nodes are dense indices into a vertex snapshot taken when the view is
/// created; the view borrows the subdivision and does not track later
/// edits.
///
/// # Examples
///
/// ```
/// use tessella::graph::GraphLike;
/// use tessella::{line, Subdivision};
///
/// let sub = Subdivision::from_lines(
///     &[line!((0.0, 0.0), (1.0, 0.0)), line!((1.0, 0.0), (1.0, 1.0))],
///     0.0,
/// )
/// .unwrap();
/// let graph = sub.to_graph();
/// assert_eq!(graph.node_count(), 3);
/// let corner = graph.nearest_node(tessella::point!(1.1, -0.1)).unwrap();
/// assert_eq!(graph.neighbors(&corner).len(), 2);
/// ```
pub struct SubdivisionGraph<'a> {
    sub: &'a Subdivision,
    positions: Vec<Point>,
    index: PointMap<usize>,
    connectivity: usize,
}

impl Subdivision {
    /// Creates the graph view of this subdivision.
    pub fn to_graph(&self) -> SubdivisionGraph<'_> {
        let positions: Vec<Point> = self.vertices.keys().collect();
        let mut index = PointMap::new(self.epsilon).expect("tolerance is non-negative");
        for (i, &p) in positions.iter().enumerate() {
            index.insert(p, i);
        }
        let connectivity = positions
            .iter()
            .map(|&p| self.vertex_degree(p))
            .max()
            .unwrap_or(0);
        SubdivisionGraph {
            sub: self,
            positions,
            index,
            connectivity,
        }
    }
}

impl GraphLike for SubdivisionGraph<'_> {
    type Node = usize;

    fn connectivity(&self) -> usize {
        self.connectivity
    }

    fn node_count(&self) -> usize {
        self.positions.len()
    }

    fn nodes(&self) -> Vec<usize> {
        (0..self.positions.len()).collect()
    }

    fn contains_node(&self, node: &usize) -> bool {
        *node < self.positions.len()
    }

    fn neighbors(&self, node: &usize) -> Vec<usize> {
        let Some(&p) = self.positions.get(*node) else {
            return Vec::new();
        };
        self.sub
            .vertex_neighbors(p)
            .into_iter()
            .filter_map(|q| self.index.get(q).copied())
            .collect()
    }

    fn world_position(&self, node: &usize) -> Point {
        self.positions[*node]
    }

    fn nearest_node(&self, q: Point) -> Option<usize> {
        self.index.find_nearest(q).map(|(_, &i)| i)
    }

    fn distance(&self, a: &usize, b: &usize) -> f64 {
        self.positions[*a].distance(self.positions[*b])
    }
}
