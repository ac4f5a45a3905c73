//! An abstract graph capability and the search algorithms built on it:
//! A* pathfinding, bounded-cost coverage, predicate flood fill, and
//! line-of-sight visibility.
//!
//! Concrete graphs — [`SubdivisionGraph`](crate::subdivision::SubdivisionGraph)
//! over subdivision vertices and [`PolygonGrid`](crate::grid::PolygonGrid)
//! over grid cells — implement [`GraphLike`]; a per-query [`GraphAgent`]
//! supplies movement rules and step costs.

mod astar;
mod coverage;
mod flood_fill;
mod visibility;

pub use astar::AStar;
pub use coverage::Coverage;
pub use flood_fill::FloodFill;
pub use visibility::Visibility;

use crate::geometry::Point;
use std::fmt::Debug;
use std::hash::Hash;

/// The capability contract every searchable graph provides.
///
/// Nodes are small copyable handles; positions and regions live in world
/// coordinates. Neighbor lists are finite and never contain the node
/// itself.
pub trait GraphLike {
    type Node: Copy + Eq + Ord + Hash + Debug;

    /// The maximum number of neighbors any node can have.
    fn connectivity(&self) -> usize;

    fn node_count(&self) -> usize;

    /// All nodes of the graph.
    fn nodes(&self) -> Vec<Self::Node>;

    fn contains_node(&self, node: &Self::Node) -> bool;

    /// The neighbors of a node, in no particular order.
    fn neighbors(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// The world position of a node.
    fn world_position(&self, node: &Self::Node) -> Point;

    /// The world polygon of the region a node represents, when the graph
    /// has one (grid cells do, subdivision vertices do not).
    fn world_region(&self, _node: &Self::Node) -> Option<Vec<Point>> {
        None
    }

    /// The node whose position is nearest to a world point.
    fn nearest_node(&self, q: Point) -> Option<Self::Node>;

    /// A non-negative metric distance between two nodes.
    fn distance(&self, a: &Self::Node, b: &Self::Node) -> f64;
}

/// Per-query movement rules consulted by the algorithms.
pub trait GraphAgent<N> {
    /// Whether the agent may step from `source` onto the adjacent
    /// `target` at all.
    fn can_make_step(&self, source: &N, target: &N) -> bool;

    /// Whether the agent may end its movement on `target`.
    fn can_occupy(&self, target: &N) -> bool;

    /// The non-negative cost of stepping from `source` to the adjacent
    /// `target`.
    fn step_cost(&self, source: &N, target: &N) -> f64;

    /// The goal test for A*: whether `source` is within `distance` of
    /// `target`. The default accepts only the target itself.
    fn is_near_target(&self, source: &N, target: &N, _distance: f64) -> bool
    where
        N: PartialEq,
    {
        source == target
    }

    /// When true, coverage may exceed its budget by at most the final
    /// step's cost.
    fn relaxed_range(&self) -> bool {
        false
    }
}

/// A heap entry ordered by minimal score. The ordering is reversed so a
/// max-heap pops the smallest score, with NaN pushed to the back.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MinScored<K, T>(pub K, pub T);

impl<K: PartialOrd, T> PartialEq for MinScored<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl<K: PartialOrd, T> Eq for MinScored<K, T> {}

impl<K: PartialOrd, T> PartialOrd for MinScored<K, T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd, T> Ord for MinScored<K, T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .0
            .partial_cmp(&self.0)
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

#[cfg(test)]
pub(crate) mod test_graphs {
    use super::*;
    use crate::point;

    /// A small rectangular four-connected grid used by the algorithm
    /// tests, with optional blocked cells.
    pub struct TestGrid {
        pub width: i32,
        pub height: i32,
        pub blocked: Vec<(i32, i32)>,
    }

    impl TestGrid {
        pub fn open(width: i32, height: i32) -> Self {
            Self {
                width,
                height,
                blocked: Vec::new(),
            }
        }
    }

    impl GraphLike for TestGrid {
        type Node = (i32, i32);

        fn connectivity(&self) -> usize {
            4
        }

        fn node_count(&self) -> usize {
            (self.width * self.height) as usize
        }

        fn nodes(&self) -> Vec<(i32, i32)> {
            (0..self.width)
                .flat_map(|x| (0..self.height).map(move |y| (x, y)))
                .collect()
        }

        fn contains_node(&self, &(x, y): &(i32, i32)) -> bool {
            x >= 0 && x < self.width && y >= 0 && y < self.height
        }

        fn neighbors(&self, &(x, y): &(i32, i32)) -> Vec<(i32, i32)> {
            [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
                .into_iter()
                .filter(|n| self.contains_node(n))
                .collect()
        }

        fn world_position(&self, &(x, y): &(i32, i32)) -> Point {
            point!(x as f64, y as f64)
        }

        fn nearest_node(&self, q: Point) -> Option<(i32, i32)> {
            let x = (q.x.round() as i32).clamp(0, self.width - 1);
            let y = (q.y.round() as i32).clamp(0, self.height - 1);
            Some((x, y))
        }

        fn distance(&self, a: &(i32, i32), b: &(i32, i32)) -> f64 {
            self.world_position(a).distance(self.world_position(b))
        }
    }

    /// Unit step costs; blocked cells cannot be entered.
    pub struct TestAgent<'a> {
        pub grid: &'a TestGrid,
    }

    impl GraphAgent<(i32, i32)> for TestAgent<'_> {
        fn can_make_step(&self, _source: &(i32, i32), target: &(i32, i32)) -> bool {
            !self.grid.blocked.contains(target)
        }

        fn can_occupy(&self, target: &(i32, i32)) -> bool {
            !self.grid.blocked.contains(target)
        }

        fn step_cost(&self, source: &(i32, i32), target: &(i32, i32)) -> f64 {
            self.grid.distance(source, target)
        }
    }
}
