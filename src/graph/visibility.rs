use super::{GraphLike, MinScored};
use crate::error::GeometryError;
use crate::geometry::Point;
use std::collections::{BinaryHeap, HashSet};
use std::f64::consts::TAU;

/// Line-of-sight search with angular-arc occlusion.
///
/// Nodes are swept outward from the source in order of distance. Every
/// opaque node projects the angular arc it subtends (from its world
/// region, or a single direction for point nodes) onto an occlusion set;
/// a later node is visible while the un-occluded fraction of its own arc
/// stays at or above the threshold.
pub struct Visibility<'a, G: GraphLike> {
    graph: &'a G,
    threshold: f64,
    nodes: Vec<G::Node>,
}

impl<'a, G: GraphLike> Visibility<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            threshold: 1. / 3.,
            nodes: Vec::new(),
        }
    }

    /// The minimum visible fraction for a node to count as visible.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Sets the visibility threshold, a fraction in `[0, 1]`.
    pub fn set_threshold(&mut self, threshold: f64) -> Result<(), GeometryError> {
        if !(0. ..=1.).contains(&threshold) {
            return Err(GeometryError::InvalidThreshold);
        }
        self.threshold = threshold;
        Ok(())
    }

    /// The visible nodes found by the last search, excluding the source,
    /// in ascending distance order.
    pub fn nodes(&self) -> &[G::Node] {
        &self.nodes
    }

    /// Finds all nodes visible from `source`. `is_opaque` marks the nodes
    /// that occlude; a `radius` of zero disables the distance limit.
    /// Returns whether any node is visible.
    pub fn find<F>(&mut self, mut is_opaque: F, source: G::Node, radius: f64) -> bool
    where
        F: FnMut(&G::Node) -> bool,
    {
        self.nodes.clear();
        if !self.graph.contains_node(&source) || radius < 0. {
            return false;
        }
        let origin = self.graph.world_position(&source);
        let mut occluded = ArcUnion::default();
        let mut seen: HashSet<G::Node> = HashSet::from([source]);
        let mut heap = BinaryHeap::from([MinScored(0., source)]);

        while let Some(MinScored(distance, node)) = heap.pop() {
            if radius > 0. && distance > radius {
                continue;
            }
            if node != source {
                let arc = self.node_arc(origin, &node);
                if occluded.visible_fraction(arc) >= self.threshold {
                    self.nodes.push(node);
                }
                if is_opaque(&node) {
                    occluded.insert(arc);
                }
            }
            for neighbor in self.graph.neighbors(&node) {
                if seen.insert(neighbor) {
                    heap.push(MinScored(self.graph.distance(&source, &neighbor), neighbor));
                }
            }
        }
        !self.nodes.is_empty()
    }

    /// The angular arc a node subtends as seen from `origin`: the
    /// complement of the largest angular gap between its region vertices,
    /// or a single direction for point nodes.
    fn node_arc(&self, origin: Point, node: &G::Node) -> (f64, f64) {
        let Some(region) = self.graph.world_region(node) else {
            let direction = self.graph.world_position(node) - origin;
            let angle = direction.angle().rem_euclid(TAU);
            return (angle, 0.);
        };
        let mut angles: Vec<f64> = region
            .iter()
            .map(|&p| (p - origin).angle().rem_euclid(TAU))
            .collect();
        angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        angles.dedup();
        match angles.len() {
            0 => (0., 0.),
            1 => (angles[0], 0.),
            _ => {
                let mut widest = TAU - angles[angles.len() - 1] + angles[0];
                let mut start = angles[0];
                for pair in angles.windows(2) {
                    let gap = pair[1] - pair[0];
                    if gap > widest {
                        widest = gap;
                        start = pair[1];
                    }
                }
                (start, TAU - widest)
            }
        }
    }
}

/// A union of disjoint angular intervals in `[0, 2pi)`, merged on insert.
#[derive(Default, Debug)]
struct ArcUnion {
    /// Sorted, pairwise disjoint `(start, end)` intervals with
    /// `start <= end`.
    arcs: Vec<(f64, f64)>,
}

impl ArcUnion {
    /// Inserts an arc given as `(start, length)`; arcs crossing the zero
    /// direction are split.
    fn insert(&mut self, (start, length): (f64, f64)) {
        let end = start + length;
        if end > TAU {
            self.insert_interval(start, TAU);
            self.insert_interval(0., end - TAU);
        } else {
            self.insert_interval(start, end);
        }
    }

    fn insert_interval(&mut self, a: f64, b: f64) {
        let i = self.arcs.partition_point(|&(_, end)| end < a);
        let mut lo = a;
        let mut hi = b;
        while i < self.arcs.len() && self.arcs[i].0 <= b {
            lo = lo.min(self.arcs[i].0);
            hi = hi.max(self.arcs[i].1);
            self.arcs.remove(i);
        }
        self.arcs.insert(i, (lo, hi));
    }

    /// The fraction of `(start, length)` left uncovered; a zero-length
    /// arc reports 0 or 1 by point membership.
    fn visible_fraction(&self, (start, length): (f64, f64)) -> f64 {
        if length <= f64::EPSILON {
            return if self.contains(start) { 0. } else { 1. };
        }
        let end = start + length;
        let covered = if end > TAU {
            self.covered_length(start, TAU) + self.covered_length(0., end - TAU)
        } else {
            self.covered_length(start, end)
        };
        1. - (covered / length).min(1.)
    }

    fn covered_length(&self, a: f64, b: f64) -> f64 {
        let mut total = 0.;
        let from = self.arcs.partition_point(|&(_, end)| end < a);
        for &(s, e) in &self.arcs[from..] {
            if s > b {
                break;
            }
            total += (e.min(b) - s.max(a)).max(0.);
        }
        total
    }

    fn contains(&self, angle: f64) -> bool {
        let i = self.arcs.partition_point(|&(_, end)| end < angle);
        self.arcs
            .get(i)
            .is_some_and(|&(s, _)| s <= angle)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_graphs::TestGrid;
    use super::*;
    use crate::point;

    /// A grid whose cells are unit squares, giving nodes real angular
    /// extent.
    struct RegionGrid(TestGrid);

    impl GraphLike for RegionGrid {
        type Node = (i32, i32);

        fn connectivity(&self) -> usize {
            self.0.connectivity()
        }
        fn node_count(&self) -> usize {
            self.0.node_count()
        }
        fn nodes(&self) -> Vec<(i32, i32)> {
            self.0.nodes()
        }
        fn contains_node(&self, node: &(i32, i32)) -> bool {
            self.0.contains_node(node)
        }
        fn neighbors(&self, node: &(i32, i32)) -> Vec<(i32, i32)> {
            self.0.neighbors(node)
        }
        fn world_position(&self, node: &(i32, i32)) -> Point {
            self.0.world_position(node)
        }
        fn world_region(&self, node: &(i32, i32)) -> Option<Vec<Point>> {
            let c = self.world_position(node);
            Some(vec![
                point!(c.x - 0.5, c.y - 0.5),
                point!(c.x + 0.5, c.y - 0.5),
                point!(c.x + 0.5, c.y + 0.5),
                point!(c.x - 0.5, c.y + 0.5),
            ])
        }
        fn nearest_node(&self, q: Point) -> Option<(i32, i32)> {
            self.0.nearest_node(q)
        }
        fn distance(&self, a: &(i32, i32), b: &(i32, i32)) -> f64 {
            self.0.distance(a, b)
        }
    }

    #[test]
    fn arc_union_merges_and_measures() {
        let mut union = ArcUnion::default();
        union.insert((0.2, 0.4));
        union.insert((1.0, 0.5));
        union.insert((0.5, 0.6)); // bridges the first two
        assert_eq!(union.arcs.len(), 1);
        assert_eq!(union.arcs[0], (0.2, 1.5));
        assert!((union.covered_length(0.0, 2.0) - 1.3).abs() < 1e-12);
        assert!(union.contains(1.1));
        assert!(!union.contains(1.9));
    }

    #[test]
    fn wrapping_arcs_are_split() {
        let mut union = ArcUnion::default();
        union.insert((TAU - 0.3, 0.6)); // crosses zero
        assert!(union.contains(TAU - 0.1));
        assert!(union.contains(0.2));
        assert!(!union.contains(1.0));
    }

    #[test]
    fn open_field_sees_everything() {
        let grid = RegionGrid(TestGrid::open(5, 5));
        let mut visibility = Visibility::new(&grid);
        assert!(visibility.find(|_| false, (2, 2), 0.));
        assert_eq!(visibility.nodes().len(), 24);
    }

    #[test]
    fn a_wall_cell_shadows_the_cells_behind_it() {
        let grid = RegionGrid(TestGrid::open(5, 1));
        let mut visibility = Visibility::new(&grid);
        // (1, 0) is opaque; everything farther down the row is shadowed
        assert!(visibility.find(|&n| n == (1, 0), (0, 0), 0.));
        assert_eq!(visibility.nodes(), &[(1, 0)]);
    }

    #[test]
    fn off_axis_cells_stay_visible() {
        let grid = RegionGrid(TestGrid::open(5, 5));
        let mut visibility = Visibility::new(&grid);
        assert!(visibility.find(|&n| n == (2, 0), (0, 0), 0.));
        let nodes = visibility.nodes();
        assert!(!nodes.contains(&(4, 0)), "shadowed along the axis");
        assert!(nodes.contains(&(0, 4)));
        assert!(nodes.contains(&(4, 4)));
    }

    #[test]
    fn radius_limits_the_sweep() {
        let grid = RegionGrid(TestGrid::open(9, 9));
        let mut visibility = Visibility::new(&grid);
        assert!(visibility.find(|_| false, (4, 4), 1.5));
        // the four orthogonal neighbors plus the four diagonals
        assert_eq!(visibility.nodes().len(), 8);
    }

    #[test]
    fn threshold_validation() {
        let grid = RegionGrid(TestGrid::open(3, 3));
        let mut visibility = Visibility::new(&grid);
        assert!(visibility.set_threshold(0.5).is_ok());
        assert_eq!(
            visibility.set_threshold(1.5),
            Err(GeometryError::InvalidThreshold)
        );
    }

    #[test]
    fn point_nodes_occlude_exact_alignments() {
        // no world regions: occlusion degenerates to exact rays
        let grid = TestGrid::open(5, 1);
        let mut visibility = Visibility::new(&grid);
        assert!(visibility.find(|&n| n == (1, 0), (0, 0), 0.));
        assert_eq!(visibility.nodes(), &[(1, 0)]);
    }
}
