use super::{GraphAgent, GraphLike, MinScored};
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

/// Best-path search with the straight-line distance as an admissible
/// heuristic.
///
/// The open queue is keyed by `f = g + h`; among equal `f` the entry with
/// the larger `g` is expanded first, which prefers paths that are nearly
/// complete. After a successful [`find`](Self::find) the node sequence
/// from source (exclusive) to target (inclusive) is available through
/// [`nodes`](Self::nodes).
///
/// # Examples
///
/// ```
/// use tessella::graph::{AStar, GraphAgent};
/// use tessella::grid::{GridPoint, PolygonGrid, RegularPolygon};
///
/// struct Walker;
/// impl GraphAgent<GridPoint> for Walker {
///     fn can_make_step(&self, _: &GridPoint, _: &GridPoint) -> bool { true }
///     fn can_occupy(&self, _: &GridPoint) -> bool { true }
///     fn step_cost(&self, _: &GridPoint, _: &GridPoint) -> f64 { 1.0 }
/// }
///
/// let mut grid = PolygonGrid::new(RegularPolygon::square(1.0).unwrap()).unwrap();
/// grid.set_size(8, 8).unwrap();
/// let mut astar = AStar::new(&grid);
/// assert!(astar.find(&Walker, GridPoint::new(0, 0), GridPoint::new(7, 7)));
/// assert_eq!(astar.nodes().len(), 14);
/// ```
pub struct AStar<'a, G: GraphLike> {
    graph: &'a G,
    use_world_distance: bool,
    nodes: Vec<G::Node>,
    total_cost: f64,
}

impl<'a, G: GraphLike> AStar<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            use_world_distance: false,
            nodes: Vec::new(),
            total_cost: 0.,
        }
    }

    /// Scales agent step costs by the world distance of each step. Keeps
    /// the straight-line heuristic admissible for graphs whose agents
    /// report abstract per-step costs, provided those costs never drop
    /// below one.
    pub fn use_world_distance(&mut self, enabled: bool) {
        self.use_world_distance = enabled;
    }

    /// The best path found by the last successful search, from the node
    /// after the source up to and including the target.
    pub fn nodes(&self) -> &[G::Node] {
        &self.nodes
    }

    /// Total cost of the last path found.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Searches for a best path from `source` to a node satisfying the
    /// agent's goal test against `target`. Returns whether a path was
    /// found.
    pub fn find<A: GraphAgent<G::Node>>(
        &mut self,
        agent: &A,
        source: G::Node,
        target: G::Node,
    ) -> bool {
        self.nodes.clear();
        self.total_cost = 0.;
        if !self.graph.contains_node(&source) || !self.graph.contains_node(&target) {
            return false;
        }

        let mut open = BinaryHeap::new();
        let mut g_score: HashMap<G::Node, f64> = HashMap::new();
        let mut parent: HashMap<G::Node, G::Node> = HashMap::new();

        g_score.insert(source, 0.);
        open.push(MinScored((self.graph.distance(&source, &target), 0.), source));

        while let Some(MinScored((_, neg_g), node)) = open.pop() {
            let g = -neg_g;
            if g_score.get(&node).copied().unwrap_or(f64::INFINITY) < g {
                continue; // superseded entry
            }
            if agent.is_near_target(&node, &target, 0.) && agent.can_occupy(&node) {
                self.total_cost = g;
                let mut path = vec![node];
                let mut current = node;
                while let Some(&prev) = parent.get(&current) {
                    path.push(prev);
                    current = prev;
                }
                path.pop(); // drop the source
                path.reverse();
                self.nodes = path;
                return true;
            }
            for neighbor in self.graph.neighbors(&node) {
                if !agent.can_make_step(&node, &neighbor) {
                    continue;
                }
                let step = self.effective_cost(agent, &node, &neighbor);
                let tentative = g + step;
                let better = match g_score.entry(neighbor) {
                    Entry::Vacant(slot) => {
                        slot.insert(tentative);
                        true
                    }
                    Entry::Occupied(mut slot) => {
                        if tentative < *slot.get() {
                            slot.insert(tentative);
                            true
                        } else {
                            false
                        }
                    }
                };
                if better {
                    parent.insert(neighbor, node);
                    let h = self.graph.distance(&neighbor, &target);
                    open.push(MinScored((tentative + h, -tentative), neighbor));
                }
            }
        }
        false
    }

    fn effective_cost<A: GraphAgent<G::Node>>(
        &self,
        agent: &A,
        source: &G::Node,
        target: &G::Node,
    ) -> f64 {
        let cost = agent.step_cost(source, target);
        debug_assert!(cost >= 0., "agent step costs must be non-negative");
        let effective = if self.use_world_distance {
            cost * self.graph.distance(source, target)
        } else {
            cost
        };
        debug_assert!(
            effective + 1e-9 >= self.graph.distance(source, target) || !self.use_world_distance,
            "scaled step cost dropped below the heuristic"
        );
        effective
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_graphs::{TestAgent, TestGrid};
    use super::*;

    #[test]
    fn finds_a_manhattan_path() {
        let grid = TestGrid::open(5, 5);
        let agent = TestAgent { grid: &grid };
        let mut astar = AStar::new(&grid);
        assert!(astar.find(&agent, (0, 0), (4, 3)));
        assert_eq!(astar.nodes().len(), 7);
        assert_eq!(astar.nodes().last(), Some(&(4, 3)));
        assert!(!astar.nodes().contains(&(0, 0)));
        assert_eq!(astar.total_cost(), 7.0);
    }

    #[test]
    fn routes_around_a_wall() {
        let mut grid = TestGrid::open(5, 5);
        // vertical wall with a gap at the bottom
        grid.blocked = vec![(2, 1), (2, 2), (2, 3), (2, 4)];
        let agent = TestAgent { grid: &grid };
        let mut astar = AStar::new(&grid);
        assert!(astar.find(&agent, (0, 2), (4, 2)));
        let path = astar.nodes();
        assert!(path.contains(&(2, 0)), "path must use the gap: {path:?}");
        assert_eq!(astar.total_cost(), 8.0);
    }

    #[test]
    fn fails_when_walled_off() {
        let mut grid = TestGrid::open(3, 3);
        grid.blocked = vec![(1, 0), (1, 1), (1, 2)];
        let agent = TestAgent { grid: &grid };
        let mut astar = AStar::new(&grid);
        assert!(!astar.find(&agent, (0, 0), (2, 0)));
        assert!(astar.nodes().is_empty());
    }

    #[test]
    fn trivial_search_ends_at_the_source() {
        let grid = TestGrid::open(3, 3);
        let agent = TestAgent { grid: &grid };
        let mut astar = AStar::new(&grid);
        assert!(astar.find(&agent, (1, 1), (1, 1)));
        assert!(astar.nodes().is_empty());
        assert_eq!(astar.total_cost(), 0.0);
    }

    #[test]
    fn path_cost_is_at_least_the_straight_line() {
        let grid = TestGrid::open(9, 9);
        let agent = TestAgent { grid: &grid };
        let mut astar = AStar::new(&grid);
        assert!(astar.find(&agent, (0, 0), (8, 5)));
        assert!(astar.total_cost() >= grid.distance(&(0, 0), &(8, 5)));
    }
}
