use super::{GraphAgent, GraphLike, MinScored};
use std::collections::{BinaryHeap, HashMap};

/// Bounded-cost reachability: every node the agent can reach and occupy
/// from a source within a cost budget (Dijkstra with a cutoff).
///
/// With [`GraphAgent::relaxed_range`] the final step may overdraw the
/// budget: a node is still included when its predecessor was affordable,
/// even if the node's own cost exceeds the budget by that last step.
pub struct Coverage<'a, G: GraphLike> {
    graph: &'a G,
    nodes: Vec<G::Node>,
}

impl<'a, G: GraphLike> Coverage<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            nodes: Vec::new(),
        }
    }

    /// The nodes reached by the last search, excluding the source, in
    /// ascending cost order.
    pub fn nodes(&self) -> &[G::Node] {
        &self.nodes
    }

    /// Collects all nodes reachable from `source` within `budget`.
    /// Returns whether any node was reached.
    pub fn find<A: GraphAgent<G::Node>>(
        &mut self,
        agent: &A,
        source: G::Node,
        budget: f64,
    ) -> bool {
        self.nodes.clear();
        if !self.graph.contains_node(&source) || budget < 0. {
            return false;
        }

        let mut best: HashMap<G::Node, f64> = HashMap::from([(source, 0.)]);
        let mut heap = BinaryHeap::from([MinScored(0., source)]);
        let mut reached: Vec<(f64, G::Node)> = Vec::new();

        while let Some(MinScored(g, node)) = heap.pop() {
            if best.get(&node).copied().unwrap_or(f64::INFINITY) < g {
                continue;
            }
            if node != source {
                reached.push((g, node));
            }
            if g >= budget {
                continue; // a relaxed overshoot node is terminal
            }
            for neighbor in self.graph.neighbors(&node) {
                if !agent.can_make_step(&node, &neighbor) {
                    continue;
                }
                let step = agent.step_cost(&node, &neighbor);
                debug_assert!(step >= 0., "agent step costs must be non-negative");
                let tentative = g + step;
                if tentative > budget && !agent.relaxed_range() {
                    continue;
                }
                if tentative < best.get(&neighbor).copied().unwrap_or(f64::INFINITY) {
                    best.insert(neighbor, tentative);
                    heap.push(MinScored(tentative, neighbor));
                }
            }
        }

        reached.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        self.nodes = reached
            .into_iter()
            .map(|(_, node)| node)
            .filter(|node| agent.can_occupy(node))
            .collect();
        !self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_graphs::{TestAgent, TestGrid};
    use super::*;

    #[test]
    fn covers_a_diamond_within_budget() {
        let grid = TestGrid::open(9, 9);
        let agent = TestAgent { grid: &grid };
        let mut coverage = Coverage::new(&grid);
        assert!(coverage.find(&agent, (4, 4), 2.0));
        // all cells with manhattan distance 1 or 2
        assert_eq!(coverage.nodes().len(), 12);
        assert!(coverage.nodes().contains(&(4, 6)));
        assert!(!coverage.nodes().contains(&(4, 4)));
        assert!(!coverage.nodes().contains(&(7, 4)));
    }

    #[test]
    fn blocked_cells_interrupt_coverage() {
        let mut grid = TestGrid::open(5, 1);
        grid.blocked = vec![(2, 0)];
        let agent = TestAgent { grid: &grid };
        let mut coverage = Coverage::new(&grid);
        assert!(coverage.find(&agent, (0, 0), 10.0));
        assert_eq!(coverage.nodes(), &[(1, 0)]);
    }

    #[test]
    fn zero_budget_reaches_nothing() {
        let grid = TestGrid::open(3, 3);
        let agent = TestAgent { grid: &grid };
        let mut coverage = Coverage::new(&grid);
        assert!(!coverage.find(&agent, (1, 1), 0.0));
        assert!(coverage.nodes().is_empty());
    }

    struct RelaxedAgent<'a> {
        inner: TestAgent<'a>,
    }

    impl GraphAgent<(i32, i32)> for RelaxedAgent<'_> {
        fn can_make_step(&self, s: &(i32, i32), t: &(i32, i32)) -> bool {
            self.inner.can_make_step(s, t)
        }
        fn can_occupy(&self, t: &(i32, i32)) -> bool {
            self.inner.can_occupy(t)
        }
        fn step_cost(&self, s: &(i32, i32), t: &(i32, i32)) -> f64 {
            self.inner.step_cost(s, t)
        }
        fn relaxed_range(&self) -> bool {
            true
        }
    }

    #[test]
    fn relaxed_range_allows_one_overshoot_step() {
        let grid = TestGrid::open(9, 1);
        let strict = TestAgent { grid: &grid };
        let relaxed = RelaxedAgent {
            inner: TestAgent { grid: &grid },
        };
        let mut coverage = Coverage::new(&grid);

        assert!(coverage.find(&strict, (0, 0), 2.5));
        assert_eq!(coverage.nodes(), &[(1, 0), (2, 0)]);

        assert!(coverage.find(&relaxed, (0, 0), 2.5));
        assert_eq!(coverage.nodes(), &[(1, 0), (2, 0), (3, 0)]);
    }
}
