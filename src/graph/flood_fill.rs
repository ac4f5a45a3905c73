use super::GraphLike;
use std::collections::{HashSet, VecDeque};

/// Predicate-driven flood fill: every node connected to a source through
/// a path of nodes satisfying a caller-supplied match predicate.
pub struct FloodFill<'a, G: GraphLike> {
    graph: &'a G,
    nodes: Vec<G::Node>,
}

impl<'a, G: GraphLike> FloodFill<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            nodes: Vec::new(),
        }
    }

    /// The matching region found by the last search, excluding the source,
    /// in breadth-first order.
    pub fn nodes(&self) -> &[G::Node] {
        &self.nodes
    }

    /// Fills outward from `source` over nodes for which `matches` returns
    /// true. The source itself must match, otherwise the fill is empty
    /// and `false` is returned.
    pub fn find<F>(&mut self, mut matches: F, source: G::Node) -> bool
    where
        F: FnMut(&G::Node) -> bool,
    {
        self.nodes.clear();
        if !self.graph.contains_node(&source) || !matches(&source) {
            return false;
        }
        let mut seen: HashSet<G::Node> = HashSet::from([source]);
        let mut queue: VecDeque<G::Node> = VecDeque::from([source]);
        while let Some(node) = queue.pop_front() {
            for neighbor in self.graph.neighbors(&node) {
                if seen.contains(&neighbor) || !matches(&neighbor) {
                    continue;
                }
                seen.insert(neighbor);
                self.nodes.push(neighbor);
                queue.push_back(neighbor);
            }
        }
        !self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_graphs::TestGrid;
    use super::*;

    #[test]
    fn fills_a_bounded_region() {
        let grid = TestGrid::open(6, 6);
        // the region is the 2x6 left band
        let mut fill = FloodFill::new(&grid);
        assert!(fill.find(|&(x, _)| x < 2, (0, 0)));
        assert_eq!(fill.nodes().len(), 11);
        assert!(fill.nodes().iter().all(|&(x, _)| x < 2));
    }

    #[test]
    fn non_matching_source_fails() {
        let grid = TestGrid::open(4, 4);
        let mut fill = FloodFill::new(&grid);
        assert!(!fill.find(|&(x, _)| x > 2, (0, 0)));
        assert!(fill.nodes().is_empty());
    }

    #[test]
    fn disconnected_matches_are_not_reached() {
        let grid = TestGrid::open(5, 1);
        // columns 0 and 4 match but column 2 separates them
        let mut fill = FloodFill::new(&grid);
        assert!(fill.find(|&(x, _)| x != 2, (0, 0)));
        assert_eq!(fill.nodes(), &[(1, 0)]);
    }
}
