//! Point location: a brute-force face scan plus a trapezoidal-map search
//! structure with ordered or randomized construction.

use super::{EdgeKey, FaceKey, Subdivision, UNBOUNDED_FACE};
use crate::algorithm::polygon::{point_in_polygon, polygon_area, PolygonLocation};
use crate::geometry::Point;
use crate::kernels::{orient2d, Orientation};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cmp::Ordering;

impl Subdivision {
    /// The face containing `q`, by testing every bounded face's outer
    /// polygon and keeping the innermost hit. Points on a boundary report
    /// the innermost bounded face whose closure contains them.
    pub fn find_face(&self, q: Point) -> FaceKey {
        let mut best: Option<(FaceKey, f64)> = None;
        for (key, face) in &self.faces {
            let Some(outer) = face.outer_edge else {
                continue;
            };
            let polygon = self.cycle_polygon(outer);
            if point_in_polygon(q, &polygon, self.epsilon) == PolygonLocation::Outside {
                continue;
            }
            let size = polygon_area(&polygon).abs();
            if best.map_or(true, |(_, prev)| size < prev) {
                best = Some((*key, size));
            }
        }
        best.map_or(UNBOUNDED_FACE, |(key, _)| key)
    }

    /// The edge minimizing the distance to `q`, with that distance. One
    /// key per twin pair is reported (the lower one).
    pub fn find_nearest_edge(&self, q: Point) -> Option<(EdgeKey, f64)> {
        let mut best: Option<(EdgeKey, f64)> = None;
        for (&key, edge) in &self.edges {
            if key > edge.twin {
                continue;
            }
            let d2 = self.edge_line(key).distance_squared(q);
            if best.map_or(true, |(_, prev)| d2 < prev) {
                best = Some((key, d2));
            }
        }
        best.map(|(key, d2)| (key, d2.sqrt()))
    }

    /// The vertex position nearest to `q`.
    pub fn find_nearest_vertex(&self, q: Point) -> Option<Point> {
        self.vertices.find_nearest(q).map(|(p, _)| p)
    }

    /// Builds a trapezoidal-map locator for the current structure. The
    /// locator is a snapshot: it does not track later edits.
    pub fn locator(&self, strategy: LocatorStrategy) -> FaceLocator {
        FaceLocator::build(self, strategy)
    }
}

/// Construction order of the [`FaceLocator`] search structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocatorStrategy {
    /// Insert edges in a deterministic lexicographic sweep. Queries are
    /// O(log n) on realistic inputs, but adversarial insertion orders can
    /// degrade the structure.
    Ordered,
    /// Insert edges in a seeded random permutation; expected O(log n)
    /// query time regardless of the input.
    Randomized(u64),
}

/// A segment of the trapezoidal map. Endpoints are ordered by the
/// lexicographic (x, y) "shear" order, which gives vertical segments a
/// consistent left and right end.
struct MapSegment {
    left: Point,
    right: Point,
    /// Face on the negative-orientation side, the answer for queries whose
    /// upward ray hits this segment.
    face_below: FaceKey,
}

/// One node of the history DAG.
enum Node {
    /// Split by the vertical line through an endpoint: strictly smaller
    /// points go left, ties go right.
    X { p: Point, left: usize, right: usize },
    /// Split by a segment: positive orientation goes above.
    Y { seg: usize, above: usize, below: usize },
    Leaf { trap: usize },
}

struct Trapezoid {
    /// Bounding segment on the positive-orientation side, if any.
    top: Option<usize>,
    leftp: Point,
    rightp: Point,
    leaf: usize,
}

/// A trapezoidal-map point locator over a subdivision snapshot.
///
/// # Examples
///
/// ```
/// use tessella::subdivision::LocatorStrategy;
/// use tessella::{point, Subdivision};
///
/// let square = [
///     point!(0.0, 0.0),
///     point!(4.0, 0.0),
///     point!(4.0, 4.0),
///     point!(0.0, 4.0),
/// ];
/// let sub = Subdivision::from_polygons(&[&square[..]], 0.0).unwrap();
/// let locator = sub.locator(LocatorStrategy::Randomized(7));
/// assert_eq!(locator.locate(point!(2.0, 2.0)), sub.find_face(point!(2.0, 2.0)));
/// ```
pub struct FaceLocator {
    segments: Vec<MapSegment>,
    nodes: Vec<Node>,
    traps: Vec<Trapezoid>,
    root: usize,
}

#[inline]
fn lex_xy(a: Point, b: Point) -> Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
}

impl FaceLocator {
    fn build(sub: &Subdivision, strategy: LocatorStrategy) -> Self {
        let mut segments: Vec<MapSegment> = Vec::new();
        for (key, edge) in sub.edges() {
            if key > edge.twin() {
                continue;
            }
            let a = edge.origin();
            let b = sub.destination(key);
            let (left, right, below_key) = if lex_xy(a, b) == Ordering::Less {
                (a, b, key)
            } else {
                (b, a, edge.twin())
            };
            segments.push(MapSegment {
                left,
                right,
                face_below: sub.get_edge(below_key).expect("edge exists").face(),
            });
        }

        let mut order: Vec<usize> = (0..segments.len()).collect();
        match strategy {
            LocatorStrategy::Ordered => order.sort_by(|&a, &b| {
                lex_xy(segments[a].left, segments[b].left)
                    .then_with(|| lex_xy(segments[a].right, segments[b].right))
            }),
            LocatorStrategy::Randomized(seed) => {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                order.shuffle(&mut rng);
            }
        }

        let bounds = sub
            .bounds()
            .unwrap_or_else(|| crate::Rect::new(Point::new(0., 0.), Point::new(0., 0.)))
            .inflate(1.);
        let mut locator = FaceLocator {
            segments,
            nodes: vec![Node::Leaf { trap: 0 }],
            traps: vec![Trapezoid {
                top: None,
                leftp: bounds.min(),
                rightp: bounds.max(),
                leaf: 0,
            }],
            root: 0,
        };
        for seg in order {
            locator.insert(seg);
        }
        locator
    }

    /// The face containing `q`. Boundary queries resolve to one of the
    /// two adjacent faces.
    pub fn locate(&self, q: Point) -> FaceKey {
        let mut node = self.root;
        loop {
            match &self.nodes[node] {
                Node::X { p, left, right } => {
                    node = if lex_xy(q, *p) == Ordering::Less {
                        *left
                    } else {
                        *right
                    };
                }
                Node::Y { seg, above, below } => {
                    let s = &self.segments[*seg];
                    node = match orient2d(s.left, s.right, q) {
                        Orientation::CounterClockwise => *above,
                        _ => *below,
                    };
                }
                Node::Leaf { trap } => {
                    return self.traps[*trap]
                        .top
                        .map_or(UNBOUNDED_FACE, |seg| self.segments[seg].face_below);
                }
            }
        }
    }

    /// Finds the trapezoid containing a point infinitesimally to the
    /// right of `p` along the segment being inserted.
    fn locate_for_insert(&self, p: Point, seg: usize) -> usize {
        let s_right = self.segments[seg].right;
        let mut node = self.root;
        loop {
            match &self.nodes[node] {
                Node::X { p: px, left, right } => {
                    node = if lex_xy(p, *px) == Ordering::Less {
                        *left
                    } else {
                        *right
                    };
                }
                Node::Y {
                    seg: other,
                    above,
                    below,
                } => {
                    let o = &self.segments[*other];
                    node = match orient2d(o.left, o.right, p) {
                        Orientation::CounterClockwise => *above,
                        Orientation::Clockwise => *below,
                        Orientation::Collinear => {
                            // shared endpoint: the new segment's slope
                            // decides which side its interior continues on
                            match orient2d(o.left, o.right, s_right) {
                                Orientation::CounterClockwise => *above,
                                _ => *below,
                            }
                        }
                    }
                }
                Node::Leaf { trap } => return *trap,
            }
        }
    }

    fn new_leaf(&mut self, top: Option<usize>, leftp: Point, rightp: Point) -> usize {
        let trap = self.traps.len();
        let leaf = self.nodes.len();
        self.nodes.push(Node::Leaf { trap });
        self.traps.push(Trapezoid {
            top,
            leftp,
            rightp,
            leaf,
        });
        trap
    }

    fn push_node(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn insert(&mut self, seg: usize) {
        let l = self.segments[seg].left;
        let r = self.segments[seg].right;

        // the chain of trapezoids crossed by the segment, found by
        // repeated history queries instead of neighbor links
        let mut crossed = vec![self.locate_for_insert(l, seg)];
        loop {
            let last = &self.traps[*crossed.last().expect("chain is non-empty")];
            if lex_xy(last.rightp, r) != Ordering::Less {
                break;
            }
            let wall = last.rightp;
            crossed.push(self.locate_for_insert(wall, seg));
        }

        let first = crossed[0];
        let last = *crossed.last().expect("chain is non-empty");
        let left_remainder = lex_xy(self.traps[first].leftp, l) == Ordering::Less;
        let right_remainder = lex_xy(r, self.traps[last].rightp) == Ordering::Less;

        // build the merged chains above and below the new segment: a wall
        // between two crossed trapezoids interrupts the chain on its own
        // side of the segment and is bridged on the other
        let mut above_leaf: Vec<usize> = Vec::with_capacity(crossed.len());
        let mut below_leaf: Vec<usize> = Vec::with_capacity(crossed.len());
        let mut current_above = self.new_leaf(self.traps[crossed[0]].top, l, r);
        let mut current_below = self.new_leaf(Some(seg), l, r);
        for (i, &trap) in crossed.iter().enumerate() {
            let span_right = if i + 1 == crossed.len() {
                r
            } else {
                self.traps[trap].rightp
            };
            if i > 0 {
                let wall = self.traps[crossed[i - 1]].rightp;
                let side =
                    orient2d(self.segments[seg].left, self.segments[seg].right, wall);
                if side == Orientation::CounterClockwise {
                    let top = self.traps[trap].top;
                    current_above = self.new_leaf(top, wall, span_right);
                } else {
                    current_below = self.new_leaf(Some(seg), wall, span_right);
                }
            }
            self.traps[current_above].rightp = span_right;
            self.traps[current_below].rightp = span_right;
            above_leaf.push(self.traps[current_above].leaf);
            below_leaf.push(self.traps[current_below].leaf);
        }

        // remainder trapezoids keep the original bounds
        let left_trap = left_remainder.then(|| {
            let t = self.traps[first].top;
            let lp = self.traps[first].leftp;
            self.new_leaf(t, lp, l)
        });
        let right_trap = right_remainder.then(|| {
            let t = self.traps[last].top;
            let rp = self.traps[last].rightp;
            self.new_leaf(t, r, rp)
        });

        // splice the subtrees into the history DAG, replacing each crossed
        // trapezoid's leaf node in place so that every parent sees the new
        // subtree
        for (i, &trap) in crossed.iter().enumerate() {
            let mut root = Node::Y {
                seg,
                above: above_leaf[i],
                below: below_leaf[i],
            };
            if i + 1 == crossed.len() {
                if let Some(bt) = right_trap {
                    let inner = self.push_node(root);
                    root = Node::X {
                        p: r,
                        left: inner,
                        right: self.traps[bt].leaf,
                    };
                }
            }
            if i == 0 {
                if let Some(at) = left_trap {
                    let inner = self.push_node(root);
                    root = Node::X {
                        p: l,
                        left: self.traps[at].leaf,
                        right: inner,
                    };
                }
            }
            let leaf_slot = self.traps[trap].leaf;
            self.nodes[leaf_slot] = root;
        }
    }
}
