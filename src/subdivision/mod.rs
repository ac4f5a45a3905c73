//! A planar subdivision as a doubly-connected edge list (DCEL).
//!
//! Every undirected edge appears as a twin pair of directed **half-edges**.
//! A half-edge knows its origin vertex, its `twin`, the `next` and
//! `previous` half-edges along the boundary cycle of its incident `face`,
//! and that face. Faces record one representative half-edge of their outer
//! boundary (none for the unbounded face) plus one representative per
//! inner hole boundary.
//!
//! Vertices are identified by their position and kept in an ordered map
//! under the subdivision's tolerance; half-edges and faces live in keyed
//! tables whose keys are assigned monotonically and compacted on demand by
//! the renumber operations.
//!
//! Signed areas follow the screen convention (y grows downward): the
//! outer boundary cycle of a bounded face has negative signed area, hole
//! cycles positive.
//!
//! # Examples
//!
//! ```
//! use tessella::{point, Subdivision};
//!
//! let square = [
//!     point!(-1.0, -2.0),
//!     point!(-1.0, 2.0),
//!     point!(1.0, 2.0),
//!     point!(1.0, -2.0),
//! ];
//! let sub = Subdivision::from_polygons(&[&square[..]], 0.0).unwrap();
//! assert_eq!(sub.vertex_count(), 4);
//! assert_eq!(sub.edge_count(), 8);
//! assert_eq!(sub.face_count(), 2);
//! sub.validate().unwrap();
//! ```

mod build;
mod edit;
mod graph;
mod locate;
mod overlay;

pub use graph::SubdivisionGraph;
pub use locate::{FaceLocator, LocatorStrategy};
pub use overlay::SubdivisionIntersection;

use crate::algorithm::polygon::polygon_area;
use crate::collections::PointMap;
use crate::error::GeometryError;
use crate::geometry::{Line, Point, Rect};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key of a half-edge in a [`Subdivision`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey(pub u32);

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeKey({})", self.0)
    }
}

/// Key of a face in a [`Subdivision`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceKey(pub u32);

impl fmt::Display for FaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FaceKey({})", self.0)
    }
}

/// The unbounded face, present in every subdivision.
pub const UNBOUNDED_FACE: FaceKey = FaceKey(0);

/// Errors raised by subdivision construction and editing. Failed
/// mutations leave the subdivision unchanged.
#[derive(Clone, Debug, PartialEq)]
pub enum SubdivisionError {
    /// The edge endpoints coincide under the tolerance.
    DegenerateEdge,
    /// The operation would make an edge cross another edge or pass over a
    /// vertex.
    EdgeCrossing,
    /// The position collides with an existing vertex.
    VertexOverlap,
    /// An edge between the two endpoints already exists.
    EdgeExists,
    /// Input segments cross away from shared endpoints; pre-split them
    /// with [`line_crossings`](crate::algorithm::line_crossings) first.
    CrossingInput,
    /// No half-edge under this key.
    UnknownEdge(EdgeKey),
    /// No vertex at this position under the tolerance.
    UnknownVertex,
    /// The vertex does not have degree exactly two.
    VertexNotDegreeTwo,
    /// The comparison tolerance is negative.
    InvalidEpsilon,
    /// `validate` found a broken structural invariant. Indicates a bug in
    /// this library rather than bad input.
    Invariant(String),
}

impl fmt::Display for SubdivisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubdivisionError::DegenerateEdge => {
                write!(f, "edge endpoints coincide under the tolerance")
            }
            SubdivisionError::EdgeCrossing => {
                write!(f, "edge would cross an existing edge or vertex")
            }
            SubdivisionError::VertexOverlap => {
                write!(f, "position collides with an existing vertex")
            }
            SubdivisionError::EdgeExists => write!(f, "edge already exists"),
            SubdivisionError::CrossingInput => {
                write!(f, "input segments cross away from shared endpoints")
            }
            SubdivisionError::UnknownEdge(key) => write!(f, "no half-edge {key}"),
            SubdivisionError::UnknownVertex => write!(f, "no vertex at this position"),
            SubdivisionError::VertexNotDegreeTwo => {
                write!(f, "vertex does not have degree two")
            }
            SubdivisionError::InvalidEpsilon => write!(f, "comparison tolerance is negative"),
            SubdivisionError::Invariant(msg) => write!(f, "invariant violation: {msg}"),
        }
    }
}

impl std::error::Error for SubdivisionError {}

impl From<GeometryError> for SubdivisionError {
    fn from(e: GeometryError) -> Self {
        match e {
            GeometryError::InvalidEpsilon => SubdivisionError::InvalidEpsilon,
            GeometryError::DegenerateLine => SubdivisionError::DegenerateEdge,
            _ => SubdivisionError::Invariant(e.to_string()),
        }
    }
}

/// One directed half of a subdivision edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfEdge {
    pub(crate) origin: Point,
    pub(crate) twin: EdgeKey,
    pub(crate) next: EdgeKey,
    pub(crate) previous: EdgeKey,
    pub(crate) face: FaceKey,
}

impl HalfEdge {
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn twin(&self) -> EdgeKey {
        self.twin
    }

    #[inline]
    pub fn next(&self) -> EdgeKey {
        self.next
    }

    #[inline]
    pub fn previous(&self) -> EdgeKey {
        self.previous
    }

    #[inline]
    pub fn face(&self) -> FaceKey {
        self.face
    }
}

/// A face: one maximal connected region of the plane.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Face {
    pub(crate) outer_edge: Option<EdgeKey>,
    pub(crate) inner_edges: Vec<EdgeKey>,
}

impl Face {
    /// A half-edge on the outer boundary cycle; `None` for the unbounded
    /// face.
    #[inline]
    pub fn outer_edge(&self) -> Option<EdgeKey> {
        self.outer_edge
    }

    /// One representative half-edge per inner hole boundary.
    #[inline]
    pub fn inner_edges(&self) -> &[EdgeKey] {
        &self.inner_edges
    }
}

/// A planar subdivision (doubly-connected edge list).
#[derive(Clone, Debug)]
pub struct Subdivision {
    pub(crate) epsilon: f64,
    /// Vertex position -> one outgoing half-edge.
    pub(crate) vertices: PointMap<EdgeKey>,
    pub(crate) edges: BTreeMap<EdgeKey, HalfEdge>,
    pub(crate) faces: BTreeMap<FaceKey, Face>,
    pub(crate) next_edge: u32,
    pub(crate) next_face: u32,
}

impl Subdivision {
    /// Creates an empty subdivision with the given vertex tolerance. The
    /// unbounded face is pre-inserted.
    pub fn new(epsilon: f64) -> Result<Self, SubdivisionError> {
        Ok(Self {
            epsilon,
            vertices: PointMap::new(epsilon).map_err(SubdivisionError::from)?,
            edges: BTreeMap::new(),
            faces: BTreeMap::from([(UNBOUNDED_FACE, Face::default())]),
            next_edge: 0,
            next_face: 1,
        })
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of half-edges (twice the number of undirected edges).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces including the unbounded face.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn get_edge(&self, key: EdgeKey) -> Option<&HalfEdge> {
        self.edges.get(&key)
    }

    pub fn get_face(&self, key: FaceKey) -> Option<&Face> {
        self.faces.get(&key)
    }

    /// Iterates vertex positions with one outgoing half-edge each, in
    /// y-then-x order.
    pub fn vertices(&self) -> impl Iterator<Item = (Point, EdgeKey)> + '_ {
        self.vertices.iter().map(|(p, &e)| (p, e))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &HalfEdge)> {
        self.edges.iter().map(|(&k, e)| (k, e))
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceKey, &Face)> {
        self.faces.iter().map(|(&k, f)| (k, f))
    }

    /// The vertex representative at `p` under the tolerance.
    pub fn find_vertex(&self, p: Point) -> Option<Point> {
        self.vertices.representative(p)
    }

    /// The half-edge from `p` to `q`, if both are vertices joined by an
    /// edge.
    pub fn find_edge(&self, p: Point, q: Point) -> Option<EdgeKey> {
        let q = self.vertices.representative(q)?;
        self.vertex_star(p)?
            .into_iter()
            .find(|&e| self.destination(e) == q)
    }

    /// Destination vertex of a half-edge (the twin's origin).
    pub fn destination(&self, key: EdgeKey) -> Point {
        self.edges[&self.edges[&key].twin].origin
    }

    /// The world segment of a half-edge, directed from its origin.
    pub fn edge_line(&self, key: EdgeKey) -> Line {
        Line::new(self.edges[&key].origin, self.destination(key))
    }

    /// All outgoing half-edges at the vertex `p`, in clockwise angular
    /// order starting from the stored representative. `None` when `p` is
    /// not a vertex.
    pub fn vertex_star(&self, p: Point) -> Option<Vec<EdgeKey>> {
        let rep = self.vertices.representative(p)?;
        let start = *self.vertices.get(rep)?;
        let mut out = vec![start];
        let mut current = self.edges[&self.edges[&start].twin].next;
        while current != start {
            out.push(current);
            current = self.edges[&self.edges[&current].twin].next;
        }
        Some(out)
    }

    /// Number of edges incident to the vertex at `p`.
    pub fn vertex_degree(&self, p: Point) -> usize {
        self.vertex_star(p).map_or(0, |star| star.len())
    }

    /// Positions adjacent to the vertex at `p`.
    pub fn vertex_neighbors(&self, p: Point) -> Vec<Point> {
        self.vertex_star(p)
            .map(|star| star.into_iter().map(|e| self.destination(e)).collect())
            .unwrap_or_default()
    }

    /// The half-edge keys of the boundary cycle through `start`, in `next`
    /// order.
    pub fn cycle(&self, start: EdgeKey) -> Vec<EdgeKey> {
        let mut out = vec![start];
        let mut current = self.edges[&start].next;
        while current != start {
            out.push(current);
            current = self.edges[&current].next;
        }
        out
    }

    /// Origin positions along the boundary cycle through `start`.
    pub fn cycle_polygon(&self, start: EdgeKey) -> Vec<Point> {
        self.cycle(start)
            .into_iter()
            .map(|e| self.edges[&e].origin)
            .collect()
    }

    /// Signed area of the boundary cycle through `start`. Outer cycles of
    /// bounded faces are negative, hole cycles positive.
    pub fn cycle_area(&self, start: EdgeKey) -> f64 {
        polygon_area(&self.cycle_polygon(start))
    }

    /// Enclosed area of a bounded face's outer boundary; `None` for the
    /// unbounded face. Holes are not subtracted.
    pub fn face_area(&self, key: FaceKey) -> Option<f64> {
        let outer = self.faces.get(&key)?.outer_edge?;
        Some(-self.cycle_area(outer))
    }

    /// The outer boundary polygon of a bounded face.
    pub fn face_polygon(&self, key: FaceKey) -> Option<Vec<Point>> {
        let outer = self.faces.get(&key)?.outer_edge?;
        Some(self.cycle_polygon(outer))
    }

    /// The smallest rectangle containing all vertices; `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        let mut it = self.vertices.keys();
        let first = it.next()?;
        let mut rect = Rect::from_corners(first, first);
        for p in it {
            rect = rect.union(Rect::from_corners(p, p));
        }
        Some(rect)
    }

    /// Every undirected edge as a world segment, one per twin pair,
    /// directed from the lower-keyed half-edge.
    pub fn to_lines(&self) -> Vec<Line> {
        self.edges
            .iter()
            .filter(|(&k, e)| k < e.twin)
            .map(|(&k, _)| self.edge_line(k))
            .collect()
    }

    /// The outer boundary polygons of all bounded faces.
    pub fn to_polygons(&self) -> Vec<Vec<Point>> {
        self.faces
            .iter()
            .filter_map(|(_, f)| f.outer_edge)
            .map(|e| self.cycle_polygon(e))
            .collect()
    }

    /// Whether all edges are reachable from each other through vertex
    /// stars, ignoring face structure. The empty subdivision is connected.
    pub fn is_connected(&self) -> bool {
        let Some((&start, _)) = self.edges.iter().next() else {
            return true;
        };
        let mut seen = std::collections::BTreeSet::new();
        let mut stack = vec![start];
        while let Some(e) = stack.pop() {
            if !seen.insert(e) {
                continue;
            }
            let rec = &self.edges[&e];
            stack.push(rec.twin);
            stack.push(rec.next);
            stack.push(rec.previous);
        }
        seen.len() == self.edges.len()
    }

    /// Checks every structural invariant, reporting the first violation.
    ///
    /// The checks mirror the documented data model: twin symmetry and
    /// origin consistency, `next`/`previous` inverse linkage, one face per
    /// cycle, cycle orientation signs, vertex uniqueness under the
    /// tolerance, and key consistency of the face records.
    pub fn validate(&self) -> Result<(), SubdivisionError> {
        let fail = |msg: String| Err(SubdivisionError::Invariant(msg));

        for (&key, edge) in &self.edges {
            let Some(twin) = self.edges.get(&edge.twin) else {
                return fail(format!("{key} has a missing twin"));
            };
            if twin.twin != key {
                return fail(format!("{key} twin link is not symmetric"));
            }
            if edge.origin == twin.origin {
                return fail(format!("{key} and its twin share an origin"));
            }
            let Some(next) = self.edges.get(&edge.next) else {
                return fail(format!("{key} has a missing next link"));
            };
            if next.previous != key {
                return fail(format!("{key} next/previous links disagree"));
            }
            if next.origin != twin.origin {
                return fail(format!("{key} next does not start at its destination"));
            }
            let Some(previous) = self.edges.get(&edge.previous) else {
                return fail(format!("{key} has a missing previous link"));
            };
            if previous.next != key {
                return fail(format!("{key} previous/next links disagree"));
            }
            if !self.faces.contains_key(&edge.face) {
                return fail(format!("{key} references a missing face"));
            }
            if self.vertices.representative(edge.origin) != Some(edge.origin) {
                return fail(format!("{key} origin is not a registered vertex"));
            }
        }

        for (&key, face) in &self.faces {
            if key == UNBOUNDED_FACE {
                if face.outer_edge.is_some() {
                    return fail("unbounded face has an outer boundary".into());
                }
            } else {
                let Some(outer) = face.outer_edge else {
                    return fail(format!("{key} has no outer boundary"));
                };
                for e in self.cycle(outer) {
                    if self.edges[&e].face != key {
                        return fail(format!("{key} outer cycle strays into another face"));
                    }
                }
                let area = self.cycle_area(outer);
                if area >= 0. {
                    return fail(format!("{key} outer cycle has non-negative area {area}"));
                }
            }
            for &inner in &face.inner_edges {
                if !self.edges.contains_key(&inner) {
                    return fail(format!("{key} references a missing inner edge"));
                }
                for e in self.cycle(inner) {
                    if self.edges[&e].face != key {
                        return fail(format!("{key} inner cycle strays into another face"));
                    }
                }
                if self.cycle_area(inner) < 0. {
                    return fail(format!("{key} inner cycle has negative area"));
                }
            }
        }

        // every vertex's stored edge must originate there, and the star
        // must close
        for (p, &start) in self.vertices.iter() {
            match self.edges.get(&start) {
                None => return fail(format!("vertex at {p:?} references a missing edge")),
                Some(edge) if edge.origin != p => {
                    return fail(format!("vertex at {p:?} references a foreign edge"));
                }
                _ => {}
            }
            if self.vertex_star(p).is_none() {
                return fail(format!("vertex star at {p:?} does not close"));
            }
        }

        // every cycle must be owned: reachable from a face representative
        let mut owned = std::collections::BTreeSet::new();
        for face in self.faces.values() {
            for start in face.outer_edge.iter().chain(&face.inner_edges) {
                owned.extend(self.cycle(*start));
            }
        }
        if owned.len() != self.edges.len() {
            return fail(format!(
                "{} of {} half-edges belong to no face boundary",
                self.edges.len() - owned.len(),
                self.edges.len()
            ));
        }

        Ok(())
    }

    /// Whether two subdivisions describe the same structure: the same
    /// vertex positions, the same undirected edges, and the same face
    /// decomposition, regardless of key numbering and history.
    pub fn structure_equals(&self, other: &Subdivision) -> bool {
        if self.vertex_count() != other.vertex_count()
            || self.edge_count() != other.edge_count()
            || self.face_count() != other.face_count()
        {
            return false;
        }
        let mine: Vec<Point> = self.vertices.keys().collect();
        let theirs: Vec<Point> = other.vertices.keys().collect();
        if mine != theirs {
            return false;
        }
        normalized_lines(self) == normalized_lines(other)
    }

    pub(crate) fn fresh_edge_pair(&mut self) -> (EdgeKey, EdgeKey) {
        let a = EdgeKey(self.next_edge);
        let b = EdgeKey(self.next_edge + 1);
        self.next_edge += 2;
        (a, b)
    }

    pub(crate) fn fresh_face(&mut self) -> FaceKey {
        let key = FaceKey(self.next_face);
        self.next_face += 1;
        key
    }
}

/// Undirected edges with lexicographically ordered endpoints, sorted; the
/// canonical form used by structural equality and hashing.
fn normalized_lines(sub: &Subdivision) -> Vec<(u64, u64, u64, u64)> {
    let mut out: Vec<(u64, u64, u64, u64)> = sub
        .to_lines()
        .into_iter()
        .map(|l| {
            let (a, b) = if (l.start.y, l.start.x) <= (l.end.y, l.end.x) {
                (l.start, l.end)
            } else {
                (l.end, l.start)
            };
            (a.y.to_bits(), a.x.to_bits(), b.y.to_bits(), b.x.to_bits())
        })
        .collect();
    out.sort_unstable();
    out
}

impl PartialEq for Subdivision {
    fn eq(&self, other: &Self) -> bool {
        self.structure_equals(other)
    }
}

impl Eq for Subdivision {}

impl Hash for Subdivision {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vertex_count().hash(state);
        self.face_count().hash(state);
        normalized_lines(self).hash(state);
    }
}
