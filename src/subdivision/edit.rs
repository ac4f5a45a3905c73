//! Editing operations: adding, removing, and splitting edges, moving and
//! removing vertices, and key renumbering.
//!
//! Every operation preserves the structural invariants checked by
//! [`Subdivision::validate`]; a failed operation returns an error and
//! leaves the subdivision unchanged.

use super::{EdgeKey, FaceKey, HalfEdge, Subdivision, SubdivisionError, UNBOUNDED_FACE};
use crate::geometry::{Line, LineLocation, LineRelation, Point};
use std::collections::{BTreeMap, BTreeSet};

impl Subdivision {
    /// Inserts a new edge between `p` and `q`, creating vertices as
    /// needed.
    ///
    /// Fails when the segment would cross an existing edge or pass over a
    /// vertex, when the endpoints collapse under the tolerance, or when
    /// the edge already exists. Splitting a face creates a new face;
    /// connecting two boundary cycles of the same face merges its hole
    /// list.
    ///
    /// Returns the key of the half-edge directed from `p` to `q`.
    pub fn add_edge(&mut self, p: Point, q: Point) -> Result<EdgeKey, SubdivisionError> {
        let (rp, p_exists) = match self.vertices.representative(p) {
            Some(rep) => (rep, true),
            None => (p, false),
        };
        let (rq, q_exists) = match self.vertices.representative(q) {
            Some(rep) => (rep, true),
            None => (q, false),
        };
        if rp == rq || rp.distance(rq) <= self.epsilon {
            return Err(SubdivisionError::DegenerateEdge);
        }
        if p_exists && q_exists && self.find_edge(rp, rq).is_some() {
            return Err(SubdivisionError::EdgeExists);
        }
        let seg = Line::new(rp, rq);
        if self.segment_conflicts(&seg, &BTreeSet::new()) {
            return Err(SubdivisionError::EdgeCrossing);
        }

        // the face containing an isolated segment must be located before
        // the new edges perturb the structure
        let isolated_face = if !p_exists && !q_exists {
            Some(self.find_face(seg.midpoint()))
        } else {
            None
        };

        let (a, b) = self.fresh_edge_pair();
        self.edges.insert(
            a,
            HalfEdge {
                origin: rp,
                twin: b,
                next: a,
                previous: a,
                face: UNBOUNDED_FACE,
            },
        );
        self.edges.insert(
            b,
            HalfEdge {
                origin: rq,
                twin: a,
                next: b,
                previous: b,
                face: UNBOUNDED_FACE,
            },
        );

        for (v, out, existed) in [(rp, a, p_exists), (rq, b, q_exists)] {
            if existed {
                let mut star = self.vertex_star(v).expect("vertex exists");
                star.push(out);
                self.wire_star(v, star);
            } else {
                self.wire_star(v, vec![out]);
                self.vertices.insert(v, out);
            }
        }
        debug!("added edge {a} between {rp:?} and {rq:?}");

        match isolated_face {
            Some(face) => {
                // a floating segment becomes a new hole boundary
                self.edges.get_mut(&a).expect("new edge").face = face;
                self.edges.get_mut(&b).expect("new edge").face = face;
                self.faces
                    .get_mut(&face)
                    .expect("containing face exists")
                    .inner_edges
                    .push(a);
            }
            None => {
                let face = [self.edges[&a].next, self.edges[&b].next]
                    .into_iter()
                    .find(|&e| e != a && e != b)
                    .map(|e| self.edges[&e].face)
                    .unwrap_or(UNBOUNDED_FACE);
                self.edges.get_mut(&a).expect("new edge").face = face;
                self.edges.get_mut(&b).expect("new edge").face = face;
                self.rebuild_faces(&BTreeSet::from([face]));
            }
        }
        Ok(a)
    }

    /// Removes the edge pair containing `key`.
    ///
    /// If the edge separates two faces they merge, the lower key
    /// absorbing the higher. A vertex left without edges is removed; a
    /// component split in two becomes two hole boundaries of the
    /// containing face.
    pub fn remove_edge(&mut self, key: EdgeKey) -> Result<(), SubdivisionError> {
        let edge = *self
            .edges
            .get(&key)
            .ok_or(SubdivisionError::UnknownEdge(key))?;
        let twin = edge.twin;
        let twin_face = self.edges[&twin].face;
        let p = edge.origin;
        let q = self.edges[&twin].origin;

        for (v, out) in [(p, key), (q, twin)] {
            let star = self.vertex_star(v).expect("edge endpoints are vertices");
            let remaining: Vec<EdgeKey> = star.into_iter().filter(|&e| e != out).collect();
            if remaining.is_empty() {
                self.vertices.remove(v);
            } else {
                self.vertices.insert(v, remaining[0]);
                self.wire_star(v, remaining);
            }
        }
        self.edges.remove(&key);
        self.edges.remove(&twin);
        debug!("removed edge {key} between {p:?} and {q:?}");

        let keep = edge.face.min(twin_face);
        let drop = edge.face.max(twin_face);
        if keep != drop {
            let retarget: Vec<EdgeKey> = self
                .edges
                .iter()
                .filter(|(_, e)| e.face == drop)
                .map(|(&k, _)| k)
                .collect();
            for k in retarget {
                self.edges.get_mut(&k).expect("edge exists").face = keep;
            }
            self.faces.remove(&drop);
        }
        self.rebuild_faces(&BTreeSet::from([keep]));
        Ok(())
    }

    /// Splits the edge pair containing `key` at its midpoint, inserting a
    /// degree-two vertex. Face topology is unchanged. The original keys
    /// keep the half toward the original origin; the new pair's key
    /// toward the original destination is returned.
    pub fn split_edge(&mut self, key: EdgeKey) -> Result<EdgeKey, SubdivisionError> {
        let edge = *self
            .edges
            .get(&key)
            .ok_or(SubdivisionError::UnknownEdge(key))?;
        let twin = edge.twin;
        let q = self.edges[&twin].origin;
        let mid = (edge.origin + q) / 2.;
        if self.vertices.representative(mid).is_some() {
            return Err(SubdivisionError::VertexOverlap);
        }

        // key: p -> mid (unchanged origin), twin2: mid -> p
        // key2: mid -> q, twin: q -> mid (unchanged origin)
        let (key2, twin2) = self.fresh_edge_pair();
        let old_next = edge.next;
        let old_twin_next = self.edges[&twin].next;
        let twin_face = self.edges[&twin].face;

        self.edges.insert(
            key2,
            HalfEdge {
                origin: mid,
                twin,
                next: if old_next == twin { twin } else { old_next },
                previous: key,
                face: edge.face,
            },
        );
        self.edges.insert(
            twin2,
            HalfEdge {
                origin: mid,
                twin: key,
                next: if old_twin_next == key { key } else { old_twin_next },
                previous: twin,
                face: twin_face,
            },
        );
        {
            let e = self.edges.get_mut(&key).expect("edge exists");
            e.twin = twin2;
            e.next = key2;
        }
        {
            let t = self.edges.get_mut(&twin).expect("twin exists");
            t.twin = key2;
            t.next = twin2;
        }
        if old_next != twin {
            self.edges.get_mut(&old_next).expect("edge exists").previous = key2;
        }
        if old_twin_next != key {
            self.edges
                .get_mut(&old_twin_next)
                .expect("edge exists")
                .previous = twin2;
        }
        self.vertices.insert(mid, key2);
        debug!("split edge {key} at {mid:?}");
        Ok(key2)
    }

    /// Moves the vertex at `p` to `q`, keeping all incident edges.
    ///
    /// Fails when `q` collides with another vertex, collapses an incident
    /// edge, or makes an incident edge cross any non-incident edge.
    pub fn move_vertex(&mut self, p: Point, q: Point) -> Result<(), SubdivisionError> {
        let rep = self
            .vertices
            .representative(p)
            .ok_or(SubdivisionError::UnknownVertex)?;
        if let Some(other) = self.vertices.representative(q) {
            if other != rep {
                return Err(SubdivisionError::VertexOverlap);
            }
        }
        if rep == q {
            return Ok(());
        }
        let star = self.vertex_star(rep).expect("vertex exists");
        let neighbors: Vec<Point> = star.iter().map(|&e| self.destination(e)).collect();
        for w in &neighbors {
            if w.distance(q) <= self.epsilon || *w == q {
                return Err(SubdivisionError::DegenerateEdge);
            }
        }
        // incident edges take new positions; they may not cross anything
        // else, and no two may become collinear at q
        let mut skip = BTreeSet::new();
        for &e in &star {
            skip.insert(e);
            skip.insert(self.edges[&e].twin);
        }
        for w in &neighbors {
            if self.segment_conflicts(&Line::new(q, *w), &skip) {
                return Err(SubdivisionError::EdgeCrossing);
            }
        }
        for (i, a) in neighbors.iter().enumerate() {
            for b in neighbors.iter().skip(i + 1) {
                let angle_a = (*a - q).angle();
                let angle_b = (*b - q).angle();
                if (angle_a - angle_b).abs() <= f64::EPSILON {
                    return Err(SubdivisionError::EdgeCrossing);
                }
            }
        }

        self.vertices.remove(rep);
        for &e in &star {
            self.edges.get_mut(&e).expect("star edge exists").origin = q;
        }
        self.vertices.insert(q, star[0]);
        self.wire_star(q, star.clone());
        for w in &neighbors {
            self.rewire_vertex(*w);
        }
        debug!("moved vertex {rep:?} to {q:?}");

        // the angular reordering can have reshaped cycles around every
        // touched vertex
        let mut affected = BTreeSet::new();
        for &e in &star {
            affected.insert(self.edges[&e].face);
            affected.insert(self.edges[&self.edges[&e].twin].face);
        }
        for w in &neighbors {
            for e in self.vertex_star(*w).expect("neighbor exists") {
                affected.insert(self.edges[&e].face);
                affected.insert(self.edges[&self.edges[&e].twin].face);
            }
        }
        self.rebuild_faces(&affected);
        Ok(())
    }

    /// Removes a degree-two vertex, merging its two incident edges into
    /// one spanning the far endpoints.
    pub fn remove_vertex(&mut self, p: Point) -> Result<(), SubdivisionError> {
        let rep = self
            .vertices
            .representative(p)
            .ok_or(SubdivisionError::UnknownVertex)?;
        let star = self.vertex_star(rep).expect("vertex exists");
        if star.len() != 2 {
            return Err(SubdivisionError::VertexNotDegreeTwo);
        }
        let out_a = star[0]; // p -> a
        let out_b = star[1]; // p -> b
        let e_ap = self.edges[&out_a].twin; // a -> p
        let e_bp = self.edges[&out_b].twin; // b -> p
        let a = self.edges[&e_ap].origin;
        let b = self.edges[&e_bp].origin;
        if a == b {
            return Err(SubdivisionError::DegenerateEdge);
        }
        if self.find_edge(a, b).is_some() {
            return Err(SubdivisionError::EdgeExists);
        }
        // unless the merged edge keeps the old geometry, it may not cross
        // anything
        let collinear = Line::new(a, b)
            .locate_with(rep, self.epsilon.max(1e-12))
            .is_on_segment();
        if !collinear {
            let skip = BTreeSet::from([out_a, out_b, e_ap, e_bp]);
            if self.segment_conflicts(&Line::new(a, b), &skip) {
                return Err(SubdivisionError::EdgeCrossing);
            }
        }

        // keep the (e_ap, out_a) pair as the merged edge a <-> b
        let ab_next = self.edges[&out_b].next;
        let ba_prev = self.edges[&e_bp].previous;
        {
            let e = self.edges.get_mut(&e_ap).expect("edge exists");
            e.next = if ab_next == e_bp { out_a } else { ab_next };
        }
        if ab_next != e_bp {
            self.edges.get_mut(&ab_next).expect("edge exists").previous = e_ap;
        }
        {
            let e = self.edges.get_mut(&out_a).expect("edge exists");
            e.origin = b;
            e.previous = if ba_prev == out_b { e_ap } else { ba_prev };
        }
        if ba_prev != out_b {
            self.edges.get_mut(&ba_prev).expect("edge exists").next = out_a;
        }
        let dead_faces = [self.edges[&out_b].face, self.edges[&e_bp].face];
        self.edges.remove(&out_b);
        self.edges.remove(&e_bp);
        self.vertices.remove(rep);
        self.vertices.insert(b, out_a);

        // face records may have pointed at the deleted pair
        for f in dead_faces {
            let face = self.faces.get_mut(&f).expect("face exists");
            if face.outer_edge == Some(out_b) || face.outer_edge == Some(e_bp) {
                face.outer_edge = Some(if face.outer_edge == Some(out_b) {
                    e_ap
                } else {
                    out_a
                });
            }
            for inner in face.inner_edges.iter_mut() {
                if *inner == out_b {
                    *inner = e_ap;
                } else if *inner == e_bp {
                    *inner = out_a;
                }
            }
        }
        debug!("removed degree-two vertex {rep:?}");
        Ok(())
    }

    /// Compacts half-edge keys to `0..`, preserving order. Returns whether
    /// anything changed.
    pub fn renumber_edges(&mut self) -> bool {
        let remap: BTreeMap<EdgeKey, EdgeKey> = self
            .edges
            .keys()
            .enumerate()
            .map(|(i, &k)| (k, EdgeKey(i as u32)))
            .collect();
        let changed = remap.iter().any(|(old, new)| old != new);
        self.next_edge = self.edges.len() as u32;
        if !changed {
            return false;
        }
        self.edges = self
            .edges
            .iter()
            .map(|(k, e)| {
                (
                    remap[k],
                    HalfEdge {
                        origin: e.origin,
                        twin: remap[&e.twin],
                        next: remap[&e.next],
                        previous: remap[&e.previous],
                        face: e.face,
                    },
                )
            })
            .collect();
        for value in self.vertices.values_mut() {
            *value = remap[value];
        }
        for face in self.faces.values_mut() {
            if let Some(outer) = face.outer_edge.as_mut() {
                *outer = remap[outer];
            }
            for inner in face.inner_edges.iter_mut() {
                *inner = remap[inner];
            }
        }
        true
    }

    /// Compacts face keys to `0..`, preserving order (the unbounded face
    /// stays 0). Returns whether anything changed.
    pub fn renumber_faces(&mut self) -> bool {
        let remap: BTreeMap<FaceKey, FaceKey> = self
            .faces
            .keys()
            .enumerate()
            .map(|(i, &k)| (k, FaceKey(i as u32)))
            .collect();
        let changed = remap.iter().any(|(old, new)| old != new);
        self.next_face = self.faces.len() as u32;
        if !changed {
            return false;
        }
        self.faces = self
            .faces
            .iter()
            .map(|(k, f)| (remap[k], f.clone()))
            .collect();
        for edge in self.edges.values_mut() {
            edge.face = remap[&edge.face];
        }
        true
    }

    /// Whether a candidate segment would cross an existing edge away from
    /// shared endpoints, or overlap one collinearly. Edges in `skip` (and
    /// their twins) are ignored.
    pub(crate) fn segment_conflicts(&self, seg: &Line, skip: &BTreeSet<EdgeKey>) -> bool {
        for (&key, edge) in &self.edges {
            if key > edge.twin || skip.contains(&key) || skip.contains(&edge.twin) {
                continue;
            }
            let other = self.edge_line(key);
            let x = seg.intersect_with(&other, self.epsilon);
            match x.relation {
                LineRelation::Divergent => {
                    if x.exists()
                        && (x.first == Some(LineLocation::Between)
                            || x.second == Some(LineLocation::Between))
                    {
                        return true;
                    }
                }
                LineRelation::Collinear => {
                    if x.shared.is_some() {
                        // sharing more than a single endpoint is an overlap
                        let d = seg.delta();
                        let len = d.length();
                        let dir = d / len;
                        let ta = (other.start - seg.start).dot(dir);
                        let tb = (other.end - seg.start).dot(dir);
                        let lo = ta.min(tb).max(0.);
                        let hi = ta.max(tb).min(len);
                        if hi - lo > self.epsilon.max(1e-12) {
                            return true;
                        }
                    }
                }
                LineRelation::Parallel => {}
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{line, point};

    fn square() -> Subdivision {
        Subdivision::from_polygons(
            &[&[
                point!(0.0, 0.0),
                point!(4.0, 0.0),
                point!(4.0, 4.0),
                point!(0.0, 4.0),
            ][..]],
            0.,
        )
        .unwrap()
    }

    #[test]
    fn add_diagonal_splits_the_face() {
        let mut sub = square();
        assert_eq!(sub.face_count(), 2);
        sub.add_edge(point!(0.0, 0.0), point!(4.0, 4.0)).unwrap();
        assert_eq!(sub.face_count(), 3);
        assert_eq!(sub.edge_count(), 10);
        let mut areas: Vec<f64> = sub
            .faces()
            .filter_map(|(k, _)| sub.face_area(k))
            .collect();
        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(areas, vec![8.0, 8.0]);
        sub.validate().unwrap();
    }

    #[test]
    fn add_crossing_edge_fails_and_leaves_subdivision_unchanged() {
        let mut sub = square();
        let before = sub.clone();
        assert_eq!(
            sub.add_edge(point!(2.0, 2.0), point!(6.0, 2.0)),
            Err(SubdivisionError::EdgeCrossing)
        );
        assert_eq!(
            sub.add_edge(point!(0.0, 0.0), point!(0.0, 0.0)),
            Err(SubdivisionError::DegenerateEdge)
        );
        assert_eq!(
            sub.add_edge(point!(0.0, 0.0), point!(4.0, 0.0)),
            Err(SubdivisionError::EdgeExists)
        );
        assert!(sub.structure_equals(&before));
        sub.validate().unwrap();
    }

    #[test]
    fn add_isolated_segment_becomes_a_hole() {
        let mut sub = square();
        sub.add_edge(point!(1.0, 1.0), point!(2.0, 1.0)).unwrap();
        assert_eq!(sub.face_count(), 2);
        let inner_face = sub
            .faces()
            .find(|(k, _)| *k != UNBOUNDED_FACE)
            .map(|(k, _)| k)
            .unwrap();
        assert_eq!(sub.get_face(inner_face).unwrap().inner_edges().len(), 1);
        sub.validate().unwrap();
    }

    #[test]
    fn add_antenna_then_connect_into_a_chord() {
        let mut sub = square();
        // antenna from the boundary into the interior
        sub.add_edge(point!(0.0, 0.0), point!(2.0, 2.0)).unwrap();
        assert_eq!(sub.face_count(), 2);
        sub.validate().unwrap();
        // second segment completes a diagonal chord, splitting the face
        sub.add_edge(point!(2.0, 2.0), point!(4.0, 4.0)).unwrap();
        assert_eq!(sub.face_count(), 3);
        sub.validate().unwrap();
    }

    #[test]
    fn remove_edge_merges_faces_into_the_lower_key() {
        let mut sub = square();
        let diagonal = sub.add_edge(point!(0.0, 0.0), point!(4.0, 4.0)).unwrap();
        let keys: Vec<FaceKey> = sub.faces().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), 3);
        sub.remove_edge(diagonal).unwrap();
        assert_eq!(sub.face_count(), 2);
        // the surviving bounded face uses the lower of the two old keys
        let survivor = sub
            .faces()
            .find(|(k, _)| *k != UNBOUNDED_FACE)
            .map(|(k, _)| k)
            .unwrap();
        assert_eq!(survivor, keys[1]);
        assert_eq!(sub.face_area(survivor), Some(16.0));
        sub.validate().unwrap();
    }

    #[test]
    fn remove_boundary_edge_opens_the_face() {
        let mut sub = square();
        let key = sub
            .find_edge(point!(0.0, 0.0), point!(4.0, 0.0))
            .unwrap();
        sub.remove_edge(key).unwrap();
        assert_eq!(sub.face_count(), 1);
        assert_eq!(sub.vertex_count(), 4);
        sub.validate().unwrap();
    }

    #[test]
    fn remove_edge_drops_dangling_vertices() {
        let mut sub = square();
        let key = sub.add_edge(point!(1.0, 1.0), point!(2.0, 1.0)).unwrap();
        assert_eq!(sub.vertex_count(), 6);
        sub.remove_edge(key).unwrap();
        assert_eq!(sub.vertex_count(), 4);
        assert!(sub.structure_equals(&square()));
        sub.validate().unwrap();
    }

    #[test]
    fn split_edge_inserts_a_degree_two_vertex() {
        let mut sub = square();
        let key = sub
            .find_edge(point!(0.0, 0.0), point!(4.0, 0.0))
            .unwrap();
        let faces_before = sub.face_count();
        sub.split_edge(key).unwrap();
        assert_eq!(sub.vertex_count(), 5);
        assert_eq!(sub.edge_count(), 10);
        assert_eq!(sub.face_count(), faces_before);
        assert_eq!(sub.vertex_degree(point!(2.0, 0.0)), 2);
        sub.validate().unwrap();
    }

    #[test]
    fn split_then_remove_vertex_round_trips() {
        let mut sub = square();
        let key = sub
            .find_edge(point!(0.0, 0.0), point!(4.0, 0.0))
            .unwrap();
        sub.split_edge(key).unwrap();
        sub.remove_vertex(point!(2.0, 0.0)).unwrap();
        assert!(sub.structure_equals(&square()));
        sub.validate().unwrap();
    }

    #[test]
    fn remove_vertex_requires_degree_two() {
        let mut sub = square();
        assert_eq!(
            sub.remove_vertex(point!(0.0, 0.0)),
            Err(SubdivisionError::VertexNotDegreeTwo)
        );
        assert_eq!(
            sub.remove_vertex(point!(9.0, 9.0)),
            Err(SubdivisionError::UnknownVertex)
        );
    }

    #[test]
    fn move_vertex_updates_geometry() {
        let mut sub = square();
        sub.move_vertex(point!(4.0, 4.0), point!(5.0, 5.0)).unwrap();
        assert!(sub.find_vertex(point!(4.0, 4.0)).is_none());
        assert!(sub.find_vertex(point!(5.0, 5.0)).is_some());
        assert_eq!(sub.face_count(), 2);
        sub.validate().unwrap();
    }

    #[test]
    fn move_vertex_rejects_collisions_and_crossings() {
        let mut sub = square();
        sub.add_edge(point!(0.0, 0.0), point!(4.0, 4.0)).unwrap();
        // collision with another vertex
        assert_eq!(
            sub.move_vertex(point!(4.0, 4.0), point!(0.0, 4.0)),
            Err(SubdivisionError::VertexOverlap)
        );
        // the diagonal would cross the left edge
        assert_eq!(
            sub.move_vertex(point!(4.0, 4.0), point!(-2.0, 2.0)),
            Err(SubdivisionError::EdgeCrossing)
        );
        sub.validate().unwrap();
    }

    #[test]
    fn renumber_edges_reports_compaction() {
        let mut sub = square();
        assert!(!sub.renumber_edges());
        let key = sub
            .find_edge(point!(0.0, 0.0), point!(4.0, 0.0))
            .unwrap();
        sub.remove_edge(key).unwrap();
        assert!(sub.renumber_edges());
        assert!(!sub.renumber_edges());
        let keys: Vec<u32> = sub.edges().map(|(k, _)| k.0).collect();
        assert_eq!(keys, vec![0, 1, 2, 3, 4, 5]);
        sub.validate().unwrap();
    }

    #[test]
    fn renumber_faces_reports_compaction() {
        let mut sub = square();
        let diagonal = sub.add_edge(point!(0.0, 0.0), point!(4.0, 4.0)).unwrap();
        sub.remove_edge(diagonal).unwrap();
        // one of the two split faces is gone, leaving a key gap
        assert!(sub.renumber_faces());
        assert!(!sub.renumber_faces());
        let keys: Vec<u32> = sub.faces().map(|(k, _)| k.0).collect();
        assert_eq!(keys, vec![0, 1]);
        sub.validate().unwrap();
    }

    #[test]
    fn line_round_trip_preserves_structure() {
        let mut sub = square();
        sub.add_edge(point!(0.0, 0.0), point!(4.0, 4.0)).unwrap();
        let rebuilt = Subdivision::from_lines(&sub.to_lines(), 0.).unwrap();
        assert!(sub.structure_equals(&rebuilt));
    }

    #[test]
    fn edits_preserve_epsilon_lookup() {
        let mut sub = Subdivision::new(0.01).unwrap();
        sub.add_edge(point!(0.0, 0.0), point!(2.0, 0.0)).unwrap();
        // endpoint within tolerance reuses the existing vertex
        sub.add_edge(point!(2.0, 0.005), point!(4.0, 0.0)).unwrap();
        assert_eq!(sub.vertex_count(), 3);
        assert_eq!(sub.vertex_degree(point!(2.0, 0.0)), 2);
        sub.validate().unwrap();
    }

    #[test]
    fn chord_between_square_and_inner_hole_merges_boundaries() {
        let mut sub = Subdivision::from_polygons(
            &[
                &[
                    point!(0.0, 0.0),
                    point!(10.0, 0.0),
                    point!(10.0, 10.0),
                    point!(0.0, 10.0),
                ][..],
                &[
                    point!(4.0, 4.0),
                    point!(6.0, 4.0),
                    point!(6.0, 6.0),
                    point!(4.0, 6.0),
                ][..],
            ],
            0.,
        )
        .unwrap();
        let annulus = sub
            .faces()
            .find(|(_, f)| !f.inner_edges().is_empty() && f.outer_edge().is_some())
            .map(|(k, _)| k)
            .unwrap();
        assert_eq!(sub.get_face(annulus).unwrap().inner_edges().len(), 1);
        // bridge from the outer ring to the hole ring: the hole boundary
        // joins the outer cycle
        sub.add_edge(point!(0.0, 0.0), point!(4.0, 4.0)).unwrap();
        sub.validate().unwrap();
        let annulus_face = sub
            .faces()
            .find(|(k, f)| *k != UNBOUNDED_FACE && f.outer_edge().is_some() && {
                let area = sub.face_area(*k).unwrap();
                (area - 96.0).abs() < 1e-9
            })
            .map(|(k, _)| k);
        assert!(annulus_face.is_some(), "outer region keeps area 100 - 4");
        assert!(sub
            .faces()
            .all(|(k, f)| k == UNBOUNDED_FACE || f.inner_edges().is_empty()));
    }
}
