//! Construction of subdivisions from segments and polygons, and the face
//! assignment shared with the editing operations.

use super::{EdgeKey, Face, FaceKey, HalfEdge, Subdivision, SubdivisionError, UNBOUNDED_FACE};
use crate::algorithm::line_crossings;
use crate::algorithm::polygon::{point_in_polygon, polygon_area, PolygonLocation};
use crate::collections::PointMap;
use crate::geometry::{Line, LineLocation, Point};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

impl Subdivision {
    /// Builds a subdivision from segments that do not cross except at
    /// shared endpoints.
    ///
    /// Inputs with interior crossings are rejected with
    /// [`SubdivisionError::CrossingInput`]; pre-split them with
    /// [`line_crossings::split`]. Exact duplicate segments are merged.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessella::{line, Subdivision};
    ///
    /// let sub = Subdivision::from_lines(
    ///     &[
    ///         line!((0.0, 0.0), (4.0, 0.0)),
    ///         line!((4.0, 0.0), (2.0, 3.0)),
    ///         line!((2.0, 3.0), (0.0, 0.0)),
    ///     ],
    ///     0.0,
    /// )
    /// .unwrap();
    /// assert_eq!(sub.face_count(), 2);
    /// ```
    pub fn from_lines(lines: &[Line], epsilon: f64) -> Result<Self, SubdivisionError> {
        check_no_interior_crossings(lines, epsilon)?;
        let segments: Vec<(Point, Point)> = lines.iter().map(|l| (l.start, l.end)).collect();
        Self::build(&segments, epsilon, true)
    }

    /// Builds a subdivision from closed polygon rings (no closing
    /// duplicate vertex required). Ring edges may not cross except at
    /// shared vertices; rings may share whole edges, which are merged.
    pub fn from_polygons<P: AsRef<[Point]>>(
        polygons: &[P],
        epsilon: f64,
    ) -> Result<Self, SubdivisionError> {
        let snap = epsilon.max(1e-12);
        let mut segments: Vec<(Point, Point)> = Vec::new();
        for polygon in polygons {
            let ring = polygon.as_ref();
            // drop closing duplicates and tolerance-collapsed neighbors
            let mut cleaned: Vec<Point> = Vec::with_capacity(ring.len());
            for &p in ring {
                if cleaned.last().map_or(true, |&q: &Point| q.distance(p) > snap) {
                    cleaned.push(p);
                }
            }
            while cleaned.len() > 1
                && cleaned[0].distance(*cleaned.last().unwrap()) <= snap
            {
                cleaned.pop();
            }
            if cleaned.len() < 3 {
                return Err(SubdivisionError::DegenerateEdge);
            }
            for i in 0..cleaned.len() {
                segments.push((cleaned[i], cleaned[(i + 1) % cleaned.len()]));
            }
        }
        let lines: Vec<Line> = segments.iter().map(|&(a, b)| Line::new(a, b)).collect();
        check_no_interior_crossings(&lines, epsilon)?;
        Self::build(&segments, epsilon, false)
    }

    fn build(
        segments: &[(Point, Point)],
        epsilon: f64,
        reject_degenerate: bool,
    ) -> Result<Self, SubdivisionError> {
        let mut sub = Subdivision::new(epsilon)?;
        let mut outgoing: PointMap<Vec<EdgeKey>> =
            PointMap::new(epsilon).map_err(SubdivisionError::from)?;
        let mut seen: BTreeSet<(u64, u64, u64, u64)> = BTreeSet::new();

        for &(p, q) in segments {
            let rp = intern(&mut outgoing, p);
            let rq = intern(&mut outgoing, q);
            if rp == rq {
                if reject_degenerate {
                    return Err(SubdivisionError::DegenerateEdge);
                }
                continue;
            }
            if !seen.insert(normalize_pair(rp, rq)) {
                continue; // duplicate segment
            }
            let (a, b) = sub.fresh_edge_pair();
            sub.edges.insert(
                a,
                HalfEdge {
                    origin: rp,
                    twin: b,
                    next: a,
                    previous: a,
                    face: UNBOUNDED_FACE,
                },
            );
            sub.edges.insert(
                b,
                HalfEdge {
                    origin: rq,
                    twin: a,
                    next: b,
                    previous: b,
                    face: UNBOUNDED_FACE,
                },
            );
            outgoing.get_mut(rp).expect("vertex was interned").push(a);
            outgoing.get_mut(rq).expect("vertex was interned").push(b);
        }

        let stars: Vec<(Point, Vec<EdgeKey>)> = outgoing
            .iter()
            .filter(|(_, star)| !star.is_empty())
            .map(|(v, star)| (v, star.clone()))
            .collect();
        for (v, star) in stars {
            sub.wire_star(v, star.clone());
            sub.vertices.insert(v, star[0]);
        }
        sub.assign_faces_from_scratch();
        Ok(sub)
    }

    /// Sorts the outgoing half-edges of one vertex into ascending angular
    /// order (clockwise on screen) and links the surrounding cycles: the
    /// edge after `e` in the order becomes `twin(e).next`.
    pub(crate) fn wire_star(&mut self, v: Point, mut star: Vec<EdgeKey>) {
        star.sort_by(|&a, &b| {
            let pa = (self.destination(a) - v).angle();
            let pb = (self.destination(b) - v).angle();
            pa.partial_cmp(&pb).unwrap_or(Ordering::Equal)
        });
        let k = star.len();
        for i in 0..k {
            let here = star[i];
            let after = star[(i + 1) % k];
            let twin = self.edges[&here].twin;
            self.edges.get_mut(&twin).expect("twin exists").next = after;
            self.edges.get_mut(&after).expect("edge exists").previous = twin;
        }
    }

    /// Recomputes the outgoing order at an existing vertex.
    pub(crate) fn rewire_vertex(&mut self, v: Point) {
        if let Some(star) = self.vertex_star(v) {
            self.wire_star(v, star);
        }
    }

    /// Discovers all boundary cycles and assigns faces from nothing.
    pub(crate) fn assign_faces_from_scratch(&mut self) {
        self.faces = BTreeMap::from([(UNBOUNDED_FACE, Face::default())]);
        self.next_face = 1;
        let keys: Vec<EdgeKey> = self.edges.keys().copied().collect();
        let cycles = self.discover_cycles(&keys);
        self.assign_cycles(cycles, &BTreeSet::from([UNBOUNDED_FACE]), &BTreeMap::new());
    }

    /// Walks `next` links over the given half-edges and returns the
    /// distinct cycles, each starting at its lowest-keyed member.
    pub(crate) fn discover_cycles(&self, keys: &[EdgeKey]) -> Vec<Vec<EdgeKey>> {
        let mut visited: BTreeSet<EdgeKey> = BTreeSet::new();
        let mut cycles = Vec::new();
        for &start in keys {
            if visited.contains(&start) {
                continue;
            }
            let cycle = self.cycle(start);
            visited.extend(cycle.iter().copied());
            cycles.push(cycle);
        }
        cycles
    }

    /// Rebuilds the face structure covering exactly the given faces after
    /// an edit has changed cycles among their edges. New faces are created
    /// for cycles that split off; faces whose region vanished are removed.
    pub(crate) fn rebuild_faces(&mut self, affected: &BTreeSet<FaceKey>) {
        let keys: Vec<EdgeKey> = self
            .edges
            .iter()
            .filter(|(_, e)| affected.contains(&e.face))
            .map(|(&k, _)| k)
            .collect();
        let cycles = self.discover_cycles(&keys);
        let old_outer: BTreeMap<EdgeKey, FaceKey> = affected
            .iter()
            .filter_map(|&f| {
                self.faces
                    .get(&f)
                    .and_then(|face| face.outer_edge)
                    .map(|e| (e, f))
            })
            .collect();
        self.assign_cycles(cycles, affected, &old_outer);
    }

    /// Classifies cycles and installs face records for them.
    ///
    /// `reusable` is the set of face keys being (re)built: bounded keys in
    /// it are reused for outer cycles (matched through `old_outer` when
    /// possible) and dropped when no cycle claims them.
    fn assign_cycles(
        &mut self,
        cycles: Vec<Vec<EdgeKey>>,
        reusable: &BTreeSet<FaceKey>,
        old_outer: &BTreeMap<EdgeKey, FaceKey>,
    ) {
        struct CycleInfo {
            edges: Vec<EdgeKey>,
            polygon: Vec<Point>,
            area: f64,
            bounded: bool,
        }

        let infos: Vec<CycleInfo> = cycles
            .into_iter()
            .map(|edges| {
                let polygon: Vec<Point> =
                    edges.iter().map(|e| self.edges[e].origin).collect();
                let area = polygon_area(&polygon);
                let members: BTreeSet<EdgeKey> = edges.iter().copied().collect();
                // a cycle that contains both halves of each of its edges
                // encloses nothing
                let flat = edges.iter().all(|e| members.contains(&self.edges[e].twin));
                CycleInfo {
                    bounded: area < 0. && !flat,
                    edges,
                    polygon,
                    area,
                }
            })
            .collect();

        // bounded outer cycles first: reuse a face key whose previous
        // outer representative lies on the cycle, then hand out the
        // remaining reusable keys in ascending order, then fresh keys
        let mut used: BTreeSet<FaceKey> = BTreeSet::new();
        let mut keys: Vec<Option<FaceKey>> = vec![None; infos.len()];
        for (i, info) in infos.iter().enumerate() {
            if !info.bounded {
                continue;
            }
            let reuse = info
                .edges
                .iter()
                .find_map(|e| old_outer.get(e).copied())
                .filter(|f| !used.contains(f));
            if let Some(f) = reuse {
                used.insert(f);
                keys[i] = Some(f);
            }
        }
        let mut available: Vec<FaceKey> = reusable
            .iter()
            .copied()
            .filter(|&f| f != UNBOUNDED_FACE && self.faces.contains_key(&f) && !used.contains(&f))
            .collect();
        available.reverse(); // pop from the low end

        let mut assigned: Vec<(FaceKey, usize)> = Vec::new();
        for (i, info) in infos.iter().enumerate() {
            if !info.bounded {
                continue;
            }
            let key = match keys[i] {
                Some(f) => f,
                None => available.pop().unwrap_or_else(|| self.fresh_face()),
            };
            used.insert(key);
            self.faces.insert(
                key,
                Face {
                    outer_edge: Some(info.edges[0]),
                    inner_edges: Vec::new(),
                },
            );
            for &e in &info.edges {
                self.edges.get_mut(&e).expect("cycle edge exists").face = key;
            }
            debug!("face {key} assigned to cycle of area {a}", a = info.area);
            assigned.push((key, i));
        }

        // bounded keys nothing claimed are gone
        for &f in reusable {
            if f != UNBOUNDED_FACE && !used.contains(&f) {
                self.faces.remove(&f);
            }
        }
        if reusable.contains(&UNBOUNDED_FACE) {
            self.faces.insert(UNBOUNDED_FACE, Face::default());
        }

        // hole cycles attach to the innermost bounded cycle containing
        // them, or to the unbounded face
        for info in infos.iter().filter(|i| !i.bounded) {
            let sample = lexicographic_min(&info.polygon);
            let mut best: Option<(FaceKey, f64)> = None;
            for &(key, idx) in &assigned {
                let outer = &infos[idx];
                if point_in_polygon(sample, &outer.polygon, 0.) != PolygonLocation::Inside {
                    continue;
                }
                let size = outer.area.abs();
                if best.map_or(true, |(_, prev)| size < prev) {
                    best = Some((key, size));
                }
            }
            let owner = best.map_or(UNBOUNDED_FACE, |(key, _)| key);
            for &e in &info.edges {
                self.edges.get_mut(&e).expect("cycle edge exists").face = owner;
            }
            self.faces
                .get_mut(&owner)
                .expect("owner face exists")
                .inner_edges
                .push(info.edges[0]);
        }
    }
}

fn intern(vertices: &mut PointMap<Vec<EdgeKey>>, p: Point) -> Point {
    if let Some(rep) = vertices.representative(p) {
        rep
    } else {
        vertices.insert(p, Vec::new());
        p
    }
}

fn normalize_pair(p: Point, q: Point) -> (u64, u64, u64, u64) {
    let (a, b) = if (p.y, p.x) <= (q.y, q.x) { (p, q) } else { (q, p) };
    (a.y.to_bits(), a.x.to_bits(), b.y.to_bits(), b.x.to_bits())
}

fn lexicographic_min(polygon: &[Point]) -> Point {
    let mut best = polygon[0];
    for &p in &polygon[1..] {
        if (p.y, p.x) < (best.y, best.x) {
            best = p;
        }
    }
    best
}

/// Rejects segment sets with crossings away from shared endpoints.
fn check_no_interior_crossings(lines: &[Line], epsilon: f64) -> Result<(), SubdivisionError> {
    let crossings = line_crossings::find(lines, epsilon).map_err(SubdivisionError::from)?;
    let interior = crossings
        .iter()
        .flat_map(|c| &c.incidences)
        .any(|i| i.location == LineLocation::Between);
    if interior {
        return Err(SubdivisionError::CrossingInput);
    }
    Ok(())
}
