//! All-pair crossings of a line segment set.
//!
//! Two algorithms share one contract: [`find_simple`] tests every pair in
//! O(n²), [`find`] runs a Bentley–Ottmann sweep in O((n + k) log n). Both
//! report the same crossings, modulo ordering and floating point noise;
//! [`split`] cuts the input segments at the reported interior crossings.
//!
//! Results are sorted by the lexicographic (y-then-x) order of the shared
//! point, which is also the sweep order.

use crate::collections::PointMap;
use crate::error::GeometryError;
use crate::geometry::{Line, LineLocation, LineRelation, Point};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

/// Internal snap tolerance: crossings computed in floating point land
/// within this distance of their true location, so event points closer
/// than this are treated as one even when the caller asked for exact
/// comparison.
const SNAP: f64 = 1e-9;

/// One segment's participation in a crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Incidence {
    /// Index of the segment in the input slice.
    pub line: usize,
    /// Position of the shared point on that segment: `Start`, `End`, or
    /// `Between`.
    pub location: LineLocation,
}

/// A point where two or more input segments meet.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossingPoint {
    pub shared: Point,
    /// Participating segments, ordered by index.
    pub incidences: Vec<Incidence>,
}

/// Reports all crossings of `lines` by brute force, testing every
/// unordered pair.
///
/// A pair contributes a crossing when its segments diverge and the shared
/// point lies on both closed segments, or when they are collinear with a
/// non-empty common range, in which case only the two overlap endpoints
/// are recorded.
///
/// # Errors
///
/// Rejects a negative `epsilon` and zero-length input segments.
///
/// # Examples
///
/// ```
/// use tessella::algorithm::line_crossings::find_simple;
/// use tessella::{line, point, LineLocation};
///
/// let lines = [line!((0.0, 0.0), (4.0, 4.0)), line!((0.0, 4.0), (4.0, 0.0))];
/// let crossings = find_simple(&lines, 0.0).unwrap();
/// assert_eq!(crossings.len(), 1);
/// assert_eq!(crossings[0].shared, point!(2.0, 2.0));
/// assert_eq!(crossings[0].incidences[0].location, LineLocation::Between);
/// ```
pub fn find_simple(lines: &[Line], epsilon: f64) -> Result<Vec<CrossingPoint>, GeometryError> {
    validate(lines, epsilon)?;
    let mut collector = Collector::new(epsilon);

    for i in 0..lines.len() {
        for j in (i + 1)..lines.len() {
            let x = lines[i].intersect_with(&lines[j], epsilon);
            match x.relation {
                LineRelation::Divergent => {
                    if x.exists() {
                        let p = x.shared.unwrap();
                        collector.record(p, i, x.first.unwrap());
                        collector.record(p, j, x.second.unwrap());
                    }
                }
                LineRelation::Collinear => {
                    if let Some((lo, hi)) = collinear_overlap(&lines[i], &lines[j], epsilon) {
                        for p in overlap_points(lo, hi, epsilon) {
                            for line in [i, j] {
                                let location = lines[line].locate_with(p, snap_for(epsilon));
                                if location.is_on_segment() {
                                    collector.record(p, line, location);
                                }
                            }
                        }
                    }
                }
                LineRelation::Parallel => {}
            }
        }
    }
    Ok(collector.finish())
}

/// Reports all crossings of `lines` with a Bentley–Ottmann sweep.
///
/// The sweep advances top-down in the lexicographic (y-then-x) order.
/// The event queue holds segment upper endpoints, lower endpoints, and
/// discovered intersections; the status structure holds the segments
/// crossing the sweep line, ordered by their x coordinate at the sweep
/// position with ties broken by slope. Newly adjacent neighbors are
/// tested whenever the status changes, and intersection events are only
/// queued strictly below the sweep point.
///
/// Returns the same crossing set as [`find_simple`], modulo ordering.
pub fn find(lines: &[Line], epsilon: f64) -> Result<Vec<CrossingPoint>, GeometryError> {
    validate(lines, epsilon)?;
    Ok(Sweep::new(lines, epsilon).run())
}

/// Cuts every input segment at each of its `Between` incidences.
///
/// The output preserves the input order, with the pieces of a split
/// segment following their parent's position and direction. Segments
/// without interior crossings are passed through unchanged.
pub fn split(lines: &[Line], crossings: &[CrossingPoint]) -> Vec<Line> {
    // interior cut points per input segment
    let mut cuts: BTreeMap<usize, Vec<Point>> = BTreeMap::new();
    for crossing in crossings {
        for incidence in &crossing.incidences {
            if incidence.location == LineLocation::Between {
                cuts.entry(incidence.line).or_default().push(crossing.shared);
            }
        }
    }

    let mut out = Vec::with_capacity(lines.len() + crossings.len());
    for (i, line) in lines.iter().enumerate() {
        match cuts.get_mut(&i) {
            None => out.push(*line),
            Some(points) => {
                let d = line.delta();
                let len2 = d.dot(d);
                points.sort_by(|a, b| {
                    let ta = (*a - line.start).dot(d) / len2;
                    let tb = (*b - line.start).dot(d) / len2;
                    ta.partial_cmp(&tb).unwrap_or(Ordering::Equal)
                });
                let mut prev = line.start;
                for &p in points.iter() {
                    if prev.distance(p) > SNAP {
                        out.push(Line::new(prev, p));
                        prev = p;
                    }
                }
                if prev.distance(line.end) > SNAP {
                    out.push(Line::new(prev, line.end));
                }
            }
        }
    }
    out
}

fn validate(lines: &[Line], epsilon: f64) -> Result<(), GeometryError> {
    if !(epsilon >= 0.) {
        return Err(GeometryError::InvalidEpsilon);
    }
    if lines.iter().any(|l| l.start == l.end) {
        return Err(GeometryError::DegenerateLine);
    }
    Ok(())
}

#[inline]
fn snap_for(epsilon: f64) -> f64 {
    epsilon.max(SNAP)
}

/// Overlap range of two collinear segments as arc-length bounds on the
/// first segment. `None` when the ranges are disjoint.
fn collinear_overlap(a: &Line, b: &Line, epsilon: f64) -> Option<(Point, Point)> {
    let d = a.delta();
    let len = d.length();
    let dir = d / len;
    let ta = (b.start - a.start).dot(dir);
    let tb = (b.end - a.start).dot(dir);
    let (lo, hi) = if ta <= tb { (ta, tb) } else { (tb, ta) };
    let lo = lo.max(0.);
    let hi = hi.min(len);
    if lo > hi + epsilon {
        return None;
    }
    let hi = hi.max(lo);
    Some((a.start + dir * lo, a.start + dir * hi))
}

/// The one or two distinct endpoints of an overlap range.
fn overlap_points(lo: Point, hi: Point, epsilon: f64) -> Vec<Point> {
    if lo.distance(hi) <= snap_for(epsilon) {
        vec![lo]
    } else {
        vec![lo, hi]
    }
}

/// Accumulates incidences into tolerance-clustered crossing points.
struct Collector {
    points: PointMap<BTreeMap<usize, LineLocation>>,
}

impl Collector {
    fn new(epsilon: f64) -> Self {
        Self {
            points: PointMap::new(snap_for(epsilon)).expect("tolerance is non-negative"),
        }
    }

    fn record(&mut self, p: Point, line: usize, location: LineLocation) {
        debug_assert!(location.is_on_segment(), "incidence off the segment");
        if let Some(map) = self.points.get_mut(p) {
            // an endpoint classification wins over an interior one
            map.entry(line)
                .and_modify(|slot| {
                    if *slot == LineLocation::Between && location != LineLocation::Between {
                        *slot = location;
                    }
                })
                .or_insert(location);
        } else {
            self.points.insert(p, BTreeMap::from([(line, location)]));
        }
    }

    fn finish(self) -> Vec<CrossingPoint> {
        self.points
            .iter()
            .filter(|(_, incidences)| incidences.len() >= 2)
            .map(|(shared, incidences)| CrossingPoint {
                shared,
                incidences: incidences
                    .iter()
                    .map(|(&line, &location)| Incidence { line, location })
                    .collect(),
            })
            .collect()
    }
}

/// A queued sweep event. Ordered for a max-heap, so the comparison is
/// reversed: the lexicographically smallest point pops first.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Event {
    p: Point,
    /// Segment whose upper endpoint this is, if any.
    upper: Option<usize>,
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        lex_cmp(other.p, self.p)
    }
}

#[inline]
fn lex_cmp(a: Point, b: Point) -> Ordering {
    a.y.partial_cmp(&b.y)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
}

struct Sweep<'a> {
    lines: &'a [Line],
    /// Endpoints sorted so that `upper` precedes `lower` in sweep order.
    upper: Vec<Point>,
    lower: Vec<Point>,
    epsilon: f64,
    snap: f64,
    events: BinaryHeap<Event>,
    /// Indices of the segments crossing the sweep line, ordered by x at
    /// the sweep position.
    status: Vec<usize>,
    collector: Collector,
}

impl<'a> Sweep<'a> {
    fn new(lines: &'a [Line], epsilon: f64) -> Self {
        let snap = snap_for(epsilon);
        let mut events = BinaryHeap::with_capacity(lines.len() * 2);
        let mut upper = Vec::with_capacity(lines.len());
        let mut lower = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let (u, l) = if lex_cmp(line.start, line.end) == Ordering::Greater {
                (line.end, line.start)
            } else {
                (line.start, line.end)
            };
            upper.push(u);
            lower.push(l);
            events.push(Event { p: u, upper: Some(i) });
            events.push(Event { p: l, upper: None });
        }
        Self {
            lines,
            upper,
            lower,
            epsilon,
            snap,
            events,
            status: Vec::new(),
            collector: Collector::new(epsilon),
        }
    }

    /// x coordinate of a status segment at the sweep point. Horizontal
    /// segments track the sweep point itself across their x range.
    fn x_at(&self, seg: usize, sweep: Point) -> f64 {
        let u = self.upper[seg];
        let l = self.lower[seg];
        let dy = l.y - u.y;
        if dy.abs() <= self.snap {
            sweep.x.clamp(u.x.min(l.x), u.x.max(l.x))
        } else {
            u.x + (l.x - u.x) * (sweep.y - u.y) / dy
        }
    }

    /// Left-to-right order of two segments just below the sweep point;
    /// used when re-inserting segments that pass through it.
    fn slope_key(&self, seg: usize) -> f64 {
        let u = self.upper[seg];
        let l = self.lower[seg];
        let dy = l.y - u.y;
        if dy.abs() <= self.snap {
            f64::INFINITY
        } else {
            (l.x - u.x) / dy
        }
    }

    fn run(mut self) -> Vec<CrossingPoint> {
        while let Some(first) = self.events.pop() {
            let p = first.p;
            let mut uppers: Vec<usize> = first.upper.into_iter().collect();
            // drain the entire event cluster at this point
            while let Some(next) = self.events.peek() {
                if next.p.distance(p) > self.snap && lex_cmp(next.p, p) != Ordering::Equal {
                    break;
                }
                if let Some(seg) = self.events.pop().expect("peeked event").upper {
                    uppers.push(seg);
                }
            }
            self.handle_event_point(p, uppers);
        }
        self.collector.finish()
    }

    fn handle_event_point(&mut self, p: Point, mut uppers: Vec<usize>) {
        trace!("sweep event at {p:?} with {n} upper endpoints", n = uppers.len());
        uppers.sort_unstable();
        uppers.dedup();

        // status window of segments passing through p
        let lo = self
            .status
            .partition_point(|&s| self.x_at(s, p) < p.x - self.snap);
        let mut hi = lo;
        while hi < self.status.len() && self.x_at(self.status[hi], p) <= p.x + self.snap {
            hi += 1;
        }
        let mut lowers: Vec<usize> = Vec::new();
        let mut crossers: Vec<usize> = Vec::new();
        for idx in lo..hi {
            let seg = self.status[idx];
            if !self.contains(seg, p) {
                continue;
            }
            if self.lower[seg].distance(p) <= self.snap {
                lowers.push(seg);
            } else {
                crossers.push(seg);
            }
        }

        // report the crossing if two or more segments meet here
        let total = uppers.len() + lowers.len() + crossers.len();
        if total >= 2 {
            for &seg in uppers.iter().chain(&lowers).chain(&crossers) {
                let location = self.lines[seg].locate_with(p, self.snap);
                if location.is_on_segment() {
                    self.collector.record(p, seg, location);
                }
            }
        }

        // remove everything passing through p, then re-insert the
        // continuing segments in their order just below the sweep point
        self.status
            .retain(|s| !lowers.contains(s) && !crossers.contains(s));
        let insert_at = self
            .status
            .partition_point(|&s| self.x_at(s, p) < p.x);

        let mut inserted = crossers;
        inserted.extend(uppers);
        inserted.sort_by(|&a, &b| {
            self.slope_key(a)
                .partial_cmp(&self.slope_key(b))
                .unwrap_or(Ordering::Equal)
        });

        if inserted.is_empty() {
            // p closed a gap: its former neighbors are now adjacent
            if insert_at > 0 && insert_at < self.status.len() {
                self.test_neighbors(self.status[insert_at - 1], self.status[insert_at], p);
            }
        } else {
            for (offset, &seg) in inserted.iter().enumerate() {
                self.status.insert(insert_at + offset, seg);
            }
            if insert_at > 0 {
                self.test_neighbors(self.status[insert_at - 1], inserted[0], p);
            }
            let rightmost = insert_at + inserted.len();
            if rightmost < self.status.len() {
                self.test_neighbors(inserted[inserted.len() - 1], self.status[rightmost], p);
            }
        }
    }

    fn contains(&self, seg: usize, p: Point) -> bool {
        self.lines[seg].locate_with(p, self.snap).is_on_segment()
    }

    /// Queues the intersection of two newly adjacent segments when it lies
    /// strictly below the sweep point.
    fn test_neighbors(&mut self, left: usize, right: usize, sweep: Point) {
        let x = self.lines[left].intersect_with(&self.lines[right], self.epsilon);
        let candidates: Vec<Point> = match x.relation {
            LineRelation::Divergent if x.exists() => vec![x.shared.unwrap()],
            LineRelation::Collinear => {
                match collinear_overlap(&self.lines[left], &self.lines[right], self.snap) {
                    Some((lo, hi)) => overlap_points(lo, hi, self.snap),
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        };
        for q in candidates {
            if lex_cmp(q, sweep) == Ordering::Greater && q.distance(sweep) > self.snap {
                trace!("queueing intersection event at {q:?}");
                self.events.push(Event { p: q, upper: None });
            }
        }
    }
}
