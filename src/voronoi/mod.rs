//! Voronoi diagrams and Delaunay triangulations of point sets, computed
//! with Fortune's sweep-line algorithm and clipped to a rectangle.
//!
//! [`VoronoiMap::find_all`] produces a [`VoronoiResults`] bundle: the
//! Voronoi vertices, the clipped edges with their generator pairs, one
//! clipped region polygon per generator, and the Delaunay edges dual to
//! the surviving Voronoi edges. [`VoronoiMap::find_delaunay`] is a
//! shortcut when only the triangulation edges are wanted.
//!
//! # Examples
//!
//! ```
//! use tessella::voronoi::VoronoiMap;
//! use tessella::{point, Rect};
//!
//! let sites = [point!(2.0, 2.0), point!(8.0, 3.0), point!(5.0, 8.0)];
//! let clip = Rect::new(point!(0.0, 0.0), point!(10.0, 10.0));
//! let results = VoronoiMap::find_all(&sites, clip).unwrap();
//!
//! assert_eq!(results.regions().len(), 3);
//! assert_eq!(results.voronoi_vertices().len(), 1);
//! ```

mod sweep;

use crate::algorithm::polygon::polygon_area;
use crate::collections::PointMap;
use crate::geometry::{Line, Point, Rect};
use crate::point;
use crate::subdivision::{Subdivision, SubdivisionError};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use sweep::{rot90, EdgeRec, SNAP};

/// Error type for Voronoi computation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VoronoiError {
    /// A site coordinate is NaN or infinite.
    NonFiniteSite,
    /// Two sites coincide.
    DuplicateSite,
    /// A site lies outside the clipping rectangle.
    SiteOutsideClip,
}

impl fmt::Display for VoronoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoronoiError::NonFiniteSite => write!(f, "site coordinates must be finite"),
            VoronoiError::DuplicateSite => write!(f, "generator sites must be distinct"),
            VoronoiError::SiteOutsideClip => {
                write!(f, "every site must lie within the clipping rectangle")
            }
        }
    }
}

impl std::error::Error for VoronoiError {}

/// One clipped Voronoi edge.
///
/// `site1` and `site2` index the generators the edge separates; `start`
/// and `end` are the clipped world positions. A `vertex` index is present
/// when the corresponding endpoint is an actual Voronoi vertex; `None`
/// marks an unbounded end cut off at the clipping rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoronoiEdge {
    pub site1: usize,
    pub site2: usize,
    pub vertex1: Option<usize>,
    pub vertex2: Option<usize>,
    pub start: Point,
    pub end: Point,
}

/// The complete output of a Voronoi computation.
#[derive(Clone, Debug)]
pub struct VoronoiResults {
    clip: Rect,
    sites: Vec<Point>,
    vertices: Vec<Point>,
    edges: Vec<VoronoiEdge>,
    regions: Vec<Vec<Point>>,
    delaunay: Vec<(usize, usize)>,
}

/// Entry points for Voronoi and Delaunay computation.
pub struct VoronoiMap;

impl VoronoiMap {
    /// Computes the Voronoi diagram of `sites` clipped to `clip`.
    ///
    /// Sites must be finite, pairwise distinct, and lie within the
    /// clipping rectangle. An empty site set yields empty results; a
    /// single site yields no edges and one region equal to the rectangle.
    pub fn find_all(sites: &[Point], clip: Rect) -> Result<VoronoiResults, VoronoiError> {
        validate_sites(sites, Some(clip))?;

        if sites.len() <= 1 {
            return Ok(VoronoiResults {
                clip,
                sites: sites.to_vec(),
                vertices: Vec::new(),
                edges: Vec::new(),
                regions: sites.iter().map(|_| clip.to_polygon().to_vec()).collect(),
                delaunay: Vec::new(),
            });
        }

        let output = sweep::sweep(sites);
        Ok(finalize(sites, clip, output))
    }

    /// Computes only the Delaunay triangulation edges of `sites`, as world
    /// segments between generator points.
    ///
    /// The internal clipping rectangle is the generously inflated bounding
    /// box of the sites, so no finite triangulation edge is lost.
    pub fn find_delaunay(sites: &[Point]) -> Result<Vec<Line>, VoronoiError> {
        validate_sites(sites, None)?;
        if sites.len() < 2 {
            return Ok(Vec::new());
        }
        let mut bounds = Rect::from_corners(sites[0], sites[0]);
        for &s in &sites[1..] {
            bounds = bounds.union(Rect::from_corners(s, s));
        }
        let pad = (bounds.width() + bounds.height()).max(1.);
        let clip = bounds.inflate(pad);
        let results = Self::find_all(sites, clip)?;
        Ok(results.delaunay_lines())
    }
}

impl VoronoiResults {
    /// The clipping rectangle the diagram was computed against.
    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// The generator points, in input order.
    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    /// Voronoi vertex positions. Only vertices referenced by a surviving
    /// edge are retained.
    pub fn voronoi_vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// The clipped Voronoi edges.
    pub fn voronoi_edges(&self) -> &[VoronoiEdge] {
        &self.edges
    }

    /// The clipped Voronoi edges as plain segments.
    pub fn voronoi_lines(&self) -> Vec<Line> {
        self.edges
            .iter()
            .map(|e| Line::new(e.start, e.end))
            .collect()
    }

    /// The clipped region polygon of each generator, in input order.
    pub fn regions(&self) -> &[Vec<Point>] {
        &self.regions
    }

    /// The region polygon of one generator.
    pub fn region_of(&self, site: usize) -> &[Point] {
        &self.regions[site]
    }

    /// Generator index pairs connected in the Delaunay triangulation (the
    /// duals of the surviving Voronoi edges).
    pub fn delaunay_edges(&self) -> &[(usize, usize)] {
        &self.delaunay
    }

    /// The Delaunay edges as world segments between generator points.
    pub fn delaunay_lines(&self) -> Vec<Line> {
        self.delaunay
            .iter()
            .map(|&(a, b)| Line::new(self.sites[a], self.sites[b]))
            .collect()
    }

    /// Builds the planar subdivision of the Delaunay triangulation, with
    /// vertices at the generator sites.
    pub fn to_delaunay_subdivision(&self, epsilon: f64) -> Result<Subdivision, SubdivisionError> {
        Subdivision::from_lines(&self.delaunay_lines(), epsilon)
    }

    /// Builds the planar subdivision of the clipped Voronoi regions, with
    /// vertices at the Voronoi vertices and on the clip boundary.
    pub fn to_voronoi_subdivision(&self, epsilon: f64) -> Result<Subdivision, SubdivisionError> {
        Subdivision::from_polygons(&self.regions, epsilon)
    }
}

fn validate_sites(sites: &[Point], clip: Option<Rect>) -> Result<(), VoronoiError> {
    let mut seen = PointMap::new(SNAP).expect("tolerance is non-negative");
    for &site in sites {
        if !site.is_finite() {
            return Err(VoronoiError::NonFiniteSite);
        }
        if let Some(clip) = clip {
            if !clip.contains(site) {
                return Err(VoronoiError::SiteOutsideClip);
            }
        }
        if seen.insert(site, ()).1.is_some() {
            return Err(VoronoiError::DuplicateSite);
        }
    }
    Ok(())
}

/// Clips the raw sweep output to the rectangle and assembles regions and
/// Delaunay duals.
fn finalize(sites: &[Point], clip: Rect, output: sweep::SweepOutput) -> VoronoiResults {
    let diagonal = point!(clip.width(), clip.height()).length();
    let center = clip.center();

    let mut clipped: Vec<VoronoiEdge> = Vec::with_capacity(output.edges.len());
    for rec in &output.edges {
        if let Some(edge) = clip_edge(sites, &output.vertices, rec, clip, diagonal, center) {
            clipped.push(edge);
        }
    }

    // keep only referenced vertices, renumbering edge endpoints
    let mut remap: Vec<Option<usize>> = vec![None; output.vertices.len()];
    let mut vertices = Vec::new();
    for edge in clipped.iter_mut() {
        for slot in [&mut edge.vertex1, &mut edge.vertex2] {
            if let Some(old) = *slot {
                let new = *remap[old].get_or_insert_with(|| {
                    vertices.push(output.vertices[old]);
                    vertices.len() - 1
                });
                *slot = Some(new);
            }
        }
    }

    let mut delaunay: BTreeSet<(usize, usize)> = BTreeSet::new();
    for edge in &clipped {
        let pair = if edge.site1 < edge.site2 {
            (edge.site1, edge.site2)
        } else {
            (edge.site2, edge.site1)
        };
        delaunay.insert(pair);
    }

    let regions = build_regions(sites, clip, &clipped);

    VoronoiResults {
        clip,
        sites: sites.to_vec(),
        vertices,
        edges: clipped,
        regions,
        delaunay: delaunay.into_iter().collect(),
    }
}

fn clip_edge(
    sites: &[Point],
    vertices: &[Point],
    rec: &EdgeRec,
    clip: Rect,
    diagonal: f64,
    center: Point,
) -> Option<VoronoiEdge> {
    let (raw, tag1, tag2) = match (rec.vertex1, rec.vertex2) {
        (Some(v1), Some(v2)) => {
            let a = vertices[v1];
            let b = vertices[v2];
            if a.distance(b) <= SNAP {
                return None;
            }
            (Line::new(a, b), Some(v1), Some(v2))
        }
        (Some(v1), None) => {
            let a = vertices[v1];
            let dir = rec.open_dir.expect("half-open edge carries a direction");
            let dir = dir / dir.length();
            let reach = a.distance(center) + diagonal + 1.;
            (Line::new(a, a + dir * reach), Some(v1), None)
        }
        (None, _) => {
            // never closed: the full perpendicular bisector
            let a = sites[rec.site_a];
            let b = sites[rec.site_b];
            let mid = (a + b) / 2.;
            let dir = rot90(b - a);
            let dir = dir / dir.length();
            let reach = mid.distance(center) + diagonal + 1.;
            (Line::new(mid - dir * reach, mid + dir * reach), None, None)
        }
    };

    let clipped = clip.clip_line(&raw)?;
    if clipped.start.distance(clipped.end) <= SNAP {
        return None;
    }
    let vertex_tag = |tag: Option<usize>, p: Point| {
        tag.filter(|&v| vertices[v].distance(p) <= SNAP)
    };
    Some(VoronoiEdge {
        site1: rec.site_a,
        site2: rec.site_b,
        vertex1: vertex_tag(tag1, clipped.start),
        vertex2: vertex_tag(tag2, clipped.end),
        start: clipped.start,
        end: clipped.end,
    })
}

/// Assembles one clipped region polygon per site from its edge endpoints
/// plus the rectangle corners it owns, sorted around the site.
fn build_regions(sites: &[Point], clip: Rect, edges: &[VoronoiEdge]) -> Vec<Vec<Point>> {
    let mut raw: Vec<Vec<Point>> = vec![Vec::new(); sites.len()];
    for edge in edges {
        for site in [edge.site1, edge.site2] {
            raw[site].push(edge.start);
            raw[site].push(edge.end);
        }
    }
    for corner in clip.to_polygon() {
        let best = sites
            .iter()
            .map(|s| s.distance(corner))
            .fold(f64::INFINITY, f64::min);
        for (i, site) in sites.iter().enumerate() {
            if site.distance(corner) <= best + SNAP {
                raw[i].push(corner);
            }
        }
    }

    raw.iter()
        .enumerate()
        .map(|(i, points)| {
            let site = sites[i];
            let mut ring: Vec<Point> = Vec::with_capacity(points.len());
            for &p in points {
                if !ring.iter().any(|&q| q.distance(p) <= SNAP * 4.) {
                    ring.push(p);
                }
            }
            ring.sort_by(|a, b| {
                (*a - site)
                    .angle()
                    .partial_cmp(&(*b - site).angle())
                    .unwrap_or(Ordering::Equal)
            });
            // regions are convex, so the angular order is the ring order;
            // orient positively for a stable contract
            if polygon_area(&ring) < 0. {
                ring.reverse();
            }
            ring
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip10() -> Rect {
        Rect::new(point!(0.0, 0.0), point!(10.0, 10.0))
    }

    #[test]
    fn empty_input_yields_empty_results() {
        let results = VoronoiMap::find_all(&[], clip10()).unwrap();
        assert!(results.sites().is_empty());
        assert!(results.voronoi_edges().is_empty());
        assert!(results.regions().is_empty());
    }

    #[test]
    fn single_site_owns_the_whole_rectangle() {
        let results = VoronoiMap::find_all(&[point!(3.0, 3.0)], clip10()).unwrap();
        assert!(results.voronoi_edges().is_empty());
        assert_eq!(results.regions().len(), 1);
        assert_eq!(polygon_area(results.region_of(0)).abs(), 100.0);
    }

    #[test]
    fn two_sites_share_one_bisector_edge() {
        let results =
            VoronoiMap::find_all(&[point!(2.0, 5.0), point!(8.0, 5.0)], clip10()).unwrap();
        assert_eq!(results.voronoi_edges().len(), 1);
        let edge = results.voronoi_edges()[0];
        // the perpendicular bisector x = 5 clipped to the rectangle
        assert!((edge.start.x - 5.0).abs() <= 1e-9);
        assert!((edge.end.x - 5.0).abs() <= 1e-9);
        assert_eq!(edge.vertex1, None);
        assert_eq!(edge.vertex2, None);
        assert_eq!(results.delaunay_edges(), &[(0, 1)]);
        // both regions are half rectangles
        for region in results.regions() {
            assert!((polygon_area(region).abs() - 50.0).abs() <= 1e-6);
        }
    }

    #[test]
    fn collinear_sites_fan_out_parallel_edges() {
        let sites = [
            point!(2.0, 5.0),
            point!(5.0, 5.0),
            point!(8.0, 5.0),
        ];
        let results = VoronoiMap::find_all(&sites, clip10()).unwrap();
        assert_eq!(results.voronoi_edges().len(), 2);
        for edge in results.voronoi_edges() {
            assert!((edge.start.x - edge.end.x).abs() <= 1e-9, "edges are vertical");
        }
        let areas: Vec<f64> = results
            .regions()
            .iter()
            .map(|r| polygon_area(r).abs())
            .collect();
        assert!((areas[0] - 35.0).abs() <= 1e-6);
        assert!((areas[1] - 30.0).abs() <= 1e-6);
        assert!((areas[2] - 35.0).abs() <= 1e-6);
    }

    #[test]
    fn triangle_sites_meet_at_the_circumcenter() {
        let sites = [point!(2.0, 2.0), point!(8.0, 2.0), point!(5.0, 8.0)];
        let results = VoronoiMap::find_all(&sites, clip10()).unwrap();
        assert_eq!(results.voronoi_vertices().len(), 1);
        let v = results.voronoi_vertices()[0];
        let r0 = v.distance(sites[0]);
        for s in &sites[1..] {
            assert!((v.distance(*s) - r0).abs() <= 1e-9);
        }
        assert_eq!(results.voronoi_edges().len(), 3);
        assert_eq!(results.delaunay_edges().len(), 3);
        // every generator lies inside its region
        for (i, region) in results.regions().iter().enumerate() {
            use crate::algorithm::polygon::{point_in_polygon, PolygonLocation};
            assert_eq!(
                point_in_polygon(sites[i], region, 1e-9),
                PolygonLocation::Inside
            );
        }
    }

    #[test]
    fn regions_partition_the_rectangle() {
        let sites = [
            point!(1.5, 1.0),
            point!(7.0, 2.0),
            point!(4.0, 4.5),
            point!(2.0, 8.0),
            point!(8.5, 7.5),
            point!(5.5, 9.0),
        ];
        let results = VoronoiMap::find_all(&sites, clip10()).unwrap();
        let total: f64 = results
            .regions()
            .iter()
            .map(|r| polygon_area(r).abs())
            .sum();
        assert!(
            (total - 100.0).abs() <= 1e-6,
            "region areas sum to the clip area, got {total}"
        );
    }

    #[test]
    fn validation_errors() {
        assert_eq!(
            VoronoiMap::find_all(&[point!(f64::NAN, 0.0)], clip10()).unwrap_err(),
            VoronoiError::NonFiniteSite
        );
        assert_eq!(
            VoronoiMap::find_all(&[point!(1.0, 1.0), point!(1.0, 1.0)], clip10()).unwrap_err(),
            VoronoiError::DuplicateSite
        );
        assert_eq!(
            VoronoiMap::find_all(&[point!(11.0, 1.0)], clip10()).unwrap_err(),
            VoronoiError::SiteOutsideClip
        );
    }

    #[test]
    fn find_delaunay_of_a_square_has_five_edges() {
        let sites = [
            point!(0.0, 0.0),
            point!(4.0, 0.0),
            point!(0.0, 4.0),
            point!(4.0, 4.0),
        ];
        let lines = VoronoiMap::find_delaunay(&sites).unwrap();
        // four sides plus one diagonal of the cocircular square
        assert!(lines.len() == 4 || lines.len() == 5, "got {}", lines.len());
    }
}
