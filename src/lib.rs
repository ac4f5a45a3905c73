//! The `tessella` crate provides planar geometry primitives and the
//! algorithms built on them: planar subdivisions, Voronoi diagrams,
//! polygon grids, and graph search.
//!
//! # Types
//!
//! - **[`Point`]**: a two-dimensional coordinate pair, generic over its
//!   scalar (`f64` by default; integer points offer overflow-checked
//!   arithmetic)
//! - **[`Line`]**: a directed segment between two [`Point`]s
//! - **[`Rect`]**: an axis-aligned rectangle with ordered corners
//! - **[`Size`]**: a non-negative extent
//!
//! # Engines
//!
//! - **[`Subdivision`]**: a doubly-connected edge list over the plane,
//!   built from segments or polygons, supporting edits, validation, point
//!   location, and Boolean overlay
//! - **[`VoronoiMap`](voronoi::VoronoiMap)**: Fortune's sweep producing a
//!   clipped Voronoi diagram and its Delaunay dual
//! - **[`line_crossings`](algorithm::line_crossings)**: all crossings of a
//!   segment set, by brute force or a Bentley–Ottmann sweep
//! - **[`PolygonGrid`](grid::PolygonGrid)**: square and hexagonal tilings
//!   with grid/world mapping and neighbor queries
//! - **[`graph`]**: an abstract graph capability with A*, coverage, flood
//!   fill, and visibility algorithms over subdivisions and grids
//! - **[`collections`]**: the ordered point map and quadtree backing the
//!   engines' spatial queries
//!
//! # Coordinate conventions
//!
//! All engines operate on `f64` coordinates with a caller-supplied
//! absolute tolerance (`epsilon`). Signed areas follow the screen
//! convention (y grows downward): the outer boundary cycle of a bounded
//! subdivision face has negative signed area, hole cycles positive.
//!
//! # Features
//!
//! - `use-serde`: `Serialize`/`Deserialize` derives on the plain value
//!   types

#[macro_use]
extern crate log;

pub mod algorithm;
pub mod collections;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod grid;
pub mod kernels;
pub mod subdivision;
pub mod voronoi;

pub use crate::error::GeometryError;
pub use crate::geometry::{
    Axis, Line, LineIntersection, LineLocation, LineRelation, Point, PointOrder, Rect, Size,
};
pub use crate::subdivision::Subdivision;

/// A prelude re-exporting the commonly used types and traits. Typically
/// imported with `use tessella::prelude::*`.
pub mod prelude {
    pub use crate::algorithm::line_crossings::{self, CrossingPoint};
    pub use crate::algorithm::polygon::{convex_hull, point_in_polygon, PolygonLocation};
    pub use crate::collections::{PointMap, QuadTree};
    pub use crate::error::GeometryError;
    pub use crate::geometry::{
        Line, LineIntersection, LineLocation, LineRelation, Point, PointOrder, Rect, Size,
    };
    pub use crate::graph::{GraphAgent, GraphLike};
    pub use crate::grid::{GridPoint, PolygonGrid};
    pub use crate::subdivision::Subdivision;
    pub use crate::voronoi::VoronoiMap;
}

/// The scalar bound shared by every primitive type.
///
/// Satisfied by the built-in integer and floating point types. Algorithms
/// that need real arithmetic bound their scalar by [`CoordFloat`] instead.
pub trait CoordNum:
    num_traits::Num + num_traits::NumCast + Copy + PartialOrd + std::fmt::Debug
{
}
impl<T> CoordNum for T where
    T: num_traits::Num + num_traits::NumCast + Copy + PartialOrd + std::fmt::Debug
{
}

/// The scalar bound for methods that require real arithmetic.
pub trait CoordFloat: CoordNum + num_traits::Float {}
impl<T> CoordFloat for T where T: CoordNum + num_traits::Float {}
