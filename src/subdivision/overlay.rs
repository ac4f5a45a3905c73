//! Boolean overlay: intersecting two subdivisions into one whose faces
//! map back to a source face in each input.

use super::{FaceKey, Subdivision, SubdivisionError, UNBOUNDED_FACE};
use crate::algorithm::line_crossings;
use crate::algorithm::polygon::{
    point_in_polygon, polygon_centroid, triangulate, PolygonLocation,
};
use crate::geometry::{Line, Point};

/// The result of [`Subdivision::intersection`]: the combined subdivision
/// plus, for every face key of the result, the face of each input that
/// contains it.
#[derive(Debug)]
pub struct SubdivisionIntersection {
    pub subdivision: Subdivision,
    /// Source face in the first input, indexed by result face key.
    pub face_keys1: Vec<FaceKey>,
    /// Source face in the second input, indexed by result face key.
    pub face_keys2: Vec<FaceKey>,
}

impl Subdivision {
    /// Overlays two subdivisions: the result's edge set is the union of
    /// both inputs' edges, split at all mutual crossings, and every
    /// result face knows which face of each input contains it.
    ///
    /// The unbounded face always maps to both unbounded faces.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessella::{point, Subdivision};
    ///
    /// let square = [
    ///     point!(-1.0, -2.0),
    ///     point!(-1.0, 2.0),
    ///     point!(1.0, 2.0),
    ///     point!(1.0, -2.0),
    /// ];
    /// let star = [
    ///     point!(-1.0, 0.0),
    ///     point!(0.0, 2.0),
    ///     point!(1.0, 0.0),
    ///     point!(0.0, -2.0),
    /// ];
    /// let a = Subdivision::from_polygons(&[&square[..]], 0.0).unwrap();
    /// let b = Subdivision::from_polygons(&[&star[..]], 0.0).unwrap();
    /// let overlay = Subdivision::intersection(&a, &b).unwrap();
    /// assert_eq!(overlay.subdivision.face_count(), 5);
    /// ```
    pub fn intersection(
        a: &Subdivision,
        b: &Subdivision,
    ) -> Result<SubdivisionIntersection, SubdivisionError> {
        let epsilon = a.epsilon.max(b.epsilon);
        let mut lines: Vec<Line> = a.to_lines();
        lines.extend(b.to_lines());

        let crossings =
            line_crossings::find(&lines, epsilon).map_err(SubdivisionError::from)?;
        let pieces = line_crossings::split(&lines, &crossings);
        let mut subdivision = Subdivision::from_lines(&pieces, epsilon)?;
        subdivision.renumber_faces();

        let face_count = subdivision.face_count();
        let mut face_keys1 = vec![UNBOUNDED_FACE; face_count];
        let mut face_keys2 = vec![UNBOUNDED_FACE; face_count];
        let keys: Vec<FaceKey> = subdivision.faces().map(|(k, _)| k).collect();
        for key in keys {
            if key == UNBOUNDED_FACE {
                continue;
            }
            let sample = subdivision
                .face_sample(key)
                .ok_or_else(|| {
                    SubdivisionError::Invariant(format!("no interior sample for {key}"))
                })?;
            face_keys1[key.0 as usize] = a.find_face(sample);
            face_keys2[key.0 as usize] = b.find_face(sample);
        }
        Ok(SubdivisionIntersection {
            subdivision,
            face_keys1,
            face_keys2,
        })
    }

    /// A point strictly inside a bounded face: the outer-cycle centroid
    /// when that lands in the face, otherwise the centroid of an ear of
    /// the outer cycle. Concave faces and faces with holes make the plain
    /// centroid unusable, hence the triangulation fallback.
    pub(crate) fn face_sample(&self, key: FaceKey) -> Option<Point> {
        let polygon = self.face_polygon(key)?;
        let centroid = polygon_centroid(&polygon)?;
        if self.face_contains(key, centroid) {
            return Some(centroid);
        }
        for ear in triangulate(&polygon)? {
            if let Some(candidate) = polygon_centroid(&ear) {
                if self.face_contains(key, candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Whether `q` lies strictly inside the face: inside its outer cycle
    /// and outside every hole.
    pub(crate) fn face_contains(&self, key: FaceKey, q: Point) -> bool {
        let face = match self.faces.get(&key) {
            Some(face) => face,
            None => return false,
        };
        match face.outer_edge {
            Some(outer) => {
                if point_in_polygon(q, &self.cycle_polygon(outer), 0.) != PolygonLocation::Inside
                {
                    return false;
                }
            }
            None => return false,
        }
        face.inner_edges.iter().all(|&inner| {
            point_in_polygon(q, &self.cycle_polygon(inner), 0.) != PolygonLocation::Inside
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point;

    #[test]
    fn overlay_of_identical_squares_is_the_square() {
        let square = [
            point!(0.0, 0.0),
            point!(4.0, 0.0),
            point!(4.0, 4.0),
            point!(0.0, 4.0),
        ];
        let a = Subdivision::from_polygons(&[&square[..]], 0.).unwrap();
        let b = a.clone();
        let overlay = Subdivision::intersection(&a, &b).unwrap();
        assert!(overlay.subdivision.structure_equals(&a));
        assert_eq!(overlay.face_keys1, overlay.face_keys2);
        assert_eq!(overlay.face_keys1[0], UNBOUNDED_FACE);
    }

    #[test]
    fn overlapping_squares_partition_into_three_cells() {
        let left = [
            point!(0.0, 0.0),
            point!(4.0, 0.0),
            point!(4.0, 4.0),
            point!(0.0, 4.0),
        ];
        let right = [
            point!(2.0, 0.0),
            point!(6.0, 0.0),
            point!(6.0, 4.0),
            point!(2.0, 4.0),
        ];
        let a = Subdivision::from_polygons(&[&left[..]], 0.).unwrap();
        let b = Subdivision::from_polygons(&[&right[..]], 0.).unwrap();
        let overlay = Subdivision::intersection(&a, &b).unwrap();
        let sub = &overlay.subdivision;
        assert_eq!(sub.face_count(), 4);
        sub.validate().unwrap();

        let a_only = sub.find_face(point!(1.0, 2.0));
        let both = sub.find_face(point!(3.0, 2.0));
        let b_only = sub.find_face(point!(5.0, 2.0));
        assert_ne!(overlay.face_keys1[a_only.0 as usize], UNBOUNDED_FACE);
        assert_eq!(overlay.face_keys2[a_only.0 as usize], UNBOUNDED_FACE);
        assert_ne!(overlay.face_keys1[both.0 as usize], UNBOUNDED_FACE);
        assert_ne!(overlay.face_keys2[both.0 as usize], UNBOUNDED_FACE);
        assert_eq!(overlay.face_keys1[b_only.0 as usize], UNBOUNDED_FACE);
        assert_ne!(overlay.face_keys2[b_only.0 as usize], UNBOUNDED_FACE);
    }

    #[test]
    fn concave_faces_fall_back_to_an_ear_sample() {
        // a C-shaped ring whose centroid lies in the cavity
        let c_shape = [
            point!(0.0, 0.0),
            point!(6.0, 0.0),
            point!(6.0, 1.0),
            point!(1.0, 1.0),
            point!(1.0, 5.0),
            point!(6.0, 5.0),
            point!(6.0, 6.0),
            point!(0.0, 6.0),
        ];
        let a = Subdivision::from_polygons(&[&c_shape[..]], 0.).unwrap();
        let face = a
            .faces()
            .find(|(k, _)| *k != UNBOUNDED_FACE)
            .map(|(k, _)| k)
            .unwrap();
        let sample = a.face_sample(face).unwrap();
        assert!(a.face_contains(face, sample));

        // overlaying with a disjoint square still maps every face
        let square = [
            point!(8.0, 0.0),
            point!(9.0, 0.0),
            point!(9.0, 1.0),
            point!(8.0, 1.0),
        ];
        let b = Subdivision::from_polygons(&[&square[..]], 0.).unwrap();
        let overlay = Subdivision::intersection(&a, &b).unwrap();
        overlay.subdivision.validate().unwrap();
        // exactly one bounded result face maps into the C shape
        let hits = overlay
            .face_keys1
            .iter()
            .filter(|&&f| f != UNBOUNDED_FACE)
            .count();
        assert_eq!(hits, 1);
    }
}
