use crate::error::GeometryError;
use crate::geometry::{Point, Rect};
use crate::point;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// An ordered map keyed by [`Point`] under the canonical y-then-x order,
/// with tolerance-aware key lookup.
///
/// A tolerance comparator is not a total order (tolerance intervals chain),
/// so the map cannot use it for its internal ordering. Instead, keys are
/// stored under the exact lexicographic order and every insertion first
/// probes for the nearest existing key: a key within the tolerance is
/// reused as the cluster representative, otherwise the new point becomes
/// one. This keeps the key set pairwise farther apart than the tolerance,
/// which makes all subsequent tolerant lookups unambiguous.
///
/// Equality compares contents and is independent of insertion order.
///
/// # Examples
///
/// ```
/// use tessella::collections::PointMap;
/// use tessella::point;
///
/// let mut map = PointMap::new(0.5).unwrap();
/// map.insert(point!(1.0, 1.0), "a");
/// // within tolerance: the existing key is reused
/// let (rep, old) = map.insert(point!(1.2, 1.1), "b");
/// assert_eq!(rep, point!(1.0, 1.0));
/// assert_eq!(old, Some("a"));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct PointMap<V> {
    map: BTreeMap<MapKey, V>,
    epsilon: f64,
}

/// A point wrapper ordered exactly by y, then x.
#[derive(Clone, Copy, Debug, PartialEq)]
struct MapKey(Point);

impl Eq for MapKey {}

impl PartialOrd for MapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .y
            .partial_cmp(&other.0.y)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.0.x.partial_cmp(&other.0.x).unwrap_or(Ordering::Equal))
    }
}

impl<V> PointMap<V> {
    /// Creates an empty map with the given key tolerance.
    pub fn new(epsilon: f64) -> Result<Self, GeometryError> {
        if !(epsilon >= 0.) {
            return Err(GeometryError::InvalidEpsilon);
        }
        Ok(Self {
            map: BTreeMap::new(),
            epsilon,
        })
    }

    /// Creates an empty map with exact key comparison.
    pub fn with_exact() -> Self {
        Self {
            map: BTreeMap::new(),
            epsilon: 0.,
        }
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Inserts a value, clustering the key onto an existing representative
    /// within the tolerance. Returns the representative actually used and
    /// the previous value stored under it, if any.
    pub fn insert(&mut self, p: Point, value: V) -> (Point, Option<V>) {
        let key = self.representative(p).unwrap_or(p);
        let old = self.map.insert(MapKey(key), value);
        (key, old)
    }

    /// The stored key within the tolerance of `p`, if any.
    pub fn representative(&self, p: Point) -> Option<Point> {
        if self.epsilon == 0. {
            return self.map.contains_key(&MapKey(p)).then_some(p);
        }
        match self.find_nearest(p) {
            Some((key, _)) if key.distance(p) <= self.epsilon => Some(key),
            _ => None,
        }
    }

    pub fn get(&self, p: Point) -> Option<&V> {
        let key = self.representative(p)?;
        self.map.get(&MapKey(key))
    }

    pub fn get_mut(&mut self, p: Point) -> Option<&mut V> {
        let key = self.representative(p)?;
        self.map.get_mut(&MapKey(key))
    }

    pub fn get_key_value(&self, p: Point) -> Option<(Point, &V)> {
        let key = self.representative(p)?;
        self.map.get(&MapKey(key)).map(|v| (key, v))
    }

    pub fn contains(&self, p: Point) -> bool {
        self.representative(p).is_some()
    }

    pub fn remove(&mut self, p: Point) -> Option<(Point, V)> {
        let key = self.representative(p)?;
        self.map.remove(&MapKey(key)).map(|v| (key, v))
    }

    /// Iterates entries in y-then-x key order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &V)> {
        self.map.iter().map(|(k, v)| (k.0, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = Point> + '_ {
        self.map.keys().map(|k| k.0)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.map.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.map.values_mut()
    }

    /// The entry nearest to `q` in euclidean distance.
    ///
    /// Walks the y-band outward from `q` in both directions and stops each
    /// direction once its y distance alone exceeds the best candidate.
    pub fn find_nearest(&self, q: Point) -> Option<(Point, &V)> {
        if self.map.is_empty() {
            return None;
        }
        let mut best: Option<(Point, &V)> = None;
        let mut best_dist = f64::INFINITY;

        let pivot = MapKey(point!(f64::NEG_INFINITY, q.y));
        for (k, v) in self.map.range(pivot..) {
            if k.0.y - q.y > best_dist {
                break;
            }
            let d = k.0.distance(q);
            if d < best_dist {
                best_dist = d;
                best = Some((k.0, v));
            }
        }
        for (k, v) in self.map.range(..pivot).rev() {
            if q.y - k.0.y > best_dist {
                break;
            }
            let d = k.0.distance(q);
            if d < best_dist {
                best_dist = d;
                best = Some((k.0, v));
            }
        }
        best
    }

    /// All entries whose key lies in `rect`, inflated by the tolerance.
    ///
    /// The scan is restricted to a single ordered sub-range bounded by two
    /// synthetic keys below and above the rectangle's y band; only that
    /// band is filtered by x.
    pub fn find_range(&self, rect: Rect) -> Vec<(Point, &V)> {
        let lo = MapKey(point!(f64::NEG_INFINITY, rect.min().y - self.epsilon));
        let hi = MapKey(point!(f64::INFINITY, rect.max().y + self.epsilon));
        self.map
            .range(lo..=hi)
            .filter(|(k, _)| rect.contains_with(k.0, self.epsilon))
            .map(|(k, v)| (k.0, v))
            .collect()
    }
}

impl<V: PartialEq> PartialEq for PointMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<V> Default for PointMap<V> {
    fn default() -> Self {
        Self::with_exact()
    }
}

/// An ordered set of points with tolerance-aware membership.
pub type PointSet = PointMap<()>;
