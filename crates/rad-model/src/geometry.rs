//! Derived geometry: bounding boxes and element quality.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use rad_deck::Vec3;

/// Quality below this value marks an element as degenerate.
pub const DEGENERATE_THRESHOLD: f64 = 1e-6;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Component-wise min/max over `points`; the origin pair when empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::default();
        };
        let mut min = Vector3::from(*first);
        let mut max = min;
        for p in points {
            let v = Vector3::from(*p);
            min = min.inf(&v);
            max = max.sup(&v);
        }
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn center(&self) -> Vec3 {
        ((Vector3::from(self.min) + Vector3::from(self.max)) * 0.5).into()
    }

    pub fn extent(&self) -> Vec3 {
        (Vector3::from(self.max) - Vector3::from(self.min)).into()
    }

    pub fn diagonal(&self) -> f64 {
        Vector3::from(self.extent()).norm()
    }
}

/// Normalized triangle shape quality: `12·√3·area / perimeter²`.
///
/// 1.0 for an equilateral triangle, tending to 0 for needles and slivers.
pub fn triangle_quality(a: Vec3, b: Vec3, c: Vec3) -> f64 {
    let (a, b, c) = (Vector3::from(a), Vector3::from(b), Vector3::from(c));
    let ab = b - a;
    let ac = c - a;
    let bc = c - b;
    let perimeter = ab.norm() + ac.norm() + bc.norm();
    if perimeter <= f64::EPSILON {
        return 0.0;
    }
    let area = 0.5 * ab.cross(&ac).norm();
    if area <= 1e-12 {
        return 0.0;
    }
    let quality = 12.0 * 3f64.sqrt() * area / (perimeter * perimeter);
    quality.clamp(0.0, 1.0)
}

/// Unit normal of a triangle, `None` when the triangle has no area.
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Option<Vec3> {
    let (a, b, c) = (Vector3::from(a), Vector3::from(b), Vector3::from(c));
    (b - a).cross(&(c - a)).try_normalize(f64::EPSILON).map(Into::into)
}

pub fn distance(a: Vec3, b: Vec3) -> f64 {
    (Vector3::from(a) - Vector3::from(b)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bounds_are_origin() {
        let b = Aabb::from_points(std::iter::empty());
        assert_eq!(b.min, [0.0; 3]);
        assert_eq!(b.max, [0.0; 3]);
    }

    #[test]
    fn bounds_cover_all_points() {
        let pts = [[1.0, -2.0, 3.0], [-1.0, 4.0, 0.5], [0.0, 0.0, 9.0]];
        let b = Aabb::from_points(pts.iter());
        assert_eq!(b.min, [-1.0, -2.0, 0.5]);
        assert_eq!(b.max, [1.0, 4.0, 9.0]);
        assert_eq!(b.center(), [0.0, 1.0, 4.75]);
    }

    #[test]
    fn equilateral_triangle_is_perfect() {
        let h = 3f64.sqrt() / 2.0;
        let q = triangle_quality([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, h, 0.0]);
        assert!((q - 1.0).abs() < 1e-12, "quality {q}");
    }

    #[test]
    fn right_isosceles_is_below_one() {
        let q = triangle_quality([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]);
        assert!(q > 0.85 && q < 0.9, "quality {q}");
    }

    #[test]
    fn collinear_points_have_zero_quality() {
        let q = triangle_quality([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert!(q < DEGENERATE_THRESHOLD);
        assert_eq!(triangle_quality([1.0; 3], [1.0; 3], [1.0; 3]), 0.0);
    }

    #[test]
    fn normal_of_xy_triangle_points_up() {
        let n = triangle_normal([0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]).expect("has area");
        assert_eq!(n, [0.0, 0.0, 1.0]);
        assert!(triangle_normal([0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]).is_none());
    }
}
