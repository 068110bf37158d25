//! Small geometric helpers on polygon loops.

use glamx::Vec3;

/// Mean of a set of points, `Vec3::ZERO` if empty.
pub fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }

    points.iter().copied().sum::<Vec3>() / points.len() as f32
}

/// Unit normal of a (possibly non-planar) polygon, following its winding.
///
/// Uses Newell's method so that concave and slightly warped polygons still get
/// a sensible normal. Returns `Vec3::ZERO` for degenerate polygons.
pub fn polygon_normal(points: &[Vec3]) -> Vec3 {
    let mut normal = Vec3::ZERO;

    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }

    normal.normalize_or_zero()
}

/// Fan triangulation of a polygon loop, anchored at its first vertex.
pub fn fan_triangles<T: Copy>(cycle: &[T]) -> impl Iterator<Item = [T; 3]> + '_ {
    (1..cycle.len().saturating_sub(1)).map(move |i| [cycle[0], cycle[i], cycle[i + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn square_normal_follows_winding() {
        let square = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let n = polygon_normal(&square);
        assert_relative_eq!(n.z, 1.0);

        let mut reversed = square;
        reversed.reverse();
        assert_relative_eq!(polygon_normal(&reversed).z, -1.0);
    }

    #[test]
    fn fan_of_pentagon_has_three_triangles() {
        let tris: Vec<_> = fan_triangles(&[0, 1, 2, 3, 4]).collect();
        assert_eq!(tris, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
        assert_eq!(fan_triangles(&[0, 1]).count(), 0);
    }
}
