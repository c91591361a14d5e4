//! Planar geometry helpers shared by hit-testing, snapping and transforms.
//!
//! Angles are in degrees. Positive angles turn +x towards +y, which reads as
//! clockwise on a y-down canvas.

use kurbo::{Affine, Point, Rect, Vec2};

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let (projection, _) = project_onto_segment(point, a, b);
    (point - projection).hypot()
}

/// Closest point on segment a→b and its parameter `t ∈ [0, 1]`.
pub fn project_onto_segment(point: Point, a: Point, b: Point) -> (Point, f64) {
    let seg = b - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return (a, 0.0);
    }
    let t = ((point - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    (a + seg * t, t)
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    if let [only] = points {
        return (point - *only).hypot();
    }
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Even-odd ray-casting point-in-polygon test.
///
/// The polygon is implicitly closed. Boundary handling is half-open: for an
/// axis-aligned box, points on the minimum-x and minimum-y edges are inside
/// and points on the maximum edges are not, so abutting polygons never both
/// claim a shared edge.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pi.x + (point.y - pi.y) * (pj.x - pi.x) / (pj.y - pi.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Axis-aligned bounding box of a point set.
pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let rect = points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p));
    Some(rect)
}

/// Inclusive containment, unlike `Rect::contains` which excludes the far edges.
pub fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Rotate a point about `center` by `degrees`.
pub fn rotate_point(point: Point, center: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return point;
    }
    Affine::rotate_about(degrees.to_radians(), center) * point
}

/// Rotate a vector (no translation) by `degrees`.
pub fn rotate_vec(vec: Vec2, degrees: f64) -> Vec2 {
    if degrees == 0.0 {
        return vec;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(vec.x * cos - vec.y * sin, vec.x * sin + vec.y * cos)
}

/// Rotate every point about `center` by `degrees`.
pub fn rotate_points(points: &[Point], center: Point, degrees: f64) -> Vec<Point> {
    points.iter().map(|p| rotate_point(*p, center, degrees)).collect()
}

/// Normalize an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed angle in degrees from `center→from` to `center→to`, in `(-180, 180]`.
pub fn angle_between(center: Point, from: Point, to: Point) -> f64 {
    let a = from - center;
    let b = to - center;
    if a.hypot2() < f64::EPSILON || b.hypot2() < f64::EPSILON {
        return 0.0;
    }
    a.cross(b).atan2(a.dot(b)).to_degrees()
}

/// Direction of segment a→b in degrees, normalized into `[0, 360)`.
pub fn segment_angle(a: Point, b: Point) -> f64 {
    let d = b - a;
    normalize_degrees(d.y.atan2(d.x).to_degrees())
}

/// Unit vector along a→b, or `None` for a degenerate segment.
pub fn unit_direction(a: Point, b: Point) -> Option<Vec2> {
    let d = b - a;
    let len = d.hypot();
    if len < f64::EPSILON {
        None
    } else {
        Some(d / len)
    }
}

/// Rotated outline of a vertex set: vertices turned by `rotation` about the
/// centre of their bounding box.
pub fn rotated_outline(vertices: &[Point], rotation: f64) -> Vec<Point> {
    match bounding_box(vertices) {
        Some(bounds) if rotation != 0.0 => rotate_points(vertices, bounds.center(), rotation),
        _ => vertices.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        // Beyond the end: distance to the endpoint
        assert!((point_to_segment_dist(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        // Degenerate segment
        assert!((point_to_segment_dist(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_in_convex_polygon() {
        let sq = square(10.0);
        assert!(point_in_polygon(Point::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(20.0, 20.0), &sq));
        assert!(!point_in_polygon(Point::new(-0.1, 5.0), &sq));
    }

    #[test]
    fn test_point_in_concave_polygon() {
        // L-shape: notch in the upper-right quadrant
        let l_shape = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 4.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Point::new(2.0, 8.0), &l_shape));
        assert!(point_in_polygon(Point::new(8.0, 2.0), &l_shape));
        assert!(!point_in_polygon(Point::new(7.0, 7.0), &l_shape));
    }

    #[test]
    fn test_point_in_polygon_boundary_is_half_open() {
        let sq = square(10.0);
        // Left and bottom (min-y) boundaries belong to the polygon
        assert!(point_in_polygon(Point::new(0.0, 5.0), &sq));
        assert!(point_in_polygon(Point::new(5.0, 0.0), &sq));
        // Right and top (max) boundaries do not
        assert!(!point_in_polygon(Point::new(10.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(5.0, 10.0), &sq));
    }

    #[test]
    fn test_point_in_polygon_vertices() {
        let sq = square(10.0);
        assert!(point_in_polygon(Point::new(0.0, 0.0), &sq));
        assert!(!point_in_polygon(Point::new(10.0, 10.0), &sq));
        assert!(!point_in_polygon(Point::new(10.0, 0.0), &sq));
        assert!(!point_in_polygon(Point::new(0.0, 10.0), &sq));
    }

    #[test]
    fn test_point_in_polygon_needs_three_vertices() {
        let segment = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert!(!point_in_polygon(Point::new(5.0, 5.0), &segment));
    }

    #[test]
    fn test_bounding_box() {
        let bounds = bounding_box(&[Point::new(3.0, -1.0), Point::new(-2.0, 4.0), Point::new(1.0, 1.0)]).unwrap();
        assert_eq!(bounds, Rect::new(-2.0, -1.0, 3.0, 4.0));
        assert!(bounding_box(&[]).is_none());
    }

    #[test]
    fn test_rotate_point_quarter_turn() {
        let p = rotate_point(Point::new(10.0, 0.0), Point::ZERO, 90.0);
        assert!((p.x - 0.0).abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(370.0) - 10.0).abs() < 1e-12);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-12);
        assert!(normalize_degrees(360.0).abs() < 1e-12);
        let tiny = normalize_degrees(-1e-20);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_angle_between() {
        let c = Point::ZERO;
        let a = angle_between(c, Point::new(1.0, 0.0), Point::new(0.0, 1.0));
        assert!((a - 90.0).abs() < 1e-9);
        let b = angle_between(c, Point::new(0.0, 1.0), Point::new(1.0, 0.0));
        assert!((b + 90.0).abs() < 1e-9);
        assert_eq!(angle_between(c, c, Point::new(1.0, 0.0)), 0.0);
    }

    #[test]
    fn test_segment_angle() {
        assert!(segment_angle(Point::ZERO, Point::new(20.0, 0.0)).abs() < 1e-12);
        assert!((segment_angle(Point::ZERO, Point::new(0.0, -5.0)) - 270.0).abs() < 1e-9);
    }
}
