//! Clean-up applied to raw pointer input when a drawing session finishes.

use crate::geometry::bounding_box;
use kurbo::Point;

/// Default decimation distance for pathway smoothing (ft).
pub const PATHWAY_MIN_DISTANCE: f64 = 0.3;

/// Force a raw two-corner rectangle to a fixed short-axis width.
///
/// The longer axis of the raw bounding box is kept exactly; the shorter one
/// is re-centred to `target_width`. The output is the same rectangle for all
/// four drag directions, in corner order starting at the minimum corner.
pub fn constrain_rectangle_width(vertices: &[Point], target_width: f64) -> Vec<Point> {
    let Some(bounds) = bounding_box(vertices) else {
        return vertices.to_vec();
    };
    let half = target_width / 2.0;
    let center = bounds.center();

    let (x0, x1, y0, y1) = if bounds.width() >= bounds.height() {
        (bounds.x0, bounds.x1, center.y - half, center.y + half)
    } else {
        (center.x - half, center.x + half, bounds.y0, bounds.y1)
    };

    vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

/// Smooth a freehand pathway.
///
/// Points closer than `min_distance` to the previously kept point are
/// dropped (the last point is always kept), then interior points are replaced
/// by a 3-point moving average. Averaging can pull a point back towards its
/// predecessor, so interior points that end up closer than `min_distance`
/// are dropped once more. First and last points are returned unchanged.
pub fn smooth_pathway(points: &[Point], min_distance: f64) -> Vec<Point> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut kept = vec![first];
    for &point in &points[1..points.len() - 1] {
        if kept.last().is_some_and(|prev| (point - *prev).hypot() >= min_distance) {
            kept.push(point);
        }
    }
    kept.push(last);

    if kept.len() <= 2 {
        return kept;
    }

    let mut smoothed = Vec::with_capacity(kept.len());
    smoothed.push(first);
    for window in kept.windows(3) {
        let avg = (window[0].to_vec2() + window[1].to_vec2() + window[2].to_vec2()) / 3.0;
        let candidate = avg.to_point();
        if smoothed.last().is_some_and(|prev| (candidate - *prev).hypot() >= min_distance) {
            smoothed.push(candidate);
        }
    }
    smoothed.push(last);
    smoothed
}
