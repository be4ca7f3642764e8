//! Joint angle and segment orientation in the image plane.

use shotsim_dtw::Point2;

/// Segments shorter than this are treated as degenerate.
const MIN_SEGMENT_LEN: f64 = 1e-9;

/// Angle in degrees at `vertex` between the segments to `a` and to `c`.
///
/// Uses `acos(clamp(v1 · v2 / (|v1| |v2|), -1, 1))`. Returns `None` when
/// either segment has zero length.
#[must_use]
pub fn vertex_angle(a: Point2, vertex: Point2, c: Point2) -> Option<f64> {
    let (v1x, v1y) = (a.x - vertex.x, a.y - vertex.y);
    let (v2x, v2y) = (c.x - vertex.x, c.y - vertex.y);
    let mag1 = v1x.hypot(v1y);
    let mag2 = v2x.hypot(v2y);
    if mag1 < MIN_SEGMENT_LEN || mag2 < MIN_SEGMENT_LEN {
        return None;
    }
    let cos = ((v1x * v2x + v1y * v2y) / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Tilt in degrees of the line through `from` and `to` against the horizontal.
///
/// Folded into `(-90, 90]` so the result does not depend on which way the
/// athlete faces the camera. Returns `None` for coincident points.
#[must_use]
pub fn line_tilt(from: Point2, to: Point2) -> Option<f64> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    if dx.hypot(dy) < MIN_SEGMENT_LEN {
        return None;
    }
    let mut deg = dy.atan2(dx).to_degrees();
    if deg > 90.0 {
        deg -= 180.0;
    } else if deg <= -90.0 {
        deg += 180.0;
    }
    Some(deg)
}

/// Angle in degrees, in `[0, 90]`, between the line through `from` and `to`
/// and the vertical.
#[must_use]
pub fn angle_from_vertical(from: Point2, to: Point2) -> Option<f64> {
    line_tilt(from, to).map(|tilt| 90.0 - tilt.abs())
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: Point2, b: Point2) -> Point2 {
    Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}
