use super::{up, Point3, Vector3, TOLERANCE};

/// Normal of the triangle `(a, b, c)` as `(b - a) × (c - a)`, flipped so
/// that its Y component is never negative.
///
/// The result is not normalized; its length is twice the triangle area.
#[must_use]
pub fn upward_normal(a: &Point3, b: &Point3, c: &Point3) -> Vector3 {
    orient_up((b - a).cross(&(c - a)))
}

/// Flips `v` when its Y component is negative.
#[must_use]
pub fn orient_up(v: Vector3) -> Vector3 {
    if v.y < 0.0 {
        -v
    } else {
        v
    }
}

/// Unit normal of the triangle `(a, b, c)` keeping its winding.
///
/// Both edge vectors are normalized before the cross product, as a depth
/// sensor mesher does for its source triangles. Returns `None` when the
/// triangle is degenerate.
#[must_use]
pub fn unit_normal(a: &Point3, b: &Point3, c: &Point3) -> Option<Vector3> {
    let e1 = (b - a).try_normalize(TOLERANCE)?;
    let e2 = (c - a).try_normalize(TOLERANCE)?;
    e1.cross(&e2).try_normalize(TOLERANCE)
}

/// Area of the triangle `(a, b, c)`.
#[must_use]
pub fn triangle_area(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    (b - a).cross(&(c - a)).norm() * 0.5
}

/// Angle in degrees between `a` and `b`, or `None` if either is (near) zero.
#[must_use]
pub fn angle_between_deg(a: &Vector3, b: &Vector3) -> Option<f64> {
    let denom = a.norm() * b.norm();
    if denom < TOLERANCE {
        return None;
    }
    let cos = (a.dot(b) / denom).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Angle in degrees between `normal` and the vertical.
#[must_use]
pub fn inclination_deg(normal: &Vector3) -> Option<f64> {
    angle_between_deg(&up(), normal)
}

/// Returns `true` if `a` and `b` lie strictly on opposite sides of the line
/// through `from` and `to`, measured within the plane with normal `plane_normal`.
#[must_use]
pub fn separated_by(
    from: &Point3,
    to: &Point3,
    a: &Point3,
    b: &Point3,
    plane_normal: &Vector3,
) -> bool {
    let axis = to - from;
    let side_a = axis.cross(&(a - from)).dot(plane_normal);
    let side_b = axis.cross(&(b - from)).dot(plane_normal);
    side_a * side_b < 0.0
}
