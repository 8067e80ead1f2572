//! Affine helpers shared by the gestures.
//!
//! All matrices follow kurbo's column-vector convention: `a * b` applies `b`
//! first. Composing a change "on the local side" of an item transform `t`
//! therefore reads `t * change`.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Determinant below which a transform is treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Invert an affine transform, or `None` if it is singular.
pub fn try_invert(transform: Affine) -> Option<Affine> {
    let det = transform.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
        return None;
    }
    Some(transform.inverse())
}

/// Translation by `offset`.
pub fn translation(offset: Vec2) -> Affine {
    Affine::translate(offset)
}

/// Uniform scale by `factor` that keeps `center` fixed.
pub fn scale_about(factor: f64, center: Point) -> Affine {
    let c = center.to_vec2();
    Affine::new([factor, 0.0, 0.0, factor, c.x - factor * c.x, c.y - factor * c.y])
}

/// Apply only the linear part of `transform` to a vector.
pub fn apply_linear(transform: Affine, vector: Vec2) -> Vec2 {
    let [a, b, c, d, _, _] = transform.as_coeffs();
    Vec2::new(a * vector.x + c * vector.y, b * vector.x + d * vector.y)
}

/// The linear part of `transform` with its translation dropped.
pub fn linear_part(transform: Affine) -> Affine {
    let [a, b, c, d, _, _] = transform.as_coeffs();
    Affine::new([a, b, c, d, 0.0, 0.0])
}

/// Map a surface-space vector into the space `transform` maps from.
///
/// Returns `None` when the transform is singular.
pub fn vector_to_local(transform: Affine, vector: Vec2) -> Option<Vec2> {
    try_invert(linear_part(transform)).map(|inverse| apply_linear(inverse, vector))
}

/// Check whether `transform` is the identity within floating-point noise.
pub fn is_identity(transform: Affine) -> bool {
    let identity = Affine::IDENTITY.as_coeffs();
    transform
        .as_coeffs()
        .iter()
        .zip(identity.iter())
        .all(|(a, b)| (a - b).abs() < 1e-12)
}

/// Map from an item's local space (`[0, w] x [0, h]`) to surface space.
///
/// `transform` is applied about the centre of `bounds`, and `bounds.origin()`
/// is the item's layout offset on the surface.
pub fn local_to_surface(bounds: Rect, transform: Affine) -> Affine {
    let half = Vec2::new(bounds.width() / 2.0, bounds.height() / 2.0);
    Affine::translate(bounds.center().to_vec2()) * transform * Affine::translate(-half)
}

/// Inverse of [`local_to_surface`], or `None` for a singular transform.
pub fn surface_to_local(bounds: Rect, transform: Affine) -> Option<Affine> {
    try_invert(local_to_surface(bounds, transform))
}

/// Express a surface point relative to an item's transform origin, in the
/// space the item transform maps from.
///
/// This is the anchor a local-side scale must use to keep `point` fixed on
/// screen.
pub fn to_transform_origin_space(bounds: Rect, transform: Affine, point: Point) -> Option<Point> {
    let inverse = try_invert(Affine::translate(bounds.center().to_vec2()) * transform)?;
    Some(inverse * point)
}

/// The local rectangle `[0, w] x [0, h]` of an item with layout size `size`.
pub fn local_rect(size: Size) -> Rect {
    Rect::from_origin_size(Point::ZERO, size)
}

/// Union of rectangles, or `None` for an empty input.
pub fn union_rects<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    rects.into_iter().reduce(|acc, rect| acc.union(rect))
}

/// Overlap test with inclusive edges.
///
/// A zero-sized rectangle lying inside (or on the edge of) `b` overlaps it.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    let a = a.abs();
    let b = b.abs();
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}
