use nalgebra::{SMatrix, SVector};

use crate::corners::{Point2d, Quad};
use crate::rectify::RectifyError;

/// Flat row-major representation of a 3x3 projective matrix.
pub type PerspectiveMatrix = [f64; 9];

/// Compute the perspective transform mapping one quadrilateral onto another.
///
/// Each of the four corner correspondences contributes two equations, giving
/// an 8x8 linear system in the matrix entries; the system is solved with an LU
/// decomposition with partial pivoting and the result is normalized so the
/// bottom-right entry is 1. The mapping is fully projective, so non-affine
/// (perspective) distortion between the quadrilaterals is handled.
///
/// # Arguments
///
/// * `src` - The source quadrilateral.
/// * `dst` - The destination quadrilateral, with corners in the same role order.
///
/// # Errors
///
/// Returns [`RectifyError::SingularTransform`] when the corner correspondences
/// do not determine a unique invertible mapping (collinear or coincident
/// points).
///
/// # Example
///
/// ```
/// use deskew_imgproc::corners::{Point2d, Quad};
/// use deskew_imgproc::homography::get_perspective_transform;
///
/// let square = Quad {
///     tl: Point2d::new(0.0, 0.0),
///     tr: Point2d::new(1.0, 0.0),
///     br: Point2d::new(1.0, 1.0),
///     bl: Point2d::new(0.0, 1.0),
/// };
///
/// let m = get_perspective_transform(&square, &square).unwrap();
/// assert!((m[0] - 1.0).abs() < 1e-12);
/// assert!(m[1].abs() < 1e-12);
/// ```
pub fn get_perspective_transform(src: &Quad, dst: &Quad) -> Result<PerspectiveMatrix, RectifyError> {
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for (i, (s, d)) in src.points().iter().zip(dst.points().iter()).enumerate() {
        let (x, y) = (s.x, s.y);
        let (u, v) = (d.x, d.y);

        // u * (h6*x + h7*y + 1) = h0*x + h1*y + h2
        a[(2 * i, 0)] = x;
        a[(2 * i, 1)] = y;
        a[(2 * i, 2)] = 1.0;
        a[(2 * i, 6)] = -u * x;
        a[(2 * i, 7)] = -u * y;
        b[2 * i] = u;

        // v * (h6*x + h7*y + 1) = h3*x + h4*y + h5
        a[(2 * i + 1, 3)] = x;
        a[(2 * i + 1, 4)] = y;
        a[(2 * i + 1, 5)] = 1.0;
        a[(2 * i + 1, 6)] = -v * x;
        a[(2 * i + 1, 7)] = -v * y;
        b[2 * i + 1] = v;
    }

    let h = a.lu().solve(&b).ok_or(RectifyError::SingularTransform)?;

    if h.iter().any(|x| !x.is_finite()) {
        return Err(RectifyError::SingularTransform);
    }

    Ok([h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0])
}

/// Apply a perspective matrix to a single point.
pub fn transform_point(p: Point2d, m: &PerspectiveMatrix) -> Point2d {
    let w = m[6] * p.x + m[7] * p.y + m[8];
    Point2d::new(
        (m[0] * p.x + m[1] * p.y + m[2]) / w,
        (m[3] * p.x + m[4] * p.y + m[5]) / w,
    )
}

/// Apply a perspective matrix to a slice of points.
pub fn transform_points(points: &[Point2d], m: &PerspectiveMatrix) -> Vec<Point2d> {
    points.iter().map(|&p| transform_point(p, m)).collect()
}
