use deskew_image::{Image, ImageDtype, ImageError, ImageSize};

use crate::corners::{order_points, Point2d, Quad};
use crate::homography::get_perspective_transform;
use crate::interpolation::InterpolationMode;
use crate::warp::warp_perspective;

/// Errors that can occur during rectification.
#[derive(thiserror::Error, Debug)]
pub enum RectifyError {
    /// A corner coordinate is not a finite number.
    #[error("corner coordinates must be finite")]
    InvalidInput,

    /// The quadrilateral collapses to an empty output rectangle.
    #[error("degenerate quadrilateral, computed output size is {0}x{1}")]
    DegenerateGeometry(usize, usize),

    /// The perspective system has no unique invertible solution.
    #[error("perspective transform is singular")]
    SingularTransform,

    /// Error when creating or converting a pixel buffer.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Compute the output rectangle size for an ordered quadrilateral.
///
/// The width candidates are the bottom and top edge lengths, the height
/// candidates the right and left edge lengths. The smaller candidate of each
/// pair is kept, truncated to an integer, so the rectified rectangle never
/// exceeds the true extent of the quadrilateral on either axis.
///
/// # Errors
///
/// Returns [`RectifyError::DegenerateGeometry`] when either truncated
/// dimension is zero (collinear or coincident corners).
pub fn output_size(quad: &Quad) -> Result<ImageSize, RectifyError> {
    let width_bottom = quad.br.distance(&quad.bl);
    let width_top = quad.tr.distance(&quad.tl);
    let height_right = quad.tr.distance(&quad.br);
    let height_left = quad.tl.distance(&quad.bl);

    let width = width_bottom.min(width_top) as usize;
    let height = height_right.min(height_left) as usize;

    if width == 0 || height == 0 {
        return Err(RectifyError::DegenerateGeometry(width, height));
    }

    Ok(ImageSize { width, height })
}

/// Rectify the quadrilateral region spanned by four corner points into an
/// axis-aligned rectangle.
///
/// The corner points may come in any order; they are canonicalized, the output
/// rectangle size is derived from the quadrilateral edge lengths, a projective
/// transform is solved for the corner correspondences and the source image is
/// resampled through its inverse with bilinear interpolation. Destination
/// pixels that map outside the source bounds are filled with black.
///
/// The source buffer is never modified; the result is freshly allocated.
///
/// # Errors
///
/// The first failing stage aborts the pipeline: non-finite coordinates, a
/// degenerate quadrilateral or a singular transform are reported before any
/// pixel is resampled.
///
/// # Example
///
/// ```
/// use deskew_image::{Image, ImageSize};
/// use deskew_imgproc::corners::Point2d;
/// use deskew_imgproc::rectify::rectify;
///
/// let image = Image::<u8, 3>::from_size_val(
///     ImageSize {
///         width: 120,
///         height: 80,
///     },
///     0u8,
/// ).unwrap();
///
/// let points = [
///     Point2d::new(0.0, 0.0),
///     Point2d::new(100.0, 0.0),
///     Point2d::new(100.0, 50.0),
///     Point2d::new(0.0, 50.0),
/// ];
///
/// let rectified = rectify(&image, &points).unwrap();
/// assert_eq!(rectified.size().width, 100);
/// assert_eq!(rectified.size().height, 50);
/// ```
pub fn rectify(src: &Image<u8, 3>, points: &[Point2d; 4]) -> Result<Image<u8, 3>, RectifyError> {
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(RectifyError::InvalidInput);
    }

    let quad = order_points(points);
    let size = output_size(&quad)?;
    let m = get_perspective_transform(&quad, &Quad::axis_aligned(size))?;

    let src_f32 = src.cast::<f32>()?;
    let mut warped = Image::<f32, 3>::from_size_val(size, 0.0)?;
    warp_perspective(&src_f32, &mut warped, &m, InterpolationMode::Bilinear)?;

    let data = warped
        .as_slice()
        .iter()
        .map(|&x| u8::from_f32(x))
        .collect::<Vec<u8>>();

    Ok(Image::new(size, data)?)
}

#[cfg(test)]
mod tests {
    use super::{output_size, RectifyError};
    use crate::corners::{order_points, Point2d, Quad};

    #[test]
    fn output_size_rectangle() -> Result<(), RectifyError> {
        let quad = order_points(&[
            Point2d::new(0.0, 0.0),
            Point2d::new(100.0, 0.0),
            Point2d::new(100.0, 50.0),
            Point2d::new(0.0, 50.0),
        ]);
        let size = output_size(&quad)?;
        assert_eq!(size.width, 100);
        assert_eq!(size.height, 50);

        Ok(())
    }

    #[test]
    fn output_size_takes_smaller_edge() -> Result<(), RectifyError> {
        // bottom edge is 100 long, top edge 80; right edge ~63, left edge 60
        let quad = Quad {
            tl: Point2d::new(0.0, 0.0),
            tr: Point2d::new(80.0, 0.0),
            br: Point2d::new(100.0, 60.0),
            bl: Point2d::new(0.0, 60.0),
        };
        let size = output_size(&quad)?;
        assert_eq!(size.width, 80);
        assert_eq!(size.height, 60);

        Ok(())
    }

    #[test]
    fn output_size_collinear_points() {
        let quad = order_points(&[
            Point2d::new(0.0, 0.0),
            Point2d::new(10.0, 0.0),
            Point2d::new(20.0, 0.0),
            Point2d::new(30.0, 0.0),
        ]);
        let result = output_size(&quad);
        assert!(matches!(result, Err(RectifyError::DegenerateGeometry(_, _))));
    }

    #[test]
    fn output_size_subpixel_quad() {
        let quad = order_points(&[
            Point2d::new(0.0, 0.0),
            Point2d::new(0.9, 0.0),
            Point2d::new(0.9, 0.9),
            Point2d::new(0.0, 0.9),
        ]);
        let result = output_size(&quad);
        assert!(matches!(result, Err(RectifyError::DegenerateGeometry(0, 0))));
    }
}
