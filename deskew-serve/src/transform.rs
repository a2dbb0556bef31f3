use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};

use deskew::imgproc::corners::Point2d;
use deskew::imgproc::rectify::{rectify, RectifyError};
use deskew::io::jpeg::{decode_image_jpeg_rgb8, encode_image_jpeg_rgb8};

const JPEG_QUALITY: u8 = 90;

/// A corner point as it appears in the request payload.
#[derive(Debug, Deserialize)]
pub struct PointParam {
    pub x: f64,
    pub y: f64,
}

/// The four corner points of the region to rectify, in any order.
#[derive(Debug, Deserialize)]
pub struct CornerPoints {
    pub p1: PointParam,
    pub p2: PointParam,
    pub p3: PointParam,
    pub p4: PointParam,
}

#[derive(Debug, Deserialize)]
pub struct TransformRequest {
    /// Base64 encoded JPEG bytes of the source image.
    pub image: String,
    pub points: CornerPoints,
}

#[derive(Debug, Serialize)]
pub struct TransformResponse {
    /// Base64 encoded JPEG bytes of the rectified image.
    pub image: String,
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Rectify(RectifyError),
    Internal(String),
}

impl From<RectifyError> for AppError {
    fn from(error: RectifyError) -> Self {
        AppError::Rectify(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Rectify(error) => (StatusCode::UNPROCESSABLE_ENTITY, error.to_string()),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

fn corner_array(points: &CornerPoints) -> [Point2d; 4] {
    [
        Point2d::new(points.p1.x, points.p1.y),
        Point2d::new(points.p2.x, points.p2.y),
        Point2d::new(points.p3.x, points.p3.y),
        Point2d::new(points.p4.x, points.p4.y),
    ]
}

pub async fn transform_image(
    Json(request): Json<TransformRequest>,
) -> Result<Json<TransformResponse>, AppError> {
    // read the image from its base64 representation
    let jpeg_data = general_purpose::STANDARD
        .decode(&request.image)
        .map_err(|e| AppError::BadRequest(format!("invalid base64 image: {e}")))?;

    let image = decode_image_jpeg_rgb8(&jpeg_data)
        .map_err(|e| AppError::BadRequest(format!("invalid JPEG image: {e}")))?;

    log::info!("📐 Rectifying a {} source image", image.size());

    let rectified = rectify(&image, &corner_array(&request.points))?;

    // encode the result back as base64 JPEG
    let jpeg_data = encode_image_jpeg_rgb8(&rectified, JPEG_QUALITY)
        .map_err(|e| AppError::Internal(format!("failed to encode result: {e}")))?;

    Ok(Json(TransformResponse {
        image: general_purpose::STANDARD.encode(jpeg_data),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskew::image::{Image, ImageSize};

    fn request_with_points(image: String) -> TransformRequest {
        serde_json::from_value(serde_json::json!({
            "image": image,
            "points": {
                "p1": { "x": 2.0, "y": 2.0 },
                "p2": { "x": 13.0, "y": 2.0 },
                "p3": { "x": 13.0, "y": 13.0 },
                "p4": { "x": 2.0, "y": 13.0 },
            }
        }))
        .expect("Failed to build request")
    }

    #[test]
    fn request_deserializes_from_json() {
        let request = request_with_points(String::from("aGVsbG8="));
        let corners = corner_array(&request.points);
        assert_eq!(corners[0], Point2d::new(2.0, 2.0));
        assert_eq!(corners[2], Point2d::new(13.0, 13.0));
    }

    #[tokio::test]
    async fn transform_rectifies_an_encoded_image() {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 16,
                height: 16,
            },
            100,
        )
        .expect("Failed to create image");

        let jpeg_data =
            encode_image_jpeg_rgb8(&image, JPEG_QUALITY).expect("Failed to encode image");
        let request = request_with_points(general_purpose::STANDARD.encode(jpeg_data));

        let response = transform_image(Json(request))
            .await
            .expect("Request should succeed");

        let jpeg_data = general_purpose::STANDARD
            .decode(&response.0.image)
            .expect("Response image should be base64");
        let rectified = decode_image_jpeg_rgb8(&jpeg_data).expect("Response should be a JPEG");

        assert_eq!(rectified.size().width, 11);
        assert_eq!(rectified.size().height, 11);
    }

    #[tokio::test]
    async fn transform_rejects_invalid_base64() {
        let request = request_with_points(String::from("not base64!"));
        let result = transform_image(Json(request)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
