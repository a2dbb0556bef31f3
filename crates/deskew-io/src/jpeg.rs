use jpeg_encoder::{ColorType, Encoder};
use zune_jpeg::zune_core::colorspace::ColorSpace;
use zune_jpeg::zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

use deskew_image::{Image, ImageSize};

use crate::error::IoError;

/// Decodes a JPEG image with three channels _(rgb8)_ from raw bytes.
///
/// Grayscale and CMYK sources are converted to RGB during decoding.
///
/// # Arguments
///
/// - `src` - Raw bytes of the JPEG file.
///
/// # Returns
///
/// An RGB image with three channels _(rgb8)_.
pub fn decode_image_jpeg_rgb8(src: &[u8]) -> Result<Image<u8, 3>, IoError> {
    let options = DecoderOptions::default().jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = JpegDecoder::new_with_options(src, options);
    decoder.decode_headers()?;

    let image_info = decoder.info().ok_or_else(|| {
        IoError::JpegDecodingError(zune_jpeg::errors::DecodeErrors::Format(String::from(
            "Failed to find image info from its metadata",
        )))
    })?;

    let image_size = ImageSize {
        width: image_info.width as usize,
        height: image_info.height as usize,
    };

    let img_data = decoder.decode()?;

    Ok(Image::new(image_size, img_data)?)
}

/// Encodes the given RGB image _(rgb8)_ as JPEG bytes.
///
/// # Arguments
///
/// - `image` - The image containing the pixel data to encode.
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest).
pub fn encode_image_jpeg_rgb8(image: &Image<u8, 3>, quality: u8) -> Result<Vec<u8>, IoError> {
    let image_size = image.size();

    let mut jpeg_data = Vec::new();
    let encoder = Encoder::new(&mut jpeg_data, quality);
    encoder.encode(
        image.as_slice(),
        image_size.width as u16,
        image_size.height as u16,
        ColorType::Rgb,
    )?;

    Ok(jpeg_data)
}
