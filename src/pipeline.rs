// src/pipeline.rs
use image::DynamicImage;
use log::info;

use crate::ai::connector::VisionConnector;
use crate::ai::error::DescribeError;
use crate::imaging::encoder;

/// Encode one bitmap and ask the connector to describe it.
///
/// Nothing is kept between calls; the encoding is built here and dropped on
/// return.
pub fn describe_bitmap(connector: &dyn VisionConnector, bitmap: &DynamicImage) -> Result<String, DescribeError> {
    let encoded = encoder::encode_to_base64(bitmap)?;
    info!("Encoded {}x{} image ({} base64 chars)", bitmap.width(), bitmap.height(), encoded.as_str().len());
    connector.describe_image(&encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::connector::MockVisionConnector;
    use crate::imaging::encoder::EncodedImage;
    use image::{Rgb, RgbImage};
    use std::sync::{Arc, Mutex};

    #[test]
    fn passes_the_encoding_of_this_bitmap_only() {
        let seen: Arc<Mutex<Vec<EncodedImage>>> = Arc::default();
        let recorder = Arc::clone(&seen);
        let mut connector = MockVisionConnector::new();
        connector.expect_describe_image().times(2).returning(move |image| {
            recorder.lock().unwrap().push(image.clone());
            Ok(format!("{} chars", image.as_str().len()))
        });

        let red = DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 6, Rgb([255, 0, 0])));
        let green = DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 6, Rgb([0, 255, 0])));
        describe_bitmap(&connector, &red).unwrap();
        describe_bitmap(&connector, &green).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], encoder::encode_to_base64(&red).unwrap());
        assert_eq!(seen[1], encoder::encode_to_base64(&green).unwrap());
        assert_ne!(seen[0], seen[1]);
    }

    #[test]
    fn connector_errors_pass_through() {
        let mut connector = MockVisionConnector::new();
        connector.expect_describe_image().returning(|_| {
            Err(DescribeError::MalformedResponse {
                detail: "no choices".to_string(),
            })
        });

        let bitmap = DynamicImage::ImageRgb8(RgbImage::new(3, 3));
        let err = describe_bitmap(&connector, &bitmap).unwrap_err();

        assert_eq!(err.to_string(), "Error processing the image response.");
    }
}
