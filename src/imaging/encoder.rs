// src/imaging/encoder.rs
use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageError, ImageOutputFormat};
use log::debug;
use std::borrow::Cow;
use std::fmt;
use std::io::Cursor;

/// JPEG quality used when serializing uploads (the usual library default)
pub const JPEG_QUALITY: u8 = 75;

/// Base64 text of a JPEG-serialized bitmap
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub const MIME_TYPE: &'static str = "image/jpeg";

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render as an inline `data:` URI
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", Self::MIME_TYPE, self.0)
    }
}

// The payload can be megabytes long, keep it out of logs
impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedImage {{ <{} base64 chars> }}", self.0.len())
    }
}

/// Decode uploaded file bytes into a bitmap, guessing the container format
pub fn decode_upload(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    let image = image::load_from_memory(bytes)?;
    debug!("Decoded upload: {}x{}", image.width(), image.height());
    Ok(image)
}

/// Serialize a bitmap as JPEG and base64 the result.
///
/// JPEG has no alpha channel and only 8-bit samples, so anything other than
/// 8-bit RGB or grayscale is flattened to RGB first. Serialization errors are
/// returned as-is.
pub fn encode_to_base64(image: &DynamicImage) -> Result<EncodedImage, ImageError> {
    let image = match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => Cow::Borrowed(image),
        other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
    };

    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    image.write_to(&mut cursor, ImageOutputFormat::Jpeg(JPEG_QUALITY))?;
    debug!("Serialized {}x{} bitmap to {} JPEG bytes", image.width(), image.height(), buffer.len());

    Ok(EncodedImage(general_purpose::STANDARD.encode(&buffer)))
}
