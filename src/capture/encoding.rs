use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use super::types::{CaptureError, RawFrame};

pub const JPEG_MIME: &str = "image/jpeg";

/// Encode a raw frame as JPEG. Incomplete frames are rejected rather than padded.
pub fn encode_jpeg(frame: &RawFrame, quality: u8) -> Result<Vec<u8>, CaptureError> {
    if !frame.is_complete() {
        return Err(CaptureError::Frame(format!(
            "expected {}x{} RGB frame, got {} bytes",
            frame.width,
            frame.height,
            frame.rgb.len()
        )));
    }

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    let mut encoder = JpegEncoder::new_with_quality(&mut cursor, quality.clamp(1, 100));
    encoder
        .encode(&frame.rgb, frame.width, frame.height, ExtendedColorType::Rgb8)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a_decodable_jpeg() {
        let frame = RawFrame { width: 8, height: 6, rgb: vec![128; 8 * 6 * 3] };
        let jpeg = encode_jpeg(&frame, 90).unwrap();

        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[test]
    fn rejects_partial_frames() {
        let frame = RawFrame { width: 8, height: 6, rgb: vec![0; 10] };
        assert!(matches!(encode_jpeg(&frame, 90), Err(CaptureError::Frame(_))));
    }
}
