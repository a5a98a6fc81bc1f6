//! Production image decoder backed by the `image` crate.

use image::DynamicImage;
use tracing::debug;

use crate::error::DecodeError;
use crate::traits::ImageDecoder;
use crate::types::DecodedImage;

/// Decodes uploads entirely in memory via `image::load_from_memory`.
///
/// Format detection is left to the `image` crate; the filename plays no
/// part in decoding and is only carried through as a tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryDecoder;

impl ImageDecoder for InMemoryDecoder {
    fn decode(&self, bytes: &[u8], filename: &str) -> Result<DecodedImage, DecodeError> {
        if bytes.is_empty() {
            debug!("No upload bytes, producing empty image (filename: {:?})", filename);
            return Ok(DecodedImage {
                image: DynamicImage::new_rgb8(0, 0),
                filename: filename.to_string(),
            });
        }

        let image = image::load_from_memory(bytes).map_err(|e| DecodeError::Unreadable {
            filename: filename.to_string(),
            reason: e.to_string(),
        })?;
        debug!(
            "Decoded {:?}: {}x{} from {} bytes",
            filename,
            image.width(),
            image.height(),
            bytes.len()
        );
        Ok(DecodedImage {
            image,
            filename: filename.to_string(),
        })
    }
}
