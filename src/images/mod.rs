//! Pet photo decoding and terminal graphics setup.
//!
//! Photos are drawn with whatever graphics protocol the terminal supports
//! (Sixel, Kitty, iTerm2), falling back to Unicode halfblocks.

use image::DynamicImage;
use ratatui_image::picker::Picker;
use std::sync::OnceLock;

/// Longest side of a decoded photo, in pixels
const MAX_DIMENSION: u32 = 800;

/// Global picker instance (initialized once at startup)
static PICKER: OnceLock<Picker> = OnceLock::new();

/// Initialize the image picker by querying terminal capabilities.
///
/// Call once after entering the alternate screen and before reading events.
pub fn init_picker() {
    PICKER.get_or_init(|| match Picker::from_query_stdio() {
        Ok(p) => {
            tracing::info!("Image support detected: {:?}", p.protocol_type());
            p
        }
        Err(e) => {
            tracing::debug!("No image protocol support: {e}");
            Picker::halfblocks()
        }
    });
}

/// Get the global picker instance, if graphics were initialized.
pub fn picker() -> Option<&'static Picker> {
    PICKER.get()
}

/// Decode downloaded or local photo bytes, shrinking large images.
pub fn decode_photo(bytes: &[u8]) -> Result<DynamicImage, image::ImageError> {
    let image = image::load_from_memory(bytes)?;
    Ok(resize_if_needed(image))
}

/// Resize image if it's too large (to save memory and rendering time).
fn resize_if_needed(image: DynamicImage) -> DynamicImage {
    let (width, height) = (image.width(), image.height());

    if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
        return image;
    }

    let ratio = f64::from(width) / f64::from(height);
    let (new_width, new_height) = if width > height {
        (MAX_DIMENSION, (f64::from(MAX_DIMENSION) / ratio) as u32)
    } else {
        ((f64::from(MAX_DIMENSION) * ratio) as u32, MAX_DIMENSION)
    };

    image.resize(new_width, new_height, image::imageops::FilterType::Triangle)
}
