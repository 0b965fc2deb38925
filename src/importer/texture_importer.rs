//! JPEG/PNG decoding into raw pixel buffers.

use std::borrow::Cow;
use std::path::Path;

use crate::error::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Decoded pixels, rows stored bottom-up so `v = 0` is the bottom of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl PixelData {
    /// Two-colour checkerboard of `width` × `height` single-pixel cells.
    pub fn checker(width: u32, height: u32, a: [u8; 3], b: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let color = if (x + y) % 2 == 0 { a } else { b };
                data.extend_from_slice(&color);
            }
        }
        Self {
            data,
            width,
            height,
            format: PixelFormat::Rgb8,
        }
    }

    /// The pixels as tightly packed RGBA8, expanding RGB with opaque alpha.
    pub fn to_rgba8(&self) -> Cow<'_, [u8]> {
        match self.format {
            PixelFormat::Rgba8 => Cow::Borrowed(&self.data),
            PixelFormat::Rgb8 => Cow::Owned(
                self.data
                    .chunks_exact(3)
                    .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], u8::MAX])
                    .collect(),
            ),
        }
    }

    /// Frees the pixel memory once the GPU copy exists. Dimensions are kept.
    pub fn release(&mut self) {
        self.data = Vec::new();
    }

    pub fn is_released(&self) -> bool {
        self.data.is_empty()
    }
}

pub struct TextureImporter;

impl TextureImporter {
    pub fn load(path: impl AsRef<Path>) -> Result<PixelData, ImportError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| ImportError::Texture {
            path: path.to_path_buf(),
            source,
        })?;
        let pixels = Self::convert(decoded);
        log::info!(
            "loaded texture {} ({}x{}, {:?})",
            path.display(),
            pixels.width,
            pixels.height,
            pixels.format
        );
        Ok(pixels)
    }

    pub fn load_from_memory(bytes: &[u8]) -> Result<PixelData, image::ImageError> {
        image::load_from_memory(bytes).map(Self::convert)
    }

    fn convert(decoded: image::DynamicImage) -> PixelData {
        let flipped = decoded.flipv();
        let (width, height) = (flipped.width(), flipped.height());
        if flipped.color().has_alpha() {
            PixelData {
                data: flipped.to_rgba8().into_raw(),
                width,
                height,
                format: PixelFormat::Rgba8,
            }
        } else {
            PixelData {
                data: flipped.to_rgb8().into_raw(),
                width,
                height,
                format: PixelFormat::Rgb8,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(img: image::DynamicImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png)
            .expect("png encodes");
        bytes.into_inner()
    }

    #[test]
    fn rgb_png_loads_bottom_up() {
        let mut img = image::RgbImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0])); // top-left
        img.put_pixel(0, 1, image::Rgb([0, 0, 255])); // bottom-left

        let pixels = TextureImporter::load_from_memory(&encode_png(img.into())).expect("decodes");
        assert_eq!(pixels.format, PixelFormat::Rgb8);
        assert_eq!((pixels.width, pixels.height), (2, 2));
        assert_eq!(&pixels.data[..3], &[0u8, 0, 255]);
        assert_eq!(&pixels.data[6..9], &[255u8, 0, 0]);
    }

    #[test]
    fn alpha_is_kept() {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 4]));
        let pixels = TextureImporter::load_from_memory(&encode_png(img.into())).expect("decodes");
        assert_eq!(pixels.format, PixelFormat::Rgba8);
        assert_eq!(pixels.data, vec![1u8, 2, 3, 4]);
    }

    #[test]
    fn missing_file_is_an_import_error() {
        let err = TextureImporter::load("does/not/exist.png").expect_err("no such file");
        assert!(matches!(err, ImportError::Texture { .. }));
    }

    #[test]
    fn rgb_expands_to_opaque_rgba() {
        let pixels = PixelData::checker(2, 1, [10, 20, 30], [40, 50, 60]);
        assert_eq!(
            pixels.to_rgba8().as_ref(),
            &[10u8, 20, 30, 255, 40, 50, 60, 255]
        );
    }

    #[test]
    fn release_frees_pixels() {
        let mut pixels = PixelData::checker(4, 4, [0; 3], [255; 3]);
        assert_eq!(pixels.data.len(), 4 * 4 * PixelFormat::Rgb8.channels());
        pixels.release();
        assert!(pixels.is_released());
        assert_eq!(pixels.width, 4);
    }
}
