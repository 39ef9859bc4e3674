use std::path::Path;

use anyhow::Context;
use glium::{
    texture::{MipmapsOption, RawImage2d, SrgbTexture2d},
    Display,
};
use glutin::surface::WindowSurface;
use image::RgbaImage;

/// Decodes any format `image` knows into RGBA.
pub fn decode(path: &Path) -> anyhow::Result<RgbaImage> {
    let image = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    Ok(image.to_rgba8())
}

pub fn load(display: &Display<WindowSurface>, path: &Path) -> anyhow::Result<SrgbTexture2d> {
    let image = decode(path)?;
    let dimensions = image.dimensions();
    // OpenGL expects the bottom row first
    let raw = RawImage2d::from_raw_rgba_reversed(&image.into_raw(), dimensions);
    SrgbTexture2d::with_mipmaps(display, raw, MipmapsOption::AutoGeneratedMipmaps)
        .with_context(|| format!("uploading {}", path.display()))
}

/// 1x1 white texture, so untextured meshes show their vertex color.
pub fn white(display: &Display<WindowSurface>) -> anyhow::Result<SrgbTexture2d> {
    let raw = RawImage2d::from_raw_rgba(vec![255u8; 4], (1, 1));
    SrgbTexture2d::new(display, raw).context("uploading the fallback texture")
}

/// Like [`load`], but a missing or broken image only logs a warning.
pub fn load_or_white(
    display: &Display<WindowSurface>,
    path: Option<&Path>,
) -> anyhow::Result<SrgbTexture2d> {
    let Some(path) = path else {
        return white(display);
    };
    match load(display, path) {
        Ok(texture) => Ok(texture),
        Err(err) => {
            log::warn!("Failed to load texture: {err:#}");
            white(display)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bundled_checkerboard() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/cube.png"));
        let image = decode(path).unwrap();
        assert_eq!(image.dimensions(), (64, 64));
        assert_ne!(image.get_pixel(0, 0), image.get_pixel(8, 0));
    }

    #[test]
    fn missing_image_names_the_file() {
        let err = decode(Path::new("missing.png")).unwrap_err();
        assert!(err.to_string().contains("missing.png"));
    }
}
