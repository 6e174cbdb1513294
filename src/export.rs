//! Rasterization and PNG file export using resvg/usvg.
//!
//! Export reads whatever the current document state is, serializes it with
//! its intrinsic geometry stamped back on, and renders it off-screen at a
//! fixed supersampling factor. The illustration itself is never mutated, so
//! a failed export leaves the editor exactly where it was.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use thiserror::Error;

use crate::document::{Illustration, ViewBox};

/// Supersampling factor for exported bitmaps.
pub const EXPORT_SCALE: f32 = 2.0;

// ============================================================================
// ExportError
// ============================================================================

/// Errors raised while rasterizing or writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The serialized document state failed to re-parse for rendering.
    #[error("failed to prepare illustration for rendering: {0}")]
    Svg(#[from] resvg::usvg::Error),

    /// The export surface could not be allocated.
    #[error("cannot allocate a {width}x{height} export surface")]
    PixmapAlloc { width: u32, height: u32 },

    /// PNG encoding failed.
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    /// Writing the output file failed.
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Rasterization
// ============================================================================

/// The deterministic export filename for a slide position (0-based).
pub fn export_file_name(index: usize) -> String {
    format!("sneaker-{}.png", index + 1)
}

/// Determines the illustration's intrinsic geometry.
///
/// Prefers the viewBox recorded at load; when the source declared none, the
/// serialized document is probed through usvg and the tight bounding box of
/// rendered content stands in.
pub fn intrinsic_view_box(illustration: &Illustration) -> Result<ViewBox, ExportError> {
    if let Some(vb) = illustration.view_box() {
        return Ok(vb);
    }

    let probe = illustration.to_svg();
    let tree = Tree::from_str(&probe, &Options::default())?;
    let bbox = tree.root().abs_bounding_box();
    Ok(ViewBox::new(
        bbox.x(),
        bbox.y(),
        bbox.width(),
        bbox.height(),
    ))
}

/// Rasterizes the current illustration state at [`EXPORT_SCALE`].
///
/// The output is `max(1, floor(dimension * scale))` pixels per axis of the
/// intrinsic geometry, so on-screen container resizing never changes export
/// proportions.
pub fn rasterize(illustration: &Illustration) -> Result<RgbaImage, ExportError> {
    rasterize_at(illustration, EXPORT_SCALE)
}

pub(crate) fn rasterize_at(
    illustration: &Illustration,
    scale: f32,
) -> Result<RgbaImage, ExportError> {
    let view_box = intrinsic_view_box(illustration)?;
    let markup = illustration.to_svg_sized(&view_box);
    let tree = Tree::from_str(&markup, &Options::default())?;

    let width = ((view_box.width * scale).floor() as u32).max(1);
    let height = ((view_box.height * scale).floor() as u32).max(1);
    let mut pixmap =
        Pixmap::new(width, height).ok_or(ExportError::PixmapAlloc { width, height })?;

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Encodes an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, image::ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Rasterizes the illustration and writes `sneaker-<index+1>.png` into `dir`.
///
/// Returns the written path. The illustration is read, never mutated.
pub fn export_to_dir(
    illustration: &Illustration,
    index: usize,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let image = rasterize(illustration)?;
    let png = encode_png(&image)?;

    let path = dir.join(export_file_name(index));
    fs::write(&path, png)?;
    log::debug!(
        "exported {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(path)
}

/// Converts a tiny_skia pixmap (premultiplied alpha) into an RGBA image.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();
    let mut img = RgbaImage::new(width, height);

    for (i, pixel) in pixmap.pixels().iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        let (r, g, b, a) =
            unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
        img.put_pixel(x, y, Rgba([r, g, b, a]));
    }

    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::FillPolicy;
    use crate::registry::IllustrationLoader;

    fn load(markup: &str) -> Illustration {
        IllustrationLoader::new(FillPolicy::Scoped)
            .load_str(markup)
            .unwrap()
    }

    #[test]
    fn export_is_twice_the_intrinsic_size() {
        let ill = load(r##"<svg viewBox="0 0 800 600"><rect width="800" height="600" fill="#fff"/></svg>"##);
        let img = rasterize(&ill).unwrap();
        assert_eq!((img.width(), img.height()), (1600, 1200));
    }

    #[test]
    fn export_renders_current_fill_state() {
        let mut ill = load(
            r##"<svg viewBox="0 0 10 10"><g id="fillable"><rect id="r" x="0" y="0" width="10" height="10" fill="#ff0000"/></g></svg>"##,
        );
        let target = ill.colorable_ids()[0];
        ill.apply_fill(target, "#00ff00");

        let img = rasterize(&ill).unwrap();
        let center = img.get_pixel(img.width() / 2, img.height() / 2);
        assert!(center[1] > center[0], "expected green after recolor, got {center:?}");
    }

    #[test]
    fn missing_view_box_falls_back_to_content_bounds() {
        let ill = load(r##"<svg><rect x="5" y="5" width="40" height="20" fill="#000"/></svg>"##);
        let vb = intrinsic_view_box(&ill).unwrap();
        assert_eq!((vb.x, vb.y, vb.width, vb.height), (5.0, 5.0, 40.0, 20.0));

        let img = rasterize(&ill).unwrap();
        assert_eq!((img.width(), img.height()), (80, 40));
    }

    #[test]
    fn tiny_geometry_still_produces_a_pixel() {
        let ill = load(r##"<svg viewBox="0 0 0.2 0.2"><rect width="0.2" height="0.2" fill="#fff"/></svg>"##);
        let img = rasterize(&ill).unwrap();
        assert_eq!((img.width(), img.height()), (1, 1));
    }

    #[test]
    fn encode_png_produces_png_magic() {
        let ill = load(r##"<svg viewBox="0 0 4 4"><rect width="4" height="4" fill="#fff"/></svg>"##);
        let png = encode_png(&rasterize(&ill).unwrap()).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn export_writes_deterministically_named_file() {
        let ill = load(r##"<svg viewBox="0 0 8 8"><rect width="8" height="8" fill="#123456"/></svg>"##);
        let dir = tempfile::tempdir().unwrap();

        let path = export_to_dir(&ill, 0, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "sneaker-1.png");
        assert!(path.exists());

        let second = export_to_dir(&ill, 2, dir.path()).unwrap();
        assert_eq!(second.file_name().unwrap(), "sneaker-3.png");
    }

    #[test]
    fn file_names_are_one_based() {
        assert_eq!(export_file_name(0), "sneaker-1.png");
        assert_eq!(export_file_name(11), "sneaker-12.png");
    }
}
