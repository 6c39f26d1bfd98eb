//! Terminal preview of a generated image
//!
//! Each cell shows two vertical pixels with the upper half block: the
//! foreground colours the top pixel, the background the bottom one.

use image::RgbImage;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Longest side kept after decoding. Draw-time resizing starts from this.
const SOURCE_MAX_SIDE: u32 = 192;

#[derive(Debug, Clone)]
pub struct PreviewImage {
    source: RgbImage,
}

/// Decode image bytes into a preview
pub fn decode_preview(bytes: &[u8]) -> Result<PreviewImage, image::ImageError> {
    let mut image = image::load_from_memory(bytes)?;
    if image.width() > SOURCE_MAX_SIDE || image.height() > SOURCE_MAX_SIDE {
        image = image.thumbnail(SOURCE_MAX_SIDE, SOURCE_MAX_SIDE);
    }
    let source = image.to_rgb8();
    Ok(PreviewImage { source })
}

impl PreviewImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.source.dimensions()
    }

    /// Render into at most `max_cols` x `max_rows` cells, keeping aspect ratio
    pub fn lines(&self, max_cols: u16, max_rows: u16) -> Vec<Line<'static>> {
        if max_cols == 0 || max_rows == 0 {
            return Vec::new();
        }

        let (w, h) = self.source.dimensions();
        let max_w = u32::from(max_cols);
        let max_h = u32::from(max_rows) * 2;
        let scale = f64::min(max_w as f64 / w as f64, max_h as f64 / h as f64).min(1.0);
        let target_w = ((w as f64 * scale).round() as u32).max(1);
        let target_h = ((h as f64 * scale).round() as u32).max(1);

        let scaled = if (target_w, target_h) == (w, h) {
            self.source.clone()
        } else {
            image::imageops::thumbnail(&self.source, target_w, target_h)
        };
        let (sw, sh) = scaled.dimensions();

        (0..sh.div_ceil(2))
            .map(|row| {
                let spans: Vec<Span<'static>> = (0..sw)
                    .map(|x| {
                        let top = scaled.get_pixel(x, row * 2).0;
                        let mut style = Style::default().fg(Color::Rgb(top[0], top[1], top[2]));
                        if row * 2 + 1 < sh {
                            let bottom = scaled.get_pixel(x, row * 2 + 1).0;
                            style = style.bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                        }
                        Span::styled("▀", style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb(color));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_and_render_solid_image() {
        let preview = decode_preview(&png_bytes(4, 4, [200, 10, 10])).unwrap();
        assert_eq!(preview.dimensions(), (4, 4));

        let lines = preview.lines(4, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 4);
        assert_eq!(lines[0].spans[0].content, "▀");
        let style = lines[0].spans[0].style;
        assert_eq!(style.fg, Some(Color::Rgb(200, 10, 10)));
        assert_eq!(style.bg, Some(Color::Rgb(200, 10, 10)));

        let lines = preview.lines(2, 1);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 2);
    }

    #[test]
    fn test_render_keeps_aspect_ratio() {
        let preview = decode_preview(&png_bytes(40, 20, [0, 0, 0])).unwrap();
        let lines = preview.lines(80, 40);
        // 40x20 pixels fit unscaled: 20 pixel rows become 10 cell rows
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0].spans.len(), 40);

        let lines = preview.lines(10, 40);
        assert_eq!(lines[0].spans.len(), 10);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_render_into_empty_area() {
        let preview = decode_preview(&png_bytes(4, 4, [0, 0, 0])).unwrap();
        assert!(preview.lines(0, 10).is_empty());
    }

    #[test]
    fn test_decode_shrinks_large_images() {
        let preview = decode_preview(&png_bytes(400, 200, [0, 0, 0])).unwrap();
        let (w, h) = preview.dimensions();
        assert!(w <= SOURCE_MAX_SIDE && h <= SOURCE_MAX_SIDE);
        assert!(w > h);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_preview(b"definitely not an image").is_err());
    }
}
