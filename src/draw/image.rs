//! Raw pixel images handed to [`Drawable::draw_image`](super::Drawable::draw_image).

use log::warn;

use crate::util::Rect;

/// Uncompressed pixels with 1 (alpha), 3 (RGB) or 4 (RGBA, straight alpha)
/// bytes per pixel.
///
/// An image may carry no pixel data; drawing it does nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: i32,
    height: i32,
    depth: u8,
    stride: usize,
    pixels: Option<Vec<u8>>,
}

impl Image {
    pub fn new(width: i32, height: i32, depth: u8, pixels: Vec<u8>) -> Self {
        let stride = width.max(0) as usize * depth as usize;
        Self::with_stride(width, height, depth, stride, pixels)
    }

    /// Like [`Image::new`] with rows `stride` bytes apart.
    pub fn with_stride(width: i32, height: i32, depth: u8, stride: usize, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            depth,
            stride,
            pixels: Some(pixels),
        }
    }

    /// An image of the given geometry without pixel data.
    pub fn empty(width: i32, height: i32, depth: u8) -> Self {
        Self {
            width,
            height,
            depth,
            stride: 0,
            pixels: None,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn pixels(&self) -> Option<&[u8]> {
        self.pixels.as_deref()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    fn has_complete_data(&self) -> bool {
        let Some(pixels) = &self.pixels else {
            return false;
        };
        if self.width <= 0 || self.height <= 0 {
            return false;
        }
        let row = self.width as usize * self.depth as usize;
        self.stride >= row && pixels.len() >= self.stride * (self.height as usize - 1) + row
    }

    /// Whether this is an alpha-only image used as a mask for the current
    /// color.
    pub fn is_mask(&self) -> bool {
        self.depth == 1
    }

    /// Converts the pixels to a Cairo image surface of the matching format:
    /// A8 for depth 1, RGB24 for depth 3 and premultiplied ARGB32 for depth 4.
    ///
    /// Returns `None` for images without (enough) pixel data or with an
    /// unsupported depth.
    pub fn to_surface(&self) -> Option<cairo::ImageSurface> {
        if !self.has_complete_data() {
            return None;
        }
        let format = match self.depth {
            1 => cairo::Format::A8,
            3 => cairo::Format::Rgb24,
            4 => cairo::Format::ARgb32,
            other => {
                warn!("cannot draw images with {other} bytes per pixel");
                return None;
            }
        };
        let pixels = self.pixels.as_deref()?;

        let mut surface = match cairo::ImageSurface::create(format, self.width, self.height) {
            Ok(surface) => surface,
            Err(e) => {
                warn!("image surface {}x{} unavailable: {e}", self.width, self.height);
                return None;
            }
        };
        let dst_stride = surface.stride() as usize;
        let depth = self.depth as usize;
        let width = self.width as usize;
        {
            let mut data = match surface.data() {
                Ok(data) => data,
                Err(e) => {
                    warn!("image surface data unavailable: {e}");
                    return None;
                }
            };
            for row in 0..self.height as usize {
                let src = &pixels[row * self.stride..row * self.stride + width * depth];
                let dst = &mut data[row * dst_stride..row * dst_stride + width * format_bytes(depth)];
                match depth {
                    1 => dst.copy_from_slice(src),
                    3 => {
                        for (px, out) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
                            let value = 0xff00_0000
                                | (px[0] as u32) << 16
                                | (px[1] as u32) << 8
                                | px[2] as u32;
                            out.copy_from_slice(&value.to_ne_bytes());
                        }
                    }
                    _ => {
                        for (px, out) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
                            let a = px[3] as u32;
                            let value = a << 24
                                | premultiply(px[0], a) << 16
                                | premultiply(px[1], a) << 8
                                | premultiply(px[2], a);
                            out.copy_from_slice(&value.to_ne_bytes());
                        }
                    }
                }
            }
        }
        surface.mark_dirty();
        Some(surface)
    }
}

fn format_bytes(depth: usize) -> usize {
    if depth == 1 { 1 } else { 4 }
}

fn premultiply(channel: u8, alpha: u32) -> u32 {
    (channel as u32 * alpha + 127) / 255
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(surface: &cairo::ImageSurface, x: usize, y: usize) -> u32 {
        let stride = surface.stride() as usize;
        let mut out = 0;
        surface
            .with_data(|data| {
                let offset = y * stride + x * 4;
                out = u32::from_ne_bytes([
                    data[offset],
                    data[offset + 1],
                    data[offset + 2],
                    data[offset + 3],
                ]);
            })
            .unwrap();
        out
    }

    #[test]
    fn rgb_pixels_become_opaque_rgb24() {
        let image = Image::new(2, 1, 3, vec![255, 0, 0, 0, 0, 255]);
        let surface = image.to_surface().unwrap();
        assert_eq!(surface.format(), cairo::Format::Rgb24);
        assert_eq!(pixel(&surface, 0, 0) & 0x00ff_ffff, 0x00ff_0000);
        assert_eq!(pixel(&surface, 1, 0) & 0x00ff_ffff, 0x0000_00ff);
    }

    #[test]
    fn rgba_pixels_are_premultiplied() {
        let image = Image::new(1, 1, 4, vec![255, 255, 255, 128]);
        let surface = image.to_surface().unwrap();
        assert_eq!(pixel(&surface, 0, 0), 0x8080_8080);
    }

    #[test]
    fn missing_or_short_data_yields_nothing() {
        assert!(Image::empty(4, 4, 3).to_surface().is_none());
        assert!(Image::new(4, 4, 3, vec![0; 10]).to_surface().is_none());
        assert!(Image::new(1, 1, 2, vec![0; 2]).to_surface().is_none());
    }

    #[test]
    fn padded_rows_are_honoured() {
        let image = Image::with_stride(1, 2, 1, 4, vec![10, 0, 0, 0, 200]);
        let surface = image.to_surface().unwrap();
        assert_eq!(surface.format(), cairo::Format::A8);
        let stride = surface.stride() as usize;
        surface
            .with_data(|data| {
                assert_eq!(data[0], 10);
                assert_eq!(data[stride], 200);
            })
            .unwrap();
    }
}
