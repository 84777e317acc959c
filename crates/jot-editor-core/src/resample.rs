//! Software image resampling.
//!
//! The browser's own image downscale produces visible aliasing on emoji
//! bitmaps, so we resize them ourselves to the exact device-pixel size of a
//! text line. The browser layer tries a hardware resize first; this module is
//! the deterministic fallback: a separable Lanczos filter with radius 3,
//! horizontal pass first, then vertical over the intermediate buffer.

use std::f64::consts::PI;

use crate::error::ResampleError;

/// Lanczos window radius.
pub const LANCZOS_A: f64 = 3.0;

/// Lanczos kernel: `sinc(x) * sinc(x / a)` inside the window, 0 outside.
pub fn lanczos(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    if x <= -LANCZOS_A || x >= LANCZOS_A {
        return 0.0;
    }
    let pi_x = PI * x;
    let sinc = pi_x.sin() / pi_x;
    let sinc_a = (pi_x / LANCZOS_A).sin() / (pi_x / LANCZOS_A);
    sinc * sinc_a
}

/// An RGBA8 raster, row-major, not premultiplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Raster {
    /// Wrap an existing pixel buffer. The buffer must hold exactly
    /// `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, ResampleError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(ResampleError::BufferLength {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// A raster filled with one colour.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let rgba = color
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ])
    }
}

/// Resize `src` to a `size`×`size` square with the Lanczos filter.
pub fn lanczos_resize(src: &Raster, size: u32) -> Result<Raster, ResampleError> {
    lanczos_resize_to(src, size, size)
}

/// Resize `src` to `dst_w`×`dst_h` with the Lanczos filter.
pub fn lanczos_resize_to(src: &Raster, dst_w: u32, dst_h: u32) -> Result<Raster, ResampleError> {
    if src.width == 0 || src.height == 0 {
        return Err(ResampleError::EmptySource {
            width: src.width,
            height: src.height,
        });
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(ResampleError::EmptyTarget);
    }

    let (sw, sh) = (src.width as usize, src.height as usize);
    let (dw, dh) = (dst_w as usize, dst_h as usize);

    // Horizontal pass: sw×sh -> dw×sh, kept in floating point.
    let mut tmp = vec![0.0f64; dw * sh * 4];
    let columns: Vec<Taps> = (0..dw).map(|x| Taps::new(x, sw, dw)).collect();
    for y in 0..sh {
        for (x, taps) in columns.iter().enumerate() {
            let px = taps.apply(|sx| {
                let i = (y * sw + sx) * 4;
                [
                    src.rgba[i] as f64,
                    src.rgba[i + 1] as f64,
                    src.rgba[i + 2] as f64,
                    src.rgba[i + 3] as f64,
                ]
            });
            let di = (y * dw + x) * 4;
            tmp[di..di + 4].copy_from_slice(&px);
        }
    }

    // Vertical pass: dw×sh -> dw×dh.
    let mut out = vec![0u8; dw * dh * 4];
    let rows: Vec<Taps> = (0..dh).map(|y| Taps::new(y, sh, dh)).collect();
    for x in 0..dw {
        for (y, taps) in rows.iter().enumerate() {
            let px = taps.apply(|sy| {
                let i = (sy * dw + x) * 4;
                [tmp[i], tmp[i + 1], tmp[i + 2], tmp[i + 3]]
            });
            let di = (y * dw + x) * 4;
            for (c, v) in px.iter().enumerate() {
                out[di + c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    tracing::trace!(
        src_w = sw,
        src_h = sh,
        dst_w = dw,
        dst_h = dh,
        "lanczos resize"
    );

    Ok(Raster {
        width: dst_w,
        height: dst_h,
        rgba: out,
    })
}

/// Filter taps for one destination column or row.
struct Taps {
    /// (clamped source index, weight), zero weights dropped.
    taps: Vec<(usize, f64)>,
    weight_sum: f64,
}

impl Taps {
    fn new(dst: usize, src_len: usize, dst_len: usize) -> Self {
        let center = (dst as f64 + 0.5) * src_len as f64 / dst_len as f64 - 0.5;
        let first = (center - LANCZOS_A + 1.0).floor() as i64;
        let last = (center + LANCZOS_A - 1.0).ceil() as i64;
        let max = src_len as i64 - 1;

        let mut taps = Vec::with_capacity((last - first + 1).max(0) as usize);
        let mut weight_sum = 0.0;
        for s in first..=last {
            let w = lanczos(center - s as f64);
            if w == 0.0 {
                continue;
            }
            weight_sum += w;
            taps.push((s.clamp(0, max) as usize, w));
        }
        Self { taps, weight_sum }
    }

    /// Weighted, normalized sum of the sampled pixels. A zero weight sum
    /// yields opaque black.
    fn apply(&self, sample: impl Fn(usize) -> [f64; 4]) -> [f64; 4] {
        if self.weight_sum == 0.0 {
            return [0.0, 0.0, 0.0, 255.0];
        }
        let mut acc = [0.0f64; 4];
        for &(s, w) in &self.taps {
            let px = sample(s);
            for c in 0..4 {
                acc[c] += px[c] * w;
            }
        }
        acc.map(|v| v / self.weight_sum)
    }
}

/// Raster size for an emoji drawn at one text line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    /// Display size in CSS pixels.
    pub css_px: u32,
    /// Raster size in device pixels.
    pub device_px: u32,
}

impl TargetSize {
    pub const MIN_PX: u32 = 12;
    pub const DEFAULT_FONT_PX: f64 = 16.0;

    /// Derive the target from the containing element's font size and the
    /// device pixel ratio. Missing, zero or non-finite font sizes fall back
    /// to 16px; ratios below 1 count as 1.
    pub fn from_font_size(font_px: Option<f64>, device_pixel_ratio: f64) -> Self {
        let font = font_px
            .filter(|f| f.is_finite() && *f != 0.0)
            .unwrap_or(Self::DEFAULT_FONT_PX);
        let css_px = (font.round().max(Self::MIN_PX as f64)) as u32;
        let dpr = if device_pixel_ratio.is_finite() {
            device_pixel_ratio.max(1.0)
        } else {
            1.0
        };
        let device_px = ((css_px as f64 * dpr).round().max(Self::MIN_PX as f64)) as u32;
        Self { css_px, device_px }
    }
}

/// Leading number of a computed CSS length such as `"16px"` or `"15.5px"`.
pub fn parse_css_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_px() {
        assert_eq!(parse_css_px("16px"), Some(16.0));
        assert_eq!(parse_css_px(" 15.5px "), Some(15.5));
        assert_eq!(parse_css_px("20"), Some(20.0));
        assert_eq!(parse_css_px(""), None);
        assert_eq!(parse_css_px("medium"), None);
    }

    #[test]
    fn test_kernel_shape() {
        assert_eq!(lanczos(0.0), 1.0);
        assert_eq!(lanczos(3.0), 0.0);
        assert_eq!(lanczos(-3.0), 0.0);
        assert_eq!(lanczos(4.5), 0.0);
        assert!(lanczos(1.0).abs() < 1e-12);
        assert!(lanczos(0.5) > 0.5);
        assert!(lanczos(1.5) < 0.0);
        assert!((lanczos(0.7) - lanczos(-0.7)).abs() < 1e-12);
    }

    #[test]
    fn test_downscale_dimensions() {
        let src = Raster::solid(64, 64, [0, 0, 0, 255]);
        let out = lanczos_resize(&src, 32).unwrap();
        assert_eq!(out.width(), 32);
        assert_eq!(out.height(), 32);
        assert_eq!(out.rgba().len(), 32 * 32 * 4);
    }

    #[test]
    fn test_solid_colour_preserved() {
        let color = [200, 40, 120, 180];
        let src = Raster::solid(64, 64, color);
        let out = lanczos_resize(&src, 32).unwrap();
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(out.pixel(x, y), Some(color), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_solid_colour_preserved_upscale() {
        let color = [10, 250, 30, 255];
        let src = Raster::solid(5, 3, color);
        let out = lanczos_resize_to(&src, 12, 7).unwrap();
        assert!(out.rgba().chunks(4).all(|px| px == color));
    }

    #[test]
    fn test_split_image_keeps_sides() {
        // Left half black, right half white.
        let mut rgba = Vec::new();
        for _y in 0..16 {
            for x in 0..16 {
                let v = if x < 8 { 0 } else { 255 };
                rgba.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let src = Raster::new(16, 16, rgba).unwrap();
        let out = lanczos_resize(&src, 8).unwrap();
        assert_eq!(out.pixel(0, 4).unwrap()[0], 0);
        assert_eq!(out.pixel(7, 4).unwrap()[0], 255);
        assert_eq!(out.pixel(3, 4).unwrap()[3], 255);
    }

    #[test]
    fn test_empty_source_is_an_error() {
        let src = Raster::new(0, 10, vec![]).unwrap();
        assert_eq!(
            lanczos_resize(&src, 32),
            Err(ResampleError::EmptySource {
                width: 0,
                height: 10
            })
        );
        let src = Raster::new(10, 0, vec![]).unwrap();
        assert!(lanczos_resize(&src, 32).is_err());
    }

    #[test]
    fn test_zero_target_is_an_error() {
        let src = Raster::solid(4, 4, [1, 2, 3, 4]);
        assert_eq!(lanczos_resize(&src, 0), Err(ResampleError::EmptyTarget));
    }

    #[test]
    fn test_buffer_length_checked() {
        assert_eq!(
            Raster::new(2, 2, vec![0; 15]),
            Err(ResampleError::BufferLength {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn test_target_size() {
        assert_eq!(
            TargetSize::from_font_size(Some(16.0), 2.0),
            TargetSize {
                css_px: 16,
                device_px: 32
            }
        );
        // Tiny fonts clamp to the minimum.
        assert_eq!(TargetSize::from_font_size(Some(8.0), 1.0).css_px, 12);
        // Unreadable font size falls back to 16px.
        assert_eq!(TargetSize::from_font_size(None, 1.0).css_px, 16);
        assert_eq!(TargetSize::from_font_size(Some(f64::NAN), 1.0).css_px, 16);
        // Ratios below 1 count as 1.
        assert_eq!(TargetSize::from_font_size(Some(20.0), 0.5).device_px, 20);
        assert_eq!(TargetSize::from_font_size(Some(15.4), 1.5).device_px, 23);
    }
}
