//! Framebuffer for software rendering: packed ARGB pixels plus a 1/z buffer

use super::types::Color;

pub struct Framebuffer {
    pub pixels: Vec<u32>,  // 0xAARRGGBB, `pitch` pixels per row
    pub zbuffer: Vec<f32>, // 1/w per pixel, 0 = empty (infinitely far)
    pub width: usize,
    pub height: usize,
    pub pitch: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_pitch(width, height, width)
    }

    /// Rows padded to `pitch` pixels (as a locked presentation surface may be)
    pub fn with_pitch(width: usize, height: usize, pitch: usize) -> Self {
        let pitch = pitch.max(width);
        Self {
            pixels: vec![0; pitch * height],
            zbuffer: vec![0.0; width * height],
            width,
            height,
            pitch,
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_argb());
        self.clear_depth();
    }

    pub fn clear_depth(&mut self) {
        self.zbuffer.fill(0.0);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, argb: u32) {
        if x < self.width && y < self.height {
            self.pixels[y * self.pitch + x] = argb;
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.pitch + x]
    }

    pub fn color_at(&self, x: usize, y: usize) -> Color {
        Color::from_argb(self.pixel(x, y))
    }

    pub fn depth(&self, x: usize, y: usize) -> f32 {
        self.zbuffer[y * self.width + x]
    }

    /// 1/z visibility test: larger is nearer. Updates the buffer on pass.
    pub fn depth_test(&mut self, x: usize, y: usize, rhw: f32) -> bool {
        let idx = y * self.width + x;
        if rhw >= self.zbuffer[idx] {
            self.zbuffer[idx] = rhw;
            true
        } else {
            false
        }
    }

    /// Tightly packed RGBA8 copy for texture upload
    pub fn write_rgba8(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.width * self.height * 4);
        for row in self.pixels.chunks(self.pitch).take(self.height) {
            for &p in &row[..self.width] {
                out.extend_from_slice(&Color::from_argb(p).to_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_pixels_and_depth() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set_pixel(1, 1, 0xffff_ffff);
        assert!(fb.depth_test(1, 1, 0.5));
        fb.clear(Color::BLUE);
        assert!(fb.pixels.iter().all(|&p| p == Color::BLUE.to_argb()));
        assert!(fb.zbuffer.iter().all(|&z| z == 0.0));
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut fb = Framebuffer::new(2, 2);
        assert!(fb.depth_test(0, 0, 0.25));
        assert!(!fb.depth_test(0, 0, 0.1));
        assert!(fb.depth_test(0, 0, 0.5));
        assert_eq!(fb.depth(0, 0), 0.5);
    }

    #[test]
    fn test_out_of_range_pixel_ignored() {
        let mut fb = Framebuffer::new(2, 2);
        fb.set_pixel(2, 0, 0xdead_beef);
        fb.set_pixel(0, 5, 0xdead_beef);
        assert!(fb.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_pitch_respected_in_rgba_copy() {
        let mut fb = Framebuffer::with_pitch(2, 2, 4);
        fb.clear(Color::BLACK);
        fb.set_pixel(1, 1, Color::RED.to_argb());
        let mut out = Vec::new();
        fb.write_rgba8(&mut out);
        assert_eq!(out.len(), 2 * 2 * 4);
        assert_eq!(&out[12..16], &[255, 0, 0, 255]);
        assert_eq!(&out[0..4], &[0, 0, 0, 255]);
    }
}
