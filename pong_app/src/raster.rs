//! CPU-side RGBA surface for the 2D overlay.
//!
//! The overlay is drawn into this buffer every frame and uploaded as the
//! quad's texture, so no GL context is needed to test the drawing.

/// An RGBA8 color.
pub type Color = [u8; 4];

/// A width x height RGBA8 pixel buffer, row-major, top row first.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelSurface {
    /// A fully transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA8 bytes, ready for texture upload.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Fill the whole surface with one color.
    pub fn clear(&mut self, color: Color) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    /// Set one pixel; coordinates outside the surface are ignored.
    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[offset..offset + 4].copy_from_slice(&color);
    }

    /// Draw a line between two points (Bresenham).
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let mut error = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                x += step_x;
            }
            if doubled <= dx {
                error += dx;
                y += step_y;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = [255, 0, 0, 255];

    fn pixel(surface: &PixelSurface, x: u32, y: u32) -> Color {
        let offset = (y as usize * surface.width() as usize + x as usize) * 4;
        surface.pixels()[offset..offset + 4].try_into().unwrap()
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = PixelSurface::new(4, 4);
        assert!(surface.pixels().iter().all(|&b| b == 0));
        assert_eq!(surface.pixels().len(), 64);
    }

    #[test]
    fn test_clear_fills_every_pixel() {
        let mut surface = PixelSurface::new(3, 2);
        surface.clear(RED);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(pixel(&surface, x, y), RED);
            }
        }
    }

    #[test]
    fn test_diagonal_line_touches_endpoints() {
        let mut surface = PixelSurface::new(8, 8);
        surface.draw_line(0, 0, 7, 7, RED);
        assert_eq!(pixel(&surface, 0, 0), RED);
        assert_eq!(pixel(&surface, 7, 7), RED);
        assert_eq!(pixel(&surface, 3, 3), RED);
        // Off-diagonal pixels stay untouched.
        assert_eq!(pixel(&surface, 7, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_out_of_bounds_put_is_ignored() {
        let mut surface = PixelSurface::new(2, 2);
        surface.put(-1, 0, RED);
        surface.put(0, 5, RED);
        surface.draw_line(-4, -4, 6, 6, RED);
        assert_eq!(pixel(&surface, 0, 0), RED);
    }
}
