use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, PIXEL_OFF, PIXEL_ON};

/// # Frame buffer
/// The 64x32 monochrome display stored as a flat, row-major array of pixels.
///
/// A lit pixel holds `PIXEL_ON` (0xFF) and an unlit one `PIXEL_OFF` (0x00) so that toggling is a
/// plain XOR and the buffer can be handed to a renderer as intensities.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [PIXEL_OFF; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        }
    }

    /// Turns every pixel off
    pub fn clear(&mut self) {
        self.pixels.fill(PIXEL_OFF);
    }

    /// Whether the pixel at `x`, `y` is lit. Coordinates outside the display are never lit.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT && self.pixels[y * DISPLAY_WIDTH + x] == PIXEL_ON
    }

    /// Lights or clears a single pixel; coordinates outside the display are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT {
            self.pixels[y * DISPLAY_WIDTH + x] = if on { PIXEL_ON } else { PIXEL_OFF };
        }
    }

    /// XORs an 8-pixel-wide sprite onto the display and reports whether any lit pixel was erased.
    ///
    /// Each byte of `sprite` is a row, most significant bit leftmost. The origin wraps around the
    /// display edges but the sprite itself is clipped at the right and bottom edges.
    ///
    /// # Arguments
    /// * `x` the horizontal origin, taken modulo the display width
    /// * `y` the vertical origin, taken modulo the display height
    /// * `sprite` the rows of the sprite
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let origin_x = x as usize % DISPLAY_WIDTH;
        let origin_y = y as usize % DISPLAY_HEIGHT;
        let mut collision = false;

        for (row, byte) in sprite.iter().enumerate() {
            let py = origin_y + row;
            if py >= DISPLAY_HEIGHT {
                break;
            }
            for bit in 0..8 {
                let px = origin_x + bit;
                if px >= DISPLAY_WIDTH {
                    break;
                }
                if (byte >> (7 - bit)) & 0x1 == 0 {
                    continue;
                }
                let pixel = &mut self.pixels[py * DISPLAY_WIDTH + px];
                collision |= *pixel == PIXEL_ON;
                *pixel ^= PIXEL_ON;
            }
        }

        collision
    }

    /// The raw pixels, row after row
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The pixels one row at a time
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact(DISPLAY_WIDTH)
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == PIXEL_ON).count()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders as rows of `#` and `.` which keeps assertion failures readable
impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row
                .iter()
                .map(|&p| if p == PIXEL_ON { '#' } else { '.' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_sprite_rows() {
        let mut fb = FrameBuffer::new();
        // the 0 glyph
        let collided = fb.draw_sprite(1, 1, &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert!(!collided);
        for x in 1..5 {
            assert!(fb.pixel(x, 1));
            assert!(fb.pixel(x, 5));
        }
        for y in 2..5 {
            assert!(fb.pixel(1, y));
            assert!(!fb.pixel(2, y));
            assert!(!fb.pixel(3, y));
            assert!(fb.pixel(4, y));
        }
        assert_eq!(fb.lit_count(), 14);
    }

    #[test]
    fn test_xors_with_existing_pixels() {
        let mut fb = FrameBuffer::new();
        // 0 1 0 1 -> set
        fb.set_pixel(3, 0, true);
        fb.set_pixel(5, 0, true);
        // 1 1 0 0 -> draw xor
        let collided = fb.draw_sprite(2, 0, &[0xC0]);
        assert!(collided);
        let row: Vec<bool> = (2..6).map(|x| fb.pixel(x, 0)).collect();
        assert_eq!(row, [true, false, false, true]);
    }

    #[test]
    fn test_drawing_twice_erases_and_collides() {
        let mut fb = FrameBuffer::new();
        let sprite = [0xFF, 0x81, 0xFF];
        assert!(!fb.draw_sprite(10, 10, &sprite));
        assert!(fb.draw_sprite(10, 10, &sprite));
        assert_eq!(fb, FrameBuffer::new());
    }

    #[test]
    fn test_origin_wraps() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(64 + 3, 32 + 2, &[0x80]);
        assert!(fb.pixel(3, 2));
        assert_eq!(fb.lit_count(), 1);
    }

    #[test]
    fn test_sprite_is_clipped_at_right_edge() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(60, 0, &[0xFF]);
        for x in 60..64 {
            assert!(fb.pixel(x, 0));
        }
        // nothing wrapped around onto the left edge or the next row
        assert!(!fb.pixel(0, 0));
        assert!(!fb.pixel(0, 1));
        assert_eq!(fb.lit_count(), 4);
    }

    #[test]
    fn test_sprite_is_clipped_at_bottom_edge() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(0, 30, &[0x80, 0x80, 0x80, 0x80]);
        assert!(fb.pixel(0, 30));
        assert!(fb.pixel(0, 31));
        assert!(!fb.pixel(0, 0));
        assert_eq!(fb.lit_count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(0, 0, &[0xFF; 15]);
        fb.clear();
        assert_eq!(fb.lit_count(), 0);
        assert!(fb.pixels().iter().all(|&p| p == PIXEL_OFF));
    }

    #[test]
    fn test_pixels_are_max_or_zero() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(0, 0, &[0xAA]);
        assert_eq!(&fb.pixels()[0..4], &[PIXEL_ON, PIXEL_OFF, PIXEL_ON, PIXEL_OFF]);
        assert_eq!(fb.rows().count(), DISPLAY_HEIGHT);
    }
}
