/// Blank Braille pattern, U+2800
pub const BLANK: char = '\u{2800}';

/// Dot bit for a pixel inside its 2x4 character cell.
/// ```text
/// (0,0) (1,0)   bits: 0x01 0x08
/// (0,1) (1,1)   bits: 0x02 0x10
/// (0,2) (1,2)   bits: 0x04 0x20
/// (0,3) (1,3)   bits: 0x40 0x80
/// ```
#[inline(always)]
fn dot_bit(x: usize, y: usize) -> u8 {
    match (x % 2, y % 4) {
        (0, 0) => 0x01,
        (1, 0) => 0x08,
        (0, 1) => 0x02,
        (1, 1) => 0x10,
        (0, 2) => 0x04,
        (1, 2) => 0x20,
        (0, 3) => 0x40,
        _ => 0x80,
    }
}

/// Braille canvas: every terminal cell holds a 2x4 dot grid, so a
/// `width` x `height` character area gives `width*2` x `height*4` pixels.
pub struct BrailleCanvas {
    width: usize,
    height: usize,
    /// Row-major dot patterns, one byte per character
    cells: Vec<u8>,
}

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Pixel dimensions
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.width * 2, self.height * 4)
    }

    /// Out-of-range pixels are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let cx = x / 2;
        let cy = y / 4;
        if cx >= self.width || cy >= self.height {
            return;
        }
        self.cells[cy * self.width + cx] |= dot_bit(x, y);
    }

    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    #[cfg(test)]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        let cx = x / 2;
        let cy = y / 4;
        cx < self.width && cy < self.height && self.cells[cy * self.width + cx] & dot_bit(x, y) != 0
    }

    /// Braille glyph at a character position
    pub fn char_at(&self, col: usize, row: usize) -> char {
        if col >= self.width || row >= self.height {
            return BLANK;
        }
        char::from_u32(0x2800 + self.cells[row * self.width + col] as u32).unwrap_or(BLANK)
    }

    pub fn row_to_string(&self, row: usize) -> String {
        (0..self.width).map(|col| self.char_at(col, row)).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|i| self.row_to_string(i))
    }

    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }
}
