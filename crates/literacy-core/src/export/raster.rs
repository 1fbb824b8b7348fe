//! RGB8 pixel buffer with the few drawing primitives the report needs.

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Build from `0xRRGGBB`.
    pub const fn hex(value: u32) -> Self {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let len = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(len * 3);
        for _ in 0..len {
            pixels.extend_from_slice(&[background.0, background.1, background.2]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Rgb(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Set one pixel; coordinates outside the buffer are ignored.
    pub fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = self.offset(x as u32, y as u32);
        self.pixels[i..i + 3].copy_from_slice(&[color.0, color.1, color.2]);
    }

    /// Fill an axis-aligned rectangle, clipped to the buffer.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(i64::from(self.width));
        let y1 = (y + h).min(i64::from(self.height));
        for py in y0..y1 {
            for px in x0..x1 {
                self.put(px, py, color);
            }
        }
    }

    /// Bresenham line with a square pen of `thickness` pixels.
    pub fn line(&mut self, from: (i64, i64), to: (i64, i64), thickness: i64, color: Rgb) {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = thickness.max(1) / 2;

        loop {
            self.fill_rect(x0 - half, y0 - half, thickness.max(1), thickness.max(1), color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Outline a closed polygon.
    pub fn stroke_polygon(&mut self, points: &[(f64, f64)], thickness: i64, color: Rgb) {
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.line(
                (a.0.round() as i64, a.1.round() as i64),
                (b.0.round() as i64, b.1.round() as i64),
                thickness,
                color,
            );
        }
    }

    /// Scanline fill with the even-odd rule, sampling pixel centres.
    pub fn fill_polygon(&mut self, points: &[(f64, f64)], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min).floor().max(0.0) as i64;
        let max_y = points
            .iter()
            .map(|p| p.1)
            .fold(f64::NEG_INFINITY, f64::max)
            .ceil()
            .min(f64::from(self.height)) as i64;

        let mut crossings = Vec::with_capacity(points.len());
        for y in min_y..max_y {
            let sy = y as f64 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.1 <= sy && b.1 > sy) || (b.1 <= sy && a.1 > sy) {
                    crossings.push(a.0 + (sy - a.1) / (b.1 - a.1) * (b.0 - a.0));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil() as i64;
                let end = (pair[1] - 0.5).floor() as i64;
                if end >= start {
                    self.fill_rect(start, y, end - start + 1, 1, color);
                }
            }
        }
    }

    /// Copy rows `y..y + height` (clipped) into a new raster.
    pub fn crop_rows(&self, y: u32, height: u32) -> Raster {
        let start = y.min(self.height);
        let end = y.saturating_add(height).min(self.height);
        let row = self.width as usize * 3;
        Raster {
            width: self.width,
            height: end - start,
            pixels: self.pixels[start as usize * row..end as usize * row].to_vec(),
        }
    }

    /// Draw a decimal number in the built-in 3x5 digit font.
    ///
    /// `cell` is the size of one font pixel. Returns the drawn width.
    pub fn draw_number(&mut self, x: i64, y: i64, value: u32, cell: i64, color: Rgb) -> i64 {
        let mut cursor = x;
        for ch in value.to_string().bytes() {
            let glyph = DIGITS[usize::from(ch - b'0')];
            for row in 0..5 {
                for col in 0..3 {
                    if glyph & (1 << (14 - (row * 3 + col))) != 0 {
                        self.fill_rect(cursor + col * cell, y + row * cell, cell, cell, color);
                    }
                }
            }
            cursor += 4 * cell;
        }
        cursor - x - cell
    }
}

/// 3x5 bitmaps, row-major, most significant bit first.
const DIGITS: [u16; 10] = [
    0b111_101_101_101_111,
    0b010_110_010_010_111,
    0b111_001_111_100_111,
    0b111_001_111_001_111,
    0b101_101_111_001_001,
    0b111_100_111_001_111,
    0b111_100_111_101_111,
    0b111_001_001_001_001,
    0b111_101_111_101_111,
    0b111_101_111_001_111,
];
