//! Splitting a tall snapshot into page-sized bands.

/// Physical page size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    /// Page size in PDF points (1/72 inch).
    pub fn points(&self) -> (f64, f64) {
        const PT_PER_MM: f64 = 72.0 / 25.4;
        (self.width_mm * PT_PER_MM, self.height_mm * PT_PER_MM)
    }

    /// Image rows that fit on one page when the image spans the page width.
    /// A partial row never counts, so a band never runs past the page bottom.
    pub fn rows_per_page(&self, width_px: u32) -> u32 {
        (self.height_mm * f64::from(width_px) / self.width_mm).floor().max(1.0) as u32
    }
}

/// Rows `y..y + height` of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub y: u32,
    pub height: u32,
}

/// Cut an image of `width_px` x `height_px` into consecutive page bands.
///
/// The image is scaled to the page width; every band but the last is a
/// full page tall. An empty image still yields one page.
pub fn paginate(width_px: u32, height_px: u32, geometry: &PageGeometry) -> Vec<Band> {
    let page = geometry.rows_per_page(width_px);
    let pages = height_px.div_ceil(page).max(1);
    (0..pages)
        .map(|i| {
            let y = i * page;
            Band {
                y,
                height: page.min(height_px.saturating_sub(y)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_points() {
        let (w, h) = PageGeometry::A4.points();
        assert!((w - 595.28).abs() < 0.01);
        assert!((h - 841.89).abs() < 0.01);
    }

    #[test]
    fn rows_per_a4_page() {
        // 297 / 210 * 1200 = 1697.14
        assert_eq!(PageGeometry::A4.rows_per_page(1200), 1697);
    }

    #[test]
    fn partial_rows_spill_onto_next_page() {
        // 297 / 210 * 600 = 848.57
        assert_eq!(PageGeometry::A4.rows_per_page(600), 848);
        assert_eq!(paginate(600, 848, &PageGeometry::A4).len(), 1);
        assert_eq!(paginate(600, 849, &PageGeometry::A4).len(), 2);
        assert_eq!(paginate(600, 1698, &PageGeometry::A4).len(), 3);
        assert_eq!(PageGeometry::A4.rows_per_page(1), 1);
    }

    #[test]
    fn short_image_is_one_page() {
        let bands = paginate(1200, 900, &PageGeometry::A4);
        assert_eq!(bands, vec![Band { y: 0, height: 900 }]);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let bands = paginate(1200, 1697 * 2, &PageGeometry::A4);
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[1], Band { y: 1697, height: 1697 });
    }

    #[test]
    fn tall_image_spills_onto_last_short_page() {
        let bands = paginate(1200, 4000, &PageGeometry::A4);
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0], Band { y: 0, height: 1697 });
        assert_eq!(bands[2], Band { y: 3394, height: 606 });
        let covered: u32 = bands.iter().map(|b| b.height).sum();
        assert_eq!(covered, 4000);
    }

    #[test]
    fn empty_image_is_one_page() {
        assert_eq!(paginate(1200, 0, &PageGeometry::A4), vec![Band { y: 0, height: 0 }]);
    }
}
