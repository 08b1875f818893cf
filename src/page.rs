//! Page and page-buffer model
//!
//! A *page* is the horizontal strip of the output surface that is fully
//! materialized in RAM at one time. A frame is rendered in multiple passes:
//! the application replays its drawing calls once per page and the device
//! flushes each page to the controller before advancing to the next.
//!
//! [`Page`] is the scalar walk state; [`PageBuffer`] couples it with the
//! surface width and one page's worth of 1-bit pixel storage in the
//! vertical-byte layout shared by the common OLED/LCD controller families
//! (each byte covers 8 rows of one column, LSB topmost).

use crate::clip::{self, Bbox};
use crate::coord::Coord;
use crate::device::{Direction, PixelArg};

/// Extent of the current page: `x0..=x1` by `y0..=y1`, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageBox<C: Coord> {
    /// Left edge, always 0.
    pub x0: C,
    /// Top row of the page.
    pub y0: C,
    /// Right edge, `width - 1`.
    pub x1: C,
    /// Bottom row of the page.
    pub y1: C,
}

impl<C: Coord> Default for PageBox<C> {
    fn default() -> Self {
        Self {
            x0: C::ZERO,
            y0: C::ZERO,
            x1: C::ZERO,
            y1: C::ZERO,
        }
    }
}

/// Scalar page-walk state.
///
/// Invariants across a session: `y0 <= y1 < total_height`; successive pages
/// are contiguous, non-overlapping and monotonically increasing; their union
/// is exactly `[0, total_height)`. The last page may be short when
/// `page_height` does not divide `total_height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page<C: Coord> {
    page_height: C,
    total_height: C,
    y0: C,
    y1: C,
    index: u16,
}

impl<C: Coord> Page<C> {
    /// Create a page walk positioned on the first page.
    ///
    /// `page_height` must be non-zero and no larger than `total_height`.
    pub fn new(page_height: C, total_height: C) -> Self {
        let mut page = Self {
            page_height,
            total_height,
            y0: C::ZERO,
            y1: C::ZERO,
            index: 0,
        };
        page.first();
        page
    }

    /// Rewind to the first page. Always succeeds.
    pub fn first(&mut self) {
        self.index = 0;
        self.y0 = C::ZERO;
        self.y1 = self.clamped_end(self.page_height);
    }

    /// Advance to the next page.
    ///
    /// Returns `false` once the walk has passed the last page; this is the
    /// normal termination signal, not an error. Further calls keep returning
    /// `false` and leave the walk on the last page.
    pub fn next(&mut self) -> bool {
        let y0 = self.y0.saturating_add(self.page_height);
        if y0 >= self.total_height {
            return false;
        }
        self.index += 1;
        self.y0 = y0;
        self.y1 = self.clamped_end(y0.saturating_add(self.page_height));
        true
    }

    fn clamped_end(&self, end: C) -> C {
        let end = end.min(self.total_height);
        end.wrapping_sub(C::ONE)
    }

    /// Top row of the current page.
    pub fn y0(&self) -> C {
        self.y0
    }

    /// Bottom row of the current page.
    pub fn y1(&self) -> C {
        self.y1
    }

    /// Zero-based index of the current page.
    pub fn index(&self) -> u16 {
        self.index
    }

    /// Height of a full page.
    pub fn page_height(&self) -> C {
        self.page_height
    }

    /// Height of the whole surface.
    pub fn total_height(&self) -> C {
        self.total_height
    }

    /// Number of rows in the current page (the last page may be short).
    pub fn rows(&self) -> usize {
        self.y1.to_usize() - self.y0.to_usize() + 1
    }
}

/// One page's worth of 1-bit pixel storage plus the page-walk state.
///
/// The buffer is laid out in vertical bytes: byte `(r / 8) * width + x`
/// holds rows `y0 + r & !7 ..` of column `x`, LSB topmost. The buffer must
/// hold at least `width * page_height / 8` bytes.
pub struct PageBuffer<C: Coord, B> {
    page: Page<C>,
    width: C,
    buf: B,
}

impl<C, B> PageBuffer<C, B>
where
    C: Coord,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a page buffer over the given storage.
    ///
    /// `page_height` must be a non-zero multiple of 8.
    ///
    /// # Panics
    ///
    /// Panics if the storage is smaller than `width * page_height / 8`
    /// bytes or if `page_height` is not a multiple of 8.
    pub fn new(width: C, page_height: C, total_height: C, buf: B) -> Self {
        assert!(
            page_height.to_usize() % 8 == 0 && page_height > C::ZERO,
            "page_height must be a non-zero multiple of 8"
        );
        let required = width.to_usize() * page_height.to_usize() / 8;
        assert!(
            buf.as_ref().len() >= required,
            "page buffer too small: required {} bytes, got {}",
            required,
            buf.as_ref().len()
        );
        let mut pb = Self {
            page: Page::new(page_height, total_height),
            width,
            buf,
        };
        pb.clear();
        pb
    }

    /// Surface width in pixels.
    pub fn width(&self) -> C {
        self.width
    }

    /// The page-walk state.
    pub fn page(&self) -> &Page<C> {
        &self.page
    }

    /// Mutable page-walk state.
    pub fn page_mut(&mut self) -> &mut Page<C> {
        &mut self.page
    }

    /// Fill the buffer with background.
    pub fn clear(&mut self) {
        for byte in self.buf.as_mut().iter_mut() {
            *byte = 0;
        }
    }

    /// Extent of the current page.
    pub fn page_box(&self) -> PageBox<C> {
        PageBox {
            x0: C::ZERO,
            y0: self.page.y0,
            x1: self.width.wrapping_sub(C::ONE),
            y1: self.page.y1,
        }
    }

    /// Can the bounding box overlap the current page? Vertical test first
    /// (it usually rejects), horizontal only when vertical passes.
    pub fn is_visible(&self, bbox: &Bbox<C>) -> bool {
        let (v0, v1) = bbox.y_interval();
        if !clip::interval_intersects(self.page.y0, self.page.y1, v0, v1) {
            return false;
        }
        let (x0, x1) = bbox.x_interval();
        clip::x_interval_visible(self.width, x0, x1)
    }

    /// Write one pixel into the buffer; `on == false` clears it back to
    /// background. Pixels outside the current page or surface are dropped.
    pub fn set_pixel(&mut self, x: C, y: C, on: bool) {
        if x >= self.width || y < self.page.y0 || y > self.page.y1 {
            return;
        }
        let row = y.to_usize() - self.page.y0.to_usize();
        let index = (row / 8) * self.width.to_usize() + x.to_usize();
        let mask = 1u8 << (row % 8);
        let buf = self.buf.as_mut();
        if on {
            buf[index] |= mask;
        } else {
            buf[index] &= !mask;
        }
    }

    /// Draw an 8-pixel pattern run, MSB first, advancing the argument's
    /// position in its direction. Only set bits draw; the background shows
    /// through cleared bits. The argument's position is left one step past
    /// the last pattern bit.
    pub fn set_pixel_run(&mut self, arg: &mut PixelArg<C>) {
        let mut pattern = arg.pattern;
        let on = arg.color != 0;
        while pattern != 0 {
            if pattern & 0x80 != 0 {
                self.set_pixel(arg.x, arg.y, on);
            }
            pattern <<= 1;
            match arg.dir {
                Direction::Right => arg.x = arg.x.wrapping_add(C::ONE),
                Direction::Down => arg.y = arg.y.wrapping_add(C::ONE),
                Direction::Left => arg.x = arg.x.wrapping_sub(C::ONE),
                Direction::Up => arg.y = arg.y.wrapping_sub(C::ONE),
            }
        }
        arg.pattern = 0;
    }

    /// The bytes covering the rows of the current page, for flushing.
    pub fn page_data(&self) -> &[u8] {
        let used = self.page.rows().div_ceil(8) * self.width.to_usize();
        &self.buf.as_ref()[..used]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_tiling_is_contiguous_and_exact() {
        for (total, height) in [(64u16, 8u16), (65, 8), (128, 32), (10, 8), (7, 8)] {
            let expected_pages = (total as usize).div_ceil(height as usize);
            let mut page = Page::new(height, total);
            let mut pages = 0;
            let mut next_y0 = 0u16;
            loop {
                assert_eq!(page.y0(), next_y0);
                assert!(page.y0() <= page.y1());
                assert!(page.y1() < total);
                assert_eq!(page.index() as usize, pages);
                next_y0 = page.y1() + 1;
                pages += 1;
                if !page.next() {
                    break;
                }
            }
            assert_eq!(pages, expected_pages, "total={total} height={height}");
            assert_eq!(next_y0, total, "union must cover [0, total)");
        }
    }

    #[test]
    fn test_last_page_is_short() {
        let mut page = Page::new(8u16, 65);
        for _ in 0..8 {
            assert_eq!(page.rows(), 8);
            assert!(page.next());
        }
        assert_eq!((page.y0(), page.y1()), (64, 64));
        assert_eq!(page.rows(), 1);
        assert!(!page.next());
    }

    #[test]
    fn test_next_after_exhaustion_stays_on_last_page() {
        let mut page = Page::new(8u16, 16);
        assert!(page.next());
        for _ in 0..10 {
            assert!(!page.next());
        }
        assert_eq!((page.y0(), page.y1(), page.index()), (8, 15, 1));
    }

    #[test]
    fn test_first_rewinds_after_exhaustion() {
        let mut page = Page::new(8u16, 16);
        assert!(page.next());
        assert!(!page.next());
        page.first();
        assert_eq!((page.y0(), page.y1(), page.index()), (0, 7, 0));
    }

    #[test]
    fn test_page_box_spans_width() {
        let pb = PageBuffer::new(128u16, 8, 64, [0u8; 128]);
        assert_eq!(
            pb.page_box(),
            PageBox {
                x0: 0,
                y0: 0,
                x1: 127,
                y1: 7
            }
        );
    }

    #[test]
    fn test_set_pixel_vertical_byte_layout() {
        let mut pb = PageBuffer::new(16u16, 8, 64, [0u8; 16]);
        pb.set_pixel(3, 0, true);
        pb.set_pixel(3, 7, true);
        assert_eq!(pb.page_data()[3], 0x81);
        pb.set_pixel(3, 0, false);
        assert_eq!(pb.page_data()[3], 0x80);
        // outside the page: dropped
        pb.set_pixel(3, 8, true);
        pb.set_pixel(16, 0, true);
        assert_eq!(pb.page_data()[3], 0x80);
    }

    #[test]
    fn test_set_pixel_on_later_page() {
        let mut pb = PageBuffer::new(16u16, 8, 64, [0u8; 16]);
        pb.page_mut().next();
        pb.clear();
        pb.set_pixel(0, 8, true);
        pb.set_pixel(0, 15, true);
        assert_eq!(pb.page_data()[0], 0x81);
        // row of the previous page: dropped
        pb.set_pixel(0, 7, true);
        assert_eq!(pb.page_data()[0], 0x81);
    }

    #[test]
    fn test_set_pixel_run_directions() {
        let mut pb = PageBuffer::new(16u16, 8, 8, [0u8; 16]);
        let mut arg = PixelArg {
            x: 2,
            y: 3,
            pattern: 0b1010_0000,
            dir: Direction::Right,
            color: 1,
            hi_color: 0,
        };
        pb.set_pixel_run(&mut arg);
        assert_eq!(pb.page_data()[2], 1 << 3);
        assert_eq!(pb.page_data()[3], 0);
        assert_eq!(pb.page_data()[4], 1 << 3);
        // position advanced one step past the last pattern bit
        assert_eq!(arg.x, 5);
        assert_eq!(arg.pattern, 0);

        let mut down = PixelArg {
            x: 0,
            y: 0,
            pattern: 0b1100_0000,
            dir: Direction::Down,
            color: 1,
            hi_color: 0,
        };
        pb.set_pixel_run(&mut down);
        assert_eq!(pb.page_data()[0], 0b0000_0011);
    }

    #[test]
    fn test_is_visible_tracks_current_page() {
        let mut pb = PageBuffer::new(128u16, 8, 64, [0u8; 128]);
        let top = Bbox::new(0u16, 0, 128, 8);
        let bottom = Bbox::new(0u16, 60, 10, 10);
        assert!(pb.is_visible(&top));
        assert!(!pb.is_visible(&bottom));
        while pb.page_mut().next() {}
        // walk ended; rewind and advance to the last page
        pb.page_mut().first();
        for _ in 0..7 {
            assert!(pb.page_mut().next());
        }
        assert_eq!((pb.page().y0(), pb.page().y1()), (56, 63));
        assert!(!pb.is_visible(&top));
        assert!(pb.is_visible(&bottom));
    }

    #[test]
    fn test_page_data_covers_short_last_page() {
        let mut pb = PageBuffer::new(16u16, 16, 40, [0u8; 32]);
        assert_eq!(pb.page_data().len(), 32);
        pb.page_mut().next();
        pb.page_mut().next();
        assert_eq!((pb.page().y0(), pb.page().y1()), (32, 39));
        assert_eq!(pb.page_data().len(), 16);
    }

    #[test]
    #[should_panic(expected = "page buffer too small")]
    fn test_new_panics_on_small_buffer() {
        let _ = PageBuffer::new(128u16, 8, 64, [0u8; 64]);
    }
}
