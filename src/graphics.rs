//! Graphics support via embedded-graphics
//!
//! Implements [`DrawTarget`] for [`Session`] so the embedded-graphics
//! primitive and text machinery can draw through the paged pipeline. The
//! target is infallible from embedded-graphics' point of view: device errors
//! during a pixel write cannot be surfaced through `DrawTarget::Error`
//! without losing the hardware error type, so pixels are dropped and the
//! next page flush reports the failure instead.
//!
//! Remember that paged rendering replays drawing per page: run the whole
//! embedded-graphics draw code inside the page loop, not once before it.

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
};

use crate::coord::Coord;
use crate::device::Device;
use crate::session::Session;

impl<D: Device> OriginDimensions for Session<D> {
    fn size(&self) -> Size {
        Size::new(self.width().to_u32(), self.height().to_u32())
    }
}

impl<D: Device> DrawTarget for Session<D> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Infallible>
    where
        I: IntoIterator<Item = Pixel<BinaryColor>>,
    {
        let width = self.width().to_u32();
        let height = self.height().to_u32();
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x >= width || y >= height {
                continue;
            }
            self.set_color_index(u8::from(color.is_on()));
            let _ = self.draw_pixel(
                <D::Coord as Coord>::from_u32(x),
                <D::Coord as Coord>::from_u32(y),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{ControllerScripts, PagedMono};
    use crate::transport::{AddressMode, ClockClass, Level, Transport};
    use alloc::vec::Vec;
    use embedded_graphics::{
        prelude::*,
        primitives::{PrimitiveStyle, Rectangle},
    };
    use embedded_hal::delay::DelayNs;

    #[derive(Debug)]
    struct MockError;

    #[derive(Default)]
    struct MockTransport {
        data: Vec<u8>,
        in_data_mode: bool,
    }

    impl Transport for MockTransport {
        type Error = MockError;

        fn init(&mut self, _clock: ClockClass) -> Result<(), MockError> {
            Ok(())
        }

        fn stop(&mut self) -> Result<(), MockError> {
            Ok(())
        }

        fn set_address_mode(&mut self, mode: AddressMode) -> Result<(), MockError> {
            self.in_data_mode = mode == AddressMode::Data;
            Ok(())
        }

        fn set_chip_select(&mut self, _index: u8) -> Result<(), MockError> {
            Ok(())
        }

        fn set_reset(&mut self, _level: Level) -> Result<(), MockError> {
            Ok(())
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), MockError> {
            if self.in_data_mode {
                self.data.push(byte);
            }
            Ok(())
        }

        fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), MockError> {
            for &b in bytes {
                self.write_byte(b)?;
            }
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn session() -> Session<PagedMono<u16, MockTransport, NoDelay, [u8; 32]>> {
        let driver = PagedMono::new(
            MockTransport::default(),
            NoDelay,
            32,
            8,
            16,
            [0u8; 32],
            ControllerScripts::default(),
            ClockClass::Cycle300Ns,
        );
        match Session::begin(driver) {
            Ok(s) => s,
            Err(_) => panic!("session init failed"),
        }
    }

    #[test]
    fn test_size_reports_surface_dimensions() {
        let s = session();
        assert_eq!(s.size(), Size::new(32, 16));
    }

    #[test]
    fn test_rectangle_draws_through_page_pipeline() {
        let mut s = session();
        s.first_page().unwrap();
        loop {
            Rectangle::new(Point::new(0, 0), Size::new(4, 16))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(&mut s)
                .unwrap();
            if !s.next_page().unwrap() {
                break;
            }
        }
        let dev = s.stop().map_err(|_| ()).unwrap();
        let (t, _) = dev.release();
        assert_eq!(t.data.len(), 64);
        // columns 0..4 solid on both pages, the rest untouched
        assert_eq!(&t.data[..4], &[0xFF; 4]);
        assert_eq!(t.data[4], 0x00);
        assert_eq!(&t.data[32..36], &[0xFF; 4]);
    }

    #[test]
    fn test_out_of_bounds_pixels_are_dropped() {
        let mut s = session();
        s.first_page().unwrap();
        s.draw_iter([
            Pixel(Point::new(-1, 0), BinaryColor::On),
            Pixel(Point::new(0, -5), BinaryColor::On),
            Pixel(Point::new(32, 0), BinaryColor::On),
            Pixel(Point::new(0, 16), BinaryColor::On),
            Pixel(Point::new(1, 1), BinaryColor::On),
        ])
        .unwrap();
        while s.next_page().unwrap() {}
        let dev = s.stop().map_err(|_| ()).unwrap();
        let (t, _) = dev.release();
        assert_eq!(t.data.iter().filter(|&&b| b != 0).count(), 1);
        assert_eq!(t.data[1], 0x02);
    }
}
