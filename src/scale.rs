//! Resolution-scaling decorator devices
//!
//! A decorator wraps another [`Device`], transforms some messages and
//! forwards the rest verbatim. [`Scale2x`] presents a half-resolution
//! logical surface over a physical device, mapping each logical pixel to a
//! 2x2 physical block; rendering cores sized for a smaller panel then drive
//! a larger one without changes. [`Passthrough`] forwards everything and
//! serves as the neutral element of a chain.
//!
//! Decorators own the device they wrap, so a chain is a single owner tree
//! with no allocation and dispatch cost linear in its depth.

use crate::coord::Coord;
use crate::device::{Device, Direction, Message, PixelArg, Reply};
use crate::page::PageBox;

/// Forwarding decorator that changes nothing.
pub struct Passthrough<D>(pub D);

impl<D: Device> Device for Passthrough<D> {
    type Coord = D::Coord;
    type Error = D::Error;

    fn dispatch(
        &mut self,
        msg: Message<'_, Self::Coord>,
    ) -> Result<Reply<Self::Coord>, Self::Error> {
        self.0.dispatch(msg)
    }
}

/// Half-resolution decorator: each logical pixel covers a 2x2 physical
/// block.
///
/// Geometry replies from the wrapped device are halved on the way out;
/// drawing messages are expanded into four physical pixels on the way in.
/// Everything else passes through unchanged. The wrapped device's width,
/// height and page height are assumed even.
pub struct Scale2x<D> {
    inner: D,
}

impl<D: Device> Scale2x<D> {
    /// Wrap a physical device.
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    /// Unwrap the physical device.
    pub fn into_inner(self) -> D {
        self.inner
    }

    /// Send the 2x2 physical block of one logical pixel.
    fn expand_pixel(
        &mut self,
        x: D::Coord,
        y: D::Coord,
        color: u8,
        hi_color: u8,
    ) -> Result<(), D::Error> {
        let x0 = x.doubled();
        let y0 = y.doubled();
        let one = <D::Coord as Coord>::ONE;
        for (px, py) in [
            (x0, y0),
            (x0.wrapping_add(one), y0),
            (x0, y0.wrapping_add(one)),
            (x0.wrapping_add(one), y0.wrapping_add(one)),
        ] {
            let mut arg = PixelArg {
                x: px,
                y: py,
                color,
                hi_color,
                ..PixelArg::default()
            };
            self.inner.dispatch(Message::SetPixel(&mut arg))?;
        }
        Ok(())
    }

    fn step(arg: &mut PixelArg<D::Coord>) {
        let one = <D::Coord as Coord>::ONE;
        match arg.dir {
            Direction::Right => arg.x = arg.x.wrapping_add(one),
            Direction::Down => arg.y = arg.y.wrapping_add(one),
            Direction::Left => arg.x = arg.x.wrapping_sub(one),
            Direction::Up => arg.y = arg.y.wrapping_sub(one),
        }
    }
}

impl<D: Device> Device for Scale2x<D> {
    type Coord = D::Coord;
    type Error = D::Error;

    fn dispatch(
        &mut self,
        msg: Message<'_, Self::Coord>,
    ) -> Result<Reply<Self::Coord>, Self::Error> {
        match msg {
            Message::GetWidth | Message::GetHeight => {
                match self.inner.dispatch(msg)? {
                    Reply::Dimension(d) => Ok(Reply::Dimension(d.halved())),
                    other => Ok(other),
                }
            }
            Message::GetPageBox => match self.inner.dispatch(msg)? {
                Reply::PageBox(pb) => Ok(Reply::PageBox(PageBox {
                    x0: pb.x0.halved(),
                    y0: pb.y0.halved(),
                    x1: pb.x1.halved(),
                    y1: pb.y1.halved(),
                })),
                other => Ok(other),
            },
            Message::SetPixel(arg) => {
                self.expand_pixel(arg.x, arg.y, arg.color, arg.hi_color)?;
                Ok(Reply::Ack)
            }
            Message::SetPixelRun(arg) => {
                let mut pattern = arg.pattern;
                while pattern != 0 {
                    if pattern & 0x80 != 0 {
                        self.expand_pixel(arg.x, arg.y, arg.color, arg.hi_color)?;
                    }
                    pattern <<= 1;
                    Self::step(arg);
                }
                arg.pattern = 0;
                Ok(Reply::Ack)
            }
            other => self.inner.dispatch(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::convert::Infallible;
    use core::fmt::Debug;

    /// Records every pixel dispatched to it; answers a fixed geometry.
    struct Recorder {
        width: u16,
        height: u16,
        page: PageBox<u16>,
        pixels: Vec<(u16, u16, u8)>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                width: 128,
                height: 64,
                page: PageBox {
                    x0: 0,
                    y0: 8,
                    x1: 127,
                    y1: 15,
                },
                pixels: Vec::new(),
            }
        }
    }

    impl Device for Recorder {
        type Coord = u16;
        type Error = Infallible;

        fn dispatch(&mut self, msg: Message<'_, u16>) -> Result<Reply<u16>, Infallible> {
            match msg {
                Message::GetWidth => Ok(Reply::Dimension(self.width)),
                Message::GetHeight => Ok(Reply::Dimension(self.height)),
                Message::GetPageBox => Ok(Reply::PageBox(self.page)),
                Message::SetPixel(arg) => {
                    self.pixels.push((arg.x, arg.y, arg.color));
                    Ok(Reply::Ack)
                }
                _ => Ok(Reply::Ack),
            }
        }
    }

    fn dim<D: Device<Coord = u16>>(dev: &mut D, msg: Message<'_, u16>) -> u16
    where
        D::Error: Debug,
    {
        match dev.dispatch(msg) {
            Ok(Reply::Dimension(d)) => d,
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_geometry_is_halved() {
        let mut dev = Scale2x::new(Recorder::new());
        assert_eq!(dim(&mut dev, Message::GetWidth), 64);
        assert_eq!(dim(&mut dev, Message::GetHeight), 32);
        match dev.dispatch(Message::GetPageBox) {
            Ok(Reply::PageBox(pb)) => {
                assert_eq!((pb.x0, pb.y0, pb.x1, pb.y1), (0, 4, 63, 7));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_pixel_expands_to_2x2_block() {
        let mut dev = Scale2x::new(Recorder::new());
        let mut arg = PixelArg {
            x: 3u16,
            y: 5,
            color: 1,
            ..PixelArg::default()
        };
        dev.dispatch(Message::SetPixel(&mut arg)).ok();
        assert_eq!(
            dev.inner.pixels,
            [(6, 10, 1), (7, 10, 1), (6, 11, 1), (7, 11, 1)]
        );
    }

    #[test]
    fn test_run_expands_each_set_bit() {
        let mut dev = Scale2x::new(Recorder::new());
        let mut arg = PixelArg {
            x: 0u16,
            y: 0,
            pattern: 0b1010_0000,
            dir: Direction::Right,
            color: 1,
            hi_color: 0,
        };
        dev.dispatch(Message::SetPixelRun(&mut arg)).ok();
        // two set bits, four physical pixels each
        assert_eq!(dev.inner.pixels.len(), 8);
        assert_eq!(dev.inner.pixels[0], (0, 0, 1));
        assert_eq!(dev.inner.pixels[4], (4, 0, 1));
        // logical position advanced past the run
        assert_eq!(arg.x, 3);
    }

    #[test]
    fn test_passthrough_is_transparent() {
        let mut plain = Recorder::new();
        let mut wrapped = Passthrough(Recorder::new());
        let mut a = PixelArg {
            x: 9u16,
            y: 2,
            color: 1,
            ..PixelArg::default()
        };
        let mut b = a;
        plain.dispatch(Message::SetPixel(&mut a)).ok();
        wrapped.dispatch(Message::SetPixel(&mut b)).ok();
        assert_eq!(plain.pixels, wrapped.0.pixels);
        assert_eq!(dim(&mut wrapped, Message::GetWidth), 128);
    }
}
