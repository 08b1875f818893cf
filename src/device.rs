//! Device dispatch contract
//!
//! A [`Device`] is a polymorphic rendering target that answers the message
//! vocabulary below. Concrete controller drivers implement it by writing into
//! a page buffer and flushing through a transport; decorator devices
//! implement it by wrapping another device and transforming a subset of
//! messages while forwarding the rest (see [`crate::scale`]).
//!
//! The contract every implementation must honor:
//!
//! - Messages a device does not recognize answer [`Reply::Ack`], so
//!   forward-compatible message additions don't break old drivers
//!   ([`Message`] is `#[non_exhaustive]` to force the default arm).
//! - `Init` failure is fatal to the session.
//! - A transport failure during the `PageNext` flush is fatal to the page;
//!   the device must abort remaining writes and propagate the error without
//!   advancing the page position.
//! - Optional capabilities (`Contrast`, `SleepOn`/`SleepOff`, palette
//!   entries) answer [`Reply::Unsupported`], which callers treat as a no-op.

use core::fmt::Debug;

use crate::coord::Coord;
use crate::mode::DisplayMode;
use crate::page::PageBox;

/// Walk direction of an 8-pixel run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Increasing x.
    #[default]
    Right,
    /// Increasing y.
    Down,
    /// Decreasing x.
    Left,
    /// Decreasing y.
    Up,
}

/// Transient pixel-drawing argument, mutated in place between successive
/// dispatch calls of one primitive to avoid per-pixel allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelArg<C: Coord> {
    /// X coordinate; advanced by run drawing.
    pub x: C,
    /// Y coordinate; advanced by run drawing.
    pub y: C,
    /// 8-pixel bit pattern for run drawing, MSB first; consumed in place.
    pub pattern: u8,
    /// Walk direction for run drawing.
    pub dir: Direction,
    /// Color index, or the low byte in hi-color mode. `0` is background.
    pub color: u8,
    /// High byte of the color in hi-color mode.
    pub hi_color: u8,
}

impl<C: Coord> Default for PixelArg<C> {
    fn default() -> Self {
        Self {
            x: C::ZERO,
            y: C::ZERO,
            pattern: 0,
            dir: Direction::Right,
            color: 1,
            hi_color: 0,
        }
    }
}

/// Palette entry for indexed-color devices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorEntry {
    /// Palette index.
    pub index: u8,
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

/// The complete message vocabulary a device can be sent.
///
/// Marked `#[non_exhaustive]`: drivers must end their dispatch match with a
/// default arm answering [`Reply::Ack`].
#[non_exhaustive]
#[derive(Debug)]
pub enum Message<'a, C: Coord> {
    /// Acquire the transport and run controller initialization. Fatal to the
    /// session on failure.
    Init,
    /// Release transport resources. Sent on every teardown path.
    Stop,
    /// Set display contrast, 0..=255. Only between pages.
    Contrast(u8),
    /// Enter low-power mode. Only between pages.
    SleepOn,
    /// Leave low-power mode. Only between pages.
    SleepOff,
    /// Reset the page walk to the first page.
    PageFirst,
    /// Flush the current page and advance; answers [`Reply::MorePages`].
    PageNext,
    /// Report the extent of the current page; answers [`Reply::PageBox`].
    GetPageBox,
    /// Draw one pixel from the argument's position and color.
    SetPixel(&'a mut PixelArg<C>),
    /// Draw an 8-pixel pattern run from the argument's position, color and
    /// direction.
    SetPixelRun(&'a mut PixelArg<C>),
    /// Program one palette entry.
    SetColorEntry(ColorEntry),
    /// Report surface width; answers [`Reply::Dimension`].
    GetWidth,
    /// Report surface height; answers [`Reply::Dimension`].
    GetHeight,
    /// Report the surface pixel mode; answers [`Reply::Mode`].
    GetMode,
}

/// Device answer to a dispatched message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply<C: Coord> {
    /// Neutral success; also the answer to unrecognized messages.
    Ack,
    /// The device does not implement this optional capability; callers treat
    /// it as a no-op, not an error.
    Unsupported,
    /// Whether further pages remain after a `PageNext`.
    MorePages(bool),
    /// Extent of the current page.
    PageBox(PageBox<C>),
    /// A width or height.
    Dimension(C),
    /// The surface pixel mode.
    Mode(DisplayMode),
}

/// A polymorphic rendering target.
///
/// Devices form a singly linked delegation chain: a decorator owns the
/// device it wraps and dispatch cost is linear in chain depth. The chain is
/// never cyclic; ownership flows outward-to-inward.
pub trait Device {
    /// Coordinate type of the device's surface.
    type Coord: Coord;
    /// Error type propagated from the underlying transport.
    type Error: Debug;

    /// Handle one message; the single capability a driver exposes.
    fn dispatch(
        &mut self,
        msg: Message<'_, Self::Coord>,
    ) -> Result<Reply<Self::Coord>, Self::Error>;
}
