//! Render session orchestration
//!
//! A [`Session`] owns a device chain and carries the per-frame draw state
//! (current color, pixel argument scratch, cached geometry and page box)
//! that drawing code needs between dispatch calls. The frame protocol:
//!
//! ```text
//! session.first_page()?;
//! loop {
//!     // replay all drawing calls for this frame
//!     if !session.next_page()? { break; }
//! }
//! ```
//!
//! Drawing calls outside a page walk are accepted but land on whatever page
//! the buffer currently holds. [`Session::is_visible`] lets replay code skip
//! primitives whose bounding box cannot touch the current page.

use crate::clip::Bbox;
use crate::coord::Coord;
use crate::device::{ColorEntry, Device, Direction, Message, PixelArg, Reply};
use crate::error::Error;
use crate::mode::DisplayMode;
use crate::page::PageBox;

/// A running render session over a device chain.
pub struct Session<D: Device> {
    device: D,
    width: D::Coord,
    height: D::Coord,
    mode: DisplayMode,
    page_box: PageBox<D::Coord>,
    arg: PixelArg<D::Coord>,
}

impl<D: Device> Session<D> {
    /// Initialize the device and cache its geometry.
    ///
    /// On failure the device is stopped best-effort and the error wrapped in
    /// [`Error::Init`]; the device is consumed either way.
    pub fn begin(mut device: D) -> Result<Self, Error<D::Error>> {
        if let Err(e) = device.dispatch(Message::Init) {
            // teardown still runs so the transport gets released
            let _ = device.dispatch(Message::Stop);
            return Err(Error::Init(e));
        }
        match Self::setup(device) {
            Ok(session) => Ok(session),
            Err((mut device, e)) => {
                let _ = device.dispatch(Message::Stop);
                Err(Error::Init(e))
            }
        }
    }

    fn setup(mut device: D) -> Result<Self, (D, D::Error)> {
        macro_rules! ask {
            ($msg:expr) => {
                match device.dispatch($msg) {
                    Ok(reply) => reply,
                    Err(e) => return Err((device, e)),
                }
            };
        }
        let width = match ask!(Message::GetWidth) {
            Reply::Dimension(w) => w,
            _ => <D::Coord as Coord>::ZERO,
        };
        let height = match ask!(Message::GetHeight) {
            Reply::Dimension(h) => h,
            _ => <D::Coord as Coord>::ZERO,
        };
        let mode = match ask!(Message::GetMode) {
            Reply::Mode(m) => m,
            _ => DisplayMode::Unknown,
        };
        ask!(Message::PageFirst);
        let page_box = match ask!(Message::GetPageBox) {
            Reply::PageBox(pb) => pb,
            _ => PageBox::default(),
        };
        log::debug!(
            "session begin: {}x{} mode {:?}",
            width.to_u32(),
            height.to_u32(),
            mode
        );
        Ok(Self {
            device,
            width,
            height,
            mode,
            page_box,
            arg: PixelArg::default(),
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> D::Coord {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> D::Coord {
        self.height
    }

    /// Pixel mode of the surface.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Extent of the current page.
    pub fn page_box(&self) -> PageBox<D::Coord> {
        self.page_box
    }

    /// Can a primitive with this bounding box touch the current page?
    ///
    /// `false` guarantees drawing it would change nothing; replay code uses
    /// this to skip whole primitives per page.
    pub fn is_visible(&self, bbox: &Bbox<D::Coord>) -> bool {
        let (v0, v1) = bbox.y_interval();
        if !crate::clip::interval_intersects(self.page_box.y0, self.page_box.y1, v0, v1) {
            return false;
        }
        let (x0, x1) = bbox.x_interval();
        crate::clip::x_interval_visible(self.width, x0, x1)
    }

    /// Set the draw color index used by subsequent pixel calls. `0` is
    /// background.
    pub fn set_color_index(&mut self, index: u8) {
        self.arg.color = index;
    }

    /// Set the 16-bit draw color for hi-color surfaces.
    pub fn set_hi_color(&mut self, color: u16) {
        self.arg.color = (color & 0xFF) as u8;
        self.arg.hi_color = (color >> 8) as u8;
    }

    /// Program one palette entry on indexed-color devices; a no-op
    /// elsewhere.
    pub fn set_color_entry(&mut self, entry: ColorEntry) -> Result<(), Error<D::Error>> {
        self.device
            .dispatch(Message::SetColorEntry(entry))
            .map(drop)
            .map_err(Error::Device)
    }

    /// Draw one pixel in the current color.
    pub fn draw_pixel(&mut self, x: D::Coord, y: D::Coord) -> Result<(), Error<D::Error>> {
        self.arg.x = x;
        self.arg.y = y;
        self.device
            .dispatch(Message::SetPixel(&mut self.arg))
            .map(drop)
            .map_err(Error::Device)
    }

    /// Draw an 8-pixel pattern run from `(x, y)` in `dir`, MSB first.
    pub fn draw_pixel_run(
        &mut self,
        x: D::Coord,
        y: D::Coord,
        dir: Direction,
        pattern: u8,
    ) -> Result<(), Error<D::Error>> {
        self.arg.x = x;
        self.arg.y = y;
        self.arg.dir = dir;
        self.arg.pattern = pattern;
        self.device
            .dispatch(Message::SetPixelRun(&mut self.arg))
            .map(drop)
            .map_err(Error::Device)
    }

    /// Set display contrast. Devices without contrast control succeed as a
    /// no-op. Only valid between pages.
    pub fn contrast(&mut self, value: u8) -> Result<(), Error<D::Error>> {
        self.device
            .dispatch(Message::Contrast(value))
            .map(drop)
            .map_err(Error::Device)
    }

    /// Enter low-power mode; a no-op on devices without one.
    pub fn sleep_on(&mut self) -> Result<(), Error<D::Error>> {
        self.device
            .dispatch(Message::SleepOn)
            .map(drop)
            .map_err(Error::Device)
    }

    /// Leave low-power mode; a no-op on devices without one.
    pub fn sleep_off(&mut self) -> Result<(), Error<D::Error>> {
        self.device
            .dispatch(Message::SleepOff)
            .map(drop)
            .map_err(Error::Device)
    }

    /// Start a frame: rewind to the first page and clear the buffer.
    pub fn first_page(&mut self) -> Result<(), Error<D::Error>> {
        self.device
            .dispatch(Message::PageFirst)
            .map_err(Error::Device)?;
        self.refresh_page_box()
    }

    /// Flush the current page and advance.
    ///
    /// Returns `Ok(false)` when the frame is complete. A transport failure
    /// surfaces as [`Error::PageFlush`] and leaves the page position on the
    /// page that failed.
    pub fn next_page(&mut self) -> Result<bool, Error<D::Error>> {
        let more = match self.device.dispatch(Message::PageNext) {
            Ok(Reply::MorePages(more)) => more,
            Ok(_) => false,
            Err(e) => return Err(Error::PageFlush(e)),
        };
        if more {
            self.refresh_page_box()?;
        }
        Ok(more)
    }

    fn refresh_page_box(&mut self) -> Result<(), Error<D::Error>> {
        if let Reply::PageBox(pb) = self
            .device
            .dispatch(Message::GetPageBox)
            .map_err(Error::Device)?
        {
            self.page_box = pb;
        }
        Ok(())
    }

    /// End the session and release the device.
    ///
    /// The stop message reaches the device even if it fails; the device is
    /// returned regardless so transports can be reclaimed.
    pub fn stop(mut self) -> Result<D, (D, Error<D::Error>)> {
        match self.device.dispatch(Message::Stop) {
            Ok(_) => Ok(self.device),
            Err(e) => Err((self.device, Error::Device(e))),
        }
    }

    /// Borrow the device chain.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutably borrow the device chain, e.g. to dispatch custom messages.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}
