//! Paged monochrome controller driver
//!
//! [`PagedMono`] is a data-driven [`Device`]: everything controller-specific
//! lives in a [`ControllerScripts`] table of escape-coded byte sequences
//! (see [`crate::escape`]), so one driver body serves the whole family of
//! page-addressed 1-bit controllers (SSD1306, UC1701, ST7920 class). The
//! driver owns the transport, a delay source and a page buffer; drawing
//! messages write into the buffer and `PageNext` flushes it.

use embedded_hal::delay::DelayNs;

use crate::coord::Coord;
use crate::device::{Device, Message, Reply};
use crate::escape;
use crate::mode::DisplayMode;
use crate::page::PageBuffer;
use crate::transport::{AddressMode, ClockClass, Transport};

/// Escape-coded byte tables describing one controller model.
///
/// All scripts are optional; an empty slice means the controller has nothing
/// to send at that point. Tables are `'static` so they can live in flash and
/// be shared across driver instances.
#[derive(Clone, Copy, Debug, Default)]
pub struct ControllerScripts {
    /// Power-up sequence, run once at `Init`. Usually begins with a reset
    /// pulse and chip select and ends deselected.
    pub init: &'static [u8],
    /// Run at `PageFirst`, before the first page of a frame.
    pub page_first: &'static [u8],
    /// Run at the start of every page flush, after chip select. Typically
    /// sets column address zero in command mode.
    pub page_prologue: &'static [u8],
    /// Entry into low-power mode; empty means unsupported.
    pub sleep_on: &'static [u8],
    /// Exit from low-power mode; empty means unsupported.
    pub sleep_off: &'static [u8],
    /// Run before the contrast value byte; empty means contrast is
    /// unsupported.
    pub contrast_prologue: &'static [u8],
    /// When set, the flush sends `base | page_index` as a command after the
    /// prologue to select the destination page row.
    pub page_select_base: Option<u8>,
}

/// Generic driver for page-addressed monochrome controllers.
///
/// ## Type Parameters
///
/// * `C` - Coordinate type of the surface
/// * `T` - Transport to the controller
/// * `DL` - Delay source for script delays and reset pulses
/// * `B` - Page buffer storage, e.g. `&mut [u8]` or an owned array
pub struct PagedMono<C: Coord, T, DL, B> {
    transport: T,
    delay: DL,
    pb: PageBuffer<C, B>,
    height: C,
    scripts: ControllerScripts,
    clock: ClockClass,
}

impl<C, T, DL, B> PagedMono<C, T, DL, B>
where
    C: Coord,
    T: Transport,
    DL: DelayNs,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a driver for a `width` x `height` surface rendered in pages of
    /// `page_height` rows.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is smaller than `width * page_height / 8` bytes or if
    /// `page_height` is not a non-zero multiple of 8.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transport: T,
        delay: DL,
        width: C,
        page_height: C,
        height: C,
        buf: B,
        scripts: ControllerScripts,
        clock: ClockClass,
    ) -> Self {
        Self {
            transport,
            delay,
            pb: PageBuffer::new(width, page_height, height, buf),
            height,
            scripts,
            clock,
        }
    }

    /// Tear the driver apart, returning the transport and delay source.
    pub fn release(self) -> (T, DL) {
        (self.transport, self.delay)
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn run_script(&mut self, script: &'static [u8]) -> Result<(), T::Error> {
        escape::run(&mut self.transport, &mut self.delay, script)
    }

    /// Send the current page buffer to the controller.
    ///
    /// Runs before the page position advances, so a failed flush leaves the
    /// walk pointing at the page that failed. Chip deselect is attempted
    /// even after a write failure.
    fn flush_page(&mut self) -> Result<(), T::Error> {
        self.transport.set_chip_select(1)?;
        let res = self.flush_page_selected();
        let deselect = self.transport.set_chip_select(0);
        res?;
        deselect
    }

    fn flush_page_selected(&mut self) -> Result<(), T::Error> {
        escape::run(&mut self.transport, &mut self.delay, self.scripts.page_prologue)?;
        if let Some(base) = self.scripts.page_select_base {
            self.transport.set_address_mode(AddressMode::Command)?;
            self.transport
                .write_byte(base | (self.pb.page().index() as u8 & 0x0F))?;
        }
        self.transport.set_address_mode(AddressMode::Data)?;
        self.transport.write_bytes(self.pb.page_data())
    }
}

impl<C, T, DL, B> Device for PagedMono<C, T, DL, B>
where
    C: Coord,
    T: Transport,
    DL: DelayNs,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Coord = C;
    type Error = T::Error;

    fn dispatch(&mut self, msg: Message<'_, C>) -> Result<Reply<C>, T::Error> {
        match msg {
            Message::Init => {
                log::debug!("controller init");
                self.transport.init(self.clock)?;
                self.run_script(self.scripts.init)?;
                Ok(Reply::Ack)
            }
            Message::Stop => {
                self.transport.stop()?;
                Ok(Reply::Ack)
            }
            Message::Contrast(value) => {
                if self.scripts.contrast_prologue.is_empty() {
                    return Ok(Reply::Unsupported);
                }
                // deselect is attempted even when the prologue or the value
                // byte fails, same bracket as the page flush
                let res = self
                    .run_script(self.scripts.contrast_prologue)
                    .and_then(|()| self.transport.write_byte(value));
                let deselect = self.transport.set_chip_select(0);
                res?;
                deselect?;
                Ok(Reply::Ack)
            }
            Message::SleepOn => {
                if self.scripts.sleep_on.is_empty() {
                    return Ok(Reply::Unsupported);
                }
                self.run_script(self.scripts.sleep_on)?;
                Ok(Reply::Ack)
            }
            Message::SleepOff => {
                if self.scripts.sleep_off.is_empty() {
                    return Ok(Reply::Unsupported);
                }
                self.run_script(self.scripts.sleep_off)?;
                Ok(Reply::Ack)
            }
            Message::PageFirst => {
                self.pb.page_mut().first();
                self.pb.clear();
                self.run_script(self.scripts.page_first)?;
                Ok(Reply::Ack)
            }
            Message::PageNext => {
                self.flush_page()?;
                let more = self.pb.page_mut().next();
                if more {
                    self.pb.clear();
                }
                Ok(Reply::MorePages(more))
            }
            Message::GetPageBox => Ok(Reply::PageBox(self.pb.page_box())),
            Message::SetPixel(arg) => {
                self.pb.set_pixel(arg.x, arg.y, arg.color != 0);
                Ok(Reply::Ack)
            }
            Message::SetPixelRun(arg) => {
                self.pb.set_pixel_run(arg);
                Ok(Reply::Ack)
            }
            Message::GetWidth => Ok(Reply::Dimension(self.pb.width())),
            Message::GetHeight => Ok(Reply::Dimension(self.height)),
            Message::GetMode => Ok(Reply::Mode(DisplayMode::Bw)),
            // palette and future messages: meaningless for 1-bit surfaces
            _ => Ok(Reply::Ack),
        }
    }
}
