//! Session error type
//!
//! Device and transport errors stay generic all the way up so callers can
//! match on the underlying hardware error. [`Error`] adds the phase the
//! failure happened in, because the recovery differs: an init failure kills
//! the session, a page-flush failure only kills the current frame.

use core::fmt::Debug;

/// Errors surfaced by a render session, generic over the device error.
#[derive(Debug)]
pub enum Error<E> {
    /// Controller initialization failed; the session never became usable.
    Init(E),
    /// Flushing a page to the controller failed; the frame is lost but the
    /// page position still identifies the page that failed.
    PageFlush(E),
    /// Any other device failure.
    Device(E),
}

impl<E> Error<E> {
    /// The underlying device error.
    pub fn inner(&self) -> &E {
        match self {
            Self::Init(e) | Self::PageFlush(e) | Self::Device(e) => e,
        }
    }
}

impl<E: Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Init(e) => write!(f, "Initialization failed: {e:?}"),
            Self::PageFlush(e) => write!(f, "Page flush failed: {e:?}"),
            Self::Device(e) => write!(f, "Device error: {e:?}"),
        }
    }
}

impl<E: Debug> core::error::Error for Error<E> {}
