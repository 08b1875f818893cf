//! Fast intersection predicates for page clipping
//!
//! Every drawing primitive passes its bounding box through these tests before
//! touching the page buffer, so a rejected box costs two compares in the
//! common case. The predicates are total functions over unsigned coordinates;
//! there is no error channel.
//!
//! A candidate interval may be *inverted* (`v_lo > v_hi`) when `y + h - 1`
//! wrapped around the coordinate type. An inverted candidate stands for the
//! wrapped range `[v_lo, MAX]` plus `[0, v_hi]` and hits whenever either arm
//! reaches the page, i.e. when `v_lo <= a_hi || v_hi >= a_lo`.
//!
//! ```
//! use pagegfx::clip::interval_intersects;
//!
//! // page rows 8..=15
//! assert!(interval_intersects(8u16, 15, 12, 20));
//! assert!(!interval_intersects(8u16, 15, 16, 20));
//! // wrapped candidate [40, MAX] + [0, 9]: the low arm reaches the page
//! assert!(interval_intersects(8u16, 15, 40, 9));
//! // wrapped candidate [40, MAX] + [0, 3]: neither arm does
//! assert!(!interval_intersects(8u16, 15, 40, 3));
//! ```

use crate::coord::Coord;

/// Candidate bounding box `(x, y, w, h)` for a drawing primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bbox<C: Coord> {
    /// Left edge.
    pub x: C,
    /// Top edge.
    pub y: C,
    /// Width in pixels.
    pub w: C,
    /// Height in pixels.
    pub h: C,
}

impl<C: Coord> Bbox<C> {
    /// Create a bounding box.
    #[allow(clippy::many_single_char_names)]
    pub fn new(x: C, y: C, w: C, h: C) -> Self {
        Self { x, y, w, h }
    }

    /// Vertical interval `y ..= y + h - 1`, wrapping on overflow.
    pub fn y_interval(&self) -> (C, C) {
        (self.y, self.y.wrapping_add(self.h).wrapping_sub(C::ONE))
    }

    /// Horizontal interval `x ..= x + w - 1`, wrapping on overflow.
    pub fn x_interval(&self) -> (C, C) {
        (self.x, self.x.wrapping_add(self.w).wrapping_sub(C::ONE))
    }
}

/// Does the candidate interval `v_lo..=v_hi` touch the well-ordered interval
/// `a_lo..=a_hi`?
///
/// Precondition (caller-enforced): `a_lo <= a_hi`. The candidate interval may
/// be inverted; an inverted candidate intersects iff `v_lo <= a_hi ||
/// v_hi >= a_lo`, one compare per wrapped arm.
///
/// The nested-branch shape is kept on purpose: on 8-bit targets it beats the
/// flat boolean reduction, and the page test usually exits on the first
/// compare.
pub fn interval_intersects<C: Coord>(a_lo: C, a_hi: C, v_lo: C, v_hi: C) -> bool {
    if v_lo <= a_hi {
        if v_hi >= a_lo {
            true
        } else {
            // below the page: a hit only if the candidate wrapped
            v_lo > v_hi
        }
    } else if v_hi >= a_lo {
        v_lo > v_hi
    } else {
        false
    }
}

/// Horizontal visibility against a surface of the given width.
///
/// No wraparound special case here: the horizontal interval is well-ordered
/// by construction, so a box is rejected only when both ends lie past the
/// right edge.
pub fn x_interval_visible<C: Coord>(width: C, v_lo: C, v_hi: C) -> bool {
    v_lo <= width || v_hi <= width
}
