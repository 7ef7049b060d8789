//! Common paper formats, in portrait orientation (width ≤ height).
//!
//! ```
//! use pdf_layout::pagesize::{PageOrientation, A4, LETTER};
//!
//! let (width, height) = A4.landscape();
//! assert!(width > height);
//! assert_eq!(LETTER.portrait(), LETTER);
//! ```

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const HALF_LETTER: PageSize = (Pt(5.5 * 72.0), Pt(8.5 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(14.0 * 72.0));
pub const TABLOID: PageSize = (Pt(11.0 * 72.0), Pt(17.0 * 72.0));

pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));
pub const A6: PageSize = (Pt(105.0 * 72.0 / 25.4), Pt(148.0 * 72.0 / 25.4));

/// Build a custom page size from any length unit
pub fn custom<W: Into<Pt>, H: Into<Pt>>(width: W, height: H) -> PageSize {
    (width.into(), height.into())
}

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> PageSize {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}
