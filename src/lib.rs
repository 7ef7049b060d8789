//! Lay out boxes of text, images, lists, tables and columns onto PDF pages.
//!
//! Boxes are placed into [Frame]s, which keep track of the area that is still free.
//! A [BoxFitter] drives boxes through a sequence of frames, splitting them where
//! they don't fit, and the [Composer] does the same across pages.
//!
//! ```
//! use pdf_layout::{Composer, FixedPitchFont, Quad, Style, TextBox, pagesize};
//! use std::rc::Rc;
//!
//! let style = Rc::new(Style::with_font(Rc::new(FixedPitchFont::courier()), 12.0));
//! let text = TextBox::from_text("Hello, world!", style);
//!
//! let pages = Composer::new(pagesize::A4, Some(Quad::all(72.0)))
//!     .compose(vec![Box::new(text)])
//!     .expect("text fits on a page");
//! assert_eq!(pages.len(), 1);
//! let content = pages[0].render().expect("page renders");
//! assert!(!content.is_empty());
//! ```

mod boxes;
pub use boxes::*;

mod canvas;
pub use canvas::*;

mod colour;
pub use colour::*;

mod composer;
pub use composer::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod fitter;
pub use fitter::*;

mod font;
pub use font::*;

mod frame;
pub use frame::*;

mod page;
pub use page::*;

/// Common page sizes
pub mod pagesize;

mod rect;
pub use rect::*;

mod shape;
pub use shape::*;

mod style;
pub use style::*;

/// Text segmentation, line wrapping and line layout
pub mod text;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
