//! Text layout: turning styled text into tokens, wrapping the tokens into lines,
//! and stacking the lines inside a width that may change from line to line.

mod items;
mod layouter;
mod line;
mod segment;
mod wrap;

pub use items::*;
pub use layouter::*;
pub use line::*;
pub use segment::*;
pub use wrap::*;
