//! Text layout: decoding, measuring and wrapping message bytes

pub mod utf8;
pub mod width;
pub mod wrap;

pub use utf8::{decode, Decoded, LayoutUnits, REPLACEMENT};
pub use width::{estimate, WidthEstimator};
pub use wrap::{wrap, DisplayLine, LineText, WrapLimits, WrappedLines, MAX_LINES_PER_MESSAGE, MAX_LINE_BYTES};
